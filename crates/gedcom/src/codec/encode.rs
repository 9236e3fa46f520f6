//! Entity encoders: the inverse of [`crate::codec::decode`].

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::codec::header::GedcomVersion;
use crate::codec::line::{LineWriter, escape_value};
use crate::codec::xref::ReferenceTable;
use crate::model::{Event, Family, Gender, Handle, Media, Note, Person, PrimaryName, Repository, Source};

/// Shared state for encoding one document.
#[derive(Debug)]
pub struct EncodeContext<'d> {
    pub table: &'d ReferenceTable,
    pub version: GedcomVersion,
    shared_notes: bool,
    families: FxHashMap<Handle, &'d Family>,
}

impl<'d> EncodeContext<'d> {
    pub fn new(table: &'d ReferenceTable, families: &'d [Family], version: GedcomVersion) -> Self {
        Self {
            table,
            version,
            shared_notes: false,
            families: families.iter().map(|f| (f.handle, f)).collect(),
        }
    }

    /// Writes notes as 7.0 shared notes (`SNOTE`); ignored for 5.5.1.
    pub fn with_shared_notes(mut self, enabled: bool) -> Self {
        self.shared_notes = enabled;
        self
    }

    fn pointer(&self, handle: &Handle) -> Option<String> {
        let pointer = self.table.pointer(handle);
        if pointer.is_none() {
            debug!(%handle, "dropping link to entity outside the document");
        }
        pointer
    }

    fn own_pointer(&self, handle: &Handle) -> Option<String> {
        self.table.pointer(handle)
    }
}

/// Reassembles a name as `Given /Surname/[ Suffix]`.
pub fn format_name(name: &PrimaryName) -> String {
    let mut value = format!("{} /{}/", name.given, name.surname_text());
    if !name.suffix.is_empty() {
        value.push(' ');
        value.push_str(&name.suffix);
    }
    value.trim_start().to_string()
}

/// Maps a gender to its `SEX` value.
pub fn format_gender(gender: Gender) -> &'static str {
    match gender {
        Gender::Male => "M",
        Gender::Female => "F",
        Gender::Unknown => "U",
    }
}

fn encode_event(w: &mut LineWriter, tag: &str, event: &Event) {
    if event.is_empty() {
        return;
    }
    w.write_line(1, None, tag, "");
    if let Some(date) = event.date.as_deref().filter(|d| !d.is_empty()) {
        w.write_line(2, None, "DATE", date);
    }
    if let Some(place) = event.place.as_deref().filter(|p| !p.is_empty()) {
        w.write_text(2, None, "PLAC", place);
    }
}

fn encode_uid(w: &mut LineWriter, id: &str) {
    if !id.is_empty() {
        w.write_line(1, None, "_UID", id);
    }
}

fn encode_text_field(w: &mut LineWriter, tag: &str, text: &str) {
    if !text.is_empty() {
        w.write_text(1, None, tag, text);
    }
}

/// Encodes a person as an `INDI` record.
///
/// A family link is written as `FAMS` when the person is a parent in that
/// family and as `FAMC` otherwise.
pub fn encode_person(w: &mut LineWriter, person: &Person, ctx: &EncodeContext<'_>) {
    let Some(xref) = ctx.own_pointer(&person.handle) else {
        return;
    };
    w.write_line(0, Some(&xref), "INDI", "");

    if !person.name.is_empty() {
        w.write_line(1, None, "NAME", &escape_value(&format_name(&person.name)));
    }
    w.write_line(1, None, "SEX", format_gender(person.gender));
    encode_event(w, "BIRT", &person.birth);
    encode_event(w, "DEAT", &person.death);

    for family_handle in &person.families {
        let Some(family) = ctx.families.get(family_handle) else {
            debug!(person = %person.id, family = %family_handle, "dropping link to family outside the document");
            continue;
        };
        let Some(pointer) = ctx.pointer(family_handle) else {
            continue;
        };
        let tag = if family.is_parent(&person.handle) { "FAMS" } else { "FAMC" };
        w.write_pointer(1, tag, &pointer);
    }

    encode_uid(w, &person.id);
}

/// Encodes a family as a `FAM` record.
pub fn encode_family(w: &mut LineWriter, family: &Family, ctx: &EncodeContext<'_>) {
    let Some(xref) = ctx.own_pointer(&family.handle) else {
        return;
    };
    w.write_line(0, Some(&xref), "FAM", "");

    if let Some(pointer) = family.father.as_ref().and_then(|h| ctx.pointer(h)) {
        w.write_pointer(1, "HUSB", &pointer);
    }
    if let Some(pointer) = family.mother.as_ref().and_then(|h| ctx.pointer(h)) {
        w.write_pointer(1, "WIFE", &pointer);
    }
    for pointer in family.children.iter().filter_map(|h| ctx.pointer(h)) {
        w.write_pointer(1, "CHIL", &pointer);
    }

    encode_uid(w, &family.id);
}

/// Encodes a source as a `SOUR` record.
pub fn encode_source(w: &mut LineWriter, source: &Source, ctx: &EncodeContext<'_>) {
    let Some(xref) = ctx.own_pointer(&source.handle) else {
        return;
    };
    w.write_line(0, Some(&xref), "SOUR", "");
    encode_text_field(w, "TITL", &source.title);
    encode_text_field(w, "AUTH", &source.author);
    encode_text_field(w, "PUBL", &source.publication);
    for pointer in source.repositories.iter().filter_map(|h| ctx.pointer(h)) {
        w.write_pointer(1, "REPO", &pointer);
    }
    encode_uid(w, &source.id);
}

/// Encodes a repository as a `REPO` record.
pub fn encode_repository(w: &mut LineWriter, repository: &Repository, ctx: &EncodeContext<'_>) {
    let Some(xref) = ctx.own_pointer(&repository.handle) else {
        return;
    };
    w.write_line(0, Some(&xref), "REPO", "");
    encode_text_field(w, "NAME", &repository.name);
    encode_uid(w, &repository.id);
}

/// Encodes a note as a `NOTE` record, or as `SNOTE` when shared notes are on for 7.0.
pub fn encode_note(w: &mut LineWriter, note: &Note, ctx: &EncodeContext<'_>) {
    let Some(xref) = ctx.own_pointer(&note.handle) else {
        return;
    };
    let tag = match ctx.version {
        GedcomVersion::V7_0 if ctx.shared_notes => "SNOTE",
        _ => "NOTE",
    };
    w.write_text(0, Some(&xref), tag, &note.text);
    encode_uid(w, &note.id);
}

/// Encodes a media object as an `OBJE` record.
pub fn encode_media(w: &mut LineWriter, media: &Media, ctx: &EncodeContext<'_>) {
    let Some(xref) = ctx.own_pointer(&media.handle) else {
        return;
    };
    w.write_line(0, Some(&xref), "OBJE", "");
    w.write_text(1, None, "FILE", &media.path);
    if let Some(form) = media_form(&media.path, ctx.version) {
        w.write_line(2, None, "FORM", form);
    }
    if !media.description.is_empty() {
        w.write_text(2, None, "TITL", &media.description);
    }
    encode_uid(w, &media.id);
}

/// `FORM` value for a media path: the extension in 5.5.1, a media type in 7.0.
fn media_form(path: &str, version: GedcomVersion) -> Option<&'static str> {
    let (_, ext) = path.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    let (short, media_type) = match ext.as_str() {
        "jpg" | "jpeg" => ("jpg", "image/jpeg"),
        "png" => ("png", "image/png"),
        "gif" => ("gif", "image/gif"),
        "bmp" => ("bmp", "image/bmp"),
        "tif" | "tiff" => ("tif", "image/tiff"),
        "pdf" => ("pdf", "application/pdf"),
        "wav" => ("wav", "audio/wav"),
        "mp3" => ("mp3", "audio/mpeg"),
        "mp4" => ("mp4", "video/mp4"),
        "txt" => ("txt", "text/plain"),
        _ => return None,
    };
    Some(match version {
        GedcomVersion::V5_5_1 => short,
        GedcomVersion::V7_0 => media_type,
    })
}
