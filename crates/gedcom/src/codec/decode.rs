//! Entity decoders: one function per top-level record type.
//!
//! Every decoder is best-effort. Missing sub-fields decode to empty
//! defaults and unresolved pointers are left out of the entity.

use crate::codec::line::unescape_value;
use crate::codec::tree::Record;
use crate::codec::xref::ReferenceTable;
use crate::model::{
    EntityKind, Event, Family, Gender, Handle, Media, Note, Person, PrimaryName, Repository,
    Source, Surname, default_call_name, sequential_id_from_xref,
};

/// Splits a `NAME` value of the form `Given /Surname/ Suffix`.
///
/// Only the first pair of slashes is significant. Without a pair the whole
/// value is an unstructured given name.
pub fn parse_name(value: &str) -> PrimaryName {
    let value = unescape_value(value.trim());

    let pair = value.find('/').and_then(|open| {
        value[open + 1..]
            .find('/')
            .map(|close| (open, open + 1 + close))
    });

    let Some((open, close)) = pair else {
        return PrimaryName {
            given: value.to_string(),
            surnames: Vec::new(),
            call: default_call_name(value),
            suffix: String::new(),
        };
    };

    let given = value[..open].trim();
    let surname = value[open + 1..close].trim();
    let suffix = value[close + 1..].trim();

    PrimaryName {
        given: given.to_string(),
        surnames: if surname.is_empty() {
            Vec::new()
        } else {
            vec![Surname::new(surname)]
        },
        call: default_call_name(given),
        suffix: suffix.to_string(),
    }
}

/// Maps a `SEX` value; anything but `M` or `F` is unknown.
pub fn parse_gender(value: Option<&str>) -> Gender {
    match value.map(str::trim) {
        Some("M") => Gender::Male,
        Some("F") => Gender::Female,
        _ => Gender::Unknown,
    }
}

/// Reads a text value and its continuation children.
///
/// `CONT` appends a newline and its value; `CONC` appends its value directly.
pub fn decode_text(record: Record<'_, '_>) -> String {
    let mut text = unescape_value(record.value()).to_string();
    for child in record.children() {
        match child.tag() {
            "CONT" => {
                text.push('\n');
                text.push_str(unescape_value(child.value()));
            }
            "CONC" => text.push_str(unescape_value(child.value())),
            _ => {}
        }
    }
    text
}

/// Text of the first child with `tag`, or empty.
fn child_text(record: Record<'_, '_>, tag: &str) -> String {
    record.child(tag).map(decode_text).unwrap_or_default()
}

/// Non-empty value of the first child with `tag`.
fn non_empty(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

/// Reads the sequential id of a record.
///
/// An explicit `_UID` wins; otherwise the xref's number is padded with the
/// kind's prefix. Returns `None` when neither is usable.
pub fn extract_id(record: Record<'_, '_>, kind: EntityKind) -> Option<String> {
    if let Some(uid) = non_empty(record.child_value("_UID")) {
        return Some(uid);
    }
    record
        .xref()
        .and_then(|xref| sequential_id_from_xref(kind, xref))
}

fn decode_event(record: Option<Record<'_, '_>>) -> Event {
    let Some(record) = record else {
        return Event::default();
    };
    Event {
        date: non_empty(record.child_value("DATE")),
        place: record
            .child("PLAC")
            .map(decode_text)
            .filter(|p| !p.is_empty()),
    }
}

/// Decodes an `INDI` record.
pub fn decode_person(record: Record<'_, '_>, handle: Handle, table: &ReferenceTable) -> Person {
    let families = record
        .children()
        .filter(|c| matches!(c.tag(), "FAMC" | "FAMS"))
        .filter_map(|c| table.resolve(c.value(), EntityKind::Family))
        .collect();

    Person {
        handle,
        id: extract_id(record, EntityKind::Person).unwrap_or_default(),
        gender: parse_gender(record.child_value("SEX")),
        name: record
            .child_value("NAME")
            .map(parse_name)
            .unwrap_or_default(),
        birth: decode_event(record.child("BIRT")),
        death: decode_event(record.child("DEAT")),
        families,
    }
}

/// Decodes a `FAM` record. The first resolvable `HUSB`/`WIFE` wins.
pub fn decode_family(record: Record<'_, '_>, handle: Handle, table: &ReferenceTable) -> Family {
    let resolve_first = |tag: &str| {
        record
            .children_with_tag(tag)
            .find_map(|c| table.resolve(c.value(), EntityKind::Person))
    };

    Family {
        handle,
        id: extract_id(record, EntityKind::Family).unwrap_or_default(),
        father: resolve_first("HUSB"),
        mother: resolve_first("WIFE"),
        children: record
            .children_with_tag("CHIL")
            .filter_map(|c| table.resolve(c.value(), EntityKind::Person))
            .collect(),
    }
}

/// Decodes a `SOUR` record.
pub fn decode_source(record: Record<'_, '_>, handle: Handle, table: &ReferenceTable) -> Source {
    Source {
        handle,
        id: extract_id(record, EntityKind::Source).unwrap_or_default(),
        title: child_text(record, "TITL"),
        author: child_text(record, "AUTH"),
        publication: child_text(record, "PUBL"),
        repositories: record
            .children_with_tag("REPO")
            .filter_map(|c| table.resolve(c.value(), EntityKind::Repository))
            .collect(),
    }
}

/// Decodes a `REPO` record.
pub fn decode_repository(record: Record<'_, '_>, handle: Handle) -> Repository {
    Repository {
        handle,
        id: extract_id(record, EntityKind::Repository).unwrap_or_default(),
        name: child_text(record, "NAME"),
    }
}

/// Decodes a `NOTE` or `SNOTE` record; the text starts on the record line.
pub fn decode_note(record: Record<'_, '_>, handle: Handle) -> Note {
    Note {
        handle,
        id: extract_id(record, EntityKind::Note).unwrap_or_default(),
        text: decode_text(record),
    }
}

/// Decodes an `OBJE` record.
///
/// The description is `FILE.TITL` (5.5.1 and 7.0) or a direct `TITL` (5.5).
pub fn decode_media(record: Record<'_, '_>, handle: Handle) -> Media {
    let file = record.child("FILE");
    let description = file
        .and_then(|f| f.child("TITL"))
        .or_else(|| record.child("TITL"))
        .map(decode_text)
        .unwrap_or_default();

    Media {
        handle,
        id: extract_id(record, EntityKind::Media).unwrap_or_default(),
        path: file.map(decode_text).unwrap_or_default(),
        description,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::line::tokenize;
    use crate::codec::tree::RecordForest;

    #[test]
    fn test_parse_name_simple() {
        let name = parse_name("John /Doe/");
        assert_eq!(name.given, "John");
        assert_eq!(name.surnames, vec![Surname::new("Doe")]);
        assert_eq!(name.call, "John");
        assert_eq!(name.suffix, "");
    }

    #[test]
    fn test_parse_name_with_suffix() {
        let name = parse_name("Mary Ann /Smith/ Jr.");
        assert_eq!(name.given, "Mary Ann");
        assert_eq!(name.surnames, vec![Surname::new("Smith")]);
        assert_eq!(name.call, "Mary");
        assert_eq!(name.suffix, "Jr.");
    }

    #[test]
    fn test_parse_name_unstructured() {
        let name = parse_name("Cher");
        assert_eq!(name.given, "Cher");
        assert!(name.surnames.is_empty());
        assert_eq!(name.call, "Cher");
    }

    #[test]
    fn test_parse_name_edge_cases() {
        let blank = parse_name("Anna //");
        assert_eq!(blank.given, "Anna");
        assert!(blank.surnames.is_empty());

        let surname_only = parse_name("/Doe/");
        assert_eq!(surname_only.given, "");
        assert_eq!(surname_only.call, "");
        assert_eq!(surname_only.surnames, vec![Surname::new("Doe")]);

        let unpaired = parse_name("John /Doe");
        assert_eq!(unpaired.given, "John /Doe");
        assert!(unpaired.surnames.is_empty());

        let extra = parse_name("A /B/ C /D/");
        assert_eq!(extra.surnames, vec![Surname::new("B")]);
        assert_eq!(extra.suffix, "C /D/");
    }

    #[test]
    fn test_parse_gender() {
        assert_eq!(parse_gender(Some("M")), Gender::Male);
        assert_eq!(parse_gender(Some("F")), Gender::Female);
        assert_eq!(parse_gender(Some("X")), Gender::Unknown);
        assert_eq!(parse_gender(Some("U")), Gender::Unknown);
        assert_eq!(parse_gender(None), Gender::Unknown);
        assert_eq!(parse_gender(Some("m")), Gender::Unknown);
        assert_eq!(parse_gender(Some("f")), Gender::Unknown);
        assert_eq!(parse_gender(Some("Male")), Gender::Unknown);
    }

    #[test]
    fn test_decode_text_cont_and_conc() {
        let forest = RecordForest::build(tokenize(
            "0 @N1@ NOTE First\n1 CONC  part\n1 CONT Second\n1 CONT\n1 CONT @@Third",
        ));
        let note = forest.roots().next().unwrap();
        assert_eq!(decode_text(note), "Firstpart\nSecond\n\n@Third");
    }

    #[test]
    fn test_extract_id_prefers_uid() {
        let forest = RecordForest::build(tokenize(
            "0 @I7@ INDI\n1 _UID I0042\n0 @I8@ INDI\n0 @X@ INDI\n0 INDI",
        ));
        let ids: Vec<Option<String>> = forest
            .roots()
            .map(|r| extract_id(r, EntityKind::Person))
            .collect();
        assert_eq!(
            ids,
            vec![Some("I0042".to_string()), Some("I0008".to_string()), None, None]
        );
    }

    #[test]
    fn test_decode_person_skips_dangling_family() {
        let forest = RecordForest::build(tokenize(
            "0 @I1@ INDI\n1 NAME John /Doe/\n1 SEX M\n1 BIRT\n2 DATE 1 JAN 1900\n2 PLAC Boston\n1 FAMC @F99@\n1 FAMS @F1@\n0 @F1@ FAM",
        ));
        let (table, handles) = ReferenceTable::from_forest(&forest);
        let person = decode_person(forest.roots().next().unwrap(), handles[0], &table);

        assert_eq!(person.id, "I0001");
        assert_eq!(person.gender, Gender::Male);
        assert_eq!(person.birth.date.as_deref(), Some("1 JAN 1900"));
        assert_eq!(person.birth.place.as_deref(), Some("Boston"));
        assert_eq!(person.death, Event::default());
        assert_eq!(person.families, vec![handles[1]]);
    }

    #[test]
    fn test_decode_family_members() {
        let forest = RecordForest::build(tokenize(
            "0 @F1@ FAM\n1 HUSB @I1@\n1 WIFE @I404@\n1 CHIL @I3@\n1 CHIL @I2@\n0 @I1@ INDI\n0 @I2@ INDI\n0 @I3@ INDI",
        ));
        let (table, handles) = ReferenceTable::from_forest(&forest);
        let family = decode_family(forest.roots().next().unwrap(), handles[0], &table);

        assert_eq!(family.father, Some(handles[1]));
        assert_eq!(family.mother, None);
        assert_eq!(family.children, vec![handles[3], handles[2]]);
    }

    #[test]
    fn test_decode_source_and_repository() {
        let forest = RecordForest::build(tokenize(
            "0 @S1@ SOUR\n1 TITL Parish register\n1 AUTH Church\n1 REPO @R1@\n0 @R1@ REPO\n1 NAME Archive",
        ));
        let (table, handles) = ReferenceTable::from_forest(&forest);
        let mut roots = forest.roots();
        let source = decode_source(roots.next().unwrap(), handles[0], &table);
        let repository = decode_repository(roots.next().unwrap(), handles[1]);

        assert_eq!(source.title, "Parish register");
        assert_eq!(source.author, "Church");
        assert_eq!(source.repositories, vec![handles[1]]);
        assert_eq!(repository.name, "Archive");
        assert_eq!(repository.id, "R0001");
    }

    #[test]
    fn test_decode_media_title_locations() {
        let forest = RecordForest::build(tokenize(
            "0 @O1@ OBJE\n1 FILE photo.jpg\n2 FORM jpg\n2 TITL Wedding\n0 @O2@ OBJE\n1 TITL Old style\n1 FILE scan.tif",
        ));
        let media: Vec<Media> = forest.roots().map(|r| decode_media(r, Handle::nil())).collect();

        assert_eq!(media[0].path, "photo.jpg");
        assert_eq!(media[0].description, "Wedding");
        assert_eq!(media[1].path, "scan.tif");
        assert_eq!(media[1].description, "Old style");
    }
}
