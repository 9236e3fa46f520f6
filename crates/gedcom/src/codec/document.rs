//! Whole-document transform in both directions.
//!
//! Parse: text -> lines -> record forest -> reference table -> entities.
//! Generate: entities -> reference table -> header, records, trailer -> text.
//!
//! Each step finishes before the next starts; in particular the reference
//! table covers the whole forest before any decoder resolves a pointer.

use rustc_hash::FxHashSet;
use tracing::{debug, trace};

use crate::codec::decode::{
    decode_family, decode_media, decode_note, decode_person, decode_repository, decode_source,
};
use crate::codec::encode::{
    EncodeContext, encode_family, encode_media, encode_note, encode_person, encode_repository,
    encode_source,
};
use crate::codec::header::{GedcomVersion, declared_version, write_header, write_trailer};
use crate::codec::line::{LineWriter, tokenize};
use crate::codec::tree::RecordForest;
use crate::codec::xref::ReferenceTable;
use crate::limits::{DEFAULT_SOURCE_NAME, DEFAULT_XREF_WIDTH};
use crate::model::{Document, EntityKind, IdAllocator, SequentialIdAllocator};

// =============================================================================
// PARSING
// =============================================================================

/// Parses GEDCOM text into a document.
///
/// Never fails: malformed lines, orphan lines, unknown record types and
/// unresolved pointers are dropped. `version` is advisory; 5.5.1 and 7.0
/// input is read with the same grammar.
pub fn parse(text: &str, version: GedcomVersion) -> Document {
    parse_with_allocator(text, version, &mut SequentialIdAllocator::new())
}

/// Parses GEDCOM text, drawing missing sequential ids from `allocator`.
pub fn parse_with_allocator(
    text: &str,
    version: GedcomVersion,
    allocator: &mut dyn IdAllocator,
) -> Document {
    let forest = RecordForest::build(tokenize(text));

    if let Some(declared) = declared_version(&forest) {
        if declared != version {
            debug!(%declared, requested = %version, "GEDCOM header declares a different version");
        }
    }

    let (table, handles) = ReferenceTable::from_forest(&forest);

    let mut doc = Document::new();
    for (record, handle) in forest.roots().zip(handles) {
        let Some(kind) = EntityKind::from_tag(record.tag()) else {
            trace!(tag = record.tag(), "ignoring top-level GEDCOM record");
            continue;
        };
        match kind {
            EntityKind::Person => doc.people.push(decode_person(record, handle, &table)),
            EntityKind::Family => doc.families.push(decode_family(record, handle, &table)),
            EntityKind::Source => doc.sources.push(decode_source(record, handle, &table)),
            EntityKind::Repository => doc.repositories.push(decode_repository(record, handle)),
            EntityKind::Note => doc.notes.push(decode_note(record, handle)),
            EntityKind::Media => doc.media.push(decode_media(record, handle)),
        }
    }

    assign_missing_ids(&mut doc, allocator);

    debug!(
        %version,
        records = forest.len(),
        people = doc.people.len(),
        families = doc.families.len(),
        sources = doc.sources.len(),
        repositories = doc.repositories.len(),
        notes = doc.notes.len(),
        media = doc.media.len(),
        "parsed GEDCOM document"
    );

    doc
}

/// Fills empty sequential ids once every explicit id is known.
fn assign_missing_ids(doc: &mut Document, allocator: &mut dyn IdAllocator) {
    for kind in EntityKind::ALL {
        let ids = ids_mut(doc, kind);
        let mut taken: FxHashSet<String> = ids
            .iter()
            .filter(|id| !id.is_empty())
            .map(|id| id.to_string())
            .collect();

        for id in ids.into_iter().filter(|id| id.is_empty()) {
            *id = allocator.allocate(kind, &taken);
            taken.insert(id.clone());
        }
    }
}

fn ids_mut(doc: &mut Document, kind: EntityKind) -> Vec<&mut String> {
    match kind {
        EntityKind::Person => doc.people.iter_mut().map(|e| &mut e.id).collect(),
        EntityKind::Family => doc.families.iter_mut().map(|e| &mut e.id).collect(),
        EntityKind::Source => doc.sources.iter_mut().map(|e| &mut e.id).collect(),
        EntityKind::Repository => doc.repositories.iter_mut().map(|e| &mut e.id).collect(),
        EntityKind::Note => doc.notes.iter_mut().map(|e| &mut e.id).collect(),
        EntityKind::Media => doc.media.iter_mut().map(|e| &mut e.id).collect(),
    }
}

// =============================================================================
// GENERATING
// =============================================================================

/// Options for generating GEDCOM text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    pub version: GedcomVersion,
    /// `HEAD.SOUR` value (5.5.1 only).
    pub source_name: String,
    /// Zero padding of xref numbers; 0 writes `@I1@`, 4 writes `@I0001@`.
    pub xref_width: usize,
    /// Split text longer than this with `CONC` (5.5.1 only).
    pub wrap_width: Option<usize>,
    /// Write note records as `SNOTE` (7.0 only); `NOTE` otherwise.
    pub shared_notes: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self::new(GedcomVersion::default())
    }
}

impl GenerateOptions {
    pub fn new(version: GedcomVersion) -> Self {
        Self {
            version,
            source_name: DEFAULT_SOURCE_NAME.to_string(),
            xref_width: DEFAULT_XREF_WIDTH,
            wrap_width: None,
            shared_notes: false,
        }
    }

    pub fn source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = name.into();
        self
    }

    pub fn xref_width(mut self, width: usize) -> Self {
        self.xref_width = width;
        self
    }

    pub fn wrap_width(mut self, width: usize) -> Self {
        self.wrap_width = Some(width);
        self
    }

    pub fn shared_notes(mut self, enabled: bool) -> Self {
        self.shared_notes = enabled;
        self
    }
}

/// Generates GEDCOM text for a document.
///
/// Records are written in a fixed order: people, families, sources,
/// repositories, notes, media. Xrefs are positional within each kind, so they
/// are not stable across regenerations of a reordered document; the `_UID`
/// line on every record carries the stable sequential id instead.
pub fn generate(doc: &Document, version: GedcomVersion) -> String {
    generate_with_options(doc, &GenerateOptions::new(version))
}

/// Generates GEDCOM text with explicit options.
pub fn generate_with_options(doc: &Document, options: &GenerateOptions) -> String {
    let table = ReferenceTable::for_document(doc, options.xref_width);
    let ctx = EncodeContext::new(&table, &doc.families, options.version)
        .with_shared_notes(options.shared_notes);

    let mut w = match (options.version, options.wrap_width) {
        (GedcomVersion::V5_5_1, Some(width)) => LineWriter::with_wrap_width(width),
        _ => LineWriter::new(),
    };

    write_header(&mut w, options.version, &options.source_name);
    for person in &doc.people {
        encode_person(&mut w, person, &ctx);
    }
    for family in &doc.families {
        encode_family(&mut w, family, &ctx);
    }
    for source in &doc.sources {
        encode_source(&mut w, source, &ctx);
    }
    for repository in &doc.repositories {
        encode_repository(&mut w, repository, &ctx);
    }
    for note in &doc.notes {
        encode_note(&mut w, note, &ctx);
    }
    for media in &doc.media {
        encode_media(&mut w, media, &ctx);
    }
    write_trailer(&mut w);

    debug!(version = %options.version, entities = doc.len(), "generated GEDCOM document");

    w.into_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DocumentBuilder, Gender, PrimaryName, new_handle};

    const SAMPLE: &str = "\
0 HEAD
1 SOUR TEST
1 GEDC
2 VERS 5.5.1
0 @I1@ INDI
1 NAME John /Doe/
1 SEX M
1 BIRT
2 DATE 1 JAN 1900
2 PLAC Boston, MA
1 FAMS @F1@
0 @I2@ INDI
1 NAME Mary Ann /Smith/ Jr.
1 SEX F
1 DEAT
2 DATE 1980
1 FAMS @F1@
0 @I3@ INDI
1 NAME Cher
1 SEX X
1 FAMC @F1@
1 FAMC @F99@
0 @F1@ FAM
1 HUSB @I1@
1 WIFE @I2@
1 CHIL @I3@
0 @S1@ SOUR
1 TITL Census
1 AUTH Bureau
1 REPO @R1@
0 @R1@ REPO
1 NAME National Archive
0 @N1@ NOTE Line1
1 CONT Line2
0 @O1@ OBJE
1 FILE photo.jpg
2 TITL Portrait
0 @U1@ SUBM
1 NAME Submitter
0 TRLR
";

    #[test]
    fn test_parse_sample() {
        let doc = parse(SAMPLE, GedcomVersion::V5_5_1);

        assert_eq!(doc.people.len(), 3);
        assert_eq!(doc.families.len(), 1);
        assert_eq!(doc.sources.len(), 1);
        assert_eq!(doc.repositories.len(), 1);
        assert_eq!(doc.notes.len(), 1);
        assert_eq!(doc.media.len(), 1);

        let john = doc.person_by_id("I0001").unwrap();
        let mary = doc.person_by_id("I0002").unwrap();
        let cher = doc.person_by_id("I0003").unwrap();
        let family = &doc.families[0];

        assert_eq!(john.gender, Gender::Male);
        assert_eq!(john.birth.place.as_deref(), Some("Boston, MA"));
        assert_eq!(mary.name.suffix, "Jr.");
        assert_eq!(mary.death.date.as_deref(), Some("1980"));
        assert_eq!(cher.gender, Gender::Unknown);
        assert!(cher.name.surnames.is_empty());

        assert_eq!(family.father, Some(john.handle));
        assert_eq!(family.mother, Some(mary.handle));
        assert_eq!(family.children, vec![cher.handle]);
        assert_eq!(john.families, vec![family.handle]);
        assert_eq!(cher.families, vec![family.handle]);

        assert_eq!(doc.sources[0].repositories, vec![doc.repositories[0].handle]);
        assert_eq!(doc.notes[0].text, "Line1\nLine2");
        assert_eq!(doc.media[0].description, "Portrait");
    }

    #[test]
    fn test_forward_references_resolve() {
        let text = "0 @I1@ INDI\n1 FAMC @F1@\n0 @I2@ INDI\n1 FAMS @F1@\n0 @F1@ FAM\n1 HUSB @I2@\n1 CHIL @I1@\n0 TRLR";
        let doc = parse(text, GedcomVersion::V7_0);
        let family = doc.families[0].handle;

        assert_eq!(doc.people[0].families, vec![family]);
        assert_eq!(doc.people[1].families, vec![family]);
        assert_eq!(doc.families[0].father, Some(doc.people[1].handle));
    }

    #[test]
    fn test_dangling_reference_is_dropped() {
        let doc = parse("0 @I1@ INDI\n1 FAMC @F99@\n0 TRLR", GedcomVersion::V5_5_1);
        assert_eq!(doc.people.len(), 1);
        assert!(doc.people[0].families.is_empty());
    }

    #[test]
    fn test_malformed_lines_do_not_change_result() {
        let clean = "0 @I1@ INDI\n1 NAME John /Doe/\n1 SEX M\n0 @N1@ NOTE a\n1 CONT b\n0 TRLR";
        let noisy = "garbage\n0 @I1@ INDI\nNAME without level\n1 NAME John /Doe/\n\n   \n1 SEX M\n@@@\n0 @N1@ NOTE a\nx CONT bad\n1 CONT b\n0 TRLR";

        let a = parse(clean, GedcomVersion::V5_5_1);
        let b = parse(noisy, GedcomVersion::V5_5_1);

        assert_eq!(a.people[0].name, b.people[0].name);
        assert_eq!(a.people[0].gender, b.people[0].gender);
        assert_eq!(a.people[0].id, b.people[0].id);
        assert_eq!(a.notes[0].text, b.notes[0].text);
        assert_eq!(a.notes[0].id, b.notes[0].id);
    }

    #[test]
    fn test_missing_ids_do_not_collide() {
        let text = "0 @I2@ INDI\n0 @X@ INDI\n0 INDI\n1 _UID I0001\n0 INDI";
        let doc = parse(text, GedcomVersion::V5_5_1);
        let ids: Vec<&str> = doc.people.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["I0002", "I0003", "I0001", "I0004"]);
    }

    #[test]
    fn test_custom_allocator() {
        struct Fixed;
        impl IdAllocator for Fixed {
            fn allocate(&mut self, kind: EntityKind, taken: &FxHashSet<String>) -> String {
                format!("{}-custom-{}", kind.prefix(), taken.len())
            }
        }

        let doc = parse_with_allocator("0 NOTE a\n0 NOTE b", GedcomVersion::V7_0, &mut Fixed);
        assert_eq!(doc.notes[0].id, "N-custom-0");
        assert_eq!(doc.notes[1].id, "N-custom-1");
    }

    #[test]
    fn test_generate_envelope_and_order() {
        let doc = DocumentBuilder::new()
            .media(new_handle(), "a.png", "")
            .note(new_handle(), "n")
            .person(new_handle(), |p| p.name("A", "B"))
            .build();

        let text = generate(&doc, GedcomVersion::V7_0);
        assert!(text.starts_with("0 HEAD\n1 GEDC\n2 VERS 7.0\n"));
        assert!(text.ends_with("0 TRLR\n"));

        let indi = text.find("INDI").unwrap();
        let note = text.find("@N1@ NOTE").unwrap();
        let obje = text.find("OBJE").unwrap();
        assert!(indi < note && note < obje);
    }

    #[test]
    fn test_generate_note_continuation() {
        let doc = DocumentBuilder::new().note(new_handle(), "Line1\nLine2").build();
        let text = generate(&doc, GedcomVersion::V5_5_1);

        assert!(text.contains("0 @N1@ NOTE Line1\n1 CONT Line2\n"));
        assert_eq!(parse(&text, GedcomVersion::V5_5_1).notes[0].text, "Line1\nLine2");
    }

    #[test]
    fn test_generate_shared_notes_opt_in() {
        let doc = DocumentBuilder::new().note(new_handle(), "Line1\nLine2").build();

        let text = generate(&doc, GedcomVersion::V7_0);
        assert!(text.contains("0 @N1@ NOTE Line1\n1 CONT Line2\n"));

        let options = GenerateOptions::new(GedcomVersion::V7_0).shared_notes(true);
        let text = generate_with_options(&doc, &options);
        assert!(text.contains("0 @N1@ SNOTE Line1\n1 CONT Line2\n"));
        assert_eq!(parse(&text, GedcomVersion::V7_0).notes[0].text, "Line1\nLine2");

        let options = GenerateOptions::new(GedcomVersion::V5_5_1).shared_notes(true);
        assert!(generate_with_options(&doc, &options).contains("0 @N1@ NOTE Line1\n"));
    }

    #[test]
    fn test_line_breaks_in_single_line_fields_cannot_forge_records() {
        let doc = DocumentBuilder::new()
            .person(new_handle(), |p| {
                p.name("Ann\nMarie", "Smith")
                    .birth(Some("1900\n0 @I9@ INDI\n1 NAME Evil /Twin/"), Some("Boston\nMA"))
            })
            .build();

        for version in [GedcomVersion::V5_5_1, GedcomVersion::V7_0] {
            let parsed = parse(&generate(&doc, version), version);

            assert_eq!(parsed.people.len(), 1);
            let person = &parsed.people[0];
            assert_eq!(person.name.given, "Ann Marie");
            assert_eq!(person.name.surname_text(), "Smith");
            assert_eq!(person.birth.date.as_deref(), Some("1900 0 @I9@ INDI 1 NAME Evil /Twin/"));
            assert_eq!(person.birth.place.as_deref(), Some("Boston\nMA"));
        }
    }

    #[test]
    fn test_blank_event_parts_round_trip() {
        let doc = DocumentBuilder::new()
            .person(new_handle(), |p| p.birth(Some(""), Some("Boston")).death(Some(""), None))
            .build();

        for version in [GedcomVersion::V5_5_1, GedcomVersion::V7_0] {
            let parsed = parse(&generate(&doc, version), version);
            assert_eq!(parsed.people[0].birth, doc.people[0].birth);
            assert_eq!(parsed.people[0].death, doc.people[0].death);
        }
    }

    #[test]
    fn test_generate_padded_xrefs() {
        let doc = DocumentBuilder::new().person(new_handle(), |p| p).build();
        let text = generate_with_options(&doc, &GenerateOptions::new(GedcomVersion::V5_5_1).xref_width(4));
        assert!(text.contains("0 @I0001@ INDI\n"));
    }

    #[test]
    fn test_wrapped_text_round_trips() {
        let long = "The quick brown fox jumps over the lazy dog. ".repeat(20);
        let long = long.trim_end();
        let doc = DocumentBuilder::new().note(new_handle(), long).build();

        let options = GenerateOptions::new(GedcomVersion::V5_5_1).wrap_width(60);
        let text = generate_with_options(&doc, &options);
        assert!(text.contains("1 CONC "));
        assert!(text.lines().all(|l| l.len() <= 75));
        assert_eq!(parse(&text, GedcomVersion::V5_5_1).notes[0].text, long);

        let text7 = generate_with_options(&doc, &GenerateOptions::new(GedcomVersion::V7_0).wrap_width(60));
        assert!(!text7.contains("CONC"));
    }

    #[test]
    fn test_round_trip_sample_both_versions() {
        let (dad, mom, kid, fam) = (new_handle(), new_handle(), new_handle(), new_handle());
        let (src, repo) = (new_handle(), new_handle());
        let doc = DocumentBuilder::new()
            .person(dad, |p| {
                p.primary_name(PrimaryName::new("John Paul", "Doe").with_suffix("Sr."))
                    .gender(Gender::Male)
                    .birth(Some("ABT 1900"), Some("Boston"))
                    .death(Some("1970"), None)
            })
            .person(mom, |p| p.name("Jane", "Roe").gender(Gender::Female))
            .person(kid, |p| p.name("Cher", ""))
            .family(fam, |f| f.father(dad).mother(mom).child(kid))
            .source(src, "Census", "Bureau")
            .repository(repo, "Archive")
            .source_in_repository(src, repo)
            .note(new_handle(), "first\n\n@second")
            .media(new_handle(), "scan.pdf", "Record")
            .build();

        for version in [GedcomVersion::V5_5_1, GedcomVersion::V7_0] {
            let parsed = parse(&generate(&doc, version), version);

            for (a, b) in doc.people.iter().zip(&parsed.people) {
                assert_eq!(a.id, b.id);
                assert_eq!(a.name, b.name);
                assert_eq!(a.gender, b.gender);
                assert_eq!(a.birth, b.birth);
                assert_eq!(a.death, b.death);
            }
            let family = &parsed.families[0];
            assert_eq!(parsed.person(&family.father.unwrap()).unwrap().id, "I0001");
            assert_eq!(parsed.person(&family.mother.unwrap()).unwrap().id, "I0002");
            assert_eq!(parsed.person(&family.children[0]).unwrap().id, "I0003");
            assert_eq!(parsed.people[2].families, vec![family.handle]);

            assert_eq!(parsed.sources[0].title, "Census");
            assert_eq!(parsed.sources[0].repositories, vec![parsed.repositories[0].handle]);
            assert_eq!(parsed.notes[0].text, "first\n\n@second");
            assert_eq!(parsed.media[0].path, "scan.pdf");
            assert_eq!(parsed.media[0].description, "Record");
        }
    }
}
