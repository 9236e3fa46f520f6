//! Strict validation for parsed or hand-built documents.
//!
//! The transform itself is permissive and reports problems only through the
//! shape of the returned document. Callers that need diagnostics run this
//! pass afterwards.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::ValidationError;
use crate::model::{Document, EntityKind, Family, Handle};

/// Validates referential integrity of a document.
///
/// Checks, in order:
/// - every handle is unique across all entities
/// - sequential ids are unique per kind
/// - family members and source repositories exist
/// - person family lists and family member lists agree in both directions
///
/// Returns the first problem found.
pub fn validate_document(doc: &Document) -> Result<(), ValidationError> {
    let mut kinds: FxHashMap<Handle, EntityKind> = FxHashMap::default();
    let mut ids: FxHashSet<(EntityKind, &str)> = FxHashSet::default();

    for (kind, handle, id) in doc.entities() {
        if kinds.insert(*handle, kind).is_some() {
            return Err(ValidationError::DuplicateHandle { handle: *handle });
        }
        if !ids.insert((kind, id)) {
            return Err(ValidationError::DuplicateId { kind, id: id.to_string() });
        }
    }

    let expect = |owner: EntityKind, id: &str, target: EntityKind, handle: &Handle| {
        if kinds.get(handle) == Some(&target) {
            Ok(())
        } else {
            Err(ValidationError::DanglingReference {
                kind: owner,
                id: id.to_string(),
                target,
                handle: *handle,
            })
        }
    };

    for family in &doc.families {
        for member in members(family) {
            expect(EntityKind::Family, &family.id, EntityKind::Person, member)?;
        }
    }
    for source in &doc.sources {
        for repository in &source.repositories {
            expect(EntityKind::Source, &source.id, EntityKind::Repository, repository)?;
        }
    }
    for person in &doc.people {
        for family in &person.families {
            expect(EntityKind::Person, &person.id, EntityKind::Family, family)?;
        }
    }

    for person in &doc.people {
        for handle in &person.families {
            if let Some(family) = doc.family(handle) {
                if !members(family).any(|m| m == &person.handle) {
                    return Err(ValidationError::UnreciprocatedFamily {
                        person: person.id.clone(),
                        family: family.id.clone(),
                    });
                }
            }
        }
    }
    for family in &doc.families {
        for member in members(family) {
            if let Some(person) = doc.person(member) {
                if !person.families.contains(&family.handle) {
                    return Err(ValidationError::UnreciprocatedMember {
                        family: family.id.clone(),
                        person: person.id.clone(),
                    });
                }
            }
        }
    }

    Ok(())
}

fn members(family: &Family) -> impl Iterator<Item = &Handle> {
    family
        .father
        .iter()
        .chain(family.mother.iter())
        .chain(family.children.iter())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{GedcomVersion, parse};
    use crate::model::{DocumentBuilder, Family, Person, new_handle};

    #[test]
    fn test_validate_built_document() {
        let (dad, kid, fam) = (new_handle(), new_handle(), new_handle());
        let doc = DocumentBuilder::new()
            .person(dad, |p| p.name("A", "B"))
            .person(kid, |p| p.name("C", "B"))
            .family(fam, |f| f.father(dad).child(kid))
            .build();
        assert_eq!(validate_document(&doc), Ok(()));
    }

    #[test]
    fn test_validate_dangling_member() {
        let mut doc = Document::new();
        let mut family = Family::new("F0001");
        let ghost = new_handle();
        family.children.push(ghost);
        doc.families.push(family);

        assert!(matches!(
            validate_document(&doc),
            Err(ValidationError::DanglingReference { target: EntityKind::Person, .. })
        ));
    }

    #[test]
    fn test_validate_duplicate_id() {
        let mut doc = Document::new();
        doc.people.push(Person::new("I0001"));
        doc.people.push(Person::new("I0001"));

        assert!(matches!(
            validate_document(&doc),
            Err(ValidationError::DuplicateId { kind: EntityKind::Person, .. })
        ));
    }

    #[test]
    fn test_validate_duplicate_handle() {
        let mut doc = Document::new();
        let person = Person::new("I0001");
        let mut twin = Person::new("I0002");
        twin.handle = person.handle;
        doc.people.push(person);
        doc.people.push(twin);

        assert!(matches!(validate_document(&doc), Err(ValidationError::DuplicateHandle { .. })));
    }

    #[test]
    fn test_validate_reports_one_sided_links_from_parse() {
        // The person claims the family, the family does not list the person.
        let text = "0 @I1@ INDI\n1 FAMC @F1@\n0 @F1@ FAM\n0 TRLR";
        let doc = parse(text, GedcomVersion::V5_5_1);

        assert_eq!(
            validate_document(&doc),
            Err(ValidationError::UnreciprocatedFamily {
                person: "I0001".to_string(),
                family: "F0001".to_string(),
            })
        );
    }

    #[test]
    fn test_validate_reports_unlisted_member() {
        let text = "0 @I1@ INDI\n0 @F1@ FAM\n1 HUSB @I1@\n0 TRLR";
        let doc = parse(text, GedcomVersion::V5_5_1);

        assert!(matches!(
            validate_document(&doc),
            Err(ValidationError::UnreciprocatedMember { .. })
        ));
    }
}
