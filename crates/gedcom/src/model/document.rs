//! The collection-of-entities shape exchanged with callers.

use crate::model::{EntityKind, Family, Handle, Media, Note, Person, Repository, Source};

/// A complete genealogical document.
///
/// This is the only value crossing the transform boundary: `parse` produces
/// one and `generate` consumes one. Collections keep file order on parse and
/// determine xref numbering on generate.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Document {
    pub people: Vec<Person>,
    pub families: Vec<Family>,
    pub sources: Vec<Source>,
    pub repositories: Vec<Repository>,
    pub notes: Vec<Note>,
    pub media: Vec<Media>,
}

impl Document {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a person by handle.
    pub fn person(&self, handle: &Handle) -> Option<&Person> {
        self.people.iter().find(|p| &p.handle == handle)
    }

    /// Looks up a family by handle.
    pub fn family(&self, handle: &Handle) -> Option<&Family> {
        self.families.iter().find(|f| &f.handle == handle)
    }

    /// Looks up a repository by handle.
    pub fn repository(&self, handle: &Handle) -> Option<&Repository> {
        self.repositories.iter().find(|r| &r.handle == handle)
    }

    /// Looks up a person by sequential id.
    pub fn person_by_id(&self, id: &str) -> Option<&Person> {
        self.people.iter().find(|p| p.id == id)
    }

    /// Looks up a family by sequential id.
    pub fn family_by_id(&self, id: &str) -> Option<&Family> {
        self.families.iter().find(|f| f.id == id)
    }

    /// Number of entities of the given kind.
    pub fn count(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Person => self.people.len(),
            EntityKind::Family => self.families.len(),
            EntityKind::Source => self.sources.len(),
            EntityKind::Repository => self.repositories.len(),
            EntityKind::Note => self.notes.len(),
            EntityKind::Media => self.media.len(),
        }
    }

    /// Total number of entities across all kinds.
    pub fn len(&self) -> usize {
        EntityKind::ALL.iter().map(|k| self.count(*k)).sum()
    }

    /// Returns true if the document holds no entities.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(kind, handle, sequential id)` for every entity, in emission order.
    pub fn entities(&self) -> impl Iterator<Item = (EntityKind, &Handle, &str)> {
        let people = self.people.iter().map(|e| (EntityKind::Person, &e.handle, e.id.as_str()));
        let families = self.families.iter().map(|e| (EntityKind::Family, &e.handle, e.id.as_str()));
        let sources = self.sources.iter().map(|e| (EntityKind::Source, &e.handle, e.id.as_str()));
        let repositories = self
            .repositories
            .iter()
            .map(|e| (EntityKind::Repository, &e.handle, e.id.as_str()));
        let notes = self.notes.iter().map(|e| (EntityKind::Note, &e.handle, e.id.as_str()));
        let media = self.media.iter().map(|e| (EntityKind::Media, &e.handle, e.id.as_str()));
        people
            .chain(families)
            .chain(sources)
            .chain(repositories)
            .chain(notes)
            .chain(media)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_lookup() {
        let mut doc = Document::new();
        assert!(doc.is_empty());

        let person = Person::new("I0001");
        let handle = person.handle;
        doc.people.push(person);
        doc.families.push(Family::new("F0001"));

        assert_eq!(doc.len(), 2);
        assert_eq!(doc.count(EntityKind::Person), 1);
        assert_eq!(doc.person(&handle).map(|p| p.id.as_str()), Some("I0001"));
        assert!(doc.person_by_id("I0002").is_none());
        assert_eq!(doc.entities().count(), 2);
    }
}
