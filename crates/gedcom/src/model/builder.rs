//! Builder API for ergonomic Document construction.
//!
//! Handles are supplied by the caller so that families can reference people
//! before or after they are added. Sequential ids are assigned per kind in
//! insertion order unless overridden.
//!
//! # Example
//!
//! ```rust
//! use gedcom::model::builder::DocumentBuilder;
//! use gedcom::model::{new_handle, Gender};
//!
//! let (john, jane, fam) = (new_handle(), new_handle(), new_handle());
//! let doc = DocumentBuilder::new()
//!     .person(john, |p| p.name("John", "Doe").gender(Gender::Male))
//!     .person(jane, |p| p.name("Jane", "Roe").gender(Gender::Female))
//!     .family(fam, |f| f.father(john).mother(jane))
//!     .build();
//!
//! assert_eq!(doc.people[0].id, "I0001");
//! assert_eq!(doc.people[0].families, vec![fam]);
//! ```

use crate::model::{
    Document, EntityKind, Event, Family, Gender, Handle, Media, Note, Person, PrimaryName,
    Repository, Source, format_sequential_id,
};

/// Builder for constructing a Document.
#[derive(Debug, Clone, Default)]
pub struct DocumentBuilder {
    doc: Document,
    counters: [u64; 6],
}

impl DocumentBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self, kind: EntityKind) -> String {
        let counter = &mut self.counters[kind.index()];
        *counter += 1;
        format_sequential_id(kind, *counter)
    }

    /// Adds a person using a builder function.
    pub fn person<F>(mut self, handle: Handle, f: F) -> Self
    where
        F: FnOnce(PersonBuilder) -> PersonBuilder,
    {
        let id = self.next_id(EntityKind::Person);
        let mut person = Person::new(id);
        person.handle = handle;
        let built = f(PersonBuilder { person });
        self.doc.people.push(built.person);
        self
    }

    /// Adds a family using a builder function.
    pub fn family<F>(mut self, handle: Handle, f: F) -> Self
    where
        F: FnOnce(FamilyBuilder) -> FamilyBuilder,
    {
        let id = self.next_id(EntityKind::Family);
        let mut family = Family::new(id);
        family.handle = handle;
        let built = f(FamilyBuilder { family });
        self.doc.families.push(built.family);
        self
    }

    /// Adds a source.
    pub fn source(mut self, handle: Handle, title: &str, author: &str) -> Self {
        let id = self.next_id(EntityKind::Source);
        let mut source = Source::new(id);
        source.handle = handle;
        source.title = title.to_string();
        source.author = author.to_string();
        self.doc.sources.push(source);
        self
    }

    /// Links an already added source to a repository.
    pub fn source_in_repository(mut self, source: Handle, repository: Handle) -> Self {
        if let Some(s) = self.doc.sources.iter_mut().find(|s| s.handle == source) {
            s.repositories.push(repository);
        }
        self
    }

    /// Adds a repository.
    pub fn repository(mut self, handle: Handle, name: &str) -> Self {
        let id = self.next_id(EntityKind::Repository);
        let mut repository = Repository::new(id);
        repository.handle = handle;
        repository.name = name.to_string();
        self.doc.repositories.push(repository);
        self
    }

    /// Adds a note.
    pub fn note(mut self, handle: Handle, text: &str) -> Self {
        let id = self.next_id(EntityKind::Note);
        let mut note = Note::new(id);
        note.handle = handle;
        note.text = text.to_string();
        self.doc.notes.push(note);
        self
    }

    /// Adds a media object.
    pub fn media(mut self, handle: Handle, path: &str, description: &str) -> Self {
        let id = self.next_id(EntityKind::Media);
        let mut media = Media::new(id);
        media.handle = handle;
        media.path = path.to_string();
        media.description = description.to_string();
        self.doc.media.push(media);
        self
    }

    /// Finishes the document.
    ///
    /// Every person named as father, mother or child of a family gets that
    /// family appended to their family list if it is not already there.
    pub fn build(mut self) -> Document {
        let links: Vec<(Handle, Handle)> = self
            .doc
            .families
            .iter()
            .flat_map(|f| {
                f.father
                    .iter()
                    .chain(f.mother.iter())
                    .chain(f.children.iter())
                    .map(move |member| (*member, f.handle))
            })
            .collect();

        for (member, family) in links {
            if let Some(person) = self.doc.people.iter_mut().find(|p| p.handle == member) {
                if !person.families.contains(&family) {
                    person.families.push(family);
                }
            }
        }
        self.doc
    }
}

/// Builder for a person's fields.
#[derive(Debug, Clone)]
pub struct PersonBuilder {
    person: Person,
}

impl PersonBuilder {
    /// Overrides the sequential id.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.person.id = id.into();
        self
    }

    /// Sets given name and a single surname; call name defaults to the first given name.
    pub fn name(mut self, given: &str, surname: &str) -> Self {
        self.person.name = PrimaryName::new(given, surname);
        self
    }

    /// Sets the full primary name.
    pub fn primary_name(mut self, name: PrimaryName) -> Self {
        self.person.name = name;
        self
    }

    pub fn gender(mut self, gender: Gender) -> Self {
        self.person.gender = gender;
        self
    }

    pub fn birth(mut self, date: Option<&str>, place: Option<&str>) -> Self {
        self.person.birth = Event::new(date, place);
        self
    }

    pub fn death(mut self, date: Option<&str>, place: Option<&str>) -> Self {
        self.person.death = Event::new(date, place);
        self
    }
}

/// Builder for a family's members.
#[derive(Debug, Clone)]
pub struct FamilyBuilder {
    family: Family,
}

impl FamilyBuilder {
    /// Overrides the sequential id.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.family.id = id.into();
        self
    }

    pub fn father(mut self, person: Handle) -> Self {
        self.family.father = Some(person);
        self
    }

    pub fn mother(mut self, person: Handle) -> Self {
        self.family.mother = Some(person);
        self
    }

    /// Appends a child.
    pub fn child(mut self, person: Handle) -> Self {
        self.family.children.push(person);
        self
    }
}
