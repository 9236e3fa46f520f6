//! Data model types for the genealogy core.
//!
//! This module contains the entities exchanged across the transform boundary:
//! - Identifiers (handles, sequential ids, xref helpers)
//! - People and their names and events
//! - Families, sources, repositories, notes and media
//! - The `Document` collection
//! - Builders (ergonomic construction)

pub mod builder;
pub mod document;
pub mod id;
pub mod person;
pub mod record;

pub use builder::{DocumentBuilder, FamilyBuilder, PersonBuilder};
pub use document::Document;
pub use id::{
    EntityKind, Handle, IdAllocator, SequentialIdAllocator, format_sequential_id, format_xref,
    new_handle, sequential_id_from_xref, strip_xref, xref_number,
};
pub use person::{Event, Gender, Person, PrimaryName, Surname, default_call_name};
pub use record::{Family, Media, Note, Repository, Source};
