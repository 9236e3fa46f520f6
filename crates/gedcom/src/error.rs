//! Error types for version handling and document validation.
//!
//! Parsing and generation never fail; these errors only surface at the
//! configuration edge and from the opt-in validation pass.

use thiserror::Error;

use crate::model::{EntityKind, Handle};

/// Error parsing a GEDCOM version string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("unsupported GEDCOM version: {version:?} (expected 5.5.1 or 7.0)")]
    Unsupported { version: String },
}

/// Error found by [`crate::validate::validate_document`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{kind:?} {id} references unknown {target:?} handle {handle}")]
    DanglingReference {
        kind: EntityKind,
        id: String,
        target: EntityKind,
        handle: Handle,
    },

    #[error("handle {handle} is used by more than one entity")]
    DuplicateHandle { handle: Handle },

    #[error("{kind:?} sequential id {id} is used more than once")]
    DuplicateId { kind: EntityKind, id: String },

    #[error("person {person} lists family {family} which does not list them as a member")]
    UnreciprocatedFamily { person: String, family: String },

    #[error("family {family} lists person {person} who does not list the family")]
    UnreciprocatedMember { family: String, person: String },
}
