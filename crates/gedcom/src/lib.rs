//! GEDCOM: bidirectional transform between GEDCOM text and a genealogy model.
//!
//! This crate parses GEDCOM 5.5.1 and 7.0 text into a [`Document`] of people,
//! families, sources, repositories, notes and media, and generates GEDCOM text
//! back from a document.
//!
//! # Overview
//!
//! GEDCOM encodes a tree using only per-line level numbers and `@xref@`
//! pointers. The transform runs as a strict pipeline:
//! - **Tokenize**: split text into `(level, xref, tag, value)` lines
//! - **Build**: nest lines into one record tree per level-0 line
//! - **Resolve**: map every xref to a fresh handle before decoding, so
//!   forward references work
//! - **Decode**: one decoder per record type
//!
//! Generation runs the inverse: positional xrefs, encoders, then the
//! header/trailer envelope.
//!
//! # Quick Start
//!
//! ```rust
//! use gedcom::{DocumentBuilder, GedcomVersion, Gender, generate, new_handle, parse};
//!
//! let (john, note) = (new_handle(), new_handle());
//! let doc = DocumentBuilder::new()
//!     .person(john, |p| p.name("John", "Doe").gender(Gender::Male))
//!     .note(note, "Line1\nLine2")
//!     .build();
//!
//! let text = generate(&doc, GedcomVersion::V5_5_1);
//! assert!(text.contains("0 @N1@ NOTE Line1\n1 CONT Line2\n"));
//!
//! let parsed = parse(&text, GedcomVersion::V5_5_1);
//! assert_eq!(parsed.people[0].name.given, "John");
//! assert_eq!(parsed.notes[0].text, "Line1\nLine2");
//! ```
//!
//! # Modules
//!
//! - [`model`]: Entity types, handles and sequential ids
//! - [`codec`]: Tokenizer, record tree, reference table, decoders, encoders
//! - [`validate`]: Opt-in referential integrity checks
//! - [`error`]: Error types
//! - [`limits`]: Fixed widths and bounds
//!
//! # Error policy
//!
//! Parsing never fails. Malformed lines, orphan lines, unknown record types
//! and unresolved pointers are dropped, and the only trace they leave is the
//! shape of the returned document plus `tracing` debug events. Use
//! [`validate_document`] for strict checks.
//!
//! # Identity
//!
//! Handles are minted fresh on every parse. Xrefs are assigned by position on
//! generate and are not stable across regenerations. Every generated record
//! carries a `_UID` line with its sequential id, which is what survives a
//! round trip.

pub mod codec;
pub mod error;
pub mod limits;
pub mod model;
pub mod validate;

// Re-export commonly used types at crate root
pub use codec::{
    GedcomVersion, GenerateOptions, ReferenceTable, detect_version, generate,
    generate_with_options, parse, parse_name, parse_with_allocator,
};
pub use error::{ValidationError, VersionError};
pub use model::{
    Document, DocumentBuilder, EntityKind, Event, Family, Gender, Handle, IdAllocator, Media,
    Note, Person, PrimaryName, Repository, SequentialIdAllocator, Source, Surname, new_handle,
};
pub use validate::validate_document;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
