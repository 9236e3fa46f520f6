//! Identifiers for genealogical entities.
//!
//! Three kinds of identifier meet in a GEDCOM transform:
//! - **handles**: opaque UUIDs generated fresh on every parse, used as join keys
//! - **sequential ids**: cosmetic per-kind ids such as `I0001`, carried in `_UID`
//! - **xrefs**: file-local pointers such as `@I1@`, never stable across files

use rustc_hash::FxHashSet;
use uuid::Uuid;

use crate::limits::SEQUENTIAL_ID_WIDTH;

/// Opaque, process-stable identifier for an entity.
///
/// Handles are never derived from xref numbers; every parse call mints new ones.
pub type Handle = Uuid;

/// Generates a fresh random handle.
pub fn new_handle() -> Handle {
    Uuid::new_v4()
}

/// The six record types this crate decodes and encodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EntityKind {
    Person,
    Family,
    Source,
    Repository,
    Note,
    Media,
}

impl EntityKind {
    /// All kinds in canonical emission order.
    pub const ALL: [EntityKind; 6] = [
        EntityKind::Person,
        EntityKind::Family,
        EntityKind::Source,
        EntityKind::Repository,
        EntityKind::Note,
        EntityKind::Media,
    ];

    /// Prefix letter used for both sequential ids and generated xrefs.
    pub fn prefix(&self) -> char {
        match self {
            EntityKind::Person => 'I',
            EntityKind::Family => 'F',
            EntityKind::Source => 'S',
            EntityKind::Repository => 'R',
            EntityKind::Note => 'N',
            EntityKind::Media => 'O',
        }
    }

    /// Maps a top-level GEDCOM tag to a kind.
    ///
    /// `SNOTE` is the GEDCOM 7 shared note and decodes the same way as `NOTE`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "INDI" => Some(EntityKind::Person),
            "FAM" => Some(EntityKind::Family),
            "SOUR" => Some(EntityKind::Source),
            "REPO" => Some(EntityKind::Repository),
            "NOTE" | "SNOTE" => Some(EntityKind::Note),
            "OBJE" => Some(EntityKind::Media),
            _ => None,
        }
    }

    /// Index into per-kind arrays, in [`EntityKind::ALL`] order.
    pub(crate) fn index(&self) -> usize {
        match self {
            EntityKind::Person => 0,
            EntityKind::Family => 1,
            EntityKind::Source => 2,
            EntityKind::Repository => 3,
            EntityKind::Note => 4,
            EntityKind::Media => 5,
        }
    }
}

/// Formats a sequential id, e.g. `(Person, 7)` -> `I0007`.
pub fn format_sequential_id(kind: EntityKind, number: u64) -> String {
    format!("{}{:0width$}", kind.prefix(), number, width = SEQUENTIAL_ID_WIDTH)
}

/// Formats an xref pointer, e.g. `(Family, 3, 0)` -> `@F3@`, `(Family, 3, 4)` -> `@F0003@`.
pub fn format_xref(kind: EntityKind, number: usize, width: usize) -> String {
    format!("@{}{:0width$}@", kind.prefix(), number, width = width)
}

/// Strips the surrounding `@` characters from a pointer value.
///
/// Returns `None` for values that are not pointers (empty after stripping).
pub fn strip_xref(value: &str) -> Option<&str> {
    let inner = value.trim().trim_matches('@');
    if inner.is_empty() { None } else { Some(inner) }
}

/// Extracts the numeric portion of an xref (`@I12@` -> 12, `@P3X@` -> 3).
///
/// Digits are collected from the first run of ASCII digits.
pub fn xref_number(xref: &str) -> Option<u64> {
    let start = xref.find(|c: char| c.is_ascii_digit())?;
    let digits: String = xref[start..].chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Derives a sequential id from an xref (`@I12@` -> `I0012`).
pub fn sequential_id_from_xref(kind: EntityKind, xref: &str) -> Option<String> {
    xref_number(xref).map(|n| format_sequential_id(kind, n))
}

/// Supplies sequential ids for records that carry neither `_UID` nor a
/// numbered xref.
///
/// Allocation runs after every record is decoded, so `taken` holds every id
/// already present in the document for that kind.
pub trait IdAllocator {
    fn allocate(&mut self, kind: EntityKind, taken: &FxHashSet<String>) -> String;
}

/// Allocates the lowest free `{P}{nnnn}` id per kind, never reusing one.
#[derive(Debug, Clone, Default)]
pub struct SequentialIdAllocator {
    last: [u64; 6],
}

impl SequentialIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdAllocator for SequentialIdAllocator {
    fn allocate(&mut self, kind: EntityKind, taken: &FxHashSet<String>) -> String {
        let last = &mut self.last[kind.index()];
        loop {
            *last += 1;
            let id = format_sequential_id(kind, *last);
            if !taken.contains(&id) {
                return id;
            }
        }
    }
}
