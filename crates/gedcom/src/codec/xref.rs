//! Cross-reference table between file-local xrefs and handles.
//!
//! Parse direction: built over the whole record forest before any decoder
//! runs, so forward references resolve. Generate direction: built from the
//! document by positional numbering per kind.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::codec::tree::RecordForest;
use crate::model::{Document, EntityKind, Handle, format_xref, new_handle, strip_xref};

/// A one-to-one map between bare xref ids (`I1`) and handles.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
    by_xref: FxHashMap<String, (Handle, EntityKind)>,
    by_handle: FxHashMap<Handle, String>,
}

impl ReferenceTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the table from every root carrying an xref.
    ///
    /// Returns the table and one freshly generated handle per root, aligned
    /// with [`RecordForest::roots`]. When an xref is defined twice, the first
    /// definition keeps the mapping; the later record keeps its own handle but
    /// cannot be pointed at.
    pub fn from_forest(forest: &RecordForest<'_>) -> (Self, Vec<Handle>) {
        let mut table = Self::new();
        let mut handles = Vec::with_capacity(forest.len());

        for record in forest.roots() {
            let handle = new_handle();
            handles.push(handle);

            let Some(kind) = EntityKind::from_tag(record.tag()) else {
                continue;
            };
            let Some(xref) = record.xref().and_then(strip_xref) else {
                continue;
            };
            if !table.insert(xref, handle, kind) {
                debug!(xref, "duplicate GEDCOM xref; keeping first definition");
            }
        }

        (table, handles)
    }

    /// Assigns positional xrefs: the Nth entity of a kind gets `@{P}{N}@`.
    ///
    /// Numbering depends on collection order, so regenerating a reordered
    /// document renumbers its xrefs.
    pub fn for_document(doc: &Document, width: usize) -> Self {
        let mut table = Self::new();
        let mut counters = [0usize; 6];

        for (kind, handle, _) in doc.entities() {
            let counter = &mut counters[kind.index()];
            *counter += 1;
            let pointer = format_xref(kind, *counter, width);
            if let Some(xref) = strip_xref(&pointer) {
                if !table.insert(xref, *handle, kind) {
                    debug!(%handle, "handle appears on more than one entity; later entity is unreachable");
                }
            }
        }

        table
    }

    /// Records a mapping. Returns false if either side is already mapped.
    pub fn insert(&mut self, xref: &str, handle: Handle, kind: EntityKind) -> bool {
        if self.by_xref.contains_key(xref) || self.by_handle.contains_key(&handle) {
            return false;
        }
        self.by_xref.insert(xref.to_string(), (handle, kind));
        self.by_handle.insert(handle, xref.to_string());
        true
    }

    /// Resolves a pointer value (with or without `@`) to a handle of `kind`.
    ///
    /// Unknown ids and ids of another kind resolve to `None`.
    pub fn resolve(&self, pointer: &str, kind: EntityKind) -> Option<Handle> {
        let xref = strip_xref(pointer)?;
        match self.by_xref.get(xref) {
            Some((handle, found)) if *found == kind => Some(*handle),
            Some((_, found)) => {
                debug!(xref, expected = ?kind, found = ?found, "GEDCOM pointer targets wrong record type");
                None
            }
            None => {
                debug!(xref, expected = ?kind, "unresolved GEDCOM pointer");
                None
            }
        }
    }

    /// The bare xref id assigned to a handle.
    pub fn xref(&self, handle: &Handle) -> Option<&str> {
        self.by_handle.get(handle).map(String::as_str)
    }

    /// The pointer (`@I1@`) for a handle, ready to write.
    pub fn pointer(&self, handle: &Handle) -> Option<String> {
        self.xref(handle).map(|x| format!("@{}@", x))
    }

    /// Number of mapped ids.
    pub fn len(&self) -> usize {
        self.by_xref.len()
    }

    /// Returns true if nothing is mapped.
    pub fn is_empty(&self) -> bool {
        self.by_xref.is_empty()
    }
}
