//! Text encoding/decoding for GEDCOM 5.5.1 and 7.0.
//!
//! Leaf-first: `line` tokenizes and writes single lines, `tree` nests them
//! into records, `xref` maps pointers to handles, `decode`/`encode` handle one
//! record type at a time, `header` writes the envelope and `document` runs
//! the whole pipeline.

pub mod decode;
pub mod document;
pub mod encode;
pub mod header;
pub mod line;
pub mod tree;
pub mod xref;

pub use decode::{parse_gender, parse_name};
pub use document::{GenerateOptions, generate, generate_with_options, parse, parse_with_allocator};
pub use encode::{format_gender, format_name};
pub use header::{GedcomVersion, detect_version};
pub use line::{Line, LineWriter, tokenize};
pub use tree::{Record, RecordForest};
pub use xref::ReferenceTable;
