//! Line-level tokenizing and writing.
//!
//! Grammar of one line, after trimming:
//!
//! ```text
//! <level> [@<xref>@] <tag> [<value>]
//! ```
//!
//! Lines that do not match are dropped; tokenizing never fails.

use std::borrow::Cow;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::limits::MIN_WRAP_WIDTH;

lazy_static! {
    static ref LINE_GRAMMAR: Regex =
        Regex::new(r"^(\d+)\s+(?:(@[^@\s]+@)\s+)?([A-Za-z0-9_]+)(?:\s+(.*))?$")
            .expect("line grammar is a valid regex");
}

// =============================================================================
// TOKENIZING
// =============================================================================

/// One structural line, borrowing from the input text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// 1-based physical line number in the input.
    pub number: usize,
    pub level: u32,
    /// Cross-reference id including its `@` delimiters, e.g. `@I1@`.
    pub xref: Option<&'a str>,
    pub tag: &'a str,
    /// Trimmed value; empty when the line has none.
    pub value: &'a str,
}

/// Parses a single line. Returns `None` for blank or malformed lines.
pub fn parse_line(raw: &str, number: usize) -> Option<Line<'_>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let caps = LINE_GRAMMAR.captures(trimmed)?;
    let level: u32 = caps.get(1)?.as_str().parse().ok()?;
    Some(Line {
        number,
        level,
        xref: caps.get(2).map(|m| m.as_str()),
        tag: caps.get(3)?.as_str(),
        value: caps.get(4).map(|m| m.as_str().trim()).unwrap_or(""),
    })
}

/// Splits raw text into structural lines.
///
/// Accepts `\n`, `\r\n` and bare `\r` line endings and a leading byte order mark.
pub fn tokenize(text: &str) -> Vec<Line<'_>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut lines = Vec::new();

    for (i, physical) in text.split('\n').enumerate() {
        // Bare `\r` endings; a `\r\n` pair leaves an empty tail here.
        for raw in physical.split('\r') {
            if raw.trim().is_empty() {
                continue;
            }
            match parse_line(raw, i + 1) {
                Some(line) => lines.push(line),
                None => debug!(line = i + 1, content = raw, "dropping malformed GEDCOM line"),
            }
        }
    }

    lines
}

/// Removes one `@` from a value escaped as `@@...`.
pub fn unescape_value(value: &str) -> &str {
    if value.starts_with("@@") { &value[1..] } else { value }
}

// =============================================================================
// WRITING
// =============================================================================

/// Writer for GEDCOM text output.
#[derive(Debug, Clone, Default)]
pub struct LineWriter {
    buf: String,
    wrap_width: Option<usize>,
}

impl LineWriter {
    /// Creates a writer that never splits long values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a writer that splits text segments longer than `width` with `CONC`.
    pub fn with_wrap_width(width: usize) -> Self {
        Self {
            buf: String::new(),
            wrap_width: Some(width.max(MIN_WRAP_WIDTH)),
        }
    }

    /// Returns the written text.
    pub fn into_string(self) -> String {
        self.buf
    }

    /// Returns a reference to the written text.
    pub fn as_str(&self) -> &str {
        &self.buf
    }

    /// Writes one line. An empty value produces no trailing space.
    ///
    /// Line breaks inside `value` are folded into single spaces; use
    /// [`LineWriter::write_text`] for values that may continue.
    pub fn write_line(&mut self, level: u32, xref: Option<&str>, tag: &str, value: &str) {
        let value = fold_line_breaks(value);
        self.buf.push_str(&level.to_string());
        self.buf.push(' ');
        if let Some(xref) = xref {
            self.buf.push_str(xref);
            self.buf.push(' ');
        }
        self.buf.push_str(tag);
        if !value.is_empty() {
            self.buf.push(' ');
            self.buf.push_str(&value);
        }
        self.buf.push('\n');
    }

    /// Writes a line whose value is a pointer; never escaped.
    pub fn write_pointer(&mut self, level: u32, tag: &str, pointer: &str) {
        self.write_line(level, None, tag, pointer);
    }

    /// Writes free text, continuing embedded newlines with `CONT` lines.
    ///
    /// The first segment goes inline with `tag`; each further segment becomes a
    /// `CONT` child one level deeper. With a wrap width set, long segments are
    /// additionally split into `CONC` children.
    pub fn write_text(&mut self, level: u32, xref: Option<&str>, tag: &str, text: &str) {
        let normalized;
        let text = if text.contains('\r') {
            normalized = text.replace("\r\n", "\n").replace('\r', "\n");
            normalized.as_str()
        } else {
            text
        };

        for (i, segment) in text.split('\n').enumerate() {
            let pieces = match self.wrap_width {
                Some(width) => split_for_conc(segment, width),
                None => vec![segment],
            };
            for (j, piece) in pieces.into_iter().enumerate() {
                let escaped = escape_value(piece);
                match (i, j) {
                    (0, 0) => self.write_line(level, xref, tag, &escaped),
                    (_, 0) => self.write_line(level + 1, None, "CONT", &escaped),
                    _ => self.write_line(level + 1, None, "CONC", &escaped),
                }
            }
        }
    }
}

/// Replaces each `\r\n`, `\r` or `\n` with a space.
fn fold_line_breaks(value: &str) -> Cow<'_, str> {
    if !value.contains(['\r', '\n']) {
        return Cow::Borrowed(value);
    }
    debug!(value, "folding line breaks in single-line GEDCOM value");
    Cow::Owned(value.replace("\r\n", " ").replace(['\r', '\n'], " "))
}

/// Doubles a leading `@` so the value cannot be mistaken for a pointer.
pub fn escape_value(value: &str) -> Cow<'_, str> {
    if value.starts_with('@') {
        Cow::Owned(format!("@{}", value))
    } else {
        Cow::Borrowed(value)
    }
}

/// Splits a segment into pieces of at most `width` chars.
///
/// Splits only fall between two non-whitespace characters, so that trimming
/// on re-parse loses nothing. A segment with no such point stays whole.
fn split_for_conc(segment: &str, width: usize) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut rest = segment;

    while rest.chars().count() > width {
        let boundaries: Vec<(usize, char)> = rest.char_indices().collect();
        let split = (1..=width).rev().find(|&i| {
            !boundaries[i - 1].1.is_whitespace() && !boundaries[i].1.is_whitespace()
        });
        match split {
            Some(i) => {
                let at = boundaries[i].0;
                pieces.push(&rest[..at]);
                rest = &rest[at..];
            }
            None => break,
        }
    }

    pieces.push(rest);
    pieces
}
