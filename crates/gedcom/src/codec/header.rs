//! GEDCOM versions and the fixed header/trailer envelope.

use std::fmt;
use std::str::FromStr;

use crate::codec::line::{LineWriter, tokenize};
use crate::codec::tree::RecordForest;
use crate::error::VersionError;

/// The GEDCOM versions this crate reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GedcomVersion {
    #[default]
    V5_5_1,
    V7_0,
}

impl GedcomVersion {
    /// The `HEAD.GEDC.VERS` value.
    pub fn as_str(&self) -> &'static str {
        match self {
            GedcomVersion::V5_5_1 => "5.5.1",
            GedcomVersion::V7_0 => "7.0",
        }
    }
}

impl fmt::Display for GedcomVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GedcomVersion {
    type Err = VersionError;

    /// Accepts `5.5.1`, `7`, `7.0` and any `7.0.x` patch release.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s {
            "5.5.1" => Ok(GedcomVersion::V5_5_1),
            "7" | "7.0" => Ok(GedcomVersion::V7_0),
            _ if s.strip_prefix("7.0.").is_some_and(|patch| {
                !patch.is_empty() && patch.chars().all(|c| c.is_ascii_digit())
            }) =>
            {
                Ok(GedcomVersion::V7_0)
            }
            _ => Err(VersionError::Unsupported { version: s.to_string() }),
        }
    }
}

/// Reads `HEAD.GEDC.VERS` from a forest.
pub(crate) fn declared_version(forest: &RecordForest<'_>) -> Option<GedcomVersion> {
    forest
        .root_with_tag("HEAD")?
        .child("GEDC")?
        .child_value("VERS")?
        .parse()
        .ok()
}

/// Detects the version declared in a document's header, without decoding records.
pub fn detect_version(text: &str) -> Option<GedcomVersion> {
    declared_version(&RecordForest::build(tokenize(text)))
}

/// Writes `0 HEAD` and its version-specific lines.
///
/// 7.0 gets a minimal `GEDC`/`VERS` block; 5.5.1 also names the producing
/// system (`SOUR`), the form and the character set.
pub fn write_header(w: &mut LineWriter, version: GedcomVersion, source_name: &str) {
    w.write_line(0, None, "HEAD", "");
    match version {
        GedcomVersion::V5_5_1 => {
            w.write_line(1, None, "SOUR", source_name);
            w.write_line(2, None, "VERS", crate::VERSION);
            w.write_line(1, None, "GEDC", "");
            w.write_line(2, None, "VERS", version.as_str());
            w.write_line(2, None, "FORM", "LINEAGE-LINKED");
            w.write_line(1, None, "CHAR", "UTF-8");
        }
        GedcomVersion::V7_0 => {
            w.write_line(1, None, "GEDC", "");
            w.write_line(2, None, "VERS", version.as_str());
        }
    }
}

/// Writes `0 TRLR`.
pub fn write_trailer(w: &mut LineWriter) {
    w.write_line(0, None, "TRLR", "");
}
