//! Fixed widths and bounds used by the transform.

/// Zero padding of the numeric part of sequential ids (`I0001`).
pub const SEQUENTIAL_ID_WIDTH: usize = 4;

/// Default zero padding of generated xref numbers (0 = none, `@I1@`).
pub const DEFAULT_XREF_WIDTH: usize = 0;

/// Smallest `wrap_width` honored; narrower settings are clamped up to it.
pub const MIN_WRAP_WIDTH: usize = 16;

/// `HEAD.SOUR` value written when the caller does not name a product.
pub const DEFAULT_SOURCE_NAME: &str = "GEDCOM_RS";
