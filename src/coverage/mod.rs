//! Format normalizer.
//!
//! Turns a raw coverage artifact into a [`CoverageMap`], whatever produced
//! it. Supported inputs, tried in this order:
//!
//! 1. Clover XML (`<coverage><project><file name="…"><line …/>`)
//! 2. JSON, flat (`{"path": {"line": count}}`) or wrapped in a `files` key
//! 3. PHP scripts returning an array literal or a coverage object (only
//!    when the file name says `.php` or `.cov`)
//! 4. LCOV tracefiles
//! 5. PHP `serialize()` output, including snapshots where only the
//!    `"coverage"` field survives intact
//!
//! The first strategy that produces at least one file wins. Nothing here
//! touches the filesystem; callers pass the bytes and a [`FormatHint`].
//!
//! # Example
//!
//! ```
//! use covdiagram::coverage::{normalize, FormatHint};
//!
//! let raw = br#"{"src/A.php": {"10": 1, "11": 0}}"#;
//! let map = normalize(raw, &FormatHint::from_extension("json")).unwrap();
//! assert_eq!(map.len(), 1);
//! ```

mod clover;
pub mod detect;
mod json;
mod lcov;
mod php;
pub mod types;

pub use detect::{detect_format, normalize, ParseError, STRATEGIES};
pub use types::{CoverageMap, FormatHint, LineCount, LineMap};
