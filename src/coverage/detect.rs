//! Format detection: an ordered chain of parsing strategies.
//!
//! Each strategy decides for itself whether it applies to the content (by
//! hint or by sniffing) and either yields a [`CoverageMap`] or a
//! [`ParseError`]. Failures are local: the chain logs them and moves on, and
//! only exhaustion of the whole chain is reported to the caller.

use super::types::{CoverageMap, FormatHint};
use super::{clover, json, lcov, php};
use crate::errors::{Error, Result};
use thiserror::Error;

/// Failure of a single strategy. Never leaves the normalizer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The strategy does not recognise the content
    #[error("not applicable")]
    NotApplicable,

    /// The content looked right but could not be parsed
    #[error("malformed input: {0}")]
    Malformed(String),
}

impl ParseError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }
}

/// Common signature of every parsing strategy.
pub type Strategy = fn(&str, &FormatHint) -> std::result::Result<CoverageMap, ParseError>;

/// Strategies in detection order. The first non-empty result wins.
pub const STRATEGIES: &[(&str, Strategy)] = &[
    ("clover-xml", clover::parse),
    ("json", json::parse),
    ("php-script", php::parse_script),
    ("lcov", lcov::parse),
    ("php-serialized", php::parse_serialized),
];

/// Normalize raw artifact bytes into a [`CoverageMap`].
///
/// # Errors
///
/// Returns [`Error::UnsupportedFormat`] when no strategy yields a non-empty
/// coverage map.
pub fn normalize(raw: &[u8], hint: &FormatHint) -> Result<CoverageMap> {
    let content = String::from_utf8_lossy(raw);

    for (name, strategy) in STRATEGIES {
        match strategy(&content, hint) {
            Ok(map) if !map.is_empty() => {
                log::debug!("Parsed coverage as {} ({} files)", name, map.len());
                return Ok(map);
            }
            Ok(_) => log::debug!("Strategy {} produced no coverage entries", name),
            Err(ParseError::NotApplicable) => log::trace!("Strategy {} not applicable", name),
            Err(e) => log::debug!("Strategy {} failed: {}", name, e),
        }
    }

    Err(Error::unsupported_format())
}

/// Name of the first strategy that accepts the content, if any.
pub fn detect_format(raw: &[u8], hint: &FormatHint) -> Option<&'static str> {
    let content = String::from_utf8_lossy(raw);
    STRATEGIES
        .iter()
        .find(|(_, strategy)| strategy(&content, hint).is_ok_and(|map| !map.is_empty()))
        .map(|(name, _)| *name)
}
