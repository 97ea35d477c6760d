//! Error types for coverage diagram generation.
//!
//! Only three conditions are fatal for the pipeline itself: a missing
//! coverage file, an artifact no parsing strategy accepts, and invalid
//! options. I/O and config failures belong to the adapters around the core.
//!
//! # Example
//!
//! ```rust
//! use covdiagram::errors::Error;
//!
//! let err = Error::invalid_options("max depth must be at least 1");
//! assert!(err.to_string().contains("max depth"));
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Formats accepted by the normalizer, in the order they are attempted.
pub const SUPPORTED_FORMATS: &str = "Clover XML (.xml), JSON (.json), PHP arrays (.php), \
     LCOV (.info) and serialized PHPUnit data (.cov)";

/// Main error type for covdiagram operations
#[derive(Debug, Error)]
pub enum Error {
    /// The coverage artifact does not exist
    #[error("Coverage file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// No normalizer strategy accepted the input
    #[error("Unable to parse coverage file format. Supported formats: {supported}")]
    UnsupportedFormat { supported: &'static str },

    /// Options rejected before the pipeline starts
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// Configuration file errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a missing-file error
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create the catch-all format error listing every supported format
    pub fn unsupported_format() -> Self {
        Self::UnsupportedFormat {
            supported: SUPPORTED_FORMATS,
        }
    }

    /// Create an invalid options error
    pub fn invalid_options(message: impl Into<String>) -> Self {
        Self::InvalidOptions(message.into())
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

/// Result type alias for covdiagram operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_format_lists_formats() {
        let err = Error::unsupported_format();
        let message = err.to_string();
        assert!(message.starts_with("Unable to parse coverage file format."));
        assert!(message.contains("Clover XML (.xml)"));
        assert!(message.contains("JSON (.json)"));
        assert!(message.contains("PHP arrays (.php)"));
        assert!(message.contains("serialized PHPUnit data (.cov)"));
    }

    #[test]
    fn test_file_not_found_message() {
        let err = Error::file_not_found("nonexistent.cov");
        assert_eq!(err.to_string(), "Coverage file not found: nonexistent.cov");
    }

    #[test]
    fn test_invalid_options_message() {
        let err = Error::invalid_options("max depth must be at least 1");
        assert_eq!(
            err.to_string(),
            "Invalid options: max depth must be at least 1"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
