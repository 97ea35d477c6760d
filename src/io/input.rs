//! Reading coverage artifacts from disk.

use crate::coverage::FormatHint;
use crate::errors::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Raw artifact bytes with the hint taken from the file name.
#[derive(Debug, Clone)]
pub struct CoverageInput {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
    pub hint: FormatHint,
}

/// Read a coverage artifact.
///
/// # Errors
///
/// [`Error::FileNotFound`] when `path` is not an existing file, [`Error::Io`]
/// when it cannot be read.
pub fn read_coverage_file(path: &Path) -> Result<CoverageInput> {
    if !path.is_file() {
        return Err(Error::file_not_found(path));
    }

    let bytes = fs::read(path)?;
    log::debug!("Read {} bytes from {}", bytes.len(), path.display());

    Ok(CoverageInput {
        path: path.to_path_buf(),
        bytes,
        hint: FormatHint::from_path(path),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_missing_file() {
        let err = read_coverage_file(Path::new("nonexistent.cov")).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    #[test]
    fn test_directory_is_not_a_coverage_file() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            read_coverage_file(dir.path()),
            Err(Error::FileNotFound { .. })
        ));
    }

    #[test]
    fn test_reads_bytes_and_hint() {
        let mut file = NamedTempFile::with_suffix(".JSON").unwrap();
        file.write_all(b"{}").unwrap();

        let input = read_coverage_file(file.path()).unwrap();
        assert_eq!(input.bytes, b"{}");
        assert!(input.hint.is("json"));
    }
}
