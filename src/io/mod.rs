pub mod input;
pub mod inspect;

pub use input::{read_coverage_file, CoverageInput};
pub use inspect::{inspect, inspect_bytes, inspection_table, FileInspection};

use anyhow::Result;
use std::fs;
use std::path::Path;

/// Write `content`, creating missing parent directories first.
pub fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}
