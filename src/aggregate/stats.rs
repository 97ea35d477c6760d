//! Line totals and per-folder statistics.

use crate::coverage::LineMap;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// Executable and covered line counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LineTotals {
    pub total: u64,
    pub covered: u64,
}

impl LineTotals {
    /// Count executable lines. Lines marked not executable are ignored.
    pub fn from_lines(lines: &LineMap) -> Self {
        lines
            .values()
            .flatten()
            .fold(Self::default(), |acc, count| Self {
                total: acc.total + 1,
                covered: acc.covered + u64::from(*count > 0),
            })
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn coverage_percent(&self) -> f64 {
        coverage_percent(self.covered, self.total)
    }
}

/// `covered / total` as a percentage with two decimals, 0 when empty.
pub fn coverage_percent(covered: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        round_to(covered as f64 / total as f64 * 100.0, 2)
    }
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Aggregated coverage of one folder.
#[derive(Debug, Clone, PartialEq)]
pub struct FolderStats {
    /// Normalized, depth-capped folder path
    pub folder: String,
    pub total_lines: u64,
    pub covered_lines: u64,
    pub file_count: usize,
    /// Base names of the member files in discovery order
    pub sample_file_names: Vec<String>,
}

impl FolderStats {
    pub fn new(folder: impl Into<String>) -> Self {
        Self {
            folder: folder.into(),
            total_lines: 0,
            covered_lines: 0,
            file_count: 0,
            sample_file_names: Vec::new(),
        }
    }

    pub fn add_file(&mut self, name: impl Into<String>, totals: LineTotals) {
        self.total_lines += totals.total;
        self.covered_lines += totals.covered;
        self.file_count += 1;
        self.sample_file_names.push(name.into());
    }

    pub fn coverage_percent(&self) -> f64 {
        coverage_percent(self.covered_lines, self.total_lines)
    }
}

impl Serialize for FolderStats {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("FolderStats", 6)?;
        state.serialize_field("folder", &self.folder)?;
        state.serialize_field("coverage_percent", &self.coverage_percent())?;
        state.serialize_field("total_lines", &self.total_lines)?;
        state.serialize_field("covered_lines", &self.covered_lines)?;
        state.serialize_field("file_count", &self.file_count)?;
        state.serialize_field("sample_file_names", &self.sample_file_names)?;
        state.end()
    }
}

/// Coverage of a single file within a folder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileCoverage {
    /// Base name without the `.php` suffix
    pub name: String,
    /// Path as recorded in the artifact
    pub path: String,
    pub total_lines: u64,
    pub covered_lines: u64,
    pub coverage_percent: f64,
}

impl FileCoverage {
    pub fn new(name: impl Into<String>, path: impl Into<String>, totals: LineTotals) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            total_lines: totals.total,
            covered_lines: totals.covered,
            coverage_percent: totals.coverage_percent(),
        }
    }
}

/// Totals across a folder list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct OverallStats {
    pub total_lines: u64,
    pub covered_lines: u64,
    pub file_count: usize,
    pub coverage_percent: f64,
}

impl OverallStats {
    pub fn from_folders(folders: &[FolderStats]) -> Self {
        let (total_lines, covered_lines, file_count) =
            folders.iter().fold((0, 0, 0), |(total, covered, files), folder| {
                (
                    total + folder.total_lines,
                    covered + folder.covered_lines,
                    files + folder.file_count,
                )
            });
        Self {
            total_lines,
            covered_lines,
            file_count,
            coverage_percent: coverage_percent(covered_lines, total_lines),
        }
    }
}
