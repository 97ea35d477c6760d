//! Canonical coverage data types.
//!
//! Every input format is normalized into a [`CoverageMap`]: an ordered map
//! from the file path recorded in the artifact to a [`LineMap`] of execution
//! values. These are plain data with no I/O and no dependency on the parsers.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Execution value of a single line.
///
/// `Some(0)` is an executable line that never ran, `None` marks a line the
/// artifact lists but flags as not executable.
pub type LineCount = Option<u64>;

/// Line number (1-based) to execution value.
pub type LineMap = BTreeMap<u32, LineCount>;

/// Ordered map from file path to its line coverage.
///
/// Insertion order is discovery order in the source artifact and is the
/// iteration order for every downstream stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverageMap {
    files: Vec<(String, LineMap)>,
    index: HashMap<String, usize>,
}

impl CoverageMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the lines of `path`.
    ///
    /// Replacing keeps the original discovery position.
    pub fn insert(&mut self, path: impl Into<String>, lines: LineMap) {
        let path = path.into();
        match self.index.get(&path) {
            Some(&slot) => self.files[slot].1 = lines,
            None => {
                self.index.insert(path.clone(), self.files.len());
                self.files.push((path, lines));
            }
        }
    }

    /// Merge `lines` into `path`, summing counts of lines present in both.
    pub fn merge(&mut self, path: impl Into<String>, lines: LineMap) {
        let path = path.into();
        let Some(&slot) = self.index.get(&path) else {
            self.insert(path, lines);
            return;
        };

        let existing = &mut self.files[slot].1;
        for (line, count) in lines {
            let merged = match (existing.get(&line).copied().flatten(), count) {
                (Some(a), Some(b)) => Some(a.saturating_add(b)),
                (a, b) => a.or(b),
            };
            existing.insert(line, merged);
        }
    }

    pub fn get(&self, path: &str) -> Option<&LineMap> {
        self.index.get(path).map(|&slot| &self.files[slot].1)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Iterate files in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &LineMap)> {
        self.files.iter().map(|(path, lines)| (path.as_str(), lines))
    }

    /// Entries as a slice, for parallel iteration.
    pub fn entries(&self) -> &[(String, LineMap)] {
        &self.files
    }
}

impl FromIterator<(String, LineMap)> for CoverageMap {
    fn from_iter<I: IntoIterator<Item = (String, LineMap)>>(iter: I) -> Self {
        let mut map = CoverageMap::new();
        for (path, lines) in iter {
            map.insert(path, lines);
        }
        map
    }
}

/// Format hint derived from the artifact's file name.
///
/// The hint only steers which strategies are tried; content sniffing still
/// applies when the hint is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatHint {
    extension: Option<String>,
}

impl FormatHint {
    /// A hint carrying no information.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn from_extension(extension: &str) -> Self {
        let extension = extension.trim_start_matches('.').to_ascii_lowercase();
        Self {
            extension: (!extension.is_empty()).then_some(extension),
        }
    }

    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or_default()
    }

    pub fn extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }

    /// Whether the hinted extension equals `extension` (case-insensitive).
    pub fn is(&self, extension: &str) -> bool {
        self.extension
            .as_deref()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
    }
}
