//! Filtering and depth options for folder aggregation.

/// Prefix stripped from recorded paths unless configured otherwise.
pub const DEFAULT_BASE_PATH: &str = "src/";

pub const DEFAULT_MAX_DEPTH: usize = 5;

/// Folder assigned to files that sit directly under the base path.
pub const ROOT_FOLDER: &str = "src";

/// Exclusions applied in source-only mode when none are given.
pub const DEFAULT_SRC_EXCLUDES: &[&str] = &["tests", "test", "vendor", "var", "public", "bin", "config"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateOptions {
    pub base_path: String,
    /// Maximum number of folder segments kept, at least 1
    pub max_depth: usize,
    pub exclude_paths: Vec<String>,
    pub src_only: bool,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            base_path: DEFAULT_BASE_PATH.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
            exclude_paths: Vec::new(),
            src_only: false,
        }
    }
}

impl AggregateOptions {
    /// Exclusion entries in effect.
    ///
    /// Blank entries are ignored, they would otherwise exclude everything.
    pub fn effective_excludes(&self) -> Vec<&str> {
        let explicit: Vec<&str> = self
            .exclude_paths
            .iter()
            .map(|entry| entry.trim())
            .filter(|entry| !entry.is_empty())
            .collect();

        if self.src_only && explicit.is_empty() {
            DEFAULT_SRC_EXCLUDES.to_vec()
        } else {
            explicit
        }
    }
}
