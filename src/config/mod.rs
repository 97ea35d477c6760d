//! `.covdiagram.toml` project configuration.
//!
//! Every field is optional. Values found in the file act as defaults for the
//! `generate` command; flags given on the command line take precedence.

mod loader;

pub use loader::{
    find_config_from, load_config, load_config_from_path, parse_and_validate_config,
    CONFIG_FILE_NAME,
};

use crate::cli::{ChartType, OutputFormat};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CovdiagramConfig {
    pub aggregation: AggregationConfig,
    pub output: OutputConfig,
}

/// `[aggregation]` table
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    pub base_path: Option<String>,
    pub max_depth: Option<usize>,
    pub min_coverage: Option<f64>,
    pub exclude_paths: Option<Vec<String>>,
    pub src_only: Option<bool>,
}

/// `[output]` table
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: Option<PathBuf>,
    pub chart_type: Option<ChartType>,
    pub format: Option<OutputFormat>,
    pub separate_files: Option<bool>,
    pub summary: Option<bool>,
}

impl AggregationConfig {
    /// Problems that make a field unusable, one message per field.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.max_depth == Some(0) {
            problems.push("max_depth must be at least 1".to_string());
        }
        if let Some(min) = self.min_coverage {
            if !min.is_finite() || !(0.0..=100.0).contains(&min) {
                problems.push(format!("min_coverage must be between 0 and 100, got {}", min));
            }
        }
        problems
    }
}

/// Template written by `covdiagram init`.
pub const DEFAULT_CONFIG: &str = r#"# covdiagram configuration

[aggregation]
base_path = "src/"
max_depth = 5
min_coverage = 0.0
src_only = false
exclude_paths = []

[output]
path = "coverage-diagram.mmd"
chart_type = "bar"
format = "mermaid"
separate_files = false
summary = true
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template_parses() {
        let config = parse_and_validate_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.aggregation.base_path.as_deref(), Some("src/"));
        assert_eq!(config.aggregation.max_depth, Some(5));
        assert_eq!(config.output.chart_type, Some(ChartType::Bar));
        assert_eq!(config.output.format, Some(OutputFormat::Mermaid));
        assert_eq!(config.output.summary, Some(true));
    }

    #[test]
    fn test_empty_file_is_all_defaults() {
        assert_eq!(
            parse_and_validate_config("").unwrap(),
            CovdiagramConfig::default()
        );
    }

    #[test]
    fn test_problems() {
        let config = AggregationConfig {
            max_depth: Some(0),
            min_coverage: Some(120.0),
            ..Default::default()
        };
        assert_eq!(config.problems().len(), 2);
        assert!(AggregationConfig::default().problems().is_empty());
    }
}
