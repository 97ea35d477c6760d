//! Pipeline orchestrator.
//!
//! Validates options, then runs normalize, aggregate, the minimum-coverage
//! filter and synthesis in sequence. The whole run is in memory and
//! deterministic: identical bytes and options give an identical report.

use crate::aggregate::{self, AggregateOptions, FolderStats, OverallStats};
use crate::coverage::{self, CoverageMap, FormatHint};
use crate::diagram::{self, ChartVariant, DiagramOutput};
use crate::errors::{Error, Result};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOptions {
    pub base_path: String,
    pub max_depth: usize,
    /// Folders below this percentage are dropped before synthesis
    pub min_coverage_percent: f64,
    pub exclude_paths: Vec<String>,
    pub src_only: bool,
    pub chart_variant: ChartVariant,
    /// Produce one range-bucket pie per folder
    pub per_folder_output: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        let aggregate = AggregateOptions::default();
        Self {
            base_path: aggregate.base_path,
            max_depth: aggregate.max_depth,
            min_coverage_percent: 0.0,
            exclude_paths: aggregate.exclude_paths,
            src_only: aggregate.src_only,
            chart_variant: ChartVariant::default(),
            per_folder_output: false,
        }
    }
}

impl PipelineOptions {
    pub fn validate(&self) -> Result<()> {
        if self.max_depth < 1 {
            return Err(Error::invalid_options(format!(
                "max depth must be at least 1, got {}",
                self.max_depth
            )));
        }
        if !self.min_coverage_percent.is_finite()
            || !(0.0..=100.0).contains(&self.min_coverage_percent)
        {
            return Err(Error::invalid_options(format!(
                "minimum coverage must be between 0 and 100, got {}",
                self.min_coverage_percent
            )));
        }
        Ok(())
    }

    pub fn aggregate_options(&self) -> AggregateOptions {
        AggregateOptions {
            base_path: self.base_path.clone(),
            max_depth: self.max_depth,
            exclude_paths: self.exclude_paths.clone(),
            src_only: self.src_only,
        }
    }

    /// Per-folder output always means range-bucket pies.
    pub fn effective_variant(&self) -> ChartVariant {
        if self.per_folder_output {
            ChartVariant::RangeBucket
        } else {
            self.chart_variant
        }
    }
}

/// Everything a caller needs to render or print the result of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineReport {
    /// Files found in the artifact, before any filtering
    pub files_parsed: usize,
    /// Folders that passed the minimum-coverage filter, sorted
    pub folders: Vec<FolderStats>,
    pub overall: OverallStats,
    pub diagram: DiagramOutput,
}

impl PipelineReport {
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }
}

/// Run the whole pipeline on raw artifact bytes.
///
/// # Errors
///
/// [`Error::InvalidOptions`] for out-of-range options and
/// [`Error::UnsupportedFormat`] when the bytes are not a known format.
/// An empty result is not an error.
pub fn run(raw: &[u8], hint: &FormatHint, options: &PipelineOptions) -> Result<PipelineReport> {
    options.validate()?;
    let coverage = coverage::normalize(raw, hint)?;
    Ok(run_on_coverage(&coverage, options))
}

/// Aggregate, filter and synthesize an already normalized map.
pub fn run_on_coverage(coverage: &CoverageMap, options: &PipelineOptions) -> PipelineReport {
    let aggregate_options = options.aggregate_options();
    let folders = apply_min_coverage(
        aggregate::aggregate(coverage, &aggregate_options),
        options.min_coverage_percent,
    );
    let diagram = diagram::synthesize(
        &folders,
        options.effective_variant(),
        coverage,
        &aggregate_options,
    );

    log::info!(
        "{} files parsed, {} folders after filtering",
        coverage.len(),
        folders.len()
    );

    PipelineReport {
        files_parsed: coverage.len(),
        overall: OverallStats::from_folders(&folders),
        folders,
        diagram,
    }
}

/// Drop folders strictly below `min_percent`.
pub fn apply_min_coverage(folders: Vec<FolderStats>, min_percent: f64) -> Vec<FolderStats> {
    folders
        .into_iter()
        .filter(|folder| folder.coverage_percent() >= min_percent)
        .collect()
}
