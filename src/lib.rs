// Export modules for library usage
pub mod aggregate;
pub mod cli;
pub mod commands;
pub mod config;
pub mod coverage;
pub mod diagram;
pub mod errors;
pub mod formatting;
pub mod io;
pub mod pipeline;
pub mod render;

// Re-export commonly used types
pub use crate::aggregate::{
    aggregate, files_in_folder, AggregateOptions, FileCoverage, FolderStats, LineTotals,
    OverallStats,
};

pub use crate::coverage::{normalize, CoverageMap, FormatHint, LineCount, LineMap};

pub use crate::diagram::{synthesize, ChartVariant, DiagramDescription, DiagramOutput};

pub use crate::errors::{Error, Result};

pub use crate::pipeline::{run, run_on_coverage, PipelineOptions, PipelineReport};
