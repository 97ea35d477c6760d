use crate::diagram::ChartVariant;
use crate::formatting::ColorMode;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Deserialize;
use std::path::PathBuf;

/// Default diagram path for `generate`.
pub const DEFAULT_OUTPUT: &str = "coverage-diagram.mmd";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartType {
    /// Pie of folder sizes labelled with coverage
    Pie,
    /// Folder hierarchy colored by coverage level
    Tree,
    /// Coverage percentage per folder (default)
    Bar,
    /// One pie of file coverage ranges per folder
    FolderPies,
}

impl From<ChartType> for ChartVariant {
    fn from(chart: ChartType) -> Self {
        match chart {
            ChartType::Pie => ChartVariant::Proportional,
            ChartType::Tree => ChartVariant::Tree,
            ChartType::Bar => ChartVariant::Bars,
            ChartType::FolderPies => ChartVariant::RangeBucket,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Mermaid markup
    Mermaid,
    /// Structured pipeline report
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "covdiagram")]
#[command(about = "Folder-level coverage diagrams from test coverage artifacts", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a coverage diagram
    Generate {
        /// Coverage artifact (Clover XML, JSON, PHP, LCOV or serialized .cov)
        coverage_file: PathBuf,

        /// Output file [default: coverage-diagram.mmd]
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Maximum folder depth below the base path [default: 5]
        #[arg(long)]
        max_depth: Option<usize>,

        /// Hide folders below this coverage percentage [default: 0]
        #[arg(long)]
        min_coverage: Option<f64>,

        /// Path prefix stripped before grouping [default: src/]
        #[arg(long)]
        base_path: Option<String>,

        /// Only consider files under the source root, skipping tests and vendor code
        #[arg(long)]
        src_only: bool,

        /// Path fragments to skip
        #[arg(long, value_delimiter = ',')]
        exclude_paths: Option<Vec<String>>,

        /// Diagram type [default: bar]
        #[arg(long, value_enum)]
        chart_type: Option<ChartType>,

        /// Write one file per folder instead of a combined document
        #[arg(long)]
        separate_files: bool,

        /// Output format [default: mermaid]
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Do not print the folder summary
        #[arg(long)]
        no_summary: bool,

        /// Configuration file (defaults to the nearest .covdiagram.toml)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Color output
        #[arg(long, value_enum, default_value = "auto")]
        color: ColorMode,

        /// Increase verbosity level (can be repeated: -v, -vv, -vvv)
        #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
        verbosity: u8,
    },

    /// Show what covdiagram sees in a coverage file
    Inspect {
        /// Coverage artifact to inspect
        file: PathBuf,

        /// Increase verbosity level (can be repeated: -v, -vv, -vvv)
        #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
        verbosity: u8,
    },

    /// Initialize configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

impl Commands {
    pub fn verbosity(&self) -> u8 {
        match self {
            Self::Generate { verbosity, .. } | Self::Inspect { verbosity, .. } => *verbosity,
            Self::Init { .. } => 0,
        }
    }
}
