//! `covdiagram generate`
//!
//! Settings resolution and output planning are pure; reading the artifact,
//! writing files and printing happen in [`handle_generate`] only.

use crate::cli::{ChartType, OutputFormat, DEFAULT_OUTPUT};
use crate::config::{self, CovdiagramConfig};
use crate::diagram::{DiagramDescription, DiagramOutput};
use crate::formatting::{formatter_for, ColorMode};
use crate::io::{self, read_coverage_file};
use crate::pipeline::{self, PipelineOptions, PipelineReport};
use crate::render::{self, mermaid, render_summary};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Flags as given on the command line; `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct GenerateArgs {
    pub coverage_file: PathBuf,
    pub output: Option<PathBuf>,
    pub max_depth: Option<usize>,
    pub min_coverage: Option<f64>,
    pub base_path: Option<String>,
    pub src_only: bool,
    pub exclude_paths: Option<Vec<String>>,
    pub chart_type: Option<ChartType>,
    pub separate_files: bool,
    pub format: Option<OutputFormat>,
    pub no_summary: bool,
    pub config: Option<PathBuf>,
    pub color: ColorMode,
}

/// Flags merged over the config file merged over built-in defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateSettings {
    pub pipeline: PipelineOptions,
    pub output: PathBuf,
    pub format: OutputFormat,
    pub separate_files: bool,
    pub show_summary: bool,
}

// ============================================================================
// Pure Core
// ============================================================================

pub fn resolve_settings(args: &GenerateArgs, config: &CovdiagramConfig) -> GenerateSettings {
    let defaults = PipelineOptions::default();
    let aggregation = &config.aggregation;
    let output_config = &config.output;

    let format = args
        .format
        .or(output_config.format)
        .unwrap_or(OutputFormat::Mermaid);
    let chart_type = args.chart_type.or(output_config.chart_type);
    let separate_files = args.separate_files || output_config.separate_files.unwrap_or(false);

    let output = args
        .output
        .clone()
        .or_else(|| output_config.path.clone())
        .unwrap_or_else(|| default_output(format));

    let pipeline = PipelineOptions {
        base_path: args
            .base_path
            .clone()
            .or_else(|| aggregation.base_path.clone())
            .unwrap_or(defaults.base_path),
        max_depth: args
            .max_depth
            .or(aggregation.max_depth)
            .unwrap_or(defaults.max_depth),
        min_coverage_percent: args
            .min_coverage
            .or(aggregation.min_coverage)
            .unwrap_or(defaults.min_coverage_percent),
        exclude_paths: args
            .exclude_paths
            .clone()
            .or_else(|| aggregation.exclude_paths.clone())
            .unwrap_or(defaults.exclude_paths),
        src_only: args.src_only || aggregation.src_only.unwrap_or(defaults.src_only),
        chart_variant: chart_type.map(Into::into).unwrap_or(defaults.chart_variant),
        per_folder_output: separate_files || chart_type == Some(ChartType::FolderPies),
    };

    GenerateSettings {
        pipeline,
        output,
        format,
        separate_files,
        show_summary: !args.no_summary && output_config.summary.unwrap_or(true),
    }
}

fn default_output(format: OutputFormat) -> PathBuf {
    match format {
        OutputFormat::Mermaid => PathBuf::from(DEFAULT_OUTPUT),
        OutputFormat::Json => Path::new(DEFAULT_OUTPUT).with_extension("json"),
    }
}

/// Files to write, in order, as `(path, contents)`.
pub fn plan_outputs(
    report: &PipelineReport,
    settings: &GenerateSettings,
) -> Result<Vec<(PathBuf, String)>> {
    if settings.format == OutputFormat::Json {
        let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
        return Ok(vec![(settings.output.clone(), json)]);
    }

    let outputs = match &report.diagram {
        DiagramOutput::Single(diagram) => {
            vec![(settings.output.clone(), render::render(diagram))]
        }
        DiagramOutput::PerFolder(diagrams) if settings.separate_files => diagrams
            .iter()
            .map(|diagram| {
                (
                    mermaid::per_folder_path(&settings.output, diagram_folder(diagram)),
                    render::render(diagram),
                )
            })
            .collect(),
        DiagramOutput::PerFolder(diagrams) => {
            vec![(settings.output.clone(), render::render_combined(diagrams))]
        }
    };
    Ok(outputs)
}

fn diagram_folder(diagram: &DiagramDescription) -> &str {
    match diagram {
        DiagramDescription::RangeBucketSlices { folder, .. } => folder.as_str(),
        _ => "diagram",
    }
}

// ============================================================================
// Imperative Shell
// ============================================================================

pub fn handle_generate(args: GenerateArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => config::load_config_from_path(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => config::load_config(),
    };
    let settings = resolve_settings(&args, &config);
    log::debug!("Resolved settings: {:?}", settings);

    let input = read_coverage_file(&args.coverage_file)?;
    let report = pipeline::run(&input.bytes, &input.hint, &settings.pipeline)
        .with_context(|| format!("Failed to process {}", input.path.display()))?;

    let formatter = formatter_for(args.color.with_env_overrides());

    if report.is_empty() {
        eprintln!(
            "{}",
            formatter.warning("No coverage data left after filtering; writing an empty diagram.")
        );
    }

    let outputs = plan_outputs(&report, &settings)?;
    if outputs.is_empty() {
        eprintln!("{}", formatter.warning("No per-folder diagrams to write."));
    }
    for (path, contents) in &outputs {
        io::write_file(path, contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!(
            "{}",
            formatter.success(&format!("Diagram written to {}", path.display()))
        );
    }

    if settings.show_summary && settings.format == OutputFormat::Mermaid {
        println!();
        println!("{}", render_summary(&report.folders, formatter.as_ref()));
    }

    log::info!(
        "Parsed {} files into {} folders",
        report.files_parsed,
        report.folders.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AggregationConfig, OutputConfig};
    use crate::coverage::{normalize, FormatHint};
    use crate::diagram::ChartVariant;

    fn args() -> GenerateArgs {
        GenerateArgs {
            coverage_file: PathBuf::from("coverage.json"),
            ..Default::default()
        }
    }

    fn report(options: &PipelineOptions) -> PipelineReport {
        let raw = br#"{"src/Domain/A.php": {"1": 1, "2": 0}, "src/Infra/B.php": {"1": 1}}"#;
        let coverage = normalize(raw, &FormatHint::from_extension("json")).unwrap();
        pipeline::run_on_coverage(&coverage, options)
    }

    #[test]
    fn test_defaults_without_config() {
        let settings = resolve_settings(&args(), &CovdiagramConfig::default());
        assert_eq!(settings.pipeline, PipelineOptions::default());
        assert_eq!(settings.output, PathBuf::from("coverage-diagram.mmd"));
        assert_eq!(settings.format, OutputFormat::Mermaid);
        assert!(settings.show_summary);
    }

    #[test]
    fn test_flags_override_config() {
        let config = CovdiagramConfig {
            aggregation: AggregationConfig {
                max_depth: Some(2),
                min_coverage: Some(30.0),
                src_only: Some(true),
                ..Default::default()
            },
            output: OutputConfig {
                chart_type: Some(ChartType::Tree),
                summary: Some(false),
                ..Default::default()
            },
        };
        let mut args = args();
        args.max_depth = Some(4);

        let settings = resolve_settings(&args, &config);
        assert_eq!(settings.pipeline.max_depth, 4);
        assert_eq!(settings.pipeline.min_coverage_percent, 30.0);
        assert!(settings.pipeline.src_only);
        assert_eq!(settings.pipeline.chart_variant, ChartVariant::Tree);
        assert!(!settings.show_summary);
    }

    #[test]
    fn test_json_default_output() {
        let mut args = args();
        args.format = Some(OutputFormat::Json);
        let settings = resolve_settings(&args, &CovdiagramConfig::default());
        assert_eq!(settings.output, PathBuf::from("coverage-diagram.json"));
    }

    #[test]
    fn test_folder_pies_combined() {
        let mut args = args();
        args.chart_type = Some(ChartType::FolderPies);
        let settings = resolve_settings(&args, &CovdiagramConfig::default());
        assert!(settings.pipeline.per_folder_output);

        let outputs = plan_outputs(&report(&settings.pipeline), &settings).unwrap();
        assert_eq!(outputs.len(), 1);
        assert!(outputs[0].1.starts_with("# Code Coverage by Folder"));
        assert!(outputs[0].1.contains("## Domain"));
        assert!(outputs[0].1.contains("## Infra"));
    }

    #[test]
    fn test_separate_files_one_per_folder() {
        let mut args = args();
        args.separate_files = true;
        args.output = Some(PathBuf::from("out/cov.mmd"));
        let settings = resolve_settings(&args, &CovdiagramConfig::default());

        let outputs = plan_outputs(&report(&settings.pipeline), &settings).unwrap();
        let paths: Vec<_> = outputs.iter().map(|(p, _)| p.clone()).collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("out/cov_Infra.mmd"),
                PathBuf::from("out/cov_Domain.mmd")
            ]
        );
    }

    #[test]
    fn test_json_output_is_report() {
        let mut args = args();
        args.format = Some(OutputFormat::Json);
        let settings = resolve_settings(&args, &CovdiagramConfig::default());

        let outputs = plan_outputs(&report(&settings.pipeline), &settings).unwrap();
        let value: serde_json::Value = serde_json::from_str(&outputs[0].1).unwrap();
        assert_eq!(value["files_parsed"], 2);
        assert_eq!(value["diagram"]["single"]["kind"], "bars");
    }
}
