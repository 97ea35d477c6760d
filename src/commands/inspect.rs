//! `covdiagram inspect`
//!
//! Shows the content markers of a coverage file and, if it parses, how many
//! source files it holds.

use crate::coverage::{normalize, CoverageMap, FormatHint};
use crate::formatting::{formatter_for, ColorMode, OutputFormatter};
use crate::io::{inspect_bytes, inspection_table, read_coverage_file, FileInspection};
use anyhow::Result;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct InspectionReport {
    pub inspection: FileInspection,
    /// Source files found when parsing succeeded
    pub parsed_files: Option<usize>,
    pub sample_file: Option<String>,
    pub parse_error: Option<String>,
}

/// Inspect markers, then attempt a full parse (pure with respect to output).
pub fn build_report(path: &Path, bytes: &[u8]) -> InspectionReport {
    let inspection = inspect_bytes(path, bytes);
    let parsed = normalize(bytes, &FormatHint::from_path(path));
    summarize(inspection, parsed.map_err(|e| e.to_string()))
}

fn summarize(
    inspection: FileInspection,
    parsed: std::result::Result<CoverageMap, String>,
) -> InspectionReport {
    match parsed {
        Ok(coverage) => InspectionReport {
            inspection,
            parsed_files: Some(coverage.len()),
            sample_file: coverage.iter().next().map(|(path, _)| path.to_string()),
            parse_error: None,
        },
        Err(e) => InspectionReport {
            inspection,
            parsed_files: None,
            sample_file: None,
            parse_error: Some(e),
        },
    }
}

/// Parse outcome as printed below the table.
fn outcome_lines(report: &InspectionReport, formatter: &dyn OutputFormatter) -> Vec<String> {
    match (&report.parsed_files, &report.parse_error) {
        (Some(count), _) => {
            let mut lines =
                vec![formatter.success(&format!("Successfully parsed {} source files", count))];
            if let Some(sample) = &report.sample_file {
                lines.push(format!("Sample file: {}", sample));
            }
            lines
        }
        (None, Some(e)) => vec![formatter.error(&format!("Parsing failed: {}", e))],
        (None, None) => Vec::new(),
    }
}

fn print_report(report: &InspectionReport, formatter: &dyn OutputFormatter) {
    println!("File inspection:");
    println!("{}", inspection_table(&report.inspection));
    println!();

    for line in outcome_lines(report, formatter) {
        println!("{}", line);
    }
}

pub fn inspect_coverage_file(path: &Path) -> Result<()> {
    let input = read_coverage_file(path)?;
    let formatter = formatter_for(ColorMode::Auto.with_env_overrides());
    print_report(&build_report(&input.path, &input.bytes), formatter.as_ref());
    Ok(())
}
