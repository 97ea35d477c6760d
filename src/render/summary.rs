//! Human-readable folder summary.

use crate::aggregate::{FolderStats, OverallStats};
use crate::formatting::OutputFormatter;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};

/// Number of file names listed per folder before eliding the rest.
const SAMPLE_FILES: usize = 3;

pub fn summary_table(folders: &[FolderStats]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "Directory",
            "Coverage",
            "Lines (Covered/Total)",
            "Files",
            "Sample Files",
        ]);

    for folder in folders {
        table.add_row(vec![
            Cell::new(&folder.folder),
            Cell::new(format!("{}%", folder.coverage_percent())).set_alignment(CellAlignment::Right),
            Cell::new(format!("{}/{}", folder.covered_lines, folder.total_lines))
                .set_alignment(CellAlignment::Right),
            Cell::new(folder.file_count).set_alignment(CellAlignment::Right),
            Cell::new(sample_files(&folder.sample_file_names)),
        ]);
    }

    table
}

/// First few names, then `+N more`.
pub fn sample_files(names: &[String]) -> String {
    let mut sample = names
        .iter()
        .take(SAMPLE_FILES)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    if names.len() > SAMPLE_FILES {
        sample.push_str(&format!(", +{} more", names.len() - SAMPLE_FILES));
    }
    sample
}

pub fn overall_line(overall: &OverallStats) -> String {
    format!(
        "Overall: {}% coverage ({}/{} lines in {} files)",
        overall.coverage_percent, overall.covered_lines, overall.total_lines, overall.file_count
    )
}

/// Full summary block as printed after generation.
pub fn render_summary(folders: &[FolderStats], formatter: &dyn OutputFormatter) -> String {
    if folders.is_empty() {
        return formatter.warning("No folders matched the given filters.");
    }
    format!(
        "{}\n{}\n{}",
        formatter.header("Source Directory Coverage Summary"),
        summary_table(folders),
        formatter.info(&overall_line(&OverallStats::from_folders(folders)))
    )
}
