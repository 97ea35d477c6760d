//! Folder aggregator.
//!
//! Folds a [`CoverageMap`] into per-folder statistics. Each file goes
//! through the same steps:
//!
//! 1. source-only filter (when enabled)
//! 2. exclusion filter
//! 3. base-path stripping
//! 4. folder derivation, capped at `max_depth` segments
//! 5. executable and covered line totals; files without executable lines
//!    are dropped
//!
//! Totals are computed in parallel with rayon and merged in discovery order,
//! so the result matches a sequential fold. Folders are returned sorted by
//! coverage, highest first, ties kept in discovery order.

pub mod filters;
pub mod folder;
pub mod options;
pub mod stats;

pub use options::{AggregateOptions, DEFAULT_SRC_EXCLUDES, ROOT_FOLDER};
pub use stats::{coverage_percent, round_to, FileCoverage, FolderStats, LineTotals, OverallStats};

use crate::coverage::CoverageMap;
use rayon::prelude::*;
use std::collections::HashMap;

/// Aggregate coverage per folder.
pub fn aggregate(coverage: &CoverageMap, options: &AggregateOptions) -> Vec<FolderStats> {
    let excludes = options.effective_excludes();

    let assigned: Vec<Option<(String, &str, LineTotals)>> = coverage
        .entries()
        .par_iter()
        .map(|(path, lines)| {
            let relative = select(path, options, &excludes)?;
            let totals = LineTotals::from_lines(lines);
            if totals.is_empty() {
                return None;
            }
            Some((
                folder::folder_path(relative, Some(options.max_depth)),
                folder::base_name(path),
                totals,
            ))
        })
        .collect();

    let mut folders: Vec<FolderStats> = Vec::new();
    let mut slots: HashMap<String, usize> = HashMap::new();
    for (folder, name, totals) in assigned.into_iter().flatten() {
        let slot = *slots.entry(folder.clone()).or_insert_with(|| {
            folders.push(FolderStats::new(folder));
            folders.len() - 1
        });
        folders[slot].add_file(name, totals);
    }

    folders.sort_by(|a, b| b.coverage_percent().total_cmp(&a.coverage_percent()));

    log::debug!(
        "Aggregated {} files into {} folders",
        coverage.len(),
        folders.len()
    );
    folders
}

/// Files under `folder` (the folder itself or any subfolder), with the same
/// filters as [`aggregate`] but without the depth cap.
///
/// Sorted by coverage, highest first.
pub fn files_in_folder(
    coverage: &CoverageMap,
    target: &str,
    options: &AggregateOptions,
) -> Vec<FileCoverage> {
    let excludes = options.effective_excludes();
    let nested_prefix = format!("{}/", target);

    let mut files: Vec<FileCoverage> = coverage
        .iter()
        .filter_map(|(path, lines)| {
            let relative = select(path, options, &excludes)?;
            let folder = folder::folder_path(relative, None);
            if folder != target && !folder.starts_with(&nested_prefix) {
                return None;
            }
            let totals = LineTotals::from_lines(lines);
            if totals.is_empty() {
                return None;
            }
            Some(FileCoverage::new(folder::file_stem(path), path, totals))
        })
        .collect();

    files.sort_by(|a, b| b.coverage_percent.total_cmp(&a.coverage_percent));
    files
}

/// Apply the path filters and return the path relative to the base path.
fn select<'a>(path: &'a str, options: &AggregateOptions, excludes: &[&str]) -> Option<&'a str> {
    if options.src_only && !filters::is_src_file(path) {
        log::trace!("Skipping non-source file {}", path);
        return None;
    }
    if filters::is_excluded(path, excludes) {
        log::trace!("Skipping excluded file {}", path);
        return None;
    }
    filters::strip_base_path(path, &options.base_path)
}
