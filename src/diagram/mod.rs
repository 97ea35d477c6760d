//! Diagram synthesizer.
//!
//! Turns the ordered folder list into a [`DiagramDescription`]. Synthesis
//! is total: empty input gives a description with no slices, bars or
//! nodes, never an error.
//!
//! Range-bucket pies are per folder and need the file-level view, which is
//! pulled from the coverage map with the same filters used for aggregation.

pub mod bars;
pub mod buckets;
pub mod proportional;
pub mod shares;
pub mod tree;
pub mod types;

pub use bars::bars;
pub use buckets::{range_buckets, CoverageRange, COVERAGE_RANGES};
pub use proportional::{proportional, MAX_SLICES, OTHERS_LABEL};
pub use shares::shares;
pub use tree::tree;
pub use types::{
    AxisRange, Bar, ChartVariant, CoverageClass, DiagramDescription, DiagramOutput,
    ProportionalSlice, RangeSlice, TreeEdge, TreeNode,
};

use crate::aggregate::{files_in_folder, AggregateOptions, FolderStats};
use crate::coverage::CoverageMap;

/// Build the requested chart from the folder list.
///
/// [`ChartVariant::RangeBucket`] yields one description per folder that
/// still has files; every other variant yields a single description.
pub fn synthesize(
    folders: &[FolderStats],
    variant: ChartVariant,
    coverage: &CoverageMap,
    options: &AggregateOptions,
) -> DiagramOutput {
    log::debug!("Synthesizing {} chart for {} folders", variant, folders.len());

    match variant {
        ChartVariant::Proportional => DiagramOutput::Single(proportional(folders)),
        ChartVariant::Bars => DiagramOutput::Single(bars(folders)),
        ChartVariant::Tree => DiagramOutput::Single(tree(folders)),
        ChartVariant::RangeBucket => DiagramOutput::PerFolder(
            folders
                .iter()
                .filter_map(|folder| {
                    let files = files_in_folder(coverage, &folder.folder, options);
                    if files.is_empty() {
                        log::debug!("No files left for folder {}", folder.folder);
                        return None;
                    }
                    Some(range_buckets(&folder.folder, &files))
                })
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::coverage::LineMap;

    fn sample() -> CoverageMap {
        let line = |count: u64| -> LineMap { [(1, Some(count))].into_iter().collect() };
        [
            ("src/Domain/User.php".to_string(), line(1)),
            ("src/Domain/Order.php".to_string(), line(0)),
            ("src/Infra/Repo.php".to_string(), line(1)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_single_variants() {
        let coverage = sample();
        let options = AggregateOptions::default();
        let folders = aggregate(&coverage, &options);

        for variant in [ChartVariant::Proportional, ChartVariant::Bars, ChartVariant::Tree] {
            let output = synthesize(&folders, variant, &coverage, &options);
            assert!(matches!(output, DiagramOutput::Single(_)), "{}", variant);
            assert!(!output.diagrams()[0].is_empty());
        }
    }

    #[test]
    fn test_range_buckets_per_folder() {
        let coverage = sample();
        let options = AggregateOptions::default();
        let folders = aggregate(&coverage, &options);

        let DiagramOutput::PerFolder(diagrams) =
            synthesize(&folders, ChartVariant::RangeBucket, &coverage, &options)
        else {
            panic!("expected per-folder output");
        };
        let names: Vec<&str> = diagrams
            .iter()
            .map(|d| match d {
                DiagramDescription::RangeBucketSlices { folder, .. } => folder.as_str(),
                other => panic!("unexpected {:?}", other),
            })
            .collect();
        assert_eq!(names, vec!["Infra", "Domain"]);
    }

    #[test]
    fn test_empty_folder_list() {
        let coverage = CoverageMap::new();
        let options = AggregateOptions::default();
        for variant in [ChartVariant::Proportional, ChartVariant::Bars, ChartVariant::Tree] {
            let output = synthesize(&[], variant, &coverage, &options);
            assert!(output.diagrams()[0].is_empty());
        }
        let output = synthesize(&[], ChartVariant::RangeBucket, &coverage, &options);
        assert!(output.diagrams().is_empty());
    }
}
