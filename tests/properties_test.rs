//! Invariants of aggregation and synthesis over generated coverage maps.

use covdiagram::aggregate::files_in_folder;
use covdiagram::diagram::{proportional, range_buckets, MAX_SLICES};
use covdiagram::{
    aggregate, AggregateOptions, CoverageMap, DiagramDescription, LineCount, LineMap,
};
use proptest::prelude::*;

/// Shares carry one decimal and are allotted so they add up to 100.
const SHARE_SUM_TOLERANCE: f64 = 0.2;

fn line_count() -> impl Strategy<Value = LineCount> {
    prop_oneof![
        1 => Just(None),
        2 => Just(Some(0u64)),
        2 => (1u64..50).prop_map(Some),
    ]
}

fn file_entry() -> impl Strategy<Value = (String, LineMap)> {
    (
        0usize..12,
        0usize..3,
        0usize..4,
        prop::collection::vec(line_count(), 0..15),
    )
        .prop_map(|(top, sub, file, counts)| {
            let path = format!("src/F{}/S{}/File{}.php", top, sub, file);
            let lines = counts
                .into_iter()
                .enumerate()
                .map(|(i, count)| (i as u32 + 1, count))
                .collect();
            (path, lines)
        })
}

fn coverage_map() -> impl Strategy<Value = CoverageMap> {
    prop::collection::vec(file_entry(), 0..40).prop_map(|files| {
        let mut map = CoverageMap::new();
        for (path, lines) in files {
            map.insert(path, lines);
        }
        map
    })
}

fn options(max_depth: usize) -> AggregateOptions {
    AggregateOptions {
        max_depth,
        ..Default::default()
    }
}

proptest! {
    #[test]
    fn folder_totals_are_consistent(coverage in coverage_map(), depth in 1usize..4) {
        let folders = aggregate(&coverage, &options(depth));

        for folder in &folders {
            prop_assert!(folder.covered_lines <= folder.total_lines);
            prop_assert!(folder.total_lines > 0);
            prop_assert!(folder.file_count > 0);
            let pct = folder.coverage_percent();
            prop_assert!((0.0..=100.0).contains(&pct));
            prop_assert!(folder.folder.split('/').count() <= depth);
        }
    }

    #[test]
    fn folders_sorted_descending(coverage in coverage_map()) {
        let folders = aggregate(&coverage, &options(5));
        for pair in folders.windows(2) {
            prop_assert!(pair[0].coverage_percent() >= pair[1].coverage_percent());
        }
    }

    #[test]
    fn files_without_executable_lines_are_ignored(coverage in coverage_map()) {
        let folders = aggregate(&coverage, &options(5));

        let executable_files = coverage
            .iter()
            .filter(|(_, lines)| lines.values().any(Option::is_some))
            .count();
        let counted: usize = folders.iter().map(|f| f.file_count).sum();
        prop_assert_eq!(counted, executable_files);
    }

    #[test]
    fn proportional_shares_cover_the_project(coverage in coverage_map()) {
        let folders = aggregate(&coverage, &options(2));
        let DiagramDescription::ProportionalSlices { slices } = proportional(&folders) else {
            unreachable!();
        };

        prop_assert!(slices.len() <= MAX_SLICES);
        if !folders.is_empty() {
            let sum: f64 = slices.iter().map(|s| s.share_percent).sum();
            prop_assert!((sum - 100.0).abs() <= SHARE_SUM_TOLERANCE, "sum {}", sum);

            let lines: u64 = slices.iter().map(|s| s.total_lines).sum();
            let expected: u64 = folders.iter().map(|f| f.total_lines).sum();
            prop_assert_eq!(lines, expected);
        }
    }

    #[test]
    fn every_file_lands_in_one_bucket(coverage in coverage_map()) {
        let opts = options(1);
        for folder in aggregate(&coverage, &opts) {
            let files = files_in_folder(&coverage, &folder.folder, &opts);
            prop_assert_eq!(files.len(), folder.file_count);

            let DiagramDescription::RangeBucketSlices { slices, .. } =
                range_buckets(&folder.folder, &files)
            else {
                unreachable!();
            };
            let bucketed: usize = slices.iter().map(|s| s.file_count).sum();
            prop_assert_eq!(bucketed, files.len());

            let sum: f64 = slices.iter().map(|s| s.share_percent).sum();
            prop_assert!((sum - 100.0).abs() <= SHARE_SUM_TOLERANCE, "sum {}", sum);
        }
    }

    #[test]
    fn shares_stay_within_tolerance_for_near_equal_folders(
        lines in prop::collection::vec(1000u64..2000, 1..=MAX_SLICES)
    ) {
        let mut coverage = CoverageMap::new();
        for (i, count) in lines.iter().enumerate() {
            let file: LineMap = (1..=*count as u32).map(|line| (line, Some(1))).collect();
            coverage.insert(format!("src/F{}/File.php", i), file);
        }
        let folders = aggregate(&coverage, &options(1));
        let DiagramDescription::ProportionalSlices { slices } = proportional(&folders) else {
            unreachable!();
        };

        let sum: f64 = slices.iter().map(|s| s.share_percent).sum();
        prop_assert!((sum - 100.0).abs() <= SHARE_SUM_TOLERANCE, "sum {}", sum);
    }

    #[test]
    fn aggregation_is_deterministic(coverage in coverage_map()) {
        let opts = options(3);
        prop_assert_eq!(aggregate(&coverage, &opts), aggregate(&coverage, &opts));
    }
}
