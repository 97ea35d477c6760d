//! Per-folder pie of files grouped into fixed coverage ranges.

use super::shares::shares;
use super::types::{DiagramDescription, RangeSlice};
use crate::aggregate::FileCoverage;

pub struct CoverageRange {
    pub name: &'static str,
    pub range: &'static str,
    /// Lowest percentage in the range. Percentages carry two decimals, so
    /// 0.01 is the smallest non-zero value.
    pub floor: f64,
}

/// Checked top to bottom; the first range whose floor is reached wins.
pub const COVERAGE_RANGES: &[CoverageRange] = &[
    CoverageRange {
        name: "Excellent",
        range: "90-100%",
        floor: 90.0,
    },
    CoverageRange {
        name: "Good",
        range: "80-89%",
        floor: 80.0,
    },
    CoverageRange {
        name: "Fair",
        range: "70-79%",
        floor: 70.0,
    },
    CoverageRange {
        name: "Poor",
        range: "50-69%",
        floor: 50.0,
    },
    CoverageRange {
        name: "Bad",
        range: "1-49%",
        floor: 0.01,
    },
    CoverageRange {
        name: "Untested",
        range: "0%",
        floor: f64::NEG_INFINITY,
    },
];

/// Index into [`COVERAGE_RANGES`] for a percentage.
pub fn bucket_index(percent: f64) -> usize {
    COVERAGE_RANGES
        .iter()
        .position(|range| percent >= range.floor)
        .unwrap_or(COVERAGE_RANGES.len() - 1)
}

pub fn range_buckets(folder: &str, files: &[FileCoverage]) -> DiagramDescription {
    let mut counts = [(0usize, 0u64); COVERAGE_RANGES.len()];
    for file in files {
        let slot = &mut counts[bucket_index(file.coverage_percent)];
        slot.0 += 1;
        slot.1 += file.total_lines;
    }

    let populated: Vec<(&CoverageRange, (usize, u64))> = COVERAGE_RANGES
        .iter()
        .zip(counts)
        .filter(|(_, (file_count, _))| *file_count > 0)
        .collect();
    let weights: Vec<u64> = populated.iter().map(|(_, (_, lines))| *lines).collect();

    let slices = populated
        .into_iter()
        .zip(shares(&weights))
        .map(|((range, (file_count, total_lines)), share_percent)| RangeSlice {
            bucket: range.name,
            range: range.range,
            file_count,
            total_lines,
            share_percent,
        })
        .collect();

    DiagramDescription::RangeBucketSlices {
        folder: folder.to_string(),
        slices,
    }
}
