//! Structured diagram descriptions.
//!
//! Each chart shape is its own variant carrying only its own payload. None
//! of them borrows from the coverage map or the folder list.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Requested chart shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartVariant {
    /// Whole-project pie, one slice per folder
    Proportional,
    /// Per-folder pie of files grouped by coverage range
    RangeBucket,
    #[default]
    Bars,
    Tree,
}

impl fmt::Display for ChartVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChartVariant::Proportional => "proportional",
            ChartVariant::RangeBucket => "range-bucket",
            ChartVariant::Bars => "bars",
            ChartVariant::Tree => "tree",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagramDescription {
    ProportionalSlices {
        slices: Vec<ProportionalSlice>,
    },
    RangeBucketSlices {
        folder: String,
        slices: Vec<RangeSlice>,
    },
    Bars {
        bars: Vec<Bar>,
        axis: AxisRange,
    },
    TreeNodes {
        nodes: Vec<TreeNode>,
        edges: Vec<TreeEdge>,
    },
}

impl DiagramDescription {
    /// Whether there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        match self {
            DiagramDescription::ProportionalSlices { slices } => slices.is_empty(),
            DiagramDescription::RangeBucketSlices { slices, .. } => slices.is_empty(),
            DiagramDescription::Bars { bars, .. } => bars.is_empty(),
            DiagramDescription::TreeNodes { nodes, .. } => nodes.is_empty(),
        }
    }
}

/// One folder's share of the codebase.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProportionalSlice {
    /// Folder base name, or `Others`
    pub label: String,
    pub folder: String,
    pub coverage_percent: f64,
    /// Percentage of all executable lines, one decimal
    pub share_percent: f64,
    pub total_lines: u64,
    pub covered_lines: u64,
    pub file_count: usize,
}

/// Files of one folder falling into one coverage range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeSlice {
    pub bucket: &'static str,
    pub range: &'static str,
    pub file_count: usize,
    pub total_lines: u64,
    /// Percentage of the folder's executable lines, one decimal
    pub share_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub label: String,
    pub folder: String,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    pub const PERCENT: AxisRange = AxisRange {
        min: 0.0,
        max: 100.0,
    };
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeNode {
    /// `node<n>`, 1-based in folder order
    pub id: String,
    pub folder: String,
    pub label: String,
    pub coverage_percent: f64,
    pub file_count: usize,
    pub class: CoverageClass,
}

/// Parent to child, by node id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeEdge {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverageClass {
    High,
    Medium,
    Low,
    None,
}

impl CoverageClass {
    pub fn for_percent(percent: f64) -> Self {
        if percent >= 80.0 {
            CoverageClass::High
        } else if percent >= 60.0 {
            CoverageClass::Medium
        } else if percent > 0.0 {
            CoverageClass::Low
        } else {
            CoverageClass::None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CoverageClass::High => "high",
            CoverageClass::Medium => "medium",
            CoverageClass::Low => "low",
            CoverageClass::None => "none",
        }
    }
}

/// Either one diagram for the whole project or one range pie per folder.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagramOutput {
    Single(DiagramDescription),
    PerFolder(Vec<DiagramDescription>),
}

impl DiagramOutput {
    pub fn diagrams(&self) -> &[DiagramDescription] {
        match self {
            DiagramOutput::Single(diagram) => std::slice::from_ref(diagram),
            DiagramOutput::PerFolder(diagrams) => diagrams,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coverage_class_thresholds() {
        assert_eq!(CoverageClass::for_percent(100.0), CoverageClass::High);
        assert_eq!(CoverageClass::for_percent(80.0), CoverageClass::High);
        assert_eq!(CoverageClass::for_percent(79.99), CoverageClass::Medium);
        assert_eq!(CoverageClass::for_percent(60.0), CoverageClass::Medium);
        assert_eq!(CoverageClass::for_percent(0.01), CoverageClass::Low);
        assert_eq!(CoverageClass::for_percent(0.0), CoverageClass::None);
    }

    #[test]
    fn test_description_is_tagged_by_kind() {
        let diagram = DiagramDescription::Bars {
            bars: vec![],
            axis: AxisRange::PERCENT,
        };
        let json = serde_json::to_value(&diagram).unwrap();
        assert_eq!(json["kind"], "bars");
        assert_eq!(json["axis"]["max"], 100.0);
        assert!(diagram.is_empty());
    }
}
