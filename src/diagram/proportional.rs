//! Whole-project pie: one slice per folder, sized by executable lines.

use super::shares::shares;
use super::types::{DiagramDescription, ProportionalSlice};
use crate::aggregate::folder::base_name;
use crate::aggregate::{coverage_percent, FolderStats};

/// Maximum number of slices; anything beyond is folded into `Others`.
pub const MAX_SLICES: usize = 8;

pub const OTHERS_LABEL: &str = "Others";

pub fn proportional(folders: &[FolderStats]) -> DiagramDescription {
    let mut slices: Vec<ProportionalSlice> = Vec::with_capacity(MAX_SLICES);
    let (kept, rest) = if folders.len() > MAX_SLICES {
        folders.split_at(MAX_SLICES - 1)
    } else {
        (folders, &[][..])
    };

    for folder in kept {
        slices.push(ProportionalSlice {
            label: base_name(&folder.folder).to_string(),
            folder: folder.folder.clone(),
            coverage_percent: folder.coverage_percent(),
            share_percent: 0.0,
            total_lines: folder.total_lines,
            covered_lines: folder.covered_lines,
            file_count: folder.file_count,
        });
    }

    let total_lines: u64 = rest.iter().map(|f| f.total_lines).sum();
    if total_lines > 0 {
        let covered_lines: u64 = rest.iter().map(|f| f.covered_lines).sum();
        slices.push(ProportionalSlice {
            label: OTHERS_LABEL.to_string(),
            folder: OTHERS_LABEL.to_string(),
            coverage_percent: coverage_percent(covered_lines, total_lines),
            share_percent: 0.0,
            total_lines,
            covered_lines,
            file_count: rest.iter().map(|f| f.file_count).sum(),
        });
    }

    let weights: Vec<u64> = slices.iter().map(|s| s.total_lines).collect();
    for (slice, share) in slices.iter_mut().zip(shares(&weights)) {
        slice.share_percent = share;
    }

    DiagramDescription::ProportionalSlices { slices }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::LineTotals;

    fn folder(name: &str, total: u64, covered: u64) -> FolderStats {
        let mut stats = FolderStats::new(name);
        stats.add_file(format!("{}.php", name), LineTotals { total, covered });
        stats
    }

    fn slices(diagram: DiagramDescription) -> Vec<ProportionalSlice> {
        match diagram {
            DiagramDescription::ProportionalSlices { slices } => slices,
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_small_projects_get_one_slice_per_folder() {
        let folders = vec![folder("Domain/Model", 30, 30), folder("Infra", 10, 5)];
        let slices = slices(proportional(&folders));
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].label, "Model");
        assert_eq!(slices[0].share_percent, 75.0);
        assert_eq!(slices[1].coverage_percent, 50.0);
    }

    #[test]
    fn test_overflow_goes_to_others() {
        let folders: Vec<FolderStats> = (0..10)
            .map(|i| folder(&format!("F{}", i), 10 + i, 10 - i))
            .collect();
        let slices = slices(proportional(&folders));

        assert_eq!(slices.len(), MAX_SLICES);
        let others = &slices[7];
        assert_eq!(others.label, OTHERS_LABEL);
        assert_eq!(others.total_lines, 17 + 18 + 19);
        assert_eq!(others.covered_lines, 3 + 2 + 1);
        assert_eq!(others.file_count, 3);
        assert_eq!(others.coverage_percent, coverage_percent(6, 54));
    }

    #[test]
    fn test_exactly_eight_folders_are_not_merged() {
        let folders: Vec<FolderStats> = (0..8).map(|i| folder(&format!("F{}", i), 1, 1)).collect();
        let slices = slices(proportional(&folders));
        assert_eq!(slices.len(), 8);
        assert!(slices.iter().all(|s| s.label != OTHERS_LABEL));
    }

    #[test]
    fn test_shares_add_up_to_one_hundred() {
        let folders: Vec<FolderStats> = (0..8)
            .map(|i| {
                let lines = if i == 1 { 1572 } else { 1204 };
                folder(&format!("F{}", i), lines, lines / 2)
            })
            .collect();
        let slices = slices(proportional(&folders));

        let sum: f64 = slices.iter().map(|s| s.share_percent).sum();
        assert!((sum - 100.0).abs() < 1e-9, "sum {}", sum);
        assert_eq!(slices[1].share_percent, 15.7);
    }

    #[test]
    fn test_empty_input() {
        assert!(slices(proportional(&[])).is_empty());
    }
}
