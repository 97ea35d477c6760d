//! Bar chart: coverage per folder on a fixed 0-100 axis.

use super::types::{AxisRange, Bar, DiagramDescription};
use crate::aggregate::folder::base_name;
use crate::aggregate::FolderStats;

pub fn bars(folders: &[FolderStats]) -> DiagramDescription {
    DiagramDescription::Bars {
        bars: folders
            .iter()
            .map(|folder| Bar {
                label: base_name(&folder.folder).to_string(),
                folder: folder.folder.clone(),
                value: folder.coverage_percent(),
            })
            .collect(),
        axis: AxisRange::PERCENT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::LineTotals;

    #[test]
    fn test_one_bar_per_folder_in_order() {
        let mut good = FolderStats::new("Domain/Good");
        good.add_file("A.php", LineTotals { total: 2, covered: 2 });
        let mut bad = FolderStats::new("Bad");
        bad.add_file("B.php", LineTotals { total: 4, covered: 1 });

        let DiagramDescription::Bars { bars, axis } = bars(&[good, bad]) else {
            panic!("expected bars");
        };
        assert_eq!(axis, AxisRange::PERCENT);
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].label, "Good");
        assert_eq!(bars[0].value, 100.0);
        assert_eq!(bars[1].value, 25.0);
    }
}
