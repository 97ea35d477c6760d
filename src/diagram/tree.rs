//! Folder hierarchy diagram.
//!
//! Nodes are the folders themselves. Edges are found by walking each
//! folder's path prefixes: the first segment hangs off the `src` node, every
//! deeper prefix off the prefix one segment shorter. An edge is only drawn
//! when both ends are folders in the list, so intermediate folders that were
//! filtered out leave their children unattached.

use super::types::{CoverageClass, DiagramDescription, TreeEdge, TreeNode};
use crate::aggregate::folder::base_name;
use crate::aggregate::{FolderStats, ROOT_FOLDER};
use std::collections::{HashMap, HashSet};

pub fn tree(folders: &[FolderStats]) -> DiagramDescription {
    let nodes: Vec<TreeNode> = folders
        .iter()
        .enumerate()
        .map(|(i, folder)| {
            let coverage = folder.coverage_percent();
            TreeNode {
                id: format!("node{}", i + 1),
                folder: folder.folder.clone(),
                label: base_name(&folder.folder).to_string(),
                coverage_percent: coverage,
                file_count: folder.file_count,
                class: CoverageClass::for_percent(coverage),
            }
        })
        .collect();

    let edges = hierarchy_edges(folders, &nodes);
    DiagramDescription::TreeNodes { nodes, edges }
}

fn hierarchy_edges(folders: &[FolderStats], nodes: &[TreeNode]) -> Vec<TreeEdge> {
    let ids: HashMap<&str, &str> = nodes
        .iter()
        .map(|node| (node.folder.as_str(), node.id.as_str()))
        .collect();

    let mut edges = Vec::new();
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut link = |parent: &str, child: &str| {
        if let (Some(from), Some(to)) = (ids.get(parent), ids.get(child)) {
            if seen.insert((parent.to_string(), child.to_string())) {
                edges.push(TreeEdge {
                    from: from.to_string(),
                    to: to.to_string(),
                });
            }
        }
    };

    for folder in folders.iter().filter(|f| f.folder != ROOT_FOLDER) {
        let parts: Vec<&str> = folder.folder.split('/').collect();
        for depth in 1..=parts.len() {
            let current = parts[..depth].join("/");
            if depth == 1 {
                link(ROOT_FOLDER, &current);
            } else {
                link(&parts[..depth - 1].join("/"), &current);
            }
        }
    }

    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::LineTotals;

    fn folders(names: &[(&str, u64)]) -> Vec<FolderStats> {
        names
            .iter()
            .map(|(name, covered)| {
                let mut stats = FolderStats::new(*name);
                stats.add_file("x.php", LineTotals { total: 100, covered: *covered });
                stats
            })
            .collect()
    }

    fn edges(diagram: &DiagramDescription) -> Vec<(String, String)> {
        match diagram {
            DiagramDescription::TreeNodes { edges, .. } => edges
                .iter()
                .map(|e| (e.from.clone(), e.to.clone()))
                .collect(),
            other => panic!("unexpected {:?}", other),
        }
    }

    fn pair(from: &str, to: &str) -> (String, String) {
        (from.to_string(), to.to_string())
    }

    #[test]
    fn test_nodes_carry_label_and_class() {
        let diagram = tree(&folders(&[("Domain/User", 85), ("src", 0)]));
        let DiagramDescription::TreeNodes { nodes, .. } = &diagram else {
            panic!("expected tree");
        };
        assert_eq!(nodes[0].id, "node1");
        assert_eq!(nodes[0].label, "User");
        assert_eq!(nodes[0].class, CoverageClass::High);
        assert_eq!(nodes[1].class, CoverageClass::None);
    }

    #[test]
    fn test_prefix_walk_links_parents_once() {
        let diagram = tree(&folders(&[
            ("Domain/User", 90),
            ("src", 50),
            ("Domain", 70),
            ("Domain/Order", 40),
            ("Infra/Db", 10),
        ]));
        assert_eq!(
            edges(&diagram),
            vec![
                pair("node2", "node3"),
                pair("node3", "node1"),
                pair("node3", "node4"),
            ]
        );
    }

    #[test]
    fn test_no_src_node_means_no_root_edges() {
        let diagram = tree(&folders(&[("Domain", 70), ("Domain/User", 90)]));
        assert_eq!(edges(&diagram), vec![pair("node1", "node2")]);
    }

    #[test]
    fn test_empty_input() {
        assert!(tree(&[]).is_empty());
    }
}
