//! Mermaid markup for diagram descriptions.
//!
//! Proportional and range-bucket descriptions become `pie` charts, bars an
//! `xychart-beta`, and trees a top-down `graph` with one style class per
//! coverage level. Numbers are printed without trailing zeros (`100`, not
//! `100.00`).

use crate::diagram::{CoverageClass, DiagramDescription};
use std::fmt::Write;
use std::path::{Path, PathBuf};

const PIE_INIT: &str =
    "%%{init: {'pie': {'textPosition': 0.5}, 'themeVariables': {'pieStrokeWidth': '2px'}}}%%";

const BAR_INIT: &str = "%%{init: {'theme':'dark', 'themeVariables': { 'primaryColor': '#4CAF50', \
    'primaryTextColor': '#fff', 'primaryBorderColor': '#388E3C', 'lineColor': '#F57C00'}}}%%";

const CLASS_STYLES: &[(CoverageClass, &str)] = &[
    (
        CoverageClass::High,
        "fill:#4CAF50,stroke:#2E7D32,stroke-width:2px,color:#fff",
    ),
    (
        CoverageClass::Medium,
        "fill:#FF9800,stroke:#E65100,stroke-width:2px,color:#fff",
    ),
    (
        CoverageClass::Low,
        "fill:#F44336,stroke:#C62828,stroke-width:2px,color:#fff",
    ),
    (
        CoverageClass::None,
        "fill:#9E9E9E,stroke:#424242,stroke-width:2px,color:#fff",
    ),
];

/// Default extension for diagram files.
pub const DEFAULT_EXTENSION: &str = "mmd";

pub fn render(diagram: &DiagramDescription) -> String {
    let mut out = String::new();
    match diagram {
        DiagramDescription::ProportionalSlices { slices } => {
            writeln!(out, "{}", PIE_INIT).ok();
            writeln!(out, "pie title Code Coverage by Directory").ok();
            for slice in slices {
                writeln!(
                    out,
                    "    \"{} ({}%)\" : {}",
                    quote(&slice.label),
                    slice.coverage_percent,
                    slice.share_percent
                )
                .ok();
            }
        }
        DiagramDescription::RangeBucketSlices { folder, slices } => {
            writeln!(out, "{}", PIE_INIT).ok();
            writeln!(
                out,
                "pie title \"{} - File Coverage Distribution\"",
                quote(folder)
            )
            .ok();
            for slice in slices {
                writeln!(
                    out,
                    "    \"{} ({}) ({} files)\" : {}",
                    slice.bucket, slice.range, slice.file_count, slice.share_percent
                )
                .ok();
            }
        }
        DiagramDescription::Bars { bars, axis } => {
            let labels: Vec<String> = bars
                .iter()
                .map(|bar| format!("\"{}\"", quote(&bar.label)))
                .collect();
            let values: Vec<String> = bars.iter().map(|bar| bar.value.to_string()).collect();

            writeln!(out, "{}", BAR_INIT).ok();
            writeln!(out, "xychart-beta").ok();
            writeln!(out, "    title \"Code Coverage by Directory\"").ok();
            writeln!(out, "    x-axis [{}]", labels.join(", ")).ok();
            writeln!(out, "    y-axis \"Coverage %\" {} --> {}", axis.min, axis.max).ok();
            writeln!(out, "    bar [{}]", values.join(", ")).ok();
        }
        DiagramDescription::TreeNodes { nodes, edges } => {
            writeln!(out, "graph TD").ok();
            for (class, style) in CLASS_STYLES {
                writeln!(out, "    classDef {} {}", class.as_str(), style).ok();
            }
            out.push('\n');

            for node in nodes {
                writeln!(
                    out,
                    "    {}[\"{}\\n{}%\\n({} files)\"]",
                    node.id,
                    quote(&node.label),
                    node.coverage_percent,
                    node.file_count
                )
                .ok();
            }
            out.push('\n');

            for edge in edges {
                writeln!(out, "    {} --> {}", edge.from, edge.to).ok();
            }
            out.push('\n');

            for node in nodes {
                writeln!(out, "    class {} {}", node.id, node.class.as_str()).ok();
            }
        }
    }
    out
}

/// All per-folder pies in one markdown document.
pub fn render_combined(diagrams: &[DiagramDescription]) -> String {
    let mut out = String::from("# Code Coverage by Folder\n\n");
    for diagram in diagrams {
        let heading = match diagram {
            DiagramDescription::RangeBucketSlices { folder, .. } => folder.as_str(),
            _ => "Coverage",
        };
        write!(out, "## {}\n\n```mermaid\n{}\n```\n\n", heading, render(diagram)).ok();
    }
    out
}

/// `<dir>/<stem>_<folder>.<ext>` next to `output`.
pub fn per_folder_path(output: &Path, folder: &str) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "coverage-diagram".to_string());
    let extension = output
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());
    let file_name = format!("{}_{}.{}", stem, sanitize_filename(folder), extension);

    match output.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(file_name),
        _ => PathBuf::from(file_name),
    }
}

/// Replace anything but ASCII letters, digits, `_` and `-` with `_`.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Mermaid labels are double-quoted; embedded quotes use the entity form.
fn quote(label: &str) -> String {
    label.replace('"', "#quot;")
}
