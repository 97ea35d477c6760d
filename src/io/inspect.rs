//! Diagnostics for coverage artifacts that fail to parse.
//!
//! Pure content checks over the first kilobyte plus a comfy-table view for
//! the terminal.

use crate::coverage::{detect_format, FormatHint};
use crate::errors::{Error, Result};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Bytes scanned for format markers.
const SNIFF_BYTES: usize = 1000;
/// Characters shown as the content preview.
const PREVIEW_CHARS: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileInspection {
    pub path: PathBuf,
    pub size: u64,
    pub extension: Option<String>,
    /// Start of the file with line breaks flattened
    pub leading: String,
    pub has_xml: bool,
    pub has_json: bool,
    pub has_php: bool,
    pub has_serialized: bool,
    /// Strategy that accepts the whole file, if any
    pub detected_format: Option<&'static str>,
}

/// Inspect the file at `path`.
///
/// # Errors
///
/// [`Error::FileNotFound`] when `path` is not a file.
pub fn inspect(path: &Path) -> Result<FileInspection> {
    if !path.is_file() {
        return Err(Error::file_not_found(path));
    }
    let bytes = fs::read(path)?;
    Ok(inspect_bytes(path, &bytes))
}

pub fn inspect_bytes(path: &Path, bytes: &[u8]) -> FileInspection {
    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(SNIFF_BYTES)]);
    let trimmed = head.trim_start();
    let hint = FormatHint::from_path(path);

    FileInspection {
        path: path.to_path_buf(),
        size: bytes.len() as u64,
        extension: hint.extension().map(str::to_string),
        leading: head
            .chars()
            .take(PREVIEW_CHARS)
            .map(|c| if c.is_control() { ' ' } else { c })
            .collect(),
        has_xml: head.contains("<?xml") || head.contains("<coverage"),
        has_json: trimmed.starts_with('{') || trimmed.starts_with('['),
        has_php: head.contains("<?php"),
        has_serialized: head.contains("a:") || head.contains("O:"),
        detected_format: detect_format(bytes, &hint),
    }
}

pub fn inspection_table(inspection: &FileInspection) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Property", "Value"]);

    let rows = [
        ("File", inspection.path.display().to_string()),
        ("Size", format!("{} bytes", thousands(inspection.size))),
        (
            "Extension",
            inspection.extension.clone().unwrap_or_else(|| "(none)".into()),
        ),
        ("First 50 chars", inspection.leading.clone()),
        ("Contains XML", yes_no(inspection.has_xml)),
        ("Looks like JSON", yes_no(inspection.has_json)),
        ("Contains PHP tag", yes_no(inspection.has_php)),
        ("Serialized markers", yes_no(inspection.has_serialized)),
        (
            "Detected format",
            inspection.detected_format.unwrap_or("unknown").to_string(),
        ),
    ];
    for (property, value) in rows {
        table.add_row(vec![property.to_string(), value]);
    }
    table
}

fn yes_no(flag: bool) -> String {
    let text = if flag { "yes" } else { "no" };
    text.to_string()
}

/// `1234567` -> `1,234,567`
fn thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
