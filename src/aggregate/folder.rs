//! Folder derivation from file paths.

use super::options::ROOT_FOLDER;

/// Directory segments of `path`, without empty and `.` segments.
pub fn folder_segments(path: &str) -> Vec<&str> {
    let trimmed = path.trim_end_matches('/');
    let directory = trimmed.rsplit_once('/').map_or("", |(dir, _)| dir);
    directory
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect()
}

/// Folder a file belongs to, capped at `max_depth` segments when given.
///
/// Files without any directory segment belong to [`ROOT_FOLDER`].
pub fn folder_path(path: &str, max_depth: Option<usize>) -> String {
    let mut segments = folder_segments(path);
    if let Some(depth) = max_depth {
        segments.truncate(depth);
    }
    if segments.is_empty() {
        ROOT_FOLDER.to_string()
    } else {
        segments.join("/")
    }
}

/// Last path component.
pub fn base_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    trimmed.rsplit_once('/').map_or(trimmed, |(_, name)| name)
}

/// Base name without a `.php` suffix.
pub fn file_stem(path: &str) -> &str {
    let name = base_name(path);
    match name.strip_suffix(".php") {
        Some(stem) if !stem.is_empty() => stem,
        _ => name,
    }
}
