//! Path filters applied before a file is assigned to a folder.

/// Heuristic for "library source, not tests or dependencies".
pub fn is_src_file(path: &str) -> bool {
    path.starts_with("src/")
        || path.starts_with("/src/")
        || path.contains("/src/")
        || (path.ends_with(".php")
            && !path.contains("/tests/")
            && !path.contains("/test/")
            && !path.contains("/vendor/"))
}

/// True when any entry prefixes the path or appears as a `/entry/` segment.
///
/// The prefix test is deliberately textual: `test` also excludes `tests/`.
pub fn is_excluded(path: &str, excludes: &[&str]) -> bool {
    excludes.iter().any(|entry| {
        path.starts_with(&format!("{}/", entry))
            || path.contains(&format!("/{}/", entry))
            || path.starts_with(entry)
    })
}

/// Strip `base_path` from the front of `path`.
///
/// Returns `None` when nothing addressable is left.
pub fn strip_base_path<'a>(path: &'a str, base_path: &str) -> Option<&'a str> {
    let relative = if base_path.is_empty() {
        path
    } else {
        path.strip_prefix(base_path).unwrap_or(path)
    };

    match relative {
        "" | "/" => None,
        rest => Some(rest),
    }
}
