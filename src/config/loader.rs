use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use super::CovdiagramConfig;
use crate::errors::{Error, Result};

pub const CONFIG_FILE_NAME: &str = ".covdiagram.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Parse TOML contents; out-of-range aggregation values are dropped with a
/// warning so the built-in defaults apply instead.
pub fn parse_and_validate_config(contents: &str) -> std::result::Result<CovdiagramConfig, String> {
    let mut config = toml::from_str::<CovdiagramConfig>(contents)
        .map_err(|e| format!("Failed to parse {}: {}", CONFIG_FILE_NAME, e))?;

    let problems = config.aggregation.problems();
    if !problems.is_empty() {
        log::warn!(
            "Ignoring invalid aggregation settings ({}); built-in defaults apply",
            problems.join("; ")
        );
        config.aggregation.max_depth = config.aggregation.max_depth.filter(|d| *d >= 1);
        config.aggregation.min_coverage = config
            .aggregation
            .min_coverage
            .filter(|m| m.is_finite() && (0.0..=100.0).contains(m));
    }

    Ok(config)
}

/// Config file directly inside `dir`. Anything but a missing file is logged
/// and the directory is skipped.
fn config_in(dir: &Path) -> Option<CovdiagramConfig> {
    let path = dir.join(CONFIG_FILE_NAME);
    let contents = match fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return None,
        Err(e) => {
            log::warn!("Skipping unreadable {}: {}", path.display(), e);
            return None;
        }
    };

    match parse_and_validate_config(&contents) {
        Ok(config) => {
            log::debug!("Loaded config from {}", path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!("Skipping {}: {}", path.display(), e);
            None
        }
    }
}

/// Directories searched for a config file: `start` first, then its
/// parents, `limit` entries at most.
pub fn search_dirs(start: &Path, limit: usize) -> impl Iterator<Item = &Path> {
    start.ancestors().take(limit)
}

/// First usable config file in `start` or one of its ancestors.
pub fn find_config_from(start: &Path) -> Option<CovdiagramConfig> {
    search_dirs(start, MAX_TRAVERSAL_DEPTH).find_map(config_in)
}

/// Search upwards from the current directory, falling back to defaults.
pub fn load_config() -> CovdiagramConfig {
    let current = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            log::warn!("Cannot determine the current directory ({}); using default config", e);
            return CovdiagramConfig::default();
        }
    };

    find_config_from(&current).unwrap_or_else(|| {
        log::debug!(
            "No {} within {} directories of {}",
            CONFIG_FILE_NAME,
            MAX_TRAVERSAL_DEPTH,
            current.display()
        );
        CovdiagramConfig::default()
    })
}

/// Load an explicitly requested config file. Unlike the upward search, a
/// missing or malformed file is an error here.
pub fn load_config_from_path(path: &Path) -> Result<CovdiagramConfig> {
    let contents = fs::read_to_string(path)
        .map_err(|e| Error::config(format!("cannot read {}: {}", path.display(), e)))?;
    parse_and_validate_config(&contents).map_err(Error::config)
}
