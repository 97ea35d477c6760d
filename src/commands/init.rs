use crate::config::{CONFIG_FILE_NAME, DEFAULT_CONFIG};
use crate::io;
use anyhow::Result;
use std::path::{Path, PathBuf};

pub fn init_config(force: bool) -> Result<()> {
    init_config_in(Path::new("."), force)?;
    println!("Created {} configuration file", CONFIG_FILE_NAME);
    Ok(())
}

/// Write the default config into `dir`, refusing to clobber unless `force`.
pub fn init_config_in(dir: &Path, force: bool) -> Result<PathBuf> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    io::write_file(&config_path, DEFAULT_CONFIG)?;
    Ok(config_path)
}
