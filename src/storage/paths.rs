//! Home directory resolution

use std::path::{Path, PathBuf};

use anyhow::Result;
use directories::BaseDirs;

/// Returns the user's home directory
pub fn home_dir() -> Result<PathBuf> {
    BaseDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))
}

/// Expands a leading `~` or `~/` to the home directory
pub fn expand_home(path: &Path) -> Result<PathBuf> {
    expand_with(path, home_dir)
}

fn expand_with(path: &Path, home: impl FnOnce() -> Result<PathBuf>) -> Result<PathBuf> {
    let Some(raw) = path.to_str() else {
        return Ok(path.to_path_buf());
    };

    if raw == "~" {
        return home();
    }

    match raw.strip_prefix("~/") {
        Some(rest) => Ok(home()?.join(rest)),
        None => Ok(path.to_path_buf()),
    }
}
