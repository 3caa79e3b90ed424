//! Path and directory management.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{Error, Result};

/// Get the output directory for a download target, namespaced under the
/// configured download directory.
///
/// Rejects names containing path separators or parent references so a target
/// cannot escape the download directory.
pub fn target_dir(config: &Config, target: &str) -> Result<PathBuf> {
    if target.is_empty()
        || target.contains('/')
        || target.contains('\\')
        || target.contains("..")
    {
        return Err(Error::InvalidTarget(target.to_string()));
    }

    Ok(config.download_dir.join(target))
}

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
