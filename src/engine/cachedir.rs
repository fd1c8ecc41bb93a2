//! Local model cache directory
//!
//! Some NLP backends download models on first use. The directory they cache
//! them in comes from the `cachedir` configuration setting or, failing that,
//! from the `PIISA_CACHEDIR` environment variable. It is created if missing.

use crate::config::CacheDirSetting;
use crate::defs;
use crate::domain::{PluginError, Result};
use std::path::{Path, PathBuf};

/// Resolves (and creates) the model cache directory
///
/// Returns `None` when caching is disabled (`cachedir: false`) or when no
/// directory is configured anywhere.
///
/// # Errors
///
/// Returns a [`PluginError::Configuration`] if the directory cannot be created
pub fn resolve_cachedir(setting: Option<&CacheDirSetting>) -> Result<Option<PathBuf>> {
    let dir = match setting {
        Some(CacheDirSetting::Enabled(false)) => return Ok(None),
        Some(CacheDirSetting::Path(path)) => path.clone(),
        Some(CacheDirSetting::Enabled(true)) | None => match std::env::var(defs::ENV_CACHEDIR) {
            Ok(val) if !val.trim().is_empty() => PathBuf::from(val),
            _ => return Ok(None),
        },
    };

    ensure_dir(&dir)?;
    Ok(Some(dir))
}

fn ensure_dir(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        return Ok(());
    }
    tracing::debug!(path = %dir.display(), "Creating model cache directory");
    std::fs::create_dir_all(dir).map_err(|e| {
        PluginError::Configuration(format!(
            "Failed to create model cache directory {}: {}",
            dir.display(),
            e
        ))
    })
}
