//! Reads a lock file from disk into the domain `Manifest`.

use std::path::Path;

use anyhow::Result;

use crate::domain::{Manifest, ProvisionError};

/// Load and parse the lock file at `path`.
///
/// # Errors
///
/// Returns `ManifestNotFound` if nothing exists at `path`, `Filesystem` if it
/// cannot be read, and `ManifestParse` if it is not a valid lock file.
pub fn load_manifest(path: &Path) -> Result<Manifest> {
    if !path.exists() {
        return Err(ProvisionError::ManifestNotFound(path.to_path_buf()).into());
    }
    let text = std::fs::read_to_string(path).map_err(|e| ProvisionError::Filesystem {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;
    let manifest = Manifest::parse(&text, path)?;
    tracing::debug!(
        path = %path.display(),
        plugins = manifest.plugins.len(),
        artifacts = manifest.artifacts.len(),
        "lock file loaded"
    );
    Ok(manifest)
}
