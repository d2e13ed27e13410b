//! Provisioner settings and installation layout.
//!
//! Pure functions only. No I/O or async.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::error::ProvisionError;
use crate::domain::manifest::PluginSpec;

// ── Constants ────────────────────────────────────────────────────────────────

/// Lock file looked up in the current directory when none is given.
pub const DEFAULT_LOCK_FILE: &str = "comfy-lock.yaml";
/// Installation root inside the application container.
pub const DEFAULT_INSTALL_ROOT: &str = "/app";
/// Plugin checkouts live in this directory under the root.
pub const PLUGINS_DIR_NAME: &str = "custom_nodes";
/// Version-control client invoked for clone/fetch/checkout.
pub const DEFAULT_GIT_PROGRAM: &str = "git";

// ── Settings ─────────────────────────────────────────────────────────────────

/// Runtime settings, assembled from CLI flags and their environment fallbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionerConfig {
    pub install_root: PathBuf,
    pub git_program: String,
    /// `None` waits for git indefinitely.
    pub git_timeout: Option<Duration>,
    /// `None` lets downloads block indefinitely.
    pub download_timeout: Option<Duration>,
}

impl Default for ProvisionerConfig {
    fn default() -> Self {
        Self {
            install_root: PathBuf::from(DEFAULT_INSTALL_ROOT),
            git_program: DEFAULT_GIT_PROGRAM.to_string(),
            git_timeout: None,
            download_timeout: None,
        }
    }
}

impl ProvisionerConfig {
    #[must_use]
    pub fn layout(&self) -> InstallLayout {
        InstallLayout::new(&self.install_root)
    }
}

/// Pick the explicit lock file path, or the default name in the working directory.
#[must_use]
pub fn resolve_manifest_path(explicit: Option<&Path>) -> PathBuf {
    explicit.map_or_else(|| PathBuf::from(DEFAULT_LOCK_FILE), Path::to_path_buf)
}

// ── Layout ───────────────────────────────────────────────────────────────────

/// Where things live under the installation root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallLayout {
    pub root: PathBuf,
    pub plugins_dir: PathBuf,
}

impl InstallLayout {
    #[must_use]
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            plugins_dir: root.join(PLUGINS_DIR_NAME),
        }
    }

    /// Marker whose presence makes the root a version-controlled checkout.
    #[must_use]
    pub fn core_git_dir(&self) -> PathBuf {
        self.root.join(".git")
    }

    /// Checkout directory for a plugin.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRepositoryUrl` if the URL yields no directory name.
    pub fn plugin_checkout(&self, plugin: &PluginSpec) -> Result<PathBuf, ProvisionError> {
        Ok(self.plugins_dir.join(plugin.checkout_name()?))
    }
}
