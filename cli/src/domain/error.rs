//! Typed domain error enum.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! Every variant is fatal for the run; services wrap port failures into the
//! matching variant and the error converts to `anyhow::Error` via `?`.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal provisioning failures.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("Lock file not found: {}", .0.display())]
    ManifestNotFound(PathBuf),

    #[error("Cannot parse lock file {}: {message}", path.display())]
    ManifestParse { path: PathBuf, message: String },

    #[error("Failed to clone {url} into {}: {detail}", dest.display())]
    Clone {
        url: String,
        dest: PathBuf,
        detail: String,
    },

    #[error("Failed to fetch origin in {}: {detail}", repo.display())]
    Fetch { repo: PathBuf, detail: String },

    #[error("Failed to check out {revision} in {}: {detail}", repo.display())]
    Checkout {
        repo: PathBuf,
        revision: String,
        detail: String,
    },

    #[error("Failed to download {url} to {}: {detail}", dest.display())]
    Download {
        url: String,
        dest: PathBuf,
        detail: String,
    },

    #[error("Filesystem error at {}: {detail}", path.display())]
    Filesystem { path: PathBuf, detail: String },

    #[error("Invalid destination path '{0}': must be relative and stay inside the installation root")]
    InvalidDestination(String),

    #[error("Cannot derive a checkout directory from repository URL '{0}'")]
    InvalidRepositoryUrl(String),
}

impl ProvisionError {
    /// Stable machine-readable error kind, used by `--json` output.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::ManifestNotFound(_) => "manifest_not_found",
            Self::ManifestParse { .. } => "manifest_parse",
            Self::Clone { .. } => "clone",
            Self::Fetch { .. } => "fetch",
            Self::Checkout { .. } => "checkout",
            Self::Download { .. } => "download",
            Self::Filesystem { .. } => "filesystem",
            Self::InvalidDestination(_) => "invalid_destination",
            Self::InvalidRepositoryUrl(_) => "invalid_repository_url",
        }
    }
}
