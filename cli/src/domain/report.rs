//! Outcome of a provisioning run.

use std::path::PathBuf;

use serde::Serialize;

use crate::domain::manifest::Revision;

/// What happened to one repository checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RepoAction {
    /// Plugin marked `disabled`; nothing touched.
    Disabled,
    /// Already checked out at the pinned revision.
    AlreadySatisfied,
    /// Freshly cloned.
    Cloned,
    /// Fetched and/or checked out in place.
    Updated,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoReport {
    /// Repository URL, or `comfyui` for the primary checkout.
    pub source: String,
    pub path: PathBuf,
    pub revision: Revision,
    pub action: RepoAction,
}

/// What happened to one artifact destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DestinationAction {
    Downloaded,
    AlreadyPresent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DestinationReport {
    pub path: PathBuf,
    pub action: DestinationAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactStatus {
    Installed,
    SkippedNoSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactReport {
    pub identifier: String,
    pub source_url: Option<String>,
    pub status: ArtifactStatus,
    pub destinations: Vec<DestinationReport>,
}

/// Aggregated result of a successful run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProvisionReport {
    /// `None` when the core is unpinned or the root is not a checkout.
    pub core: Option<RepoReport>,
    pub plugins: Vec<RepoReport>,
    pub artifacts: Vec<ArtifactReport>,
}

impl ProvisionReport {
    /// Number of clones, in-place updates and downloads performed.
    #[must_use]
    pub fn changes(&self) -> usize {
        let repos = self
            .core
            .iter()
            .chain(&self.plugins)
            .filter(|r| matches!(r.action, RepoAction::Cloned | RepoAction::Updated))
            .count();
        let files = self
            .artifacts
            .iter()
            .flat_map(|a| &a.destinations)
            .filter(|d| d.action == DestinationAction::Downloaded)
            .count();
        repos + files
    }
}
