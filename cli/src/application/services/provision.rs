//! Application service: lock file provisioning use-case.
//!
//! Sequences core checkout, plugin sync and artifact downloads. The first
//! failure aborts the run; nothing after it is attempted.

use anyhow::Result;

use crate::application::ports::{Downloader, LocalFs, ProgressReporter, VersionControl};
use crate::application::services::{artifact_fetch, repo_sync};
use crate::domain::{InstallLayout, Manifest, ProvisionReport};

/// Injected collaborators for a provisioning run.
pub struct Provisioner<'a, V, D, F, R> {
    pub vcs: &'a V,
    pub downloader: &'a D,
    pub fs: &'a F,
    pub reporter: &'a R,
    pub layout: &'a InstallLayout,
}

impl<V, D, F, R> Provisioner<'_, V, D, F, R>
where
    V: VersionControl,
    D: Downloader,
    F: LocalFs,
    R: ProgressReporter,
{
    /// Bring the installation root into conformance with `manifest`.
    ///
    /// # Errors
    ///
    /// Returns the first fatal `ProvisionError` encountered.
    pub async fn run(&self, manifest: &Manifest) -> Result<ProvisionReport> {
        let mut report = ProvisionReport {
            core: repo_sync::sync_core(
                self.vcs,
                self.fs,
                self.reporter,
                self.layout,
                &manifest.core_revision,
            )
            .await?,
            ..ProvisionReport::default()
        };

        if !manifest.plugins.is_empty() {
            self.reporter.step(&format!(
                "Installing {} custom nodes...",
                manifest.plugins.len()
            ));
        }
        for collision in manifest.checkout_collisions() {
            tracing::warn!(
                name = %collision.name,
                first = %collision.first_url,
                second = %collision.second_url,
                "plugins share a checkout directory"
            );
            self.reporter.warn(&format!(
                "{} and {} both install to custom_nodes/{}; the later entry wins",
                collision.first_url, collision.second_url, collision.name
            ));
        }
        for plugin in &manifest.plugins {
            let outcome = repo_sync::sync_plugin(
                self.vcs,
                self.fs,
                self.reporter,
                self.layout,
                plugin,
            )
            .await?;
            report.plugins.push(outcome);
        }

        if !manifest.artifacts.is_empty() {
            self.reporter.step(&format!(
                "Installing {} models...",
                manifest.artifacts.len()
            ));
        }
        for artifact in &manifest.artifacts {
            let outcome = artifact_fetch::fetch_artifact(
                self.downloader,
                self.fs,
                self.reporter,
                &self.layout.root,
                artifact,
            )
            .await?;
            report.artifacts.push(outcome);
        }

        tracing::info!(changes = report.changes(), "provisioning complete");
        Ok(report)
    }
}
