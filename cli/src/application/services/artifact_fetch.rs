//! Application service: artifact download use-case.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::path::Path;

use anyhow::Result;

use crate::application::ports::{Downloader, LocalFs, ProgressReporter};
use crate::domain::{
    ArtifactReport, ArtifactSpec, ArtifactStatus, DestinationAction, DestinationReport,
    ProvisionError,
};

/// Materialize one artifact at each of its destinations under `root`.
///
/// A destination that already holds a non-empty file is left alone: there is
/// no checksum, so a changed remote file is not picked up. Empty files are
/// downloaded again.
///
/// # Errors
///
/// Returns `InvalidDestination`, `Filesystem`, or `Download` for the first
/// destination that fails; later destinations are not attempted.
pub async fn fetch_artifact(
    downloader: &impl Downloader,
    fs: &impl LocalFs,
    reporter: &impl ProgressReporter,
    root: &Path,
    artifact: &ArtifactSpec,
) -> Result<ArtifactReport> {
    let Some(url) = artifact.source_url.as_deref() else {
        tracing::info!(model = artifact.display_name(), "model has no url, skipping");
        reporter.info(&format!(
            "Skipping model without URL: {}",
            artifact.display_name()
        ));
        return Ok(ArtifactReport {
            identifier: artifact.identifier.clone(),
            source_url: None,
            status: ArtifactStatus::SkippedNoSource,
            destinations: Vec::new(),
        });
    };

    let mut destinations = Vec::with_capacity(artifact.destinations.len());
    for destination in &artifact.destinations {
        let dest = destination.resolve(root)?;
        if let Some(parent) = dest.parent() {
            fs.create_dir_all(parent)
                .map_err(|e| ProvisionError::Filesystem {
                    path: parent.to_path_buf(),
                    detail: format!("{e:#}"),
                })?;
        }

        let action = if fs.file_size(&dest).is_some_and(|len| len > 0) {
            tracing::info!(dest = %dest.display(), "destination already present");
            reporter.info(&format!(
                "File {} already exists, skipping download",
                dest.display()
            ));
            DestinationAction::AlreadyPresent
        } else {
            reporter.step(&format!("Downloading {url} to {}...", dest.display()));
            tracing::info!(url, dest = %dest.display(), "downloading");
            downloader
                .download(url, &dest)
                .await
                .map_err(|e| ProvisionError::Download {
                    url: url.to_owned(),
                    dest: dest.clone(),
                    detail: format!("{e:#}"),
                })?;
            reporter.success(&format!("Downloaded {}", dest.display()));
            DestinationAction::Downloaded
        };
        destinations.push(DestinationReport { path: dest, action });
    }

    Ok(ArtifactReport {
        identifier: artifact.identifier.clone(),
        source_url: Some(url.to_owned()),
        status: ArtifactStatus::Installed,
        destinations,
    })
}
