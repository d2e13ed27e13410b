//! Application service: repository synchronization use-case.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All git and filesystem access is routed through injected port traits.

use std::path::Path;

use anyhow::Result;

use crate::application::ports::{LocalFs, ProgressReporter, VersionControl};
use crate::domain::{InstallLayout, PluginSpec, ProvisionError, RepoAction, RepoReport, Revision};

/// Source label used for the primary application checkout in reports.
pub const CORE_SOURCE: &str = "comfyui";

/// Bring one plugin checkout to its pinned revision.
///
/// A disabled plugin returns immediately without touching the filesystem or
/// the version-control client, and its URL is not validated.
///
/// # Errors
///
/// Returns `InvalidRepositoryUrl`, `Filesystem`, `Clone`, `Fetch`, or
/// `Checkout` (all wrapped in `anyhow::Error`).
pub async fn sync_plugin(
    vcs: &impl VersionControl,
    fs: &impl LocalFs,
    reporter: &impl ProgressReporter,
    layout: &InstallLayout,
    plugin: &PluginSpec,
) -> Result<RepoReport> {
    let url = plugin.repository_url.as_str();

    if plugin.disabled {
        tracing::info!(url, "plugin disabled, skipping");
        reporter.info(&format!("Skipping disabled node: {url}"));
        // A disabled entry is never validated; report the plugins dir when no name derives.
        let path = layout
            .plugin_checkout(plugin)
            .unwrap_or_else(|_| layout.plugins_dir.clone());
        return Ok(RepoReport {
            source: url.to_owned(),
            path,
            revision: plugin.revision.clone(),
            action: RepoAction::Disabled,
        });
    }

    let path = layout.plugin_checkout(plugin)?;

    fs.create_dir_all(&layout.plugins_dir)
        .map_err(|e| ProvisionError::Filesystem {
            path: layout.plugins_dir.clone(),
            detail: format!("{e:#}"),
        })?;

    let action = sync_checkout(vcs, fs, reporter, url, &path, &plugin.revision).await?;
    Ok(RepoReport {
        source: url.to_owned(),
        path,
        revision: plugin.revision.clone(),
        action,
    })
}

/// Check out the pinned core revision in the installation root.
///
/// Returns `Ok(None)` without doing anything when the core is unpinned or
/// the root is a plain directory rather than a git checkout. The core is
/// never fetched.
///
/// # Errors
///
/// Returns `Checkout` if the revision cannot be checked out.
pub async fn sync_core(
    vcs: &impl VersionControl,
    fs: &impl LocalFs,
    reporter: &impl ProgressReporter,
    layout: &InstallLayout,
    revision: &Revision,
) -> Result<Option<RepoReport>> {
    let Some(rev) = revision.pinned() else {
        tracing::debug!("core revision not pinned, leaving checkout as is");
        return Ok(None);
    };
    if !fs.exists(&layout.core_git_dir()) {
        tracing::debug!(root = %layout.root.display(), "installation root is not a git checkout");
        return Ok(None);
    }

    let action = if is_at_revision(vcs, &layout.root, rev).await {
        reporter.success(&format!("ComfyUI core already at {rev}"));
        RepoAction::AlreadySatisfied
    } else {
        reporter.step(&format!("Ensuring ComfyUI core is at {rev}..."));
        checkout(vcs, &layout.root, rev).await?;
        reporter.success(&format!("ComfyUI core checked out at {rev}"));
        RepoAction::Updated
    };

    Ok(Some(RepoReport {
        source: CORE_SOURCE.to_owned(),
        path: layout.root.clone(),
        revision: revision.clone(),
        action,
    }))
}

async fn sync_checkout(
    vcs: &impl VersionControl,
    fs: &impl LocalFs,
    reporter: &impl ProgressReporter,
    url: &str,
    path: &Path,
    revision: &Revision,
) -> Result<RepoAction> {
    let name = path
        .file_name()
        .map_or_else(|| url.to_owned(), |n| n.to_string_lossy().into_owned());

    let action = if fs.exists(path) {
        if let Some(rev) = revision.pinned() {
            if is_at_revision(vcs, path, rev).await {
                tracing::info!(url, revision = rev, "checkout already at pinned revision");
                reporter.success(&format!("{name} already at {rev}"));
                return Ok(RepoAction::AlreadySatisfied);
            }
        }
        reporter.step(&format!("Repo exists at {}, fetching...", path.display()));
        tracing::info!(url, path = %path.display(), "fetching origin");
        vcs.fetch_origin(path)
            .await
            .map_err(|e| ProvisionError::Fetch {
                repo: path.to_path_buf(),
                detail: format!("{e:#}"),
            })?;
        reporter.success(&format!("Fetched {name}"));
        RepoAction::Updated
    } else {
        reporter.step(&format!("Cloning {url} to {}...", path.display()));
        tracing::info!(url, path = %path.display(), "cloning");
        vcs.clone_repo(url, path)
            .await
            .map_err(|e| ProvisionError::Clone {
                url: url.to_owned(),
                dest: path.to_path_buf(),
                detail: format!("{e:#}"),
            })?;
        reporter.success(&format!("Cloned {name}"));
        RepoAction::Cloned
    };

    match revision {
        Revision::Pinned(rev) => {
            reporter.step(&format!("Checking out {rev} for {name}..."));
            checkout(vcs, path, rev).await?;
            reporter.success(&format!("{name} at {rev}"));
        }
        Revision::Unpinned => {
            tracing::warn!(url, "no revision pinned, using fetched HEAD");
            reporter.warn(&format!(
                "No hash specified for {name}, using HEAD (not reproducible)"
            ));
        }
    }
    Ok(action)
}

async fn checkout(vcs: &impl VersionControl, repo: &Path, revision: &str) -> Result<()> {
    tracing::info!(repo = %repo.display(), revision, "checking out");
    vcs.checkout(repo, revision)
        .await
        .map_err(|e| ProvisionError::Checkout {
            repo: repo.to_path_buf(),
            revision: revision.to_owned(),
            detail: format!("{e:#}"),
        })?;
    Ok(())
}

/// `true` only when both `HEAD` and `revision` resolve locally to the same commit.
///
/// Resolution failures are treated as "not there yet"; the fetch or checkout
/// that follows reports the real error.
async fn is_at_revision(vcs: &impl VersionControl, repo: &Path, revision: &str) -> bool {
    let Some(head) = resolve_local(vcs, repo, "HEAD").await else {
        return false;
    };
    resolve_local(vcs, repo, revision)
        .await
        .is_some_and(|target| target == head)
}

async fn resolve_local(vcs: &impl VersionControl, repo: &Path, revision: &str) -> Option<String> {
    match vcs.resolve_commit(repo, revision).await {
        Ok(commit) => commit,
        Err(e) => {
            tracing::debug!(repo = %repo.display(), revision, error = %e, "cannot resolve revision");
            None
        }
    }
}
