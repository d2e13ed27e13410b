//! `comfy-lock [LOCK_FILE]`: install everything the lock file pins.

use std::path::Path;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::ports::ProgressReporter;
use crate::application::services::provision::Provisioner;
use crate::domain::resolve_manifest_path;
use crate::infra::fs::StdFs;
use crate::infra::git::GitClient;
use crate::infra::http::UreqDownloader;
use crate::infra::manifest::load_manifest;
use crate::output::human::HumanRenderer;
use crate::output::json;

/// Resolve and load the lock file, provision the installation root, and
/// render the result.
///
/// # Errors
///
/// Returns the first fatal error; nothing after it is attempted.
pub async fn run(app: &AppContext, lock_file: Option<&Path>) -> Result<()> {
    let reporter = app.reporter();
    let path = resolve_manifest_path(lock_file);
    reporter.step(&format!("Loading lock file: {}", path.display()));
    let manifest = load_manifest(&path)?;

    let config = &app.config;
    let layout = config.layout();
    tracing::info!(
        lock_file = %path.display(),
        root = %layout.root.display(),
        git = %config.git_program,
        "starting provisioning"
    );

    let vcs = GitClient::system(&config.git_program, config.git_timeout);
    let downloader = UreqDownloader::new(config.download_timeout, app.output.show_progress());
    let provisioner = Provisioner {
        vcs: &vcs,
        downloader: &downloader,
        fs: &StdFs,
        reporter: &reporter,
        layout: &layout,
    };
    let report = provisioner.run(&manifest).await?;

    if app.is_json() {
        println!("{}", json::format_report(&report)?);
    } else {
        HumanRenderer::new(&app.output).render_summary(&report);
    }
    Ok(())
}
