//! Human-readable terminal renderer.

use crate::domain::{ArtifactStatus, DestinationAction, ProvisionReport, RepoAction};
use crate::output::{Marker, OutputContext};

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the end-of-run summary.
    pub fn render_summary(&self, report: &ProvisionReport) {
        if self.ctx.quiet {
            return;
        }
        println!();
        self.ctx.header("Summary:");
        if let Some(core) = &report.core {
            self.ctx.kv("Core:", repo_action_display(core.action));
        }
        if !report.plugins.is_empty() {
            self.ctx.kv("Nodes:", &plugin_counts(report));
        }
        if !report.artifacts.is_empty() {
            self.ctx.kv("Models:", &artifact_counts(report));
        }
        println!();
        let changes = report.changes();
        self.ctx.status(
            Marker::Success,
            &format!(
                "Comfy-Lock installation complete ({changes} {}).",
                if changes == 1 { "change" } else { "changes" }
            ),
        );
    }
}

fn repo_action_display(action: RepoAction) -> &'static str {
    match action {
        RepoAction::Disabled => "disabled",
        RepoAction::AlreadySatisfied => "already satisfied",
        RepoAction::Cloned => "cloned",
        RepoAction::Updated => "updated",
    }
}

fn plugin_counts(report: &ProvisionReport) -> String {
    let count = |action| report.plugins.iter().filter(|p| p.action == action).count();
    format!(
        "{} cloned, {} updated, {} already satisfied, {} disabled",
        count(RepoAction::Cloned),
        count(RepoAction::Updated),
        count(RepoAction::AlreadySatisfied),
        count(RepoAction::Disabled)
    )
}

fn artifact_counts(report: &ProvisionReport) -> String {
    let destinations = || report.artifacts.iter().flat_map(|a| &a.destinations);
    let downloaded = destinations()
        .filter(|d| d.action == DestinationAction::Downloaded)
        .count();
    let present = destinations()
        .filter(|d| d.action == DestinationAction::AlreadyPresent)
        .count();
    let skipped = report
        .artifacts
        .iter()
        .filter(|a| a.status == ArtifactStatus::SkippedNoSource)
        .count();
    format!("{downloaded} downloaded, {present} already present, {skipped} without URL")
}
