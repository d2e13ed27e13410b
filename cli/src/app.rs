//! Per-invocation state handed to the install command.

use crate::domain::ProvisionerConfig;
use crate::output::{OutputContext, TerminalReporter};

/// How the final result is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Status lines plus a summary.
    Human,
    /// A single JSON document on stdout.
    Json,
}

/// Presentation flags and settings collected from the command line.
pub struct AppFlags {
    pub no_color: bool,
    pub quiet: bool,
    pub json: bool,
    pub config: ProvisionerConfig,
}

pub struct AppContext {
    pub output: OutputContext,
    pub mode: OutputMode,
    pub config: ProvisionerConfig,
}

impl AppContext {
    /// JSON mode implies quiet so stdout carries only the JSON document.
    #[must_use]
    pub fn new(flags: &AppFlags) -> Self {
        let mode = if flags.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };
        Self {
            output: OutputContext::new(flags.no_color, flags.quiet || flags.json),
            mode,
            config: flags.config.clone(),
        }
    }

    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Reporter the provisioning services print through.
    #[must_use]
    pub fn reporter(&self) -> TerminalReporter<'_> {
        TerminalReporter::new(&self.output)
    }
}
