//! `ProgressReporter` over the terminal.

use crate::application::ports::ProgressReporter;
use crate::output::{Marker, OutputContext};

/// Sends service progress events to `OutputContext` as marker lines.
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
}

impl<'a> TerminalReporter<'a> {
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn step(&self, message: &str) {
        self.ctx.status(Marker::Step, message);
    }

    fn success(&self, message: &str) {
        self.ctx.status(Marker::Success, message);
    }

    fn warn(&self, message: &str) {
        self.ctx.status(Marker::Warn, message);
    }

    fn info(&self, message: &str) {
        self.ctx.status(Marker::Info, message);
    }
}
