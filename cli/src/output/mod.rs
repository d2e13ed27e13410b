//! Terminal and JSON presentation.
//!
//! Status lines go to stdout so they interleave with git's own progress;
//! fatal errors go to stderr. `--quiet` and `--json` silence everything on
//! stdout except the final JSON document.

pub mod human;
pub mod json;
pub mod palette;
pub mod reporter;

use console::Term;
use owo_colors::OwoColorize as _;
pub use palette::{Marker, Palette};
pub use reporter::TerminalReporter;

/// Where and how status output is drawn.
pub struct OutputContext {
    pub palette: Palette,
    /// Whether stdout is a terminal.
    pub is_tty: bool,
    /// Suppress everything but errors.
    pub quiet: bool,
}

impl OutputContext {
    /// Colors are used only on a terminal, and never with `--no-color` or
    /// `NO_COLOR` set.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let colored = is_tty && !no_color && std::env::var_os("NO_COLOR").is_none();
        Self {
            palette: if colored { Palette::ansi() } else { Palette::default() },
            is_tty,
            quiet,
        }
    }

    /// Download progress bars are drawn only on an interactive, non-quiet stdout.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        self.is_tty && !self.quiet
    }

    /// `  <glyph> message`, or `None` when quiet. Errors are never silenced.
    #[must_use]
    pub fn status_line(&self, marker: Marker, msg: &str) -> Option<String> {
        if self.quiet && marker != Marker::Error {
            return None;
        }
        Some(format!(
            "  {} {msg}",
            marker.glyph().style(self.palette.marker(marker))
        ))
    }

    /// Status line on stdout, unless quiet.
    pub fn status(&self, marker: Marker, msg: &str) {
        if let Some(line) = self.status_line(marker, msg) {
            println!("{line}");
        }
    }

    /// Error line on stderr. Printed even when quiet.
    pub fn error(&self, msg: &str) {
        if let Some(line) = self.status_line(Marker::Error, msg) {
            eprintln!("{line}");
        }
    }

    pub fn header(&self, msg: &str) {
        if !self.quiet {
            println!("  {}", msg.style(self.palette.header));
        }
    }

    /// Summary row with a dimmed label.
    pub fn kv(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("  {}  {value}", key.style(self.palette.dim));
        }
    }
}
