//! Status markers and the colors they are drawn in.

use owo_colors::Style;

/// Kind of status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// About to do something.
    Step,
    /// Something finished.
    Success,
    /// Non-fatal problem the user should know about.
    Warn,
    /// Something was deliberately skipped.
    Info,
    /// Fatal failure.
    Error,
}

impl Marker {
    #[must_use]
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Step => "→",
            Self::Success => "✓",
            Self::Warn => "!",
            Self::Info => "ℹ",
            Self::Error => "✗",
        }
    }
}

/// Colors for markers and summary text. The default palette is plain.
#[derive(Debug, Clone, Copy, Default)]
pub struct Palette {
    step: Style,
    success: Style,
    warn: Style,
    info: Style,
    error: Style,
    pub dim: Style,
    pub header: Style,
}

impl Palette {
    /// ANSI palette for color terminals.
    #[must_use]
    pub fn ansi() -> Self {
        Self {
            step: Style::new().cyan(),
            success: Style::new().green(),
            warn: Style::new().yellow(),
            info: Style::new().blue(),
            error: Style::new().red(),
            dim: Style::new().dimmed(),
            header: Style::new().bold().cyan(),
        }
    }

    #[must_use]
    pub fn marker(&self, marker: Marker) -> Style {
        match marker {
            Marker::Step => self.step,
            Marker::Success => self.success,
            Marker::Warn => self.warn,
            Marker::Info => self.info,
            Marker::Error => self.error,
        }
    }
}
