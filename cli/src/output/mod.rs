//! Human-readable terminal output.
//!
//! Everything except failures goes to stdout and is dropped under `--quiet`.
//! JSON mode runs with a quiet context so stdout carries only the document.

pub mod json;
pub mod progress;
pub mod reporter;
pub mod styles;

use console::Term;
use owo_colors::OwoColorize as _;
pub use reporter::TerminalReporter;
pub use styles::Styles;

/// Width the field labels of `status` are padded to.
const LABEL_WIDTH: usize = 9;

/// Leading glyph of a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Done,
    Warning,
    Failure,
    Step,
}

impl Marker {
    #[must_use]
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Done => "✓",
            Self::Warning => "!",
            Self::Failure => "✗",
            Self::Step => "→",
        }
    }
}

/// Styling and terminal state for one run.
pub struct OutputContext {
    pub styles: Styles,
    /// Whether stdout is a terminal.
    pub is_tty: bool,
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
            styles: if colored {
                Styles::colored()
            } else {
                Styles::default()
            },
            is_tty,
            quiet,
        }
    }

    /// Spinners need a terminal and a non-quiet run.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        self.is_tty && !self.quiet
    }

    /// `marker`'s glyph in its style.
    #[must_use]
    pub fn glyph(&self, marker: Marker) -> String {
        let style = match marker {
            Marker::Done => self.styles.done,
            Marker::Warning => self.styles.warning,
            Marker::Failure => self.styles.failure,
            Marker::Step => self.styles.step,
        };
        marker.glyph().style(style).to_string()
    }

    /// Print `msg` behind `marker`. Failures go to stderr even when quiet.
    pub fn line(&self, marker: Marker, msg: &str) {
        if marker == Marker::Failure {
            eprintln!("  {} {msg}", self.glyph(marker));
        } else if !self.quiet {
            println!("  {} {msg}", self.glyph(marker));
        }
    }

    pub fn success(&self, msg: &str) {
        self.line(Marker::Done, msg);
    }

    pub fn warn(&self, msg: &str) {
        self.line(Marker::Warning, msg);
    }

    pub fn title(&self, msg: &str) {
        if !self.quiet {
            println!("  {}", msg.style(self.styles.title));
        }
    }

    /// Command output, indented under the step that produced it.
    #[must_use]
    pub fn output_line(&self, text: &str) -> String {
        format!("    {}", text.style(self.styles.label))
    }

    /// One `label  value` row, labels padded to a common width.
    pub fn field(&self, label: &str, value: &str) {
        if !self.quiet {
            let padded = format!("{label:<LABEL_WIDTH$}");
            println!("    {} {value}", padded.style(self.styles.label));
        }
    }
}
