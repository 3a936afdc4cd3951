//! `TerminalReporter`: Presentation-layer implementation of `ProgressReporter`.
//!
//! Wraps `&OutputContext` and implements the `application::ports::ProgressReporter`
//! trait so application services can emit progress events without depending on
//! any presentation type directly.

use std::cell::RefCell;

use indicatif::ProgressBar;

use crate::application::ports::ProgressReporter;
use crate::output::{Marker, OutputContext, progress};

/// Terminal progress reporter that wraps an `OutputContext`.
///
/// On a TTY each `step()` runs under a spinner that is closed with `✓` when
/// the next event arrives, or with `!` on `warn()`. Off a TTY it prints
/// `"  → {message}"` lines. Non-empty lines of command output are printed
/// indented under the step. Everything is suppressed when `ctx.quiet`.
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
    active: RefCell<Option<ProgressBar>>,
}

impl<'a> TerminalReporter<'a> {
    /// Create a new `TerminalReporter` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self {
            ctx,
            active: RefCell::new(None),
        }
    }

    fn finish_active(&self, marker: Marker) {
        if let Some(pb) = self.active.borrow_mut().take() {
            progress::finish_with(&pb, &self.ctx.glyph(marker));
        }
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn step(&self, message: &str) {
        if self.ctx.quiet {
            return;
        }
        self.finish_active(Marker::Done);
        if self.ctx.show_progress() {
            *self.active.borrow_mut() = Some(progress::spinner(message));
        } else {
            self.ctx.line(Marker::Step, message);
        }
    }

    fn success(&self, message: &str) {
        if self.ctx.quiet {
            return;
        }
        self.finish_active(Marker::Done);
        self.ctx.success(message);
    }

    fn warn(&self, message: &str) {
        if self.ctx.quiet {
            return;
        }
        self.finish_active(Marker::Warning);
        self.ctx.warn(message);
    }

    fn output(&self, text: &str) {
        if self.ctx.quiet {
            return;
        }
        let active = self.active.borrow();
        for line in text.lines().map(str::trim_end).filter(|l| !l.trim().is_empty()) {
            let rendered = self.ctx.output_line(line);
            match active.as_ref() {
                Some(pb) => pb.println(rendered),
                None => println!("{rendered}"),
            }
        }
    }
}

impl Drop for TerminalReporter<'_> {
    fn drop(&mut self) {
        if let Some(pb) = self.active.get_mut().take() {
            pb.finish_and_clear();
        }
    }
}
