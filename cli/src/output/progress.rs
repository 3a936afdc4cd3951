//! Spinners for provisioning steps.

#![allow(clippy::expect_used)] // Templates are compile-time constants

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

const TICK: Duration = Duration::from_millis(100);
const FRAMES: &[&str] = &["◐", "◓", "◑", "◒", " "];

/// A ticking spinner showing `msg`.
///
/// # Panics
///
/// Never in practice: the template is a constant.
#[must_use]
pub fn spinner(msg: &str) -> ProgressBar {
    let style = ProgressStyle::with_template("  {spinner:.cyan} {msg}")
        .expect("valid template")
        .tick_strings(FRAMES);
    let pb = ProgressBar::new_spinner()
        .with_style(style)
        .with_message(msg.to_string());
    pb.enable_steady_tick(TICK);
    pb
}

/// Freeze `pb` as `<glyph> <message>`.
///
/// # Panics
///
/// Never in practice: the template is a constant.
pub fn finish_with(pb: &ProgressBar, glyph: &str) {
    pb.set_style(ProgressStyle::with_template("  {prefix} {msg}").expect("valid template"));
    pb.set_prefix(glyph.to_string());
    pb.finish();
}
