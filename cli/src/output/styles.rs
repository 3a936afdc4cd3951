//! Terminal colors for status lines.

use owo_colors::Style;

/// Styles for status glyphs, field labels and titles. Every style is plain
/// unless built by [`Styles::colored`].
#[derive(Debug, Default, Clone, Copy)]
pub struct Styles {
    pub done: Style,
    pub warning: Style,
    pub failure: Style,
    pub step: Style,
    pub label: Style,
    pub title: Style,
}

impl Styles {
    #[must_use]
    pub fn colored() -> Self {
        Self {
            done: Style::new().green(),
            warning: Style::new().yellow(),
            failure: Style::new().red().bold(),
            step: Style::new().cyan(),
            label: Style::new().dimmed(),
            title: Style::new().bold(),
        }
    }
}
