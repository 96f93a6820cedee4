//! Input field and pane border styles, derived from the active theme.

use crate::styles::{theme, ThemeType};
use ratatui::prelude::*;

/// Border style for a focused pane or input
pub fn focused_border_style() -> Style {
    theme().border_focused_style()
}

/// Border style for an unfocused pane or input
pub fn unfocused_border_style() -> Style {
    theme().border_style()
}

/// Border style for an input that cannot be edited (e.g. while cloning)
pub fn disabled_border_style() -> Style {
    theme().disabled_style()
}

/// Text style for an input that cannot be edited
pub fn disabled_text_style() -> Style {
    theme().disabled_style()
}

/// Placeholder text shown in empty inputs
pub fn input_placeholder_style() -> Style {
    theme().muted_style()
}

/// Typed text in inputs
pub fn input_text_style() -> Style {
    let t = theme();
    if t.theme_type == ThemeType::NoColor {
        return Style::default();
    }
    Style::default().fg(t.text)
}
