//! Semantic actions triggered by keyboard shortcuts.

use serde::{Deserialize, Serialize};

/// All user actions the screens understand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    // Navigation
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    PageUp,
    PageDown,
    GoToTop,
    GoToEnd,
    /// Jump to start of input
    Home,
    /// Jump to end of input
    End,

    // Selection
    /// Activate the selected row / submit a form
    Confirm,
    /// Go back one screen
    Cancel,

    // Global
    Quit,
    Help,

    // Screen-specific
    /// Open the clone form from the repository list
    Create,
    /// Reload the current listing from the backend
    Refresh,

    // Text editing
    Backspace,
    DeleteChar,

    // Form fields
    NextField,
    PrevField,
}

impl Action {
    /// Human-readable description used by the help overlay
    pub fn description(&self) -> &'static str {
        match self {
            Action::MoveUp => "Move up",
            Action::MoveDown => "Move down",
            Action::MoveLeft => "Move left",
            Action::MoveRight => "Move right",
            Action::PageUp => "Page up",
            Action::PageDown => "Page down",
            Action::GoToTop => "Go to top",
            Action::GoToEnd => "Go to end",
            Action::Home => "Start of input",
            Action::End => "End of input",
            Action::Confirm => "Open / submit",
            Action::Cancel => "Go back",
            Action::Quit => "Quit",
            Action::Help => "Show help",
            Action::Create => "Clone a repository",
            Action::Refresh => "Refresh",
            Action::Backspace => "Delete previous character",
            Action::DeleteChar => "Delete character",
            Action::NextField => "Next field",
            Action::PrevField => "Previous field",
        }
    }

    /// Category for grouping in the help overlay
    pub fn category(&self) -> &'static str {
        match self {
            Action::MoveUp
            | Action::MoveDown
            | Action::MoveLeft
            | Action::MoveRight
            | Action::PageUp
            | Action::PageDown
            | Action::GoToTop
            | Action::GoToEnd
            | Action::Home
            | Action::End => "Navigation",

            Action::Confirm | Action::Cancel => "Selection",

            Action::Quit | Action::Help => "Global",

            Action::Create | Action::Refresh => "Repositories",

            Action::Backspace | Action::DeleteChar => "Text Editing",

            Action::NextField | Action::PrevField => "Form",
        }
    }
}
