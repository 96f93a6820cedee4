//! Screen trait and associated types.
//!
//! Screens own their state, render themselves into the body area the app
//! gives them and turn input events into a [`ScreenAction`]. They never touch
//! the navigation stack or the backend directly: navigation and backend work
//! are requested through the returned action and carried out by the app.

use crate::backend::CloneProgress;
use crate::config::Config;
use crate::keymap::Keymap;
use crate::services::Request;
use anyhow::Result;
use crossterm::event::Event;
use ratatui::layout::Rect;
use ratatui::Frame;
use std::fmt;

/// Read-only resources for rendering
pub struct RenderContext<'a> {
    pub config: &'a Config,
}

impl<'a> RenderContext<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }
}

/// Read-only resources for event handling
pub struct ScreenContext<'a> {
    pub config: &'a Config,
}

impl<'a> ScreenContext<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    pub fn keymap(&self) -> &Keymap {
        &self.config.keymap
    }
}

/// What a screen asks the app to do after handling an event
#[derive(Default)]
pub enum ScreenAction {
    /// Stay on the current screen
    #[default]
    None,
    /// Return to the previous screen
    Pop,
    /// Show a screen built from data the screen already holds
    Push(Box<dyn Screen>),
    /// Run a backend request; its result decides the next screen
    Request(Request),
    /// The activated item has no behavior yet
    Unsupported(String),
    ShowHelp,
    Quit,
}

impl fmt::Debug for ScreenAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScreenAction::None => write!(f, "None"),
            ScreenAction::Pop => write!(f, "Pop"),
            ScreenAction::Push(screen) => write!(f, "Push({})", screen.title()),
            ScreenAction::Request(request) => f.debug_tuple("Request").field(request).finish(),
            ScreenAction::Unsupported(reason) => {
                f.debug_tuple("Unsupported").field(reason).finish()
            }
            ScreenAction::ShowHelp => write!(f, "ShowHelp"),
            ScreenAction::Quit => write!(f, "Quit"),
        }
    }
}

/// A full-page view in the navigation stack.
///
/// # Example
///
/// ```rust,ignore
/// struct MyScreen {
///     list_state: ListState,
/// }
///
/// impl Screen for MyScreen {
///     fn title(&self) -> String {
///         "My Screen".to_string()
///     }
///
///     fn render(&mut self, frame: &mut Frame, area: Rect, ctx: &RenderContext) -> Result<()> {
///         Ok(())
///     }
///
///     fn handle_event(&mut self, event: Event, ctx: &ScreenContext) -> Result<ScreenAction> {
///         Ok(ScreenAction::Pop)
///     }
///
///     fn footer_hint(&self, keymap: &Keymap) -> String {
///         keymap.footer_navigation()
///     }
/// }
/// ```
pub trait Screen: Send {
    /// Title shown in the header and the breadcrumb
    fn title(&self) -> String;

    fn render(&mut self, frame: &mut Frame, area: Rect, ctx: &RenderContext) -> Result<()>;

    /// Handle an input event.
    ///
    /// Errors are fatal: they end the event loop.
    fn handle_event(&mut self, event: Event, ctx: &ScreenContext) -> Result<ScreenAction>;

    /// Key hints for the footer, written as `"keys: Label | ..."`
    fn footer_hint(&self, keymap: &Keymap) -> String;

    /// When true, global shortcuts (quit, help) are typed into the field instead.
    fn is_input_focused(&self) -> bool {
        false
    }

    /// Called when the screen becomes visible for the first time.
    fn on_enter(&mut self, _ctx: &ScreenContext) -> Result<()> {
        Ok(())
    }

    /// Called when the screen leaves the stack (popped or replaced).
    fn on_exit(&mut self) {}

    /// Progress of a clone started by this screen
    fn on_clone_progress(&mut self, _progress: &CloneProgress) {}
}
