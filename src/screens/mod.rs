//! Screens of the repository browser.
//!
//! Each screen owns its state and exposes a plain view description (rows or
//! sections) that its `render` draws and that tests can inspect directly.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                        App                           │
//! │   NavigationStack<ScreenEntry>                       │
//! │     RepoList ─push─► History ─push─► CommitDetail    │
//! │        │                               │  ▲  │       │
//! │        │push                       push│  └──┘peer   │
//! │        ▼                               ▼  (parent)   │
//! │     CloneForm                       FileList         │
//! │                                                      │
//! │   Screen trait                                       │
//! │     render(frame, area, ctx)                         │
//! │     handle_event(event, ctx) -> ScreenAction         │
//! └──────────────────────────────────────────────────────┘
//! ```

pub mod clone_form;
pub mod commit_detail;
pub mod file_list;
pub mod history_list;
pub mod repo_list;
pub mod screen_trait;

pub use clone_form::CloneFormScreen;
pub use commit_detail::{CommitDetailScreen, Link, Section};
pub use file_list::{FileListScreen, UNSUPPORTED_FILE_VIEW};
pub use history_list::{HistoryListScreen, HistoryRow, HISTORY_BATCH_SIZE};
pub use repo_list::RepoListScreen;
pub use screen_trait::{RenderContext, Screen, ScreenAction, ScreenContext};

use crate::keymap::{Action, Keymap};
use crate::styles::{theme, LIST_HIGHLIGHT_SYMBOL};
use crossterm::event::{Event, KeyEvent, KeyEventKind};
use ratatui::layout::{Alignment, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, List, ListItem, ListState, Padding, Paragraph, Wrap};
use ratatui::Frame;

/// One selectable line of a list screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub primary: String,
    pub secondary: String,
}

impl Row {
    pub fn new(primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            secondary: secondary.into(),
        }
    }
}

/// Key presses only; releases and repeats reported by some terminals are ignored.
pub(crate) fn pressed_key(event: &Event) -> Option<KeyEvent> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => Some(*key),
        _ => None,
    }
}

pub(crate) fn screen_block(title: &str) -> Block<'_> {
    let t = theme();
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(t.border_focused_style())
        .title(format!(" {} ", title))
        .title_style(t.title_style())
        .padding(Padding::horizontal(1))
}

/// Draw rows as a two-column list; `empty_hint` replaces an empty list.
pub(crate) fn render_rows(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    items: Vec<ListItem<'static>>,
    state: &mut ListState,
    empty_hint: &str,
) {
    let t = theme();
    let block = screen_block(title);
    if items.is_empty() {
        let hint = Paragraph::new(empty_hint)
            .block(block)
            .style(t.muted_style())
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(hint, area);
        return;
    }
    let list = List::new(items)
        .block(block)
        .highlight_style(t.highlight_style())
        .highlight_symbol(LIST_HIGHLIGHT_SYMBOL);
    frame.render_stateful_widget(list, area, state);
}

/// Standard two-span row: emphasized primary text, muted secondary text
pub(crate) fn row_item(row: &Row, secondary_is_hash: bool) -> ListItem<'static> {
    let t = theme();
    let secondary_style = if secondary_is_hash {
        t.hash_style()
    } else {
        t.muted_style()
    };
    let mut spans = vec![Span::styled(row.primary.clone(), t.text_style())];
    if !row.secondary.is_empty() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(row.secondary.clone(), secondary_style));
    }
    ListItem::new(Line::from(spans))
}

/// Footer hint for one action, using the key actually bound to it
pub(crate) fn hint(keymap: &Keymap, action: Action, label: &str) -> String {
    format!("{}: {}", keymap.get_key_display_for_action(action), label)
}

/// Footer hint for list navigation (up/down keys)
pub(crate) fn navigate_hint(keymap: &Keymap) -> String {
    format!("{}: Navigate", keymap.navigation_display())
}
