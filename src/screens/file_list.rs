use super::{hint, navigate_hint, pressed_key, render_rows, row_item, Row, Screen, ScreenAction};
use super::{RenderContext, ScreenContext};
use crate::backend::{Repository, TreeEntry};
use crate::keymap::{Action, Keymap};
use crate::utils::{short_hash, ListStateExt};
use anyhow::Result;
use crossterm::event::Event;
use ratatui::layout::Rect;
use ratatui::widgets::ListState;
use ratatui::Frame;

/// Outcome of activating a file row
pub const UNSUPPORTED_FILE_VIEW: &str = "Viewing file contents is not supported yet";

/// One level of a tree: a row per entry.
pub struct FileListScreen {
    repo: Repository,
    tree_id: String,
    entries: Vec<TreeEntry>,
    list_state: ListState,
}

impl FileListScreen {
    pub fn new(repo: Repository, tree_id: impl Into<String>, entries: Vec<TreeEntry>) -> Self {
        let mut list_state = ListState::default();
        list_state.select_first_item(entries.len());
        Self {
            repo,
            tree_id: tree_id.into(),
            entries,
            list_state,
        }
    }

    pub fn tree_id(&self) -> &str {
        &self.tree_id
    }

    /// Entry name (with a kind marker) and full hash
    pub fn rows(&self) -> Vec<Row> {
        self.entries
            .iter()
            .map(|entry| {
                Row::new(
                    format!("{}{}", entry.name, entry.kind.marker().trim()),
                    entry.hash.clone(),
                )
            })
            .collect()
    }
}

impl Screen for FileListScreen {
    fn title(&self) -> String {
        format!("{} tree {}", self.repo.name, short_hash(&self.tree_id))
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, _ctx: &RenderContext) -> Result<()> {
        let items = self.rows().iter().map(|row| row_item(row, true)).collect();
        render_rows(
            frame,
            area,
            &self.title(),
            items,
            &mut self.list_state,
            "This tree is empty.",
        );
        Ok(())
    }

    fn handle_event(&mut self, event: Event, ctx: &ScreenContext) -> Result<ScreenAction> {
        let Some(key) = pressed_key(&event) else {
            return Ok(ScreenAction::None);
        };
        let Some(action) = ctx.keymap().get_action(key.code, key.modifiers) else {
            return Ok(ScreenAction::None);
        };

        if self.list_state.apply_navigation(action, self.entries.len()) {
            return Ok(ScreenAction::None);
        }

        Ok(match action {
            Action::Confirm if self.list_state.selected().is_some() => {
                ScreenAction::Unsupported(UNSUPPORTED_FILE_VIEW.to_string())
            }
            Action::Cancel => ScreenAction::Pop,
            _ => ScreenAction::None,
        })
    }

    fn footer_hint(&self, keymap: &Keymap) -> String {
        [
            navigate_hint(keymap),
            hint(keymap, Action::Cancel, "Back"),
            hint(keymap, Action::Help, "Help"),
        ]
        .join(" | ")
    }
}
