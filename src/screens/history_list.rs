use super::{hint, navigate_hint, pressed_key, render_rows, row_item, Row, Screen, ScreenAction};
use super::{CommitDetailScreen, RenderContext, ScreenContext};
use crate::backend::{Commit, HistoryStream, Repository};
use crate::keymap::{Action, Keymap};
use crate::styles::theme;
use crate::utils::{truncate, ListStateExt, TITLE_LIMIT};
use anyhow::Result;
use crossterm::event::Event;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{ListItem, ListState};
use ratatui::Frame;
use tracing::info;

/// Commits pulled from the stream per batch
pub const HISTORY_BATCH_SIZE: usize = 9;

const LOAD_MORE: &str = "Load More...";

/// One rendered line of the history list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryRow {
    Commit { title: String, hash: String },
    LoadMore,
}

/// Paged commit history of one repository.
///
/// The screen keeps one commit of lookahead so the "Load More..." row is
/// only offered while the stream still has commits to give.
pub struct HistoryListScreen {
    repo: Repository,
    stream: HistoryStream,
    commits: Vec<Commit>,
    lookahead: Option<Commit>,
    list_state: ListState,
}

impl HistoryListScreen {
    /// Build the screen and pull the first batch. Stream errors are returned.
    pub fn new(repo: Repository, stream: HistoryStream) -> Result<Self> {
        let mut screen = Self {
            repo,
            stream,
            commits: Vec::new(),
            lookahead: None,
            list_state: ListState::default(),
        };
        screen.load_batch()?;
        screen.list_state.select_first_item(screen.row_count());
        Ok(screen)
    }

    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    pub fn commits(&self) -> &[Commit] {
        &self.commits
    }

    pub fn has_more(&self) -> bool {
        self.lookahead.is_some()
    }

    pub fn rows(&self) -> Vec<HistoryRow> {
        let mut rows: Vec<HistoryRow> = self
            .commits
            .iter()
            .map(|commit| HistoryRow::Commit {
                title: truncate(&commit.message, TITLE_LIMIT),
                hash: commit.hash.clone(),
            })
            .collect();
        if self.has_more() {
            rows.push(HistoryRow::LoadMore);
        }
        rows
    }

    pub fn select(&mut self, index: usize) {
        if index < self.row_count() {
            self.list_state.select(Some(index));
        }
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.list_state.selected()
    }

    fn row_count(&self) -> usize {
        self.commits.len() + usize::from(self.has_more())
    }

    fn pull(&mut self) -> Result<Option<Commit>> {
        if let Some(commit) = self.lookahead.take() {
            return Ok(Some(commit));
        }
        self.stream.next().transpose()
    }

    /// Append up to one batch of commits. Returns how many were added.
    pub fn load_batch(&mut self) -> Result<usize> {
        let mut loaded = 0;
        while loaded < HISTORY_BATCH_SIZE {
            match self.pull()? {
                Some(commit) => {
                    self.commits.push(commit);
                    loaded += 1;
                }
                None => break,
            }
        }
        // A short batch means the stream is already exhausted
        self.lookahead = if loaded == HISTORY_BATCH_SIZE {
            self.pull()?
        } else {
            None
        };
        info!(
            "Loaded {} commits of {} ({} total, more: {})",
            loaded,
            self.repo.name,
            self.commits.len(),
            self.has_more()
        );
        Ok(loaded)
    }

    fn activate(&mut self, index: usize) -> Result<ScreenAction> {
        if let Some(commit) = self.commits.get(index) {
            let detail = CommitDetailScreen::new(self.repo.clone(), commit.clone());
            return Ok(ScreenAction::Push(Box::new(detail)));
        }
        if index == self.commits.len() && self.has_more() {
            let first_new = self.commits.len();
            self.load_batch()?;
            self.select(first_new);
        }
        Ok(ScreenAction::None)
    }
}

impl Screen for HistoryListScreen {
    fn title(&self) -> String {
        format!("History of {}", self.repo.name)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, _ctx: &RenderContext) -> Result<()> {
        let t = theme();
        let items = self
            .rows()
            .into_iter()
            .map(|row| match row {
                HistoryRow::Commit { title, hash } => {
                    row_item(&Row::new(title, hash), true)
                }
                HistoryRow::LoadMore => {
                    ListItem::new(Line::from(Span::styled(LOAD_MORE, t.emphasis_style())))
                }
            })
            .collect();
        let title = format!("{} ({} commits)", self.title(), self.commits.len());
        render_rows(
            frame,
            area,
            &title,
            items,
            &mut self.list_state,
            "This repository has no commits yet.",
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

        if self.list_state.apply_navigation(action, self.row_count()) {
            return Ok(ScreenAction::None);
        }

        match action {
            Action::Confirm => match self.list_state.selected() {
                Some(index) => self.activate(index),
                None => Ok(ScreenAction::None),
            },
            Action::Cancel => Ok(ScreenAction::Pop),
            _ => Ok(ScreenAction::None),
        }
    }

    fn footer_hint(&self, keymap: &Keymap) -> String {
        [
            navigate_hint(keymap),
            hint(keymap, Action::Confirm, "Open"),
            hint(keymap, Action::Cancel, "Back"),
            hint(keymap, Action::Help, "Help"),
        ]
        .join(" | ")
    }
}
