use super::{hint, navigate_hint, pressed_key, render_rows, row_item, Row, Screen, ScreenAction};
use super::{CloneFormScreen, RenderContext, ScreenContext};
use crate::backend::Repository;
use crate::keymap::{Action, Keymap};
use crate::services::Request;
use crate::utils::ListStateExt;
use anyhow::Result;
use crossterm::event::Event;
use ratatui::layout::Rect;
use ratatui::widgets::ListState;
use ratatui::Frame;
use tracing::debug;

/// Root screen: one row per repository.
pub struct RepoListScreen {
    repos: Vec<Repository>,
    can_add: bool,
    loading: bool,
    list_state: ListState,
}

impl RepoListScreen {
    pub const TITLE: &'static str = "Git Repositories";
    pub const ADD_LABEL: &'static str = "Clone a repository";

    pub fn new(repos: Vec<Repository>, can_add: bool) -> Self {
        let mut list_state = ListState::default();
        list_state.select_first_item(repos.len());
        Self {
            repos,
            can_add,
            loading: false,
            list_state,
        }
    }

    /// Placeholder shown while the first listing is fetched
    pub fn loading(can_add: bool) -> Self {
        Self {
            loading: true,
            ..Self::new(Vec::new(), can_add)
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn header(&self) -> &'static str {
        Self::TITLE
    }

    /// Name and description of every repository, in backend order
    pub fn rows(&self) -> Vec<Row> {
        self.repos
            .iter()
            .map(|repo| Row::new(repo.name.clone(), repo.description.clone()))
            .collect()
    }

    /// Label of the add affordance, present only when cloning is possible
    pub fn add_affordance(&self) -> Option<&'static str> {
        self.can_add.then_some(Self::ADD_LABEL)
    }

    pub fn select(&mut self, index: usize) {
        if index < self.repos.len() {
            self.list_state.select(Some(index));
        }
    }

    pub fn selected(&self) -> Option<&Repository> {
        self.list_state.selected().and_then(|i| self.repos.get(i))
    }

    fn empty_hint(&self) -> &'static str {
        match (self.loading, self.can_add) {
            (true, _) => "Loading repositories...",
            (false, true) => "No repositories yet. Clone one to get started.",
            (false, false) => "No repositories found.",
        }
    }
}

impl Screen for RepoListScreen {
    fn title(&self) -> String {
        Self::TITLE.to_string()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, _ctx: &RenderContext) -> Result<()> {
        let items = self.rows().iter().map(|row| row_item(row, false)).collect();
        let title = format!("{} ({})", Self::TITLE, self.repos.len());
        let empty = self.empty_hint();
        render_rows(frame, area, &title, items, &mut self.list_state, empty);
        Ok(())
    }

    fn handle_event(&mut self, event: Event, ctx: &ScreenContext) -> Result<ScreenAction> {
        let Some(key) = pressed_key(&event) else {
            return Ok(ScreenAction::None);
        };
        let Some(action) = ctx.keymap().get_action(key.code, key.modifiers) else {
            return Ok(ScreenAction::None);
        };

        if self.list_state.apply_navigation(action, self.repos.len()) {
            return Ok(ScreenAction::None);
        }

        Ok(match action {
            Action::Confirm => match self.selected() {
                Some(repo) => ScreenAction::Request(Request::History(repo.clone())),
                None => ScreenAction::None,
            },
            Action::Create if self.can_add => {
                ScreenAction::Push(Box::new(CloneFormScreen::new(&ctx.config.clone)))
            }
            Action::Create => {
                debug!("Backend cannot add repositories; ignoring create");
                ScreenAction::None
            }
            Action::Refresh => ScreenAction::Request(Request::Repos),
            Action::Cancel => ScreenAction::Pop,
            _ => ScreenAction::None,
        })
    }

    fn footer_hint(&self, keymap: &Keymap) -> String {
        let mut parts = vec![
            navigate_hint(keymap),
            hint(keymap, Action::Confirm, "History"),
            hint(keymap, Action::Refresh, "Refresh"),
        ];
        if self.can_add {
            parts.push(hint(keymap, Action::Create, "Clone"));
        }
        parts.push(hint(keymap, Action::Quit, "Quit"));
        parts.push(hint(keymap, Action::Help, "Help"));
        parts.join(" | ")
    }
}
