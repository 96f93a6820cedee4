use crate::backend::Backend;
use crate::components::{Footer, HelpOverlay, Header};
use crate::config::Config;
use crate::keymap::Action;
use crate::navigation::NavigationStack;
use crate::screens::{
    CommitDetailScreen, FileListScreen, HistoryListScreen, RenderContext, RepoListScreen, Screen,
    ScreenAction, ScreenContext,
};
use crate::services::{Request, RequestHandle, RequestService, Response, ScreenId};
use crate::tui::Tui;
use crate::utils::create_standard_layout;
use crate::widgets::ToastManager;
use anyhow::{Context, Result};
use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::Frame;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// How long the event loop waits for input before polling requests again
const POLL_TIMEOUT: Duration = Duration::from_millis(100);

const BREADCRUMB_SEPARATOR: &str = " › ";

/// A screen on the stack together with its identity and cancellation token
struct ScreenEntry {
    id: ScreenId,
    token: CancellationToken,
    screen: Box<dyn Screen>,
}

/// Main application state
pub struct App {
    config: Config,
    config_path: PathBuf,
    backend: Arc<dyn Backend>,
    runtime: Runtime,
    stack: NavigationStack<ScreenEntry>,
    next_id: ScreenId,
    pending: Vec<RequestHandle>,
    toasts: ToastManager,
    show_help: bool,
    should_quit: bool,
}

impl App {
    /// Build the app with a loading repository list and request the listing.
    ///
    /// The terminal is only touched by [`App::run`], so an `App` can be
    /// driven headless through [`App::handle_event`] and [`App::settle`].
    pub fn new(config: Config, config_path: PathBuf, backend: Arc<dyn Backend>) -> Result<Self> {
        let runtime = Runtime::new().context("Failed to create tokio runtime")?;
        let root = ScreenEntry {
            id: 0,
            token: CancellationToken::new(),
            screen: Box::new(RepoListScreen::loading(backend.supports_add())),
        };

        let mut app = Self {
            config,
            config_path,
            backend,
            runtime,
            stack: NavigationStack::new(root),
            next_id: 1,
            pending: Vec::new(),
            toasts: ToastManager::new(),
            show_help: false,
            should_quit: false,
        };
        let ctx = ScreenContext::new(&app.config);
        app.stack.top_mut().screen.on_enter(&ctx)?;
        app.dispatch(Request::Repos);
        Ok(app)
    }

    /// Run the TUI until the user quits or a backend operation fails.
    pub fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;

        let result = self.event_loop(&mut tui);
        let restored = tui.exit();

        if let Err(e) = &result {
            error!("Fatal error: {:#}", e);
        }
        result.and(restored)
    }

    fn event_loop(&mut self, tui: &mut Tui) -> Result<()> {
        loop {
            self.toasts.tick();
            self.sync_loading_toast();

            let mut drawn = Ok(());
            tui.terminal_mut().draw(|frame| drawn = self.draw(frame))?;
            drawn?;

            if self.should_quit {
                break;
            }

            if let Some(event) = tui.poll_event(POLL_TIMEOUT)? {
                self.handle_event(event)?;
            }
            self.poll_requests()?;
        }

        // Running clones stop at their next progress report
        for entry in self.stack.iter() {
            entry.token.cancel();
        }
        info!("Quitting");
        Ok(())
    }

    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    pub fn top_title(&self) -> String {
        self.stack.top().screen.title()
    }

    /// Titles of every screen from the root to the top
    pub fn breadcrumb(&self) -> String {
        self.stack
            .iter()
            .map(|entry| entry.screen.title())
            .collect::<Vec<_>>()
            .join(BREADCRUMB_SEPARATOR)
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn is_help_visible(&self) -> bool {
        self.show_help
    }

    pub fn has_pending_requests(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn toasts(&self) -> &ToastManager {
        &self.toasts
    }

    pub fn handle_event(&mut self, event: Event) -> Result<()> {
        if let Event::Key(key) = &event {
            if key.kind != KeyEventKind::Press {
                return Ok(());
            }
            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                self.should_quit = true;
                return Ok(());
            }
            if self.show_help {
                self.show_help = false;
                return Ok(());
            }
            if !self.stack.top().screen.is_input_focused() {
                match self.config.keymap.get_action(key.code, key.modifiers) {
                    Some(Action::Quit) => {
                        self.should_quit = true;
                        return Ok(());
                    }
                    Some(Action::Help) => {
                        self.show_help = true;
                        return Ok(());
                    }
                    _ => {}
                }
            }
        }

        let ctx = ScreenContext::new(&self.config);
        let action = self.stack.top_mut().screen.handle_event(event, &ctx)?;
        self.apply_action(action)
    }

    fn apply_action(&mut self, action: ScreenAction) -> Result<()> {
        match action {
            ScreenAction::None => {}
            ScreenAction::Pop => self.pop_screen(),
            ScreenAction::Push(screen) => {
                if let Some(handle) = self.pending_for_top() {
                    debug!(
                        "Ignoring '{}': '{}' is waiting on '{}'",
                        screen.title(),
                        self.top_title(),
                        handle.label()
                    );
                } else {
                    self.push_screen(screen)?;
                }
            }
            ScreenAction::Request(request) => self.dispatch(request),
            ScreenAction::Unsupported(reason) => {
                warn!("Unsupported action on '{}': {}", self.top_title(), reason);
                self.toasts.warning(reason);
            }
            ScreenAction::ShowHelp => self.show_help = true,
            ScreenAction::Quit => self.should_quit = true,
        }
        Ok(())
    }

    fn new_entry(&mut self, mut screen: Box<dyn Screen>) -> Result<ScreenEntry> {
        let ctx = ScreenContext::new(&self.config);
        screen.on_enter(&ctx)?;
        let id = self.next_id;
        self.next_id += 1;
        Ok(ScreenEntry {
            id,
            token: CancellationToken::new(),
            screen,
        })
    }

    fn push_screen(&mut self, screen: Box<dyn Screen>) -> Result<()> {
        let entry = self.new_entry(screen)?;
        info!("Push: {} (depth {})", entry.screen.title(), self.depth() + 1);
        self.stack.push(entry);
        Ok(())
    }

    fn peer_screen(&mut self, screen: Box<dyn Screen>) -> Result<()> {
        let entry = self.new_entry(screen)?;
        info!("Peer: {} replaces {}", entry.screen.title(), self.top_title());
        let replaced = self.stack.peer(entry);
        Self::tear_down(replaced);
        Ok(())
    }

    fn pop_screen(&mut self) {
        match self.stack.pop() {
            Some(popped) => {
                info!("Pop: {} (back to {})", popped.screen.title(), self.top_title());
                Self::tear_down(popped);
            }
            None => debug!("Already at the root screen"),
        }
    }

    fn tear_down(mut entry: ScreenEntry) {
        entry.token.cancel();
        entry.screen.on_exit();
    }

    fn pending_for_top(&self) -> Option<&RequestHandle> {
        let top = self.stack.top().id;
        self.pending.iter().find(|handle| handle.origin() == top)
    }

    /// Start `request` on behalf of the top screen.
    ///
    /// A screen has at most one request in flight; repeated activations
    /// while it is pending are ignored, and nothing is pushed over it until
    /// the result arrives. A request therefore only outlives the top
    /// position of its screen when that screen was popped or replaced,
    /// which cancels its token.
    fn dispatch(&mut self, request: Request) {
        let top = self.stack.top();
        if self.pending_for_top().is_some() {
            debug!("Ignoring '{}': screen {} already waiting", request.label(), top.id);
            return;
        }
        let handle = RequestService::start(
            &self.runtime,
            Arc::clone(&self.backend),
            request,
            top.id,
            top.token.clone(),
        );
        self.pending.push(handle);
    }

    /// Forward clone progress and apply every finished request.
    pub fn poll_requests(&mut self) -> Result<()> {
        let mut index = 0;
        while index < self.pending.len() {
            let updates = self.pending[index].drain_progress();
            if !updates.is_empty() && !self.pending[index].is_cancelled() {
                let screen = &mut self.stack.top_mut().screen;
                for update in &updates {
                    screen.on_clone_progress(update);
                }
            }

            match self.pending[index].try_recv() {
                None => index += 1,
                Some(result) => {
                    let handle = self.pending.remove(index);
                    self.finish(&handle, result)?;
                }
            }
        }
        Ok(())
    }

    fn finish(&mut self, handle: &RequestHandle, result: Result<Response>) -> Result<()> {
        if handle.is_cancelled() {
            debug!(
                "Dropping late result of '{}' from screen {}",
                handle.label(),
                handle.origin()
            );
            return Ok(());
        }
        let response =
            result.with_context(|| format!("Backend request failed: {}", handle.label()))?;
        debug!("Applying {:?}", response);
        self.apply_response(response)
    }

    fn apply_response(&mut self, response: Response) -> Result<()> {
        match response {
            Response::Repos(repos) => {
                let screen = RepoListScreen::new(repos, self.backend.supports_add());
                self.peer_screen(Box::new(screen))
            }
            Response::History { repo, stream } => {
                let screen = HistoryListScreen::new(repo, stream)?;
                self.push_screen(Box::new(screen))
            }
            Response::Tree {
                repo,
                tree_id,
                entries,
            } => self.push_screen(Box::new(FileListScreen::new(repo, tree_id, entries))),
            Response::Commit { repo, commit } => {
                self.peer_screen(Box::new(CommitDetailScreen::new(repo, commit)))
            }
            Response::Cloned(repo) => {
                info!("Cloned {}", repo.name);
                self.toasts.success(format!("Cloned {}", repo.name));
                self.pop_screen();
                self.dispatch(Request::Repos);
                Ok(())
            }
        }
    }

    /// Show a pinned loading toast while the top screen waits on a request.
    fn sync_loading_toast(&mut self) {
        match self.pending_for_top().map(|handle| handle.label().to_string()) {
            Some(label) => {
                let showing_other = self.toasts.current().is_some_and(|t| !t.is_pinned());
                let already_shown = self
                    .toasts
                    .current()
                    .is_some_and(|t| t.is_pinned() && t.message == label);
                if !showing_other && !already_shown {
                    self.toasts.loading(label);
                }
            }
            None => self.toasts.clear_pinned(),
        }
    }

    /// Poll until no request is pending or `timeout` elapses.
    ///
    /// Drives the app without a terminal (tests, scripted sessions).
    pub fn settle(&mut self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        while self.has_pending_requests() {
            self.poll_requests()?;
            if !self.has_pending_requests() {
                break;
            }
            if Instant::now() >= deadline {
                anyhow::bail!("Requests still pending after {:?}", timeout);
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        self.sync_loading_toast();
        Ok(())
    }

    /// Draw the header, the top screen, the footer and any overlay.
    pub fn draw(&mut self, frame: &mut Frame) -> Result<()> {
        let area = frame.area();
        let (header_area, body_area, footer_area) =
            create_standard_layout(area, Header::HEIGHT, Footer::HEIGHT);

        Header::render(frame, header_area, &self.top_title(), &self.breadcrumb());

        let ctx = RenderContext::new(&self.config);
        let top = self.stack.top_mut();
        top.screen.render(frame, body_area, &ctx)?;
        Footer::render(frame, footer_area, &top.screen.footer_hint(&self.config.keymap));

        self.toasts.render(frame, area);

        if self.show_help {
            let config_path = self.config_path.display().to_string();
            HelpOverlay::render(frame, area, &self.config.keymap, &config_path);
        }
        Ok(())
    }
}
