use super::{hint, pressed_key, screen_block, Screen, ScreenAction};
use super::{RenderContext, ScreenContext};
use crate::backend::{CloneProgress, CloneRequest};
use crate::config::CloneDefaults;
use crate::keymap::{Action, Keymap};
use crate::styles::theme;
use crate::utils::TextInput;
use crate::widgets::{TextInputWidget, TextInputWidgetExt};
use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyModifiers};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::widgets::{Gauge, Paragraph, Wrap};
use ratatui::Frame;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloneField {
    Host,
    Path,
    Description,
}

impl CloneField {
    const ALL: [CloneField; 3] = [CloneField::Host, CloneField::Path, CloneField::Description];

    fn label(&self) -> &'static str {
        match self {
            CloneField::Host => "Host",
            CloneField::Path => "Path",
            CloneField::Description => "Description (optional)",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Form collecting host, path and description for a new clone.
///
/// `progress` and `status` are the handles the clone updates while it runs.
pub struct CloneFormScreen {
    inputs: [TextInput; 3],
    focus: CloneField,
    validation: Option<String>,
    submitting: bool,
    progress: Option<CloneProgress>,
    status: String,
}

impl CloneFormScreen {
    pub const TITLE: &'static str = "Clone Repository";

    pub fn new(defaults: &CloneDefaults) -> Self {
        Self {
            inputs: [
                TextInput::with_text(&defaults.hostname),
                TextInput::with_text(&defaults.pathname),
                TextInput::with_text(&defaults.description),
            ],
            focus: CloneField::Host,
            validation: None,
            submitting: false,
            progress: None,
            status: String::new(),
        }
    }

    pub fn input(&self, field: CloneField) -> &TextInput {
        &self.inputs[field.index()]
    }

    pub fn input_mut(&mut self, field: CloneField) -> &mut TextInput {
        &mut self.inputs[field.index()]
    }

    pub fn focus(&self) -> CloneField {
        self.focus
    }

    pub fn validation_message(&self) -> Option<&str> {
        self.validation.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn progress(&self) -> Option<&CloneProgress> {
        self.progress.as_ref()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// The request the form would submit, if host and path are filled in
    pub fn request(&self) -> std::result::Result<CloneRequest, String> {
        let missing: Vec<&str> = [CloneField::Host, CloneField::Path]
            .into_iter()
            .filter(|f| self.input(*f).is_empty())
            .map(|f| f.label())
            .collect();
        match missing.as_slice() {
            [] => {}
            [field] => return Err(format!("{} is required", field)),
            _ => return Err(format!("{} are required", missing.join(" and "))),
        }
        Ok(CloneRequest {
            hostname: self.input(CloneField::Host).text_trimmed().to_string(),
            pathname: self.input(CloneField::Path).text_trimmed().to_string(),
            description: self.input(CloneField::Description).text_trimmed().to_string(),
        })
    }

    fn submit(&mut self) -> ScreenAction {
        match self.request() {
            Err(message) => {
                self.validation = Some(message);
                ScreenAction::None
            }
            Ok(request) => {
                info!("Submitting clone of {}", request.url());
                self.validation = None;
                self.submitting = true;
                self.status = "Connecting...".to_string();
                ScreenAction::Request(crate::services::Request::Clone(request))
            }
        }
    }

    fn move_focus(&mut self, forward: bool) {
        let count = CloneField::ALL.len();
        let index = self.focus.index();
        let next = if forward {
            (index + 1) % count
        } else {
            (index + count - 1) % count
        };
        self.focus = CloneField::ALL[next];
    }

    fn field_is_invalid(&self, field: CloneField) -> bool {
        self.validation.is_some() && field != CloneField::Description && self.input(field).is_empty()
    }
}

impl Screen for CloneFormScreen {
    fn title(&self) -> String {
        Self::TITLE.to_string()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, _ctx: &RenderContext) -> Result<()> {
        let t = theme();
        let block = screen_block(Self::TITLE);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [host_area, path_area, desc_area, message_area, gauge_area, _] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .areas(inner);

        for (field, field_area) in CloneField::ALL.into_iter().zip([host_area, path_area, desc_area]) {
            let widget = TextInputWidget::new(self.input(field))
                .title(field.label())
                .focused(!self.submitting && self.focus == field)
                .disabled(self.submitting)
                .invalid(self.field_is_invalid(field));
            frame.render_text_input_widget(widget, field_area);
        }

        let message = match (&self.validation, self.submitting) {
            (Some(message), _) => Paragraph::new(message.as_str()).style(t.error_style()),
            (None, true) => Paragraph::new(self.status.as_str()).style(t.emphasis_style()),
            (None, false) => Paragraph::new("Repositories are cloned over https.").style(t.muted_style()),
        };
        frame.render_widget(message.wrap(Wrap { trim: true }), message_area);

        if let Some(progress) = &self.progress {
            let gauge = Gauge::default()
                .gauge_style(t.success_style())
                .ratio(progress.ratio())
                .label(format!("{} {}/{}", progress.label, progress.value, progress.max));
            frame.render_widget(gauge, gauge_area);
        }
        Ok(())
    }

    fn handle_event(&mut self, event: Event, ctx: &ScreenContext) -> Result<ScreenAction> {
        let Some(key) = pressed_key(&event) else {
            return Ok(ScreenAction::None);
        };
        let action = ctx.keymap().get_action(key.code, key.modifiers);

        if self.submitting {
            // Leaving the form cancels the clone
            return Ok(match action {
                Some(Action::Cancel) => ScreenAction::Pop,
                _ => ScreenAction::None,
            });
        }

        // Plain characters are always text, even when a preset binds them
        if let KeyCode::Char(c) = key.code {
            if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
                let focus = self.focus;
                self.input_mut(focus).insert_char(c);
                self.validation = None;
                return Ok(ScreenAction::None);
            }
        }

        if let Some(action) = action.filter(TextInput::is_action_allowed_when_focused) {
            return Ok(match action {
                Action::Cancel => ScreenAction::Pop,
                Action::Confirm => self.submit(),
                Action::NextField => {
                    self.move_focus(true);
                    ScreenAction::None
                }
                Action::PrevField => {
                    self.move_focus(false);
                    ScreenAction::None
                }
                other => {
                    let focus = self.focus;
                    self.input_mut(focus).handle_action(other);
                    ScreenAction::None
                }
            });
        }

        // Editing keys a preset binds to list navigation (home, end)
        if !matches!(key.code, KeyCode::Char(_)) {
            let focus = self.focus;
            self.input_mut(focus).handle_key(key.code);
        }
        Ok(ScreenAction::None)
    }

    fn footer_hint(&self, keymap: &Keymap) -> String {
        if self.submitting {
            return hint(keymap, Action::Cancel, "Cancel clone");
        }
        [
            hint(keymap, Action::NextField, "Next field"),
            hint(keymap, Action::Confirm, "Clone"),
            hint(keymap, Action::Cancel, "Back"),
        ]
        .join(" | ")
    }

    fn is_input_focused(&self) -> bool {
        !self.submitting
    }

    fn on_exit(&mut self) {
        debug!("Leaving clone form (submitting: {})", self.submitting);
    }

    fn on_clone_progress(&mut self, progress: &CloneProgress) {
        self.status = format!("{}...", progress.label);
        self.progress = Some(progress.clone());
    }
}
