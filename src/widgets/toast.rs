//! Toast notifications.
//!
//! A single notification drawn in the bottom-right corner above the footer.
//! Timed toasts expire on their own; a pinned toast stays until replaced or
//! cleared and is used for "Loading..." while a request is in flight.

use crate::styles::theme;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap};
use std::time::{Duration, Instant};

const DEFAULT_DURATION: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastVariant {
    Success,
    Info,
    Warning,
}

impl ToastVariant {
    pub fn icon(&self) -> &'static str {
        match self {
            ToastVariant::Success => "\u{2714}", // ✔
            ToastVariant::Info => "\u{2139}",    // ℹ
            ToastVariant::Warning => "\u{26A0}", // ⚠
        }
    }

    pub fn color(&self) -> Color {
        let t = theme();
        match self {
            ToastVariant::Success => t.success,
            ToastVariant::Info => t.primary,
            ToastVariant::Warning => t.warning,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub variant: ToastVariant,
    pub created_at: Instant,
    /// `None` pins the toast until it is replaced or cleared
    pub duration: Option<Duration>,
}

impl Toast {
    pub fn new(message: impl Into<String>, variant: ToastVariant) -> Self {
        Self {
            message: message.into(),
            variant,
            created_at: Instant::now(),
            duration: Some(DEFAULT_DURATION),
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn pinned(mut self) -> Self {
        self.duration = None;
        self
    }

    pub fn is_pinned(&self) -> bool {
        self.duration.is_none()
    }

    pub fn is_expired(&self) -> bool {
        self.duration
            .is_some_and(|duration| self.created_at.elapsed() >= duration)
    }
}

/// Renders one toast in the bottom-right corner of the given area
pub struct ToastWidget<'a> {
    toast: &'a Toast,
}

impl<'a> ToastWidget<'a> {
    pub fn new(toast: &'a Toast) -> Self {
        Self { toast }
    }

    fn calculate_area(&self, area: Rect) -> Rect {
        let width = 48u16.min(area.width.saturating_sub(4));
        let height = 3u16.min(area.height);
        let x = area.x + area.width.saturating_sub(width + 2);
        let y = area.y + area.height.saturating_sub(height + 3); // above the footer
        Rect::new(x, y, width, height)
    }
}

impl Widget for ToastWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let toast_area = self.calculate_area(area);
        let t = theme();

        Widget::render(Clear, toast_area, buf);

        let message = format!(" {} {} ", self.toast.variant.icon(), self.toast.message);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.toast.variant.color()))
            .style(t.background_style());

        Paragraph::new(message)
            .block(block)
            .style(t.text_style().add_modifier(Modifier::BOLD))
            .wrap(Wrap { trim: true })
            .render(toast_area, buf);
    }
}

/// Holds the single visible toast
#[derive(Debug, Default)]
pub struct ToastManager {
    current: Option<Toast>,
}

impl ToastManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a toast, replacing any existing one
    pub fn push(&mut self, toast: Toast) {
        self.current = Some(toast);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(Toast::new(message, ToastVariant::Success));
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(Toast::new(message, ToastVariant::Warning));
    }

    /// Show a pinned info toast until [`ToastManager::clear_pinned`]
    pub fn loading(&mut self, message: impl Into<String>) {
        self.push(Toast::new(message, ToastVariant::Info).pinned());
    }

    /// Drop the current toast only if it is pinned
    pub fn clear_pinned(&mut self) {
        if self.current.as_ref().is_some_and(Toast::is_pinned) {
            self.current = None;
        }
    }

    /// Remove an expired toast; returns whether one is still showing
    pub fn tick(&mut self) -> bool {
        if self.current.as_ref().is_some_and(Toast::is_expired) {
            self.current = None;
        }
        self.current.is_some()
    }

    pub fn current(&self) -> Option<&Toast> {
        self.current.as_ref()
    }

    pub fn render(&self, frame: &mut ratatui::Frame, area: Rect) {
        if let Some(toast) = self.current() {
            frame.render_widget(ToastWidget::new(toast), area);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_replaces_current() {
        let mut toasts = ToastManager::new();
        toasts.success("first");
        toasts.warning("second");
        let current = toasts.current().unwrap();
        assert_eq!(current.message, "second");
        assert_eq!(current.variant, ToastVariant::Warning);
    }

    #[test]
    fn test_expired_toast_is_removed() {
        let mut toasts = ToastManager::new();
        toasts.push(Toast::new("gone", ToastVariant::Success).with_duration(Duration::ZERO));
        assert!(!toasts.tick());
        assert!(toasts.current().is_none());
    }

    #[test]
    fn test_pinned_toast_survives_tick() {
        let mut toasts = ToastManager::new();
        toasts.loading("Loading...");
        assert!(toasts.tick());
        toasts.clear_pinned();
        assert!(toasts.current().is_none());
    }

    #[test]
    fn test_clear_pinned_keeps_timed_toast() {
        let mut toasts = ToastManager::new();
        toasts.success("Cloned");
        toasts.clear_pinned();
        assert!(toasts.current().is_some());
    }
}
