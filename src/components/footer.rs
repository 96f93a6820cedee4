use crate::styles::theme;
use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

/// Key hint bar at the bottom of every screen
pub struct Footer;

impl Footer {
    pub const HEIGHT: u16 = 2;

    /// Render hints written as `"keys: Label | keys: Label"`.
    pub fn render(frame: &mut Frame, area: Rect, text: &str) {
        let t = theme();
        let block = Block::default()
            .borders(Borders::TOP)
            .border_style(t.border_focused_style())
            .border_type(BorderType::Rounded);

        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(
            Paragraph::new(Self::hint_line(text)).alignment(Alignment::Center),
            inner,
        );
    }

    fn hint_line(text: &str) -> Line<'_> {
        let t = theme();
        let mut spans = Vec::new();
        for (i, part) in text.split(" | ").enumerate() {
            if i > 0 {
                spans.push(Span::styled(" | ", t.muted_style()));
            }
            match part.split_once(": ") {
                Some((keys, label)) => {
                    spans.push(Span::styled(
                        format!("{}: ", keys),
                        t.emphasis_style().add_modifier(Modifier::BOLD),
                    ));
                    spans.push(Span::styled(label, t.text_style()));
                }
                None => spans.push(Span::styled(part, t.text_style())),
            }
        }
        Line::from(spans)
    }
}
