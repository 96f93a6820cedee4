use crate::styles::theme;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Padding, Paragraph};

/// Header shown above every screen
pub struct Header;

impl Header {
    /// Height the header needs: borders plus one line of breadcrumb
    pub const HEIGHT: u16 = 3;

    /// Render the screen title with a breadcrumb of the screens below it.
    pub fn render(frame: &mut Frame, area: Rect, title: &str, breadcrumb: &str) {
        let t = theme();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(t.border_focused_style())
            .title(format!(" {} ", title))
            .title_style(t.title_style())
            .title_alignment(Alignment::Center)
            .padding(Padding::horizontal(1));

        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Paragraph::new(breadcrumb).style(t.muted_style()), inner);
    }
}
