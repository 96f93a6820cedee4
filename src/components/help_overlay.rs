//! Help overlay listing the active key bindings, grouped by category.

use crate::keymap::{Keymap, KeyBinding};
use crate::styles::theme;
use crate::utils::center_popup;
use indoc::indoc;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const INTRO: &str = indoc! {"
    Browse repositories, page through history and walk commit trees.
    Going back returns to exactly the screen you came from.
"};

pub struct HelpOverlay;

impl HelpOverlay {
    /// Bindings grouped by action category, in first-seen order
    pub fn grouped_bindings(keymap: &Keymap) -> Vec<(&'static str, Vec<KeyBinding>)> {
        let mut groups: Vec<(&'static str, Vec<KeyBinding>)> = Vec::new();
        for binding in keymap.all_bindings() {
            let category = binding.action.category();
            match groups.iter_mut().find(|(name, _)| *name == category) {
                Some((_, bindings)) => bindings.push(binding),
                None => groups.push((category, vec![binding])),
            }
        }
        groups
    }

    pub fn render(frame: &mut Frame, area: Rect, keymap: &Keymap, config_path: &str) {
        let t = theme();
        let popup_area = center_popup(area, 80, 85);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" Keyboard Shortcuts - {} Preset ", keymap.preset.name()))
            .title_alignment(Alignment::Center)
            .border_style(t.border_focused_style());
        let inner = block.inner(popup_area);
        frame.render_widget(block, popup_area);

        let [intro_area, bindings_area, footer_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(2),
        ])
        .areas(inner);

        frame.render_widget(
            Paragraph::new(INTRO)
                .style(t.text_style())
                .wrap(Wrap { trim: true }),
            intro_area,
        );

        let mut lines = Vec::new();
        for (category, bindings) in Self::grouped_bindings(keymap) {
            if !lines.is_empty() {
                lines.push(Line::from(""));
            }
            lines.push(Line::from(Span::styled(
                format!("  {}", category),
                t.title_style().add_modifier(Modifier::UNDERLINED),
            )));
            for binding in bindings {
                lines.push(Line::from(vec![
                    Span::styled(format!("    {:14}", binding.display()), t.emphasis_style()),
                    Span::styled(binding.get_description().to_string(), t.text_style()),
                ]));
            }
        }
        frame.render_widget(Paragraph::new(lines), bindings_area);

        frame.render_widget(
            Paragraph::new(format!(
                "Edit keybindings in: {}\nPress any key to close",
                config_path
            ))
            .style(t.muted_style())
            .alignment(Alignment::Center),
            footer_area,
        );
    }
}
