use super::{hint, pressed_key, screen_block, Screen, ScreenAction};
use super::{RenderContext, ScreenContext};
use crate::backend::{Commit, Repository};
use crate::keymap::{Action, Keymap};
use crate::services::Request;
use crate::styles::{theme, LIST_HIGHLIGHT_SYMBOL};
use crate::utils::short_hash;
use anyhow::Result;
use crossterm::event::Event;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};
use ratatui::Frame;

/// Interactive target inside the commit detail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Link {
    /// Open the file list of this tree
    Tree(String),
    /// Replace this screen with the parent commit
    Parent(String),
}

/// One labeled block of the commit detail
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub label: &'static str,
    /// Lines of the section with their link, if activating them does anything
    pub entries: Vec<(String, Option<Link>)>,
}

impl Section {
    fn text(label: &'static str, text: impl Into<String>) -> Self {
        Self {
            label,
            entries: vec![(text.into(), None)],
        }
    }
}

/// Metadata of a single commit.
///
/// Sections appear in a fixed order: message, tree, parent(s), author,
/// committer (only when it differs from the author) and hash.
pub struct CommitDetailScreen {
    repo: Repository,
    commit: Commit,
    selected: usize,
}

impl CommitDetailScreen {
    pub fn new(repo: Repository, commit: Commit) -> Self {
        Self {
            repo,
            commit,
            selected: 0,
        }
    }

    pub fn commit(&self) -> &Commit {
        &self.commit
    }

    pub fn sections(&self) -> Vec<Section> {
        let commit = &self.commit;
        let mut sections = vec![
            Section::text("Message", commit.message.clone()),
            Section {
                label: "Tree",
                entries: vec![(commit.tree.clone(), Some(Link::Tree(commit.tree.clone())))],
            },
        ];
        if !commit.parents.is_empty() {
            sections.push(Section {
                label: if commit.parents.len() == 1 { "Parent" } else { "Parents" },
                entries: commit
                    .parents
                    .iter()
                    .map(|p| (p.clone(), Some(Link::Parent(p.clone()))))
                    .collect(),
            });
        }
        sections.push(Section::text("Author", commit.author.clone()));
        if commit.committer != commit.author {
            sections.push(Section::text("Committer", commit.committer.clone()));
        }
        sections.push(Section::text("Hash", commit.hash.clone()));
        sections
    }

    /// Interactive targets in display order
    pub fn links(&self) -> Vec<Link> {
        self.sections()
            .into_iter()
            .flat_map(|section| section.entries)
            .filter_map(|(_, link)| link)
            .collect()
    }

    pub fn selected_link(&self) -> Option<Link> {
        self.links().into_iter().nth(self.selected)
    }

    fn activate(&self) -> ScreenAction {
        match self.selected_link() {
            Some(Link::Tree(id)) => ScreenAction::Request(Request::Tree(self.repo.clone(), id)),
            Some(Link::Parent(id)) => ScreenAction::Request(Request::Commit(self.repo.clone(), id)),
            None => ScreenAction::None,
        }
    }
}

impl Screen for CommitDetailScreen {
    fn title(&self) -> String {
        format!("Commit {}", short_hash(&self.commit.hash))
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, _ctx: &RenderContext) -> Result<()> {
        let t = theme();
        let selected = self.selected_link();
        let mut lines: Vec<Line> = Vec::new();

        for section in self.sections() {
            if !lines.is_empty() {
                lines.push(Line::from(""));
            }
            lines.push(Line::from(Span::styled(section.label, t.title_style())));
            for (text, link) in section.entries {
                match link {
                    Some(link) => {
                        let is_selected = selected.as_ref() == Some(&link);
                        let (marker, style) = if is_selected {
                            (LIST_HIGHLIGHT_SYMBOL, t.highlight_style())
                        } else {
                            ("  ", t.hash_style())
                        };
                        lines.push(Line::from(vec![
                            Span::raw(marker),
                            Span::styled(text, style),
                        ]));
                    }
                    // Multi-line text keeps its own line breaks and indentation
                    None => lines.extend(
                        text.lines()
                            .map(|l| Line::from(Span::styled(format!("  {}", l), t.text_style()))),
                    ),
                }
            }
        }

        let title = self.title();
        let paragraph = Paragraph::new(lines)
            .block(screen_block(&title))
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
        Ok(())
    }

    fn handle_event(&mut self, event: Event, ctx: &ScreenContext) -> Result<ScreenAction> {
        let Some(key) = pressed_key(&event) else {
            return Ok(ScreenAction::None);
        };
        let Some(action) = ctx.keymap().get_action(key.code, key.modifiers) else {
            return Ok(ScreenAction::None);
        };

        let link_count = self.links().len();
        Ok(match action {
            Action::MoveUp | Action::MoveLeft => {
                self.selected = self.selected.saturating_sub(1);
                ScreenAction::None
            }
            Action::MoveDown | Action::MoveRight => {
                if self.selected + 1 < link_count {
                    self.selected += 1;
                }
                ScreenAction::None
            }
            Action::Confirm => self.activate(),
            Action::Cancel => ScreenAction::Pop,
            _ => ScreenAction::None,
        })
    }

    fn footer_hint(&self, keymap: &Keymap) -> String {
        [
            format!("{}: Select link", keymap.navigation_display()),
            hint(keymap, Action::Confirm, "Follow"),
            hint(keymap, Action::Cancel, "Back"),
            hint(keymap, Action::Help, "Help"),
        ]
        .join(" | ")
    }
}
