use crate::keymap::Action;
use crossterm::event::KeyCode;

/// A single-line text field with a character-indexed cursor.
///
/// # Example
/// ```
/// use gitdeck::utils::text_input::TextInput;
///
/// let mut input = TextInput::with_text("github.com");
/// input.backspace();
/// input.insert_char('m');
/// assert_eq!(input.text(), "github.com");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    text: String,
    cursor: usize,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an input pre-filled with `text`, cursor at the end.
    pub fn with_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.chars().count();
        Self { text, cursor }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn text_trimmed(&self) -> &str {
        self.text.trim()
    }

    /// True when the field holds nothing but whitespace.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    pub fn insert_char(&mut self, c: char) {
        if c.is_control() {
            return;
        }
        let byte_index = self.byte_index(self.cursor);
        self.text.insert(byte_index, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let start = self.byte_index(self.cursor - 1);
        let end = self.byte_index(self.cursor);
        self.text.replace_range(start..end, "");
        self.cursor -= 1;
    }

    pub fn delete(&mut self) {
        if self.cursor >= self.text.chars().count() {
            return;
        }
        let start = self.byte_index(self.cursor);
        let end = self.byte_index(self.cursor + 1);
        self.text.replace_range(start..end, "");
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.text.chars().count());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.chars().count();
    }

    /// Handle a raw key. Returns true if the key edited the field or moved
    /// the cursor.
    pub fn handle_key(&mut self, key_code: KeyCode) -> bool {
        match key_code {
            KeyCode::Char(c) => self.insert_char(c),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => self.move_left(),
            KeyCode::Right => self.move_right(),
            KeyCode::Home => self.move_home(),
            KeyCode::End => self.move_end(),
            _ => return false,
        }
        true
    }

    /// Handle an editing action from the keymap. Returns true if handled.
    pub fn handle_action(&mut self, action: Action) -> bool {
        match action {
            Action::MoveLeft => self.move_left(),
            Action::MoveRight => self.move_right(),
            Action::Home => self.move_home(),
            Action::End => self.move_end(),
            Action::Backspace => self.backspace(),
            Action::DeleteChar => self.delete(),
            _ => return false,
        }
        true
    }

    /// Whether a mapped action should win over typing while a field has focus.
    ///
    /// Form navigation and editing keys pass through; everything else (for
    /// example `q` bound to Quit) is typed as text instead.
    pub fn is_action_allowed_when_focused(action: &Action) -> bool {
        matches!(
            action,
            Action::Cancel
                | Action::Confirm
                | Action::NextField
                | Action::PrevField
                | Action::MoveLeft
                | Action::MoveRight
                | Action::Home
                | Action::End
                | Action::Backspace
                | Action::DeleteChar
        )
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map_or(self.text.len(), |(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_text_places_cursor_at_end() {
        let input = TextInput::with_text("github.com");
        assert_eq!(input.cursor(), 10);
        assert!(!input.is_empty());
    }

    #[test]
    fn test_insert_in_middle() {
        let mut input = TextInput::with_text("gihub");
        input.move_home();
        input.move_right();
        input.move_right();
        input.insert_char('t');
        assert_eq!(input.text(), "github");
        assert_eq!(input.cursor(), 3);
    }

    #[test]
    fn test_backspace_and_delete() {
        let mut input = TextInput::with_text("hello");
        input.backspace();
        assert_eq!(input.text(), "hell");

        input.move_home();
        input.delete();
        assert_eq!(input.text(), "ell");
        assert_eq!(input.cursor(), 0);

        input.backspace();
        assert_eq!(input.text(), "ell");
    }

    #[test]
    fn test_unicode_editing() {
        let mut input = TextInput::with_text("héllo");
        input.move_home();
        input.move_right();
        input.move_right();
        input.backspace();
        assert_eq!(input.text(), "hllo");
        input.insert_char('é');
        assert_eq!(input.text(), "héllo");
    }

    #[test]
    fn test_control_chars_are_ignored() {
        let mut input = TextInput::new();
        input.insert_char('\n');
        assert_eq!(input.text(), "");
    }

    #[test]
    fn test_whitespace_only_counts_as_empty() {
        let input = TextInput::with_text("   ");
        assert!(input.is_empty());
        assert_eq!(input.text_trimmed(), "");
    }

    #[test]
    fn test_handle_key() {
        let mut input = TextInput::new();
        assert!(input.handle_key(KeyCode::Char('a')));
        assert!(input.handle_key(KeyCode::Char('b')));
        assert!(input.handle_key(KeyCode::Backspace));
        assert_eq!(input.text(), "a");
        assert!(!input.handle_key(KeyCode::Enter));
    }

    #[test]
    fn test_handle_action() {
        let mut input = TextInput::with_text("hello");
        assert!(input.handle_action(Action::Home));
        assert!(input.handle_action(Action::DeleteChar));
        assert_eq!(input.text(), "ello");
        assert!(!input.handle_action(Action::Quit));
    }

    #[test]
    fn test_is_action_allowed_when_focused() {
        assert!(TextInput::is_action_allowed_when_focused(&Action::Confirm));
        assert!(TextInput::is_action_allowed_when_focused(&Action::NextField));
        assert!(TextInput::is_action_allowed_when_focused(&Action::Backspace));
        assert!(!TextInput::is_action_allowed_when_focused(&Action::Quit));
        assert!(!TextInput::is_action_allowed_when_focused(&Action::Help));
        assert!(!TextInput::is_action_allowed_when_focused(&Action::Refresh));
    }
}
