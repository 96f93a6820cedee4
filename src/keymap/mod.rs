//! Keymap configuration
//!
//! Customizable keyboard shortcuts with preset keymaps (standard, vim, emacs)
//! and user overrides.

mod actions;
mod binding;
mod presets;

pub use actions::Action;
pub use binding::{format_key_display, parse_key_string, KeyBinding, ParsedKey};
pub use presets::KeymapPreset;

use crossterm::event::{KeyCode, KeyModifiers};
use serde::{Deserialize, Serialize};

/// Keymap configuration with preset and optional overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Keymap {
    /// Base preset keymap
    #[serde(default)]
    pub preset: KeymapPreset,

    /// User-defined overrides (checked before preset)
    #[serde(default)]
    pub overrides: Vec<KeyBinding>,
}

impl Keymap {
    pub fn new(preset: KeymapPreset) -> Self {
        Self {
            preset,
            overrides: Vec::new(),
        }
    }

    /// Get the action for a key event, checking overrides first then preset.
    ///
    /// If an action is overridden, preset bindings for that action are ignored.
    pub fn get_action(&self, code: KeyCode, modifiers: KeyModifiers) -> Option<Action> {
        let (code, modifiers) = normalize_key(code, modifiers);
        self.all_bindings()
            .into_iter()
            .find(|binding| binding.matches(code, modifiers))
            .map(|binding| binding.action)
    }

    /// All bindings (overrides + preset) in lookup order
    pub fn all_bindings(&self) -> Vec<KeyBinding> {
        let mut bindings = self.overrides.clone();
        for preset_binding in self.preset.bindings() {
            let is_overridden = self
                .overrides
                .iter()
                .any(|o| o.action == preset_binding.action);
            if !is_overridden {
                bindings.push(preset_binding);
            }
        }
        bindings
    }

    /// Display string for the first key bound to `action`
    pub fn get_key_display_for_action(&self, action: Action) -> String {
        self.all_bindings()
            .into_iter()
            .find(|b| b.action == action)
            .map(|b| b.display())
            .unwrap_or_else(|| format!("{:?}", action))
    }

    pub fn navigation_display(&self) -> String {
        format!(
            "{}/{}",
            self.get_key_display_for_action(Action::MoveUp),
            self.get_key_display_for_action(Action::MoveDown)
        )
    }

    /// Bindings that cannot be parsed, reported once at startup
    pub fn invalid_overrides(&self) -> Vec<(String, String)> {
        self.overrides
            .iter()
            .filter_map(|b| b.parse().err().map(|e| (b.key.clone(), e)))
            .collect()
    }

    /// Footer hint for list screens
    pub fn footer_navigation(&self) -> String {
        format!(
            "{}: Navigate | {}: Open | {}: Back | {}: Help",
            self.navigation_display(),
            self.get_key_display_for_action(Action::Confirm),
            self.get_key_display_for_action(Action::Cancel),
            self.get_key_display_for_action(Action::Help)
        )
    }
}

/// Terminals report shifted letters as uppercase chars and back-tab with a
/// shift flag; bindings are written in lowercase ("shift+g", "backtab").
fn normalize_key(code: KeyCode, modifiers: KeyModifiers) -> (KeyCode, KeyModifiers) {
    match code {
        KeyCode::Char(c) if c.is_ascii_uppercase() => {
            (KeyCode::Char(c.to_ascii_lowercase()), modifiers | KeyModifiers::SHIFT)
        }
        KeyCode::Char(c) if !c.is_ascii_alphanumeric() => {
            (code, modifiers.difference(KeyModifiers::SHIFT))
        }
        KeyCode::BackTab => (KeyCode::BackTab, modifiers.difference(KeyModifiers::SHIFT)),
        _ => (code, modifiers),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_keymap() {
        let keymap = Keymap::default();
        assert_eq!(keymap.preset, KeymapPreset::Standard);
        assert!(keymap.overrides.is_empty());
    }

    #[test]
    fn test_get_action_from_preset() {
        let keymap = Keymap::default();
        assert_eq!(
            keymap.get_action(KeyCode::Char('q'), KeyModifiers::NONE),
            Some(Action::Quit)
        );
        assert_eq!(
            keymap.get_action(KeyCode::Enter, KeyModifiers::NONE),
            Some(Action::Confirm)
        );
    }

    #[test]
    fn test_override_shadows_preset() {
        let keymap = Keymap {
            preset: KeymapPreset::Standard,
            overrides: vec![KeyBinding::new("a", Action::Create)],
        };
        assert_eq!(
            keymap.get_action(KeyCode::Char('a'), KeyModifiers::NONE),
            Some(Action::Create)
        );
        // The preset "c" binding for Create is shadowed
        assert_eq!(keymap.get_action(KeyCode::Char('c'), KeyModifiers::NONE), None);
        assert_eq!(keymap.get_key_display_for_action(Action::Create), "A");
    }

    #[test]
    fn test_vim_preset() {
        let keymap = Keymap::new(KeymapPreset::Vim);
        assert_eq!(
            keymap.get_action(KeyCode::Char('j'), KeyModifiers::NONE),
            Some(Action::MoveDown)
        );
    }

    #[test]
    fn test_shifted_keys_are_normalized() {
        let keymap = Keymap::new(KeymapPreset::Vim);
        assert_eq!(
            keymap.get_action(KeyCode::Char('G'), KeyModifiers::SHIFT),
            Some(Action::GoToEnd)
        );
        assert_eq!(
            keymap.get_action(KeyCode::Char('?'), KeyModifiers::SHIFT),
            Some(Action::Help)
        );
        assert_eq!(
            keymap.get_action(KeyCode::BackTab, KeyModifiers::SHIFT),
            Some(Action::PrevField)
        );
    }

    #[test]
    fn test_footer_reflects_overrides() {
        let keymap = Keymap {
            preset: KeymapPreset::Standard,
            overrides: vec![KeyBinding::new("ctrl+b", Action::Cancel)],
        };
        let footer = keymap.footer_navigation();
        assert!(footer.contains("Ctrl+B: Back"));
        assert!(footer.starts_with("↑/↓: Navigate"));
    }

    #[test]
    fn test_invalid_overrides() {
        let keymap = Keymap {
            preset: KeymapPreset::Standard,
            overrides: vec![
                KeyBinding::new("hyper+x", Action::Quit),
                KeyBinding::new("x", Action::Refresh),
            ],
        };
        let invalid = keymap.invalid_overrides();
        assert_eq!(invalid.len(), 1);
        assert_eq!(invalid[0].0, "hyper+x");
    }
}
