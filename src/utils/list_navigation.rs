//! List selection helpers shared by every list screen.

use crate::keymap::Action;
use ratatui::widgets::ListState;

/// Default page size for page up/down navigation.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Extension trait for `ListState` with bounded movement.
pub trait ListStateExt {
    /// Move selection up, stopping at the first item.
    fn move_up_by(&mut self, count: usize, total_items: usize);

    /// Move selection down, stopping at the last item.
    fn move_down_by(&mut self, count: usize, total_items: usize);

    fn select_first_item(&mut self, total_items: usize);

    fn select_last_item(&mut self, total_items: usize);

    /// Apply a navigation action. Returns true if the action moved the
    /// selection (or was a navigation action on an empty list).
    fn apply_navigation(&mut self, action: Action, total_items: usize) -> bool;
}

impl ListStateExt for ListState {
    fn move_up_by(&mut self, count: usize, total_items: usize) {
        if total_items == 0 {
            return;
        }
        let current = self.selected().unwrap_or(0);
        self.select(Some(current.saturating_sub(count)));
    }

    fn move_down_by(&mut self, count: usize, total_items: usize) {
        if total_items == 0 {
            return;
        }
        let current = self.selected().unwrap_or(0);
        self.select(Some((current + count).min(total_items - 1)));
    }

    fn select_first_item(&mut self, total_items: usize) {
        if total_items > 0 {
            self.select(Some(0));
        }
    }

    fn select_last_item(&mut self, total_items: usize) {
        if total_items > 0 {
            self.select(Some(total_items - 1));
        }
    }

    fn apply_navigation(&mut self, action: Action, total_items: usize) -> bool {
        match action {
            Action::MoveUp => self.move_up_by(1, total_items),
            Action::MoveDown => self.move_down_by(1, total_items),
            Action::PageUp => self.move_up_by(DEFAULT_PAGE_SIZE, total_items),
            Action::PageDown => self.move_down_by(DEFAULT_PAGE_SIZE, total_items),
            Action::GoToTop => self.select_first_item(total_items),
            Action::GoToEnd => self.select_last_item(total_items),
            _ => return false,
        }
        true
    }
}
