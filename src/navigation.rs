//! Stack of screens with push, pop and peer (replace-in-place) navigation.
//!
//! The stack is never empty: it is created with a root screen and `pop`
//! refuses to remove the last one. Only the top screen is visible; screens
//! below it keep their state untouched until they are revealed again.

/// Ordered stack of screens, root first.
///
/// # Example
/// ```
/// use gitdeck::navigation::NavigationStack;
///
/// let mut stack = NavigationStack::new("repos");
/// stack.push("history");
/// stack.push("commit A");
/// let replaced = stack.peer("commit B");
/// assert_eq!(replaced, "commit A");
/// assert_eq!(stack.depth(), 3);
/// assert_eq!(stack.pop(), Some("commit B"));
/// assert_eq!(*stack.top(), "history");
/// ```
#[derive(Debug)]
pub struct NavigationStack<S> {
    current: S,
    below: Vec<S>,
}

impl<S> NavigationStack<S> {
    pub fn new(root: S) -> Self {
        Self {
            current: root,
            below: Vec::new(),
        }
    }

    /// Make `screen` the visible screen, keeping the previous one below it.
    pub fn push(&mut self, screen: S) {
        let previous = std::mem::replace(&mut self.current, screen);
        self.below.push(previous);
    }

    /// Remove the top screen and reveal the one below it.
    ///
    /// Returns `None` without changing anything when only the root is left.
    pub fn pop(&mut self) -> Option<S> {
        let previous = self.below.pop()?;
        Some(std::mem::replace(&mut self.current, previous))
    }

    /// Replace the top screen in place. Depth is unchanged; the replaced
    /// screen is handed back so the caller can tear it down.
    pub fn peer(&mut self, screen: S) -> S {
        std::mem::replace(&mut self.current, screen)
    }

    pub fn top(&self) -> &S {
        &self.current
    }

    pub fn top_mut(&mut self) -> &mut S {
        &mut self.current
    }

    pub fn depth(&self) -> usize {
        self.below.len() + 1
    }

    pub fn is_root(&self) -> bool {
        self.below.is_empty()
    }

    /// Screens from the root up to the top
    pub fn iter(&self) -> impl Iterator<Item = &S> {
        self.below.iter().chain(std::iter::once(&self.current))
    }
}
