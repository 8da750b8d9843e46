//! Keyboard modifier state tracking.

/// Keyboard modifier state.
///
/// Tracks which modifier keys are currently pressed so keybindings such as
/// `Ctrl+Shift+Z` can be matched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    /// Creates a new Modifiers instance with all keys released.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any command modifier (Ctrl or Alt) is held.
    pub fn command_held(&self) -> bool {
        self.ctrl || self.alt
    }

    /// Releases every modifier.
    pub fn clear(&mut self) {
        *self = Self::new();
    }
}
