//! Driver configuration.

use crate::state::{KeyBinding, KeyKind};

/// Options of the [`Tui`](super::Tui) driver.
///
/// ```ignore
/// let config = TuiConfig::default()
///     .quit(None)
///     .next_window(KeyBinding::char('n').with_alt());
/// ```
#[derive(Debug, Clone)]
pub struct TuiConfig {
    /// Moves focus to the next window of the chain (default F2).
    pub next_window: KeyBinding,
    /// Moves focus to the previous window of the chain (default Shift+F2).
    pub previous_window: KeyBinding,
    /// Stops the run loop (default Ctrl+Q). `None` disables it.
    pub quit: Option<KeyBinding>,
    /// Hide the physical cursor when no focused widget asks for it.
    pub hide_cursor: bool,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            next_window: KeyBinding::key(KeyKind::F(2)),
            previous_window: KeyBinding::key(KeyKind::F(2)).with_shift(),
            quit: Some(KeyBinding::char('q').with_ctrl()),
            hide_cursor: true,
        }
    }
}

impl TuiConfig {
    pub fn next_window(mut self, binding: KeyBinding) -> Self {
        self.next_window = binding;
        self
    }

    pub fn previous_window(mut self, binding: KeyBinding) -> Self {
        self.previous_window = binding;
        self
    }

    pub fn quit(mut self, binding: Option<KeyBinding>) -> Self {
        self.quit = binding;
        self
    }

    pub fn hide_cursor(mut self, hide: bool) -> Self {
        self.hide_cursor = hide;
        self
    }
}
