//! Focus System - Window focus chain
//!
//! Ordered list of windows that keyboard focus cycles through, plus the
//! index of the focused entry. At most one window is focused at a time.
//!
//! Every focus move follows the same protocol:
//!
//! 1. find a candidate whose `accept_focus()` is true
//! 2. ask the focused window to `release_focus()`; `false` vetoes the move
//! 3. focus the candidate
//!
//! # Example
//!
//! ```ignore
//! let mut chain = FocusChain::new();
//! chain.set_focus_chain(&mut windows, &[editor, log, status], 0);
//! chain.next_window(&mut windows);   // editor → log
//! chain.process_focus(&mut windows, &key);
//! ```

use tracing::{debug, trace};

use crate::types::WindowId;
use crate::window::WindowRegistry;

use super::keyboard::{KeyBinding, KeyKind, KeyPredicate, Keystroke};

/// Window focus chain.
pub struct FocusChain {
    chain: Vec<WindowId>,
    focused: Option<usize>,
    next_window_func: KeyPredicate,
    previous_window_func: KeyPredicate,
}

impl Default for FocusChain {
    fn default() -> Self {
        Self::new()
    }
}

impl FocusChain {
    /// Empty chain. F2 / Shift+F2 cycle windows.
    pub fn new() -> Self {
        Self::with_bindings(
            KeyBinding::key(KeyKind::F(2)),
            KeyBinding::key(KeyKind::F(2)).with_shift(),
        )
    }

    pub fn with_bindings(next: KeyBinding, previous: KeyBinding) -> Self {
        Self {
            chain: Vec::new(),
            focused: None,
            next_window_func: next.into_predicate(),
            previous_window_func: previous.into_predicate(),
        }
    }

    /// Replace the "go to next window" test.
    pub fn set_next_window_func(&mut self, func: impl Fn(&Keystroke) -> bool + 'static) {
        self.next_window_func = Box::new(func);
    }

    /// Replace the "go to previous window" test.
    pub fn set_previous_window_func(&mut self, func: impl Fn(&Keystroke) -> bool + 'static) {
        self.previous_window_func = Box::new(func);
    }

    pub fn chain(&self) -> &[WindowId] {
        &self.chain
    }

    pub fn focused_index(&self) -> Option<usize> {
        self.focused
    }

    pub fn focused_window(&self) -> Option<WindowId> {
        self.focused.map(|i| self.chain[i])
    }

    pub fn is_focused(&self, id: WindowId) -> bool {
        self.focused_window() == Some(id)
    }

    // =========================================================================
    // Chain setup
    // =========================================================================

    /// Replace the chain and focus entry `new_focus`.
    ///
    /// Fails without touching anything if `new_focus` is out of range. The
    /// chain is replaced but nothing is focused if the entry does not accept
    /// focus.
    pub fn set_focus_chain(&mut self, windows: &mut WindowRegistry, ids: &[WindowId], new_focus: usize) -> bool {
        if new_focus >= ids.len() {
            return false;
        }

        self.blur_current(windows);
        self.chain = ids.to_vec();
        debug!(len = self.chain.len(), "focus chain replaced");

        if accepts(windows, self.chain[new_focus]) {
            self.focus_at(windows, new_focus);
            true
        } else {
            trace!(window = %self.chain[new_focus], "initial window refused focus");
            false
        }
    }

    /// Focus the first window of the chain that accepts focus.
    ///
    /// Leaves nothing focused when none does.
    pub fn init_focus_manager(&mut self, windows: &mut WindowRegistry) -> bool {
        self.blur_current(windows);
        match (0..self.chain.len()).find(|&i| accepts(windows, self.chain[i])) {
            Some(index) => {
                self.focus_at(windows, index);
                true
            }
            None => false,
        }
    }

    /// Append a window to the end of the chain.
    pub fn push(&mut self, id: WindowId) {
        if !self.chain.contains(&id) {
            self.chain.push(id);
        }
    }

    /// Drop a window from the chain (it was destroyed).
    ///
    /// If it was focused, focus moves to the next accepting window in order.
    pub fn remove_window(&mut self, windows: &mut WindowRegistry, id: WindowId) {
        let Some(index) = self.chain.iter().position(|w| *w == id) else {
            return;
        };
        self.chain.remove(index);

        match self.focused {
            Some(current) if current > index => self.focused = Some(current - 1),
            Some(current) if current == index => {
                self.focused = None;
                self.focus_from(windows, index);
            }
            _ => {}
        }
    }

    /// The window was hidden. If it had focus, focus moves to the next
    /// accepting window in order, without asking it to release.
    ///
    /// Returns `true` if focus was taken from it.
    pub fn window_hidden(&mut self, windows: &mut WindowRegistry, id: WindowId) -> bool {
        let Some(index) = self.focused.filter(|&i| self.chain[i] == id) else {
            return false;
        };
        if accepts(windows, id) {
            return false;
        }
        self.blur_current(windows);
        debug!(window = %id, "hidden window lost focus");
        self.focus_from(windows, index + 1);
        true
    }

    /// Empty the chain, unfocusing the current window.
    pub fn clear(&mut self, windows: &mut WindowRegistry) {
        self.blur_current(windows);
        self.chain.clear();
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Focus the next accepting window, wrapping around.
    ///
    /// Returns `false` (focus unchanged) if no other window qualifies or the
    /// focused window vetoes.
    pub fn next_window(&mut self, windows: &mut WindowRegistry) -> bool {
        let count = self.chain.len();
        let candidate = match self.focused {
            Some(current) => (1..count).map(|step| (current + step) % count).find(|&i| accepts(windows, self.chain[i])),
            None => (0..count).find(|&i| accepts(windows, self.chain[i])),
        };
        self.move_focus(windows, candidate)
    }

    /// Focus the previous accepting window, wrapping around.
    pub fn previous_window(&mut self, windows: &mut WindowRegistry) -> bool {
        let count = self.chain.len();
        let candidate = match self.focused {
            Some(current) => (1..count)
                .map(|step| (current + count - step) % count)
                .find(|&i| accepts(windows, self.chain[i])),
            None => (0..count).rev().find(|&i| accepts(windows, self.chain[i])),
        };
        self.move_focus(windows, candidate)
    }

    /// Focus a specific window of the chain.
    pub fn request_focus(&mut self, windows: &mut WindowRegistry, id: WindowId) -> bool {
        let Some(index) = self.chain.iter().position(|w| *w == id) else {
            return false;
        };
        if self.focused == Some(index) {
            return true;
        }
        if !accepts(windows, id) {
            trace!(window = %id, "focus refused");
            return false;
        }
        self.move_focus(windows, Some(index))
    }

    /// Deliver a keystroke: focused window first, then the window
    /// navigation tests.
    pub fn process_focus(&mut self, windows: &mut WindowRegistry, key: &Keystroke) -> bool {
        if let Some(id) = self.focused_window() {
            self.window_hidden(windows, id);
        }
        if let Some(window) = self.focused_window().and_then(|id| windows.get_mut(id)) {
            if window.process_focus(key) {
                return true;
            }
        }

        if (self.next_window_func)(key) {
            self.next_window(windows);
            true
        } else if (self.previous_window_func)(key) {
            self.previous_window(windows);
            true
        } else {
            false
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn move_focus(&mut self, windows: &mut WindowRegistry, candidate: Option<usize>) -> bool {
        let Some(index) = candidate else {
            return false;
        };

        if let Some(window) = self.focused_window().and_then(|id| windows.get_mut(id)) {
            if !window.release_focus() {
                debug!(window = %window.describe(), "focus release vetoed");
                return false;
            }
        }
        self.focused = None;
        self.focus_at(windows, index);
        true
    }

    /// Focus the first accepting window at or after `start`, wrapping.
    fn focus_from(&mut self, windows: &mut WindowRegistry, start: usize) {
        let count = self.chain.len();
        let candidate = (0..count)
            .map(|step| (start + step) % count)
            .find(|&i| accepts(windows, self.chain[i]));
        if let Some(i) = candidate {
            self.focus_at(windows, i);
        }
    }

    fn focus_at(&mut self, windows: &mut WindowRegistry, index: usize) {
        let id = self.chain[index];
        if let Some(window) = windows.get_mut(id) {
            window.gain_focus();
            debug!(window = %window.describe(), "window focused");
        }
        self.focused = Some(index);
    }

    fn blur_current(&mut self, windows: &mut WindowRegistry) {
        if let Some(window) = self.focused_window().and_then(|id| windows.get_mut(id)) {
            window.blur();
        }
        self.focused = None;
    }
}

impl std::fmt::Debug for FocusChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FocusChain")
            .field("chain", &self.chain)
            .field("focused", &self.focused)
            .finish_non_exhaustive()
    }
}

/// Accepts focus and is not inside a hidden parent.
fn accepts(windows: &WindowRegistry, id: WindowId) -> bool {
    windows.get(id).is_some_and(|w| w.accept_focus()) && windows.is_shown(id)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Opc;
    use crate::types::Dims;
    use crate::widget::{Widget, WidgetCommon};
    use crate::window::WindowConfig;

    /// Root widget that refuses to give up focus.
    struct Sticky {
        common: WidgetCommon,
    }

    impl Widget for Sticky {
        fn common(&self) -> &WidgetCommon {
            &self.common
        }
        fn common_mut(&mut self) -> &mut WidgetCommon {
            &mut self.common
        }
        fn kind(&self) -> &'static str {
            "Sticky"
        }
        fn redraw(&mut self) {}
        fn accept_focus(&self) -> bool {
            true
        }
        fn release_focus(&mut self) -> bool {
            false
        }
        fn process_focus(&mut self, key: &Keystroke) -> bool {
            key.as_char() == Some('s')
        }
    }

    fn setup(count: usize) -> (WindowRegistry, Vec<WindowId>) {
        let mut windows = WindowRegistry::new(Dims::new(24, 80));
        let ids = (0..count)
            .map(|i| {
                windows
                    .create_window(WindowConfig::new(Opc::fixed(3, 10, i as i32 * 3, 0)))
                    .unwrap()
            })
            .collect();
        (windows, ids)
    }

    fn focused_count(windows: &WindowRegistry) -> usize {
        windows.windows().filter(|w| w.has_focus()).count()
    }

    #[test]
    fn test_initial_state() {
        let chain = FocusChain::new();
        assert!(chain.chain().is_empty());
        assert_eq!(chain.focused_window(), None);
    }

    #[test]
    fn test_set_focus_chain() {
        let (mut windows, ids) = setup(3);
        let mut chain = FocusChain::new();

        assert!(chain.set_focus_chain(&mut windows, &ids, 1));
        assert_eq!(chain.focused_window(), Some(ids[1]));
        assert!(windows.get(ids[1]).unwrap().has_focus());
        assert_eq!(focused_count(&windows), 1);
    }

    #[test]
    fn test_set_focus_chain_out_of_range() {
        let (mut windows, ids) = setup(2);
        let mut chain = FocusChain::new();
        chain.set_focus_chain(&mut windows, &ids, 0);

        assert!(!chain.set_focus_chain(&mut windows, &ids[..1], 3));
        assert_eq!(chain.chain(), &ids[..]);
        assert_eq!(chain.focused_window(), Some(ids[0]));
    }

    #[test]
    fn test_next_window_wraps() {
        let (mut windows, ids) = setup(3);
        let mut chain = FocusChain::new();
        chain.set_focus_chain(&mut windows, &ids, 1);

        assert!(chain.next_window(&mut windows));
        assert_eq!(chain.focused_window(), Some(ids[2]));
        assert!(chain.next_window(&mut windows));
        assert_eq!(chain.focused_window(), Some(ids[0]));
        assert_eq!(focused_count(&windows), 1);
    }

    #[test]
    fn test_previous_window_wraps() {
        let (mut windows, ids) = setup(3);
        let mut chain = FocusChain::new();
        chain.set_focus_chain(&mut windows, &ids, 0);

        assert!(chain.previous_window(&mut windows));
        assert_eq!(chain.focused_window(), Some(ids[2]));
    }

    #[test]
    fn test_skips_non_focusable() {
        let mut windows = WindowRegistry::new(Dims::new(24, 80));
        let a = windows.create_window(WindowConfig::new(Opc::fixed(1, 1, 0, 0))).unwrap();
        let b = windows
            .create_window(WindowConfig::new(Opc::fixed(1, 1, 1, 0)).focusable(false))
            .unwrap();
        let c = windows.create_window(WindowConfig::new(Opc::fixed(1, 1, 2, 0))).unwrap();
        let mut chain = FocusChain::new();
        chain.set_focus_chain(&mut windows, &[a, b, c], 0);

        assert!(chain.next_window(&mut windows));
        assert_eq!(chain.focused_window(), Some(c));

        windows.hide_window(a);
        assert!(!chain.next_window(&mut windows));
        assert_eq!(chain.focused_window(), Some(c));
    }

    #[test]
    fn test_init_focus_manager() {
        let mut windows = WindowRegistry::new(Dims::new(24, 80));
        let a = windows
            .create_window(WindowConfig::new(Opc::fixed(1, 1, 0, 0)).focusable(false))
            .unwrap();
        let b = windows.create_window(WindowConfig::new(Opc::fixed(1, 1, 1, 0))).unwrap();
        let mut chain = FocusChain::new();
        chain.push(a);
        chain.push(b);

        assert!(chain.init_focus_manager(&mut windows));
        assert_eq!(chain.focused_window(), Some(b));
    }

    #[test]
    fn test_init_focus_manager_empty_state() {
        let mut windows = WindowRegistry::new(Dims::new(24, 80));
        let a = windows
            .create_window(WindowConfig::new(Opc::fixed(1, 1, 0, 0)).focusable(false))
            .unwrap();
        let mut chain = FocusChain::new();
        chain.push(a);

        assert!(!chain.init_focus_manager(&mut windows));
        assert_eq!(chain.focused_window(), None);
        assert!(!chain.next_window(&mut windows));
    }

    #[test]
    fn test_release_veto_keeps_focus() {
        let (mut windows, ids) = setup(2);
        windows
            .get_mut(ids[0])
            .unwrap()
            .add_widget(Box::new(Sticky {
                common: WidgetCommon::new(Opc::fixed(1, 1, 0, 0)),
            }))
            .unwrap();
        let mut chain = FocusChain::new();
        chain.set_focus_chain(&mut windows, &ids, 0);

        assert!(!chain.request_focus(&mut windows, ids[1]));
        assert!(!chain.next_window(&mut windows));
        assert_eq!(chain.focused_window(), Some(ids[0]));
        assert!(windows.get(ids[0]).unwrap().has_focus());
        assert!(!windows.get(ids[1]).unwrap().has_focus());
    }

    #[test]
    fn test_request_focus() {
        let (mut windows, ids) = setup(3);
        let mut chain = FocusChain::new();
        chain.set_focus_chain(&mut windows, &ids, 0);

        assert!(chain.request_focus(&mut windows, ids[2]));
        assert!(chain.is_focused(ids[2]));
        assert!(!windows.get(ids[0]).unwrap().has_focus());

        let stranger = windows.create_window(WindowConfig::new(Opc::fixed(1, 1, 20, 0))).unwrap();
        assert!(!chain.request_focus(&mut windows, stranger));
    }

    #[test]
    fn test_process_focus() {
        let (mut windows, ids) = setup(2);
        windows
            .get_mut(ids[0])
            .unwrap()
            .add_widget(Box::new(Sticky {
                common: WidgetCommon::new(Opc::fixed(1, 1, 0, 0)),
            }))
            .unwrap();
        let mut chain = FocusChain::new();
        chain.set_focus_chain(&mut windows, &ids, 1);

        let f2 = Keystroke::key(KeyKind::F(2));
        assert!(chain.process_focus(&mut windows, &f2));
        assert!(chain.is_focused(ids[0]));

        // Consumed by the window, not a navigation key
        assert!(chain.process_focus(&mut windows, &Keystroke::char('s')));
        assert!(!chain.process_focus(&mut windows, &Keystroke::char('q')));
    }

    #[test]
    fn test_custom_navigation_func() {
        let (mut windows, ids) = setup(2);
        let mut chain = FocusChain::new();
        chain.set_focus_chain(&mut windows, &ids, 0);
        chain.set_next_window_func(|key| key.kind == KeyKind::Tab && key.ctrl);

        assert!(!chain.process_focus(&mut windows, &Keystroke::key(KeyKind::F(2))));
        assert!(chain.process_focus(&mut windows, &Keystroke::key(KeyKind::Tab).with_ctrl()));
        assert!(chain.is_focused(ids[1]));
    }

    #[test]
    fn test_remove_focused_window() {
        let (mut windows, ids) = setup(3);
        let mut chain = FocusChain::new();
        chain.set_focus_chain(&mut windows, &ids, 1);

        windows.destroy_window(ids[1]);
        chain.remove_window(&mut windows, ids[1]);
        assert_eq!(chain.focused_window(), Some(ids[2]));

        chain.remove_window(&mut windows, ids[0]);
        assert_eq!(chain.focused_window(), Some(ids[2]));
        assert_eq!(chain.chain(), &[ids[2]]);
    }
    #[test]
    fn test_window_hidden_moves_focus() {
        let (mut windows, ids) = setup(3);
        let mut chain = FocusChain::new();
        chain.set_focus_chain(&mut windows, &ids, 1);

        assert!(!chain.window_hidden(&mut windows, ids[1]));
        windows.hide_window(ids[1]);
        assert!(!chain.window_hidden(&mut windows, ids[0]));
        assert!(chain.window_hidden(&mut windows, ids[1]));
        assert_eq!(chain.focused_window(), Some(ids[2]));
        assert!(!windows.get(ids[1]).unwrap().has_focus());
        assert_eq!(focused_count(&windows), 1);
    }

    #[test]
    fn test_window_inside_hidden_parent_loses_focus() {
        let (mut windows, ids) = setup(2);
        let nested = windows
            .create_window(WindowConfig::new(Opc::fixed(1, 4, 0, 0)).parent(ids[0]))
            .unwrap();
        let mut chain = FocusChain::new();
        chain.set_focus_chain(&mut windows, &[nested, ids[1]], 0);

        windows.hide_window(ids[0]);
        assert!(!chain.process_focus(&mut windows, &Keystroke::char('s')));
        assert_eq!(chain.focused_window(), Some(ids[1]));
        assert!(!chain.request_focus(&mut windows, nested));
    }
}
