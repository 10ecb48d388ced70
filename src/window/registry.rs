//! Window registry - every live window, its nesting and z-order.
//!
//! The registry is an explicit context object: create one per screen (or
//! per test) and pass it around. Windows are addressed by [`WindowId`];
//! unknown ids yield `None`/`false`, never a panic.
//!
//! # Refresh
//!
//! ```text
//! 1. update widgets of every visible window (redraw what asked for it)
//! 2. copy nested windows into their parent's buffer, deepest first
//! 3. copy top-level windows to the backend in z-order
//! ```
//!
//! Each copy goes through `Surface::update_view`, so clean windows cost
//! nothing.

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashSet};
use std::io;

use tracing::{debug, trace, warn};

use crate::error::ConfigError;
use crate::layout::AnchorTarget;
use crate::renderer::Backend;
use crate::types::{Cell, Dims, Rect, WindowId};

use super::config::WindowConfig;
use super::window::Window;

/// Owner of all windows.
#[derive(Debug)]
pub struct WindowRegistry {
    windows: BTreeMap<WindowId, Window>,
    /// Bottom to top.
    z_order: Vec<WindowId>,
    next_id: u32,
    screen: Dims,
    full_repaint: bool,
}

impl WindowRegistry {
    /// Empty registry for a screen of the given size.
    pub fn new(screen: Dims) -> Self {
        Self {
            windows: BTreeMap::new(),
            z_order: Vec::new(),
            next_id: 1,
            screen,
            full_repaint: true,
        }
    }

    pub fn screen(&self) -> Dims {
        self.screen
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn get(&self, id: WindowId) -> Option<&Window> {
        self.windows.get(&id)
    }

    pub fn get_mut(&mut self, id: WindowId) -> Option<&mut Window> {
        self.windows.get_mut(&id)
    }

    pub fn contains(&self, id: WindowId) -> bool {
        self.windows.contains_key(&id)
    }

    /// First window created with this name.
    pub fn find_by_name(&self, name: &str) -> Option<WindowId> {
        self.windows.values().find(|w| w.name() == Some(name)).map(Window::id)
    }

    /// Visible, and every window it is nested in is visible too.
    pub fn is_shown(&self, id: WindowId) -> bool {
        let mut current = Some(id);
        while let Some(window) = current.and_then(|w| self.windows.get(&w)) {
            if !window.is_visible() {
                return false;
            }
            current = window.parent();
        }
        self.windows.contains_key(&id)
    }

    /// Windows in creation order.
    pub fn windows(&self) -> impl Iterator<Item = &Window> {
        self.windows.values()
    }

    /// Window ids, bottom to top.
    pub fn z_order(&self) -> &[WindowId] {
        &self.z_order
    }

    /// Windows nested directly inside `parent`.
    pub fn children_of(&self, parent: WindowId) -> Vec<WindowId> {
        self.windows
            .values()
            .filter(|w| w.parent() == Some(parent))
            .map(Window::id)
            .collect()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Create and place a window.
    ///
    /// Top-level windows resolve against the screen, nested windows against
    /// the parent's buffer. Sibling windows (same parent) may be anchors.
    pub fn create_window(&mut self, config: WindowConfig) -> Result<WindowId, ConfigError> {
        let parent_dims = match config.parent {
            None => self.screen,
            Some(parent) => self
                .windows
                .get(&parent)
                .map(Window::buffer_dims)
                .ok_or(ConfigError::UnknownParentWindow(parent))?,
        };

        let id = WindowId(self.next_id);
        let window = {
            let lookup = sibling_lookup(&self.windows, id, config.parent);
            Window::new(id, config, parent_dims, &lookup)?
        };
        self.next_id += 1;

        debug!(window = %window.describe(), rect = ?window.rect(), "window created");
        self.windows.insert(id, window);
        self.z_order.push(id);
        Ok(id)
    }

    /// Destroy a window and every window nested in it.
    ///
    /// Returns the removed ids, empty if `id` is unknown.
    pub fn destroy_window(&mut self, id: WindowId) -> Vec<WindowId> {
        let Some(window) = self.windows.get(&id) else {
            return Vec::new();
        };
        let parent = window.parent();
        let rect = window.rect();

        let mut doomed = vec![id];
        let mut next = 0;
        while next < doomed.len() {
            let current = doomed[next];
            doomed.extend(self.children_of(current));
            next += 1;
        }

        for removed in &doomed {
            if let Some(window) = self.windows.remove(removed) {
                debug!(window = %window.describe(), "window destroyed");
            }
        }
        self.z_order.retain(|w| !doomed.contains(w));

        if let Some(parent) = parent.and_then(|p| self.windows.get_mut(&p)) {
            parent.buffer_mut().fill(rect, Cell::default());
            parent.request_update();
        }
        self.full_repaint = true;
        doomed
    }

    /// Destroy every window. Returns the removed ids.
    pub fn destroy_all(&mut self) -> Vec<WindowId> {
        let ids: Vec<WindowId> = self.windows.keys().copied().collect();
        self.windows.clear();
        self.z_order.clear();
        self.full_repaint = true;
        debug!(count = ids.len(), "all windows destroyed");
        ids
    }

    // =========================================================================
    // Placement and visibility
    // =========================================================================

    /// Move a window to `(top, left)` inside its parent, keeping its size.
    pub fn move_window(&mut self, id: WindowId, top: u16, left: u16) -> bool {
        let Some(window) = self.windows.get_mut(&id) else {
            return false;
        };
        let old = window.rect();
        window.move_to(top, left);
        let parent = window.parent();
        self.clear_in_parent(parent, old);
        self.full_repaint = true;
        true
    }

    /// Raise a window above its siblings.
    pub fn move_window_to_top(&mut self, id: WindowId) -> bool {
        let Some(index) = self.z_order.iter().position(|w| *w == id) else {
            return false;
        };
        self.z_order.remove(index);
        self.z_order.push(id);
        self.full_repaint = true;
        true
    }

    pub fn show_window(&mut self, id: WindowId) -> bool {
        self.set_visible(id, true)
    }

    /// Hide a window. Hidden windows are not drawn and cannot take focus.
    pub fn hide_window(&mut self, id: WindowId) -> bool {
        self.set_visible(id, false)
    }

    fn set_visible(&mut self, id: WindowId, visible: bool) -> bool {
        let Some(window) = self.windows.get_mut(&id) else {
            return false;
        };
        window.set_visible(visible);
        let (parent, rect) = (window.parent(), window.rect());
        if !visible {
            self.clear_in_parent(parent, rect);
        }
        self.full_repaint = true;
        true
    }

    fn clear_in_parent(&mut self, parent: Option<WindowId>, rect: Rect) {
        if let Some(parent) = parent.and_then(|p| self.windows.get_mut(&p)) {
            parent.buffer_mut().fill(rect, Cell::default());
            parent.request_update();
        }
    }

    pub fn set_window_title(&mut self, id: WindowId, title: impl Into<String>) -> bool {
        match self.windows.get_mut(&id) {
            Some(window) => {
                window.set_title(title);
                true
            }
            None => false,
        }
    }

    /// Mark a window and every window it is nested in as needing a copy.
    pub fn request_view_update(&mut self, id: WindowId) -> bool {
        if !self.windows.contains_key(&id) {
            return false;
        }
        let mut current = Some(id);
        while let Some(window) = current.and_then(|w| self.windows.get_mut(&w)) {
            window.request_update();
            current = window.parent();
        }
        true
    }

    /// Force every window to be copied on the next refresh.
    pub fn request_full_repaint(&mut self) {
        self.full_repaint = true;
    }

    /// Change the screen size and re-resolve every window.
    ///
    /// Windows whose configuration no longer resolves keep their previous
    /// geometry; their errors are returned.
    pub fn resize_screen(&mut self, screen: Dims) -> Vec<(WindowId, ConfigError)> {
        self.screen = screen;
        self.full_repaint = true;

        let mut errors = Vec::new();
        for id in self.by_depth(false) {
            let Some(mut window) = self.windows.remove(&id) else {
                continue;
            };
            let parent_dims = match window.parent() {
                None => Some(self.screen),
                Some(parent) => self.windows.get(&parent).map(Window::buffer_dims),
            };
            if let Some(parent_dims) = parent_dims {
                let lookup = sibling_lookup(&self.windows, id, window.parent());
                if let Err(err) = window.reposition(parent_dims, &lookup) {
                    warn!(window = %window.describe(), error = %err, "window keeps its geometry");
                    errors.push((id, err));
                }
            }
            self.windows.insert(id, window);
        }
        errors
    }

    // =========================================================================
    // Refresh
    // =========================================================================

    /// Update widgets and copy every dirty window to `backend`.
    ///
    /// With `force` (or after a structural change) everything is copied.
    /// Does not flush the backend. Returns `true` if anything was copied.
    pub fn refresh_all<B: Backend>(&mut self, backend: &mut B, force: bool) -> io::Result<bool> {
        let force = force || std::mem::take(&mut self.full_repaint);
        if force {
            backend.clear()?;
        }

        let mut redrawn = HashSet::new();
        for window in self.windows.values_mut().filter(|w| w.is_visible()) {
            if window.update(force) {
                redrawn.insert(window.id());
            }
        }

        for id in self.by_depth(true) {
            let Some(mut child) = self.windows.remove(&id) else {
                continue;
            };
            if let Some(parent_id) = child.parent() {
                if let Some(parent) = self.windows.get_mut(&parent_id) {
                    let force_copy = force || redrawn.contains(&parent_id);
                    if child.is_visible() && child.flush_into(parent.buffer_mut(), force_copy)? {
                        trace!(window = %child.describe(), "composited into parent");
                        parent.request_update();
                        redrawn.insert(parent_id);
                    }
                }
            }
            self.windows.insert(id, child);
        }

        let mut copied = false;
        for id in &self.z_order {
            let Some(window) = self.windows.get_mut(id) else {
                continue;
            };
            if window.parent().is_none() && window.is_visible() {
                copied |= window.flush_into(&mut *backend, force)?;
            }
        }
        Ok(copied)
    }

    /// Screen position of the physical cursor requested by window `id`.
    pub fn cursor_position(&self, id: WindowId) -> Option<(u16, u16)> {
        let mut window = self.windows.get(&id).filter(|w| w.is_visible())?;
        let (mut y, mut x) = window.sync_cursor()?;
        loop {
            y += window.top();
            x += window.left();
            match window.parent() {
                None => return Some((y, x)),
                Some(parent) => {
                    window = self.windows.get(&parent).filter(|w| w.is_visible())?;
                    (y, x) = window.buffer_to_outer(y, x)?;
                }
            }
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn depth(&self, id: WindowId) -> usize {
        let mut depth = 0;
        let mut current = self.windows.get(&id).and_then(Window::parent);
        while let Some(parent) = current {
            depth += 1;
            current = self.windows.get(&parent).and_then(Window::parent);
        }
        depth
    }

    /// Window ids ordered by nesting depth, ties in z-order.
    ///
    /// `deepest_first` also skips top-level windows.
    fn by_depth(&self, deepest_first: bool) -> Vec<WindowId> {
        let z_index = |id: &WindowId| self.z_order.iter().position(|w| w == id).unwrap_or(usize::MAX);
        let mut ids: Vec<(usize, usize, WindowId)> = self
            .windows
            .keys()
            .map(|id| (self.depth(*id), z_index(id), *id))
            .filter(|(depth, _, _)| !deepest_first || *depth > 0)
            .collect();
        if deepest_first {
            ids.sort_by_key(|&(depth, z, _)| (Reverse(depth), z));
        } else {
            ids.sort_by_key(|&(depth, _, id)| (depth, id));
        }
        ids.into_iter().map(|(_, _, id)| id).collect()
    }
}

/// Rectangles of sibling windows created before `id`.
fn sibling_lookup(
    windows: &BTreeMap<WindowId, Window>,
    id: WindowId,
    parent: Option<WindowId>,
) -> impl Fn(AnchorTarget) -> Option<Rect> + '_ {
    move |target| match target {
        AnchorTarget::Window(other) if other < id => windows
            .get(&other)
            .filter(|w| w.parent() == parent)
            .map(Window::rect),
        _ => None,
    }
}

// =============================================================================
// Tests
// =============================================================================
