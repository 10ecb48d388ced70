//! Tui - the application context and event loop.
//!
//! [`Tui`] owns everything process-wide: the backend, the window registry,
//! the focus chain and the color pairs. Nothing lives in globals, so tests
//! build one `Tui` per case on a [`TestBackend`](crate::renderer::TestBackend).
//!
//! # Usage
//!
//! **Option 1: Blocking event loop**
//! ```ignore
//! let mut tui = Tui::new(backend, TuiConfig::default())?;
//! let (window, root) = tui.create_window_with_container(config)?;
//! tui.init_focus_manager();
//! tui.run()?;           // blocks until the quit key or stop()
//! let backend = tui.destroy()?;
//! ```
//!
//! **Option 2: Manual ticking**
//! ```ignore
//! while tui.poll_tick(Duration::from_millis(16))? {
//!     // Your custom logic here
//! }
//! ```
//!
//! One tick is: read one event → dispatch it → refresh dirty windows → flush.

use std::time::Duration;

use tracing::{debug, trace};

use crate::error::{ConfigError, Result};
use crate::layout::{Anchor, Opc, Side};
use crate::renderer::{Backend, ColorPair, ColorPairs, InputEvent};
use crate::state::{FocusChain, Keystroke};
use crate::types::{Color, Dims, WidgetId, WindowId};
use crate::widget::Container;
use crate::window::{Window, WindowConfig, WindowRegistry};

use super::config::TuiConfig;

/// Application context.
pub struct Tui<B: Backend> {
    backend: B,
    config: TuiConfig,
    windows: WindowRegistry,
    focus: FocusChain,
    colors: ColorPairs,
    running: bool,
}

impl<B: Backend> Tui<B> {
    /// Initialize the toolkit on `backend`.
    pub fn new(backend: B, config: TuiConfig) -> Result<Self> {
        let screen = backend.size()?;
        let focus = FocusChain::with_bindings(config.next_window.clone(), config.previous_window.clone());
        debug!(?screen, "tui initialized");
        Ok(Self {
            backend,
            config,
            windows: WindowRegistry::new(screen),
            focus,
            colors: ColorPairs::new(),
            running: true,
        })
    }

    /// Tear down: destroy every window, blank the display and hand the
    /// backend back.
    pub fn destroy(mut self) -> Result<B> {
        self.destroy_all_windows();
        self.backend.clear()?;
        self.backend.set_cursor(None)?;
        self.backend.flush()?;
        debug!("tui destroyed");
        Ok(self.backend)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn config(&self) -> &TuiConfig {
        &self.config
    }

    pub fn windows(&self) -> &WindowRegistry {
        &self.windows
    }

    pub fn windows_mut(&mut self) -> &mut WindowRegistry {
        &mut self.windows
    }

    pub fn window(&self, id: WindowId) -> Option<&Window> {
        self.windows.get(id)
    }

    pub fn window_mut(&mut self, id: WindowId) -> Option<&mut Window> {
        self.windows.get_mut(id)
    }

    pub fn focus_chain(&self) -> &FocusChain {
        &self.focus
    }

    pub fn screen(&self) -> Dims {
        self.windows.screen()
    }

    // =========================================================================
    // Colors
    // =========================================================================

    pub fn init_color_pair(&mut self, fg: Color, bg: Color) -> u16 {
        self.colors.init_color_pair(fg, bg)
    }

    pub fn get_color_pair(&self, fg: Color, bg: Color) -> Option<u16> {
        self.colors.get_color_pair(fg, bg)
    }

    pub fn color_pair(&self, id: u16) -> Option<ColorPair> {
        self.colors.pair(id)
    }

    // =========================================================================
    // Windows
    // =========================================================================

    /// Create a window and append it to the focus chain.
    pub fn create_window(&mut self, config: WindowConfig) -> Result<WindowId> {
        let id = self.windows.create_window(config)?;
        self.focus.push(id);
        Ok(id)
    }

    /// Create a window whose root is a container filling its buffer.
    pub fn create_window_with_container(&mut self, config: WindowConfig) -> Result<(WindowId, WidgetId)> {
        let id = self.create_window(config)?;
        let opc = Opc::new()
            .anchor_top(Anchor::parent(Side::Top))
            .anchor_bottom(Anchor::parent(Side::Bottom))
            .anchor_left(Anchor::parent(Side::Left))
            .anchor_right(Anchor::parent(Side::Right));

        let Some(window) = self.windows.get_mut(id) else {
            return Err(ConfigError::UnknownParentWindow(id).into());
        };
        match window.add_widget(Box::new(Container::new(opc))) {
            Ok(root) => Ok((id, root)),
            Err(err) => {
                self.destroy_window(id);
                Err(err.into())
            }
        }
    }

    /// Destroy a window (and its nested windows), fixing up focus.
    pub fn destroy_window(&mut self, id: WindowId) -> bool {
        let removed = self.windows.destroy_window(id);
        for window in &removed {
            self.focus.remove_window(&mut self.windows, *window);
        }
        !removed.is_empty()
    }

    /// Hide a window. If it (or a window nested in it) had focus, focus
    /// moves on along the chain.
    pub fn hide_window(&mut self, id: WindowId) -> bool {
        if !self.windows.hide_window(id) {
            return false;
        }
        if let Some(focused) = self.focus.focused_window() {
            self.focus.window_hidden(&mut self.windows, focused);
        }
        true
    }

    pub fn show_window(&mut self, id: WindowId) -> bool {
        self.windows.show_window(id)
    }

    pub fn destroy_all_windows(&mut self) {
        self.focus.clear(&mut self.windows);
        self.windows.destroy_all();
    }

    // =========================================================================
    // Focus
    // =========================================================================

    pub fn set_focus_chain(&mut self, ids: &[WindowId], new_focus: usize) -> bool {
        self.focus.set_focus_chain(&mut self.windows, ids, new_focus)
    }

    pub fn init_focus_manager(&mut self) -> bool {
        self.focus.init_focus_manager(&mut self.windows)
    }

    pub fn focused_window(&self) -> Option<WindowId> {
        self.focus.focused_window()
    }

    pub fn next_window(&mut self) -> bool {
        self.focus.next_window(&mut self.windows)
    }

    pub fn previous_window(&mut self) -> bool {
        self.focus.previous_window(&mut self.windows)
    }

    pub fn request_focus(&mut self, id: WindowId) -> bool {
        self.focus.request_focus(&mut self.windows, id)
    }

    pub fn set_next_window_func(&mut self, func: impl Fn(&Keystroke) -> bool + 'static) {
        self.focus.set_next_window_func(func);
    }

    pub fn set_previous_window_func(&mut self, func: impl Fn(&Keystroke) -> bool + 'static) {
        self.focus.set_previous_window_func(func);
    }

    /// Route a keystroke through the focus chain.
    pub fn process_focus(&mut self, key: &Keystroke) -> bool {
        self.focus.process_focus(&mut self.windows, key)
    }

    // =========================================================================
    // Drawing
    // =========================================================================

    /// Copy one window (and whatever else is dirty) to the display.
    pub fn refresh_window(&mut self, id: WindowId) -> Result<()> {
        self.windows.request_view_update(id);
        self.refresh_all_windows(false)
    }

    /// Update every dirty window, place the cursor and flush once.
    pub fn refresh_all_windows(&mut self, force: bool) -> Result<()> {
        self.windows.refresh_all(&mut self.backend, force)?;

        let cursor = self.focus.focused_window().and_then(|id| self.windows.cursor_position(id));
        if cursor.is_some() || self.config.hide_cursor {
            self.backend.set_cursor(cursor)?;
        }
        self.backend.flush()?;
        Ok(())
    }

    // =========================================================================
    // Event loop
    // =========================================================================

    /// Handle one input event. Returns `true` if it was consumed.
    pub fn dispatch(&mut self, event: InputEvent) -> bool {
        match event {
            InputEvent::Key(key) => {
                if self.config.quit.as_ref().is_some_and(|quit| quit.matches(&key)) {
                    debug!(%key, "quit requested");
                    self.stop();
                    return true;
                }
                let consumed = self.process_focus(&key);
                trace!(%key, consumed, "keystroke");
                consumed
            }
            InputEvent::Resize(screen) => {
                self.handle_resize(screen);
                true
            }
            InputEvent::None => false,
        }
    }

    /// Re-resolve every window for a new screen size. Windows whose
    /// configuration no longer fits keep their geometry.
    fn handle_resize(&mut self, screen: Dims) {
        debug!(?screen, "screen resized");
        self.windows.resize_screen(screen);
    }

    /// Block for one event, dispatch it and refresh.
    ///
    /// Returns `Ok(false)` once stopped.
    pub fn tick(&mut self) -> Result<bool> {
        if !self.running {
            return Ok(false);
        }
        let event = self.backend.read_event()?;
        self.dispatch(event);
        self.refresh_all_windows(false)?;
        Ok(self.running)
    }

    /// Like [`Tui::tick`] but waits at most `timeout` for input.
    pub fn poll_tick(&mut self, timeout: Duration) -> Result<bool> {
        if !self.running {
            return Ok(false);
        }
        if let Some(event) = self.backend.poll_event(timeout)? {
            self.dispatch(event);
        }
        self.refresh_all_windows(false)?;
        Ok(self.running)
    }

    /// Draw everything, then tick until stopped.
    pub fn run(&mut self) -> Result<()> {
        self.refresh_all_windows(true)?;
        while self.tick()? {}
        Ok(())
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

// =============================================================================
// Tests
// =============================================================================
