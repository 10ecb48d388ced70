//! Window - a framed surface owning one root widget.
//!
//! Layout of a bordered window, in its parent's coordinates:
//!
//! ```text
//! (top, left)
//!     ┌─ title ───────┐   ← frame buffer (outer size)
//!     │ view of buffer│   ← surface view, inner size
//!     └───────────────┘
//! ```
//!
//! The root widget lives in the surface buffer, which can be larger than
//! the view; `move_view` scrolls the view over it.

use std::io;

use tracing::debug;

use crate::error::ConfigError;
use crate::layout::{AnchorLookup, Opc, compute_object_positioning};
use crate::renderer::{CellBuffer, DisplaySink, Surface};
use crate::state::Keystroke;
use crate::types::{Attr, Dims, Rect, Style, WidgetId, WindowId, obj_desc};
use crate::widget::{ParentRef, Widget};

use super::config::WindowConfig;

/// Top-level drawable unit.
pub struct Window {
    id: WindowId,
    name: Option<String>,
    parent: Option<WindowId>,
    opc: Opc,
    rect: Rect,
    border: bool,
    border_style: Style,
    title: Option<String>,
    frame: CellBuffer,
    frame_dirty: bool,
    surface: Surface,
    buffer_request: Option<Dims>,
    root: Option<Box<dyn Widget>>,
    focusable: bool,
    focused: bool,
    visible: bool,
}

impl Window {
    /// Build and place a window. `parent` is the screen or the parent
    /// window's buffer.
    pub(crate) fn new(
        id: WindowId,
        config: WindowConfig,
        parent: Dims,
        lookup: &dyn AnchorLookup,
    ) -> Result<Self, ConfigError> {
        let rect = compute_object_positioning(&config.opc, parent, lookup)?;
        let mut window = Self {
            id,
            name: config.name,
            parent: config.parent,
            opc: config.opc,
            rect,
            border: config.border,
            border_style: config.border_style,
            title: config.title,
            frame: CellBuffer::default(),
            frame_dirty: true,
            surface: Surface::new(Dims::default()),
            buffer_request: config.buffer_size,
            root: None,
            focusable: config.focusable,
            focused: false,
            visible: true,
        };
        window.apply_rect(rect);
        Ok(window)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Window this one is nested in.
    pub fn parent(&self) -> Option<WindowId> {
        self.parent
    }

    pub fn opc(&self) -> &Opc {
        &self.opc
    }

    /// Outer rectangle relative to the parent.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn height(&self) -> u16 {
        self.rect.height
    }

    pub fn width(&self) -> u16 {
        self.rect.width
    }

    pub fn top(&self) -> u16 {
        self.rect.top
    }

    pub fn left(&self) -> u16 {
        self.rect.left
    }

    /// Rows of the buffer shown at once.
    pub fn visible_height(&self) -> u16 {
        self.surface.view_dims().height
    }

    /// Columns of the buffer shown at once.
    pub fn visible_width(&self) -> u16 {
        self.surface.view_dims().width
    }

    pub fn buffer_dims(&self) -> Dims {
        self.surface.buffer_dims()
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Drawing target for content not owned by a widget. Call
    /// `request_view_update` on the registry afterwards.
    pub fn buffer_mut(&mut self) -> &mut CellBuffer {
        self.surface.buffer_mut()
    }

    pub fn has_border(&self) -> bool {
        self.border
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
        self.draw_frame();
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub(crate) fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn is_focusable(&self) -> bool {
        self.focusable
    }

    pub fn has_focus(&self) -> bool {
        self.focused
    }

    pub fn describe(&self) -> String {
        match &self.name {
            Some(name) => obj_desc("Window", format_args!("{} {name:?}", self.id)),
            None => obj_desc("Window", self.id),
        }
    }

    // =========================================================================
    // Root widget
    // =========================================================================

    /// Install the root widget, replacing (and dropping) the previous one.
    ///
    /// The root is resolved against the window buffer.
    pub fn add_widget(&mut self, mut widget: Box<dyn Widget>) -> Result<WidgetId, ConfigError> {
        widget.reposition(self.surface.buffer_dims(), &crate::layout::NoSiblings)?;
        widget.common_mut().parent = Some(ParentRef::Window(self.id));
        let id = widget.id();
        debug!(window = %self.describe(), widget = %widget.describe(), "root widget set");

        if let Some(old) = self.root.replace(widget) {
            debug!(window = %self.describe(), widget = %old.describe(), "root widget replaced");
        }
        if self.focused {
            if let Some(root) = self.root.as_mut() {
                root.on_focus();
            }
        }
        self.surface.request_update();
        Ok(id)
    }

    /// Detach the root widget if it has this id.
    pub fn remove_widget(&mut self, id: WidgetId) -> Option<Box<dyn Widget>> {
        if self.root.as_ref().is_none_or(|root| root.id() != id) {
            return None;
        }
        let mut root = self.root.take()?;
        root.common_mut().parent = None;
        self.surface.buffer_mut().clear();
        self.surface.request_update();
        Some(root)
    }

    pub fn destroy_widget(&mut self, id: WidgetId) -> bool {
        self.remove_widget(id).is_some()
    }

    pub fn root(&self) -> Option<&dyn Widget> {
        self.root.as_deref()
    }

    pub fn root_mut(&mut self) -> Option<&mut (dyn Widget + 'static)> {
        self.root.as_deref_mut()
    }

    /// Find a widget anywhere below the root.
    pub fn find_widget_mut(&mut self, id: WidgetId) -> Option<&mut (dyn Widget + 'static)> {
        let root = self.root.as_deref_mut()?;
        if root.id() == id {
            return Some(root);
        }
        root.as_container_mut()?.find_widget_mut(id)
    }

    // =========================================================================
    // Focus
    // =========================================================================

    /// Focusable and visible.
    pub fn accept_focus(&self) -> bool {
        self.focusable && self.visible
    }

    /// Ask the root widget to let go. `false` vetoes the focus change.
    pub fn release_focus(&mut self) -> bool {
        let released = self.root.as_mut().is_none_or(|root| root.release_focus());
        if released {
            self.set_focused(false);
        }
        released
    }

    /// Unconditional focus loss, used when the focus chain is replaced or
    /// the window is hidden. A veto from the root is ignored.
    pub(crate) fn blur(&mut self) {
        if let Some(root) = self.root.as_mut() {
            root.release_focus();
        }
        self.set_focused(false);
    }

    pub(crate) fn gain_focus(&mut self) {
        self.set_focused(true);
        if let Some(root) = self.root.as_mut() {
            root.on_focus();
        }
    }

    fn set_focused(&mut self, focused: bool) {
        if self.focused != focused {
            self.focused = focused;
            self.draw_frame();
        }
    }

    /// Forward a keystroke to the root widget. Hidden windows consume
    /// nothing.
    pub fn process_focus(&mut self, key: &Keystroke) -> bool {
        if !self.visible {
            return false;
        }
        self.root.as_mut().is_some_and(|root| root.process_focus(key))
    }

    /// Physical cursor position `(y, x)` in the window's outer coordinates,
    /// if the focused widget wants one and it is inside the view.
    pub fn sync_cursor(&self) -> Option<(u16, u16)> {
        let root = self.root.as_deref()?;
        if !self.focused || !root.require_cursor() {
            return None;
        }
        let (y, x) = root.cursor()?;
        let rect = root.common().rect();
        self.buffer_to_outer(rect.top + y, rect.left + x)
    }

    /// Map a buffer position to outer window coordinates, if it is shown.
    pub(crate) fn buffer_to_outer(&self, y: u16, x: u16) -> Option<(u16, u16)> {
        let view = self.surface.view_rect();
        if !view.contains(y, x) {
            return None;
        }
        let offset = self.border_offset();
        Some((y - view.top + offset, x - view.left + offset))
    }

    // =========================================================================
    // View and geometry
    // =========================================================================

    /// Move the view origin inside the buffer, clamped.
    pub fn move_view(&mut self, y: i32, x: i32) {
        self.surface.move_view(y, x);
    }

    pub fn move_view_inc(&mut self, dy: i32, dx: i32) {
        self.surface.move_view_inc(dy, dx);
    }

    /// Mark the view for copying on the next refresh.
    pub fn request_update(&mut self) {
        self.surface.request_update();
    }

    pub fn needs_update(&self) -> bool {
        self.surface.needs_update() || self.frame_dirty
    }

    /// Place the window at an explicit position, keeping its size.
    pub(crate) fn move_to(&mut self, top: u16, left: u16) {
        self.opc = Opc::fixed(
            self.rect.height as i32,
            self.rect.width as i32,
            top as i32,
            left as i32,
        );
        self.rect.top = top;
        self.rect.left = left;
        self.frame_dirty = true;
        self.surface.request_update();
    }

    /// Re-resolve from the stored configuration.
    pub fn reposition(&mut self, parent: Dims, lookup: &dyn AnchorLookup) -> Result<(), ConfigError> {
        let rect = compute_object_positioning(&self.opc, parent, lookup)?;
        self.apply_rect(rect);
        if let Some(root) = self.root.as_mut() {
            root.reposition(self.surface.buffer_dims(), &crate::layout::NoSiblings)?;
        }
        Ok(())
    }

    fn border_offset(&self) -> u16 {
        u16::from(self.border)
    }

    fn apply_rect(&mut self, rect: Rect) {
        self.rect = rect;
        let inset = self.border_offset() * 2;
        let view = Dims::new(rect.height.saturating_sub(inset), rect.width.saturating_sub(inset));
        let (lines, cols) = self
            .buffer_request
            .map_or((view.height, view.width), |dims| (dims.height, dims.width));

        if self.surface.buffer_dims() == Dims::default() {
            self.surface = Surface::with_buffer(view, lines, cols);
        } else {
            self.surface.resize_view(view);
            self.surface.resize_buffer(lines, cols);
        }
        self.surface.request_update();

        self.frame = CellBuffer::new(rect.width, rect.height);
        self.draw_frame();
    }

    fn draw_frame(&mut self) {
        self.frame_dirty = true;
        if !self.border {
            return;
        }
        let bounds = self.frame.bounds();
        self.frame.draw_border(bounds, self.border_style);

        if let Some(title) = &self.title {
            let attrs = if self.focused { Attr::BOLD } else { Attr::NONE };
            let style = self.border_style.with_attrs(self.border_style.attrs | attrs);
            let room = bounds.width.saturating_sub(4);
            let title = crate::layout::truncate_text(title, room);
            if !title.is_empty() {
                self.frame.draw_text(2, 0, &title, style);
            }
        }
    }

    // =========================================================================
    // Drawing
    // =========================================================================

    /// Redraw widgets that asked for it and copy the root into the buffer.
    ///
    /// Returns `true` if the buffer content changed.
    pub fn update(&mut self, force: bool) -> bool {
        let Some(root) = self.root.as_mut() else {
            return false;
        };
        if !root.common().is_visible() {
            if !std::mem::take(&mut root.common_mut().needs_update) {
                return false;
            }
            self.surface.buffer_mut().clear();
            self.surface.request_update();
            return true;
        }
        let redrew = root.update(force);
        let rect = root.common().rect();
        let visible = root.common().is_visible();
        let copied = visible
            && root
                .common_mut()
                .surface
                .update_view_into(self.surface.buffer_mut(), rect.top, rect.left, redrew);
        if copied {
            self.surface.request_update();
        }
        copied
    }

    /// Copy the frame (if changed) and the view (if dirty) to `sink`.
    ///
    /// Returns `true` if anything was copied.
    pub fn flush_into(&mut self, sink: &mut dyn DisplaySink, force: bool) -> io::Result<bool> {
        let Rect { height, width, top, left } = self.rect;
        let mut copied = false;

        if self.border && (self.frame_dirty || force) && height >= 2 && width >= 2 {
            sink.copy_region(&self.frame, Rect::new(1, width, 0, 0), top, left)?;
            sink.copy_region(&self.frame, Rect::new(1, width, height - 1, 0), top + height - 1, left)?;
            if height > 2 {
                sink.copy_region(&self.frame, Rect::new(height - 2, 1, 1, 0), top + 1, left)?;
                sink.copy_region(&self.frame, Rect::new(height - 2, 1, 1, width - 1), top + 1, left + width - 1)?;
            }
            copied = true;
        }
        self.frame_dirty = false;

        let offset = self.border_offset();
        copied |= self.surface.update_view(sink, top + offset, left + offset, force)?;
        Ok(copied)
    }
}

impl std::fmt::Debug for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Window")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("parent", &self.parent)
            .field("rect", &self.rect)
            .field("focused", &self.focused)
            .field("visible", &self.visible)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::NoSiblings;
    use crate::renderer::TestBackend;
    use crate::state::KeyKind;
    use crate::widget::{Button, Container, Label};

    fn setup(config: WindowConfig) -> Window {
        Window::new(WindowId(1), config, Dims::new(24, 80), &NoSiblings).unwrap()
    }

    fn framed() -> Window {
        setup(WindowConfig::new(Opc::fixed(5, 12, 2, 3)).border(true).title("demo"))
    }

    #[test]
    fn test_inner_view_excludes_border() {
        let window = framed();
        assert_eq!(window.rect(), Rect::new(5, 12, 2, 3));
        assert_eq!(window.visible_height(), 3);
        assert_eq!(window.visible_width(), 10);
        assert_eq!(window.buffer_dims(), Dims::new(3, 10));
    }

    #[test]
    fn test_buffer_larger_than_view() {
        let window = setup(WindowConfig::new(Opc::fixed(4, 10, 0, 0)).buffer_size(50, 3));
        assert_eq!(window.buffer_dims(), Dims::new(50, 10));
        assert_eq!(window.visible_height(), 4);
    }

    #[test]
    fn test_flush_draws_frame_and_view() {
        let mut window = framed();
        let mut backend = TestBackend::new(20, 10);
        window.buffer_mut().draw_text(0, 0, "hi", Style::default());

        assert!(window.flush_into(&mut backend, false).unwrap());
        let screen = backend.screen();
        assert_eq!(&screen.row_text(2)[3..], "┌─demo─────┐     ");
        assert_eq!(&screen.row_text(3)[3..], "│hi        │     ");
        assert_eq!(&screen.row_text(6)[3..], "└──────────┘     ");

        let copies = backend.copy_count();
        assert!(!window.flush_into(&mut backend, false).unwrap());
        assert_eq!(backend.copy_count(), copies);
    }

    #[test]
    fn test_root_widget_resolves_against_buffer() {
        let mut window = setup(WindowConfig::new(Opc::fixed(6, 20, 0, 0)).border(true));
        let root = Container::new(Opc::fixed(4, 18, 0, 0));
        let id = window.add_widget(Box::new(root)).unwrap();

        let root = window.root().unwrap();
        assert_eq!(root.id(), id);
        assert_eq!(root.get_parent(), Some(ParentRef::Window(WindowId(1))));
    }

    #[test]
    fn test_update_copies_root() {
        let mut window = setup(WindowConfig::new(Opc::fixed(2, 10, 0, 0)));
        window
            .add_widget(Box::new(Label::new(Opc::fixed(1, 5, 1, 1), "label")))
            .unwrap();

        assert!(window.update(false));
        assert_eq!(window.surface().buffer().row_text(1), " label    ");
        assert!(!window.update(false));
    }

    #[test]
    fn test_accept_focus_follows_flags() {
        let mut window = framed();
        assert!(window.accept_focus());

        window.set_visible(false);
        assert!(!window.accept_focus());

        let window = setup(WindowConfig::new(Opc::fixed(2, 2, 0, 0)).focusable(false));
        assert!(!window.accept_focus());
    }

    #[test]
    fn test_process_focus_forwards_to_root() {
        let mut window = framed();
        let mut root = Container::new(Opc::fixed(3, 10, 0, 0));
        root.add_widget(Box::new(Button::new(Opc::fixed(1, 6, 0, 0), "go"))).unwrap();
        window.add_widget(Box::new(root)).unwrap();
        window.gain_focus();

        assert!(window.process_focus(&Keystroke::key(KeyKind::Enter)));
        assert!(!window.process_focus(&Keystroke::char('z')));
    }

    #[test]
    fn test_remove_root() {
        let mut window = framed();
        let id = window.add_widget(Box::new(Label::new(Opc::fixed(1, 4, 0, 0), "x"))).unwrap();

        assert!(window.remove_widget(WidgetId::next()).is_none());
        let root = window.remove_widget(id).unwrap();
        assert!(root.get_parent().is_none());
        assert!(window.root().is_none());
    }

    #[test]
    fn test_move_view_clamps_to_buffer() {
        let mut window = setup(WindowConfig::new(Opc::fixed(5, 5, 0, 0)).buffer_size(10, 10));
        window.move_view(20, 20);
        assert_eq!(window.surface().view_origin(), (5, 5));
        window.move_view_inc(-2, -10);
        assert_eq!(window.surface().view_origin(), (3, 0));
    }

    #[test]
    fn test_buffer_to_outer() {
        let mut window = setup(WindowConfig::new(Opc::fixed(5, 5, 0, 0)).border(true).buffer_size(10, 10));
        window.move_view(2, 2);
        assert_eq!(window.buffer_to_outer(2, 2), Some((1, 1)));
        assert_eq!(window.buffer_to_outer(0, 0), None);
    }

    #[test]
    fn test_describe() {
        let window = setup(WindowConfig::new(Opc::fixed(1, 1, 0, 0)).name("log"));
        assert_eq!(window.describe(), "Window (window#1 \"log\")");
    }
}
