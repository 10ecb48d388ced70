//! Widget Module - Positionable, focusable units inside a window
//!
//! A widget is anything implementing [`Widget`]: it carries a
//! [`WidgetCommon`] (id, parent back-reference, positioning, surface, flags)
//! and answers the focus capability queries. Containers, windows and the
//! focus chain only ever talk to this trait.
//!
//! # Ownership
//!
//! Widgets are owned top-down: a window owns its root widget, a
//! [`Container`] owns its children as `Box<dyn Widget>`. The parent is
//! recorded as a [`ParentRef`] id, never as a reference.
//!
//! # Update cycle
//!
//! ```text
//! state change → request_update() → update(false) → redraw() into own surface
//!                                                 → parent copies the surface
//! ```

mod button;
mod container;
mod label;

pub use button::Button;
pub use container::Container;
pub use label::Label;

use crate::error::ConfigError;
use crate::layout::{AnchorLookup, Opc, compute_object_positioning};
use crate::renderer::{CellBuffer, Surface};
use crate::state::Keystroke;
use crate::types::{Dims, Rect, WidgetId, WindowId, obj_desc};

// =============================================================================
// Parent reference
// =============================================================================

/// Non-owning link from a widget to whatever owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentRef {
    /// Root widget of a window
    Window(WindowId),
    /// Child of a container
    Widget(WidgetId),
}

// =============================================================================
// WidgetCommon
// =============================================================================

/// State shared by every widget.
#[derive(Debug, Clone)]
pub struct WidgetCommon {
    id: WidgetId,
    pub(crate) parent: Option<ParentRef>,
    opc: Opc,
    rect: Rect,
    pub(crate) surface: Surface,
    visible: bool,
    pub(crate) focused: bool,
    pub(crate) needs_update: bool,
    placed: bool,
}

impl WidgetCommon {
    /// Unplaced widget state. Geometry is resolved when the widget is added
    /// to a container or window.
    pub fn new(opc: Opc) -> Self {
        Self {
            id: WidgetId::next(),
            parent: None,
            opc,
            rect: Rect::default(),
            surface: Surface::new(Dims::default()),
            visible: true,
            focused: false,
            needs_update: true,
            placed: false,
        }
    }

    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn parent(&self) -> Option<ParentRef> {
        self.parent
    }

    pub fn opc(&self) -> &Opc {
        &self.opc
    }

    /// Replace the positioning configuration. Takes effect on the next
    /// reposition of the owner.
    pub fn set_opc(&mut self, opc: Opc) {
        self.opc = opc;
    }

    /// Position relative to the parent's buffer plus size.
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

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    /// Drawing target of the widget.
    pub fn buffer_mut(&mut self) -> &mut CellBuffer {
        self.surface.buffer_mut()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Show or hide the widget. Hidden widgets are not drawn and never
    /// take focus. Inside a container use [`Container::hide_widget`], which
    /// also moves focus off the widget right away.
    pub fn set_visible(&mut self, visible: bool) {
        if self.visible != visible {
            self.visible = visible;
            self.needs_update = true;
        }
    }

    pub fn has_focus(&self) -> bool {
        self.focused
    }

    /// Check if geometry has been resolved at least once.
    pub fn is_placed(&self) -> bool {
        self.placed
    }

    /// Resolve the configuration against the parent and resize the surface.
    pub(crate) fn resolve(&mut self, parent: Dims, lookup: &dyn AnchorLookup) -> Result<(), ConfigError> {
        let rect = compute_object_positioning(&self.opc, parent, lookup)?;
        if rect.dims() != self.rect.dims() || !self.placed {
            self.surface = Surface::new(rect.dims());
        }
        self.rect = rect;
        self.placed = true;
        self.needs_update = true;
        Ok(())
    }
}

// =============================================================================
// Widget trait
// =============================================================================

/// Capability set every widget provides.
///
/// Only `common`, `common_mut`, `kind` and `redraw` are required; the focus
/// hooks default to a passive, non-focusable widget.
pub trait Widget {
    fn common(&self) -> &WidgetCommon;

    fn common_mut(&mut self) -> &mut WidgetCommon;

    /// Short type name used in log lines.
    fn kind(&self) -> &'static str;

    /// Draw the widget into its own surface buffer.
    fn redraw(&mut self);

    /// Whether the widget may currently take focus.
    fn accept_focus(&self) -> bool {
        false
    }

    /// Called after the widget became the focus target.
    fn on_focus(&mut self) {}

    /// Asked before focus moves away. Returning `false` vetoes the move.
    fn release_focus(&mut self) -> bool {
        true
    }

    /// Handle a keystroke while focused. Returns `true` if consumed.
    fn process_focus(&mut self, _key: &Keystroke) -> bool {
        false
    }

    /// Whether the physical cursor should be shown while focused.
    fn require_cursor(&self) -> bool {
        false
    }

    /// Cursor position `(y, x)` inside the widget.
    fn cursor(&self) -> Option<(u16, u16)> {
        None
    }

    fn as_container(&self) -> Option<&Container> {
        None
    }

    fn as_container_mut(&mut self) -> Option<&mut Container> {
        None
    }

    /// Re-resolve geometry against new parent dimensions.
    fn reposition(&mut self, parent: Dims, lookup: &dyn AnchorLookup) -> Result<(), ConfigError> {
        self.common_mut().resolve(parent, lookup)
    }

    /// Redraw if an update was requested (or `force`). Returns `true` if the
    /// surface content changed.
    fn update(&mut self, force: bool) -> bool {
        if !force && !self.common().needs_update {
            return false;
        }
        self.redraw();
        let common = self.common_mut();
        common.needs_update = false;
        common.surface.request_update();
        true
    }

    fn id(&self) -> WidgetId {
        self.common().id()
    }

    fn get_parent(&self) -> Option<ParentRef> {
        self.common().parent()
    }

    /// Ask for a redraw on the next update cycle.
    fn request_update(&mut self) {
        self.common_mut().needs_update = true;
    }

    fn needs_update(&self) -> bool {
        self.common().needs_update
    }

    /// `"<kind> (<id>)"`
    fn describe(&self) -> String {
        obj_desc(self.kind(), self.id())
    }
}

/// Visible and accepting focus.
pub(crate) fn can_take_focus(widget: &dyn Widget) -> bool {
    widget.common().is_visible() && widget.accept_focus()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::NoSiblings;

    struct Plain {
        common: WidgetCommon,
        redraws: usize,
    }

    impl Widget for Plain {
        fn common(&self) -> &WidgetCommon {
            &self.common
        }

        fn common_mut(&mut self) -> &mut WidgetCommon {
            &mut self.common
        }

        fn kind(&self) -> &'static str {
            "Plain"
        }

        fn redraw(&mut self) {
            self.redraws += 1;
        }
    }

    fn setup() -> Plain {
        Plain {
            common: WidgetCommon::new(Opc::fixed(2, 4, 1, 1)),
            redraws: 0,
        }
    }

    #[test]
    fn test_reposition_sizes_surface() {
        let mut widget = setup();
        assert!(!widget.common().is_placed());

        widget.reposition(Dims::new(10, 10), &NoSiblings).unwrap();
        assert!(widget.common().is_placed());
        assert_eq!(widget.common().rect(), Rect::new(2, 4, 1, 1));
        assert_eq!(widget.common().surface().view_dims(), Dims::new(2, 4));
    }

    #[test]
    fn test_update_only_when_requested() {
        let mut widget = setup();
        assert!(widget.update(false));
        assert!(!widget.update(false));
        assert_eq!(widget.redraws, 1);

        widget.request_update();
        assert!(widget.update(false));
        assert!(widget.update(true));
        assert_eq!(widget.redraws, 3);
    }

    #[test]
    fn test_defaults_are_passive() {
        let mut widget = setup();
        assert!(!widget.accept_focus());
        assert!(widget.release_focus());
        assert!(!widget.process_focus(&Keystroke::char('x')));
        assert!(widget.get_parent().is_none());
        assert_eq!(widget.describe(), format!("Plain ({})", widget.id()));
    }

    #[test]
    fn test_hidden_widgets_cannot_take_focus() {
        let mut button = Button::new(Opc::fixed(1, 6, 0, 0), "ok");
        assert!(can_take_focus(&button));
        button.common_mut().set_visible(false);
        assert!(!can_take_focus(&button));
    }
}
