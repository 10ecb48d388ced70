//! Container - a widget owning an ordered list of children.
//!
//! Insertion order is both drawing order and tab order. The container keeps
//! the index of the focused child and forwards keystrokes to it; unconsumed
//! navigation keys move focus between children.
//!
//! Focus moves follow one protocol:
//!
//! 1. the candidate must be visible and `accept_focus()`
//! 2. the current child is asked to `release_focus()`; `false` aborts the move
//! 3. the candidate is marked focused and gets `on_focus()`

use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layout::{AnchorLookup, AnchorTarget, Opc};
use crate::state::{KeyBinding, KeyKind, Keystroke};
use crate::types::{Cell, Dims, Rect, Style, WidgetId};

use super::{ParentRef, Widget, WidgetCommon, can_take_focus};

/// Widget holding child widgets.
pub struct Container {
    common: WidgetCommon,
    widgets: Vec<Box<dyn Widget>>,
    focus: Option<usize>,
    next_key: KeyBinding,
    previous_key: KeyBinding,
    background: Style,
}

impl Container {
    /// Empty container. Tab / BackTab move focus between children.
    pub fn new(opc: Opc) -> Self {
        Self {
            common: WidgetCommon::new(opc),
            widgets: Vec::new(),
            focus: None,
            next_key: KeyBinding::key(KeyKind::Tab),
            previous_key: KeyBinding::key(KeyKind::BackTab),
            background: Style::default(),
        }
    }

    /// Replace the keys moving focus to the next / previous child.
    pub fn with_navigation(mut self, next: KeyBinding, previous: KeyBinding) -> Self {
        self.next_key = next;
        self.previous_key = previous;
        self
    }

    pub fn with_background(mut self, style: Style) -> Self {
        self.background = style;
        self
    }

    // =========================================================================
    // Children
    // =========================================================================

    /// Add a child at the end of the order and resolve its geometry.
    ///
    /// Siblings added earlier may be used as anchors. If the container has
    /// not been placed yet, resolution waits until it is.
    pub fn add_widget(&mut self, mut widget: Box<dyn Widget>) -> Result<WidgetId, ConfigError> {
        check_anchor_order(widget.as_ref(), &[])?;

        if self.common.is_placed() {
            let lookup = sibling_lookup(&self.widgets);
            widget.reposition(self.common.rect().dims(), &lookup)?;
        }

        let id = widget.id();
        widget.common_mut().parent = Some(ParentRef::Widget(self.common.id()));
        debug!(container = %self.describe(), widget = %widget.describe(), "widget added");

        self.widgets.push(widget);
        self.common.needs_update = true;
        Ok(id)
    }

    /// Detach a child. Returns `None` (and changes nothing) if the widget is
    /// not a direct child.
    ///
    /// Removing the focused child moves focus to the next eligible sibling,
    /// or clears it when there is none.
    pub fn remove_widget(&mut self, id: WidgetId) -> Option<Box<dyn Widget>> {
        let index = self.index_of(id)?;
        let mut widget = self.widgets.remove(index);
        {
            let common = widget.common_mut();
            common.parent = None;
            common.focused = false;
        }
        debug!(container = %self.describe(), widget = %widget.describe(), "widget removed");

        match self.focus {
            Some(current) if current > index => self.focus = Some(current - 1),
            Some(current) if current == index => {
                self.focus = None;
                self.focus_from(index);
            }
            _ => {}
        }

        self.common.needs_update = true;
        Some(widget)
    }

    /// Hide a child. A hidden child that had focus passes it to the next
    /// eligible sibling without being asked to release it.
    pub fn hide_widget(&mut self, id: WidgetId) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        self.widgets[index].common_mut().set_visible(false);
        self.common.needs_update = true;
        if self.focus == Some(index) {
            self.drop_hidden_focus();
        }
        true
    }

    pub fn show_widget(&mut self, id: WidgetId) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        self.widgets[index].common_mut().set_visible(true);
        self.common.needs_update = true;
        true
    }

    /// Remove and drop a child. Returns `false` if it was not a child.
    pub fn destroy_widget(&mut self, id: WidgetId) -> bool {
        self.remove_widget(id).is_some()
    }

    pub fn widgets(&self) -> &[Box<dyn Widget>] {
        &self.widgets
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    pub fn widget(&self, id: WidgetId) -> Option<&dyn Widget> {
        self.index_of(id).map(|i| self.widgets[i].as_ref())
    }

    pub fn widget_mut(&mut self, id: WidgetId) -> Option<&mut (dyn Widget + 'static)> {
        let index = self.index_of(id)?;
        Some(self.widgets[index].as_mut())
    }

    /// Search the whole subtree for a widget.
    pub fn find_widget(&self, id: WidgetId) -> Option<&dyn Widget> {
        self.widgets.iter().find_map(|w| {
            if w.id() == id {
                Some(w.as_ref())
            } else {
                w.as_container().and_then(|c| c.find_widget(id))
            }
        })
    }

    pub fn find_widget_mut(&mut self, id: WidgetId) -> Option<&mut (dyn Widget + 'static)> {
        for w in self.widgets.iter_mut() {
            if w.id() == id {
                return Some(w.as_mut());
            }
            if let Some(found) = w.as_container_mut().and_then(|c| c.find_widget_mut(id)) {
                return Some(found);
            }
        }
        None
    }

    fn index_of(&self, id: WidgetId) -> Option<usize> {
        self.widgets.iter().position(|w| w.id() == id)
    }

    // =========================================================================
    // Focus
    // =========================================================================

    /// Check if `id` is the focused child.
    pub fn has_focus(&self, id: WidgetId) -> bool {
        self.focused_id() == Some(id)
    }

    pub fn focused_id(&self) -> Option<WidgetId> {
        self.focus.map(|i| self.widgets[i].id())
    }

    pub fn focused_widget(&self) -> Option<&dyn Widget> {
        self.focus.map(|i| self.widgets[i].as_ref())
    }

    /// Focus a specific child.
    ///
    /// Fails if the child does not accept focus or the current child vetoes
    /// the release; focus is unchanged in both cases.
    pub fn request_focus(&mut self, id: WidgetId) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        if !can_take_focus(self.widgets[index].as_ref()) {
            trace!(widget = %self.widgets[index].describe(), "focus refused");
            return false;
        }
        if self.focus == Some(index) {
            return true;
        }
        if !self.release_current() {
            return false;
        }
        self.set_focus(index);
        true
    }

    /// Move focus to the next eligible child after the current one,
    /// wrapping once. Clears focus when nothing qualifies.
    pub fn next_widget(&mut self) -> bool {
        let count = self.widgets.len();
        let start = self.focus.map_or(0, |current| current + 1);
        self.cycle_focus((0..count).map(|step| (start + step) % count))
    }

    /// Move focus to the previous eligible child, wrapping once.
    pub fn previous_widget(&mut self) -> bool {
        let count = self.widgets.len();
        let start = self.focus.map_or(count, |current| current + count);
        self.cycle_focus((1..=count).map(|step| (start - step) % count))
    }

    fn cycle_focus(&mut self, order: impl Iterator<Item = usize>) -> bool {
        if !self.release_current() {
            return false;
        }

        let order: Vec<usize> = order.collect();
        match order.into_iter().find(|&i| can_take_focus(self.widgets[i].as_ref())) {
            Some(index) => {
                self.set_focus(index);
                true
            }
            None => {
                trace!(container = %self.describe(), "no child accepts focus");
                false
            }
        }
    }

    /// Ask the focused child to let go. Clears the focus on success.
    fn release_current(&mut self) -> bool {
        let Some(current) = self.focus else {
            return true;
        };
        let widget = &mut self.widgets[current];
        if !widget.release_focus() {
            debug!(widget = %widget.describe(), "focus release vetoed");
            return false;
        }
        let common = widget.common_mut();
        common.focused = false;
        common.needs_update = true;
        self.focus = None;
        true
    }

    /// Focus the first eligible child at or after `start`, wrapping.
    fn focus_from(&mut self, start: usize) {
        let count = self.widgets.len();
        let candidate = (0..count)
            .map(|step| (start + step) % count)
            .find(|&i| can_take_focus(self.widgets[i].as_ref()));
        if let Some(i) = candidate {
            self.set_focus(i);
        }
    }

    /// The focused child was hidden behind our back: take focus from it.
    fn drop_hidden_focus(&mut self) {
        let Some(current) = self.focus else {
            return;
        };
        if self.widgets[current].common().is_visible() {
            return;
        }
        {
            let common = self.widgets[current].common_mut();
            common.focused = false;
            common.needs_update = true;
        }
        self.focus = None;
        debug!(widget = %self.widgets[current].describe(), "hidden widget lost focus");
        self.focus_from(current + 1);
    }

    fn set_focus(&mut self, index: usize) {
        let widget = &mut self.widgets[index];
        {
            let common = widget.common_mut();
            common.focused = true;
            common.needs_update = true;
        }
        widget.on_focus();
        trace!(widget = %widget.describe(), "focused");
        self.focus = Some(index);
    }

    // =========================================================================
    // Layout
    // =========================================================================

    fn reposition_children(&mut self) -> Result<(), ConfigError> {
        let dims = self.common.rect().dims();
        for index in 0..self.widgets.len() {
            let (done, rest) = self.widgets.split_at_mut(index);
            let Some((widget, later)) = rest.split_first_mut() else {
                break;
            };
            check_anchor_order(widget.as_ref(), later)?;
            let lookup = sibling_lookup(done);
            widget.reposition(dims, &lookup)?;
        }
        Ok(())
    }
}

/// Rectangles of already placed siblings.
fn sibling_lookup(siblings: &[Box<dyn Widget>]) -> impl Fn(AnchorTarget) -> Option<Rect> + '_ {
    move |target| match target {
        AnchorTarget::Widget(id) => siblings
            .iter()
            .find(|w| w.id() == id && w.common().is_placed())
            .map(|w| w.common().rect()),
        _ => None,
    }
}

/// A widget may only anchor to siblings placed before it.
fn check_anchor_order(widget: &dyn Widget, later: &[Box<dyn Widget>]) -> Result<(), ConfigError> {
    for (_, anchor) in widget.common().opc().anchors() {
        if let AnchorTarget::Widget(id) = anchor.target {
            if id == widget.id() || later.iter().any(|w| w.id() == id) {
                return Err(ConfigError::CyclicAnchor { target: anchor.target });
            }
        }
    }
    Ok(())
}

impl Widget for Container {
    fn common(&self) -> &WidgetCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut WidgetCommon {
        &mut self.common
    }

    fn kind(&self) -> &'static str {
        "Container"
    }

    fn redraw(&mut self) {
        let cell = Cell::new(' ').with_colors(self.background.fg, self.background.bg);
        let buffer = self.common.buffer_mut();
        let bounds = buffer.bounds();
        buffer.fill(bounds, cell);
    }

    /// A container takes focus when one of its children can.
    fn accept_focus(&self) -> bool {
        self.widgets.iter().any(|w| can_take_focus(w.as_ref()))
    }

    /// Restore the remembered child, or pick the first eligible one.
    fn on_focus(&mut self) {
        match self.focus {
            Some(current) if can_take_focus(self.widgets[current].as_ref()) => self.set_focus(current),
            _ => {
                self.focus = None;
                self.next_widget();
            }
        }
    }

    /// The focused child stays remembered but stops drawing as focused.
    fn release_focus(&mut self) -> bool {
        let Some(current) = self.focus else {
            return true;
        };
        let widget = &mut self.widgets[current];
        if !widget.release_focus() {
            return false;
        }
        let common = widget.common_mut();
        common.focused = false;
        common.needs_update = true;
        true
    }

    /// Focused child first, then the navigation keys.
    fn process_focus(&mut self, key: &Keystroke) -> bool {
        self.drop_hidden_focus();
        if let Some(current) = self.focus {
            if self.widgets[current].process_focus(key) {
                return true;
            }
        }

        if self.next_key.matches(key) {
            self.next_widget();
            self.focus.is_some()
        } else if self.previous_key.matches(key) {
            self.previous_widget();
            self.focus.is_some()
        } else {
            false
        }
    }

    fn require_cursor(&self) -> bool {
        self.focused_widget()
            .is_some_and(|w| w.common().is_visible() && w.require_cursor())
    }

    /// Cursor of the focused child, in container coordinates.
    fn cursor(&self) -> Option<(u16, u16)> {
        let widget = self.focused_widget()?;
        let (y, x) = widget.cursor()?;
        let rect = widget.common().rect();
        Some((rect.top + y, rect.left + x))
    }

    fn as_container(&self) -> Option<&Container> {
        Some(self)
    }

    fn as_container_mut(&mut self) -> Option<&mut Container> {
        Some(self)
    }

    fn reposition(&mut self, parent: Dims, lookup: &dyn AnchorLookup) -> Result<(), ConfigError> {
        self.common.resolve(parent, lookup)?;
        self.reposition_children()
    }

    /// Update children, then recomposite them if anything changed.
    fn update(&mut self, force: bool) -> bool {
        let mut changed = force || self.common.needs_update;
        for widget in self.widgets.iter_mut() {
            if !widget.common().is_visible() {
                // a pending update on a hidden child means it just vanished
                changed |= std::mem::take(&mut widget.common_mut().needs_update);
                continue;
            }
            changed |= widget.update(force);
            changed |= widget.common().surface().needs_update();
        }
        if !changed {
            return false;
        }

        self.redraw();
        for widget in self.widgets.iter_mut().filter(|w| w.common().is_visible()) {
            let rect = widget.common().rect();
            widget
                .common_mut()
                .surface
                .update_view_into(self.common.surface.buffer_mut(), rect.top, rect.left, true);
        }

        self.common.needs_update = false;
        self.common.surface.request_update();
        true
    }
}

// =============================================================================
// Tests
// =============================================================================
