//! Anchors: references to an edge of another object.

use std::fmt;

use crate::types::{WidgetId, WindowId};

/// Edge (or center line) of an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Top,
    Bottom,
    /// Vertical center line.
    Middle,
    Left,
    Right,
    /// Horizontal center line.
    Center,
}

impl Side {
    /// Sides usable by the top/bottom/middle anchors.
    #[inline]
    pub fn is_vertical(self) -> bool {
        matches!(self, Side::Top | Side::Bottom | Side::Middle)
    }

    /// Sides usable by the left/right/center anchors.
    #[inline]
    pub fn is_horizontal(self) -> bool {
        !self.is_vertical()
    }
}

/// Object an anchor points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnchorTarget {
    /// The parent of the anchored object. Resolved from the parent's
    /// dimensions, never from its own position.
    Parent,
    /// A sibling widget inside the same container.
    Widget(WidgetId),
    /// A sibling window sharing the same parent.
    Window(WindowId),
}

impl fmt::Display for AnchorTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnchorTarget::Parent => f.write_str("parent"),
            AnchorTarget::Widget(id) => write!(f, "{id}"),
            AnchorTarget::Window(id) => write!(f, "{id}"),
        }
    }
}

/// "My edge equals `side` of `target`, shifted by `pad` cells."
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    pub target: AnchorTarget,
    pub side: Side,
    pub pad: i32,
}

impl Anchor {
    pub fn new(target: AnchorTarget, side: Side) -> Self {
        Self {
            target,
            side,
            pad: 0,
        }
    }

    /// Anchor to an edge of the parent.
    pub fn parent(side: Side) -> Self {
        Self::new(AnchorTarget::Parent, side)
    }

    /// Anchor to an edge of a sibling widget.
    pub fn widget(id: WidgetId, side: Side) -> Self {
        Self::new(AnchorTarget::Widget(id), side)
    }

    /// Anchor to an edge of a sibling window.
    pub fn window(id: WindowId, side: Side) -> Self {
        Self::new(AnchorTarget::Window(id), side)
    }

    pub fn with_pad(mut self, pad: i32) -> Self {
        self.pad = pad;
        self
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:?}", self.target, self.side)?;
        if self.pad != 0 {
            write!(f, "{:+}", self.pad)?;
        }
        Ok(())
    }
}
