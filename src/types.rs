//! Core types for termwin.
//!
//! Cells, attributes, rectangles and the ids used to address windows and
//! widgets. Everything else in the crate is built from these.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

pub use crossterm::style::Color;

// =============================================================================
// Cell Attributes (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Text attributes as a bitfield for efficient storage and comparison.
    ///
    /// Combine with bitwise OR: `Attr::BOLD | Attr::UNDERLINE`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Attr: u8 {
        const NONE = 0;
        const BOLD = 1 << 0;
        const DIM = 1 << 1;
        const ITALIC = 1 << 2;
        const UNDERLINE = 1 << 3;
        const BLINK = 1 << 4;
        const INVERSE = 1 << 5;
        const HIDDEN = 1 << 6;
        const STRIKETHROUGH = 1 << 7;
    }
}

// =============================================================================
// Cell - The atomic unit of terminal rendering
// =============================================================================

/// A single terminal cell.
///
/// Buffers, views and the backend all trade in these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Character shown in the cell (space when empty).
    pub ch: char,
    /// Foreground color.
    pub fg: Color,
    /// Background color.
    pub bg: Color,
    /// Attribute flags (bold, inverse, etc.).
    pub attrs: Attr,
}

impl Cell {
    /// A cell with the given character and terminal default colors.
    pub const fn new(ch: char) -> Self {
        Self {
            ch,
            fg: Color::Reset,
            bg: Color::Reset,
            attrs: Attr::NONE,
        }
    }

    /// Same cell with different colors.
    pub const fn with_colors(mut self, fg: Color, bg: Color) -> Self {
        self.fg = fg;
        self.bg = bg;
        self
    }

    /// Same cell with different attributes.
    pub const fn with_attrs(mut self, attrs: Attr) -> Self {
        self.attrs = attrs;
        self
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::new(' ')
    }
}

/// Colors and attributes applied when printing text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    pub fg: Color,
    pub bg: Color,
    pub attrs: Attr,
}

impl Style {
    pub const fn new(fg: Color, bg: Color) -> Self {
        Self { fg, bg, attrs: Attr::NONE }
    }

    pub const fn with_attrs(mut self, attrs: Attr) -> Self {
        self.attrs = attrs;
        self
    }
}

impl Default for Style {
    fn default() -> Self {
        Self::new(Color::Reset, Color::Reset)
    }
}

// =============================================================================
// Geometry
// =============================================================================

/// Height and width of an object, in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dims {
    pub height: u16,
    pub width: u16,
}

impl Dims {
    pub const fn new(height: u16, width: u16) -> Self {
        Self { height, width }
    }
}

/// An absolute rectangle: position relative to the parent plus size.
///
/// Field order follows the resolver output `(height, width, top, left)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub height: u16,
    pub width: u16,
    pub top: u16,
    pub left: u16,
}

impl Rect {
    pub const fn new(height: u16, width: u16, top: u16, left: u16) -> Self {
        Self {
            height,
            width,
            top,
            left,
        }
    }

    /// First row below the rectangle.
    #[inline]
    pub fn bottom(&self) -> u16 {
        self.top.saturating_add(self.height)
    }

    /// First column right of the rectangle.
    #[inline]
    pub fn right(&self) -> u16 {
        self.left.saturating_add(self.width)
    }

    #[inline]
    pub fn dims(&self) -> Dims {
        Dims::new(self.height, self.width)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.height == 0 || self.width == 0
    }

    /// Check if a point is inside this rect.
    #[inline]
    pub fn contains(&self, y: u16, x: u16) -> bool {
        y >= self.top && y < self.bottom() && x >= self.left && x < self.right()
    }

    /// Compute intersection of two rects.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let top = self.top.max(other.top);
        let left = self.left.max(other.left);
        let bottom = self.bottom().min(other.bottom());
        let right = self.right().min(other.right());

        if bottom > top && right > left {
            Some(Rect::new(bottom - top, right - left, top, left))
        } else {
            None
        }
    }
}

// =============================================================================
// Object Ids
// =============================================================================

/// Identifier of a widget. Unique for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(u32);

impl WidgetId {
    /// Allocate a fresh id.
    pub fn next() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "widget#{}", self.0)
    }
}

/// Identifier of a window. Allocated by the window registry that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(pub(crate) u32);

impl WindowId {
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window#{}", self.0)
    }
}

/// Description of an object for log lines: `<kind> (<id>)`.
pub fn obj_desc(kind: &str, id: impl fmt::Display) -> String {
    format!("{kind} ({id})")
}

// =============================================================================
// Tests
// =============================================================================
