//! Error types for termwin

use std::io;

use thiserror::Error;

use crate::layout::{AnchorTarget, Side};
use crate::types::WindowId;

/// Positioning axis, used to say which half of a configuration failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Vertical,
    Horizontal,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::Vertical => f.write_str("vertical"),
            Axis::Horizontal => f.write_str("horizontal"),
        }
    }
}

/// Configuration error raised while building or repositioning an object.
///
/// The object that produced it is never shown.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Not enough information to place the object on this axis
    #[error("insufficient {0} positioning information")]
    Insufficient(Axis),

    /// Anchor side does not belong to the field it was stored in
    #[error("anchor side {side:?} is not valid for the {field} anchor")]
    InvalidAnchorSide { field: &'static str, side: Side },

    /// Anchor references an object that is not positioned yet
    #[error("anchor target {0} is unknown or not positioned yet")]
    UnknownAnchorTarget(AnchorTarget),

    /// Anchor references the object itself or an object resolved after it
    #[error("cyclic anchor: {target} is not resolved before the anchored object")]
    CyclicAnchor { target: AnchorTarget },

    /// Opposing anchors resolved to an empty or inverted span
    #[error("{axis} anchors are inverted: start {start} >= end {end}")]
    InvertedAnchors { axis: Axis, start: i32, end: i32 },

    /// Resolved size is zero, negative or too large for the terminal
    #[error("{axis} size {size} is out of range")]
    InvalidSize { axis: Axis, size: i32 },

    /// Resolved position lies before the parent origin
    #[error("{axis} position {position} is out of range")]
    InvalidPosition { axis: Axis, position: i32 },

    /// Parent window of a nested window does not exist
    #[error("parent window {0} does not exist")]
    UnknownParentWindow(WindowId),
}

/// Top-level error type
#[derive(Error, Debug)]
pub enum TuiError {
    /// Object configuration error
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Terminal I/O error
    #[error("terminal I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for termwin operations
pub type Result<T> = std::result::Result<T, TuiError>;
