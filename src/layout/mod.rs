//! Layout Module
//!
//! Anchor-based positioning for windows and widgets.
//!
//! # Architecture
//!
//! Every object carries an [`Opc`] describing where it wants to be:
//!
//! 1. Anchors bind an edge to an edge of the parent or of a sibling
//! 2. Explicit sizes and coordinates fill in what anchors leave open
//! 3. The OPC classifies itself into one vertical and one horizontal mode
//! 4. [`compute_object_positioning`] turns it into an absolute [`Rect`]
//!
//! Resolution happens when the object is created or repositioned, never at
//! render time, so a bad configuration is reported before anything is drawn.
//!
//! [`Rect`]: crate::types::Rect

mod anchor;
mod opc;
mod resolver;
mod text_measure;

pub use anchor::*;
pub use opc::*;
pub use resolver::*;
pub use text_measure::*;
