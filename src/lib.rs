//! # termwin
//!
//! Window and widget toolkit for text user interfaces.
//!
//! ## Architecture
//!
//! termwin draws into off-screen cell buffers and copies a view of each one
//! to the terminal. Every object is placed by an anchor configuration that is
//! resolved when the object is created, so misconfiguration surfaces as a
//! [`ConfigError`] before anything is drawn.
//!
//! ```text
//! Opc → compute_object_positioning → Rect → Surface (buffer + view) → Backend
//! ```
//!
//! Keystrokes travel the other way: the [`FocusChain`] hands them to the
//! focused [`Window`], which hands them to its root widget, usually a
//! [`Container`] that forwards them to its focused child.
//!
//! ## Modules
//!
//! - [`types`] - Core types (Cell, Style, Dims, Rect, ids)
//! - [`layout`] - Object positioning configuration and the anchor resolver
//! - [`renderer`] - Cell buffers, surfaces, color pairs and backends
//! - [`widget`] - The widget trait, containers, labels and buttons
//! - [`window`] - Windows and the window registry
//! - [`state`] - Keystrokes, key bindings and the window focus chain
//! - [`pipeline`] - The [`Tui`] driver and its event loop

pub mod error;
pub mod layout;
pub mod pipeline;
pub mod renderer;
pub mod state;
pub mod types;
pub mod widget;
pub mod window;

// Re-export commonly used items
pub use types::*;

pub use error::{Axis, ConfigError, Result, TuiError};

pub use layout::{
    Alignment, Anchor, AnchorLookup, AnchorTarget, NoSiblings, Opc, Side,
    compute_object_positioning, string_width, truncate_text,
};

pub use renderer::{
    Backend, CellBuffer, ColorPair, ColorPairs, CrosstermBackend, DisplaySink, InputEvent,
    Surface, TestBackend,
};

pub use widget::{Button, Container, Label, ParentRef, Widget, WidgetCommon};

pub use window::{Window, WindowConfig, WindowRegistry};

pub use state::{FocusChain, KeyBinding, KeyKind, Keystroke, convert_key_event};

pub use pipeline::{Tui, TuiConfig};
