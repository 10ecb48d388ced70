//! Window Module
//!
//! Windows are the top-level drawable units. Each one owns a surface (buffer
//! plus view), an optional border with title, and a single root widget.
//! Windows may be nested: a nested window is positioned and drawn inside its
//! parent's buffer.
//!
//! - [`WindowConfig`] - construction options
//! - [`Window`] - one window
//! - [`WindowRegistry`] - every live window, z-order and refresh

mod config;
mod registry;
#[allow(clippy::module_inception)]
mod window;

pub use config::WindowConfig;
pub use registry::WindowRegistry;
pub use window::Window;
