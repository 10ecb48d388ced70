//! Pipeline Module
//!
//! The driver that connects input, windows and the terminal.
//!
//! # Pipeline Architecture
//!
//! ```text
//! Backend event → Tui::dispatch → FocusChain → Window → Container → Widget
//!                                                            ↓
//!                Backend flush ← WindowRegistry::refresh_all ← update()
//! ```
//!
//! ## Data Flow
//!
//! 1. **dispatch** - quit binding, window navigation, then the focused window
//! 2. **update** - widgets redraw into their own surfaces, containers composite
//! 3. **refresh** - windows copy their views to the backend, the cursor follows focus

mod config;
mod tui;

pub use config::TuiConfig;
pub use tui::Tui;
