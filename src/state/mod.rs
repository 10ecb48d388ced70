//! State Module - Runtime input and focus state
//!
//! - **Keyboard** - Keystrokes, key bindings, crossterm conversion
//! - **Focus** - The window focus chain

mod focus;
mod keyboard;

pub use focus::*;
pub use keyboard::*;
