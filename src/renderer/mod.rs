//! Renderer Module
//!
//! Everything between drawn cells and the terminal:
//!
//! - [`CellBuffer`] - 2D grid of cells with drawing primitives
//! - [`Surface`] - buffer plus the view that is copied out of it
//! - [`Backend`] - terminal boundary ([`CrosstermBackend`] and the headless [`TestBackend`])
//! - [`ColorPairs`] - registry of foreground/background pairs

mod backend;
mod buffer;
mod color;
mod surface;
mod terminal;

pub use backend::{Backend, DisplaySink, InputEvent, TestBackend};
pub use buffer::{CONTINUATION, CellBuffer};
pub use color::{ColorPair, ColorPairs};
pub use surface::Surface;
pub use terminal::CrosstermBackend;
