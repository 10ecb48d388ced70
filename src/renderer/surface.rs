//! Surface - an off-screen buffer plus the view that is shown of it.
//!
//! Drawing goes into the buffer, which may be larger than what fits on
//! screen. The view is the sub-rectangle copied to the display. Copies only
//! happen when something changed since the last one:
//!
//! ```text
//! draw into buffer → request_update() ─┐
//! move_view(y, x) ─────────────────────┼→ dirty → update_view() copies once
//! nothing changed ─────────────────────┘           (then a no-op until dirty again)
//! ```

use std::io;

use crate::types::{Dims, Rect};

use super::backend::DisplaySink;
use super::buffer::CellBuffer;

/// Buffer/view pair backing a drawable area.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    buffer: CellBuffer,
    view_y: u16,
    view_x: u16,
    view: Dims,
    dirty: bool,
}

impl Surface {
    /// Surface whose buffer is exactly the view.
    pub fn new(view: Dims) -> Self {
        Self::with_buffer(view, view.height, view.width)
    }

    /// Surface with a larger buffer. The buffer never ends up smaller than
    /// the view.
    pub fn with_buffer(view: Dims, buffer_lines: u16, buffer_cols: u16) -> Self {
        let width = buffer_cols.max(view.width);
        let height = buffer_lines.max(view.height);
        Self {
            buffer: CellBuffer::new(width, height),
            view_y: 0,
            view_x: 0,
            view,
            dirty: true,
        }
    }

    pub fn buffer(&self) -> &CellBuffer {
        &self.buffer
    }

    /// Mutable buffer access. Call [`Surface::request_update`] after drawing.
    pub fn buffer_mut(&mut self) -> &mut CellBuffer {
        &mut self.buffer
    }

    pub fn buffer_dims(&self) -> Dims {
        Dims::new(self.buffer.height(), self.buffer.width())
    }

    pub fn view_dims(&self) -> Dims {
        self.view
    }

    /// Top-left of the view inside the buffer, as `(y, x)`.
    pub fn view_origin(&self) -> (u16, u16) {
        (self.view_y, self.view_x)
    }

    /// Region of the buffer currently under the view.
    pub fn view_rect(&self) -> Rect {
        Rect::new(self.view.height, self.view.width, self.view_y, self.view_x)
    }

    // =========================================================================
    // View movement
    // =========================================================================

    /// Move the view origin to `(y, x)`, clamped so the view stays inside
    /// the buffer.
    pub fn move_view(&mut self, y: i32, x: i32) {
        let max_y = self.buffer.height().saturating_sub(self.view.height) as i32;
        let max_x = self.buffer.width().saturating_sub(self.view.width) as i32;

        self.view_y = y.clamp(0, max_y) as u16;
        self.view_x = x.clamp(0, max_x) as u16;
        self.dirty = true;
    }

    /// Move the view relative to where it is.
    pub fn move_view_inc(&mut self, dy: i32, dx: i32) {
        let (y, x) = (self.view_y as i32 + dy, self.view_x as i32 + dx);
        self.move_view(y, x);
    }

    /// Change the view size. The buffer grows if needed; the origin is
    /// re-clamped.
    pub fn resize_view(&mut self, view: Dims) {
        self.view = view;
        let width = self.buffer.width().max(view.width);
        let height = self.buffer.height().max(view.height);
        self.buffer.resize(width, height);
        self.move_view(self.view_y as i32, self.view_x as i32);
    }

    /// Change the buffer size, never below the view.
    pub fn resize_buffer(&mut self, lines: u16, cols: u16) {
        let width = cols.max(self.view.width);
        let height = lines.max(self.view.height);
        self.buffer.resize(width, height);
        self.move_view(self.view_y as i32, self.view_x as i32);
    }

    // =========================================================================
    // Synchronization
    // =========================================================================

    /// Mark the buffer content as changed.
    pub fn request_update(&mut self) {
        self.dirty = true;
    }

    pub fn needs_update(&self) -> bool {
        self.dirty
    }

    /// Copy the region under the view to `sink` at `(dest_y, dest_x)`.
    ///
    /// Does nothing and returns `false` unless the surface is dirty or
    /// `force` is set.
    pub fn update_view(
        &mut self,
        sink: &mut dyn DisplaySink,
        dest_y: u16,
        dest_x: u16,
        force: bool,
    ) -> io::Result<bool> {
        if !self.dirty && !force {
            return Ok(false);
        }

        sink.copy_region(&self.buffer, self.view_rect(), dest_y, dest_x)?;
        self.dirty = false;
        Ok(true)
    }

    /// [`Surface::update_view`] into another cell buffer. Cannot fail.
    pub fn update_view_into(&mut self, dst: &mut CellBuffer, dest_y: u16, dest_x: u16, force: bool) -> bool {
        if !self.dirty && !force {
            return false;
        }

        dst.copy_from(&self.buffer, self.view_rect(), dest_x, dest_y);
        self.dirty = false;
        true
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::TestBackend;
    use crate::types::{Cell, Style};

    #[test]
    fn test_buffer_grows_to_view() {
        let surface = Surface::with_buffer(Dims::new(5, 8), 2, 20);
        assert_eq!(surface.buffer_dims(), Dims::new(5, 20));
    }

    #[test]
    fn test_move_view_clamps() {
        let mut surface = Surface::with_buffer(Dims::new(5, 5), 10, 10);
        surface.move_view(20, 20);
        assert_eq!(surface.view_origin(), (5, 5));

        surface.move_view(-3, 2);
        assert_eq!(surface.view_origin(), (0, 2));
    }

    #[test]
    fn test_move_view_inc() {
        let mut surface = Surface::with_buffer(Dims::new(2, 2), 6, 6);
        surface.move_view_inc(1, 3);
        surface.move_view_inc(1, 3);
        assert_eq!(surface.view_origin(), (2, 4));
    }

    #[test]
    fn test_update_view_fast_path() {
        let mut backend = TestBackend::new(10, 10);
        let mut surface = Surface::new(Dims::new(3, 3));

        assert!(surface.update_view(&mut backend, 0, 0, false).unwrap());
        assert!(!surface.update_view(&mut backend, 0, 0, false).unwrap());
        assert_eq!(backend.copy_count(), 1);

        surface.request_update();
        assert!(surface.update_view(&mut backend, 0, 0, false).unwrap());
        assert_eq!(backend.copy_count(), 2);
    }

    #[test]
    fn test_update_view_force() {
        let mut backend = TestBackend::new(10, 10);
        let mut surface = Surface::new(Dims::new(3, 3));
        surface.update_view(&mut backend, 0, 0, false).unwrap();

        assert!(surface.update_view(&mut backend, 0, 0, true).unwrap());
        assert_eq!(backend.copy_count(), 2);
    }

    #[test]
    fn test_update_view_copies_visible_region() {
        let mut backend = TestBackend::new(4, 2);
        let mut surface = Surface::with_buffer(Dims::new(1, 2), 1, 6);
        surface.buffer_mut().draw_text(0, 0, "abcdef", Style::default());
        surface.move_view(0, 3);

        surface.update_view(&mut backend, 1, 1, false).unwrap();
        assert_eq!(backend.screen().row_text(1), " de ");
        assert_eq!(backend.screen().get(0, 0), Some(&Cell::default()));
    }

    #[test]
    fn test_update_view_into_buffer() {
        let mut surface = Surface::new(Dims::new(1, 2));
        surface.buffer_mut().draw_text(0, 0, "ok", Style::default());
        let mut parent = CellBuffer::new(4, 2);

        assert!(surface.update_view_into(&mut parent, 1, 2, false));
        assert!(!surface.update_view_into(&mut parent, 1, 2, false));
        assert_eq!(parent.row_text(1), "  ok");
    }

    #[test]
    fn test_resize_view_reclamps_origin() {
        let mut surface = Surface::with_buffer(Dims::new(2, 2), 4, 4);
        surface.move_view(2, 2);
        surface.resize_view(Dims::new(4, 3));
        assert_eq!(surface.view_origin(), (0, 1));
    }
}
