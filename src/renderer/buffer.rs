//! CellBuffer and drawing primitives.
//!
//! A CellBuffer is a 2D grid of Cells. Window buffers, widget surfaces and
//! the backend's pending screen are all CellBuffers.
//!
//! # Design Decisions
//!
//! - **Flat storage**: Uses `Vec<Cell>` with row-major indexing for cache efficiency.
//! - **Clipping**: Drawing outside the grid is silently dropped.
//! - **Wide characters**: Emoji and CJK characters use continuation markers.

use crate::layout::{Alignment, align_offset, char_width};
use crate::types::{Cell, Rect, Style};

/// Cell following a wide character. Backends skip it when printing.
pub const CONTINUATION: char = '\0';

// =============================================================================
// CellBuffer
// =============================================================================

/// A 2D buffer of terminal cells.
///
/// Uses flat storage with row-major indexing: `index = y * width + x`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CellBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl CellBuffer {
    /// Create a new buffer filled with default cells.
    pub fn new(width: u16, height: u16) -> Self {
        let size = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![Cell::default(); size],
        }
    }

    #[inline]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u16 {
        self.height
    }

    /// The full buffer bounds.
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::new(self.height, self.width, 0, 0)
    }

    /// Convert (x, y) to flat index.
    #[inline]
    fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Check if coordinates are in bounds.
    #[inline]
    pub fn in_bounds(&self, x: u16, y: u16) -> bool {
        x < self.width && y < self.height
    }

    /// Get a cell reference (returns None if out of bounds).
    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        if self.in_bounds(x, y) {
            Some(&self.cells[self.index(x, y)])
        } else {
            None
        }
    }

    /// Get a mutable cell reference (returns None if out of bounds).
    #[inline]
    pub fn get_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        if self.in_bounds(x, y) {
            let idx = self.index(x, y);
            Some(&mut self.cells[idx])
        } else {
            None
        }
    }

    /// Set a single cell. Returns false if out of bounds.
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) -> bool {
        match self.get_mut(x, y) {
            Some(slot) => {
                *slot = cell;
                true
            }
            None => false,
        }
    }

    /// Get raw cells slice (for iteration during rendering).
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Iterate over cells with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (u16, u16, &Cell)> {
        self.cells.iter().enumerate().map(move |(i, cell)| {
            let x = (i % self.width as usize) as u16;
            let y = (i / self.width as usize) as u16;
            (x, y, cell)
        })
    }

    /// Characters of one row as a string (continuation cells skipped).
    pub fn row_text(&self, y: u16) -> String {
        (0..self.width)
            .filter_map(|x| self.get(x, y))
            .filter(|cell| cell.ch != CONTINUATION)
            .map(|cell| cell.ch)
            .collect()
    }

    /// Clear the entire buffer to default cells.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    /// Resize the buffer, keeping the content that still fits.
    pub fn resize(&mut self, width: u16, height: u16) {
        if width == self.width && height == self.height {
            return;
        }
        let mut resized = CellBuffer::new(width, height);
        resized.copy_from(self, self.bounds(), 0, 0);
        *self = resized;
    }

    // =========================================================================
    // Drawing Primitives
    // =========================================================================

    /// Fill a rectangle with one cell, clipped to the buffer.
    pub fn fill(&mut self, rect: Rect, cell: Cell) {
        let Some(area) = rect.intersect(&self.bounds()) else {
            return;
        };
        for y in area.top..area.bottom() {
            let start = self.index(area.left, y);
            let end = self.index(area.right(), y);
            self.cells[start..end].fill(cell);
        }
    }

    /// Draw text at a position.
    ///
    /// Returns the number of cells used (handles wide characters).
    pub fn draw_text(&mut self, x: u16, y: u16, text: &str, style: Style) -> u16 {
        if y >= self.height {
            return 0;
        }

        let mut col = x;
        for ch in text.chars() {
            let w = char_width(ch);
            if w == 0 {
                continue;
            }
            if col.saturating_add(w) > self.width {
                break;
            }

            let cell = Cell::new(ch).with_colors(style.fg, style.bg).with_attrs(style.attrs);
            self.set(col, y, cell);
            if w == 2 {
                self.set(col + 1, y, Cell { ch: CONTINUATION, ..cell });
            }
            col += w;
        }

        col.saturating_sub(x)
    }

    /// Draw text aligned inside a field of `width` cells starting at `x`.
    pub fn draw_text_aligned(
        &mut self,
        x: u16,
        y: u16,
        width: u16,
        text: &str,
        style: Style,
        alignment: Alignment,
    ) -> u16 {
        let offset = align_offset(text, width, alignment);
        self.draw_text(x.saturating_add(offset), y, text, style)
    }

    /// Draw a single-line box border along the edges of `rect`.
    pub fn draw_border(&mut self, rect: Rect, style: Style) {
        if rect.width < 2 || rect.height < 2 {
            return;
        }

        let put = |buffer: &mut Self, x: u16, y: u16, ch: char| {
            let cell = Cell::new(ch).with_colors(style.fg, style.bg).with_attrs(style.attrs);
            buffer.set(x, y, cell);
        };

        let (x1, y1) = (rect.left, rect.top);
        let (x2, y2) = (rect.right() - 1, rect.bottom() - 1);

        put(self, x1, y1, '┌');
        put(self, x2, y1, '┐');
        put(self, x1, y2, '└');
        put(self, x2, y2, '┘');

        for col in (x1 + 1)..x2 {
            put(self, col, y1, '─');
            put(self, col, y2, '─');
        }
        for row in (y1 + 1)..y2 {
            put(self, x1, row, '│');
            put(self, x2, row, '│');
        }
    }

    /// Copy `region` of `src` so its top-left lands on (`dst_x`, `dst_y`).
    ///
    /// Both sides are clipped; cells falling outside either buffer are skipped.
    pub fn copy_from(&mut self, src: &CellBuffer, region: Rect, dst_x: u16, dst_y: u16) {
        let Some(region) = region.intersect(&src.bounds()) else {
            return;
        };

        let rows = region.height.min(self.height.saturating_sub(dst_y));
        let cols = region.width.min(self.width.saturating_sub(dst_x));
        if rows == 0 || cols == 0 {
            return;
        }

        for row in 0..rows {
            let s = src.index(region.left, region.top + row);
            let d = self.index(dst_x, dst_y + row);
            self.cells[d..d + cols as usize].copy_from_slice(&src.cells[s..s + cols as usize]);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Attr, Color};

    #[test]
    fn test_buffer_creation() {
        let buf = CellBuffer::new(80, 24);
        assert_eq!(buf.width(), 80);
        assert_eq!(buf.height(), 24);
        assert_eq!(buf.cells().len(), 80 * 24);
    }

    #[test]
    fn test_get_out_of_bounds() {
        let buf = CellBuffer::new(4, 4);
        assert!(buf.get(3, 3).is_some());
        assert!(buf.get(4, 0).is_none());
        assert!(buf.get(0, 4).is_none());
    }

    #[test]
    fn test_draw_text() {
        let mut buf = CellBuffer::new(10, 2);
        let style = Style::new(Color::Red, Color::Reset).with_attrs(Attr::BOLD);
        assert_eq!(buf.draw_text(1, 0, "abc", style), 3);
        assert_eq!(buf.row_text(0), " abc      ");
        let cell = buf.get(1, 0).unwrap();
        assert_eq!(cell.fg, Color::Red);
        assert_eq!(cell.attrs, Attr::BOLD);
    }

    #[test]
    fn test_draw_text_clips_at_edge() {
        let mut buf = CellBuffer::new(4, 1);
        assert_eq!(buf.draw_text(2, 0, "hello", Style::default()), 2);
        assert_eq!(buf.row_text(0), "  he");
    }

    #[test]
    fn test_draw_wide_text() {
        let mut buf = CellBuffer::new(6, 1);
        assert_eq!(buf.draw_text(0, 0, "日本", Style::default()), 4);
        assert_eq!(buf.get(1, 0).unwrap().ch, CONTINUATION);
        assert_eq!(buf.row_text(0), "日本  ");
    }

    #[test]
    fn test_draw_text_aligned() {
        let mut buf = CellBuffer::new(8, 1);
        buf.draw_text_aligned(0, 0, 8, "ok", Style::default(), Alignment::Right);
        assert_eq!(buf.row_text(0), "      ok");
    }

    #[test]
    fn test_draw_border() {
        let mut buf = CellBuffer::new(4, 3);
        buf.draw_border(buf.bounds(), Style::default());
        assert_eq!(buf.row_text(0), "┌──┐");
        assert_eq!(buf.row_text(1), "│  │");
        assert_eq!(buf.row_text(2), "└──┘");
    }

    #[test]
    fn test_copy_from_clips() {
        let mut src = CellBuffer::new(4, 4);
        src.fill(src.bounds(), Cell::new('x'));

        let mut dst = CellBuffer::new(5, 3);
        dst.copy_from(&src, Rect::new(2, 2, 1, 1), 4, 2);
        assert_eq!(dst.row_text(2), "    x");
        assert_eq!(dst.row_text(1), "     ");
    }

    #[test]
    fn test_resize_keeps_content() {
        let mut buf = CellBuffer::new(3, 1);
        buf.draw_text(0, 0, "abc", Style::default());
        buf.resize(5, 2);
        assert_eq!(buf.row_text(0), "abc  ");
        assert_eq!(buf.row_text(1), "     ");
    }
}
