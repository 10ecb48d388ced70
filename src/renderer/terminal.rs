//! Crossterm backend with differential flushing.
//!
//! Views are copied into a pending screen grid. On flush the grid is
//! compared to the previously flushed frame and only changed cells are
//! written, wrapped in a synchronized update and sent in one write.
//!
//! # Algorithm
//!
//! 1. Begin synchronized update
//! 2. For each cell of the pending screen:
//!    - If the previous frame has the same size and the cell is unchanged: skip
//!    - Otherwise: write it with `CellWriter` (cursor/colors emitted only on change)
//! 3. Place or hide the physical cursor, end synchronized update, flush
//! 4. Keep the pending screen as the previous frame

use std::io::{self, Write};
use std::time::Duration;

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event as CrosstermEvent};
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{
    self, BeginSynchronizedUpdate, Clear, ClearType, EndSynchronizedUpdate, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use crossterm::{execute, queue};

use crate::layout::char_width;
use crate::state::convert_key_event;
use crate::types::{Attr, Cell, Dims, Rect};

use super::backend::{Backend, DisplaySink, InputEvent};
use super::buffer::{CONTINUATION, CellBuffer};

// =============================================================================
// CrosstermBackend
// =============================================================================

/// Backend driving a real terminal through crossterm.
pub struct CrosstermBackend<W: Write> {
    out: W,
    screen: CellBuffer,
    previous: Option<CellBuffer>,
    cursor: Option<(u16, u16)>,
    pending_clear: bool,
    entered: bool,
}

impl CrosstermBackend<io::Stdout> {
    /// Backend on stdout, sized to the current terminal.
    pub fn stdout() -> io::Result<Self> {
        Self::new(io::stdout())
    }
}

impl<W: Write> CrosstermBackend<W> {
    /// Backend writing to `out`, sized to the current terminal.
    pub fn new(out: W) -> io::Result<Self> {
        let (cols, rows) = terminal::size()?;
        Ok(Self::with_size(out, Dims::new(rows, cols)))
    }

    /// Backend with a fixed size (no terminal query).
    pub fn with_size(out: W, dims: Dims) -> Self {
        Self {
            out,
            screen: CellBuffer::new(dims.width, dims.height),
            previous: None,
            cursor: None,
            pending_clear: false,
            entered: false,
        }
    }

    /// Enter raw mode and the alternate screen, hide the cursor.
    pub fn enter(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(self.out, EnterAlternateScreen, Hide, Clear(ClearType::All))?;
        self.entered = true;
        self.invalidate();
        Ok(())
    }

    /// Restore the terminal. Safe to call more than once.
    pub fn leave(&mut self) -> io::Result<()> {
        if !self.entered {
            return Ok(());
        }
        self.entered = false;
        execute!(
            self.out,
            SetAttribute(Attribute::Reset),
            ResetColor,
            Show,
            LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    /// Forget the previous frame. Next flush is a full redraw.
    pub fn invalidate(&mut self) {
        self.previous = None;
    }

    /// Check if we have a previous frame to diff against.
    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.out
    }

    fn resize_screen(&mut self, dims: Dims) {
        self.screen.resize(dims.width, dims.height);
        self.invalidate();
    }

    fn convert_event(&mut self, event: CrosstermEvent) -> InputEvent {
        match event {
            CrosstermEvent::Key(key) => convert_key_event(key).map_or(InputEvent::None, InputEvent::Key),
            CrosstermEvent::Resize(cols, rows) => {
                let dims = Dims::new(rows, cols);
                self.resize_screen(dims);
                InputEvent::Resize(dims)
            }
            _ => InputEvent::None,
        }
    }
}

impl<W: Write> Drop for CrosstermBackend<W> {
    fn drop(&mut self) {
        // Best effort: the terminal must not stay in raw mode
        let _ = self.leave();
    }
}

impl<W: Write> DisplaySink for CrosstermBackend<W> {
    fn copy_region(&mut self, src: &CellBuffer, region: Rect, dest_y: u16, dest_x: u16) -> io::Result<()> {
        self.screen.copy_from(src, region, dest_x, dest_y);
        Ok(())
    }
}

impl<W: Write> Backend for CrosstermBackend<W> {
    fn size(&self) -> io::Result<Dims> {
        Ok(Dims::new(self.screen.height(), self.screen.width()))
    }

    fn clear(&mut self) -> io::Result<()> {
        self.screen.clear();
        self.pending_clear = true;
        self.invalidate();
        Ok(())
    }

    fn set_cursor(&mut self, position: Option<(u16, u16)>) -> io::Result<()> {
        self.cursor = position;
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate)?;

        if self.pending_clear {
            queue!(self.out, ResetColor, Clear(ClearType::All))?;
            self.pending_clear = false;
        }

        let mut writer = CellWriter::default();
        let width = self.screen.width();
        let height = self.screen.height();

        for (x, y, cell) in self.screen.iter() {
            let changed = match &self.previous {
                Some(prev) if prev.width() == width && prev.height() == height => prev.get(x, y) != Some(cell),
                _ => true,
            };
            if changed {
                writer.write_cell(&mut self.out, x, y, cell)?;
            }
        }

        queue!(self.out, SetAttribute(Attribute::Reset), ResetColor)?;
        match self.cursor {
            Some((y, x)) => queue!(self.out, MoveTo(x, y), Show)?,
            None => queue!(self.out, Hide)?,
        }
        queue!(self.out, EndSynchronizedUpdate)?;
        self.out.flush()?;

        self.previous = Some(self.screen.clone());
        Ok(())
    }

    fn read_event(&mut self) -> io::Result<InputEvent> {
        let event = event::read()?;
        Ok(self.convert_event(event))
    }

    fn poll_event(&mut self, timeout: Duration) -> io::Result<Option<InputEvent>> {
        if event::poll(timeout)? {
            let event = event::read()?;
            Ok(Some(self.convert_event(event)))
        } else {
            Ok(None)
        }
    }
}

// =============================================================================
// CellWriter
// =============================================================================

/// Writes cells while tracking terminal state to minimize output.
///
/// Cursor moves, colors and attributes are only emitted when they differ
/// from what the previous cell left behind.
#[derive(Debug, Default)]
struct CellWriter {
    next: Option<(u16, u16)>,
    fg: Option<Color>,
    bg: Option<Color>,
    attrs: Attr,
}

impl CellWriter {
    fn write_cell<W: Write>(&mut self, out: &mut W, x: u16, y: u16, cell: &Cell) -> io::Result<()> {
        // Continuation cells are covered by the wide character before them
        if cell.ch == CONTINUATION {
            return Ok(());
        }

        if self.next != Some((x, y)) {
            queue!(out, MoveTo(x, y))?;
        }

        if cell.attrs != self.attrs {
            queue!(out, SetAttribute(Attribute::Reset))?;
            for attribute in attributes(cell.attrs) {
                queue!(out, SetAttribute(attribute))?;
            }
            // Reset clears colors too
            self.fg = None;
            self.bg = None;
            self.attrs = cell.attrs;
        }

        if self.fg != Some(cell.fg) {
            queue!(out, SetForegroundColor(cell.fg))?;
            self.fg = Some(cell.fg);
        }
        if self.bg != Some(cell.bg) {
            queue!(out, SetBackgroundColor(cell.bg))?;
            self.bg = Some(cell.bg);
        }

        queue!(out, Print(cell.ch))?;
        self.next = Some((x + char_width(cell.ch).max(1), y));
        Ok(())
    }
}

fn attributes(attrs: Attr) -> impl Iterator<Item = Attribute> {
    [
        (Attr::BOLD, Attribute::Bold),
        (Attr::DIM, Attribute::Dim),
        (Attr::ITALIC, Attribute::Italic),
        (Attr::UNDERLINE, Attribute::Underlined),
        (Attr::BLINK, Attribute::SlowBlink),
        (Attr::INVERSE, Attribute::Reverse),
        (Attr::HIDDEN, Attribute::Hidden),
        (Attr::STRIKETHROUGH, Attribute::CrossedOut),
    ]
    .into_iter()
    .filter(move |(flag, _)| attrs.contains(*flag))
    .map(|(_, attribute)| attribute)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Style;

    fn backend() -> CrosstermBackend<Vec<u8>> {
        CrosstermBackend::with_size(Vec::new(), Dims::new(3, 10))
    }

    fn output(backend: &mut CrosstermBackend<Vec<u8>>) -> String {
        let text = String::from_utf8_lossy(backend.writer()).into_owned();
        backend.writer_mut().clear();
        text
    }

    #[test]
    fn test_backend_creation() {
        let backend = backend();
        assert!(!backend.has_previous());
        assert_eq!(backend.size().unwrap(), Dims::new(3, 10));
    }

    #[test]
    fn test_flush_writes_copied_cells() {
        let mut backend = backend();
        let mut src = CellBuffer::new(5, 1);
        src.draw_text(0, 0, "hello", Style::default());

        backend.copy_region(&src, src.bounds(), 1, 2).unwrap();
        backend.flush().unwrap();

        assert!(output(&mut backend).contains("hello"));
        assert!(backend.has_previous());
    }

    #[test]
    fn test_second_flush_skips_unchanged_cells() {
        let mut backend = backend();
        let mut src = CellBuffer::new(5, 1);
        src.draw_text(0, 0, "hello", Style::default());

        backend.copy_region(&src, src.bounds(), 0, 0).unwrap();
        backend.flush().unwrap();
        output(&mut backend);

        backend.flush().unwrap();
        assert!(!output(&mut backend).contains('h'));
    }

    #[test]
    fn test_invalidate_forces_full_redraw() {
        let mut backend = backend();
        let mut src = CellBuffer::new(5, 1);
        src.draw_text(0, 0, "hello", Style::default());

        backend.copy_region(&src, src.bounds(), 0, 0).unwrap();
        backend.flush().unwrap();
        output(&mut backend);

        backend.invalidate();
        backend.flush().unwrap();
        assert!(output(&mut backend).contains("hello"));
    }

    #[test]
    fn test_attributes_mapping() {
        let attrs: Vec<Attribute> = attributes(Attr::BOLD | Attr::INVERSE).collect();
        assert_eq!(attrs, vec![Attribute::Bold, Attribute::Reverse]);
    }
}
