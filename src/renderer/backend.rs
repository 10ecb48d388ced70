//! Backend boundary - where the core meets the terminal.
//!
//! The core only needs four things from a terminal: copy a region of a cell
//! buffer to the display, flush, report the display size and hand out the
//! next keystroke. [`Backend`] bundles those; [`TestBackend`] implements them
//! in memory so everything above can run headless.

use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use crate::state::Keystroke;
use crate::types::{Dims, Rect};

use super::buffer::CellBuffer;

/// Anything a surface can copy its view into.
pub trait DisplaySink {
    /// Copy `region` of `src` so its top-left lands at `(dest_y, dest_x)`.
    fn copy_region(&mut self, src: &CellBuffer, region: Rect, dest_y: u16, dest_x: u16) -> io::Result<()>;
}

/// Nested windows copy their views into the parent's buffer.
impl DisplaySink for CellBuffer {
    fn copy_region(&mut self, src: &CellBuffer, region: Rect, dest_y: u16, dest_x: u16) -> io::Result<()> {
        self.copy_from(src, region, dest_x, dest_y);
        Ok(())
    }
}

/// Unified input event
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A key was pressed
    Key(Keystroke),
    /// The display changed size
    Resize(Dims),
    /// Nothing the core cares about (mouse, focus, paste...)
    None,
}

/// Terminal-control binding used by the core.
pub trait Backend: DisplaySink {
    /// Display size.
    fn size(&self) -> io::Result<Dims>;

    /// Blank the whole display on the next flush.
    fn clear(&mut self) -> io::Result<()>;

    /// Show the physical cursor at `(y, x)`, or hide it.
    fn set_cursor(&mut self, position: Option<(u16, u16)>) -> io::Result<()>;

    /// Push everything copied so far to the display.
    fn flush(&mut self) -> io::Result<()>;

    /// Block until the next event.
    fn read_event(&mut self) -> io::Result<InputEvent>;

    /// Wait at most `timeout` for an event.
    fn poll_event(&mut self, timeout: Duration) -> io::Result<Option<InputEvent>>;
}

// =============================================================================
// TestBackend
// =============================================================================

/// In-memory backend with a scripted input queue.
///
/// Counts copies and flushes so tests can assert on redundant writes.
#[derive(Debug, Clone)]
pub struct TestBackend {
    screen: CellBuffer,
    events: VecDeque<InputEvent>,
    cursor: Option<(u16, u16)>,
    copies: usize,
    flushes: usize,
}

impl TestBackend {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            screen: CellBuffer::new(width, height),
            events: VecDeque::new(),
            cursor: None,
            copies: 0,
            flushes: 0,
        }
    }

    /// Queue a keystroke for `read_event`.
    pub fn push_key(&mut self, key: Keystroke) {
        self.events.push_back(InputEvent::Key(key));
    }

    /// Queue any event for `read_event`.
    pub fn push_event(&mut self, event: InputEvent) {
        self.events.push_back(event);
    }

    /// Resize the screen and queue the matching resize event.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.screen.resize(width, height);
        self.events.push_back(InputEvent::Resize(Dims::new(height, width)));
    }

    pub fn screen(&self) -> &CellBuffer {
        &self.screen
    }

    pub fn cursor(&self) -> Option<(u16, u16)> {
        self.cursor
    }

    /// Number of `copy_region` calls so far.
    pub fn copy_count(&self) -> usize {
        self.copies
    }

    pub fn flush_count(&self) -> usize {
        self.flushes
    }
}

impl DisplaySink for TestBackend {
    fn copy_region(&mut self, src: &CellBuffer, region: Rect, dest_y: u16, dest_x: u16) -> io::Result<()> {
        self.copies += 1;
        self.screen.copy_from(src, region, dest_x, dest_y);
        Ok(())
    }
}

impl Backend for TestBackend {
    fn size(&self) -> io::Result<Dims> {
        Ok(Dims::new(self.screen.height(), self.screen.width()))
    }

    fn clear(&mut self) -> io::Result<()> {
        self.screen.clear();
        Ok(())
    }

    fn set_cursor(&mut self, position: Option<(u16, u16)>) -> io::Result<()> {
        self.cursor = position;
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flushes += 1;
        Ok(())
    }

    fn read_event(&mut self) -> io::Result<InputEvent> {
        self.events
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no scripted input left"))
    }

    fn poll_event(&mut self, _timeout: Duration) -> io::Result<Option<InputEvent>> {
        Ok(self.events.pop_front())
    }
}
