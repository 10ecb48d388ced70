//! Label - static text display.
//!
//! Never takes focus. Text longer than the widget is truncated with an
//! ellipsis; embedded newlines start a new row.

use crate::layout::{Alignment, Opc, truncate_text};
use crate::types::{Cell, Style};

use super::{Widget, WidgetCommon};

/// Non-focusable text widget.
pub struct Label {
    common: WidgetCommon,
    text: String,
    style: Style,
    alignment: Alignment,
}

impl Label {
    pub fn new(opc: Opc, text: impl Into<String>) -> Self {
        Self {
            common: WidgetCommon::new(opc),
            text: text.into(),
            style: Style::default(),
            alignment: Alignment::Left,
        }
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Change the text. Redrawn on the next update.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.request_update();
    }

    pub fn set_style(&mut self, style: Style) {
        self.style = style;
        self.request_update();
    }
}

impl Widget for Label {
    fn common(&self) -> &WidgetCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut WidgetCommon {
        &mut self.common
    }

    fn kind(&self) -> &'static str {
        "Label"
    }

    fn redraw(&mut self) {
        let width = self.common.width();
        let style = self.style;
        let alignment = self.alignment;
        let buffer = self.common.buffer_mut();
        let bounds = buffer.bounds();
        buffer.fill(bounds, Cell::new(' ').with_colors(style.fg, style.bg));

        for (row, line) in self.text.lines().enumerate().take(bounds.height as usize) {
            let line = truncate_text(line, width);
            buffer.draw_text_aligned(0, row as u16, width, &line, style, alignment);
        }
    }
}
