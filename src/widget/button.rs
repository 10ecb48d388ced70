//! Button - focusable widget activated with Enter or Space.

use crate::layout::{Alignment, Opc};
use crate::state::{KeyKind, Keystroke};
use crate::types::{Attr, Cell, Style};

use super::{Widget, WidgetCommon};

/// Focusable push button.
///
/// Drawn as `[ label ]` centered in the widget, inverted while focused.
pub struct Button {
    common: WidgetCommon,
    label: String,
    style: Style,
    on_press: Option<Box<dyn FnMut()>>,
    presses: usize,
}

impl Button {
    pub fn new(opc: Opc, label: impl Into<String>) -> Self {
        Self {
            common: WidgetCommon::new(opc),
            label: label.into(),
            style: Style::default(),
            on_press: None,
            presses: 0,
        }
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Callback run on every activation.
    pub fn on_press(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_press = Some(Box::new(callback));
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
        self.request_update();
    }

    /// Number of activations so far.
    pub fn presses(&self) -> usize {
        self.presses
    }

    fn press(&mut self) {
        self.presses += 1;
        tracing::trace!(button = %self.describe(), "pressed");
        if let Some(callback) = self.on_press.as_mut() {
            callback();
        }
    }
}

impl Widget for Button {
    fn common(&self) -> &WidgetCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut WidgetCommon {
        &mut self.common
    }

    fn kind(&self) -> &'static str {
        "Button"
    }

    fn redraw(&mut self) {
        let style = if self.common.has_focus() {
            self.style.with_attrs(self.style.attrs | Attr::INVERSE)
        } else {
            self.style
        };
        let width = self.common.width();
        let text = format!("[ {} ]", self.label);

        let buffer = self.common.buffer_mut();
        let bounds = buffer.bounds();
        buffer.fill(bounds, Cell::new(' ').with_colors(self.style.fg, self.style.bg));
        let row = bounds.height / 2;
        buffer.draw_text_aligned(0, row, width, &text, style, Alignment::Center);
    }

    fn accept_focus(&self) -> bool {
        true
    }

    fn process_focus(&mut self, key: &Keystroke) -> bool {
        let activate = key.kind == KeyKind::Enter || (key.as_char() == Some(' ') && !key.ctrl && !key.alt);
        if activate {
            self.press();
        }
        activate
    }
}
