//! Window construction options.

use crate::layout::Opc;
use crate::types::{Dims, Style, WindowId};

/// Everything needed to create a window.
///
/// # Example
///
/// ```ignore
/// let config = WindowConfig::new(Opc::fixed(10, 40, 2, 2))
///     .name("log")
///     .border(true)
///     .title("Log")
///     .buffer_size(500, 40);
/// ```
#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub(crate) name: Option<String>,
    pub(crate) opc: Opc,
    pub(crate) border: bool,
    pub(crate) border_style: Style,
    pub(crate) title: Option<String>,
    pub(crate) buffer_size: Option<Dims>,
    pub(crate) focusable: bool,
    pub(crate) parent: Option<WindowId>,
}

impl WindowConfig {
    /// Focusable, borderless top-level window placed by `opc`.
    pub fn new(opc: Opc) -> Self {
        Self {
            name: None,
            opc,
            border: false,
            border_style: Style::default(),
            title: None,
            buffer_size: None,
            focusable: true,
            parent: None,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn border(mut self, border: bool) -> Self {
        self.border = border;
        self
    }

    pub fn border_style(mut self, style: Style) -> Self {
        self.border_style = style;
        self
    }

    /// Title drawn in the top border. Implies nothing without a border.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Buffer size in lines and columns. Never smaller than the view.
    pub fn buffer_size(mut self, lines: u16, cols: u16) -> Self {
        self.buffer_size = Some(Dims::new(lines, cols));
        self
    }

    pub fn focusable(mut self, focusable: bool) -> Self {
        self.focusable = focusable;
        self
    }

    /// Nest the window inside another window's buffer.
    pub fn parent(mut self, parent: WindowId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn opc(&self) -> &Opc {
        &self.opc
    }
}
