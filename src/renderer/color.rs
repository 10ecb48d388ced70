//! Color pairs.
//!
//! A color pair is a foreground/background combination registered once and
//! referred to by a small integer id afterwards. Ids start at 1; registering
//! the same combination twice returns the existing id.

use crate::types::{Attr, Color, Style};

/// Foreground/background combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorPair {
    pub fg: Color,
    pub bg: Color,
}

impl ColorPair {
    pub const fn new(fg: Color, bg: Color) -> Self {
        Self { fg, bg }
    }

    /// Style drawing with this pair and no attributes.
    pub fn style(&self) -> Style {
        Style::new(self.fg, self.bg)
    }

    pub fn style_with(&self, attrs: Attr) -> Style {
        self.style().with_attrs(attrs)
    }
}

/// Registry of color pairs, indexed from 1.
#[derive(Debug, Clone, Default)]
pub struct ColorPairs {
    pairs: Vec<ColorPair>,
}

impl ColorPairs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pair and return its id. Existing pairs keep their id.
    pub fn init_color_pair(&mut self, fg: Color, bg: Color) -> u16 {
        let pair = ColorPair::new(fg, bg);
        if let Some(id) = self.get_color_pair(fg, bg) {
            return id;
        }
        self.pairs.push(pair);
        let id = self.pairs.len() as u16;
        tracing::trace!(id, ?fg, ?bg, "color pair registered");
        id
    }

    /// Id of an already registered pair.
    pub fn get_color_pair(&self, fg: Color, bg: Color) -> Option<u16> {
        let pair = ColorPair::new(fg, bg);
        self.pairs.iter().position(|p| *p == pair).map(|i| i as u16 + 1)
    }

    /// Pair registered under `id`.
    pub fn pair(&self, id: u16) -> Option<ColorPair> {
        let index = (id as usize).checked_sub(1)?;
        self.pairs.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
