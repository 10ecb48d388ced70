//! Text Measurement
//!
//! Utilities for measuring and fitting text in terminal cells.
//! Widths follow `unicode-width`: CJK and most emoji take 2 cells,
//! combining marks and control characters take none.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Horizontal alignment of a line of text inside a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Measure the display width of a string in terminal cells.
pub fn string_width(s: &str) -> u16 {
    UnicodeWidthStr::width(s).min(u16::MAX as usize) as u16
}

/// Display width of one character (0 for control characters).
#[inline]
pub fn char_width(c: char) -> u16 {
    UnicodeWidthChar::width(c).unwrap_or(0) as u16
}

/// Truncate text to fit within a width, ending with an ellipsis when cut.
pub fn truncate_text(text: &str, width: u16) -> String {
    if width == 0 {
        return String::new();
    }

    if string_width(text) <= width {
        return text.to_string();
    }

    // Leave room for the ellipsis
    let target_width = width.saturating_sub(1);
    let mut result = String::new();
    let mut current_width = 0u16;

    for c in text.chars() {
        let w = char_width(c);
        if current_width + w > target_width {
            break;
        }
        result.push(c);
        current_width += w;
    }

    result.push('…');
    result
}

/// Column at which `text` starts when aligned inside `width` cells.
pub fn align_offset(text: &str, width: u16, alignment: Alignment) -> u16 {
    let free = width.saturating_sub(string_width(text));
    match alignment {
        Alignment::Left => 0,
        Alignment::Center => free / 2,
        Alignment::Right => free,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_width_ascii() {
        assert_eq!(string_width("hello"), 5);
        assert_eq!(string_width(""), 0);
    }

    #[test]
    fn test_string_width_cjk() {
        assert_eq!(string_width("日本"), 4);
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("hello", 10), "hello");
        assert_eq!(truncate_text("hello world", 6), "hello…");
        assert_eq!(truncate_text("hello", 0), "");
    }

    #[test]
    fn test_align_offset() {
        assert_eq!(align_offset("ab", 10, Alignment::Left), 0);
        assert_eq!(align_offset("ab", 10, Alignment::Center), 4);
        assert_eq!(align_offset("ab", 10, Alignment::Right), 8);
        assert_eq!(align_offset("too long", 3, Alignment::Right), 0);
    }
}
