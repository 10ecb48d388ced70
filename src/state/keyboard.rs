//! Keyboard Module - Keystrokes, key bindings and crossterm conversion
//!
//! Everything above the backend works with [`Keystroke`], a small owned
//! description of one key press. Navigation keys (next window, next widget,
//! quit) are expressed as [`KeyBinding`]s or arbitrary [`KeyPredicate`]s.
//!
//! # API
//!
//! - `Keystroke::char(c)` / `Keystroke::key(kind)` - build keystrokes
//! - `KeyBinding::matches(&keystroke)` - test a keystroke against a binding
//! - `convert_key_event` - convert a crossterm `KeyEvent`

use std::fmt;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

// =============================================================================
// TYPES
// =============================================================================

/// What kind of key was pressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyKind {
    /// Literal character, stored in `Keystroke::value`
    Char,
    Enter,
    Tab,
    BackTab,
    Backspace,
    Delete,
    Esc,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    /// Function key F1..F24
    F(u8),
    Unknown,
}

impl KeyKind {
    /// Name used as the keystroke value for named keys.
    pub fn name(&self) -> String {
        match self {
            KeyKind::Char => String::new(),
            KeyKind::Enter => "Enter".into(),
            KeyKind::Tab => "Tab".into(),
            KeyKind::BackTab => "BackTab".into(),
            KeyKind::Backspace => "Backspace".into(),
            KeyKind::Delete => "Delete".into(),
            KeyKind::Esc => "Escape".into(),
            KeyKind::Up => "ArrowUp".into(),
            KeyKind::Down => "ArrowDown".into(),
            KeyKind::Left => "ArrowLeft".into(),
            KeyKind::Right => "ArrowRight".into(),
            KeyKind::Home => "Home".into(),
            KeyKind::End => "End".into(),
            KeyKind::PageUp => "PageUp".into(),
            KeyKind::PageDown => "PageDown".into(),
            KeyKind::Insert => "Insert".into(),
            KeyKind::F(n) => format!("F{n}"),
            KeyKind::Unknown => "Unknown".into(),
        }
    }
}

/// One key press.
///
/// `value` holds the character for [`KeyKind::Char`] and the key name
/// otherwise. Shift is folded into the character for `Char` keystrokes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Keystroke {
    pub value: String,
    pub kind: KeyKind,
    pub alt: bool,
    pub ctrl: bool,
    pub shift: bool,
}

impl Keystroke {
    /// Plain character keystroke.
    pub fn char(c: char) -> Self {
        Self {
            value: c.to_string(),
            kind: KeyKind::Char,
            alt: false,
            ctrl: false,
            shift: false,
        }
    }

    /// Named key without modifiers.
    pub fn key(kind: KeyKind) -> Self {
        Self {
            value: kind.name(),
            kind,
            alt: false,
            ctrl: false,
            shift: false,
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    /// The character of a `Char` keystroke.
    pub fn as_char(&self) -> Option<char> {
        match self.kind {
            KeyKind::Char => self.value.chars().next(),
            _ => None,
        }
    }
}

impl fmt::Display for Keystroke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl {
            f.write_str("Ctrl+")?;
        }
        if self.alt {
            f.write_str("Alt+")?;
        }
        if self.shift {
            f.write_str("Shift+")?;
        }
        f.write_str(&self.value)
    }
}

/// Pluggable keystroke test, e.g. "does this key move to the next window?".
pub type KeyPredicate = Box<dyn Fn(&Keystroke) -> bool>;

// =============================================================================
// KEY BINDINGS
// =============================================================================

/// A key plus required modifiers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyBinding {
    kind: KeyKind,
    ch: Option<char>,
    ctrl: bool,
    alt: bool,
    shift: bool,
}

impl KeyBinding {
    /// Binding on a named key.
    pub fn key(kind: KeyKind) -> Self {
        Self {
            kind,
            ch: None,
            ctrl: false,
            alt: false,
            shift: false,
        }
    }

    /// Binding on a character.
    pub fn char(c: char) -> Self {
        Self {
            kind: KeyKind::Char,
            ch: Some(c),
            ctrl: false,
            alt: false,
            shift: false,
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    /// Check if a keystroke triggers this binding.
    ///
    /// Shift is ignored for characters (it is already part of the char).
    pub fn matches(&self, key: &Keystroke) -> bool {
        if key.kind != self.kind || key.ctrl != self.ctrl || key.alt != self.alt {
            return false;
        }
        match self.kind {
            KeyKind::Char => self.ch.is_some_and(|c| key.as_char().is_some_and(|k| k.eq_ignore_ascii_case(&c))),
            _ => key.shift == self.shift,
        }
    }

    /// Turn the binding into a boxed predicate.
    pub fn into_predicate(self) -> KeyPredicate {
        Box::new(move |key| self.matches(key))
    }
}

// =============================================================================
// CROSSTERM CONVERSION
// =============================================================================

/// Convert a crossterm `KeyEvent` to a [`Keystroke`].
///
/// Release events yield `None`; only presses and repeats reach the core.
pub fn convert_key_event(event: KeyEvent) -> Option<Keystroke> {
    if event.kind == KeyEventKind::Release {
        return None;
    }

    let kind = match event.code {
        KeyCode::Char(_) => KeyKind::Char,
        KeyCode::Enter => KeyKind::Enter,
        KeyCode::Tab => KeyKind::Tab,
        KeyCode::BackTab => KeyKind::BackTab,
        KeyCode::Backspace => KeyKind::Backspace,
        KeyCode::Delete => KeyKind::Delete,
        KeyCode::Esc => KeyKind::Esc,
        KeyCode::Up => KeyKind::Up,
        KeyCode::Down => KeyKind::Down,
        KeyCode::Left => KeyKind::Left,
        KeyCode::Right => KeyKind::Right,
        KeyCode::Home => KeyKind::Home,
        KeyCode::End => KeyKind::End,
        KeyCode::PageUp => KeyKind::PageUp,
        KeyCode::PageDown => KeyKind::PageDown,
        KeyCode::Insert => KeyKind::Insert,
        KeyCode::F(n) => KeyKind::F(n),
        _ => KeyKind::Unknown,
    };

    let value = match event.code {
        KeyCode::Char(c) => c.to_string(),
        _ => kind.name(),
    };

    // Shift is implied by BackTab and already applied to characters
    let shift = event.modifiers.contains(KeyModifiers::SHIFT) && !matches!(kind, KeyKind::Char | KeyKind::BackTab);

    Some(Keystroke {
        value,
        kind,
        alt: event.modifiers.contains(KeyModifiers::ALT),
        ctrl: event.modifiers.contains(KeyModifiers::CONTROL),
        shift,
    })
}

// =============================================================================
// TESTS
// =============================================================================
