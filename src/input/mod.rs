//! Key Input Model
//!
//! Normalized key symbols, modifier flags and the bounded rolling buffer the
//! recognizer matches against. One [`KeyPress`] is produced per qualifying
//! host key-down event; the host input system (browser, terminal, game
//! engine) is responsible for delivering them one at a time.

mod buffer;

pub use buffer::InputBuffer;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

bitflags! {
    /// Modifier keys held during a key press
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Modifiers: u8 {
        /// Shift key held
        const SHIFT = 0x01;
        /// Control key held
        const CTRL = 0x02;
        /// Alt/Option key held
        const ALT = 0x04;
    }
}

/// A single normalized input symbol
///
/// Printable characters are lowercased at construction, which makes symbol
/// equality case-insensitive without a custom `PartialEq`: `Shift+G` and `g`
/// produce the same symbol. Non-printable keys keep their host-provided name
/// (`"ArrowUp"`, `"Escape"`, ...) verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputSymbol {
    /// A printable character, stored lowercased
    Char(char),
    /// A named non-printable key
    Key(String),
}

impl InputSymbol {
    /// Create a symbol from a printable character, normalizing case.
    pub fn from_char(c: char) -> Self {
        InputSymbol::Char(c.to_lowercase().next().unwrap_or(c))
    }

    /// Create a symbol for a named non-printable key.
    pub fn key(name: impl Into<String>) -> Self {
        InputSymbol::Key(name.into())
    }
}

impl From<char> for InputSymbol {
    fn from(c: char) -> Self {
        InputSymbol::from_char(c)
    }
}

impl fmt::Display for InputSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSymbol::Char(c) => write!(f, "{c}"),
            InputSymbol::Key(name) => f.write_str(name),
        }
    }
}

/// One qualifying key-down event: a symbol plus the modifiers held with it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    /// The normalized symbol
    pub symbol: InputSymbol,
    /// Modifier keys held during the press
    pub modifiers: Modifiers,
}

impl KeyPress {
    /// Create a key press from a character with an explicit modifier set.
    pub fn new(symbol: impl Into<InputSymbol>, modifiers: Modifiers) -> Self {
        KeyPress {
            symbol: symbol.into(),
            modifiers,
        }
    }

    /// Convenience constructor for a character pressed with Shift held.
    pub fn shifted(c: char) -> Self {
        KeyPress::new(c, Modifiers::SHIFT)
    }

    /// Convenience constructor for a character pressed without modifiers.
    pub fn plain(c: char) -> Self {
        KeyPress::new(c, Modifiers::empty())
    }
}
