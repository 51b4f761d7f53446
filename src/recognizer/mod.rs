//! Secret Code Recognition
//!
//! A registry of named key sequences and the recognizer that matches them
//! against the rolling input buffer. Matching is suffix-based and fully
//! synchronous: one [`CodeRecognizer::observe`] call per key press, with no
//! blocking and no error paths for unmatched input.
//!
//! Codes are only considered when the configured modifier is held; presses
//! without it leave the buffer untouched. When a match fires, the buffer is
//! cleared so a code never triggers twice off the same keystrokes.

mod progressive;

pub use progressive::ProgressiveMatcher;

use crate::input::{InputBuffer, InputSymbol, KeyPress, Modifiers};
use crate::{Result, StageError};
use tracing::debug;

/// A named, ordered secret key sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeSequence {
    name: String,
    symbols: Vec<InputSymbol>,
}

impl CodeSequence {
    /// Create a sequence from a name and its symbols.
    ///
    /// Returns [`StageError::Registry`] when the symbol list is empty.
    pub fn new(
        name: impl Into<String>,
        symbols: impl IntoIterator<Item = InputSymbol>,
    ) -> Result<Self> {
        let name = name.into();
        let symbols: Vec<InputSymbol> = symbols.into_iter().collect();
        if symbols.is_empty() {
            return Err(StageError::Registry(format!(
                "code \"{name}\" has an empty sequence"
            )));
        }
        Ok(CodeSequence { name, symbols })
    }

    /// Create a sequence from the characters of a string, one symbol each.
    pub fn from_keys(name: impl Into<String>, keys: &str) -> Result<Self> {
        CodeSequence::new(name, keys.chars().map(InputSymbol::from_char))
    }

    /// The code name reported on a match.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The symbols that must appear, in order, at the tail of the buffer.
    pub fn symbols(&self) -> &[InputSymbol] {
        &self.symbols
    }

    /// Number of symbols in the sequence.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always false; empty sequences are rejected at construction.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Insertion-ordered registry of secret code sequences
///
/// Names are unique across the registry. Sequences may overlap or be
/// suffixes of one another; the recognizer resolves that deterministically
/// by checking sequences in insertion order and firing the first match.
#[derive(Debug, Clone, Default)]
pub struct CodeBook {
    sequences: Vec<CodeSequence>,
}

impl CodeBook {
    /// Create an empty registry.
    pub fn new() -> Self {
        CodeBook {
            sequences: Vec::new(),
        }
    }

    /// Register a sequence, preserving insertion order.
    ///
    /// Returns [`StageError::Registry`] when a sequence with the same name
    /// is already registered.
    pub fn register(&mut self, sequence: CodeSequence) -> Result<()> {
        if self.sequences.iter().any(|s| s.name == sequence.name) {
            return Err(StageError::Registry(format!(
                "duplicate code name \"{}\"",
                sequence.name
            )));
        }
        self.sequences.push(sequence);
        Ok(())
    }

    /// Iterate over sequences in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CodeSequence> {
        self.sequences.iter()
    }

    /// Number of registered sequences.
    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    /// Look up a sequence by name.
    pub fn get(&self, name: &str) -> Option<&CodeSequence> {
        self.sequences.iter().find(|s| s.name == name)
    }
}

/// Modifier-gated rolling-buffer code recognizer
///
/// Feeds every qualifying key press into a bounded buffer and checks whether
/// the buffer now ends with any registered sequence. A shorter code that is
/// a suffix of a longer one's tail can fire before the longer code completes
/// if it was registered earlier; this mirrors the page's historical behavior
/// and is kept deterministic rather than "fixed".
#[derive(Debug)]
pub struct CodeRecognizer {
    book: CodeBook,
    buffer: InputBuffer,
    required: Modifiers,
}

impl CodeRecognizer {
    /// Create a recognizer over a registry, gated on Shift.
    pub fn new(book: CodeBook) -> Self {
        CodeRecognizer {
            book,
            buffer: InputBuffer::new(),
            required: Modifiers::SHIFT,
        }
    }

    /// Replace the modifier set a press must include to qualify.
    pub fn with_modifier(mut self, required: Modifiers) -> Self {
        self.required = required;
        self
    }

    /// Observe one key press; returns the matched code name, if any.
    ///
    /// Presses missing the required modifier are a complete no-op: the
    /// buffer is not updated and no match is attempted. On a match the
    /// buffer is cleared and remaining sequences are not checked.
    pub fn observe(&mut self, press: &KeyPress) -> Option<String> {
        if !press.modifiers.contains(self.required) {
            return None;
        }

        self.buffer.push(press.symbol.clone());

        for sequence in self.book.iter() {
            if self.buffer.ends_with(sequence.symbols()) {
                let name = sequence.name().to_string();
                debug!(code = %name, "secret code matched");
                self.buffer.clear();
                return Some(name);
            }
        }
        None
    }

    /// The registry this recognizer matches against.
    pub fn book(&self) -> &CodeBook {
        &self.book
    }

    /// Read access to the rolling buffer (mainly for diagnostics).
    pub fn buffer(&self) -> &InputBuffer {
        &self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book_of(entries: &[(&str, &str)]) -> CodeBook {
        let mut book = CodeBook::new();
        for (name, keys) in entries {
            book.register(CodeSequence::from_keys(*name, keys).unwrap())
                .unwrap();
        }
        book
    }

    #[test]
    fn test_empty_sequence_rejected() {
        assert!(matches!(
            CodeSequence::from_keys("nothing", ""),
            Err(StageError::Registry(_))
        ));
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut book = CodeBook::new();
        book.register(CodeSequence::from_keys("ba", "ba").unwrap())
            .unwrap();
        let dup = CodeSequence::from_keys("ba", "xy").unwrap();
        assert!(matches!(book.register(dup), Err(StageError::Registry(_))));
    }

    #[test]
    fn test_unmodified_press_is_a_noop() {
        let mut recognizer = CodeRecognizer::new(book_of(&[("z", "z")]));
        let before = recognizer.buffer().len();
        assert_eq!(recognizer.observe(&KeyPress::plain('z')), None);
        assert_eq!(recognizer.buffer().len(), before);
    }

    #[test]
    fn test_exact_sequence_matches_and_clears_buffer() {
        let mut recognizer = CodeRecognizer::new(book_of(&[("burst", "burst")]));
        let mut hit = None;
        for c in "burst".chars() {
            hit = recognizer.observe(&KeyPress::shifted(c));
        }
        assert_eq!(hit.as_deref(), Some("burst"));
        assert!(recognizer.buffer().is_empty());
    }

    #[test]
    fn test_case_insensitive_matching() {
        let mut recognizer = CodeRecognizer::new(book_of(&[("fx", "fx")]));
        recognizer.observe(&KeyPress::shifted('F'));
        let hit = recognizer.observe(&KeyPress::shifted('X'));
        assert_eq!(hit.as_deref(), Some("fx"));
    }

    #[test]
    fn test_unmatched_input_accumulates_without_error() {
        let mut recognizer = CodeRecognizer::new(book_of(&[("fx", "fx")]));
        for c in "qwertyuiopqwerty".chars() {
            assert_eq!(recognizer.observe(&KeyPress::shifted(c)), None);
        }
        assert_eq!(
            recognizer.buffer().len(),
            recognizer.buffer().capacity()
        );
    }

    #[test]
    fn test_noise_then_code_still_matches_as_suffix() {
        let mut recognizer = CodeRecognizer::new(book_of(&[("ba", "ba")]));
        for c in "xxxxb".chars() {
            recognizer.observe(&KeyPress::shifted(c));
        }
        let hit = recognizer.observe(&KeyPress::shifted('a'));
        assert_eq!(hit.as_deref(), Some("ba"));
    }

    #[test]
    fn test_insertion_order_breaks_ties() {
        // "a" registered before "ba": typing b then a fires "a", not "ba".
        // Deterministic first-match-wins over insertion order, preserved
        // as the page's historical resolution of overlapping codes.
        let mut recognizer = CodeRecognizer::new(book_of(&[("a", "a"), ("ba", "ba")]));
        recognizer.observe(&KeyPress::shifted('b'));
        let hit = recognizer.observe(&KeyPress::shifted('a'));
        assert_eq!(hit.as_deref(), Some("a"));

        // Registered the other way round, the longer code wins.
        let mut recognizer = CodeRecognizer::new(book_of(&[("ba", "ba"), ("a", "a")]));
        recognizer.observe(&KeyPress::shifted('b'));
        let hit = recognizer.observe(&KeyPress::shifted('a'));
        assert_eq!(hit.as_deref(), Some("ba"));
    }

    #[test]
    fn test_match_short_circuits_later_sequences() {
        let mut recognizer =
            CodeRecognizer::new(book_of(&[("short", "sa"), ("long", "xsa")]));
        for c in "xs".chars() {
            recognizer.observe(&KeyPress::shifted(c));
        }
        let hit = recognizer.observe(&KeyPress::shifted('a'));
        assert_eq!(hit.as_deref(), Some("short"));
        assert!(recognizer.buffer().is_empty());
    }

    #[test]
    fn test_buffer_cleared_on_match_prevents_refire() {
        let mut recognizer = CodeRecognizer::new(book_of(&[("z", "z"), ("zz", "zz")]));
        assert_eq!(
            recognizer.observe(&KeyPress::shifted('z')).as_deref(),
            Some("z")
        );
        // Second z starts from an empty buffer, so "zz" can never fire.
        assert_eq!(
            recognizer.observe(&KeyPress::shifted('z')).as_deref(),
            Some("z")
        );
    }

    #[test]
    fn test_custom_modifier_gate() {
        let mut recognizer =
            CodeRecognizer::new(book_of(&[("z", "z")])).with_modifier(Modifiers::CTRL);
        assert_eq!(recognizer.observe(&KeyPress::shifted('z')), None);
        let hit = recognizer.observe(&KeyPress::new('z', Modifiers::CTRL));
        assert_eq!(hit.as_deref(), Some("z"));
    }
}
