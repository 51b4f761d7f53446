//! Bounded Rolling Input Buffer
//!
//! FIFO buffer of the most recently observed symbols. The recognizer
//! suffix-matches registered code sequences against it and clears it
//! whenever a match fires.

use super::InputSymbol;
use crate::constants::INPUT_BUFFER_CAPACITY;
use std::collections::VecDeque;

/// Rolling buffer of the most recent input symbols
///
/// Length never exceeds the fixed capacity; pushing onto a full buffer
/// evicts the oldest symbol first.
#[derive(Debug, Clone)]
pub struct InputBuffer {
    symbols: VecDeque<InputSymbol>,
    capacity: usize,
}

impl InputBuffer {
    /// Create a buffer with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(INPUT_BUFFER_CAPACITY)
    }

    /// Create a buffer with an explicit capacity (must be at least 1).
    pub fn with_capacity(capacity: usize) -> Self {
        InputBuffer {
            symbols: VecDeque::with_capacity(capacity.max(1)),
            capacity: capacity.max(1),
        }
    }

    /// Append a symbol, evicting the oldest if the buffer is full.
    pub fn push(&mut self, symbol: InputSymbol) {
        if self.symbols.len() == self.capacity {
            self.symbols.pop_front();
        }
        self.symbols.push_back(symbol);
    }

    /// Whether the trailing symbols equal `sequence`, in order.
    ///
    /// Sequences longer than the current buffer contents never match.
    pub fn ends_with(&self, sequence: &[InputSymbol]) -> bool {
        if sequence.is_empty() || sequence.len() > self.symbols.len() {
            return false;
        }
        let offset = self.symbols.len() - sequence.len();
        self.symbols
            .iter()
            .skip(offset)
            .eq(sequence.iter())
    }

    /// Remove all buffered symbols.
    pub fn clear(&mut self) {
        self.symbols.clear();
    }

    /// Current number of buffered symbols.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Whether the buffer holds no symbols.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Maximum number of symbols the buffer retains.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate over buffered symbols, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &InputSymbol> {
        self.symbols.iter()
    }
}

impl Default for InputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(c: char) -> InputSymbol {
        InputSymbol::from_char(c)
    }

    #[test]
    fn test_push_and_len() {
        let mut buffer = InputBuffer::new();
        assert!(buffer.is_empty());
        buffer.push(sym('a'));
        buffer.push(sym('b'));
        assert_eq!(buffer.len(), 2);
    }

    #[test]
    fn test_capacity_evicts_oldest_first() {
        let mut buffer = InputBuffer::with_capacity(3);
        for c in ['a', 'b', 'c', 'd', 'e'] {
            buffer.push(sym(c));
        }
        assert_eq!(buffer.len(), 3);
        let retained: Vec<_> = buffer.iter().cloned().collect();
        assert_eq!(retained, vec![sym('c'), sym('d'), sym('e')]);
    }

    #[test]
    fn test_never_exceeds_capacity() {
        // Feeding capacity + k symbols retains exactly the last capacity ones
        let mut buffer = InputBuffer::new();
        for i in 0..(INPUT_BUFFER_CAPACITY + 17) {
            buffer.push(sym(char::from(b'a' + (i % 26) as u8)));
            assert!(buffer.len() <= INPUT_BUFFER_CAPACITY);
        }
        assert_eq!(buffer.len(), INPUT_BUFFER_CAPACITY);
    }

    #[test]
    fn test_ends_with_matches_suffix_only() {
        let mut buffer = InputBuffer::new();
        for c in ['x', 'b', 'a'] {
            buffer.push(sym(c));
        }
        assert!(buffer.ends_with(&[sym('b'), sym('a')]));
        assert!(buffer.ends_with(&[sym('a')]));
        assert!(!buffer.ends_with(&[sym('x'), sym('a')]));
    }

    #[test]
    fn test_ends_with_longer_than_contents() {
        let mut buffer = InputBuffer::new();
        buffer.push(sym('a'));
        assert!(!buffer.ends_with(&[sym('b'), sym('a')]));
    }

    #[test]
    fn test_ends_with_empty_sequence_never_matches() {
        let mut buffer = InputBuffer::new();
        buffer.push(sym('a'));
        assert!(!buffer.ends_with(&[]));
    }

    #[test]
    fn test_clear() {
        let mut buffer = InputBuffer::new();
        buffer.push(sym('a'));
        buffer.clear();
        assert!(buffer.is_empty());
    }
}
