//! Stepwise Sequence Matching
//!
//! The konami-style unlock path: a single sequence matched one symbol at a
//! time with no modifier requirement. Progress resets to zero on the first
//! wrong symbol; completing the sequence reports a hit and starts over.

use crate::input::InputSymbol;
use tracing::debug;

/// Progressive matcher for a single unlock sequence
#[derive(Debug, Clone)]
pub struct ProgressiveMatcher {
    sequence: Vec<InputSymbol>,
    index: usize,
}

impl ProgressiveMatcher {
    /// Create a matcher over the given sequence.
    ///
    /// An empty sequence never completes.
    pub fn new(sequence: impl IntoIterator<Item = InputSymbol>) -> Self {
        ProgressiveMatcher {
            sequence: sequence.into_iter().collect(),
            index: 0,
        }
    }

    /// Create a matcher from the characters of a string.
    pub fn from_keys(keys: &str) -> Self {
        ProgressiveMatcher::new(keys.chars().map(InputSymbol::from_char))
    }

    /// Feed one symbol; returns true when the sequence just completed.
    ///
    /// A wrong symbol resets progress outright, even if it equals the first
    /// element of the sequence (historical page behavior, preserved).
    pub fn observe(&mut self, symbol: &InputSymbol) -> bool {
        if self.sequence.is_empty() {
            return false;
        }
        if *symbol == self.sequence[self.index] {
            self.index += 1;
            if self.index == self.sequence.len() {
                self.index = 0;
                debug!("unlock sequence completed");
                return true;
            }
        } else {
            self.index = 0;
        }
        false
    }

    /// Current progress into the sequence.
    pub fn progress(&self) -> usize {
        self.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(c: char) -> InputSymbol {
        InputSymbol::from_char(c)
    }

    #[test]
    fn test_completes_on_exact_sequence() {
        let mut matcher = ProgressiveMatcher::from_keys("ne");
        assert!(!matcher.observe(&sym('n')));
        assert!(matcher.observe(&sym('e')));
        assert_eq!(matcher.progress(), 0);
    }

    #[test]
    fn test_wrong_symbol_resets_progress() {
        let mut matcher = ProgressiveMatcher::from_keys("ne");
        matcher.observe(&sym('n'));
        assert!(!matcher.observe(&sym('x')));
        assert_eq!(matcher.progress(), 0);
        // Needs the full sequence again
        assert!(!matcher.observe(&sym('e')));
        assert!(!matcher.observe(&sym('n')));
        assert!(matcher.observe(&sym('e')));
    }

    #[test]
    fn test_reset_even_on_restart_symbol() {
        // Sequence "nne": after "nn", a stray 'n'... progress tracking is
        // strict: "n n n" means the third n mismatches 'e' and resets to 0,
        // it does not keep partial credit for the repeated prefix.
        let mut matcher = ProgressiveMatcher::from_keys("nne");
        matcher.observe(&sym('n'));
        matcher.observe(&sym('n'));
        assert!(!matcher.observe(&sym('n')));
        assert_eq!(matcher.progress(), 0);
    }

    #[test]
    fn test_completes_repeatedly() {
        let mut matcher = ProgressiveMatcher::from_keys("ne");
        for _ in 0..3 {
            assert!(!matcher.observe(&sym('n')));
            assert!(matcher.observe(&sym('e')));
        }
    }

    #[test]
    fn test_empty_sequence_never_completes() {
        let mut matcher = ProgressiveMatcher::new(std::iter::empty());
        assert!(!matcher.observe(&sym('n')));
    }
}
