//! Word-order sequence.
//!
//! Every word instance is stamped with a value from one shared sequence.
//! Values are strictly increasing for the lifetime of the process and are
//! never reset per sentence or per parse.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, LazyLock};

static GLOBAL_SEQUENCE: LazyLock<Arc<WordSequence>> =
    LazyLock::new(|| Arc::new(WordSequence::new()));

/// Returns the process-wide word-order sequence.
#[must_use]
pub fn global_word_sequence() -> Arc<WordSequence> {
    Arc::clone(&GLOBAL_SEQUENCE)
}

/// Atomically incremented word-order counter.
///
/// # Example
///
/// ```rust
/// use linkgraph::WordSequence;
///
/// let sequence = WordSequence::new();
/// assert_eq!(sequence.next(), 1);
/// assert_eq!(sequence.next(), 2);
/// ```
#[derive(Debug, Default)]
pub struct WordSequence {
    last: AtomicU64,
}

impl WordSequence {
    /// Creates a sequence whose first value is 1.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last: AtomicU64::new(0),
        }
    }

    /// Creates a sequence whose first value is `last + 1`.
    #[must_use]
    pub const fn starting_after(last: u64) -> Self {
        Self {
            last: AtomicU64::new(last),
        }
    }

    /// Returns the next value. No two calls ever return the same value.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&self) -> u64 {
        self.last.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Ensures every later value is greater than `value`.
    ///
    /// Used when attaching to a store that already holds markers.
    pub fn advance_past(&self, value: u64) {
        self.last.fetch_max(value, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::thread;

    #[test]
    fn test_starts_at_one() {
        let sequence = WordSequence::new();
        assert_eq!(sequence.next(), 1);
    }

    #[test]
    fn test_starting_after() {
        let sequence = WordSequence::starting_after(41);
        assert_eq!(sequence.next(), 42);
    }

    #[test]
    fn test_advance_past_never_moves_backwards() {
        let sequence = WordSequence::starting_after(10);
        sequence.advance_past(5);
        assert_eq!(sequence.next(), 11);
        sequence.advance_past(100);
        assert_eq!(sequence.next(), 101);
    }

    #[test]
    fn test_concurrent_values_are_unique() {
        let sequence = Arc::new(WordSequence::new());
        let workers: Vec<_> = (0..4)
            .map(|_| {
                let sequence = Arc::clone(&sequence);
                thread::spawn(move || (0..500).map(|_| sequence.next()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for worker in workers {
            for value in worker.join().unwrap() {
                assert!(seen.insert(value), "duplicate value {value}");
            }
        }
        assert_eq!(seen.len(), 2000);
    }

    #[test]
    fn test_global_is_shared() {
        let a = global_word_sequence();
        let b = global_word_sequence();
        assert!(Arc::ptr_eq(&a, &b));
        let first = a.next();
        assert!(b.next() > first);
    }
}
