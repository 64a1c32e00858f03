//! Undo/redo history management.
//!
//! ## Learning: Snapshots vs Commands
//!
//! A text buffer usually stores *edits* and replays their inverses.
//! Card edits are tree rewrites whose inverses are awkward to compute, so
//! this history stores whole *snapshots* instead:
//! - Record appends a snapshot and moves the cursor to it
//! - Undo/redo just move the cursor
//! - Recording after an undo discards everything past the cursor
//!
//! Snapshots are plain values, so moving the cursor can never fail.

use serde::Serialize;
use std::collections::VecDeque;

/// A linear undo/redo log of snapshots.
///
/// ## Invariant
///
/// The log is never empty and `current_index < len()`. Every constructor
/// takes the initial snapshot for that reason.
///
/// ## Learning: VecDeque
///
/// We use `VecDeque` instead of `Vec` because a bounded history needs
/// efficient:
/// - Push to back (new snapshots)
/// - Pop from front (when at capacity)
/// - Truncate from back (discarding the redo branch)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct History<T> {
    /// Snapshots, oldest first
    #[serde(rename = "history")]
    entries: VecDeque<T>,
    /// Position of the current snapshot
    current_index: usize,
    /// Maximum number of snapshots to keep (0 = unlimited)
    #[serde(skip)]
    max_entries: usize,
}

impl<T> History<T> {
    /// Creates a history holding `initial`, keeping at most `max_entries`
    /// snapshots (0 = unlimited).
    pub fn new(initial: T, max_entries: usize) -> Self {
        let mut entries = VecDeque::new();
        entries.push_back(initial);
        Self {
            entries,
            current_index: 0,
            max_entries,
        }
    }

    /// Creates a history that never drops snapshots.
    pub fn unbounded(initial: T) -> Self {
        Self::new(initial, 0)
    }

    /// Records a new snapshot.
    ///
    /// Discards any snapshots after the cursor (no branching), appends
    /// `entry` and moves the cursor to it. When over capacity, the oldest
    /// snapshot is dropped.
    pub fn record(&mut self, entry: T) {
        self.entries.truncate(self.current_index + 1);
        self.entries.push_back(entry);
        self.current_index = self.entries.len() - 1;

        // Enforce capacity
        while self.max_entries > 0 && self.entries.len() > self.max_entries {
            self.entries.pop_front();
            self.current_index -= 1;
        }
    }

    /// Moves the cursor back one step.
    ///
    /// Returns `None` at the start of the log, leaving it untouched.
    pub fn undo(&mut self) -> Option<&T> {
        if !self.can_undo() {
            return None;
        }
        self.current_index -= 1;
        Some(self.current())
    }

    /// Moves the cursor forward one step.
    ///
    /// Returns `None` at the end of the log, leaving it untouched.
    pub fn redo(&mut self) -> Option<&T> {
        if !self.can_redo() {
            return None;
        }
        self.current_index += 1;
        Some(self.current())
    }

    /// Returns the snapshot at the cursor.
    pub fn current(&self) -> &T {
        &self.entries[self.current_index]
    }

    /// Replaces the snapshot at the cursor without recording a new step.
    ///
    /// Snapshots after the cursor are kept.
    pub fn replace_current(&mut self, entry: T) {
        self.entries[self.current_index] = entry;
    }

    /// Drops every snapshot and starts over from `entry`.
    pub fn reset(&mut self, entry: T) {
        self.entries.clear();
        self.entries.push_back(entry);
        self.current_index = 0;
    }

    /// Returns true if there is a snapshot before the cursor.
    pub fn can_undo(&self) -> bool {
        self.current_index > 0
    }

    /// Returns true if there is a snapshot after the cursor.
    pub fn can_redo(&self) -> bool {
        self.current_index + 1 < self.entries.len()
    }

    /// Returns the cursor position.
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Returns the number of snapshots.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: a history holds at least its initial snapshot.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of undo steps available.
    pub fn undo_count(&self) -> usize {
        self.current_index
    }

    /// Returns the number of redo steps available.
    pub fn redo_count(&self) -> usize {
        self.entries.len() - 1 - self.current_index
    }

    /// Returns the capacity (0 = unlimited).
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Iterates over snapshots, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    /// Iterates mutably over snapshots, oldest first.
    ///
    /// The cursor and the number of steps are left alone.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.entries.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_history_starts_at_initial() {
        let history = History::unbounded("seed");
        assert_eq!(history.len(), 1);
        assert_eq!(history.current_index(), 0);
        assert_eq!(*history.current(), "seed");
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_history_undo_redo() {
        let mut history = History::unbounded(0);
        history.record(1);
        history.record(2);

        assert_eq!(history.undo(), Some(&1));
        assert_eq!(history.undo(), Some(&0));
        assert_eq!(history.undo(), None);
        assert_eq!(history.current_index(), 0);

        assert_eq!(history.redo(), Some(&1));
        assert_eq!(history.redo(), Some(&2));
        assert_eq!(history.redo(), None);
        assert_eq!(history.current_index(), 2);
    }

    #[test]
    fn test_record_after_undo_truncates() {
        let mut history = History::unbounded('a');
        history.record('b');
        history.record('c');
        history.undo();
        history.undo();

        history.record('x');
        assert_eq!(history.iter().copied().collect::<String>(), "ax");
        assert!(!history.can_redo());
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let mut history = History::new(0, 3);
        for i in 1..=5 {
            history.record(i);
        }

        assert_eq!(history.len(), 3);
        assert_eq!(history.iter().copied().collect::<Vec<_>>(), vec![3, 4, 5]);
        assert_eq!(*history.current(), 5);
        assert_eq!(history.current_index(), 2);
    }

    #[test]
    fn test_replace_current_keeps_redo() {
        let mut history = History::unbounded(0);
        history.record(1);
        history.undo();
        history.replace_current(10);

        assert_eq!(*history.current(), 10);
        assert!(history.can_redo());
        assert_eq!(history.redo(), Some(&1));
    }

    #[test]
    fn test_iter_mut_rewrites_every_step() {
        let mut history = History::unbounded((0, 'a'));
        history.record((1, 'a'));
        history.record((2, 'a'));
        history.undo();

        for entry in history.iter_mut() {
            entry.1 = 'b';
        }

        assert_eq!(history.current_index(), 1);
        assert_eq!(history.redo(), Some(&(2, 'b')));
        history.undo();
        assert_eq!(history.undo(), Some(&(0, 'b')));
    }

    #[test]
    fn test_reset() {
        let mut history = History::unbounded(0);
        history.record(1);
        history.reset(7);
        assert_eq!(history.len(), 1);
        assert_eq!(*history.current(), 7);
    }

    #[test]
    fn test_serialized_shape() {
        let mut history = History::unbounded("a");
        history.record("b");
        let value = serde_json::to_value(&history).unwrap();
        assert_eq!(value, serde_json::json!({ "history": ["a", "b"], "currentIndex": 1 }));
    }

    proptest! {
        #[test]
        fn prop_records_are_monotonic(n in 0usize..64) {
            let mut history = History::unbounded(0usize);
            for i in 1..=n {
                history.record(i);
            }
            prop_assert_eq!(history.len(), n + 1);
            prop_assert_eq!(history.current_index(), n);
        }

        #[test]
        fn prop_undo_then_redo_returns_same(n in 1usize..32) {
            let mut history = History::unbounded(0usize);
            for i in 1..=n {
                history.record(i);
            }
            let before = *history.current();
            history.undo();
            prop_assert_eq!(history.redo().copied(), Some(before));
        }

        #[test]
        fn prop_undo_then_record_truncates(n in 1usize..32, undos in 1usize..32) {
            let mut history = History::unbounded(0usize);
            for i in 1..=n {
                history.record(i);
            }
            for _ in 0..undos {
                history.undo();
            }
            let cursor = history.current_index();
            history.record(999);
            prop_assert_eq!(history.len(), cursor + 2);
            prop_assert_eq!(history.current_index(), cursor + 1);
        }

        #[test]
        fn prop_cursor_stays_in_bounds(ops in proptest::collection::vec(0u8..3, 0..64), cap in 0usize..8) {
            let mut history = History::new(0u32, cap);
            for (i, op) in ops.into_iter().enumerate() {
                match op {
                    0 => history.record(i as u32),
                    1 => { history.undo(); }
                    _ => { history.redo(); }
                }
                prop_assert!(history.current_index() < history.len());
                if cap > 0 {
                    prop_assert!(history.len() <= cap.max(1));
                }
            }
        }
    }
}
