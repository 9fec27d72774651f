//! Linear undo/redo history.
//!
//! ```text
//! entries:  [s0] [s1] [s2] [s3]
//!                      ^ cursor        undo -> s1, redo -> s3
//! commit(s4) here drops s3: [s0] [s1] [s2] [s4]
//! ```
//!
//! Entries are values. Callers must hand in snapshots that share nothing
//! mutable with live state; the store does this with copy-on-write `Arc`s.

use std::collections::VecDeque;

/// Ordered snapshots plus a cursor at the one matching live state.
#[derive(Debug, Clone)]
pub struct History<T> {
    entries: VecDeque<T>,
    /// Index of the current entry, `None` while empty.
    cursor: Option<usize>,
    /// Maximum entries kept (oldest dropped when exceeded), `None` for no limit.
    capacity: Option<usize>,
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> History<T> {
    /// Create an empty, unbounded history.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: VecDeque::new(),
            cursor: None,
            capacity: None,
        }
    }

    /// Create a history that keeps at most `capacity` entries (at least one).
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity.max(1)),
            ..Self::new()
        }
    }

    /// Record a new current state.
    ///
    /// Everything after the cursor is discarded first.
    pub fn commit(&mut self, entry: T) {
        match self.cursor {
            Some(cursor) => self.entries.truncate(cursor + 1),
            None => self.entries.clear(),
        }
        self.entries.push_back(entry);
        if let Some(capacity) = self.capacity {
            while self.entries.len() > capacity {
                self.entries.pop_front();
            }
        }
        self.cursor = Some(self.entries.len() - 1);
    }

    /// Step back one entry and return it. `None` if there is nothing to undo.
    pub fn undo(&mut self) -> Option<&T> {
        let cursor = self.cursor.filter(|&c| c > 0)? - 1;
        self.cursor = Some(cursor);
        self.entries.get(cursor)
    }

    /// Step forward one entry and return it. `None` if there is nothing to redo.
    pub fn redo(&mut self) -> Option<&T> {
        let cursor = self.cursor? + 1;
        if cursor >= self.entries.len() {
            return None;
        }
        self.cursor = Some(cursor);
        self.entries.get(cursor)
    }

    /// Whether [`History::undo`] would move.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.cursor.is_some_and(|c| c > 0)
    }

    /// Whether [`History::redo`] would move.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor.is_some_and(|c| c + 1 < self.entries.len())
    }

    /// Entry under the cursor.
    #[must_use]
    pub fn current(&self) -> Option<&T> {
        self.entries.get(self.cursor?)
    }

    /// Cursor position, `None` while empty.
    #[must_use]
    pub const fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Number of entries, including redoable ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing has been committed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Configured capacity.
    #[must_use]
    pub const fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
    }
}
