//! Undo log: a LIFO stack of compensating actions for destructive mutations.
//!
//! Entries are pushed when a delete is committed and replayed at most once by
//! undo. There is no redo. The log lives in memory only and starts empty for
//! every session.

use crate::Student;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A compensating action that restores deleted records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum UndoEntry {
    /// One record removed by a single delete
    SingleDelete { record: Student },
    /// Records removed by one bulk delete, in record-set order
    BulkDelete { records: Vec<Student> },
}

impl UndoEntry {
    /// The records this entry restores, in restoration order.
    pub fn records(&self) -> &[Student] {
        match self {
            UndoEntry::SingleDelete { record } => std::slice::from_ref(record),
            UndoEntry::BulkDelete { records } => records,
        }
    }

    /// Consume the entry, yielding its records.
    pub fn into_records(self) -> Vec<Student> {
        match self {
            UndoEntry::SingleDelete { record } => vec![record],
            UndoEntry::BulkDelete { records } => records,
        }
    }

    pub fn is_bulk(&self) -> bool {
        matches!(self, UndoEntry::BulkDelete { .. })
    }
}

/// Stack of undo entries, most recent last.
///
/// Unbounded by default. With a capacity, pushing onto a full log evicts the
/// oldest entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UndoLog {
    entries: VecDeque<UndoEntry>,
    capacity: Option<usize>,
}

impl UndoLog {
    /// Create an unbounded log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a log that keeps at most `capacity` entries (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: Some(capacity.max(1)),
        }
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Push an entry. Returns the entry evicted to make room, if any.
    pub fn push(&mut self, entry: UndoEntry) -> Option<UndoEntry> {
        let evicted = match self.capacity {
            Some(cap) if self.entries.len() >= cap => self.entries.pop_front(),
            _ => None,
        };
        self.entries.push_back(entry);
        evicted
    }

    /// Take back the entry just pushed, putting back whatever that push
    /// evicted so the log is exactly as it was before.
    pub fn retract(&mut self, evicted: Option<UndoEntry>) -> Option<UndoEntry> {
        let retracted = self.entries.pop_back();
        if let Some(entry) = evicted {
            self.entries.push_front(entry);
        }
        retracted
    }

    /// Remove and return the most recent entry.
    pub fn pop(&mut self) -> Option<UndoEntry> {
        self.entries.pop_back()
    }

    /// The entry the next `pop` would return.
    pub fn peek(&self) -> Option<&UndoEntry> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
