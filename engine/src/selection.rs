//! Selection tracker: the ids the user has checked for bulk operations.

use crate::RecordId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// Set of checked record ids.
///
/// Ids are kept sorted so bulk operations driven by the selection run in a
/// deterministic order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    ids: BTreeSet<RecordId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the checked state of `id`. Returns the new state.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    /// Set the checked state of a single id.
    pub fn set(&mut self, id: &str, checked: bool) {
        if checked {
            self.ids.insert(id.to_string());
        } else {
            self.ids.remove(id);
        }
    }

    /// Check or uncheck every id given. Callers pass the visible page only.
    pub fn set_all<'a, I>(&mut self, ids: I, checked: bool)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for id in ids {
            self.set(id, checked);
        }
    }

    /// Drop every id not present in `valid_ids`. Returns how many were dropped.
    pub fn prune<'a, I>(&mut self, valid_ids: I) -> usize
    where
        I: IntoIterator<Item = &'a str>,
    {
        let valid: HashSet<&str> = valid_ids.into_iter().collect();
        let before = self.ids.len();
        self.ids.retain(|id| valid.contains(id.as_str()));
        before - self.ids.len()
    }

    pub fn remove(&mut self, id: &str) -> bool {
        self.ids.remove(id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Selected ids in sorted order.
    pub fn ids(&self) -> Vec<RecordId> {
        self.ids.iter().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RecordId> {
        self.ids.iter()
    }
}
