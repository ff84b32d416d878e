//! Roster - the in-memory state container.
//!
//! The Roster owns the record set, the view parameters, the selection and the
//! undo log. It performs memory-side changes only; whoever drives it is
//! responsible for persisting a change before applying it here.

use crate::{
    error::Result, view, Error, RecordId, Selection, SortSpec, Student, StudentPatch, UndoEntry,
    UndoLog, View, ViewParams,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Owned snapshot of what the renderer shows after a derivation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub page_slice: Vec<Student>,
    pub current_page: usize,
    pub total_pages: usize,
    /// Length of the filtered list the page was cut from
    pub total_filtered: usize,
    pub page_size: usize,
    pub selected_ids: Vec<RecordId>,
}

impl Frame {
    /// 1-based row number of the first row in `page_slice`.
    pub fn first_row_number(&self) -> usize {
        (self.current_page - 1) * self.page_size + 1
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected_ids.iter().any(|s| s == id)
    }
}

/// The state owned by one session.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    records: Vec<Student>,
    params: ViewParams,
    selection: Selection,
    undo: UndoLog,
}

impl Roster {
    /// Create an empty roster with default view parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty roster with the given parameters and undo log.
    pub fn with_config(params: ViewParams, undo: UndoLog) -> Self {
        Self {
            records: Vec::new(),
            params,
            selection: Selection::new(),
            undo,
        }
    }

    // ===== Record set =====

    pub fn records(&self) -> &[Student] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Student> {
        self.records.iter().find(|s| s.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Replace the whole record set, e.g. after loading from the store.
    ///
    /// Later records reusing an id already seen are dropped. Returns how many
    /// were dropped.
    pub fn replace_all(&mut self, records: Vec<Student>) -> usize {
        let mut seen = HashSet::new();
        let before = records.len();
        self.records = records
            .into_iter()
            .filter(|s| seen.insert(s.id.clone()))
            .collect();
        self.prune_selection();
        before - self.records.len()
    }

    /// Append a record.
    pub fn insert(&mut self, record: Student) -> Result<()> {
        if self.contains(&record.id) {
            return Err(Error::RecordAlreadyExists(record.id));
        }
        self.records.push(record);
        Ok(())
    }

    /// Merge a patch into an existing record.
    pub fn patch(&mut self, id: &str, patch: &StudentPatch) -> Result<&Student> {
        let record = self
            .records
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| Error::RecordNotFound(id.to_string()))?;
        record.apply_patch(patch);
        Ok(record)
    }

    /// Remove one record, dropping it from the selection too.
    pub fn remove(&mut self, id: &str) -> Result<Student> {
        let idx = self
            .records
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| Error::RecordNotFound(id.to_string()))?;
        self.selection.remove(id);
        Ok(self.records.remove(idx))
    }

    /// Records whose id is in `ids`, cloned, in record-set order.
    pub fn matching(&self, ids: &[RecordId]) -> Vec<Student> {
        let wanted: HashSet<&str> = ids.iter().map(String::as_str).collect();
        self.records
            .iter()
            .filter(|s| wanted.contains(s.id.as_str()))
            .cloned()
            .collect()
    }

    /// Remove every record whose id is in `ids`, dropping them from the
    /// selection. Returns the removed records in record-set order.
    pub fn remove_many(&mut self, ids: &[RecordId]) -> Vec<Student> {
        let wanted: HashSet<&str> = ids.iter().map(String::as_str).collect();
        let (removed, kept): (Vec<Student>, Vec<Student>) = std::mem::take(&mut self.records)
            .into_iter()
            .partition(|s| wanted.contains(s.id.as_str()));
        self.records = kept;
        for s in &removed {
            self.selection.remove(&s.id);
        }
        removed
    }

    /// Re-insert records from an undo entry, in order. Records whose id is
    /// already present are skipped. Returns how many were restored.
    pub fn restore(&mut self, records: Vec<Student>) -> usize {
        let mut restored = 0;
        for record in records {
            if self.insert(record).is_ok() {
                restored += 1;
            }
        }
        restored
    }

    /// The record set that `restore` would produce, without applying it.
    pub fn with_restored(&self, records: &[Student]) -> Vec<Student> {
        let mut out = self.records.clone();
        for record in records {
            if !out.iter().any(|s| s.id == record.id) {
                out.push(record.clone());
            }
        }
        out
    }

    fn prune_selection(&mut self) {
        let Self {
            records, selection, ..
        } = self;
        selection.prune(records.iter().map(|s| s.id.as_str()));
    }

    // ===== Undo log =====

    pub fn undo_log(&self) -> &UndoLog {
        &self.undo
    }

    /// Push an undo entry. Returns the entry evicted by a capped log.
    pub fn push_undo(&mut self, entry: UndoEntry) -> Option<UndoEntry> {
        self.undo.push(entry)
    }

    /// Withdraw the entry just pushed, e.g. because persisting the delete
    /// failed. `evicted` is what that push returned.
    pub fn retract_undo(&mut self, evicted: Option<UndoEntry>) -> Option<UndoEntry> {
        self.undo.retract(evicted)
    }

    pub fn pop_undo(&mut self) -> Option<UndoEntry> {
        self.undo.pop()
    }

    // ===== View parameters =====

    pub fn params(&self) -> &ViewParams {
        &self.params
    }

    /// Set the search text. Changing it returns to page 1.
    pub fn set_search(&mut self, query: &str) {
        self.params.search_query = query.to_string();
        self.params.page = 1;
    }

    /// Set the major filter. An empty string clears it.
    pub fn set_filter_major(&mut self, major: Option<&str>) {
        self.params.filter_major = major.filter(|m| !m.is_empty()).map(str::to_string);
    }

    pub fn set_sort(&mut self, sort: SortSpec) {
        self.params.sort = sort;
    }

    pub fn set_page(&mut self, page: usize) {
        self.params.page = page;
        self.clamp_page();
    }

    pub fn next_page(&mut self) {
        self.params.page += 1;
        self.clamp_page();
    }

    pub fn prev_page(&mut self) {
        if self.params.page > 1 {
            self.params.page -= 1;
        }
        self.clamp_page();
    }

    /// Set rows per page (at least one). Returns to page 1.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.params.page_size = page_size.max(1);
        self.params.page = 1;
    }

    fn clamp_page(&mut self) {
        let page = view::derive(&self.records, &self.params).page;
        self.params.page = page;
    }

    // ===== Derivation =====

    /// Derive the current view.
    pub fn view(&self) -> View<'_> {
        view::derive(&self.records, &self.params)
    }

    /// Derive, store the clamped page back into the parameters, and return
    /// an owned frame for rendering.
    pub fn frame(&mut self) -> Frame {
        let view = view::derive(&self.records, &self.params);
        let frame = Frame {
            page_slice: view.page_slice.into_iter().cloned().collect(),
            current_page: view.page,
            total_pages: view.total_pages,
            total_filtered: view.filtered.len(),
            page_size: self.params.page_size.max(1),
            selected_ids: self.selection.ids(),
        };
        self.params.page = frame.current_page;
        frame
    }

    // ===== Selection =====

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Flip the checked state of a record on display.
    pub fn toggle(&mut self, id: &str) -> Result<bool> {
        if !self.contains(id) {
            return Err(Error::RecordNotFound(id.to_string()));
        }
        Ok(self.selection.toggle(id))
    }

    /// Check or uncheck every record on the current page.
    pub fn select_page(&mut self, checked: bool) {
        let Self {
            records,
            params,
            selection,
            ..
        } = self;
        let view = view::derive(records, params);
        selection.set_all(view.page_slice.iter().map(|s| s.id.as_str()), checked);
    }
}
