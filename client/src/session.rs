//! Session - the mutation coordinator.
//!
//! A session owns the roster state for its lifetime and is the only writer of
//! the record set. Every mutation follows the same shape:
//!
//! 1. validate the payload and check the record exists
//! 2. await the store call
//! 3. apply the memory change, only if the store call succeeded
//!
//! Deletes push their undo entry before the store call and retract it if the
//! call fails, so the undo log never holds an entry for a record that is still
//! present. Methods take `&mut self`, which serializes mutations.

use crate::config::Config;
use crate::error::{AppError, Result, StoreError};
use crate::notice::{Notice, NoticeSender};
use crate::store::{new_record_id, RecordStore};
use roster_engine::{
    csv, stats, Frame, RecordId, Roster, SortSpec, Student, StudentDraft, StudentPatch, UndoEntry,
    UndoLog, ViewParams,
};

/// Live roster state bound to a store.
pub struct Session<S: RecordStore> {
    store: S,
    roster: Roster,
    notices: NoticeSender,
}

impl<S: RecordStore> Session<S> {
    /// Create a session with default view parameters and an unbounded undo log.
    pub fn new(store: S, notices: NoticeSender) -> Self {
        Self {
            store,
            roster: Roster::new(),
            notices,
        }
    }

    /// Create a session using the configured page size and undo depth.
    pub fn with_config(store: S, config: &Config, notices: NoticeSender) -> Self {
        let params = ViewParams::with_page_size(config.page_size);
        let undo = match config.undo_depth {
            Some(depth) => UndoLog::with_capacity(depth),
            None => UndoLog::new(),
        };
        let roster = Roster::with_config(params, undo);
        tracing::debug!(
            page_size = config.page_size,
            undo_depth = ?roster.undo_log().capacity(),
            "Session configured"
        );
        Self {
            store,
            roster,
            notices,
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    fn notify(&self, notice: Notice) {
        // A dropped receiver just means nobody is listening.
        let _ = self.notices.send(notice);
    }

    fn persistence_failed(&self, action: &str, err: StoreError) -> AppError {
        tracing::warn!(action, error = %err, "Store call failed");
        self.notify(Notice::error(format!("{} failed: {}", action, err)));
        AppError::Persistence(err)
    }

    fn not_found(&self, id: &str) -> AppError {
        self.notify(Notice::warn(format!("Student {} not found", id)));
        roster_engine::Error::RecordNotFound(id.to_string()).into()
    }

    fn fresh_id(&self) -> RecordId {
        loop {
            let id = new_record_id();
            if !self.roster.contains(&id) {
                return id;
            }
        }
    }

    // ===== Loading =====

    /// Replace the record set with the store's contents.
    pub async fn load(&mut self) -> Result<usize> {
        let records = match self.store.list().await {
            Ok(records) => records,
            Err(e) => return Err(self.persistence_failed("Load", e)),
        };

        let dropped = self.roster.replace_all(records);
        if dropped > 0 {
            tracing::warn!(dropped, "Dropped records with duplicate ids");
        }
        tracing::info!(count = self.roster.len(), "Loaded records");
        Ok(self.roster.len())
    }

    // ===== Mutations =====

    /// Create a student. `name` and `email` are required.
    pub async fn create(&mut self, draft: StudentDraft) -> Result<Student> {
        if let Err(e) = draft.validate() {
            self.notify(Notice::warn("Please fill name and email"));
            return Err(e.into());
        }
        let created = self.persist_create(&draft, "Create").await?;
        tracing::info!(id = %created.id, "Created student");
        self.notify(Notice::info("Added"));
        Ok(created)
    }

    /// Persist a draft and append the result.
    ///
    /// When the store returns no id, or one already in use, a fresh id is
    /// assigned and written back with one `save` before memory changes.
    async fn persist_create(&mut self, draft: &StudentDraft, action: &str) -> Result<Student> {
        let mut created = match self.store.create(draft).await {
            Ok(created) => created,
            Err(e) => return Err(self.persistence_failed(action, e)),
        };

        if created.id.is_empty() || self.roster.contains(&created.id) {
            if !created.id.is_empty() {
                tracing::warn!(id = %created.id, "Store returned an id already in use");
            }
            created.id = self.fresh_id();
            let next = self.roster.with_restored(std::slice::from_ref(&created));
            if let Err(e) = self.store.save(&next).await {
                return Err(self.persistence_failed(action, e));
            }
        }
        self.roster.insert(created.clone())?;
        Ok(created)
    }

    /// Merge a patch into an existing student.
    pub async fn update(&mut self, id: &str, patch: StudentPatch) -> Result<Student> {
        if let Err(e) = patch.validate() {
            self.notify(Notice::warn("Please fill name and email"));
            return Err(e.into());
        }
        if !self.roster.contains(id) {
            return Err(self.not_found(id));
        }

        if let Err(e) = self.store.update(id, &patch).await {
            return Err(self.persistence_failed("Update", e));
        }

        let updated = self.roster.patch(id, &patch)?.clone();
        tracing::info!(id, "Updated student");
        self.notify(Notice::info("Updated"));
        Ok(updated)
    }

    /// Delete one student. Reversible through [`Session::undo`].
    pub async fn delete(&mut self, id: &str) -> Result<Student> {
        let record = match self.roster.get(id) {
            Some(record) => record.clone(),
            None => return Err(self.not_found(id)),
        };

        let evicted = self
            .roster
            .push_undo(UndoEntry::SingleDelete { record });

        if let Err(e) = self.store.delete(id).await {
            self.roster.retract_undo(evicted);
            return Err(self.persistence_failed("Delete", e));
        }

        let removed = self.roster.remove(id)?;
        tracing::info!(id, "Deleted student");
        self.notify(Notice::info("Deleted - you can undo"));
        Ok(removed)
    }

    /// Delete every student whose id is in `ids` as one undoable step.
    ///
    /// If a store delete fails part-way, the records already deleted in the
    /// store are written back with one `save` of the unchanged in-memory set,
    /// and the failure is returned. Memory is untouched in that case.
    pub async fn bulk_delete(&mut self, ids: &[RecordId]) -> Result<usize> {
        if ids.is_empty() {
            self.notify(Notice::warn("No items selected"));
            return Ok(0);
        }

        let records = self.roster.matching(ids);
        if records.is_empty() {
            self.notify(Notice::warn("No items selected"));
            return Ok(0);
        }
        let targets: Vec<RecordId> = records.iter().map(|s| s.id.clone()).collect();

        let evicted = self.roster.push_undo(UndoEntry::BulkDelete { records });

        for (done, id) in targets.iter().enumerate() {
            if let Err(e) = self.store.delete(id).await {
                self.roster.retract_undo(evicted);
                if done > 0 {
                    self.compensate_partial_delete(done).await;
                }
                return Err(self.persistence_failed("Bulk delete", e));
            }
        }

        let removed = self.roster.remove_many(&targets);
        tracing::info!(count = removed.len(), "Bulk deleted students");
        self.notify(Notice::info("Deleted selected"));
        Ok(removed.len())
    }

    async fn compensate_partial_delete(&self, deleted: usize) {
        tracing::warn!(deleted, "Bulk delete failed part-way, restoring store");
        if let Err(e) = self.store.save(self.roster.records()).await {
            tracing::error!(error = %e, "Could not restore store after partial bulk delete");
        }
    }

    /// Bulk delete the current selection.
    pub async fn bulk_delete_selected(&mut self) -> Result<usize> {
        let ids = self.roster.selection().ids();
        self.bulk_delete(&ids).await
    }

    /// Create a copy of a student under a new id.
    pub async fn clone_record(&mut self, id: &str) -> Result<Student> {
        let source = match self.roster.get(id) {
            Some(source) => source,
            None => return Err(self.not_found(id)),
        };
        let draft = source.duplicate(String::new()).to_draft();

        let created = self.persist_create(&draft, "Clone").await?;
        tracing::info!(source = id, id = %created.id, "Cloned student");
        self.notify(Notice::info("Cloned"));
        Ok(created)
    }

    /// Replay the most recent undo entry. Returns how many records came back.
    ///
    /// The restored set is persisted with one `save` so original ids survive.
    pub async fn undo(&mut self) -> Result<usize> {
        let Some(entry) = self.roster.pop_undo() else {
            self.notify(Notice::info("Nothing to undo"));
            return Ok(0);
        };

        let next = self.roster.with_restored(entry.records());
        if let Err(e) = self.store.save(&next).await {
            self.roster.push_undo(entry);
            return Err(self.persistence_failed("Undo", e));
        }

        let bulk = entry.is_bulk();
        let restored = self.roster.restore(entry.into_records());
        tracing::info!(restored, bulk, "Undid delete");
        self.notify(Notice::info(if bulk {
            "Undo bulk delete"
        } else {
            "Undo delete"
        }));
        Ok(restored)
    }

    // ===== CSV =====

    /// Create one student per data row. Rows are not validated.
    ///
    /// Rows created before a store failure are kept.
    pub async fn import_csv(&mut self, text: &str) -> Result<usize> {
        let drafts = csv::import(text);
        let mut imported = 0;
        for draft in &drafts {
            self.persist_create(draft, "Import").await?;
            imported += 1;
        }
        tracing::info!(imported, "Imported CSV");
        self.notify(Notice::info(format!("Imported {} rows", imported)));
        Ok(imported)
    }

    /// The full record set as CSV, without ids.
    pub fn export_csv(&self) -> String {
        csv::export(self.roster.records())
    }

    // ===== View =====

    pub fn set_search(&mut self, query: &str) {
        self.roster.set_search(query);
    }

    pub fn set_filter_major(&mut self, major: Option<&str>) {
        self.roster.set_filter_major(major);
    }

    pub fn set_sort(&mut self, sort: SortSpec) {
        self.roster.set_sort(sort);
    }

    pub fn set_page(&mut self, page: usize) {
        self.roster.set_page(page);
    }

    pub fn next_page(&mut self) {
        self.roster.next_page();
    }

    pub fn prev_page(&mut self) {
        self.roster.prev_page();
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.roster.set_page_size(page_size);
    }

    /// Derive the current page for rendering.
    pub fn frame(&mut self) -> Frame {
        self.roster.frame()
    }

    /// Distinct majors for the filter choices.
    pub fn majors(&self) -> Vec<String> {
        stats::majors(self.roster.records())
    }

    /// Students per major for the chart.
    pub fn major_counts(&self) -> Vec<(String, usize)> {
        stats::major_counts(self.roster.records())
    }

    // ===== Selection =====

    pub fn toggle(&mut self, id: &str) -> Result<bool> {
        if !self.roster.contains(id) {
            return Err(self.not_found(id));
        }
        Ok(self.roster.toggle(id)?)
    }

    /// Check or uncheck every row on the current page.
    pub fn select_page(&mut self, checked: bool) {
        self.roster.select_page(checked);
    }
}
