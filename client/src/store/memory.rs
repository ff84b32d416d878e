//! In-memory store with failure injection.

use super::{RecordStore, StoreResult};
use crate::error::StoreError;
use async_trait::async_trait;
use roster_engine::{RecordId, Student, StudentDraft, StudentPatch};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

/// Order-preserving in-memory store.
///
/// Clones share state, so a test can keep a handle after handing the store to
/// a session and inspect what was persisted. Ids are generated from a counter
/// (`mem_1`, `mem_2`, ...) so runs are reproducible.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

#[derive(Debug, Default)]
struct MemoryState {
    records: Vec<Student>,
    next_id: u64,
    /// Return records from `create` without an id
    omit_ids: bool,
    /// The next call of any kind fails
    fail_next: bool,
    /// Deletes of these ids fail
    fail_deletes: HashSet<RecordId>,
    /// Every call, in order, e.g. `create`, `delete:s_1`, `save:4`
    calls: Vec<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<Student>) -> Self {
        let store = Self::default();
        store.state().records = records;
        store
    }

    /// Make `create` return records with an empty id, like a backend that
    /// leaves id assignment to the client.
    pub fn omitting_ids(self) -> Self {
        self.state().omit_ids = true;
        self
    }

    /// Fail the next call, whatever it is.
    pub fn fail_next(&self) {
        self.state().fail_next = true;
    }

    /// Fail every delete of `id` until cleared.
    pub fn fail_delete_of(&self, id: &str) {
        self.state().fail_deletes.insert(id.to_string());
    }

    pub fn clear_failures(&self) {
        let mut state = self.state();
        state.fail_next = false;
        state.fail_deletes.clear();
    }

    /// Current persisted records.
    pub fn records(&self) -> Vec<Student> {
        self.state().records.clone()
    }

    /// Calls received so far.
    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        // Every mutation completes under the lock, so poisoned data is intact.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn begin(&self, call: String) -> StoreResult<MutexGuard<'_, MemoryState>> {
        let mut state = self.state();
        state.calls.push(call.clone());
        if state.fail_next {
            state.fail_next = false;
            return Err(StoreError::Injected(call));
        }
        Ok(state)
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn list(&self) -> StoreResult<Vec<Student>> {
        let state = self.begin("list".into())?;
        Ok(state.records.clone())
    }

    async fn create(&self, draft: &StudentDraft) -> StoreResult<Student> {
        let mut state = self.begin("create".into())?;
        state.next_id += 1;
        let id = format!("mem_{}", state.next_id);
        let student = Student::from_draft(id, draft.clone());
        state.records.push(student.clone());

        if state.omit_ids {
            return Ok(Student {
                id: String::new(),
                ..student
            });
        }
        Ok(student)
    }

    async fn update(&self, id: &str, patch: &StudentPatch) -> StoreResult<Student> {
        let mut state = self.begin(format!("update:{}", id))?;
        let record = state
            .records
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        record.apply_patch(patch);
        Ok(record.clone())
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        let mut state = self.begin(format!("delete:{}", id))?;
        if state.fail_deletes.contains(id) {
            return Err(StoreError::Injected(format!("delete:{}", id)));
        }
        state.records.retain(|s| s.id != id);
        Ok(())
    }

    async fn save(&self, records: &[Student]) -> StoreResult<()> {
        let mut state = self.begin(format!("save:{}", records.len()))?;
        state.records = records.to_vec();
        Ok(())
    }
}
