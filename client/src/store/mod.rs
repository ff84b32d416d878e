//! Record store: the persistence collaborator behind a session.
//!
//! A store owns the durable copy of the record set. Sessions call it before
//! touching their in-memory state, so every method may suspend.
//!
//! Implementations:
//! - [`LocalStore`]: a JSON file on local disk (seeded on first use)
//! - [`RemoteStore`]: a REST service reached over HTTP
//! - [`MemoryStore`]: in-process, with failure injection for tests

mod local;
mod memory;
mod remote;

pub use local::LocalStore;
pub use memory::MemoryStore;
pub use remote::RemoteStore;

use crate::config::Config;
use crate::error::StoreError;
use async_trait::async_trait;
use roster_engine::{RecordId, Student, StudentDraft, StudentPatch};

/// Result type for store calls.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Persistence contract consumed by the session.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Read every record. An empty store may seed itself once.
    async fn list(&self) -> StoreResult<Vec<Student>>;

    /// Persist a new record and return it with its assigned id.
    async fn create(&self, draft: &StudentDraft) -> StoreResult<Student>;

    /// Merge a patch into an existing record.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if `id` is absent.
    async fn update(&self, id: &str, patch: &StudentPatch) -> StoreResult<Student>;

    /// Remove a record. Deleting an absent id succeeds.
    async fn delete(&self, id: &str) -> StoreResult<()>;

    /// Overwrite the whole collection, keeping the given ids.
    async fn save(&self, records: &[Student]) -> StoreResult<()>;
}

#[async_trait]
impl<S: RecordStore + ?Sized> RecordStore for Box<S> {
    async fn list(&self) -> StoreResult<Vec<Student>> {
        (**self).list().await
    }

    async fn create(&self, draft: &StudentDraft) -> StoreResult<Student> {
        (**self).create(draft).await
    }

    async fn update(&self, id: &str, patch: &StudentPatch) -> StoreResult<Student> {
        (**self).update(id, patch).await
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        (**self).delete(id).await
    }

    async fn save(&self, records: &[Student]) -> StoreResult<()> {
        (**self).save(records).await
    }
}

/// Pick the backend named by the configuration.
pub fn open_store(config: &Config) -> Box<dyn RecordStore> {
    if config.api_mode {
        let store = RemoteStore::new(config.api_url.clone());
        tracing::info!(url = store.base_url(), "Using remote store");
        Box::new(store)
    } else {
        let store = LocalStore::new(config.data_path.clone());
        tracing::info!(path = %store.path().display(), "Using local store");
        Box::new(store)
    }
}

/// Generate a fresh record id.
pub fn new_record_id() -> RecordId {
    format!("s_{}", uuid::Uuid::new_v4().simple())
}

/// Records written by a local store the first time it is read.
pub fn seed_records() -> Vec<Student> {
    [
        ("Alice Tran", "alice@example.com", "Computer Science"),
        ("Sok Dara", "dara@example.com", "Business"),
        ("John Roe", "john@example.com", "Engineering"),
        ("Malis Chea", "malis@example.com", "Arts"),
    ]
    .into_iter()
    .map(|(name, email, major)| Student::new(new_record_id(), name, email, major))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn record_ids_are_unique() {
        let ids: HashSet<RecordId> = (0..1000).map(|_| new_record_id()).collect();
        assert_eq!(ids.len(), 1000);
        assert!(ids.iter().all(|id| id.starts_with("s_")));
    }

    #[test]
    fn seed_has_four_students() {
        let seed = seed_records();
        assert_eq!(seed.len(), 4);
        assert_eq!(seed[1].name, "Sok Dara");
        assert!(seed.iter().all(|s| StudentDraft::validate(&s.to_draft()).is_ok()));
    }

    #[tokio::test]
    async fn boxed_store_delegates() {
        let store: Box<dyn RecordStore> = Box::new(MemoryStore::with_records(seed_records()));
        assert_eq!(store.list().await.unwrap().len(), 4);
    }
}
