//! Local store backed by a JSON file.

use super::{new_record_id, seed_records, RecordStore, StoreResult};
use crate::error::StoreError;
use async_trait::async_trait;
use roster_engine::{Student, StudentDraft, StudentPatch};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Stores the whole record set as one JSON array on disk.
///
/// A missing file is seeded with sample students on the first read. Every
/// write replaces the file through a temporary sibling and a rename.
#[derive(Debug)]
pub struct LocalStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles
    lock: Mutex<()>,
}

impl LocalStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> StoreResult<Vec<Student>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let seed = seed_records();
                self.write(&seed).await?;
                tracing::info!(path = %self.path.display(), count = seed.len(), "Seeded local store");
                Ok(seed)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, records: &[Student]) -> StoreResult<()> {
        let json = serde_json::to_vec_pretty(records)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl RecordStore for LocalStore {
    async fn list(&self) -> StoreResult<Vec<Student>> {
        let _guard = self.lock.lock().await;
        self.read().await
    }

    async fn create(&self, draft: &StudentDraft) -> StoreResult<Student> {
        let _guard = self.lock.lock().await;
        let mut records = self.read().await?;
        let student = Student::from_draft(new_record_id(), draft.clone());
        records.push(student.clone());
        self.write(&records).await?;
        tracing::debug!(id = %student.id, "Created record in local store");
        Ok(student)
    }

    async fn update(&self, id: &str, patch: &StudentPatch) -> StoreResult<Student> {
        let _guard = self.lock.lock().await;
        let mut records = self.read().await?;
        let record = records
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        record.apply_patch(patch);
        let updated = record.clone();
        self.write(&records).await?;
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        let _guard = self.lock.lock().await;
        let mut records = self.read().await?;
        let before = records.len();
        records.retain(|s| s.id != id);
        if records.len() != before {
            self.write(&records).await?;
        }
        Ok(())
    }

    async fn save(&self, records: &[Student]) -> StoreResult<()> {
        let _guard = self.lock.lock().await;
        self.write(records).await
    }
}
