//! Remote store speaking JSON to a REST service.
//!
//! Endpoints, relative to the collection URL:
//! - `GET /` lists records
//! - `POST /` creates a record and returns it
//! - `PUT /{id}` merges fields into a record and returns it
//! - `DELETE /{id}` removes a record
//! - `PUT /` overwrites the collection with the request body

use super::{RecordStore, StoreResult};
use crate::error::StoreError;
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use roster_engine::{Student, StudentDraft, StudentPatch};

/// HTTP client for a students collection.
#[derive(Debug, Clone)]
pub struct RemoteStore {
    client: Client,
    base_url: String,
}

impl RemoteStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of one record. The id is percent-encoded as a single path segment.
    fn record_url(&self, id: &str) -> StoreResult<Url> {
        let invalid = || StoreError::InvalidUrl(self.base_url.clone());
        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }
}

/// Map non-success statuses to `StoreError::Status`.
fn check(response: Response) -> StoreResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    Err(StoreError::Status {
        status: status.as_u16(),
        url: response.url().to_string(),
    })
}

#[async_trait]
impl RecordStore for RemoteStore {
    async fn list(&self) -> StoreResult<Vec<Student>> {
        tracing::debug!(url = %self.base_url, "GET records");
        let response = self.client.get(&self.base_url).send().await?;
        Ok(check(response)?.json().await?)
    }

    async fn create(&self, draft: &StudentDraft) -> StoreResult<Student> {
        tracing::debug!(url = %self.base_url, "POST record");
        let response = self.client.post(&self.base_url).json(draft).send().await?;
        Ok(check(response)?.json().await?)
    }

    async fn update(&self, id: &str, patch: &StudentPatch) -> StoreResult<Student> {
        let url = self.record_url(id)?;
        tracing::debug!(url = %url, "PUT record");
        let response = self.client.put(url).json(patch).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(check(response)?.json().await?)
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        let url = self.record_url(id)?;
        tracing::debug!(url = %url, "DELETE record");
        let response = self.client.delete(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        check(response)?;
        Ok(())
    }

    async fn save(&self, records: &[Student]) -> StoreResult<()> {
        tracing::debug!(url = %self.base_url, count = records.len(), "PUT collection");
        let response = self.client.put(&self.base_url).json(records).send().await?;
        check(response)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_are_normalized() {
        let store = RemoteStore::new("http://localhost:3000/students/");
        assert_eq!(store.base_url(), "http://localhost:3000/students");
        assert_eq!(
            store.record_url("s_1").unwrap().as_str(),
            "http://localhost:3000/students/s_1"
        );
    }

    #[test]
    fn record_ids_are_one_path_segment() {
        let store = RemoteStore::new("http://localhost:3000/students");
        assert_eq!(
            store.record_url("a/b?c#d").unwrap().as_str(),
            "http://localhost:3000/students/a%2Fb%3Fc%23d"
        );
    }

    #[test]
    fn bad_base_url_is_reported() {
        let store = RemoteStore::new("not a url");
        assert!(matches!(
            store.record_url("s_1"),
            Err(StoreError::InvalidUrl(_))
        ));
    }
}
