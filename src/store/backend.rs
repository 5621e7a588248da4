//! Transport seam between entity stores and wherever records live.
//!
//! [`Backend`] is the integration point for a real REST or RPC client: its
//! four calls map 1:1 onto list/create/update/delete endpoints returning the
//! entity shapes from [`crate::model`]. [`InMemoryBackend`] keeps records in
//! process and sleeps for a fixed latency before answering.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::debug;

use crate::error::{AdminError, AdminResult};
use crate::model::{Record, new_id};

pub trait Backend<R: Record>: Send + Sync + 'static {
    fn list(&self) -> impl Future<Output = AdminResult<Vec<R>>> + Send;
    /// Persist a draft under a freshly assigned identity.
    fn create(&self, draft: R::Draft) -> impl Future<Output = AdminResult<R>> + Send;
    /// Merge `patch` into the record and return the merged result.
    fn update(&self, id: &str, patch: R::Patch) -> impl Future<Output = AdminResult<R>> + Send;
    fn delete(&self, id: &str) -> impl Future<Output = AdminResult<()>> + Send;
}

/// Process-local backend with a fixed artificial latency.
pub struct InMemoryBackend<R> {
    records: Arc<Mutex<Vec<R>>>,
    latency: Duration,
}

impl<R> Clone for InMemoryBackend<R> {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
            latency: self.latency,
        }
    }
}

impl<R: Record> InMemoryBackend<R> {
    pub fn new(seed: Vec<R>, latency: Duration) -> Self {
        Self {
            records: Arc::new(Mutex::new(seed)),
            latency,
        }
    }

    /// Number of records currently held, without waiting out the latency.
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    async fn settle(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn conflict(name: &str) -> AdminError {
        AdminError::Conflict {
            entity: R::KIND,
            name: name.to_string(),
        }
    }

    fn not_found(id: &str) -> AdminError {
        AdminError::NotFound {
            entity: R::KIND,
            id: id.to_string(),
        }
    }
}

// names compare trimmed and case-insensitive
fn name_taken<R: Record>(records: &[R], name: &str, except_id: Option<&str>) -> bool {
    let wanted = name.trim().to_lowercase();
    records
        .iter()
        .filter(|r| Some(r.id()) != except_id)
        .any(|r| r.name().trim().to_lowercase() == wanted)
}

impl<R: Record> Backend<R> for InMemoryBackend<R> {
    async fn list(&self) -> AdminResult<Vec<R>> {
        self.settle().await;
        let records = self.records.lock().clone();
        debug!(kind = R::KIND, count = records.len(), "listed records");
        Ok(records)
    }

    async fn create(&self, draft: R::Draft) -> AdminResult<R> {
        self.settle().await;
        let mut records = self.records.lock();
        let name = R::draft_name(&draft);
        if name_taken(&records, name, None) {
            return Err(Self::conflict(name));
        }
        let record = R::from_draft(new_id(), draft);
        debug!(kind = R::KIND, id = record.id(), "created record");
        records.push(record.clone());
        Ok(record)
    }

    async fn update(&self, id: &str, patch: R::Patch) -> AdminResult<R> {
        self.settle().await;
        let mut records = self.records.lock();
        let idx = records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| Self::not_found(id))?;
        if let Some(name) = R::patch_name(&patch)
            && name_taken(&records, name, Some(id))
        {
            return Err(Self::conflict(name));
        }
        let record = &mut records[idx];
        record.apply_patch(patch);
        debug!(kind = R::KIND, id, "updated record");
        Ok(record.clone())
    }

    async fn delete(&self, id: &str) -> AdminResult<()> {
        self.settle().await;
        let mut records = self.records.lock();
        let before = records.len();
        records.retain(|r| r.id() != id);
        if records.len() == before {
            return Err(Self::not_found(id));
        }
        debug!(kind = R::KIND, id, "deleted record");
        Ok(())
    }
}
