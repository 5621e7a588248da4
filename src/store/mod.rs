//! Entity stores: the exclusive owners of the user, role and permission
//! collections.
//!
//! Each store is a cheap, cloneable handle. Mutators on the same store are
//! queued and run one at a time in call order; the loading flag stays set
//! while any operation is pending, so a second call can never clear it early.
//! Failed operations leave the collection at its last known good state and
//! record the error for rendering.

pub mod backend;
pub mod seed;

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::{AdminError, AdminResult};
use crate::model::{Permission, Record, Role, User};

pub use backend::{Backend, InMemoryBackend};

pub type UserStore = EntityStore<User>;
pub type RoleStore = EntityStore<Role>;
pub type PermissionStore = EntityStore<Permission>;

/// Read-only view of a store, as consumed by the presentation layer.
#[derive(Clone, Debug)]
pub struct StoreSnapshot<R> {
    pub items: Vec<R>,
    pub is_loading: bool,
    pub last_error: Option<AdminError>,
    /// Bumped on every committed collection change.
    pub version: u64,
}

struct StoreState<R> {
    items: Vec<R>,
    pending: usize,
    last_error: Option<AdminError>,
    version: u64,
}

pub struct EntityStore<R: Record, B = InMemoryBackend<R>> {
    backend: Arc<B>,
    state: Arc<RwLock<StoreState<R>>>,
    queue: Arc<Mutex<()>>,
}

impl<R: Record, B> Clone for EntityStore<R, B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            state: Arc::clone(&self.state),
            queue: Arc::clone(&self.queue),
        }
    }
}

/// Keeps the pending counter honest even if the operation future is dropped.
struct Pending<R> {
    state: Arc<RwLock<StoreState<R>>>,
}

impl<R> Drop for Pending<R> {
    fn drop(&mut self) {
        let mut st = self.state.write();
        st.pending = st.pending.saturating_sub(1);
    }
}

impl<R: Record, B: Backend<R>> EntityStore<R, B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend: Arc::new(backend),
            state: Arc::new(RwLock::new(StoreState {
                items: Vec::new(),
                pending: 0,
                last_error: None,
                version: 0,
            })),
            queue: Arc::new(Mutex::new(())),
        }
    }

    pub fn snapshot(&self) -> StoreSnapshot<R> {
        let st = self.state.read();
        StoreSnapshot {
            items: st.items.clone(),
            is_loading: st.pending > 0,
            last_error: st.last_error.clone(),
            version: st.version,
        }
    }

    pub fn items(&self) -> Vec<R> {
        self.state.read().items.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.read().pending > 0
    }

    pub fn version(&self) -> u64 {
        self.state.read().version
    }

    pub fn last_error(&self) -> Option<AdminError> {
        self.state.read().last_error.clone()
    }

    pub fn get(&self, id: &str) -> Option<R> {
        self.state.read().items.iter().find(|r| r.id() == id).cloned()
    }

    /// Replace the whole collection with the backend's current contents.
    pub async fn fetch(&self) -> AdminResult<()> {
        let _pending = self.begin();
        let _turn = self.queue.lock().await;
        match self.backend.list().await {
            Ok(items) => {
                debug!(kind = R::KIND, count = items.len(), "fetched");
                self.commit(|current| *current = items);
                Ok(())
            }
            Err(err) => Err(self.fail("fetch", err)),
        }
    }

    /// Create a record and append it; returns the record with its new id.
    pub async fn add(&self, draft: R::Draft) -> AdminResult<R> {
        let _pending = self.begin();
        let _turn = self.queue.lock().await;
        match self.backend.create(draft).await {
            Ok(record) => {
                debug!(kind = R::KIND, id = record.id(), "added");
                let appended = record.clone();
                self.commit(move |current| current.push(appended));
                Ok(record)
            }
            Err(err) => Err(self.fail("add", err)),
        }
    }

    /// Shallow-merge `patch` into the record with `id`.
    ///
    /// Returns `Ok(false)` without touching the collection when no such
    /// record exists.
    pub async fn update(&self, id: &str, patch: R::Patch) -> AdminResult<bool> {
        let _pending = self.begin();
        let _turn = self.queue.lock().await;
        match self.backend.update(id, patch).await {
            Ok(record) => {
                debug!(kind = R::KIND, id, "updated");
                self.commit(|current| {
                    if let Some(slot) = current.iter_mut().find(|r| r.id() == id) {
                        *slot = record;
                    }
                });
                Ok(true)
            }
            Err(AdminError::NotFound { .. }) => {
                warn!(kind = R::KIND, id, "update skipped, no such record");
                Ok(false)
            }
            Err(err) => Err(self.fail("update", err)),
        }
    }

    /// Remove the record with `id`. Embedded copies held by other entities
    /// are left as they are.
    pub async fn delete(&self, id: &str) -> AdminResult<bool> {
        let _pending = self.begin();
        let _turn = self.queue.lock().await;
        match self.backend.delete(id).await {
            Ok(()) => {
                debug!(kind = R::KIND, id, "deleted");
                self.commit(|current| current.retain(|r| r.id() != id));
                Ok(true)
            }
            Err(AdminError::NotFound { .. }) => {
                warn!(kind = R::KIND, id, "delete skipped, no such record");
                Ok(false)
            }
            Err(err) => Err(self.fail("delete", err)),
        }
    }

    fn begin(&self) -> Pending<R> {
        self.state.write().pending += 1;
        Pending {
            state: Arc::clone(&self.state),
        }
    }

    fn commit(&self, change: impl FnOnce(&mut Vec<R>)) {
        let mut st = self.state.write();
        change(&mut st.items);
        st.version += 1;
        st.last_error = None;
    }

    fn fail(&self, op: &'static str, err: AdminError) -> AdminError {
        warn!(kind = R::KIND, op, error = %err, "store operation failed");
        self.state.write().last_error = Some(err.clone());
        err
    }
}
