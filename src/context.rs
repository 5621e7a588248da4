//! Explicitly owned state container handed to the presentation layer.

use std::time::Duration;

use crate::auth::Session;
use crate::error::AdminResult;
use crate::store::{EntityStore, InMemoryBackend, PermissionStore, RoleStore, UserStore, seed};

#[derive(Clone)]
pub struct AdminContext {
    pub users: UserStore,
    pub roles: RoleStore,
    pub permissions: PermissionStore,
    pub session: Session,
}

impl AdminContext {
    /// Stores backed by in-memory backends holding the canonical catalogue.
    pub fn seeded(latency: Duration) -> Self {
        Self {
            users: EntityStore::new(InMemoryBackend::new(seed::users(), latency)),
            roles: EntityStore::new(InMemoryBackend::new(seed::roles(), latency)),
            permissions: EntityStore::new(InMemoryBackend::new(seed::permissions(), latency)),
            session: Session::new(latency),
        }
    }

    pub async fn fetch_all(&self) -> AdminResult<()> {
        tokio::try_join!(self.users.fetch(), self.roles.fetch(), self.permissions.fetch())?;
        Ok(())
    }
}
