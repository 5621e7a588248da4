//! Simulated sign-in gate.
//!
//! There is no authentication protocol behind this: after the configured
//! latency every login succeeds as a fixed administrator account.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tracing::info;

use crate::model::{Role, User, UserStatus};

#[derive(Clone)]
pub struct Session {
    user: Arc<RwLock<Option<User>>>,
    latency: Duration,
}

impl Session {
    pub fn new(latency: Duration) -> Self {
        Self {
            user: Arc::new(RwLock::new(None)),
            latency,
        }
    }

    pub async fn login(&self, email: &str, _password: &str) -> User {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let user = User {
            id: "1".into(),
            name: "Admin User".into(),
            email: email.to_string(),
            status: UserStatus::Active,
            roles: vec![Role {
                id: "1".into(),
                name: "Admin".into(),
                description: "Administrator".into(),
                permissions: vec![],
            }],
        };
        info!(email, "signed in");
        *self.user.write() = Some(user.clone());
        user
    }

    pub fn logout(&self) {
        if let Some(user) = self.user.write().take() {
            info!(email = %user.email, "signed out");
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.read().is_some()
    }

    pub fn current_user(&self) -> Option<User> {
        self.user.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn login_then_logout() {
        let session = Session::new(Duration::ZERO);
        assert!(!session.is_authenticated());
        let user = session.login("root@example.com", "hunter2").await;
        assert_eq!(user.email, "root@example.com");
        assert_eq!(session.current_user().map(|u| u.name), Some("Admin User".to_string()));
        session.logout();
        assert!(session.current_user().is_none());
    }
}
