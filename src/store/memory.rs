//! In-memory user store

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::UserStore;
use crate::auth::models::{NewUser, User};
use crate::error::{Error, Result};

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    next_id: i64,
}

/// Process-local store; check and insert happen under one write lock
#[derive(Default)]
pub struct MemoryUserStore {
    inner: RwLock<Inner>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub async fn len(&self) -> usize {
        self.inner.read().await.users.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.email == email).cloned())
    }

    async fn create(&self, new_user: NewUser) -> Result<User> {
        let mut inner = self.inner.write().await;
        if inner.users.iter().any(|u| u.email == new_user.email) {
            return Err(Error::EmailTaken);
        }

        inner.next_id += 1;
        let user = User {
            id: inner.next_id,
            name: new_user.name,
            email: new_user.email,
            password_hash: new_user.password_hash,
            created_at: chrono::Utc::now(),
        };
        inner.users.push(user.clone());
        Ok(user)
    }

    async fn list(&self) -> Result<Vec<User>> {
        Ok(self.inner.read().await.users.clone())
    }
}
