//! Credential store
//!
//! Users are owned by a [`UserStore`]. Email uniqueness is enforced by the
//! store itself; callers may look up first but must treat
//! [`Error::EmailTaken`](crate::error::Error::EmailTaken) from `create` as
//! authoritative.

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;

use crate::auth::models::{NewUser, User};
use crate::config::{DatabaseConfig, StoreBackend};
use crate::error::{Error, Result};

pub use memory::MemoryUserStore;
pub use postgres::PgUserStore;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Exact-match lookup
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Insert a user, failing with `Error::EmailTaken` on a duplicate email
    async fn create(&self, new_user: NewUser) -> Result<User>;

    /// All users ordered by id
    async fn list(&self) -> Result<Vec<User>>;
}

/// Open the store selected in the configuration
pub async fn connect(config: &DatabaseConfig) -> Result<Arc<dyn UserStore>> {
    match config.backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory user store; accounts are lost on restart");
            Ok(Arc::new(MemoryUserStore::new()))
        }
        StoreBackend::Postgres => {
            let url = config.url.as_deref().ok_or_else(|| {
                Error::Config("database.url is required for the postgres backend".to_string())
            })?;
            let store = PgUserStore::connect(url).await?;
            store.migrate().await?;
            Ok(Arc::new(store))
        }
    }
}
