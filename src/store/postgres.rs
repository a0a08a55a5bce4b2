//! PostgreSQL user store

use std::sync::Arc;

use async_trait::async_trait;
use tokio_postgres::error::SqlState;
use tokio_postgres::{Client, NoTls, Row};

use super::UserStore;
use crate::auth::models::{NewUser, User};
use crate::error::{Error, Result};

const CREATE_USERS_TABLE: &str = "CREATE TABLE IF NOT EXISTS users (
    id BIGSERIAL PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
)";

/// Store backed by a `users` table with a UNIQUE email constraint
#[derive(Clone)]
pub struct PgUserStore {
    client: Arc<Client>,
}

impl PgUserStore {
    /// Connect using a tokio-postgres connection string
    pub async fn connect(url: &str) -> Result<Self> {
        let (client, connection) = tokio_postgres::connect(url, NoTls)
            .await
            .map_err(Error::Database)?;

        // Spawn the connection handler
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!("PostgreSQL connection error: {}", e);
            }
        });

        Ok(Self {
            client: Arc::new(client),
        })
    }

    /// Create the users table if it does not exist
    pub async fn migrate(&self) -> Result<()> {
        self.client.batch_execute(CREATE_USERS_TABLE).await?;
        tracing::debug!("users table ready");
        Ok(())
    }
}

fn user_from_row(row: &Row) -> Result<User> {
    Ok(User {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = self
            .client
            .query_opt(
                "SELECT id, name, email, password, created_at FROM users WHERE email = $1",
                &[&email],
            )
            .await?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn create(&self, new_user: NewUser) -> Result<User> {
        let result = self
            .client
            .query_one(
                "INSERT INTO users (name, email, password) VALUES ($1, $2, $3) \
                 RETURNING id, name, email, password, created_at",
                &[&new_user.name, &new_user.email, &new_user.password_hash],
            )
            .await;

        match result {
            Ok(row) => user_from_row(&row),
            Err(e) if e.code() == Some(&SqlState::UNIQUE_VIOLATION) => Err(Error::EmailTaken),
            Err(e) => Err(Error::Database(e)),
        }
    }

    async fn list(&self) -> Result<Vec<User>> {
        let rows = self
            .client
            .query(
                "SELECT id, name, email, password, created_at FROM users ORDER BY id",
                &[],
            )
            .await?;
        rows.iter().map(user_from_row).collect()
    }
}
