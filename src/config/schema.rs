//! Configuration schema definitions

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::auth::jwt::MAX_TOKEN_TTL_SECS;
use crate::auth::password::{MAX_BCRYPT_COST, MIN_BCRYPT_COST};
use crate::error::{Error, Result};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub database: DatabaseConfig,
}

impl Config {
    /// Check settings that have no safe default
    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.trim().is_empty() {
            return Err(Error::Config(
                "auth.jwt_secret is empty; set JWT_SECRET or edit schoolhub.toml".to_string(),
            ));
        }

        if !(1..=MAX_TOKEN_TTL_SECS).contains(&self.auth.token_ttl_secs) {
            return Err(Error::Config(format!(
                "auth.token_ttl_secs must be between 1 and {}, got {}",
                MAX_TOKEN_TTL_SECS, self.auth.token_ttl_secs
            )));
        }

        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&self.auth.bcrypt_cost) {
            return Err(Error::Config(format!(
                "auth.bcrypt_cost must be between {} and {}, got {}",
                MIN_BCRYPT_COST,
                MAX_BCRYPT_COST,
                self.auth.bcrypt_cost
            )));
        }

        if self.database.backend == StoreBackend::Postgres && self.database.url.is_none() {
            return Err(Error::Config(
                "database.url is required for the postgres backend".to_string(),
            ));
        }

        Ok(())
    }
}

/// Server configuration for the HTTP API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Token signing and password hashing settings
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Symmetric signing secret. Has no default.
    #[serde(default)]
    pub jwt_secret: String,

    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: i64,

    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

fn default_token_ttl_secs() -> i64 {
    24 * 60 * 60
}

fn default_bcrypt_cost() -> u32 {
    10
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_ttl_secs: default_token_ttl_secs(),
            bcrypt_cost: default_bcrypt_cost(),
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}

/// Where user records live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Process-local store, lost on restart
    #[default]
    Memory,
    Postgres,
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreBackend::Memory => write!(f, "memory"),
            StoreBackend::Postgres => write!(f, "postgres"),
        }
    }
}

/// Credential store configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub backend: StoreBackend,

    /// tokio-postgres connection string, e.g.
    /// `host=localhost user=postgres password=postgres dbname=schoolhub`
    #[serde(default)]
    pub url: Option<String>,
}
