//! Password hashing

use crate::error::{Error, Result};

/// Lowest work factor bcrypt accepts
pub const MIN_BCRYPT_COST: u32 = 4;

/// Highest work factor bcrypt accepts
pub const MAX_BCRYPT_COST: u32 = 31;

/// bcrypt hasher with a fixed work factor
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a password with a fresh salt
    pub async fn hash(&self, plaintext: &str) -> Result<String> {
        let plaintext = plaintext.to_owned();
        let cost = self.cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(plaintext, cost))
            .await
            .map_err(|e| Error::Other(format!("Password hashing task failed: {}", e)))?
            .map_err(Error::from)
    }

    /// Check a password against a stored hash.
    ///
    /// A mismatch is `Ok(false)`; a hash that cannot be parsed is an error.
    pub async fn verify(&self, plaintext: &str, hash: &str) -> Result<bool> {
        let plaintext = plaintext.to_owned();
        let hash = hash.to_owned();
        tokio::task::spawn_blocking(move || bcrypt::verify(plaintext, &hash))
            .await
            .map_err(|e| Error::Other(format!("Password verification task failed: {}", e)))?
            .map_err(Error::from)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(10)
    }
}
