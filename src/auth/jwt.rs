//! JWT token handling

use std::sync::Arc;

use crate::auth::clock::{Clock, SystemClock};
use crate::auth::models::User;
use crate::config::AuthConfig;
use crate::error::{Error, Result};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Longest token lifetime accepted from configuration (one year)
pub const MAX_TOKEN_TTL_SECS: i64 = 365 * 24 * 60 * 60;

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// User ID
    pub id: i64,
    pub email: String,
    /// Issued at
    pub iat: i64,
    /// Expiration time
    pub exp: i64,
}

impl Claims {
    /// Check if the claims are expired at `now`; a token is dead from `exp` on
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.exp <= now
    }
}

/// Signs and verifies bearer tokens with a shared secret
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
    clock: Arc<dyn Clock>,
}

impl TokenIssuer {
    pub fn new(secret: &[u8], ttl_secs: i64) -> Self {
        Self::with_clock(secret, ttl_secs, Arc::new(SystemClock))
    }

    pub fn with_clock(secret: &[u8], ttl_secs: i64, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the injected clock in `verify`
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl_secs,
            clock,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.jwt_secret.as_bytes(), config.token_ttl_secs)
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    /// Create a token for `user`, valid for the configured ttl
    pub fn issue(&self, user: &User) -> Result<String> {
        self.issue_for(user.id, &user.email)
    }

    pub fn issue_for(&self, id: i64, email: &str) -> Result<String> {
        let now = self.clock.now();
        let exp = now.checked_add(self.ttl_secs).ok_or_else(|| {
            Error::Config(format!("token ttl of {}s overflows the expiry time", self.ttl_secs))
        })?;
        let claims = Claims {
            id,
            email: email.to_string(),
            iat: now,
            exp,
        };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?)
    }

    /// Validate signature and expiry and return the claims
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| Error::InvalidToken(e.to_string()))?;

        if claims.is_expired_at(self.clock.now()) {
            return Err(Error::InvalidToken("token expired".to_string()));
        }

        Ok(claims)
    }
}
