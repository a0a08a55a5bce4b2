//! Registration, login and user listing

use std::sync::Arc;

use crate::auth::jwt::TokenIssuer;
use crate::auth::models::{
    LoginRequest, LoginResponse, NewUser, RegisterRequest, RegisterResponse, UserInfo,
};
use crate::auth::password::PasswordHasher;
use crate::error::{Error, Result};
use crate::store::UserStore;

/// Orchestrates the credential store, password hasher and token issuer
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    tokens: Arc<TokenIssuer>,
}

impl AuthService {
    pub fn new(store: Arc<dyn UserStore>, hasher: PasswordHasher, tokens: Arc<TokenIssuer>) -> Self {
        Self {
            store,
            hasher,
            tokens,
        }
    }

    pub fn tokens(&self) -> &Arc<TokenIssuer> {
        &self.tokens
    }

    /// Register a new account
    pub async fn register(&self, req: RegisterRequest) -> Result<RegisterResponse> {
        if self.store.find_by_email(&req.email).await?.is_some() {
            tracing::info!(email = %req.email, "Registration rejected: email already exists");
            return Err(Error::EmailTaken);
        }

        let password_hash = self.hasher.hash(&req.password).await?;
        let user = self
            .store
            .create(NewUser {
                name: req.name,
                email: req.email,
                password_hash,
            })
            .await?;

        tracing::info!(user_id = user.id, email = %user.email, "Registered user");
        Ok(UserInfo::from(user))
    }

    /// Check credentials and issue a token
    pub async fn login(&self, req: LoginRequest) -> Result<LoginResponse> {
        let user = match self.store.find_by_email(&req.email).await? {
            Some(user) => user,
            None => {
                tracing::info!(email = %req.email, "Login failed: unknown email");
                return Err(Error::UserNotFound);
            }
        };

        if !self.hasher.verify(&req.password, &user.password_hash).await? {
            tracing::warn!(user_id = user.id, "Login failed: wrong password");
            return Err(Error::InvalidCredentials);
        }

        let token = self.tokens.issue(&user)?;
        tracing::info!(user_id = user.id, "User logged in");

        Ok(LoginResponse {
            token,
            user: UserInfo::from(user),
        })
    }

    /// All users, without password hashes
    pub async fn list_users(&self) -> Result<Vec<UserInfo>> {
        let users = self.store.list().await?;
        Ok(users.into_iter().map(UserInfo::from).collect())
    }
}
