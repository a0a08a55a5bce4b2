//! Client-side session management
//!
//! The client keeps the token issued at login under a single storage key and
//! rebuilds its session from the token payload on every load. The payload is
//! decoded without checking the signature: this drives what the client shows
//! and when it asks the user to sign in, and is never an authorization check.
//! The server re-verifies every token it receives.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::auth::clock::{Clock, SystemClock};
use crate::error::{Error, Result};

/// Storage key holding the current token
pub const TOKEN_KEY: &str = "token";

/// Where the client is sent when no session is present
pub const SIGN_IN_ROUTE: &str = "/";

/// Durable single-value token storage
pub trait TokenStorage {
    fn get(&self) -> Result<Option<String>>;
    fn set(&self, token: &str) -> Result<()>;
    fn remove(&self) -> Result<()>;
}

/// Token kept in a file, used by the command-line client
#[derive(Debug, Clone)]
pub struct FileTokenStorage {
    path: PathBuf,
}

impl FileTokenStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStorage for FileTokenStorage {
    fn get(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => {
                let token = content.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::Io(e)),
        }
    }

    fn set(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, token)?;
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Io(e)),
        }
    }
}

/// Token kept in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStorage {
    value: Arc<Mutex<Option<String>>>,
}

impl MemoryTokenStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            value: Arc::new(Mutex::new(Some(token.into()))),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        // A poisoned lock still holds a usable value
        self.value.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl TokenStorage for MemoryTokenStorage {
    fn get(&self) -> Result<Option<String>> {
        Ok(self.slot().clone())
    }

    fn set(&self, token: &str) -> Result<()> {
        *self.slot() = Some(token.to_string());
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        *self.slot() = None;
        Ok(())
    }
}

/// Payload fields the client reads from a token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub iat: Option<i64>,
    #[serde(default)]
    pub exp: Option<i64>,
}

/// Decode a token payload without verifying it.
///
/// Returns `None` for anything malformed or for a payload whose `exp` lies
/// in the past. A payload without `exp` is accepted.
pub fn decode_token(token: &str, now: i64) -> Option<SessionClaims> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: SessionClaims = serde_json::from_slice(&bytes).ok()?;

    match claims.exp {
        Some(exp) if exp < now => None,
        _ => Some(claims),
    }
}

/// Session lifecycle as seen by the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Storage has not been read yet
    Loading,
    Anonymous,
    Authenticated(SessionClaims),
}

/// What a protected view should do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Still loading; show a placeholder rather than redirecting
    Wait,
    Redirect(&'static str),
    Render(SessionClaims),
}

/// Client session backed by a [`TokenStorage`]
pub struct ClientSession<S: TokenStorage> {
    storage: S,
    clock: Arc<dyn Clock>,
    state: SessionState,
}

impl<S: TokenStorage> ClientSession<S> {
    pub fn new(storage: S) -> Self {
        Self::with_clock(storage, Arc::new(SystemClock))
    }

    pub fn with_clock(storage: S, clock: Arc<dyn Clock>) -> Self {
        Self {
            storage,
            clock,
            state: SessionState::Loading,
        }
    }

    /// Read the stored token and derive the session.
    ///
    /// An expired or malformed token is removed from storage.
    pub fn load(&mut self) -> Result<()> {
        self.state = match self.storage.get()? {
            Some(token) => match decode_token(&token, self.clock.now()) {
                Some(claims) => SessionState::Authenticated(claims),
                None => {
                    tracing::debug!("Discarding expired or malformed stored token");
                    self.storage.remove()?;
                    SessionState::Anonymous
                }
            },
            None => SessionState::Anonymous,
        };
        Ok(())
    }

    /// Persist a freshly issued token and decode it
    pub fn login(&mut self, token: &str) -> Result<()> {
        self.storage.set(token)?;
        self.state = match decode_token(token, self.clock.now()) {
            Some(claims) => SessionState::Authenticated(claims),
            None => SessionState::Anonymous,
        };
        Ok(())
    }

    pub fn logout(&mut self) -> Result<()> {
        self.storage.remove()?;
        self.state = SessionState::Anonymous;
        Ok(())
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == SessionState::Loading
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, SessionState::Authenticated(_))
    }

    pub fn claims(&self) -> Option<&SessionClaims> {
        match &self.state {
            SessionState::Authenticated(claims) => Some(claims),
            _ => None,
        }
    }

    /// Raw stored token, for attaching to requests
    pub fn token(&self) -> Result<Option<String>> {
        if !self.is_authenticated() {
            return Ok(None);
        }
        self.storage.get()
    }

    /// Gate a protected view
    pub fn guard(&self) -> RouteDecision {
        match &self.state {
            SessionState::Loading => RouteDecision::Wait,
            SessionState::Anonymous => RouteDecision::Redirect(SIGN_IN_ROUTE),
            SessionState::Authenticated(claims) => RouteDecision::Render(claims.clone()),
        }
    }
}
