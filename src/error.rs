//! Error types for Schoolhub

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Email already exists")]
    EmailTaken,

    #[error("User not found")]
    UserNotFound,

    #[error("Invalid Credentials")]
    InvalidCredentials,

    #[error("Token missing")]
    MissingToken,

    /// The inner string is the verifier's reason and is only logged.
    #[error("Invalid or expired token")]
    InvalidToken(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    #[error("Failed to sign token: {0}")]
    TokenSigning(#[from] jsonwebtoken::errors::Error),

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Error reported by a schoolhub server to the API client.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// HTTP status this error is reported with
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::EmailTaken => StatusCode::CONFLICT,
            Error::UserNotFound => StatusCode::NOT_FOUND,
            Error::InvalidCredentials | Error::MissingToken => StatusCode::UNAUTHORIZED,
            Error::InvalidToken(_) => StatusCode::FORBIDDEN,
            Error::BadRequest(_) => StatusCode::BAD_REQUEST,
            Error::Api { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON body of every error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::BadRequest(rejection.body_text())
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_errors_map_to_statuses() {
        assert_eq!(Error::EmailTaken.status_code(), StatusCode::CONFLICT);
        assert_eq!(Error::UserNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            Error::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(Error::MissingToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            Error::InvalidToken("ExpiredSignature".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            Error::Other("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_invalid_token_hides_reason() {
        let err = Error::InvalidToken("InvalidSignature".into());
        assert_eq!(err.to_string(), "Invalid or expired token");
    }
}
