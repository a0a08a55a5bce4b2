//! Authentication middleware and extractors

use std::sync::Arc;

use crate::auth::{Claims, TokenIssuer};
use crate::error::{Error, Result};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

/// Pull the token out of an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .filter(|token| !token.is_empty() && !token.starts_with(' '))
}

/// Verify the request's bearer token
pub fn extract_claims(tokens: &TokenIssuer, headers: &HeaderMap) -> Result<Claims> {
    let token = bearer_token(headers).ok_or(Error::MissingToken)?;
    tokens.verify(token)
}

/// Middleware for requiring authentication.
///
/// Trusts the signature alone; no store lookup. On success the claims are
/// available to handlers through [`AuthUser`].
pub async fn require_auth(
    State(tokens): State<Arc<TokenIssuer>>,
    mut req: Request,
    next: Next,
) -> std::result::Result<Response, Error> {
    let claims = match extract_claims(&tokens, req.headers()) {
        Ok(claims) => claims,
        Err(e) => {
            if let Error::InvalidToken(reason) = &e {
                tracing::debug!("Rejected bearer token: {}", reason);
            }
            return Err(e);
        }
    };

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Claims of the authenticated caller, set by [`require_auth`]
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or(Error::MissingToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(&headers("Bearer abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(bearer_token(&headers("Bearer ")), None);
        assert_eq!(bearer_token(&headers("Bearer  abc.def.ghi")), None);
        assert_eq!(bearer_token(&headers("Basic dXNlcjpwdw==")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_extract_claims_no_token() {
        let tokens = TokenIssuer::new(b"secret", 60);
        let result = extract_claims(&tokens, &HeaderMap::new());
        assert!(matches!(result, Err(Error::MissingToken)));
    }

    #[test]
    fn test_extract_claims_bad_token() {
        let tokens = TokenIssuer::new(b"secret", 60);
        let result = extract_claims(&tokens, &headers("Bearer not-a-jwt"));
        assert!(matches!(result, Err(Error::InvalidToken(_))));
    }

    #[test]
    fn test_extract_claims_valid() {
        let tokens = TokenIssuer::new(b"secret", 60);
        let token = tokens.issue_for(4, "d@example.com").unwrap();
        let claims = extract_claims(&tokens, &headers(&format!("Bearer {}", token))).unwrap();
        assert_eq!(claims.id, 4);
    }
}
