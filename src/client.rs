//! HTTP client for the schoolhub API

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use crate::auth::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, UserInfo};
use crate::error::{Error, ErrorBody, Result};

/// Shown when the server could not be reached or answered with garbage
pub const GENERIC_FAILURE: &str = "Request failed. Please try again.";

pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, http: Client) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn register(&self, req: &RegisterRequest) -> Result<RegisterResponse> {
        let response = self
            .http
            .post(self.url("/auth/register"))
            .json(req)
            .send()
            .await?;
        parse(response).await
    }

    pub async fn login(&self, req: &LoginRequest) -> Result<LoginResponse> {
        let response = self
            .http
            .post(self.url("/auth/login"))
            .json(req)
            .send()
            .await?;
        parse(response).await
    }

    pub async fn users(&self, token: &str) -> Result<Vec<UserInfo>> {
        let response = self
            .http
            .get(self.url("/auth/users"))
            .bearer_auth(token)
            .send()
            .await?;
        parse(response).await
    }
}

async fn parse<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => GENERIC_FAILURE.to_string(),
    };
    Err(Error::Api {
        status: status.as_u16(),
        message,
    })
}

/// Message to show the user for a failed request: the server's own error
/// text when there is one, otherwise a generic retry hint
pub fn user_message(err: &Error) -> String {
    match err {
        Error::Api { message, .. } => message.clone(),
        Error::Http(_) => GENERIC_FAILURE.to_string(),
        other => other.to_string(),
    }
}
