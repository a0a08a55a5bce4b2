//! API route handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;

use super::server::SharedState;
use crate::auth::{AuthUser, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, UserInfo};
use crate::error::Result;

// Health check

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

// Auth routes

pub async fn register(
    State(state): State<SharedState>,
    payload: std::result::Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>)> {
    let Json(req) = payload?;
    let created = state.auth.register(req).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn login(
    State(state): State<SharedState>,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>> {
    let Json(req) = payload?;
    let response = state.auth.login(req).await?;
    Ok(Json(response))
}

pub async fn list_users(
    State(state): State<SharedState>,
    AuthUser(claims): AuthUser,
) -> Result<Json<Vec<UserInfo>>> {
    tracing::debug!(user_id = claims.id, "Listing users");
    let users = state.auth.list_users().await?;
    Ok(Json(users))
}
