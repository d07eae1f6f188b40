// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account and session routes.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::Result;
use crate::models::UserResponse;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/login/token", post(login_with_refresh_token))
        .route("/auth/logout", post(logout))
        .route("/auth/user/{email}", get(find_user))
}

// ─── Registration ────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub email: String,
    pub name: String,
}

async fn register(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>)> {
    let Json(request) = payload?;
    request.validate()?;

    let user = state
        .auth
        .register(&request.name, &request.email, &request.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            email: user.email,
            name: user.name,
        }),
    ))
}

// ─── Password Login ──────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
    #[serde(default)]
    #[validate(length(max = 200))]
    pub device_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub refresh_token: String,
}

async fn login(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>> {
    let Json(request) = payload?;
    request.validate()?;

    let session = state
        .auth
        .login(&request.email, &request.password, request.device_id)
        .await?;

    Ok(Json(LoginResponse {
        token: session.access_token,
        refresh_token: session.refresh_token.token,
    }))
}

// ─── Refresh Login ───────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
pub struct RefreshLoginRequest {
    #[validate(length(min = 1))]
    pub refresh_token: String,
    /// Required when refresh tokens are scoped to their owner.
    #[serde(default)]
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshLoginResponse {
    pub refresh_token: String,
    pub jwt_token: String,
    pub user_email: String,
    pub user_id: Uuid,
}

async fn login_with_refresh_token(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<RefreshLoginRequest>, JsonRejection>,
) -> Result<Json<RefreshLoginResponse>> {
    let Json(request) = payload?;
    request.validate()?;

    let session = state
        .auth
        .refresh_login(&request.refresh_token, request.user_id)
        .await?;

    Ok(Json(RefreshLoginResponse {
        refresh_token: session.refresh_token.token,
        jwt_token: session.access_token,
        user_email: session.user.email,
        user_id: session.user.id,
    }))
}

// ─── Logout ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
pub struct LogoutRequest {
    #[validate(length(min = 1))]
    pub refresh_token: String,
}

async fn logout(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<LogoutRequest>, JsonRejection>,
) -> Result<StatusCode> {
    let Json(request) = payload?;
    request.validate()?;

    state.auth.logout(&request.refresh_token).await?;

    Ok(StatusCode::NO_CONTENT)
}

// ─── User Lookup ─────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct FindUserResponse {
    pub user: UserResponse,
}

/// Look up a user by email.
///
/// Answers `302 Found` with the projection in the body; clients depend on
/// that status.
async fn find_user(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<(StatusCode, Json<FindUserResponse>)> {
    let user = state.auth.find_user_by_email(&email).await?;

    Ok((StatusCode::FOUND, Json(FindUserResponse { user })))
}
