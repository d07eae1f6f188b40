// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User stats routes.

use axum::{extract::State, routing::get, Extension, Json, Router};
use std::sync::Arc;

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::UserStats;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/userstats/find", get(find_stats))
}

/// Get the caller's stats. A user without meals gets a zero record.
async fn find_stats(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserStats>> {
    let stats = state
        .db
        .get_user_stats(user.user_id)
        .await?
        .unwrap_or_else(|| UserStats::empty(user.user_id));

    Ok(Json(stats))
}
