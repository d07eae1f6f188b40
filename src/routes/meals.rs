// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Meal routes for authenticated users.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{delete, get, patch, post},
    Extension, Json, Router,
};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::{CreateMealRequest, Meal, MealPatch};
use crate::AppState;

/// Meal routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/meals/new", post(create_meal))
        .route("/meals/list", get(list_meals))
        .route("/meals/edit/{meal_id}", patch(edit_meal))
        .route("/meals/delete/{meal_id}", delete(delete_meal))
        .route("/meals/{meal_id}", get(get_meal))
}

async fn create_meal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    payload: std::result::Result<Json<CreateMealRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Meal>)> {
    let Json(request) = payload?;
    request.validate()?;

    let meal = request.into_meal(user.user_id, Utc::now());
    state.db.create_meal_atomic(&meal).await?;

    Ok((StatusCode::CREATED, Json(meal)))
}

async fn edit_meal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(meal_id): Path<Uuid>,
    payload: std::result::Result<Json<MealPatch>, JsonRejection>,
) -> Result<Json<Meal>> {
    let Json(patch) = payload?;
    patch.validate()?;

    let meal = state
        .db
        .edit_meal_atomic(user.user_id, meal_id, patch)
        .await?;

    Ok(Json(meal))
}

async fn delete_meal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(meal_id): Path<Uuid>,
) -> Result<StatusCode> {
    state.db.delete_meal_atomic(user.user_id, meal_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_meal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(meal_id): Path<Uuid>,
) -> Result<Json<Meal>> {
    Ok(Json(state.db.get_meal(user.user_id, meal_id).await?))
}

async fn list_meals(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Meal>>> {
    Ok(Json(state.db.list_meals(user.user_id).await?))
}
