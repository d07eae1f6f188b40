// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use chrono::{NaiveDate, Utc};
use daily_diet_tracker::config::Config;
use daily_diet_tracker::db::FirestoreDb;
use daily_diet_tracker::middleware::auth::create_jwt;
use daily_diet_tracker::models::{Meal, MealTime, User};
use daily_diet_tracker::routes::create_router;
use daily_diet_tracker::AppState;
use std::sync::Arc;
use uuid::Uuid;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a mock database connection (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> FirestoreDb {
    FirestoreDb::new_mock()
}

/// Create a test app with offline mock dependencies.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(Config::test_default(), test_db_offline()));
    (create_router(state.clone()), state)
}

/// Create a test app backed by the emulator.
#[allow(dead_code)]
pub async fn create_emulator_app() -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(Config::test_default(), test_db().await));
    (create_router(state.clone()), state)
}

/// Sign an access token with the test key.
#[allow(dead_code)]
pub fn create_test_jwt(user_id: Uuid, email: &str) -> String {
    create_jwt(user_id, email, &Config::test_default().jwt_signing_key)
        .expect("Failed to sign test token")
}

/// Insert a user with a unique email directly into the store.
#[allow(dead_code)]
pub async fn create_test_user(db: &FirestoreDb) -> User {
    let now = Utc::now();
    let id = Uuid::new_v4();
    let user = User {
        id,
        email: format!("user-{}@example.com", id),
        name: "Test User".to_string(),
        password_hash: "$argon2id$unused".to_string(),
        created_at: now,
        updated_at: now,
    };
    assert!(db
        .create_user_unique(&user)
        .await
        .expect("Failed to create test user"));
    user
}

/// A meal for `user_id` at 12:00 on 2024-01-15.
#[allow(dead_code)]
pub fn test_meal(user_id: Uuid, in_diet: bool) -> Meal {
    let now = Utc::now();
    Meal {
        id: Uuid::new_v4(),
        user_id,
        name: "Test Meal".to_string(),
        description: None,
        date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        time: MealTime::parse("12:00").unwrap(),
        in_diet,
        created_at: now,
        updated_at: now,
    }
}
