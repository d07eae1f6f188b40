// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! End-to-end HTTP flows against the Firestore emulator.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

mod common;

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, value)
}

async fn register_and_login(app: &Router, email: &str) -> (String, String) {
    let (status, body) = send(
        app,
        "POST",
        "/auth/register",
        None,
        Some(json!({"email": email, "name": "Leo Messi", "password": "test122"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], email);
    assert_eq!(body["name"], "Leo Messi");

    let (status, body) = send(
        app,
        "POST",
        "/auth/login",
        None,
        Some(json!({"email": email, "password": "test122", "device_id": "web"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    (
        body["token"].as_str().unwrap().to_string(),
        body["refresh_token"].as_str().unwrap().to_string(),
    )
}

fn unique_email() -> String {
    format!("flow-{}@example.com", Uuid::new_v4())
}

#[tokio::test]
async fn test_register_twice_is_rejected() {
    require_emulator!();

    let (app, _) = common::create_emulator_app().await;
    let email = unique_email();
    register_and_login(&app, &email).await;

    let (status, _) = send(
        &app,
        "POST",
        "/auth/register",
        None,
        Some(json!({"email": email, "name": "Copycat", "password": "secret"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_failures() {
    require_emulator!();

    let (app, _) = common::create_emulator_app().await;
    let email = unique_email();
    register_and_login(&app, &email).await;

    let (status, _) = send(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({"email": email, "password": "wrong"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({"email": unique_email(), "password": "test122"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_user_lookup_answers_found() {
    require_emulator!();

    let (app, _) = common::create_emulator_app().await;
    let email = unique_email();
    register_and_login(&app, &email).await;

    let (status, body) = send(&app, "GET", &format!("/auth/user/{}", email), None, None).await;
    assert_eq!(status, StatusCode::FOUND);
    assert_eq!(body["user"]["email"], email);
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_meal_lifecycle_updates_stats() {
    require_emulator!();

    let (app, _) = common::create_emulator_app().await;
    let (token, _) = register_and_login(&app, &unique_email()).await;

    let (status, stats) = send(&app, "GET", "/userstats/find", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["registeredMeals"], 0);

    let (status, meal) = send(
        &app,
        "POST",
        "/meals/new",
        Some(&token),
        Some(json!({
            "name": "Healthy Breakfast",
            "description": "Oatmeal with fruits and honey",
            "date": "2024-01-15",
            "time": "08:30",
            "in_diet": true
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(meal["time"], "08:30");
    let meal_id = meal["id"].as_str().unwrap().to_string();

    let (status, edited) = send(
        &app,
        "PATCH",
        &format!("/meals/edit/{}", meal_id),
        Some(&token),
        Some(json!({"in_diet": false})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(edited["in_diet"], false);
    assert_eq!(edited["name"], "Healthy Breakfast");

    let (_, stats) = send(&app, "GET", "/userstats/find", Some(&token), None).await;
    assert_eq!(stats["registeredMeals"], 1);
    assert_eq!(stats["inDietMeals"], 0);
    assert_eq!(stats["currentStreak"], 1);

    let (status, list) = send(&app, "GET", "/meals/list", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/meals/delete/{}", meal_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", &format!("/meals/{}", meal_id), Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, stats) = send(&app, "GET", "/userstats/find", Some(&token), None).await;
    assert_eq!(stats["registeredMeals"], 0);
}

#[tokio::test]
async fn test_refresh_rotation_and_logout() {
    require_emulator!();

    let (app, _) = common::create_emulator_app().await;
    let email = unique_email();
    let (_, refresh_token) = register_and_login(&app, &email).await;

    let (status, body) = send(
        &app,
        "POST",
        "/auth/login/token",
        None,
        Some(json!({"refresh_token": refresh_token})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_email"], email);
    let rotated = body["refresh_token"].as_str().unwrap().to_string();
    assert_ne!(rotated, refresh_token);

    let jwt = body["jwt_token"].as_str().unwrap();
    let (status, _) = send(&app, "GET", "/meals/list", Some(jwt), None).await;
    assert_eq!(status, StatusCode::OK);

    // The superseded value is dead
    let (status, _) = send(
        &app,
        "POST",
        "/auth/login/token",
        None,
        Some(json!({"refresh_token": refresh_token})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        "POST",
        "/auth/logout",
        None,
        Some(json!({"refresh_token": rotated})),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        &app,
        "POST",
        "/auth/login/token",
        None,
        Some(json!({"refresh_token": rotated})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
