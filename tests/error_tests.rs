// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::http::StatusCode;
use axum::response::IntoResponse;
use daily_diet_tracker::error::{AppError, ErrorKind};

#[test]
fn test_every_variant_maps_through_the_taxonomy() {
    let cases = [
        (AppError::Unauthorized, ErrorKind::Unauthorized),
        (AppError::InvalidToken, ErrorKind::Unauthorized),
        (AppError::Forbidden("x".into()), ErrorKind::Forbidden),
        (AppError::NotFound("x".into()), ErrorKind::NotFound),
        (AppError::Invalid("x".into()), ErrorKind::Invalid),
        (AppError::Database("x".into()), ErrorKind::Internal),
        (
            AppError::Internal(anyhow::anyhow!("boom")),
            ErrorKind::Internal,
        ),
    ];

    for (err, kind) in cases {
        assert_eq!(err.kind(), kind);
        assert_eq!(err.into_response().status(), kind.status());
    }
}

#[test]
fn test_forbidden_is_not_unauthorized() {
    let response = AppError::Forbidden("not your meal".into()).into_response();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_error_body_shape() {
    let response = AppError::NotFound("no meal with id -> 42".into()).into_response();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "not_found");
    assert_eq!(json["details"], "no meal with id -> 42");
}

#[tokio::test]
async fn test_database_error_details_are_hidden() {
    let response = AppError::Database("secret connection string".into()).into_response();

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "database_error");
    assert!(json.get("details").is_none());
}
