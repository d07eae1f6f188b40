// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (profile storage, email uniqueness index)
//! - User stats (aggregate read side)
//!
//! Meal and refresh-token operations live in sibling modules as further
//! `impl FirestoreDb` blocks.

use crate::db::collections;
use crate::error::AppError;
use crate::models::user::normalize_email;
use crate::models::{EmailIndex, User, UserStats};
use uuid::Uuid;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    pub(super) fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by ID.
    pub async fn get_user(&self, user_id: Uuid) -> Result<Option<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(&user_id.to_string())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a user by email, through the uniqueness index.
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let index: Option<EmailIndex> = self
            .get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USER_EMAILS)
            .obj()
            .one(&email_doc_id(email))
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        match index {
            Some(entry) => self.get_user(entry.user_id).await,
            None => Ok(None),
        }
    }

    /// Atomically create a user and claim its email.
    ///
    /// Returns `false` without writing anything when the email is already
    /// taken. Two concurrent registrations of one email conflict on the
    /// index document, so only one of them can commit.
    pub async fn create_user_unique(&self, user: &User) -> Result<bool, AppError> {
        let user = user.clone();

        let created = self
            .get_client()?
            .run_transaction(|db, transaction| {
                let user = user.clone();
                Box::pin(async move {
                    let index_id = email_doc_id(&user.email);

                    let existing: Option<EmailIndex> = db
                        .fluent()
                        .select()
                        .by_id_in(collections::USER_EMAILS)
                        .obj()
                        .one(&index_id)
                        .await?;

                    if existing.is_some() {
                        return Ok(false);
                    }

                    db.fluent()
                        .update()
                        .in_col(collections::USERS)
                        .document_id(user.id.to_string())
                        .object(&user)
                        .add_to_transaction(transaction)?;

                    db.fluent()
                        .update()
                        .in_col(collections::USER_EMAILS)
                        .document_id(&index_id)
                        .object(&EmailIndex { user_id: user.id })
                        .add_to_transaction(transaction)?;

                    Ok(true)
                })
            })
            .await
            .map_err(|e| AppError::Database(format!("User creation transaction failed: {}", e)))?;

        if created {
            tracing::info!(user_id = %user.id, "User created");
        } else {
            tracing::debug!("Registration rejected: email already in use");
        }

        Ok(created)
    }

    /// Whether any user exists at all (used by demo seeding).
    pub async fn has_users(&self) -> Result<bool, AppError> {
        let users: Vec<User> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(!users.is_empty())
    }

    // ─── User Stats Operations ──────────────────────────────────

    /// Get user stats aggregate document.
    ///
    /// Stored in `user_stats` collection, keyed by user ID. Absent until the
    /// user's first meal.
    pub async fn get_user_stats(&self, user_id: Uuid) -> Result<Option<UserStats>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USER_STATS)
            .obj()
            .one(&user_id.to_string())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

/// Document ID of an email index entry.
fn email_doc_id(email: &str) -> String {
    urlencoding::encode(&normalize_email(email)).into_owned()
}
