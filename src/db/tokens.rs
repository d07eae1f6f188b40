// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Refresh token store.
//!
//! Tokens are keyed by their opaque value. Rotating deletes the old
//! document and writes the new one in the same transaction, so a
//! superseded value can never be presented again.

use chrono::Utc;
use uuid::Uuid;

use crate::config::RefreshTokenScope;
use crate::db::{collections, FirestoreDb};
use crate::error::{AppError, Result};
use crate::models::refresh_token::{self, RefreshToken};

impl FirestoreDb {
    /// Look up a refresh token by value.
    pub async fn get_refresh_token(&self, token: &str) -> Result<Option<RefreshToken>> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::REFRESH_TOKENS)
            .obj()
            .one(token)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Issue the user's first refresh token, or rotate the existing one.
    ///
    /// Called on every successful password login. `device_id` is recorded
    /// only when a token is first issued.
    pub async fn issue_or_rotate_refresh_token(
        &self,
        user_id: Uuid,
        device_id: Option<String>,
    ) -> Result<RefreshToken> {
        let token = self
            .get_client()?
            .run_transaction(|db, transaction| {
                let device_id = device_id.clone();
                Box::pin(async move {
                    let owner = user_id.to_string();
                    let existing: Vec<RefreshToken> = db
                        .fluent()
                        .select()
                        .from(collections::REFRESH_TOKENS)
                        .filter(move |q| q.for_all([q.field("user_id").eq(owner.clone())]))
                        .obj()
                        .query()
                        .await?;

                    let now = Utc::now();
                    let next = match existing.first() {
                        Some(current) => current.rotate(now),
                        None => RefreshToken::issue(user_id, device_id, now),
                    };

                    // Normally at most one; clear any leftovers as well.
                    for stale in &existing {
                        db.fluent()
                            .delete()
                            .from(collections::REFRESH_TOKENS)
                            .document_id(&stale.token)
                            .add_to_transaction(transaction)?;
                    }

                    db.fluent()
                        .update()
                        .in_col(collections::REFRESH_TOKENS)
                        .document_id(&next.token)
                        .object(&next)
                        .add_to_transaction(transaction)?;

                    Ok(next)
                })
            })
            .await
            .map_err(|e| AppError::Database(format!("Refresh token transaction failed: {}", e)))?;

        tracing::debug!(user_id = %user_id, expire_at = %token.expire_at, "Refresh token issued");

        Ok(token)
    }

    /// Validate a presented refresh token and rotate it.
    ///
    /// Fails with [`AppError::InvalidToken`] when the token is unknown,
    /// expired, revoked, or (under [`RefreshTokenScope::Scoped`]) presented
    /// for a different user.
    pub async fn rotate_presented_refresh_token(
        &self,
        presented: &str,
        presenting_user: Option<Uuid>,
        scope: RefreshTokenScope,
    ) -> Result<RefreshToken> {
        let presented = presented.to_string();

        let outcome = self
            .get_client()?
            .run_transaction(|db, transaction| {
                let presented = presented.clone();
                Box::pin(async move {
                    let stored: Option<RefreshToken> = db
                        .fluent()
                        .select()
                        .by_id_in(collections::REFRESH_TOKENS)
                        .obj()
                        .one(&presented)
                        .await?;

                    let now = Utc::now();
                    let current =
                        match refresh_token::validate(stored.as_ref(), presenting_user, scope, now) {
                            Ok(current) => current,
                            Err(e) => return Ok(Err(e)),
                        };

                    let next = current.rotate(now);

                    db.fluent()
                        .delete()
                        .from(collections::REFRESH_TOKENS)
                        .document_id(&current.token)
                        .add_to_transaction(transaction)?;

                    db.fluent()
                        .update()
                        .in_col(collections::REFRESH_TOKENS)
                        .document_id(&next.token)
                        .object(&next)
                        .add_to_transaction(transaction)?;

                    Ok(Ok(next))
                })
            })
            .await
            .map_err(|e| AppError::Database(format!("Refresh token rotation failed: {}", e)))?;

        let token = outcome?;
        tracing::debug!(user_id = %token.user_id, "Refresh token rotated");

        Ok(token)
    }

    /// Mark a refresh token as revoked. It stays stored until the next login.
    pub async fn revoke_refresh_token(&self, token: &str) -> Result<()> {
        let token = token.to_string();

        let outcome = self
            .get_client()?
            .run_transaction(|db, transaction| {
                let token = token.clone();
                Box::pin(async move {
                    let stored: Option<RefreshToken> = db
                        .fluent()
                        .select()
                        .by_id_in(collections::REFRESH_TOKENS)
                        .obj()
                        .one(&token)
                        .await?;

                    let Some(mut stored) = stored else {
                        return Ok(Err(AppError::NotFound("refresh token".to_string())));
                    };

                    stored.revoke(Utc::now());

                    db.fluent()
                        .update()
                        .in_col(collections::REFRESH_TOKENS)
                        .document_id(&stored.token)
                        .object(&stored)
                        .add_to_transaction(transaction)?;

                    Ok(Ok(stored.user_id))
                })
            })
            .await
            .map_err(|e| AppError::Database(format!("Refresh token revocation failed: {}", e)))?;

        let user_id = outcome?;
        tracing::info!(user_id = %user_id, "Refresh token revoked");

        Ok(())
    }
}
