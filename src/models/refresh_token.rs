// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Refresh token model and rotation policy.
//!
//! Each user holds at most one refresh token. Logging in or refreshing
//! replaces the token value in place, which invalidates whatever value the
//! client held before. Expiry is never stored as a state; it is observed
//! when a token is validated.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{RefreshTokenScope, REFRESH_TOKEN_TTL_DAYS};
use crate::error::AppError;

/// Stored refresh token, keyed by its opaque value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshToken {
    /// Opaque value (also used as document ID)
    pub token: String,
    pub user_id: Uuid,
    #[serde(default)]
    pub device_id: Option<String>,
    pub expire_at: DateTime<Utc>,
    #[serde(default)]
    pub revoked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Observed state of a user's refresh token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenState {
    None,
    Active,
    Expired,
    Revoked,
}

impl RefreshToken {
    /// Issue the first token for a user.
    pub fn issue(user_id: Uuid, device_id: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            token: new_token_value(),
            user_id,
            device_id,
            expire_at: now + Duration::days(REFRESH_TOKEN_TTL_DAYS),
            revoked: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the value and reset the expiry. A fresh value is never revoked.
    pub fn rotate(&self, now: DateTime<Utc>) -> Self {
        Self {
            token: new_token_value(),
            expire_at: now + Duration::days(REFRESH_TOKEN_TTL_DAYS),
            revoked: false,
            updated_at: now,
            ..self.clone()
        }
    }

    pub fn revoke(&mut self, now: DateTime<Utc>) {
        self.revoked = true;
        self.updated_at = now;
    }

    pub fn state(&self, now: DateTime<Utc>) -> TokenState {
        if self.revoked {
            TokenState::Revoked
        } else if now > self.expire_at {
            TokenState::Expired
        } else {
            TokenState::Active
        }
    }
}

/// State of whatever the store returned for a lookup.
pub fn observe(token: Option<&RefreshToken>, now: DateTime<Utc>) -> TokenState {
    token.map_or(TokenState::None, |t| t.state(now))
}

/// Check a stored token against the presenting user and the clock.
///
/// With [`RefreshTokenScope::Scoped`] the caller must name the user the
/// token belongs to; with [`RefreshTokenScope::Unscoped`] the token value
/// alone is enough.
pub fn validate<'a>(
    stored: Option<&'a RefreshToken>,
    presenting_user: Option<Uuid>,
    scope: RefreshTokenScope,
    now: DateTime<Utc>,
) -> Result<&'a RefreshToken, AppError> {
    let token = stored.ok_or(AppError::InvalidToken)?;

    if scope == RefreshTokenScope::Scoped && presenting_user != Some(token.user_id) {
        tracing::debug!(user_id = %token.user_id, "Refresh token presented for another user");
        return Err(AppError::InvalidToken);
    }

    match token.state(now) {
        TokenState::Active => Ok(token),
        TokenState::Revoked => {
            tracing::debug!(user_id = %token.user_id, "Refresh token revoked");
            Err(AppError::InvalidToken)
        }
        TokenState::Expired | TokenState::None => {
            tracing::debug!(user_id = %token.user_id, expire_at = %token.expire_at, "Refresh token expired");
            Err(AppError::InvalidToken)
        }
    }
}

fn new_token_value() -> String {
    Uuid::new_v4().to_string()
}
