// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account and session management.
//!
//! Owns registration, password login, refresh-token login and logout.
//! Handlers only translate between JSON and these calls.

use chrono::Utc;
use uuid::Uuid;

use crate::config::{Config, RefreshTokenScope};
use crate::db::FirestoreDb;
use crate::error::{AppError, Result};
use crate::middleware::auth::create_jwt;
use crate::models::user::normalize_email;
use crate::models::{RefreshToken, User, UserResponse};
use crate::services::password::{hash_password_blocking, verify_password_blocking};

/// A freshly authenticated session.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub access_token: String,
    pub refresh_token: RefreshToken,
}

#[derive(Clone)]
pub struct AuthService {
    db: FirestoreDb,
    signing_key: Vec<u8>,
    scope: RefreshTokenScope,
}

impl AuthService {
    pub fn new(db: FirestoreDb, config: &Config) -> Self {
        Self {
            db,
            signing_key: config.jwt_signing_key.clone(),
            scope: config.refresh_token_scope,
        }
    }

    /// Create an account. The email must not be in use yet.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<User> {
        let email = normalize_email(email);
        let password_hash = hash_password_blocking(password.to_string()).await?;

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email,
            name: name.trim().to_string(),
            password_hash,
            created_at: now,
            updated_at: now,
        };

        if !self.db.create_user_unique(&user).await? {
            return Err(AppError::Invalid("user already exists".to_string()));
        }

        Ok(user)
    }

    /// Password login.
    ///
    /// Issues the user's first refresh token, or rotates the existing one
    /// (which also clears a previous revocation).
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        device_id: Option<String>,
    ) -> Result<Session> {
        let user = self
            .db
            .get_user_by_email(email)
            .await?
            .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;

        let valid =
            verify_password_blocking(password.to_string(), user.password_hash.clone()).await?;
        if !valid {
            tracing::info!(user_id = %user.id, "Login rejected: wrong password");
            return Err(AppError::Unauthorized);
        }

        let refresh_token = self
            .db
            .issue_or_rotate_refresh_token(user.id, device_id)
            .await?;
        let access_token = create_jwt(user.id, &user.email, &self.signing_key)?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(Session {
            user,
            access_token,
            refresh_token,
        })
    }

    /// Exchange a refresh token for a new access token and a rotated
    /// refresh token.
    ///
    /// `presenting_user` is only consulted under [`RefreshTokenScope::Scoped`].
    pub async fn refresh_login(
        &self,
        presented: &str,
        presenting_user: Option<Uuid>,
    ) -> Result<Session> {
        if self.scope == RefreshTokenScope::Scoped && presenting_user.is_none() {
            return Err(AppError::Invalid("user_id is required".to_string()));
        }

        let refresh_token = self
            .db
            .rotate_presented_refresh_token(presented, presenting_user, self.scope)
            .await?;

        let user = self
            .db
            .get_user(refresh_token.user_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("no user with id -> {}", refresh_token.user_id))
            })?;

        let access_token = create_jwt(user.id, &user.email, &self.signing_key)?;

        Ok(Session {
            user,
            access_token,
            refresh_token,
        })
    }

    /// Revoke a refresh token. The next password login replaces it.
    pub async fn logout(&self, refresh_token: &str) -> Result<()> {
        self.db.revoke_refresh_token(refresh_token).await
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<UserResponse> {
        self.db
            .get_user_by_email(email)
            .await?
            .map(UserResponse::from)
            .ok_or_else(|| AppError::NotFound("user not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_service(scope: RefreshTokenScope) -> AuthService {
        let mut config = Config::test_default();
        config.refresh_token_scope = scope;
        AuthService::new(FirestoreDb::new_mock(), &config)
    }

    #[tokio::test]
    async fn test_scoped_refresh_requires_user_id() {
        let service = offline_service(RefreshTokenScope::Scoped);
        let err = service.refresh_login("some-token", None).await.unwrap_err();
        assert!(matches!(err, AppError::Invalid(_)));
    }

    #[tokio::test]
    async fn test_unscoped_refresh_reaches_the_store() {
        let service = offline_service(RefreshTokenScope::Unscoped);
        let err = service.refresh_login("some-token", None).await.unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
    }

    #[tokio::test]
    async fn test_login_offline_reports_database_error() {
        let service = offline_service(RefreshTokenScope::Unscoped);
        let err = service
            .login("leo@mail.com", "test122", None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
    }
}
