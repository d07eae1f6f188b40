//! User model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use uuid::Uuid;

/// User profile stored in Firestore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// User ID (also used as document ID)
    pub id: Uuid,
    /// Email address, unique across users
    pub email: String,
    /// Display name
    pub name: String,
    /// Argon2 PHC string
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Email index entry: `user_emails/{email}` -> owning user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailIndex {
    pub user_id: Uuid,
}

/// Public projection of a user; never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(feature = "binding-generation", ts(export, export_to = "bindings/"))]
pub struct UserResponse {
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub id: Uuid,
    pub email: String,
    pub name: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub created_at: DateTime<Utc>,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Normalise an email for lookups and the uniqueness index.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_hides_password_hash() {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: "leo@mail.com".to_string(),
            name: "Leo Messi".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert_eq!(json["email"], "leo@mail.com");
        assert_eq!(json["name"], "Leo Messi");
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Leo@Mail.COM "), "leo@mail.com");
    }
}
