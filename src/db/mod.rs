//! Database layer (Firestore).

pub mod firestore;
mod meals;
mod tokens;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    /// Email uniqueness index (keyed by normalised, URL-encoded email)
    pub const USER_EMAILS: &str = "user_emails";
    pub const MEALS: &str = "meals";
    /// User stats aggregates (keyed by user_id)
    pub const USER_STATS: &str = "user_stats";
    /// Refresh tokens (keyed by token value)
    pub const REFRESH_TOKENS: &str = "refresh_tokens";
}
