use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User entity
///
/// The single record managed by the API. Identity and timestamps are
/// assigned by the store; everything else comes from validated input.
///
/// # Invariants
/// - `id` is generated on insert and never changes
/// - `email` is unique across all users (enforced by the store)
/// - `created_at` is set once, `updated_at` moves on every update
///
/// Serialized in camelCase, which is the shape the browser client reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_active: bool,
    pub is_email_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Default for `is_active` on newly created users
    pub const DEFAULT_IS_ACTIVE: bool = true;

    /// Default for `is_email_verified` on newly created users
    pub const DEFAULT_IS_EMAIL_VERIFIED: bool = false;
}
