use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::user::{CreateUser, UpdateUser, User};

/// Store-native code for an update or delete that matched no row
pub const RECORD_NOT_FOUND_CODE: &str = "P2025";

/// Failures raised by a user store
///
/// Adapters classify their native errors into one of these so the API
/// layer can translate them without knowing which store is behind the port.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint rejected the write
    #[error("Unique constraint failed on the fields: ({})", .fields.join(", "))]
    UniqueViolation { fields: Vec<String> },

    /// A store error with a native code worth surfacing to clients
    #[error("{message}")]
    Known { code: String, message: String },

    /// Anything else (connection loss, pool timeout, decode failure, ...)
    #[error("Unexpected store error: {0}")]
    Unknown(String),
}

impl StoreError {
    /// Update target does not exist
    pub fn update_target_missing() -> Self {
        Self::Known {
            code: RECORD_NOT_FOUND_CODE.to_string(),
            message: "Record to update not found.".to_string(),
        }
    }

    /// Delete target does not exist
    pub fn delete_target_missing() -> Self {
        Self::Known {
            code: RECORD_NOT_FOUND_CODE.to_string(),
            message: "Record to delete does not exist.".to_string(),
        }
    }
}

/// Repository trait for the User entity
///
/// Each method is a single store operation. Ids, defaults and timestamps
/// are assigned by the implementation.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// All users, newest first
    async fn list(&self) -> Result<Vec<User>, StoreError>;

    /// Insert a user and return the stored row
    async fn create(&self, input: CreateUser) -> Result<User, StoreError>;

    /// Find a user by ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Apply the present fields of `changes` and refresh `updated_at`
    async fn update(&self, id: Uuid, changes: UpdateUser) -> Result<User, StoreError>;

    /// Hard delete, returning the removed row
    async fn delete(&self, id: Uuid) -> Result<User, StoreError>;
}
