use axum::extract::rejection::BytesRejection;

use super::response::ApiResponse;
use crate::domain::repositories::StoreError;
use crate::domain::user::ValidationErrors;

/// Machine-readable codes carried by error envelopes
pub mod codes {
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const USER_NOT_FOUND: &str = "USER_NOT_FOUND";
    pub const DUPLICATE_ENTRY: &str = "DUPLICATE_ENTRY";
    pub const INTERNAL_SERVER_ERROR: &str = "INTERNAL_SERVER_ERROR";
    pub const INVALID_REQUEST_BODY: &str = "INVALID_REQUEST_BODY";

    /// Prefix for pass-through store codes, kept stable for existing clients
    pub const STORE_CODE_PREFIX: &str = "PRISMA_";
}

/// Translates a store failure into an error envelope
///
/// - unique violation: `DUPLICATE_ENTRY`, 409
/// - known store error: `PRISMA_<code>`, 400, store message
/// - anything else: `INTERNAL_SERVER_ERROR`, 500, generic message
pub fn translate_store_error(error: StoreError) -> ApiResponse {
    match error {
        StoreError::UniqueViolation { fields } => {
            let field = fields.first().map(String::as_str).unwrap_or("value");
            tracing::warn!(field, "Unique constraint violation");
            ApiResponse::conflict(
                codes::DUPLICATE_ENTRY,
                format!("Entry with this {} already exists", field),
            )
        }
        StoreError::Known { code, message } => {
            tracing::warn!(code = %code, message = %message, "Store rejected operation");
            ApiResponse::error(format!("{}{}", codes::STORE_CODE_PREFIX, code), message)
        }
        StoreError::Unknown(detail) => {
            tracing::error!(error = %detail, "Unexpected store failure");
            ApiResponse::internal_server_error()
        }
    }
}

impl From<StoreError> for ApiResponse {
    fn from(error: StoreError) -> Self {
        translate_store_error(error)
    }
}

impl From<ValidationErrors> for ApiResponse {
    fn from(errors: ValidationErrors) -> Self {
        tracing::debug!(errors = %errors, "Request validation failed");
        ApiResponse::error(codes::VALIDATION_ERROR, errors.to_string())
    }
}

/// A body axum could not buffer (over the size limit, aborted upload)
/// keeps the rejection's status
impl From<BytesRejection> for ApiResponse {
    fn from(rejection: BytesRejection) -> Self {
        tracing::warn!(status = %rejection.status(), "Request body rejected");
        ApiResponse::error(codes::INVALID_REQUEST_BODY, rejection.body_text())
            .with_status(rejection.status())
    }
}
