use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::codes;

/// Message used when a success envelope is built without one
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Operation successful";

/// JSON body shared by every API response
///
/// Success bodies carry `data` and no `code`; error bodies carry `code`
/// and no `data`. `messages` always holds at least one entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub messages: Vec<String>,
}

/// An envelope paired with the HTTP status it is sent with
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Envelope,
}

impl ApiResponse {
    /// Creates a 200 success envelope around `data`
    ///
    /// Falls back to the internal error envelope if `data` cannot be
    /// represented as JSON.
    pub fn success<T: Serialize>(data: &T) -> Self {
        match serde_json::to_value(data) {
            Ok(data) => Self {
                status: StatusCode::OK,
                body: Envelope {
                    success: true,
                    data: Some(data),
                    code: None,
                    messages: vec![DEFAULT_SUCCESS_MESSAGE.to_string()],
                },
            },
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize response data");
                Self::internal_server_error()
            }
        }
    }

    /// Creates a 400 error envelope
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: Envelope {
                success: false,
                data: None,
                code: Some(code.into()),
                messages: vec![message.into()],
            },
        }
    }

    /// Creates a 404 error envelope
    pub fn not_found(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::error(code, message).with_status(StatusCode::NOT_FOUND)
    }

    /// Creates a 409 error envelope
    pub fn conflict(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::error(code, message).with_status(StatusCode::CONFLICT)
    }

    /// Creates the generic 500 error envelope
    pub fn internal_server_error() -> Self {
        Self::error(codes::INTERNAL_SERVER_ERROR, "An unexpected error occurred")
            .with_status(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Replaces the message list with a single message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.body.messages = vec![message.into()];
        self
    }

    /// Overrides the HTTP status
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// True for success envelopes
    pub fn is_success(&self) -> bool {
        self.body.success
    }

    /// Machine-readable error code, `None` on success
    pub fn code(&self) -> Option<&str> {
        self.body.code.as_deref()
    }

    /// First human-readable message
    pub fn message(&self) -> &str {
        self.body.messages.first().map(String::as_str).unwrap_or_default()
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
