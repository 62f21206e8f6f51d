use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Path, State},
};

use crate::api::response::ApiResponse;
use crate::api::state::AppState;

// Bodies are taken as raw bytes: the browser client posts JSON without a
// Content-Type header, and malformed JSON must still produce an envelope.
// Buffering failures are mapped into an envelope too.

/// List all users
///
/// GET /api/user
pub async fn list_users(State(state): State<AppState>) -> ApiResponse {
    state.users.list_users().await
}

/// Create a user
///
/// POST /api/user
pub async fn create_user(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> ApiResponse {
    match body {
        Ok(body) => state.users.create_user(&body).await,
        Err(rejection) => rejection.into(),
    }
}

/// Get a user by ID
///
/// GET /api/user/:id
pub async fn get_user(State(state): State<AppState>, Path(id): Path<String>) -> ApiResponse {
    state.users.get_user(&id).await
}

/// Partially update a user
///
/// PATCH /api/user/:id
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Bytes, BytesRejection>,
) -> ApiResponse {
    match body {
        Ok(body) => state.users.update_user(&id, &body).await,
        Err(rejection) => rejection.into(),
    }
}

/// Delete a user
///
/// DELETE /api/user/:id
pub async fn delete_user(State(state): State<AppState>, Path(id): Path<String>) -> ApiResponse {
    state.users.delete_user(&id).await
}
