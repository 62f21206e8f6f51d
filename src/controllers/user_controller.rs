use axum::http::StatusCode;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::errors::codes;
use crate::api::response::ApiResponse;
use crate::domain::repositories::{StoreError, UserRepository};
use crate::domain::user::validation::{validate_create, validate_update};

/// Error envelopes short-circuit an operation through `?`
type Outcome = Result<ApiResponse, ApiResponse>;

/// Orchestrates user operations: validate, call the store once, wrap the
/// result in an envelope
///
/// Every public method returns an envelope. Store and validation failures
/// are converted here and never reach the transport layer.
#[derive(Clone)]
pub struct UserController {
    repository: Arc<dyn UserRepository>,
}

impl UserController {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    /// All users, newest first
    pub async fn list_users(&self) -> ApiResponse {
        settle(self.list().await)
    }

    /// Validates `body` and inserts a user (201 on success)
    pub async fn create_user(&self, body: &[u8]) -> ApiResponse {
        settle(self.create(body).await)
    }

    /// Single user, `USER_NOT_FOUND` when absent
    pub async fn get_user(&self, id: &str) -> ApiResponse {
        settle(self.get(id).await)
    }

    /// Validates `body` and applies the present fields to user `id`
    pub async fn update_user(&self, id: &str, body: &[u8]) -> ApiResponse {
        settle(self.update(id, body).await)
    }

    /// Hard delete, returning the removed user (204 on success)
    pub async fn delete_user(&self, id: &str) -> ApiResponse {
        settle(self.delete(id).await)
    }

    async fn list(&self) -> Outcome {
        let users = self.repository.list().await?;

        Ok(ApiResponse::success(&users).with_message("User list fetched successfully"))
    }

    async fn create(&self, body: &[u8]) -> Outcome {
        let input = validate_create(&parse_body(body)?)?;
        let user = self.repository.create(input).await?;

        tracing::info!(user_id = %user.id, email = %user.email, "Created user");
        Ok(ApiResponse::success(&user)
            .with_message("User created successfully")
            .with_status(StatusCode::CREATED))
    }

    async fn get(&self, id: &str) -> Outcome {
        let user = match parse_id(id) {
            Some(id) => self.repository.find_by_id(id).await?,
            None => None,
        };

        let user = user.ok_or_else(|| {
            ApiResponse::not_found(codes::USER_NOT_FOUND, "User not found")
        })?;

        Ok(ApiResponse::success(&user).with_message("User fetched successfully"))
    }

    async fn update(&self, id: &str, body: &[u8]) -> Outcome {
        let changes = validate_update(&parse_body(body)?)?;
        let id = parse_id(id).ok_or_else(StoreError::update_target_missing)?;
        let user = self.repository.update(id, changes).await?;

        tracing::info!(user_id = %user.id, "Updated user");
        Ok(ApiResponse::success(&user).with_message("User updated successfully"))
    }

    async fn delete(&self, id: &str) -> Outcome {
        let id = parse_id(id).ok_or_else(StoreError::delete_target_missing)?;
        let user = self.repository.delete(id).await?;

        tracing::info!(user_id = %user.id, "Deleted user");
        Ok(ApiResponse::success(&user)
            .with_message("User deleted successfully")
            .with_status(StatusCode::NO_CONTENT))
    }
}

fn settle(outcome: Outcome) -> ApiResponse {
    outcome.unwrap_or_else(|error| error)
}

/// Ids are opaque at the HTTP boundary; a string that is not a UUID cannot
/// name a stored user
fn parse_id(id: &str) -> Option<Uuid> {
    Uuid::parse_str(id).ok()
}

/// Bodies that are not JSON are reported as unexpected failures
fn parse_body(body: &[u8]) -> Result<Value, ApiResponse> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::warn!(error = %e, "Malformed JSON body");
        ApiResponse::internal_server_error()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::User;
    use crate::infrastructure::repositories::InMemoryUserRepository;
    use serde_json::json;

    fn controller() -> UserController {
        UserController::new(Arc::new(InMemoryUserRepository::new()))
    }

    fn body(value: Value) -> Vec<u8> {
        serde_json::to_vec(&value).unwrap()
    }

    fn user_of(response: &ApiResponse) -> User {
        serde_json::from_value(response.body.data.clone().expect("data")).expect("user")
    }

    async fn create(controller: &UserController, email: &str) -> User {
        let response = controller
            .create_user(&body(json!({
                "email": email,
                "firstName": "Grace",
                "lastName": "Hopper"
            })))
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response);
        user_of(&response)
    }

    #[tokio::test]
    async fn create_returns_stored_user() {
        let controller = controller();

        let response = controller
            .create_user(&body(json!({
                "email": "grace@example.com",
                "firstName": "Grace",
                "lastName": null
            })))
            .await;

        assert_eq!(response.status, StatusCode::CREATED);
        assert!(response.is_success());
        assert_eq!(response.message(), "User created successfully");

        let user = user_of(&response);
        assert_eq!(user.email, "grace@example.com");
        assert_eq!(user.first_name.as_deref(), Some("Grace"));
        assert_eq!(user.last_name, None);
        assert!(user.is_active);
        assert!(!user.is_email_verified);
    }

    #[tokio::test]
    async fn invalid_create_writes_nothing() {
        let controller = controller();

        for payload in [
            json!({ "firstName": "Grace", "lastName": "Hopper" }),
            json!({ "email": "nope", "firstName": "Grace", "lastName": "Hopper" }),
            json!({ "email": "grace@example.com", "firstName": "G", "lastName": "Hopper" }),
        ] {
            let response = controller.create_user(&body(payload)).await;
            assert_eq!(response.status, StatusCode::BAD_REQUEST);
            assert_eq!(response.code(), Some("VALIDATION_ERROR"));
        }

        let list = controller.list_users().await;
        assert_eq!(list.body.data, Some(json!([])));
    }

    #[tokio::test]
    async fn malformed_json_is_internal_error() {
        let controller = controller();
        let response = controller.create_user(b"{not json").await;

        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.code(), Some("INTERNAL_SERVER_ERROR"));
        assert_eq!(response.message(), "An unexpected error occurred");

        let created = create(&controller, "malformed@example.com").await;
        let id = created.id.to_string();
        let response = controller.update_user(&id, b"isActive=false").await;
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.code(), Some("INTERNAL_SERVER_ERROR"));
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let controller = controller();
        let first = create(&controller, "dup@example.com").await;

        let response = controller
            .create_user(&body(json!({
                "email": "dup@example.com",
                "firstName": "Other",
                "lastName": "Person"
            })))
            .await;

        assert_eq!(response.status, StatusCode::CONFLICT);
        assert_eq!(response.code(), Some("DUPLICATE_ENTRY"));
        assert_eq!(response.message(), "Entry with this email already exists");

        let fetched = controller.get_user(&first.id.to_string()).await;
        assert_eq!(user_of(&fetched), first);
    }

    #[tokio::test]
    async fn get_missing_user_is_not_found() {
        let controller = controller();

        for id in [Uuid::new_v4().to_string(), "not-a-uuid".to_string()] {
            let response = controller.get_user(&id).await;
            assert_eq!(response.status, StatusCode::NOT_FOUND);
            assert_eq!(response.code(), Some("USER_NOT_FOUND"));
            assert_eq!(response.message(), "User not found");
        }
    }

    #[tokio::test]
    async fn partial_update_changes_only_given_fields() {
        let controller = controller();
        let user = create(&controller, "partial@example.com").await;

        let response = controller
            .update_user(&user.id.to_string(), &body(json!({ "isActive": false })))
            .await;

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.message(), "User updated successfully");

        let updated = user_of(&response);
        assert!(!updated.is_active);
        assert!(updated.updated_at > user.updated_at);
        assert_eq!(updated.email, user.email);
        assert_eq!(updated.first_name, user.first_name);
        assert_eq!(updated.last_name, user.last_name);
        assert_eq!(updated.is_email_verified, user.is_email_verified);
        assert_eq!(updated.created_at, user.created_at);
    }

    #[tokio::test]
    async fn update_can_mark_email_verified() {
        let controller = controller();
        let user = create(&controller, "verify@example.com").await;

        let response = controller
            .update_user(&user.id.to_string(), &body(json!({ "isEmailVerified": true })))
            .await;

        assert!(user_of(&response).is_email_verified);
    }

    #[tokio::test]
    async fn invalid_update_is_rejected_before_store() {
        let controller = controller();
        let user = create(&controller, "strict@example.com").await;

        let response = controller
            .update_user(
                &user.id.to_string(),
                &body(json!({ "firstName": "X", "isActive": false })),
            )
            .await;

        assert_eq!(response.code(), Some("VALIDATION_ERROR"));

        let fetched = user_of(&controller.get_user(&user.id.to_string()).await);
        assert!(fetched.is_active);
    }

    #[tokio::test]
    async fn update_missing_user_is_store_error() {
        let response = controller()
            .update_user(&Uuid::new_v4().to_string(), &body(json!({ "isActive": false })))
            .await;

        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.code(), Some("PRISMA_P2025"));
    }

    #[tokio::test]
    async fn update_to_taken_email_conflicts() {
        let controller = controller();
        create(&controller, "first@example.com").await;
        let second = create(&controller, "second@example.com").await;

        let response = controller
            .update_user(
                &second.id.to_string(),
                &body(json!({ "email": "first@example.com" })),
            )
            .await;

        assert_eq!(response.status, StatusCode::CONFLICT);
        assert_eq!(response.code(), Some("DUPLICATE_ENTRY"));
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let controller = controller();
        let user = create(&controller, "delete@example.com").await;
        let id = user.id.to_string();

        let deleted = controller.delete_user(&id).await;
        assert_eq!(deleted.status, StatusCode::NO_CONTENT);
        assert_eq!(deleted.message(), "User deleted successfully");
        assert_eq!(user_of(&deleted), user);

        let again = controller.delete_user(&id).await;
        assert_eq!(again.code(), Some("PRISMA_P2025"));

        let fetched = controller.get_user(&id).await;
        assert_eq!(fetched.code(), Some("USER_NOT_FOUND"));
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let controller = controller();
        let t1 = create(&controller, "t1@example.com").await;
        let t2 = create(&controller, "t2@example.com").await;
        let t3 = create(&controller, "t3@example.com").await;

        let response = controller.list_users().await;
        assert_eq!(response.message(), "User list fetched successfully");

        let users: Vec<User> = serde_json::from_value(response.body.data.unwrap()).unwrap();
        let ids: Vec<Uuid> = users.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![t3.id, t2.id, t1.id]);
    }
}
