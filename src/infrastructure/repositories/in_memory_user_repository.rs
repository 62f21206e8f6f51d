use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::repositories::user_repository::{StoreError, UserRepository};
use crate::domain::user::{CreateUser, UpdateUser, User};

#[derive(Debug, Clone)]
struct StoredUser {
    // insertion order, breaks ties between equal created_at values
    seq: u64,
    user: User,
}

#[derive(Debug, Default)]
struct State {
    next_seq: u64,
    users: HashMap<Uuid, StoredUser>,
}

/// In-memory implementation of UserRepository
///
/// Behaves like the Postgres adapter: unique emails, store-assigned ids and
/// timestamps, newest-first listing, missing-row errors on update/delete.
/// Used by tests and for running the API without a database.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    state: Arc<RwLock<State>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Current time, pushed past `after` if the clock has not moved
fn tick(after: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > after {
        now
    } else {
        after + Duration::microseconds(1)
    }
}

fn email_taken(state: &State, email: &str, except: Option<Uuid>) -> bool {
    state
        .users
        .values()
        .any(|s| s.user.email == email && Some(s.user.id) != except)
}

fn duplicate_email() -> StoreError {
    StoreError::UniqueViolation {
        fields: vec!["email".to_string()],
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn list(&self) -> Result<Vec<User>, StoreError> {
        let state = self.state.read().await;

        let mut stored: Vec<&StoredUser> = state.users.values().collect();
        stored.sort_by(|a, b| {
            b.user
                .created_at
                .cmp(&a.user.created_at)
                .then(b.seq.cmp(&a.seq))
        });

        Ok(stored.into_iter().map(|s| s.user.clone()).collect())
    }

    async fn create(&self, input: CreateUser) -> Result<User, StoreError> {
        let mut state = self.state.write().await;

        if email_taken(&state, input.email.as_str(), None) {
            return Err(duplicate_email());
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: input.email.into_inner(),
            first_name: input.first_name,
            last_name: input.last_name,
            is_active: User::DEFAULT_IS_ACTIVE,
            is_email_verified: User::DEFAULT_IS_EMAIL_VERIFIED,
            created_at: now,
            updated_at: now,
        };

        let seq = state.next_seq;
        state.next_seq += 1;
        state.users.insert(
            user.id,
            StoredUser {
                seq,
                user: user.clone(),
            },
        );

        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let state = self.state.read().await;
        Ok(state.users.get(&id).map(|s| s.user.clone()))
    }

    async fn update(&self, id: Uuid, changes: UpdateUser) -> Result<User, StoreError> {
        let mut state = self.state.write().await;

        if !state.users.contains_key(&id) {
            return Err(StoreError::update_target_missing());
        }
        if let Some(email) = &changes.email {
            if email_taken(&state, email.as_str(), Some(id)) {
                return Err(duplicate_email());
            }
        }

        let stored = state
            .users
            .get_mut(&id)
            .ok_or_else(StoreError::update_target_missing)?;
        let user = &mut stored.user;

        if let Some(email) = changes.email {
            user.email = email.into_inner();
        }
        if let Some(first_name) = changes.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = changes.last_name {
            user.last_name = last_name;
        }
        if let Some(is_active) = changes.is_active {
            user.is_active = is_active;
        }
        if let Some(is_email_verified) = changes.is_email_verified {
            user.is_email_verified = is_email_verified;
        }
        user.updated_at = tick(user.updated_at);

        Ok(user.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<User, StoreError> {
        let mut state = self.state.write().await;

        state
            .users
            .remove(&id)
            .map(|s| s.user)
            .ok_or_else(StoreError::delete_target_missing)
    }
}
