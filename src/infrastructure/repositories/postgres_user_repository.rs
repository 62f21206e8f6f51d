use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::domain::repositories::user_repository::{StoreError, UserRepository};
use crate::domain::user::{CreateUser, UpdateUser, User};

const USER_COLUMNS: &str =
    "id, email, first_name, last_name, is_active, is_email_verified, created_at, updated_at";

/// Row shape of the `users` table
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    first_name: Option<String>,
    last_name: Option<String>,
    is_active: bool,
    is_email_verified: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(r: UserRow) -> Self {
        User {
            id: r.id,
            email: r.email,
            first_name: r.first_name,
            last_name: r.last_name,
            is_active: r.is_active,
            is_email_verified: r.is_email_verified,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// PostgreSQL implementation of UserRepository
///
/// The database assigns `id`, `created_at` and `updated_at`, and owns the
/// `users_email_key` unique constraint.
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a new PostgresUserRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn list(&self) -> Result<Vec<User>, StoreError> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users ORDER BY created_at DESC",
            USER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(classify)?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn create(&self, input: CreateUser) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (email, first_name, last_name, is_active, is_email_verified)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(input.email.into_inner())
        .bind(input.first_name)
        .bind(input.last_name)
        .bind(User::DEFAULT_IS_ACTIVE)
        .bind(User::DEFAULT_IS_EMAIL_VERIFIED)
        .fetch_one(&self.pool)
        .await
        .map_err(classify)?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(classify)?;

        Ok(row.map(User::from))
    }

    async fn update(&self, id: Uuid, changes: UpdateUser) -> Result<User, StoreError> {
        let mut query = QueryBuilder::<Postgres>::new("UPDATE users SET updated_at = NOW()");

        if let Some(email) = changes.email {
            query.push(", email = ").push_bind(email.into_inner());
        }
        if let Some(first_name) = changes.first_name {
            query.push(", first_name = ").push_bind(first_name);
        }
        if let Some(last_name) = changes.last_name {
            query.push(", last_name = ").push_bind(last_name);
        }
        if let Some(is_active) = changes.is_active {
            query.push(", is_active = ").push_bind(is_active);
        }
        if let Some(is_email_verified) = changes.is_email_verified {
            query
                .push(", is_email_verified = ")
                .push_bind(is_email_verified);
        }

        query.push(" WHERE id = ").push_bind(id);
        query.push(" RETURNING ").push(USER_COLUMNS);

        query
            .build_query_as::<UserRow>()
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)?
            .map(User::from)
            .ok_or_else(StoreError::update_target_missing)
    }

    async fn delete(&self, id: Uuid) -> Result<User, StoreError> {
        sqlx::query_as::<_, UserRow>(&format!(
            "DELETE FROM users WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(classify)?
        .map(User::from)
        .ok_or_else(StoreError::delete_target_missing)
    }
}

/// Sorts a sqlx failure into the store error taxonomy
fn classify(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::UniqueViolation {
            fields: db.constraint().map(constraint_fields).unwrap_or_default(),
        },
        sqlx::Error::Database(db) => match db.code() {
            Some(code) => StoreError::Known {
                code: code.into_owned(),
                message: db.message().to_string(),
            },
            None => StoreError::Unknown(db.to_string()),
        },
        other => StoreError::Unknown(other.to_string()),
    }
}

/// Recovers column names from a Postgres default unique constraint name
///
/// `users_email_key` becomes `["email"]`. Names that do not follow the
/// `<table>_<column>_key` convention are returned as is.
fn constraint_fields(constraint: &str) -> Vec<String> {
    let field = constraint
        .strip_prefix("users_")
        .and_then(|rest| rest.strip_suffix("_key"))
        .unwrap_or(constraint);

    vec![field.to_string()]
}
