//! User repository for database operations

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

const USER_COLUMNS: &str = "id, email, name, password_hash, is_active, is_staff, is_superuser, \
                            last_login, created_at, updated_at";

/// User record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for inserting a user. The email must already be normalized.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
}

/// Column changes for an existing user; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password_hash: Option<String>,
    pub is_active: Option<bool>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
}

/// User repository for database operations
pub struct UserRepository;

impl UserRepository {
    /// Insert a new user
    pub async fn create(pool: &PgPool, input: NewUser) -> Result<UserRecord> {
        let user = sqlx::query_as::<_, UserRecord>(&format!(
            r#"
            INSERT INTO users (email, name, password_hash, is_active, is_staff, is_superuser)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&input.email)
        .bind(&input.name)
        .bind(&input.password_hash)
        .bind(input.is_active)
        .bind(input.is_staff)
        .bind(input.is_superuser)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Find user by (normalized) email
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Find user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// List all users in creation order
    pub async fn list(pool: &PgPool) -> Result<Vec<UserRecord>> {
        let users = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at, id"
        ))
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    /// Apply column changes, returning the updated user
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        changes: UserChanges,
    ) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(&format!(
            r#"
            UPDATE users SET
                email = COALESCE($2, email),
                name = COALESCE($3, name),
                password_hash = COALESCE($4, password_hash),
                is_active = COALESCE($5, is_active),
                is_staff = COALESCE($6, is_staff),
                is_superuser = COALESCE($7, is_superuser),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.email)
        .bind(changes.name)
        .bind(changes.password_hash)
        .bind(changes.is_active)
        .bind(changes.is_staff)
        .bind(changes.is_superuser)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Record a successful login
    pub async fn touch_last_login(pool: &PgPool, id: Uuid) -> Result<()> {
        sqlx::query("UPDATE users SET last_login = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Check if email exists
    pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool> {
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)
            "#,
        )
        .bind(email)
        .fetch_one(pool)
        .await?;

        Ok(result)
    }
}
