/// User queries
///
/// Users are soft-deleted: `is_delete = true` hides a row from every
/// query here, the row itself is never removed. Credential lookup
/// compares the stored digest by equality, so the hasher feeding it must
/// stay deterministic.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::error::AppError;

/// A live user row as the handlers see it
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: i32,
    pub username: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Look up a live user by username and password digest.
///
/// The plaintext password never reaches this layer. A missing user and a
/// wrong digest are indistinguishable in the result.
pub async fn find_user_by_credentials(
    pool: &PgPool,
    username: &str,
    password_digest: &str,
) -> Result<Option<UserRecord>, AppError> {
    let row = sqlx::query_as::<_, (i32, String, Option<String>, DateTime<Utc>)>(
        r#"
        SELECT id, username, description, created_at
        FROM users
        WHERE username = $1 AND password = $2 AND is_delete = false
        "#,
    )
    .bind(username)
    .bind(password_digest)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|(id, username, description, created_at)| UserRecord {
        id,
        username,
        description,
        created_at,
    }))
}

/// Look up a live user by id.
pub async fn find_user_by_id(pool: &PgPool, user_id: i32) -> Result<Option<UserRecord>, AppError> {
    let row = sqlx::query_as::<_, (i32, String, Option<String>, DateTime<Utc>)>(
        r#"
        SELECT id, username, description, created_at
        FROM users
        WHERE id = $1 AND is_delete = false
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|(id, username, description, created_at)| UserRecord {
        id,
        username,
        description,
        created_at,
    }))
}

/// Check whether a live user already holds this username.
pub async fn is_username_taken(pool: &PgPool, username: &str) -> Result<bool, AppError> {
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1 AND is_delete = false)",
    )
    .bind(username)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}

/// Insert a new user; returns the generated id.
pub async fn insert_user(
    pool: &PgPool,
    username: &str,
    password_digest: &str,
    description: &str,
) -> Result<i32, AppError> {
    let user_id = sqlx::query_scalar::<_, i32>(
        r#"
        INSERT INTO users (username, password, is_delete, description, created_at, updated_at)
        VALUES ($1, $2, false, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(username)
    .bind(password_digest)
    .bind(description)
    .bind(Utc::now())
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(user_id)
}

/// Rewrite a user's password digest and description.
pub async fn update_user(
    pool: &PgPool,
    user_id: i32,
    password_digest: &str,
    description: &str,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        UPDATE users
        SET password = $1, description = $2, updated_at = $3
        WHERE id = $4 AND is_delete = false
        "#,
    )
    .bind(password_digest)
    .bind(description)
    .bind(Utc::now())
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Soft-delete a user.
pub async fn soft_delete_user(pool: &PgPool, user_id: i32) -> Result<(), AppError> {
    sqlx::query(
        r#"
        UPDATE users
        SET is_delete = true, updated_at = $1
        WHERE id = $2
        "#,
    )
    .bind(Utc::now())
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Page through live users, optionally filtering on username or
/// description. Returns the page plus the total match count.
pub async fn list_users(
    pool: &PgPool,
    search: &str,
    limit: i64,
    offset: i64,
) -> Result<(Vec<UserRecord>, i64), AppError> {
    let pattern = format!("%{}%", search);

    let total = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM users
        WHERE is_delete = false
          AND ($1 = '' OR username ILIKE $2 OR description ILIKE $2)
        "#,
    )
    .bind(search)
    .bind(&pattern)
    .fetch_one(pool)
    .await?;

    let rows = sqlx::query_as::<_, (i32, String, Option<String>, DateTime<Utc>)>(
        r#"
        SELECT id, username, description, created_at
        FROM users
        WHERE is_delete = false
          AND ($1 = '' OR username ILIKE $2 OR description ILIKE $2)
        ORDER BY id
        LIMIT $3 OFFSET $4
        "#,
    )
    .bind(search)
    .bind(&pattern)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let users = rows
        .into_iter()
        .map(|(id, username, description, created_at)| UserRecord {
            id,
            username,
            description,
            created_at,
        })
        .collect();

    Ok((users, total))
}
