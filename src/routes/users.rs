/// User Management Routes
///
/// Protected CRUD over user accounts. Every handler here sits behind the
/// JWT middleware; the operator identity comes from the validated claims
/// and is recorded on each mutation.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::auth::{sha256_digest, Claims};
use crate::db;
use crate::error::{AppError, DatabaseError, ErrorContext, ValidationError};
use crate::validators::{is_valid_description, is_valid_password, is_valid_username};

const DEFAULT_PAGE_SIZE: i64 = 10;
const MAX_PAGE_SIZE: i64 = 100;

/// User list query parameters
#[derive(Deserialize)]
pub struct UserListQuery {
    #[serde(default)]
    pub search: String,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// User creation request
#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub description: String,
}

/// User update request
#[derive(Deserialize)]
pub struct UpdateUserRequest {
    pub id: i32,
    pub password: String,
    #[serde(default)]
    pub description: String,
}

/// User deletion request
#[derive(Deserialize)]
pub struct DeleteUserRequest {
    pub id: i32,
}

/// A single user row in list responses
#[derive(Serialize)]
pub struct UserSummary {
    pub id: i32,
    pub username: String,
    pub description: String,
    pub create_time: String,
}

/// User list response
#[derive(Serialize)]
pub struct UserListResponse {
    pub total: i64,
    pub list: Vec<UserSummary>,
}

/// Response for user mutations
#[derive(Serialize)]
pub struct UserIdResponse {
    pub user_id: i32,
}

/// GET /account/user
///
/// List live users, optionally filtered on username or description.
/// `limit` defaults to 10.
pub async fn list_users(
    query: web::Query<UserListQuery>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let limit = match query.limit {
        Some(limit) if limit > 0 => limit.min(MAX_PAGE_SIZE),
        _ => DEFAULT_PAGE_SIZE,
    };
    let offset = query.offset.unwrap_or(0).max(0);

    let (users, total) = db::users::list_users(pool.get_ref(), &query.search, limit, offset).await?;

    let list = users
        .into_iter()
        .map(|user| UserSummary {
            id: user.id,
            username: user.username,
            description: user.description.unwrap_or_default(),
            create_time: user.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        })
        .collect();

    Ok(HttpResponse::Ok().json(UserListResponse { total, list }))
}

/// POST /account/user
///
/// Create a new user. The username must not collide with a live user;
/// the password is stored as its digest, never as plaintext.
///
/// # Errors
/// - 400: Validation errors (username/password/description rules)
/// - 409: Username already registered
pub async fn create_user(
    form: web::Json<CreateUserRequest>,
    pool: web::Data<PgPool>,
    operator: web::ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("create_user");

    let username = is_valid_username(&form.username)?;
    let password = is_valid_password(&form.password)?;
    let description = is_valid_description(&form.description)?;

    if db::users::is_username_taken(pool.get_ref(), &username).await? {
        return Err(DatabaseError::UniqueConstraintViolation(
            "Username already registered".to_string(),
        )
        .into());
    }

    let user_id =
        db::users::insert_user(pool.get_ref(), &username, &sha256_digest(&password), &description)
            .await?;

    tracing::info!(
        request_id = %context.request_id,
        operator_id = %operator.sub,
        operator_name = %operator.username,
        user_id = user_id,
        username = %username,
        "User created"
    );

    Ok(HttpResponse::Created().json(UserIdResponse { user_id }))
}

/// PUT /account/user
///
/// Rewrite a user's password and description.
///
/// # Errors
/// - 400: Validation errors
/// - 404: No live user with this id
pub async fn update_user(
    form: web::Json<UpdateUserRequest>,
    pool: web::Data<PgPool>,
    operator: web::ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("update_user");

    if form.id <= 0 {
        return Err(ValidationError::InvalidFormat("id".to_string()).into());
    }
    let password = is_valid_password(&form.password)?;
    let description = is_valid_description(&form.description)?;

    db::users::find_user_by_id(pool.get_ref(), form.id)
        .await?
        .ok_or_else(|| DatabaseError::NotFound("User not found".to_string()))?;

    db::users::update_user(pool.get_ref(), form.id, &sha256_digest(&password), &description)
        .await?;

    tracing::info!(
        request_id = %context.request_id,
        operator_id = %operator.sub,
        operator_name = %operator.username,
        user_id = form.id,
        "User updated"
    );

    Ok(HttpResponse::Ok().json(UserIdResponse { user_id: form.id }))
}

/// DELETE /account/user
///
/// Soft-delete a user; the row is hidden, never removed.
///
/// # Errors
/// - 404: No live user with this id
pub async fn delete_user(
    form: web::Json<DeleteUserRequest>,
    pool: web::Data<PgPool>,
    operator: web::ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("delete_user");

    if form.id <= 0 {
        return Err(ValidationError::InvalidFormat("id".to_string()).into());
    }

    db::users::find_user_by_id(pool.get_ref(), form.id)
        .await?
        .ok_or_else(|| DatabaseError::NotFound("User not found".to_string()))?;

    db::users::soft_delete_user(pool.get_ref(), form.id).await?;

    tracing::info!(
        request_id = %context.request_id,
        operator_id = %operator.sub,
        operator_name = %operator.username,
        user_id = form.id,
        "User deleted"
    );

    Ok(HttpResponse::Ok().json(UserIdResponse { user_id: form.id }))
}
