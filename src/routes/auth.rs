/// Authentication Routes
///
/// Handles login and refresh-token rotation.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::auth::{issue_token_pair, refresh_token_pair, sha256_digest, Subject};
use crate::configuration::JwtSettings;
use crate::db;
use crate::error::{AppError, AuthError, ErrorContext};
use crate::validators::{is_valid_password, is_valid_username};

/// User login request
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Token refresh request
#[derive(Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Authentication response with access and refresh tokens
#[derive(Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// POST /account/login
///
/// Authenticate with username and password.
/// Returns an access/refresh token pair on success.
///
/// # Errors
/// - 400: Validation error (malformed username or password)
/// - 401: `LOGIN_FAILED` — unknown username and wrong password produce
///   the same response, so usernames cannot be enumerated
/// - 500: Internal server error
pub async fn login(
    form: web::Json<LoginRequest>,
    pool: web::Data<PgPool>,
    jwt_config: web::Data<JwtSettings>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("user_login");

    let username = is_valid_username(&form.username)?;
    let password = is_valid_password(&form.password)?;

    // Only the digest crosses into the data layer.
    let digest = sha256_digest(&password);

    let user = db::users::find_user_by_credentials(pool.get_ref(), &username, &digest)
        .await?
        .ok_or(AuthError::LoginFailed)?;

    let subject = Subject {
        id: user.id,
        username: user.username,
    };
    let pair = issue_token_pair(&subject, jwt_config.get_ref())?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = subject.id,
        "User logged in successfully"
    );

    Ok(HttpResponse::Ok().json(AuthResponse {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
        token_type: "Bearer".to_string(),
        expires_in: jwt_config.access_token_expiry,
    }))
}

/// POST /account/refresh_token
///
/// Exchange a refresh token for a brand-new token pair.
///
/// Tokens are stateless; the presented refresh token is not recorded as
/// spent and stays valid until its own expiry.
///
/// # Errors
/// - 401: `REFRESH_TOKEN_INVALID` — expired, tampered, or wrong-kind
///   tokens all produce the same response
pub async fn refresh_token(
    form: web::Json<RefreshRequest>,
    jwt_config: web::Data<JwtSettings>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("token_refresh");

    let pair = refresh_token_pair(&form.refresh_token, jwt_config.get_ref())?;

    tracing::info!(
        request_id = %context.request_id,
        "Token pair rotated successfully"
    );

    Ok(HttpResponse::Ok().json(AuthResponse {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
        token_type: "Bearer".to_string(),
        expires_in: jwt_config.access_token_expiry,
    }))
}
