/**
 * Login Handler
 *
 * This module implements the user authentication handler for POST /api/auth/login.
 *
 * # Authentication Process
 *
 * 1. Look up user by username or email
 * 2. Verify password using bcrypt
 * 3. Generate JWT token
 * 4. Return token and user info
 *
 * # Security
 *
 * - Unknown user and wrong password return the same error, so the
 *   endpoint cannot be used to probe which accounts exist
 * - Passwords are never logged or returned in responses
 */
use axum::{extract::State, response::Json};
use bcrypt::verify;
use sqlx::PgPool;

use crate::backend::auth::handlers::types::{AuthResponse, LoginRequest, UserResponse};
use crate::backend::auth::sessions::create_token;
use crate::backend::auth::users::{get_user_by_email, get_user_by_username};
use crate::backend::error::ApiError;

/// Login handler
///
/// Verifies the username (or email) and password, and returns a JWT
/// token if authentication succeeds.
///
/// # Errors
///
/// * `Authentication` - Unknown user or wrong password
/// * `Persistence` - Database not configured, or a storage step failed
pub async fn login(
    State(pool): State<Option<PgPool>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let pool = pool.ok_or_else(|| {
        tracing::error!("Database not configured");
        ApiError::persistence("database not configured")
    })?;
    tracing::info!("Login request for: {}", request.username);

    // An '@' means the caller typed their email instead of a username
    let user = if request.username.contains('@') {
        get_user_by_email(&pool, &request.username).await?
    } else {
        get_user_by_username(&pool, &request.username).await?
    };

    let user = user.ok_or_else(|| {
        tracing::warn!("User not found: {}", request.username);
        ApiError::authentication("invalid credentials")
    })?;

    let valid = verify(&request.password, &user.password_hash).map_err(|e| {
        tracing::error!("Password verification error: {:?}", e);
        ApiError::persistence("failed to verify password")
    })?;

    if !valid {
        tracing::warn!("Invalid password for user: {}", request.username);
        return Err(ApiError::authentication("invalid credentials"));
    }

    let token = create_token(user.id, user.email.clone()).map_err(|e| {
        tracing::error!("Failed to create token: {:?}", e);
        ApiError::persistence("failed to create session token")
    })?;

    tracing::info!("User logged in successfully: {} ({})", user.username, user.email);

    Ok(Json(AuthResponse {
        token,
        user: UserResponse {
            id: user.id,
            username: user.username,
            email: user.email,
            avatar_url: user.avatar_url,
        },
    }))
}
