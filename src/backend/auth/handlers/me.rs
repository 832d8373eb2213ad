/**
 * Get Current User Handler
 *
 * This module implements the handler for GET /api/auth/me, which returns
 * information about the currently authenticated user.
 *
 * # Authentication
 *
 * This endpoint requires a valid JWT token in the `Authorization`
 * header. Token verification happens in the `AuthUser` extractor; this
 * handler only has to fetch the full user record.
 */
use axum::{extract::State, response::Json};
use sqlx::PgPool;

use crate::backend::auth::handlers::types::UserResponse;
use crate::backend::auth::users::get_user_by_id;
use crate::backend::error::ApiError;
use crate::backend::middleware::auth::AuthUser;

/// Get current user handler
///
/// # Errors
///
/// * `Authentication` - Missing or invalid token (raised by the extractor)
/// * `NotFound` - The account behind the token no longer exists
/// * `Persistence` - Database not configured, or the lookup failed
pub async fn get_me(
    State(pool): State<Option<PgPool>>,
    AuthUser(user): AuthUser,
) -> Result<Json<UserResponse>, ApiError> {
    let pool = pool.ok_or_else(|| {
        tracing::error!("Database not configured");
        ApiError::persistence("database not configured")
    })?;

    let record = get_user_by_id(&pool, user.user_id)
        .await?
        .ok_or_else(|| {
            tracing::warn!("User not found: {}", user.user_id);
            ApiError::not_found("user not found")
        })?;

    Ok(Json(UserResponse {
        id: record.id,
        username: record.username,
        email: record.email,
        avatar_url: record.avatar_url,
    }))
}
