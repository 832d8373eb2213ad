/**
 * Authentication Extractor
 *
 * This module turns a bearer token into a verified identity. The same
 * verification runs for REST requests (through the `AuthUser`
 * extractor) and for gateway sockets (through `authenticate_token`
 * called from the authenticate event), so the two entry points can
 * never drift apart on what counts as a valid session.
 */
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use sqlx::PgPool;

use crate::backend::auth::sessions::verify_token;
use crate::backend::auth::users::get_user_by_id;
use crate::backend::error::ApiError;

/// Authenticated user data extracted from a JWT token
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: i64,
    pub email: String,
}

/// Verify a bearer token and resolve it to an identity
///
/// 1. Verifies the token signature and expiry
/// 2. Parses the numeric user ID from the claims
/// 3. When a pool is available, checks the account still exists
///
/// The existence check is skipped without a database so the gateway
/// can still authenticate connections in storage-less development runs.
pub async fn authenticate_token(
    token: &str,
    pool: Option<&PgPool>,
) -> Result<AuthenticatedUser, ApiError> {
    let claims = verify_token(token).map_err(|e| {
        tracing::warn!("Invalid token: {:?}", e);
        ApiError::authentication("invalid or expired token")
    })?;

    let user_id = claims.user_id().ok_or_else(|| {
        tracing::warn!("Non-numeric subject in token: {}", claims.sub);
        ApiError::authentication("invalid token subject")
    })?;

    if let Some(pool) = pool {
        if get_user_by_id(pool, user_id).await?.is_none() {
            tracing::warn!("Token subject no longer exists: {}", user_id);
            return Err(ApiError::authentication("account no longer exists"));
        }
    }

    Ok(AuthenticatedUser {
        user_id,
        email: claims.email,
    })
}

/// Axum extractor for the authenticated user
///
/// Handlers take this as a parameter to require authentication; a
/// missing or invalid token rejects the request with a 401 before the
/// handler body runs.
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for AuthUser
where
    Option<PgPool>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| {
                tracing::warn!("Missing Authorization header");
                ApiError::authentication("missing authorization header")
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            tracing::warn!("Invalid Authorization header format");
            ApiError::authentication("authorization header must be a bearer token")
        })?;

        let pool = Option::<PgPool>::from_ref(state);
        let user = authenticate_token(token, pool.as_ref()).await?;

        Ok(AuthUser(user))
    }
}
