/**
 * Backend Error Types
 *
 * This module defines the error categories used across HTTP handlers,
 * the message mutation service and the gateway dispatch path. Every
 * failure the server reports to a client is one of these five
 * categories; the category decides the HTTP status code and the stable
 * `error` tag in the response body.
 *
 * # Error Categories
 *
 * ## Validation (400)
 *
 * The request was understood but its content is unacceptable:
 * - Blank message content with no attached images
 * - Too many images, or an image that is too large
 * - An unsupported image content type
 *
 * ## Authentication (401)
 *
 * The caller did not prove who they are:
 * - Missing or malformed Authorization header
 * - Expired or otherwise invalid token
 *
 * ## Authorization (403)
 *
 * The caller is known but not allowed to do this:
 * - Editing or deleting another author's message
 * - Posting into a channel of a workspace they are not a member of
 *
 * ## NotFound (404)
 *
 * The referenced record does not exist.
 *
 * ## Persistence (500)
 *
 * The storage layer failed or is not configured.
 */
use axum::http::StatusCode;
use thiserror::Error;

/// The error type returned by every fallible server operation
///
/// The ordering of checks in callers matters: existence is checked
/// before permission, and permission before content validation, so a
/// caller probing with bad input cannot tell a missing record from a
/// forbidden one by the error category alone.
///
/// # Usage
///
/// ```rust
/// use huddle::backend::error::ApiError;
///
/// let err = ApiError::validation("message content cannot be empty");
/// assert_eq!(err.status_code().as_u16(), 400);
/// assert_eq!(err.tag(), "validation");
/// ```
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request content is unacceptable
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// The caller is not authenticated
    #[error("Authentication error: {message}")]
    Authentication { message: String },

    /// The caller is authenticated but not permitted
    #[error("Authorization error: {message}")]
    Authorization { message: String },

    /// The referenced record does not exist
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Storage failed or is unavailable
    #[error("Persistence error: {message}")]
    Persistence { message: String },
}

impl ApiError {
    /// Create a validation error (400)
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create an authentication error (401)
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Create an authorization error (403)
    pub fn authorization(message: impl Into<String>) -> Self {
        Self::Authorization {
            message: message.into(),
        }
    }

    /// Create a not-found error (404)
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a persistence error (500)
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `Validation` - 400 Bad Request
    /// - `Authentication` - 401 Unauthorized
    /// - `Authorization` - 403 Forbidden
    /// - `NotFound` - 404 Not Found
    /// - `Persistence` - 500 Internal Server Error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::Authentication { .. } => StatusCode::UNAUTHORIZED,
            Self::Authorization { .. } => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Persistence { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the stable category tag used in the `error` field of
    /// response bodies
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation",
            Self::Authentication { .. } => "authentication",
            Self::Authorization { .. } => "authorization",
            Self::NotFound { .. } => "not_found",
            Self::Persistence { .. } => "persistence",
        }
    }

    /// Get the human-readable error message
    pub fn message(&self) -> &str {
        match self {
            Self::Validation { message }
            | Self::Authentication { message }
            | Self::Authorization { message }
            | Self::NotFound { message }
            | Self::Persistence { message } => message,
        }
    }
}
