/**
 * Error Conversion
 *
 * This module provides conversion implementations for `ApiError`,
 * turning storage failures into categorized errors and categorized
 * errors into HTTP responses.
 *
 * # Response Format
 *
 * Error responses are returned as JSON with the following structure:
 * ```json
 * {
 *   "error": "validation",
 *   "message": "message content cannot be empty"
 * }
 * ```
 *
 * The `error` field is the stable category tag; clients branch on it.
 * The `message` field is for humans and may change between releases.
 */
use axum::{
    response::{IntoResponse, Response},
    Json,
};

use crate::backend::error::types::ApiError;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = serde_json::json!({
            "error": self.tag(),
            "message": self.message(),
        });
        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    /// Maps a missing row to `NotFound` and everything else to
    /// `Persistence`. Callers that can say *what* was not found should
    /// check existence themselves and use `ApiError::not_found` with a
    /// specific message instead of relying on this blanket mapping.
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::not_found("record not found"),
            other => {
                tracing::error!("database error: {}", other);
                ApiError::persistence("database operation failed")
            }
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("serialization error: {}", err);
        ApiError::persistence("failed to serialize stored data")
    }
}
