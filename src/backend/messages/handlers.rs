/**
 * Message REST Handlers
 *
 * HTTP handlers for channel message history and mutations.
 *
 * # Endpoints
 *
 * - GET    /api/channels/{channel_id}/messages - List history
 * - POST   /api/channels/{channel_id}/messages - Append a message
 * - PATCH  /api/channels/{channel_id}/messages/{message_id} - Edit
 * - DELETE /api/channels/{channel_id}/messages/{message_id} - Remove
 *
 * These handlers never touch the gateway. A client that mutates over
 * REST is assumed to be polling; pushing a broadcast at it as well
 * would double-deliver its own action. Socket clients get their echo
 * because they mutate through gateway events instead.
 *
 * POST accepts either a JSON body (text-only messages) or a multipart
 * body (text plus image attachments); both forms go through the same
 * mutation service.
 */
use axum::{
    extract::{FromRequest, Multipart, Path, Query, Request, State},
    http::header,
    response::{IntoResponse, Json},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::backend::error::ApiError;
use crate::backend::messages::service;
use crate::backend::messages::uploads;
use crate::backend::middleware::auth::AuthUser;
use crate::backend::server::state::AppState;
use crate::shared::messages::{
    ChatMessage, DeleteMessageResponse, SendMessageRequest, UpdateMessageRequest,
};

/// Query parameters for the history endpoint
#[derive(Debug, Deserialize)]
pub struct ListMessagesParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    /// Cutoff for incremental mode; milliseconds or RFC 3339
    pub after: Option<String>,
}

/// Parse the `after` query parameter
///
/// Accepts a Unix millisecond timestamp or an RFC 3339 datetime, the
/// two formats polling clients have historically sent.
fn parse_after(raw: &str) -> Result<DateTime<Utc>, ApiError> {
    if let Ok(millis) = raw.parse::<i64>() {
        return DateTime::from_timestamp_millis(millis)
            .ok_or_else(|| ApiError::validation("after timestamp out of range"));
    }

    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            ApiError::validation("after must be a millisecond timestamp or an RFC 3339 datetime")
        })
}

/// History responses must never be cached; pollers rely on every
/// request hitting the server
fn no_cache_headers() -> [(header::HeaderName, &'static str); 3] {
    [
        (header::CACHE_CONTROL, "no-cache, no-store, must-revalidate"),
        (header::PRAGMA, "no-cache"),
        (header::EXPIRES, "0"),
    ]
}

/// List a channel's message history
///
/// Without `after`: one page, chronological, `limit`/`offset` walking
/// backwards from the newest message. With `after`: every message
/// strictly newer than the cutoff, chronological, no paging.
pub async fn list_messages(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(channel_id): Path<i64>,
    Query(params): Query<ListMessagesParams>,
) -> Result<impl IntoResponse, ApiError> {
    let pool = state.pool()?;

    let messages = match params.after.as_deref() {
        Some(raw) => {
            let after = parse_after(raw)?;
            service::list_messages_after(pool, &user, channel_id, after).await?
        }
        None => {
            service::list_messages(pool, &user, channel_id, params.limit, params.offset).await?
        }
    };

    Ok((no_cache_headers(), Json(messages)))
}

/// Append a message to a channel
///
/// Dispatches on the request content type: multipart bodies may carry
/// up to 5 images plus optional text, JSON bodies carry text only.
pub async fn create_message(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(channel_id): Path<i64>,
    request: Request,
) -> Result<Json<ChatMessage>, ApiError> {
    let pool = state.pool()?;

    // Membership is checked before the body is consumed so image
    // uploads from non-members are never written to disk
    service::ensure_channel_member(pool, channel_id, user.user_id).await?;

    let is_multipart = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("multipart/form-data"))
        .unwrap_or(false);

    if is_multipart {
        let mut multipart = Multipart::from_request(request, &state).await.map_err(|e| {
            tracing::warn!("Rejected multipart body: {}", e);
            ApiError::validation("malformed multipart body")
        })?;

        let (content, images) = uploads::collect_multipart(&mut multipart).await?;
        service::validate_message_content(content.as_deref(), images.len())?;

        let image_urls = uploads::store_images(&state.upload_dir, &images).await?;

        let appended =
            service::append_message(pool, channel_id, &user, content.as_deref(), &image_urls)
                .await;

        match appended {
            Ok(message) => Ok(Json(message)),
            Err(err) => {
                // The row never landed, so the files are orphans
                uploads::delete_image_files(&state.upload_dir, &image_urls).await;
                Err(err)
            }
        }
    } else {
        let Json(body) = Json::<SendMessageRequest>::from_request(request, &state)
            .await
            .map_err(|e| {
                tracing::warn!("Rejected message body: {}", e);
                ApiError::validation("malformed request body")
            })?;

        let message =
            service::append_message(pool, channel_id, &user, Some(&body.content), &[]).await?;
        Ok(Json(message))
    }
}

/// Edit a message's text content
///
/// The channel path segment is routing decoration; the message is
/// located by ID and its stored channel is authoritative.
pub async fn update_message(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path((_channel_id, message_id)): Path<(i64, i64)>,
    Json(request): Json<UpdateMessageRequest>,
) -> Result<Json<ChatMessage>, ApiError> {
    let pool = state.pool()?;
    let updated = service::edit_message(pool, &user, message_id, &request.content).await?;
    Ok(Json(updated))
}

/// Remove a message
pub async fn delete_message(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path((_channel_id, message_id)): Path<(i64, i64)>,
) -> Result<Json<DeleteMessageResponse>, ApiError> {
    let pool = state.pool()?;
    let deleted = service::remove_message(pool, &state.upload_dir, &user, message_id).await?;
    Ok(Json(DeleteMessageResponse { id: deleted.id }))
}
