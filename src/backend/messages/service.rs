/**
 * Message Mutation Service
 *
 * Every way a message can change - REST handler or gateway event -
 * funnels through the three mutation functions in this module, so both
 * entry points validate, authorize and persist identically. The entry
 * points differ only in what they do with the result: the gateway
 * broadcasts it, REST returns it in the response body and broadcasts
 * nothing.
 *
 * # Check Ordering
 *
 * Mutations on an existing message always check in the same order:
 *
 * 1. Does the message exist? (`NotFound`)
 * 2. Is the caller its author? (`Authorization`)
 * 3. Is the new content acceptable? (`Validation`)
 *
 * A caller sending garbage at someone else's message learns it is
 * forbidden, not that their content was bad; a caller probing deleted
 * IDs learns nothing about authorship.
 */
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::backend::error::ApiError;
use crate::backend::messages::db;
use crate::backend::messages::uploads;
use crate::backend::middleware::auth::AuthenticatedUser;
use crate::backend::workspaces::db::{get_channel_by_id, is_workspace_member, Channel};
use crate::shared::messages::{merge_image_urls, ChatMessage};

/// Page size used when a history request does not name one
pub const DEFAULT_PAGE_SIZE: i64 = 50;

/// Outcome of a successful removal
///
/// Carries the channel alongside the ID so the gateway can route the
/// deletion broadcast without trusting client-supplied routing fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletedMessage {
    pub id: i64,
    pub channel_id: i64,
}

/// Check that new-message input carries something to store
///
/// A message needs text or at least one image; whitespace-only text
/// counts as absent.
pub fn validate_message_content(content: Option<&str>, image_count: usize) -> Result<(), ApiError> {
    let has_text = content.map(|c| !c.trim().is_empty()).unwrap_or(false);
    if !has_text && image_count == 0 {
        return Err(ApiError::validation("message content cannot be empty"));
    }
    Ok(())
}

/// Resolve a channel and require the user to belong to its workspace
///
/// # Errors
///
/// * `NotFound` - The channel does not exist
/// * `Authorization` - The user is outside the channel's workspace
pub async fn ensure_channel_member(
    pool: &PgPool,
    channel_id: i64,
    user_id: i64,
) -> Result<Channel, ApiError> {
    let channel = get_channel_by_id(pool, channel_id)
        .await?
        .ok_or_else(|| ApiError::not_found("channel not found"))?;

    if !is_workspace_member(pool, channel.workspace_id, user_id).await? {
        return Err(ApiError::authorization(
            "you are not a member of this channel's workspace",
        ));
    }

    Ok(channel)
}

/// Append a new message to a channel
///
/// Image URLs are expected to already be stored; this function only
/// records them. Blank text with attached images is stored as a
/// content-less image message.
pub async fn append_message(
    pool: &PgPool,
    channel_id: i64,
    author: &AuthenticatedUser,
    content: Option<&str>,
    image_urls: &[String],
) -> Result<ChatMessage, ApiError> {
    ensure_channel_member(pool, channel_id, author.user_id).await?;
    validate_message_content(content, image_urls.len())?;

    let user = crate::backend::auth::users::get_user_by_id(pool, author.user_id)
        .await?
        .ok_or_else(|| ApiError::authentication("account no longer exists"))?;

    let content = content.filter(|c| !c.trim().is_empty());
    let images_json = if image_urls.is_empty() {
        None
    } else {
        Some(serde_json::to_string(image_urls)?)
    };

    let row = db::insert_message(
        pool,
        channel_id,
        user.id,
        &user.username,
        user.avatar_url.as_deref(),
        content,
        images_json.as_deref(),
    )
    .await?;

    tracing::debug!("Message {} appended to channel {}", row.id, channel_id);
    Ok(row.into_chat_message())
}

/// Replace the text content of an existing message
///
/// Only the author may edit, and edited text cannot be blank even on a
/// message that carries images.
pub async fn edit_message(
    pool: &PgPool,
    actor: &AuthenticatedUser,
    message_id: i64,
    content: &str,
) -> Result<ChatMessage, ApiError> {
    let row = db::fetch_message(pool, message_id)
        .await?
        .ok_or_else(|| ApiError::not_found("message not found"))?;

    if row.author_id != actor.user_id {
        return Err(ApiError::authorization(
            "only the author can edit a message",
        ));
    }

    if content.trim().is_empty() {
        return Err(ApiError::validation("message content cannot be empty"));
    }

    let updated = db::update_message_content(pool, message_id, content).await?;

    tracing::debug!("Message {} edited in channel {}", updated.id, updated.channel_id);
    Ok(updated.into_chat_message())
}

/// Remove an existing message and its stored image files
///
/// The row is deleted first; file removal happens afterwards and never
/// fails the operation. A file that cannot be removed only leaks disk
/// space, while a row that outlives its files would keep serving dead
/// image URLs.
pub async fn remove_message(
    pool: &PgPool,
    upload_dir: &str,
    actor: &AuthenticatedUser,
    message_id: i64,
) -> Result<DeletedMessage, ApiError> {
    let row = db::fetch_message(pool, message_id)
        .await?
        .ok_or_else(|| ApiError::not_found("message not found"))?;

    if row.author_id != actor.user_id {
        return Err(ApiError::authorization(
            "only the author can delete a message",
        ));
    }

    let image_urls = merge_image_urls(row.images.as_deref(), row.image_url.as_deref());
    let deleted = DeletedMessage {
        id: row.id,
        channel_id: row.channel_id,
    };

    db::delete_message(pool, message_id).await?;
    uploads::delete_image_files(upload_dir, &image_urls).await;

    tracing::debug!("Message {} removed from channel {}", deleted.id, deleted.channel_id);
    Ok(deleted)
}

/// List one page of a channel's history in chronological order
///
/// The newest `limit` messages (after `offset`) are fetched and then
/// reversed, so the page reads oldest-to-newest while pagination still
/// walks backwards from the most recent message.
pub async fn list_messages(
    pool: &PgPool,
    actor: &AuthenticatedUser,
    channel_id: i64,
    limit: Option<i64>,
    offset: Option<i64>,
) -> Result<Vec<ChatMessage>, ApiError> {
    ensure_channel_member(pool, channel_id, actor.user_id).await?;

    let limit = match limit {
        Some(value) if value > 0 => value,
        _ => DEFAULT_PAGE_SIZE,
    };
    let offset = offset.unwrap_or(0).max(0);

    let mut rows = db::fetch_page(pool, channel_id, limit, offset).await?;
    rows.reverse();

    Ok(rows.into_iter().map(|row| row.into_chat_message()).collect())
}

/// List every message strictly newer than a timestamp, oldest first
pub async fn list_messages_after(
    pool: &PgPool,
    actor: &AuthenticatedUser,
    channel_id: i64,
    after: DateTime<Utc>,
) -> Result<Vec<ChatMessage>, ApiError> {
    ensure_channel_member(pool, channel_id, actor.user_id).await?;

    let rows = db::fetch_after(pool, channel_id, after).await?;
    Ok(rows.into_iter().map(|row| row.into_chat_message()).collect())
}
