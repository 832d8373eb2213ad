//! Database operations for chat messages
//!
//! Messages denormalize the author's name and avatar at insert time so
//! reads never join the users table. Attached images live in two
//! columns for historical reasons: `images` holds a JSON array of URLs
//! on rows written by current code, `image_url` holds the single URL
//! older rows were written with. `MessageRow::into_chat_message` merges
//! the two into the one list clients see.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::shared::messages::{merge_image_urls, ChatMessage};

/// A message row as stored, before image column merging
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MessageRow {
    pub id: i64,
    pub channel_id: i64,
    pub author_id: i64,
    pub author_name: String,
    pub author_avatar: Option<String>,
    pub content: Option<String>,
    /// JSON array of image URLs, current format
    pub images: Option<String>,
    /// Single image URL, legacy format
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MessageRow {
    /// Convert to the wire shape, merging both image columns
    pub fn into_chat_message(self) -> ChatMessage {
        let image_urls = merge_image_urls(self.images.as_deref(), self.image_url.as_deref());
        ChatMessage {
            id: self.id,
            channel_id: self.channel_id,
            author_id: self.author_id,
            author_name: self.author_name,
            author_avatar: self.author_avatar,
            content: self.content,
            image_urls,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Insert a message and return the stored row
pub async fn insert_message(
    pool: &PgPool,
    channel_id: i64,
    author_id: i64,
    author_name: &str,
    author_avatar: Option<&str>,
    content: Option<&str>,
    images_json: Option<&str>,
) -> Result<MessageRow, sqlx::Error> {
    sqlx::query_as::<_, MessageRow>(
        r#"
        INSERT INTO messages (channel_id, author_id, author_name, author_avatar, content, images)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, channel_id, author_id, author_name, author_avatar, content, images, image_url, created_at, updated_at
        "#,
    )
    .bind(channel_id)
    .bind(author_id)
    .bind(author_name)
    .bind(author_avatar)
    .bind(content)
    .bind(images_json)
    .fetch_one(pool)
    .await
}

/// Get a message by ID
pub async fn fetch_message(
    pool: &PgPool,
    message_id: i64,
) -> Result<Option<MessageRow>, sqlx::Error> {
    sqlx::query_as::<_, MessageRow>(
        r#"
        SELECT id, channel_id, author_id, author_name, author_avatar, content, images, image_url, created_at, updated_at
        FROM messages
        WHERE id = $1
        "#,
    )
    .bind(message_id)
    .fetch_optional(pool)
    .await
}

/// Fetch one page of a channel's history, newest first
///
/// Rows sharing a timestamp are ordered by ID so pagination never
/// skips or repeats a message.
pub async fn fetch_page(
    pool: &PgPool,
    channel_id: i64,
    limit: i64,
    offset: i64,
) -> Result<Vec<MessageRow>, sqlx::Error> {
    sqlx::query_as::<_, MessageRow>(
        r#"
        SELECT id, channel_id, author_id, author_name, author_avatar, content, images, image_url, created_at, updated_at
        FROM messages
        WHERE channel_id = $1
        ORDER BY created_at DESC, id DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(channel_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

/// Fetch every message strictly newer than a timestamp, oldest first
pub async fn fetch_after(
    pool: &PgPool,
    channel_id: i64,
    after: DateTime<Utc>,
) -> Result<Vec<MessageRow>, sqlx::Error> {
    sqlx::query_as::<_, MessageRow>(
        r#"
        SELECT id, channel_id, author_id, author_name, author_avatar, content, images, image_url, created_at, updated_at
        FROM messages
        WHERE channel_id = $1 AND created_at > $2
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(channel_id)
    .bind(after)
    .fetch_all(pool)
    .await
}

/// Replace a message's text content and return the updated row
pub async fn update_message_content(
    pool: &PgPool,
    message_id: i64,
    content: &str,
) -> Result<MessageRow, sqlx::Error> {
    sqlx::query_as::<_, MessageRow>(
        r#"
        UPDATE messages
        SET content = $2, updated_at = NOW()
        WHERE id = $1
        RETURNING id, channel_id, author_id, author_name, author_avatar, content, images, image_url, created_at, updated_at
        "#,
    )
    .bind(message_id)
    .bind(content)
    .fetch_one(pool)
    .await
}

/// Delete a message row
pub async fn delete_message(pool: &PgPool, message_id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM messages WHERE id = $1")
        .bind(message_id)
        .execute(pool)
        .await?;

    Ok(())
}
