/**
 * Chat Message Data Structures
 *
 * This module defines the message, invitation and notification types
 * exchanged between the server and its clients. The same structs are
 * serialized over the REST API and inside realtime gateway frames so
 * that both transports always agree on the wire shape.
 *
 * All wire fields use camelCase to match the JSON the web clients send.
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A single chat message inside a channel
///
/// This structure is used both on the server (as the REST and broadcast
/// payload) and on the client (for display and cache merging). Messages
/// carry either text content, attached images, or both.
///
/// # Fields
/// * `id` - Server-assigned identifier, unique and monotonically increasing
/// * `channel_id` - The channel this message belongs to
/// * `author_id` - Identifier of the user who sent the message
/// * `author_name` - Display name of the author at send time
/// * `author_avatar` - Optional avatar URL of the author
/// * `content` - Text body; `None` for image-only messages
/// * `image_urls` - Ordered list of attached image URLs, already merged
/// * `created_at` - Server timestamp when the message was stored
/// * `updated_at` - Server timestamp of the last edit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: i64,
    pub channel_id: i64,
    pub author_id: i64,
    pub author_name: String,
    pub author_avatar: Option<String>,
    pub content: Option<String>,
    #[serde(default)]
    pub image_urls: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload delivered to a user's personal room when a workspace
/// invitation is issued for them
///
/// The same payload is emitted under every notification alias so
/// clients at different versions all receive something they recognize.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPayload {
    /// Notification category, e.g. `workspace_invitation`
    pub kind: String,
    pub workspace_id: i64,
    pub workspace_name: String,
    pub sender_name: String,
    /// Invitation token the recipient can redeem
    pub token: String,
    pub created_at: DateTime<Utc>,
}

/// Request body for creating a message over the REST API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
}

/// Request body for editing an existing message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateMessageRequest {
    pub content: String,
}

/// Response body returned after a message was removed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteMessageResponse {
    pub id: i64,
}

/// A pending workspace invitation as returned by the REST API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Invitation {
    pub id: i64,
    pub workspace_id: i64,
    pub workspace_name: String,
    pub email: String,
    pub token: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Request body for inviting a user into a workspace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateInvitationRequest {
    pub email: String,
}

/// Merges the JSON image list column with the legacy single-URL column
/// into one ordered, de-duplicated list.
///
/// Rows written by older versions of the server stored a single image
/// URL in its own column; newer rows store a JSON array. A row migrated
/// in place can carry both, possibly naming the same file twice. The
/// merged view keeps the JSON array order, drops duplicates, and puts a
/// legacy URL not already present at the end.
///
/// Malformed JSON in `images_json` is treated as an empty list rather
/// than an error so one bad row cannot poison a whole page of messages.
pub fn merge_image_urls(images_json: Option<&str>, legacy_url: Option<&str>) -> Vec<String> {
    let mut urls: Vec<String> = images_json
        .and_then(|raw| serde_json::from_str(raw).ok())
        .unwrap_or_default();

    if let Some(legacy) = legacy_url {
        if !legacy.is_empty() {
            urls.push(legacy.to_string());
        }
    }

    let mut seen = HashSet::new();
    urls.retain(|url| !url.is_empty() && seen.insert(url.clone()));
    urls
}
