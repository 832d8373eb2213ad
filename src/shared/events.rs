/**
 * Realtime Gateway Event Envelopes
 *
 * Every frame on the gateway socket is a JSON object with a `type`
 * discriminator and the variant's fields at the same level. The two
 * enums here are the single source of truth for that wire format:
 * clients send `ClientEvent`, the server pushes `ServerEvent`.
 */
use serde::{Deserialize, Serialize};

use crate::shared::messages::{ChatMessage, NotificationPayload};

/// Frames a connected client may send to the gateway
///
/// Apart from `authenticate` itself, every event is rejected with a
/// sender-only error until the connection has authenticated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientEvent {
    /// Presents a JWT; must be the first event on the socket
    #[serde(rename_all = "camelCase")]
    Authenticate { token: String },
    /// Subscribes the connection to a channel room
    #[serde(rename_all = "camelCase")]
    Join { channel_id: i64 },
    /// Unsubscribes from a channel room; a no-op when not joined
    #[serde(rename_all = "camelCase")]
    Leave { channel_id: i64 },
    /// Appends a new text message to a channel
    #[serde(rename_all = "camelCase")]
    Message { channel_id: i64, content: String },
    /// Replaces the text content of an existing message
    #[serde(rename_all = "camelCase")]
    UpdateMessage {
        channel_id: i64,
        message_id: i64,
        content: String,
    },
    /// Removes an existing message
    #[serde(rename_all = "camelCase")]
    DeleteMessage { channel_id: i64, message_id: i64 },
}

/// Frames the gateway pushes to connected clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerEvent {
    /// Acknowledges a successful `authenticate`
    Authenticated,
    /// Sender-only failure report; the connection stays open
    #[serde(rename_all = "camelCase")]
    Error { message: String },
    /// A message was appended to a room this connection joined
    Message(ChatMessage),
    /// A message in a joined room was edited
    MessageUpdated(ChatMessage),
    /// A message in a joined room was removed
    #[serde(rename_all = "camelCase")]
    MessageDeleted { id: i64 },
    /// Workspace invitation notice, current alias
    Notification(NotificationPayload),
    /// Workspace invitation notice, older alias
    Invitation(NotificationPayload),
    /// Workspace invitation notice, oldest alias
    #[serde(rename = "global_invitation")]
    GlobalInvitation(NotificationPayload),
}
