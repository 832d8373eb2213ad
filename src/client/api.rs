/**
 * REST API Client
 *
 * This module provides an async client for the message and invitation
 * endpoints. It holds a base URL and a bearer token and decodes the
 * standard `{error, message}` body into `ClientError::Api` on non-2xx
 * responses.
 *
 * # Usage
 *
 * ```rust,no_run
 * use huddle::client::ApiClient;
 *
 * # async fn example() -> Result<(), huddle::client::ClientError> {
 * let api = ApiClient::new("http://127.0.0.1:3000", "jwt-token");
 * let messages = api.list_messages(42, None, None).await?;
 * # Ok(())
 * # }
 * ```
 */

use crate::client::error::ClientError;
use crate::shared::{
    ChatMessage, DeleteMessageResponse, Invitation, SendMessageRequest, UpdateMessageRequest,
};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// An image queued for upload alongside a message
#[derive(Debug, Clone)]
pub struct ImageAttachment {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Error body returned by the server on failures
#[derive(Deserialize)]
struct ApiErrorBody {
    error: String,
    message: String,
}

/// Async client for the REST API
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    token: String,
    client: Client,
}

impl ApiClient {
    /// Create a client for the given server and bearer token
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            token: token.into(),
            client: Client::new(),
        }
    }

    /// Build a full URL from an API path
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fetch a page of channel messages, oldest first
    ///
    /// `limit` and `offset` fall back to the server defaults when `None`.
    pub async fn list_messages(
        &self,
        channel_id: i64,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<ChatMessage>, ClientError> {
        let url = self.url(&format!("/api/channels/{}/messages", channel_id));

        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(offset) = offset {
            query.push(("offset", offset.to_string()));
        }

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .query(&query)
            .send()
            .await?;

        decode(response).await
    }

    /// Fetch every message created strictly after the given millisecond
    /// timestamp, oldest first
    pub async fn list_messages_after(
        &self,
        channel_id: i64,
        after_millis: i64,
    ) -> Result<Vec<ChatMessage>, ClientError> {
        let url = self.url(&format!("/api/channels/{}/messages", channel_id));

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .query(&[("after", after_millis.to_string())])
            .send()
            .await?;

        decode(response).await
    }

    /// Send a text-only message as JSON
    pub async fn send_message(
        &self,
        channel_id: i64,
        content: &str,
    ) -> Result<ChatMessage, ClientError> {
        let url = self.url(&format!("/api/channels/{}/messages", channel_id));
        let request = SendMessageRequest {
            content: content.to_string(),
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .json(&request)
            .send()
            .await?;

        decode(response).await
    }

    /// Send a message with image attachments as multipart form data
    ///
    /// The `content` field may be empty when at least one image is
    /// attached; the server rejects the send otherwise.
    pub async fn send_message_with_images(
        &self,
        channel_id: i64,
        content: &str,
        images: Vec<ImageAttachment>,
    ) -> Result<ChatMessage, ClientError> {
        let url = self.url(&format!("/api/channels/{}/messages", channel_id));

        let mut form = reqwest::multipart::Form::new().text("content", content.to_string());
        for (index, image) in images.into_iter().enumerate() {
            let part = reqwest::multipart::Part::bytes(image.data)
                .file_name(image.file_name)
                .mime_str(&image.content_type)?;
            form = form.part(format!("image_{}", index), part);
        }

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .multipart(form)
            .send()
            .await?;

        decode(response).await
    }

    /// Edit a message's text content
    pub async fn update_message(
        &self,
        channel_id: i64,
        message_id: i64,
        content: &str,
    ) -> Result<ChatMessage, ClientError> {
        let url = self.url(&format!(
            "/api/channels/{}/messages/{}",
            channel_id, message_id
        ));
        let request = UpdateMessageRequest {
            content: content.to_string(),
        };

        let response = self
            .client
            .patch(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .json(&request)
            .send()
            .await?;

        decode(response).await
    }

    /// Delete a message
    pub async fn delete_message(
        &self,
        channel_id: i64,
        message_id: i64,
    ) -> Result<DeleteMessageResponse, ClientError> {
        let url = self.url(&format!(
            "/api/channels/{}/messages/{}",
            channel_id, message_id
        ));

        let response = self
            .client
            .delete(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .send()
            .await?;

        decode(response).await
    }

    /// List pending workspace invitations for the current user
    ///
    /// Notifications are delivered live only while a gateway session is
    /// open; this is the recovery path for invitations issued while the
    /// user was offline.
    pub async fn pending_invitations(&self) -> Result<Vec<Invitation>, ClientError> {
        let url = self.url("/api/invitations");

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .send()
            .await?;

        decode(response).await
    }
}

/// Decode a response body, turning error statuses into `ClientError::Api`
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .json::<ApiErrorBody>()
            .await
            .unwrap_or_else(|_| ApiErrorBody {
                error: "unknown".to_string(),
                message: status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string(),
            });
        return Err(ClientError::Api {
            status: status.as_u16(),
            error: body.error,
            message: body.message,
        });
    }

    Ok(response.json::<T>().await?)
}
