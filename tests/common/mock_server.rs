//! Mock server helpers
//!
//! Wiremock fixtures for exercising the REST client and the poller
//! without a real backend.

use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Build a wire-shape message body the way the server would return it
pub fn message_json(id: i64, channel_id: i64, content: &str, seconds: i64) -> Value {
    let at = chrono::DateTime::from_timestamp(seconds, 0)
        .expect("valid timestamp")
        .to_rfc3339();
    json!({
        "id": id,
        "channelId": channel_id,
        "authorId": 1,
        "authorName": "ada",
        "authorAvatar": null,
        "content": content,
        "imageUrls": [],
        "createdAt": at,
        "updatedAt": at,
    })
}

/// Serve a fixed message page for a channel
pub async fn mount_message_page(server: &MockServer, channel_id: i64, messages: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/api/channels/{}/messages", channel_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(messages))
        .mount(server)
        .await;
}

/// Serve the standard error body for a method and path
pub async fn mount_error(
    server: &MockServer,
    http_method: &str,
    request_path: &str,
    status: u16,
    error: &str,
    message: &str,
) {
    Mock::given(method(http_method))
        .and(path(request_path))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({
            "error": error,
            "message": message,
        })))
        .mount(server)
        .await;
}
