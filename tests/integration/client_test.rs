//! Client-side sync integration tests
//!
//! Exercises the REST client and the channel poller against a wiremock
//! server. No database or gateway singleton is involved, so these tests
//! run in parallel.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use huddle::client::{ApiClient, ChannelPoller, ClientError, ImageAttachment};

use crate::common::mock_server::{message_json, mount_error, mount_message_page};
use crate::{assert_err, assert_ok};

fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(server.uri(), "test-token")
}

#[tokio::test]
async fn test_list_messages_decodes_wire_records() {
    let server = MockServer::start().await;
    mount_message_page(
        &server,
        42,
        json!([
            message_json(1, 42, "first", 100),
            message_json(2, 42, "second", 200),
        ]),
    )
    .await;

    let messages = assert_ok!(client_for(&server).list_messages(42, None, None).await);

    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].id, 1);
    assert_eq!(messages[0].channel_id, 42);
    assert_eq!(messages[0].author_name, "ada");
    assert_eq!(messages[0].content.as_deref(), Some("first"));
    assert!(messages[0].image_urls.is_empty());
    assert!(messages[1].created_at > messages[0].created_at);
}

#[tokio::test]
async fn test_error_body_becomes_api_error() {
    let server = MockServer::start().await;
    mount_error(
        &server,
        "POST",
        "/api/channels/42/messages",
        403,
        "authorization",
        "you are not a member of this channel",
    )
    .await;

    let result = client_for(&server).send_message(42, "hello").await;

    match result {
        Err(ClientError::Api {
            status,
            error,
            message,
        }) => {
            assert_eq!(status, 403);
            assert_eq!(error, "authorization");
            assert_eq!(message, "you are not a member of this channel");
        }
        other => panic!("expected ClientError::Api, got {:?}", other),
    }
}

#[tokio::test]
async fn test_non_json_error_body_falls_back_to_status_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/channels/42/messages"))
        .respond_with(ResponseTemplate::new(500).set_body_string("nginx exploded"))
        .mount(&server)
        .await;

    let result = client_for(&server).list_messages(42, None, None).await;

    match result {
        Err(ClientError::Api {
            status,
            error,
            message,
        }) => {
            assert_eq!(status, 500);
            assert_eq!(error, "unknown");
            assert_eq!(message, "Internal Server Error");
        }
        other => panic!("expected ClientError::Api, got {:?}", other),
    }
}

#[tokio::test]
async fn test_pagination_parameters_reach_the_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/channels/42/messages"))
        .and(query_param("limit", "2"))
        .and(query_param("offset", "4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    // Only matches when both parameters are present, so an Ok response
    // proves they were sent
    let page = assert_ok!(client_for(&server).list_messages(42, Some(2), Some(4)).await);
    assert!(page.is_empty());
}

#[tokio::test]
async fn test_after_parameter_reaches_the_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/channels/42/messages"))
        .and(query_param("after", "123456789"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([message_json(3, 42, "newer", 300)])),
        )
        .mount(&server)
        .await;

    let newer = assert_ok!(client_for(&server).list_messages_after(42, 123_456_789).await);
    assert_eq!(newer.len(), 1);
    assert_eq!(newer[0].id, 3);
}

#[tokio::test]
async fn test_poller_initial_fetch_populates_the_list() {
    let server = MockServer::start().await;
    mount_message_page(&server, 42, json!([message_json(1, 42, "hello", 100)])).await;

    let poller = ChannelPoller::start(client_for(&server), 42);
    tokio::time::sleep(Duration::from_millis(300)).await;

    let messages = poller.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].content.as_deref(), Some("hello"));
    assert_eq!(poller.last_error(), None);
    poller.stop();
}

#[tokio::test]
async fn test_poller_records_fetch_errors_and_keeps_state() {
    let server = MockServer::start().await;
    mount_error(
        &server,
        "GET",
        "/api/channels/42/messages",
        500,
        "persistence",
        "database error",
    )
    .await;

    let poller = ChannelPoller::start(client_for(&server), 42);
    tokio::time::sleep(Duration::from_millis(300)).await;

    assert!(poller.messages().is_empty());
    let error = poller.last_error().expect("fetch error should be recorded");
    assert!(error.contains("500"), "got: {}", error);
    poller.stop();
}

#[tokio::test]
async fn test_poller_send_appends_the_confirmed_record() {
    let server = MockServer::start().await;
    mount_message_page(&server, 42, json!([])).await;
    Mock::given(method("POST"))
        .and(path("/api/channels/42/messages"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(message_json(7, 42, "sent", 700)),
        )
        .mount(&server)
        .await;

    let poller = ChannelPoller::start(client_for(&server), 42);
    tokio::time::sleep(Duration::from_millis(200)).await;

    let record = assert_ok!(poller.send("sent", Vec::new()).await);
    assert_eq!(record.id, 7);

    // Appended immediately from the response, no poll needed
    let messages = poller.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].id, 7);
    poller.stop();
}

#[tokio::test]
async fn test_poller_failed_update_leaves_state_untouched() {
    let server = MockServer::start().await;
    mount_message_page(&server, 42, json!([message_json(1, 42, "original", 100)])).await;
    mount_error(
        &server,
        "PATCH",
        "/api/channels/42/messages/1",
        403,
        "authorization",
        "only the author can edit a message",
    )
    .await;

    let poller = ChannelPoller::start(client_for(&server), 42);
    tokio::time::sleep(Duration::from_millis(200)).await;

    let result = poller.update(1, "hijacked").await;
    assert_err!(result, ClientError::Api { status: 403, .. });

    let messages = poller.messages();
    assert_eq!(messages[0].content.as_deref(), Some("original"));
    poller.stop();
}

#[tokio::test]
async fn test_poller_delete_confirms_before_removing() {
    let server = MockServer::start().await;
    mount_message_page(&server, 42, json!([message_json(1, 42, "keep or kill", 100)])).await;
    Mock::given(method("DELETE"))
        .and(path("/api/channels/42/messages/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 1 })))
        .mount(&server)
        .await;
    mount_error(
        &server,
        "DELETE",
        "/api/channels/42/messages/9",
        404,
        "not_found",
        "message not found",
    )
    .await;

    let poller = ChannelPoller::start(client_for(&server), 42);
    tokio::time::sleep(Duration::from_millis(200)).await;

    // A rejected delete must not touch the list
    let rejected = poller.delete(9).await;
    assert_err!(rejected, ClientError::Api { status: 404, .. });
    assert_eq!(poller.messages().len(), 1);

    assert_ok!(poller.delete(1).await);
    assert!(poller.messages().is_empty());
    poller.stop();
}

#[tokio::test]
async fn test_image_send_schedules_a_delayed_refetch() {
    let server = MockServer::start().await;

    // The initial poll sees an empty channel; the refetch a second
    // later sees the record with its server-assigned image URL
    Mock::given(method("GET"))
        .and(path("/api/channels/42/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    let mut with_image = message_json(7, 42, "look at this", 700);
    with_image["imageUrls"] = json!(["/uploads/pic.png"]);
    Mock::given(method("GET"))
        .and(path("/api/channels/42/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([with_image])))
        .mount(&server)
        .await;

    // The immediate response carries no image URL yet
    Mock::given(method("POST"))
        .and(path("/api/channels/42/messages"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(message_json(7, 42, "look at this", 700)),
        )
        .mount(&server)
        .await;

    let poller = ChannelPoller::start(client_for(&server), 42);
    tokio::time::sleep(Duration::from_millis(200)).await;

    let image = ImageAttachment {
        file_name: "pic.png".to_string(),
        content_type: "image/png".to_string(),
        data: vec![0x89, 0x50, 0x4e, 0x47],
    };
    assert_ok!(poller.send("look at this", vec![image]).await);
    assert!(poller.messages()[0].image_urls.is_empty());

    // Past the one second refetch delay, well before the next poll tick
    tokio::time::sleep(Duration::from_millis(1300)).await;
    assert_eq!(poller.messages()[0].image_urls, vec!["/uploads/pic.png"]);
    poller.stop();
}
