//! Gateway integration tests
//!
//! Runs the real server on an ephemeral port and talks to it over real
//! WebSocket connections. Tests without a database exercise the
//! handshake and sender-only error paths; database-backed tests cover
//! persistence plus broadcast and skip cleanly when `DATABASE_URL` is
//! not set.
//!
//! Every test here is `#[serial]`: they all share the process-wide
//! gateway singleton.

use futures_util::{SinkExt, StreamExt};
use serial_test::serial;
use sqlx::PgPool;
use tokio::time::{timeout, Duration};
use tokio_tungstenite::tungstenite::Message;

use huddle::backend::auth::sessions::create_token;
use huddle::backend::gateway::instance;
use huddle::backend::notifications::notify_workspace_invitation;
use huddle::backend::routes::create_router;
use huddle::backend::server::AppState;
use huddle::backend::workspaces::db::add_workspace_member;
use huddle::client::socket::GatewaySocket;
use huddle::client::{ApiClient, ClientError};
use huddle::shared::{ClientEvent, Invitation, ServerEvent};

use crate::assert_contains;
use crate::common::auth_helpers::create_unique_test_user;
use crate::common::database::{seed_workspace_with_channel, TestDatabase};

const RECV_TIMEOUT: Duration = Duration::from_secs(2);

/// Bind the full router on an ephemeral port with a fresh gateway
///
/// Returns the HTTP base URL and the gateway socket URL.
async fn start_test_server(db_pool: Option<PgPool>) -> (String, String) {
    instance::reset();
    let state = AppState {
        gateway: instance::get_or_init(),
        db_pool,
        upload_dir: "uploads".to_string(),
    };
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), format!("ws://{}/ws", addr))
}

async fn next_event(socket: &mut GatewaySocket) -> ServerEvent {
    timeout(RECV_TIMEOUT, socket.recv())
        .await
        .expect("timed out waiting for a gateway event")
        .expect("gateway connection closed")
}

#[tokio::test]
#[serial]
async fn test_join_before_authenticate_is_rejected_without_disconnect() {
    let (_, ws_url) = start_test_server(None).await;

    let (mut ws, _) = tokio_tungstenite::connect_async(&ws_url).await.unwrap();

    let join = serde_json::to_string(&ClientEvent::Join { channel_id: 42 }).unwrap();
    ws.send(Message::Text(join.into())).await.unwrap();

    let frame = timeout(RECV_TIMEOUT, ws.next())
        .await
        .expect("timed out")
        .expect("connection closed")
        .unwrap();
    let event: ServerEvent = match frame {
        Message::Text(text) => serde_json::from_str(text.as_str()).unwrap(),
        other => panic!("Expected text frame, got {:?}", other),
    };
    match event {
        ServerEvent::Error { message } => assert_contains!(message, "authenticate"),
        other => panic!("Expected error event, got {:?}", other),
    }

    // The same connection can still authenticate afterwards
    let token = create_token(7, "alice@example.com".to_string()).unwrap();
    let auth = serde_json::to_string(&ClientEvent::Authenticate { token }).unwrap();
    ws.send(Message::Text(auth.into())).await.unwrap();

    let frame = timeout(RECV_TIMEOUT, ws.next())
        .await
        .expect("timed out")
        .expect("connection closed")
        .unwrap();
    let event: ServerEvent = match frame {
        Message::Text(text) => serde_json::from_str(text.as_str()).unwrap(),
        other => panic!("Expected text frame, got {:?}", other),
    };
    assert_eq!(event, ServerEvent::Authenticated);
}

#[tokio::test]
#[serial]
async fn test_invalid_token_is_rejected() {
    let (_, ws_url) = start_test_server(None).await;

    match GatewaySocket::connect(&ws_url, "not-a-real-token").await {
        Err(ClientError::Gateway(message)) => assert_contains!(message, "authentication failed"),
        Err(other) => panic!("Expected gateway error, got {:?}", other),
        Ok(_) => panic!("Expected authentication to fail"),
    }
}

#[tokio::test]
#[serial]
async fn test_sender_only_errors_leave_the_session_usable() {
    let (_, ws_url) = start_test_server(None).await;

    let token = create_token(7, "alice@example.com".to_string()).unwrap();
    let mut socket = GatewaySocket::connect(&ws_url, &token).await.unwrap();

    socket.join(42).unwrap();

    // No database attached, so the mutation fails for the sender only
    socket.send_message(42, "hello").unwrap();
    match next_event(&mut socket).await {
        ServerEvent::Error { message } => assert_contains!(message, "database not configured"),
        other => panic!("Expected error event, got {:?}", other),
    }

    // The session survived its own error
    socket.send_message(42, "still here").unwrap();
    match next_event(&mut socket).await {
        ServerEvent::Error { message } => assert_contains!(message, "database not configured"),
        other => panic!("Expected error event, got {:?}", other),
    }
}

#[tokio::test]
#[serial]
async fn test_notification_fanout_reaches_connected_user() {
    let (_, ws_url) = start_test_server(None).await;

    let token = create_token(9, "bob@example.com".to_string()).unwrap();
    let mut socket = GatewaySocket::connect(&ws_url, &token).await.unwrap();

    // The server shares this process, so the fan-out sees its gateway
    let invitation = Invitation {
        id: 1,
        workspace_id: 5,
        workspace_name: "Design".to_string(),
        email: "bob@example.com".to_string(),
        token: "invite-token".to_string(),
        status: "pending".to_string(),
        created_at: chrono::Utc::now(),
    };
    assert!(notify_workspace_invitation(&invitation, "ada"));

    match next_event(&mut socket).await {
        ServerEvent::Notification(payload) => {
            assert_eq!(payload.kind, "workspace_invitation");
            assert_eq!(payload.workspace_name, "Design");
            assert_eq!(payload.sender_name, "ada");
            assert_eq!(payload.token, "invite-token");
        }
        other => panic!("Expected notification, got {:?}", other),
    }

    // Compatibility aliases follow, same payload under older names
    match next_event(&mut socket).await {
        ServerEvent::Invitation(payload) => assert_eq!(payload.workspace_name, "Design"),
        other => panic!("Expected invitation alias, got {:?}", other),
    }
    match next_event(&mut socket).await {
        ServerEvent::GlobalInvitation(payload) => assert_eq!(payload.workspace_name, "Design"),
        other => panic!("Expected global_invitation alias, got {:?}", other),
    }
}

#[tokio::test]
#[serial]
async fn test_broadcast_reaches_all_members_including_sender() {
    let Some(db) = TestDatabase::connect().await else { return };
    let (_, ws_url) = start_test_server(Some(db.pool().clone())).await;

    let author = create_unique_test_user(db.pool()).await.unwrap();
    let (workspace, channel) = seed_workspace_with_channel(db.pool(), author.id)
        .await
        .unwrap();
    let member = create_unique_test_user(db.pool()).await.unwrap();
    add_workspace_member(db.pool(), workspace.id, member.id)
        .await
        .unwrap();

    let mut sender = GatewaySocket::connect(&ws_url, &author.token).await.unwrap();
    let mut receiver = GatewaySocket::connect(&ws_url, &member.token).await.unwrap();
    sender.join(channel.id).unwrap();
    receiver.join(channel.id).unwrap();

    // Joins carry no ack; give both connections a beat to be processed
    tokio::time::sleep(Duration::from_millis(100)).await;

    sender.send_message(channel.id, "hello room").unwrap();

    for socket in [&mut sender, &mut receiver] {
        match next_event(socket).await {
            ServerEvent::Message(record) => {
                assert_eq!(record.channel_id, channel.id);
                assert_eq!(record.content.as_deref(), Some("hello room"));
                assert_eq!(record.author_id, author.id);
                assert_eq!(record.author_name, author.username);
            }
            other => panic!("Expected message broadcast, got {:?}", other),
        }
    }
}

#[tokio::test]
#[serial]
async fn test_edit_and_delete_broadcast_to_the_room() {
    let Some(db) = TestDatabase::connect().await else { return };
    let (_, ws_url) = start_test_server(Some(db.pool().clone())).await;

    let author = create_unique_test_user(db.pool()).await.unwrap();
    let (workspace, channel) = seed_workspace_with_channel(db.pool(), author.id)
        .await
        .unwrap();
    let member = create_unique_test_user(db.pool()).await.unwrap();
    add_workspace_member(db.pool(), workspace.id, member.id)
        .await
        .unwrap();

    let mut sender = GatewaySocket::connect(&ws_url, &author.token).await.unwrap();
    let mut receiver = GatewaySocket::connect(&ws_url, &member.token).await.unwrap();
    sender.join(channel.id).unwrap();
    receiver.join(channel.id).unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    sender.send_message(channel.id, "first draft").unwrap();
    let message_id = match next_event(&mut sender).await {
        ServerEvent::Message(record) => record.id,
        other => panic!("Expected message broadcast, got {:?}", other),
    };
    let _ = next_event(&mut receiver).await;

    sender
        .update_message(channel.id, message_id, "final text")
        .unwrap();
    for socket in [&mut sender, &mut receiver] {
        match next_event(socket).await {
            ServerEvent::MessageUpdated(record) => {
                assert_eq!(record.id, message_id);
                assert_eq!(record.content.as_deref(), Some("final text"));
            }
            other => panic!("Expected update broadcast, got {:?}", other),
        }
    }

    sender.delete_message(channel.id, message_id).unwrap();
    for socket in [&mut sender, &mut receiver] {
        match next_event(socket).await {
            ServerEvent::MessageDeleted { id } => assert_eq!(id, message_id),
            other => panic!("Expected delete broadcast, got {:?}", other),
        }
    }
}

#[tokio::test]
#[serial]
async fn test_non_member_failure_is_not_broadcast() {
    let Some(db) = TestDatabase::connect().await else { return };
    let (_, ws_url) = start_test_server(Some(db.pool().clone())).await;

    let author = create_unique_test_user(db.pool()).await.unwrap();
    let (_, channel) = seed_workspace_with_channel(db.pool(), author.id)
        .await
        .unwrap();
    let outsider = create_unique_test_user(db.pool()).await.unwrap();

    let mut member = GatewaySocket::connect(&ws_url, &author.token).await.unwrap();
    let mut intruder = GatewaySocket::connect(&ws_url, &outsider.token).await.unwrap();
    member.join(channel.id).unwrap();
    // Joining a room is unchecked; the mutation is where membership bites
    intruder.join(channel.id).unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    intruder.send_message(channel.id, "let me in").unwrap();

    match next_event(&mut intruder).await {
        ServerEvent::Error { message } => assert_contains!(message, "not a member"),
        other => panic!("Expected error event, got {:?}", other),
    }

    // The failure stays with the sender; the member sees nothing
    let quiet = timeout(Duration::from_millis(300), member.recv()).await;
    assert!(quiet.is_err(), "member must not receive a failed mutation");
}

#[tokio::test]
#[serial]
async fn test_rest_mutations_do_not_broadcast() {
    let Some(db) = TestDatabase::connect().await else { return };
    let (http_base, ws_url) = start_test_server(Some(db.pool().clone())).await;

    let author = create_unique_test_user(db.pool()).await.unwrap();
    let (_, channel) = seed_workspace_with_channel(db.pool(), author.id)
        .await
        .unwrap();

    let mut socket = GatewaySocket::connect(&ws_url, &author.token).await.unwrap();
    socket.join(channel.id).unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    let api = ApiClient::new(http_base, &author.token);
    let record = api.send_message(channel.id, "sent over rest").await.unwrap();
    assert_eq!(record.content.as_deref(), Some("sent over rest"));

    // The REST path persists and returns but never touches the rooms
    let quiet = timeout(Duration::from_millis(300), socket.recv()).await;
    assert!(quiet.is_err(), "rest sends must not reach gateway rooms");
}
