/**
 * Gateway Socket Lifecycle
 *
 * The WebSocket endpoint: upgrade, per-connection read loop, writer
 * task and event dispatch.
 *
 * # Connection Shape
 *
 * Each socket splits into two halves. The read loop (this task) parses
 * client frames and dispatches them; the writer task drains the
 * connection's outbound queue and sends keepalive pings. Broadcasts
 * from anywhere in the process reach the socket by pushing onto the
 * queue, never by touching the socket directly.
 *
 * # Failure Policy
 *
 * A failed event - bad token, unauthenticated operation, rejected
 * mutation, unparseable frame - answers the sender with an `error`
 * event and leaves the connection open. Only transport-level problems
 * close the socket.
 */
use axum::{
    extract::ws::{Message, WebSocket},
    extract::{State, WebSocketUpgrade},
    response::Response,
};
use bytes::Bytes;
use futures_util::{sink::SinkExt, stream::StreamExt};
use std::time::Duration;
use tokio::sync::mpsc;

use crate::backend::gateway::connection::GatewayConnection;
use crate::backend::gateway::instance::Gateway;
use crate::backend::gateway::rooms::{channel_room, user_room};
use crate::backend::messages::service;
use crate::backend::middleware::auth::{authenticate_token, AuthenticatedUser};
use crate::backend::server::state::AppState;
use crate::shared::events::{ClientEvent, ServerEvent};

/// Keepalive ping cadence on idle sockets
const PING_INTERVAL: Duration = Duration::from_secs(30);

/// GET /ws - upgrade to a gateway socket
pub async fn handle_gateway_upgrade(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Drive one gateway socket from upgrade to close
pub async fn handle_socket(socket: WebSocket, state: AppState) {
    let gateway = state.gateway.clone();
    let connection_id = gateway.next_connection_id();
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<ServerEvent>();
    let mut connection = GatewayConnection::new(connection_id, outbound_tx);

    let (mut ws_sender, mut ws_receiver) = socket.split();

    // Writer task: forward queued events and send periodic pings
    let writer_task = tokio::spawn(async move {
        let mut ping_ticker = tokio::time::interval(PING_INTERVAL);
        ping_ticker.tick().await; // skip first immediate tick

        loop {
            tokio::select! {
                event = outbound_rx.recv() => {
                    match event {
                        Some(event) => {
                            let text = match serde_json::to_string(&event) {
                                Ok(text) => text,
                                Err(e) => {
                                    tracing::error!("Failed to serialize gateway event: {}", e);
                                    continue;
                                }
                            };
                            if ws_sender.send(Message::Text(text.into())).await.is_err() {
                                break;
                            }
                        }
                        None => break,
                    }
                }
                _ = ping_ticker.tick() => {
                    if ws_sender.send(Message::Ping(Bytes::new())).await.is_err() {
                        break;
                    }
                }
            }
        }
    });

    tracing::info!("Gateway connection {} opened", connection_id);

    // Main receive loop
    while let Some(frame) = ws_receiver.next().await {
        let message = match frame {
            Ok(message) => message,
            Err(e) => {
                tracing::debug!("Connection {} transport error: {}", connection_id, e);
                break;
            }
        };

        match message {
            Message::Text(text) => match serde_json::from_str::<ClientEvent>(&text) {
                Ok(event) => dispatch_event(&gateway, &state, &mut connection, event).await,
                Err(e) => {
                    tracing::warn!("Connection {} sent unparseable frame: {}", connection_id, e);
                    connection.send_error("unrecognized event");
                }
            },
            Message::Binary(_) => {
                connection.send_error("unrecognized event");
            }
            Message::Close(_) => break,
            Message::Ping(_) | Message::Pong(_) => { /* axum auto-responds to pings */ }
        }
    }

    // Cleanup: drop room memberships, then stop the writer
    gateway
        .rooms()
        .remove_connection(connection_id, connection.rooms());
    writer_task.abort();

    tracing::info!("Gateway connection {} closed", connection_id);
}

/// Route one parsed client event to its handler
async fn dispatch_event(
    gateway: &Gateway,
    state: &AppState,
    connection: &mut GatewayConnection,
    event: ClientEvent,
) {
    match event {
        ClientEvent::Authenticate { token } => {
            handle_authenticate(gateway, state, connection, token).await;
        }
        ClientEvent::Join { channel_id } => {
            handle_join(gateway, connection, channel_id);
        }
        ClientEvent::Leave { channel_id } => {
            handle_leave(gateway, connection, channel_id);
        }
        ClientEvent::Message {
            channel_id,
            content,
        } => {
            handle_message(gateway, state, connection, channel_id, content).await;
        }
        // Routing fields from the client are ignored on mutations of
        // existing messages; the stored record decides the room
        ClientEvent::UpdateMessage {
            channel_id: _,
            message_id,
            content,
        } => {
            handle_update(gateway, state, connection, message_id, content).await;
        }
        ClientEvent::DeleteMessage {
            channel_id: _,
            message_id,
        } => {
            handle_delete(gateway, state, connection, message_id).await;
        }
    }
}

/// Require a bound identity, reporting to the sender when absent
fn require_identity(connection: &GatewayConnection) -> Option<AuthenticatedUser> {
    match connection.identity() {
        Some(user) => Some(user.clone()),
        None => {
            connection.send_error("authenticate before channel operations");
            None
        }
    }
}

async fn handle_authenticate(
    gateway: &Gateway,
    state: &AppState,
    connection: &mut GatewayConnection,
    token: String,
) {
    match authenticate_token(&token, state.db_pool.as_ref()).await {
        Ok(user) => {
            // A re-authenticating connection moves to the new identity's room
            let previous_room = connection.identity().map(|prev| user_room(&prev.email));
            if let Some(previous_room) = previous_room {
                gateway.rooms().leave(&previous_room, connection.id());
                connection.track_leave(&previous_room);
            }

            let room = user_room(&user.email);
            gateway
                .rooms()
                .join(&room, connection.id(), connection.sender());
            connection.track_join(room);

            tracing::info!(
                "Connection {} authenticated as {}",
                connection.id(),
                user.email
            );
            connection.bind_identity(user);
            connection.send(ServerEvent::Authenticated);
        }
        Err(e) => {
            tracing::warn!("Connection {} failed authentication: {}", connection.id(), e);
            connection.send_error("authentication failed");
        }
    }
}

fn handle_join(gateway: &Gateway, connection: &mut GatewayConnection, channel_id: i64) {
    if require_identity(connection).is_none() {
        return;
    }

    let room = channel_room(channel_id);
    gateway
        .rooms()
        .join(&room, connection.id(), connection.sender());
    if connection.track_join(room) {
        tracing::debug!("Connection {} joined channel {}", connection.id(), channel_id);
    }
}

/// Leaving is not gated on authentication: an unauthenticated
/// connection is in no rooms, so the request is a harmless no-op
fn handle_leave(gateway: &Gateway, connection: &mut GatewayConnection, channel_id: i64) {
    let room = channel_room(channel_id);
    gateway.rooms().leave(&room, connection.id());
    if connection.track_leave(&room) {
        tracing::debug!("Connection {} left channel {}", connection.id(), channel_id);
    }
}

async fn handle_message(
    gateway: &Gateway,
    state: &AppState,
    connection: &mut GatewayConnection,
    channel_id: i64,
    content: String,
) {
    let Some(user) = require_identity(connection) else {
        return;
    };
    let pool = match state.pool() {
        Ok(pool) => pool,
        Err(e) => {
            connection.send_error(e.message());
            return;
        }
    };

    match service::append_message(pool, channel_id, &user, Some(&content), &[]).await {
        Ok(message) => {
            let room = channel_room(message.channel_id);
            let delivered = gateway.rooms().broadcast(&room, &ServerEvent::Message(message));
            tracing::debug!("Message broadcast reached {} connections", delivered);
        }
        Err(e) => connection.send_error(e.message()),
    }
}

async fn handle_update(
    gateway: &Gateway,
    state: &AppState,
    connection: &mut GatewayConnection,
    message_id: i64,
    content: String,
) {
    let Some(user) = require_identity(connection) else {
        return;
    };
    let pool = match state.pool() {
        Ok(pool) => pool,
        Err(e) => {
            connection.send_error(e.message());
            return;
        }
    };

    match service::edit_message(pool, &user, message_id, &content).await {
        Ok(message) => {
            let room = channel_room(message.channel_id);
            gateway
                .rooms()
                .broadcast(&room, &ServerEvent::MessageUpdated(message));
        }
        Err(e) => connection.send_error(e.message()),
    }
}

async fn handle_delete(
    gateway: &Gateway,
    state: &AppState,
    connection: &mut GatewayConnection,
    message_id: i64,
) {
    let Some(user) = require_identity(connection) else {
        return;
    };
    let pool = match state.pool() {
        Ok(pool) => pool,
        Err(e) => {
            connection.send_error(e.message());
            return;
        }
    };

    match service::remove_message(pool, &state.upload_dir, &user, message_id).await {
        Ok(deleted) => {
            let room = channel_room(deleted.channel_id);
            gateway
                .rooms()
                .broadcast(&room, &ServerEvent::MessageDeleted { id: deleted.id });
        }
        Err(e) => connection.send_error(e.message()),
    }
}
