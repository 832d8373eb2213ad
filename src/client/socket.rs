/**
 * Gateway Socket Client
 *
 * This module provides a thin client over `tokio-tungstenite` for the
 * realtime gateway. Connecting performs the full handshake: dial the
 * socket (with bounded retries), send the credential, and wait for the
 * `authenticated` ack before handing the session to the caller.
 *
 * # Session Model
 *
 * A connected `GatewaySocket` owns one background task that pumps both
 * directions: outgoing events are queued through an unbounded channel
 * and written to the socket, incoming frames are decoded and surfaced
 * through `recv`. Dropping the socket aborts the task and closes the
 * connection; joined rooms are not restored automatically, a caller
 * that reconnects must re-join them.
 */

use crate::client::error::ClientError;
use crate::shared::{ClientEvent, ServerEvent};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// How long to wait for the `authenticated` ack
pub const AUTH_TIMEOUT: Duration = Duration::from_secs(5);

/// Fixed pause between connect attempts
pub const RECONNECT_BACKOFF: Duration = Duration::from_secs(2);

/// Connect attempts before giving up
pub const MAX_CONNECT_ATTEMPTS: u32 = 5;

/// An authenticated realtime session with the gateway
pub struct GatewaySocket {
    outbound: mpsc::UnboundedSender<ClientEvent>,
    events: mpsc::UnboundedReceiver<ServerEvent>,
    pump_task: JoinHandle<()>,
}

impl GatewaySocket {
    /// Dial the gateway and authenticate
    ///
    /// Retries the connect up to `MAX_CONNECT_ATTEMPTS` times with a
    /// fixed backoff. Authentication must complete within
    /// `AUTH_TIMEOUT` or the attempt fails with `ClientError::Timeout`;
    /// the gateway itself never disconnects a slow authenticator.
    pub async fn connect(url: &str, token: &str) -> Result<Self, ClientError> {
        let mut attempt = 0;
        let ws = loop {
            attempt += 1;
            match connect_async(url).await {
                Ok((ws, _)) => break ws,
                Err(e) if attempt < MAX_CONNECT_ATTEMPTS => {
                    tracing::warn!("Gateway connect attempt {} failed: {}", attempt, e);
                    tokio::time::sleep(RECONNECT_BACKOFF).await;
                }
                Err(e) => {
                    return Err(ClientError::Gateway(format!(
                        "connect failed after {} attempts: {}",
                        attempt, e
                    )));
                }
            }
        };

        let (mut ws_sender, mut ws_receiver) = ws.split();

        // Credentials go out before anything else on the session
        let frame = serde_json::to_string(&ClientEvent::Authenticate {
            token: token.to_string(),
        })?;
        ws_sender
            .send(Message::Text(frame.into()))
            .await
            .map_err(|e| ClientError::Gateway(format!("failed to send credentials: {}", e)))?;

        match tokio::time::timeout(AUTH_TIMEOUT, wait_for_authenticated(&mut ws_receiver)).await {
            Ok(result) => result?,
            Err(_) => return Err(ClientError::Timeout),
        }

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let pump_task = tokio::spawn(pump(ws_sender, ws_receiver, outbound_rx, event_tx));

        Ok(Self {
            outbound: outbound_tx,
            events: event_rx,
            pump_task,
        })
    }

    /// Queue an event for the gateway
    pub fn send(&self, event: ClientEvent) -> Result<(), ClientError> {
        self.outbound
            .send(event)
            .map_err(|_| ClientError::Gateway("socket task stopped".to_string()))
    }

    /// Join a channel room
    pub fn join(&self, channel_id: i64) -> Result<(), ClientError> {
        self.send(ClientEvent::Join { channel_id })
    }

    /// Leave a channel room
    pub fn leave(&self, channel_id: i64) -> Result<(), ClientError> {
        self.send(ClientEvent::Leave { channel_id })
    }

    /// Send a chat message through the gateway
    pub fn send_message(
        &self,
        channel_id: i64,
        content: impl Into<String>,
    ) -> Result<(), ClientError> {
        self.send(ClientEvent::Message {
            channel_id,
            content: content.into(),
        })
    }

    /// Edit a message through the gateway
    pub fn update_message(
        &self,
        channel_id: i64,
        message_id: i64,
        content: impl Into<String>,
    ) -> Result<(), ClientError> {
        self.send(ClientEvent::UpdateMessage {
            channel_id,
            message_id,
            content: content.into(),
        })
    }

    /// Delete a message through the gateway
    pub fn delete_message(&self, channel_id: i64, message_id: i64) -> Result<(), ClientError> {
        self.send(ClientEvent::DeleteMessage {
            channel_id,
            message_id,
        })
    }

    /// Receive the next server event
    ///
    /// Returns `None` once the connection is gone and all buffered
    /// events have been drained.
    pub async fn recv(&mut self) -> Option<ServerEvent> {
        self.events.recv().await
    }
}

impl Drop for GatewaySocket {
    fn drop(&mut self) {
        self.pump_task.abort();
    }
}

/// Wait for the `authenticated` ack, failing on an `error` event
async fn wait_for_authenticated(
    receiver: &mut SplitStream<WsStream>,
) -> Result<(), ClientError> {
    while let Some(frame) = receiver.next().await {
        let frame = frame
            .map_err(|e| ClientError::Gateway(format!("socket error during authentication: {}", e)))?;
        if let Message::Text(text) = frame {
            match serde_json::from_str::<ServerEvent>(text.as_str()) {
                Ok(ServerEvent::Authenticated) => return Ok(()),
                Ok(ServerEvent::Error { message }) => return Err(ClientError::Gateway(message)),
                Ok(_) => { /* stray broadcast before the ack */ }
                Err(e) => {
                    tracing::warn!("Discarding unparseable gateway frame: {}", e);
                }
            }
        }
    }
    Err(ClientError::Gateway(
        "connection closed during authentication".to_string(),
    ))
}

/// Pump both socket directions until either side closes
async fn pump(
    mut ws_sender: SplitSink<WsStream, Message>,
    mut ws_receiver: SplitStream<WsStream>,
    mut outbound_rx: mpsc::UnboundedReceiver<ClientEvent>,
    event_tx: mpsc::UnboundedSender<ServerEvent>,
) {
    loop {
        tokio::select! {
            outbound = outbound_rx.recv() => {
                match outbound {
                    Some(event) => {
                        let text = match serde_json::to_string(&event) {
                            Ok(text) => text,
                            Err(e) => {
                                tracing::error!("Failed to serialize outgoing event: {}", e);
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
            frame = ws_receiver.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<ServerEvent>(text.as_str()) {
                            Ok(event) => {
                                if event_tx.send(event).is_err() {
                                    break;
                                }
                            }
                            Err(e) => {
                                tracing::warn!("Discarding unparseable gateway frame: {}", e);
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => { /* tungstenite answers pings on our behalf */ }
                    Some(Err(e)) => {
                        tracing::warn!("Gateway socket error: {}", e);
                        break;
                    }
                }
            }
        }
    }
}
