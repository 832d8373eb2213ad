/**
 * Per-Connection State
 *
 * One `GatewayConnection` exists per open socket, owned by that
 * socket's read loop. It remembers who the connection authenticated
 * as and which rooms it joined, and holds the sending half of the
 * outbound queue the writer task drains.
 *
 * Nothing here is shared: the registry holds clones of the outbound
 * sender, and everything else is plain owned state mutated from one
 * task.
 */
use std::collections::HashSet;
use tokio::sync::mpsc::UnboundedSender;

use crate::backend::middleware::auth::AuthenticatedUser;
use crate::shared::events::ServerEvent;

/// State for one open gateway socket
#[derive(Debug)]
pub struct GatewayConnection {
    id: u64,
    identity: Option<AuthenticatedUser>,
    rooms: HashSet<String>,
    outbound: UnboundedSender<ServerEvent>,
}

impl GatewayConnection {
    pub fn new(id: u64, outbound: UnboundedSender<ServerEvent>) -> Self {
        Self {
            id,
            identity: None,
            rooms: HashSet::new(),
            outbound,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// The verified identity, once `authenticate` has succeeded
    pub fn identity(&self) -> Option<&AuthenticatedUser> {
        self.identity.as_ref()
    }

    pub fn bind_identity(&mut self, user: AuthenticatedUser) {
        self.identity = Some(user);
    }

    /// Rooms this connection joined, for cleanup on close
    pub fn rooms(&self) -> &HashSet<String> {
        &self.rooms
    }

    /// Clone of the outbound queue sender, for registry membership
    pub fn sender(&self) -> UnboundedSender<ServerEvent> {
        self.outbound.clone()
    }

    /// Record a room join; returns false if already joined
    pub fn track_join(&mut self, room: String) -> bool {
        self.rooms.insert(room)
    }

    /// Record a room leave; returns false if not joined
    pub fn track_leave(&mut self, room: &str) -> bool {
        self.rooms.remove(room)
    }

    /// Queue an event for this connection only
    ///
    /// Returns false when the writer task is gone, which means the
    /// socket is closing anyway.
    pub fn send(&self, event: ServerEvent) -> bool {
        self.outbound.send(event).is_ok()
    }

    /// Queue an error event for this connection only
    ///
    /// Errors never close the socket; the client keeps its connection
    /// and can correct its input.
    pub fn send_error(&self, message: impl Into<String>) {
        let _ = self.outbound.send(ServerEvent::Error {
            message: message.into(),
        }); // Ignore if the writer is gone
    }
}
