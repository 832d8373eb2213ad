/**
 * Room Registry
 *
 * Rooms are named groups of connections. A connection in a room holds
 * its outbound queue sender in the registry; broadcasting to the room
 * pushes the event onto every member's queue, including the member
 * that caused the event. Delivery to the socket itself happens on each
 * connection's writer task.
 *
 * # Room Names
 *
 * - `channel:<id>` - Everyone watching a channel
 * - `user:<email>` - Every open socket of one user
 *
 * Empty rooms are removed as soon as their last member leaves, so the
 * registry never accumulates names from channels nobody watches.
 */
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use tokio::sync::mpsc::UnboundedSender;

use crate::shared::events::ServerEvent;

/// Room name for a channel's broadcast group
pub fn channel_room(channel_id: i64) -> String {
    format!("channel:{}", channel_id)
}

/// Room name for a user's personal notification group
pub fn user_room(email: &str) -> String {
    format!("user:{}", email)
}

/// Tracks which connections are in which rooms
pub struct RoomRegistry {
    rooms: Mutex<HashMap<String, HashMap<u64, UnboundedSender<ServerEvent>>>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
        }
    }

    /// Add a connection to a room; joining twice just refreshes the sender
    pub fn join(&self, room: &str, connection_id: u64, sender: UnboundedSender<ServerEvent>) {
        let mut rooms = self.rooms.lock().unwrap();
        rooms
            .entry(room.to_string())
            .or_default()
            .insert(connection_id, sender);
    }

    /// Remove a connection from a room; a no-op when not a member
    pub fn leave(&self, room: &str, connection_id: u64) {
        let mut rooms = self.rooms.lock().unwrap();
        if let Some(members) = rooms.get_mut(room) {
            members.remove(&connection_id);
            if members.is_empty() {
                rooms.remove(room);
            }
        }
    }

    /// Remove a closing connection from every room it joined
    pub fn remove_connection(&self, connection_id: u64, joined: &HashSet<String>) {
        let mut rooms = self.rooms.lock().unwrap();
        for room in joined {
            if let Some(members) = rooms.get_mut(room) {
                members.remove(&connection_id);
                if members.is_empty() {
                    rooms.remove(room);
                }
            }
        }
    }

    /// Push an event to every member of a room
    ///
    /// Returns the number of queues the event reached. Sends to
    /// connections that are mid-close fail silently; their cleanup
    /// removes them from the registry moments later.
    pub fn broadcast(&self, room: &str, event: &ServerEvent) -> usize {
        let senders: Vec<UnboundedSender<ServerEvent>> = {
            let rooms = self.rooms.lock().unwrap();
            match rooms.get(room) {
                Some(members) => members.values().cloned().collect(),
                None => Vec::new(),
            }
        };

        if senders.is_empty() {
            tracing::debug!("Broadcast to empty room {}", room);
            return 0;
        }

        let mut delivered = 0;
        for sender in senders {
            if sender.send(event.clone()).is_ok() {
                delivered += 1;
            }
        }
        delivered
    }

    /// Number of connections currently in a room
    pub fn member_count(&self, room: &str) -> usize {
        let rooms = self.rooms.lock().unwrap();
        rooms.get(room).map(|members| members.len()).unwrap_or(0)
    }

    /// Number of rooms with at least one member
    pub fn room_count(&self) -> usize {
        self.rooms.lock().unwrap().len()
    }
}
