/**
 * Gateway Instance and Process-Wide Singleton
 *
 * The `Gateway` owns the room registry and hands out connection IDs.
 * One instance serves the whole process: HTTP handlers that want to
 * push notifications reach it through the singleton accessors here
 * rather than threading it through every call path.
 *
 * The singleton initializes lazily on first use. `reset` exists for
 * tests that need a clean registry; handles obtained before a reset
 * keep working against the old instance.
 */
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock, RwLock};

use crate::backend::gateway::rooms::{user_room, RoomRegistry};
use crate::shared::events::ServerEvent;
use crate::shared::messages::NotificationPayload;

/// The realtime gateway: room registry plus connection ID allocation
pub struct Gateway {
    rooms: RoomRegistry,
    next_connection_id: AtomicU64,
}

impl Gateway {
    pub fn new() -> Self {
        Self {
            rooms: RoomRegistry::new(),
            next_connection_id: AtomicU64::new(1),
        }
    }

    pub fn rooms(&self) -> &RoomRegistry {
        &self.rooms
    }

    /// Allocate a connection ID, unique within this gateway instance
    pub fn next_connection_id(&self) -> u64 {
        self.next_connection_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Push a notification to every open socket of one user
    ///
    /// The payload goes out under all three event aliases so clients
    /// of any vintage recognize at least one of them. Returns the
    /// number of sockets reached; zero just means the user has nothing
    /// open right now.
    pub fn notify_user(&self, email: &str, payload: NotificationPayload) -> usize {
        let room = user_room(email);

        let delivered = self
            .rooms
            .broadcast(&room, &ServerEvent::Notification(payload.clone()));
        self.rooms
            .broadcast(&room, &ServerEvent::Invitation(payload.clone()));
        self.rooms
            .broadcast(&room, &ServerEvent::GlobalInvitation(payload));

        delivered
    }
}

static INSTANCE: OnceLock<RwLock<Option<Arc<Gateway>>>> = OnceLock::new();

fn cell() -> &'static RwLock<Option<Arc<Gateway>>> {
    INSTANCE.get_or_init(|| RwLock::new(None))
}

/// Get the process-wide gateway, creating it on first use
pub fn get_or_init() -> Arc<Gateway> {
    if let Some(gateway) = cell().read().unwrap().as_ref() {
        return Arc::clone(gateway);
    }

    let mut slot = cell().write().unwrap();
    // Another thread may have initialized between the read and write locks
    if let Some(gateway) = slot.as_ref() {
        return Arc::clone(gateway);
    }

    let gateway = Arc::new(Gateway::new());
    *slot = Some(Arc::clone(&gateway));
    tracing::debug!("Gateway instance initialized");
    gateway
}

/// Get the process-wide gateway if one has been initialized
pub fn get() -> Option<Arc<Gateway>> {
    cell().read().unwrap().as_ref().map(Arc::clone)
}

/// Drop the process-wide gateway so the next use starts fresh
///
/// For tests. Connections opened against the old instance continue to
/// work through their existing handles.
pub fn reset() {
    *cell().write().unwrap() = None;
}
