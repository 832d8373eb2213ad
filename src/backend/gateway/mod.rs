//! Realtime Gateway Module
//!
//! The WebSocket half of the server. Clients connect at `GET /ws`,
//! authenticate with the same JWT the REST API uses, join rooms, and
//! exchange tagged JSON events.
//!
//! # Architecture
//!
//! The gateway module is organized into focused submodules:
//!
//! - **`instance`** - The `Gateway` itself and its process-wide singleton
//! - **`rooms`** - Room membership and broadcast
//! - **`connection`** - Per-socket state
//! - **`socket`** - Upgrade handler, read loop, writer task, dispatch
//!
//! # Event Flow
//!
//! 1. Client connects and sends `authenticate` with a JWT
//! 2. On success the connection lands in its `user:<email>` room
//! 3. `join`/`leave` manage `channel:<id>` subscriptions
//! 4. Message mutations persist through the shared mutation service,
//!    then broadcast to the affected channel's room
//!
//! Anything that fails answers only the sender with an `error` event;
//! the socket always survives its own bad input.

/// The gateway instance and process-wide singleton
pub mod instance;

/// Room membership and broadcast
pub mod rooms;

/// Per-socket state
pub mod connection;

/// Socket lifecycle and event dispatch
pub mod socket;

pub use connection::GatewayConnection;
pub use instance::Gateway;
pub use rooms::{channel_room, user_room, RoomRegistry};
pub use socket::handle_gateway_upgrade;
