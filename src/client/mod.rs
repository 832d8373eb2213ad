//! Client Module
//!
//! This module contains the headless client-side sync components for
//! the Huddle backend. It has no UI dependencies; a frontend layers on
//! top of these types.
//!
//! # Architecture
//!
//! The client module is organized into focused submodules:
//!
//! - **`api`** - REST client (reqwest) with bearer authentication
//! - **`poller`** - Polling channel view with optimistic sends
//! - **`socket`** - Gateway socket client (tokio-tungstenite)
//! - **`error`** - Client error types
//!
//! # Module Structure
//!
//! ```text
//! client/
//! ├── mod.rs       - Module exports and documentation
//! ├── api.rs       - REST API client
//! ├── poller.rs    - Polling channel view
//! ├── socket.rs    - Gateway socket client
//! └── error.rs     - Error types
//! ```
//!
//! # Transport Choice
//!
//! The two transports are independent and can run together:
//!
//! - The poller alone gives eventually-consistent state within one
//!   poll interval, with no socket required.
//! - The socket alone gives realtime broadcast but misses mutations
//!   made through REST by other clients.
//! - Running both and feeding socket events into
//!   `ChannelPoller::apply_event` closes that gap; merging is
//!   idempotent by message id.

/// REST API client
pub mod api;

/// Client error types
pub mod error;

/// Polling channel view
pub mod poller;

/// Gateway socket client
pub mod socket;

// Re-export commonly used types
pub use api::{ApiClient, ImageAttachment};
pub use error::ClientError;
pub use poller::ChannelPoller;
pub use socket::GatewaySocket;
