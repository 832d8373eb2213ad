//! Huddle - Main Library
//!
//! Huddle is a team-collaboration backend built with Rust, featuring a
//! WebSocket realtime gateway, persistent channel messaging, and a
//! polling sync client for environments where sockets are unavailable.
//!
//! # Overview
//!
//! This library provides the core functionality for Huddle, including:
//! - Realtime messaging over a room-based WebSocket gateway
//! - A REST API for channel message history and mutations
//! - Image attachments with server-side storage
//! - Workspace invitations with notification fan-out
//! - A polling client that mirrors channel state without a socket
//!
//! # Module Structure
//!
//! The library is organized into three main modules:
//!
//! - **`shared`** - Types shared between client and backend
//!   - Message and notification structures
//!   - Gateway event types (client and server)
//!   - Image URL merge rules
//!
//! - **`backend`** - Server-side code
//!   - Axum HTTP server with the WebSocket gateway
//!   - Message mutation service shared by socket and REST paths
//!   - Authentication, workspaces, invitations
//!   - Database persistence (PostgreSQL)
//!
//! - **`client`** - Client-side sync code
//!   - REST API client with bearer authentication
//!   - Polling channel view with optimistic sends
//!   - Gateway socket client with reconnect
//!
//! # Usage
//!
//! ## Server-Side
//!
//! ```rust,no_run
//! use huddle::backend::server::init::create_app;
//!
//! # async fn example() {
//! let app = create_app().await;
//! // Use app with Axum server
//! # }
//! ```
//!
//! ## Polling Client
//!
//! ```rust,no_run
//! use huddle::client::{ApiClient, ChannelPoller};
//!
//! # async fn example() {
//! let api = ApiClient::new("http://127.0.0.1:3000", "jwt-token");
//! let poller = ChannelPoller::start(api, 42);
//! let messages = poller.messages();
//! # }
//! ```
//!
//! # Architecture
//!
//! The application follows a modular architecture:
//!
//! - **Shared Types**: Serialization types used on the wire
//! - **Backend**: Axum server with gateway and REST handlers
//! - **Client**: Polling and socket clients built on the shared types
//!
//! # Thread Safety
//!
//! - **Server**: Gateway state is thread-safe using `Mutex` and
//!   per-session channels; the gateway instance is shared via `Arc`
//! - **Client**: Poller state lives behind `Arc<Mutex<>>` and is safe
//!   to read from any task
//!
//! # Error Handling
//!
//! The library uses Rust's standard error handling:
//!
//! - `Result<T, E>` for fallible operations
//! - `ApiError` on the backend, mapped to HTTP responses
//! - `ClientError` on the client, wrapping transport and API failures

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
pub mod backend;

/// Client-side sync code (REST polling, gateway socket)
pub mod client;
