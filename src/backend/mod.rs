//! Backend Module
//!
//! This module contains all server-side code for the Huddle application.
//! It provides a complete Axum HTTP server with a WebSocket realtime
//! gateway, a REST API, and persistent message storage.
//!
//! # Overview
//!
//! The backend module includes:
//! - Axum HTTP server setup and configuration
//! - WebSocket gateway with room-based broadcast
//! - Message persistence and mutation handling (PostgreSQL)
//! - Route configuration and middleware
//! - Authentication and user management
//! - Workspace invitations and notification fan-out
//!
//! # Architecture
//!
//! The backend is organized into focused submodules:
//!
//! - **`server`** - Server initialization, application state, configuration
//! - **`routes`** - HTTP route configuration and router assembly
//! - **`gateway`** - WebSocket sessions, rooms, and event broadcast
//! - **`messages`** - Message mutation service, uploads, REST handlers
//! - **`workspaces`** - Workspaces, channels, invitations
//! - **`notifications`** - Notification fan-out to user rooms
//! - **`auth`** - Authentication, JWT tokens, user management
//! - **`middleware`** - Request processing middleware
//! - **`error`** - Backend-specific error types
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs           - Module exports and documentation
//! ├── server/          - Server initialization and state
//! ├── routes/          - Route configuration
//! ├── gateway/         - WebSocket gateway
//! ├── messages/        - Message service and REST handlers
//! ├── workspaces/      - Workspaces, channels, invitations
//! ├── notifications/   - Notification fan-out
//! ├── auth/            - Authentication
//! ├── middleware/      - Request middleware
//! └── error/           - Error types
//! ```
//!
//! # State Management
//!
//! The backend uses shared state (`AppState`) that contains:
//! - The gateway instance (rooms, sessions)
//! - Optional database pool
//! - Upload directory path
//!
//! The gateway itself is a process-wide singleton so that HTTP handlers
//! which never see `AppState` (notification fan-out) can still reach
//! connected sessions. Room membership lives behind a `Mutex`; outbound
//! delivery uses per-session unbounded channels.
//!
//! # Error Handling
//!
//! The backend uses a single `ApiError` taxonomy that maps onto HTTP
//! status codes and a JSON error body. Handlers propagate errors with
//! the `?` operator.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// WebSocket gateway (sessions, rooms, broadcast)
pub mod gateway;

/// Message persistence, mutation service, and REST handlers
pub mod messages;

/// Workspaces, channels, and invitations
pub mod workspaces;

/// Notification fan-out to connected sessions
pub mod notifications;

/// Backend error types
pub mod error;

/// Authentication and user management
pub mod auth;

/// Middleware for request processing
pub mod middleware;

/// Re-export commonly used types
pub use server::{create_app, AppState};
pub use error::ApiError;
pub use gateway::Gateway;
