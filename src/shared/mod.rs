//! Shared Module
//!
//! This module contains types and data structures that are shared between
//! the server and client halves of the crate. These types are used for
//! serialization and communication over the REST API and the realtime
//! gateway socket.
//!
//! # Overview
//!
//! The shared module provides platform-agnostic types that can be used
//! in both server and client code. All types are designed for JSON
//! serialization and transmission over HTTP and WebSocket frames.

/// Chat message and notification data structures
pub mod messages;

/// Realtime gateway event envelopes
pub mod events;

/// Re-export commonly used types for convenience
pub use messages::{
    ChatMessage, CreateInvitationRequest, DeleteMessageResponse, Invitation, NotificationPayload,
    SendMessageRequest, UpdateMessageRequest,
};
pub use events::{ClientEvent, ServerEvent};
