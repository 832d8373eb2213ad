//! Messages Module
//!
//! Everything about channel messages: storage, the shared mutation
//! service, image attachments and the REST handlers.
//!
//! # Architecture
//!
//! The messages module is organized into focused submodules:
//!
//! - **`db`** - Message rows and raw queries
//! - **`service`** - The mutation service both REST and the gateway call
//! - **`uploads`** - Multipart parsing and image file storage
//! - **`handlers`** - REST handlers
//!
//! # One Mutation Path
//!
//! Append, edit and remove each exist exactly once, in `service`. The
//! REST handlers and the gateway event dispatch both call into it, so
//! a given request produces the same stored outcome and the same error
//! category no matter which transport carried it. The transports only
//! differ afterwards: gateway mutations broadcast to the channel room,
//! REST mutations stay silent.

/// Message rows and raw queries
pub mod db;

/// The shared mutation service
pub mod service;

/// Multipart parsing and image file storage
pub mod uploads;

/// REST handlers
pub mod handlers;

pub use service::{DeletedMessage, DEFAULT_PAGE_SIZE};
