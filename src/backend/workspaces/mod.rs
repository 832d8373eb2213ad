//! Workspaces Module
//!
//! Workspaces group users and channels. This module owns the
//! workspace, channel, membership and invitation tables, and the
//! invitation HTTP handlers.
//!
//! # Architecture
//!
//! - **`db`** - Workspace, channel, membership and invitation storage
//! - **`handlers`** - Invitation HTTP handlers
//!
//! Channel-level permissions are workspace-level permissions: a user
//! may read and post in a channel exactly when they belong to the
//! channel's workspace.

/// Workspace, channel and invitation storage
pub mod db;

/// Invitation HTTP handlers
pub mod handlers;

pub use db::{Channel, Workspace};
pub use handlers::{create_invitation, list_invitations};
