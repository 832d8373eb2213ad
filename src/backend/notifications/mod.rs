//! Notifications Module
//!
//! Server-initiated pushes that are not channel broadcasts, currently
//! just workspace invitation notices. Fan-out goes to the recipient's
//! `user:<email>` room and never fails the operation that triggered it.

/// Invitation notice fan-out
pub mod fanout;

pub use fanout::{notify_workspace_invitation, WORKSPACE_INVITATION};
