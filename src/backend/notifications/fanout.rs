/**
 * Notification Fan-out
 *
 * Pushes workspace invitation notices to the invited user's personal
 * room. Fan-out is strictly fire-and-forget: the caller has already
 * committed its own work, and nothing that happens here - no open
 * sockets, uninitialized gateway, nothing - may bubble back up and
 * fail it.
 */
use crate::backend::gateway::instance;
use crate::shared::messages::{Invitation, NotificationPayload};

/// Notification kind for workspace invitations
pub const WORKSPACE_INVITATION: &str = "workspace_invitation";

/// Push an invitation notice to the invited user's sockets
///
/// Initializes the gateway singleton when nothing else has yet. A
/// recipient with no open sockets yields a reach of zero, which is
/// not a failure. Returns true when the fan-out was attempted, and it
/// always is.
pub fn notify_workspace_invitation(invitation: &Invitation, sender_name: &str) -> bool {
    let payload = NotificationPayload {
        kind: WORKSPACE_INVITATION.to_string(),
        workspace_id: invitation.workspace_id,
        workspace_name: invitation.workspace_name.clone(),
        sender_name: sender_name.to_string(),
        token: invitation.token.clone(),
        created_at: invitation.created_at,
    };

    let gateway = instance::get_or_init();
    let reached = gateway.notify_user(&invitation.email, payload);

    if reached == 0 {
        tracing::debug!(
            "Invitation notice for {} reached no open sessions",
            invitation.email
        );
    } else {
        tracing::debug!(
            "Invitation notice for {} reached {} sessions",
            invitation.email,
            reached
        );
    }

    true
}
