/**
 * Workspace Invitation Handlers
 *
 * HTTP handlers for issuing and listing workspace invitations.
 *
 * # Endpoints
 *
 * - POST /api/workspaces/{workspace_id}/invitations - Invite a user by email
 * - GET /api/invitations - List pending invitations for the caller
 *
 * Issuing an invitation also pushes a realtime notice to the invited
 * user's personal room. That push is strictly best-effort: a recipient
 * with no open sockets still gets the invitation row, and no delivery
 * problem can fail the HTTP request.
 */
use axum::{
    extract::{Path, State},
    response::Json,
};
use sqlx::PgPool;

use crate::backend::auth::users::get_user_by_id;
use crate::backend::error::ApiError;
use crate::backend::middleware::auth::AuthUser;
use crate::backend::notifications::fanout::notify_workspace_invitation;
use crate::backend::workspaces::db;
use crate::shared::messages::{CreateInvitationRequest, Invitation};

/// Invite a user into a workspace
///
/// # Errors
///
/// * `NotFound` - The workspace does not exist
/// * `Authorization` - The caller is not a member of the workspace
/// * `Validation` - The email address is malformed
/// * `Persistence` - Database not configured, or a storage step failed
pub async fn create_invitation(
    State(pool): State<Option<PgPool>>,
    AuthUser(user): AuthUser,
    Path(workspace_id): Path<i64>,
    Json(request): Json<CreateInvitationRequest>,
) -> Result<Json<Invitation>, ApiError> {
    let pool = pool.ok_or_else(|| {
        tracing::error!("Database not configured");
        ApiError::persistence("database not configured")
    })?;

    let workspace = db::get_workspace_by_id(&pool, workspace_id)
        .await?
        .ok_or_else(|| ApiError::not_found("workspace not found"))?;

    if !db::is_workspace_member(&pool, workspace.id, user.user_id).await? {
        return Err(ApiError::authorization(
            "only workspace members can invite",
        ));
    }

    if !request.email.contains('@') {
        return Err(ApiError::validation("invalid email format"));
    }

    let sender_name = get_user_by_id(&pool, user.user_id)
        .await?
        .map(|u| u.username)
        .unwrap_or_else(|| user.email.clone());

    let invitation =
        db::create_invitation(&pool, workspace.id, &workspace.name, &request.email).await?;

    tracing::info!(
        "Invitation {} created for {} to workspace {}",
        invitation.id,
        invitation.email,
        workspace.id
    );

    notify_workspace_invitation(&invitation, &sender_name);

    Ok(Json(invitation))
}

/// List pending invitations addressed to the caller's email
pub async fn list_invitations(
    State(pool): State<Option<PgPool>>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<Invitation>>, ApiError> {
    let pool = pool.ok_or_else(|| {
        tracing::error!("Database not configured");
        ApiError::persistence("database not configured")
    })?;

    let invitations = db::pending_invitations_for_email(&pool, &user.email).await?;
    Ok(Json(invitations))
}
