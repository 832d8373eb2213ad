//! Database operations for workspaces, channels and invitations
//!
//! Workspaces own channels; users belong to workspaces through the
//! membership table; invitations let existing members bring new people
//! in. Channel access checks everywhere else in the server reduce to
//! `is_workspace_member` on the channel's workspace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::shared::messages::Invitation;

/// A workspace, the top-level grouping of channels and members
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Workspace {
    pub id: i64,
    pub name: String,
    pub owner_id: i64,
    pub created_at: DateTime<Utc>,
}

/// A channel inside a workspace
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Channel {
    pub id: i64,
    pub workspace_id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Create a workspace and enroll the owner as its first member
pub async fn create_workspace(
    pool: &PgPool,
    name: &str,
    owner_id: i64,
) -> Result<Workspace, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let workspace = sqlx::query_as::<_, Workspace>(
        r#"
        INSERT INTO workspaces (name, owner_id)
        VALUES ($1, $2)
        RETURNING id, name, owner_id, created_at
        "#,
    )
    .bind(name)
    .bind(owner_id)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO workspace_members (workspace_id, user_id)
        VALUES ($1, $2)
        "#,
    )
    .bind(workspace.id)
    .bind(owner_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(workspace)
}

/// Get a workspace by ID
pub async fn get_workspace_by_id(
    pool: &PgPool,
    workspace_id: i64,
) -> Result<Option<Workspace>, sqlx::Error> {
    sqlx::query_as::<_, Workspace>(
        r#"
        SELECT id, name, owner_id, created_at
        FROM workspaces
        WHERE id = $1
        "#,
    )
    .bind(workspace_id)
    .fetch_optional(pool)
    .await
}

/// Create a channel inside a workspace
pub async fn create_channel(
    pool: &PgPool,
    workspace_id: i64,
    name: &str,
) -> Result<Channel, sqlx::Error> {
    sqlx::query_as::<_, Channel>(
        r#"
        INSERT INTO channels (workspace_id, name)
        VALUES ($1, $2)
        RETURNING id, workspace_id, name, created_at
        "#,
    )
    .bind(workspace_id)
    .bind(name)
    .fetch_one(pool)
    .await
}

/// Get a channel by ID
pub async fn get_channel_by_id(
    pool: &PgPool,
    channel_id: i64,
) -> Result<Option<Channel>, sqlx::Error> {
    sqlx::query_as::<_, Channel>(
        r#"
        SELECT id, workspace_id, name, created_at
        FROM channels
        WHERE id = $1
        "#,
    )
    .bind(channel_id)
    .fetch_optional(pool)
    .await
}

/// Add a user to a workspace; adding an existing member is a no-op
pub async fn add_workspace_member(
    pool: &PgPool,
    workspace_id: i64,
    user_id: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO workspace_members (workspace_id, user_id)
        VALUES ($1, $2)
        ON CONFLICT (workspace_id, user_id) DO NOTHING
        "#,
    )
    .bind(workspace_id)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Check whether a user belongs to a workspace
pub async fn is_workspace_member(
    pool: &PgPool,
    workspace_id: i64,
    user_id: i64,
) -> Result<bool, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM workspace_members
            WHERE workspace_id = $1 AND user_id = $2
        ) AS is_member
        "#,
    )
    .bind(workspace_id)
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(row.get("is_member"))
}

/// Create a pending invitation with a fresh redemption token
pub async fn create_invitation(
    pool: &PgPool,
    workspace_id: i64,
    workspace_name: &str,
    email: &str,
) -> Result<Invitation, sqlx::Error> {
    let token = Uuid::new_v4().to_string();

    let row = sqlx::query(
        r#"
        INSERT INTO invitations (workspace_id, email, token, status)
        VALUES ($1, $2, $3, 'pending')
        RETURNING id, created_at
        "#,
    )
    .bind(workspace_id)
    .bind(email)
    .bind(&token)
    .fetch_one(pool)
    .await?;

    Ok(Invitation {
        id: row.get("id"),
        workspace_id,
        workspace_name: workspace_name.to_string(),
        email: email.to_string(),
        token,
        status: "pending".to_string(),
        created_at: row.get("created_at"),
    })
}

/// Get all pending invitations addressed to an email
pub async fn pending_invitations_for_email(
    pool: &PgPool,
    email: &str,
) -> Result<Vec<Invitation>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT i.id, i.workspace_id, w.name AS workspace_name, i.email, i.token, i.status, i.created_at
        FROM invitations i
        JOIN workspaces w ON w.id = i.workspace_id
        WHERE i.email = $1 AND i.status = 'pending'
        ORDER BY i.created_at DESC
        "#,
    )
    .bind(email)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| Invitation {
            id: row.get("id"),
            workspace_id: row.get("workspace_id"),
            workspace_name: row.get("workspace_name"),
            email: row.get("email"),
            token: row.get("token"),
            status: row.get("status"),
            created_at: row.get("created_at"),
        })
        .collect())
}
