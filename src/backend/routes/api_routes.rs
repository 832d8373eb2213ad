/**
 * API Route Handlers
 *
 * This module defines route handlers for API endpoints, including:
 * - Authentication endpoints (signup, login, get current user)
 * - Channel message endpoints (list, send, edit, delete)
 * - Workspace invitation endpoints
 *
 * # Routes
 *
 * ## Authentication
 * - `POST /api/auth/signup` - User registration
 * - `POST /api/auth/login` - User login
 * - `GET /api/auth/me` - Get current user info
 *
 * ## Messages
 * - `GET /api/channels/{channel_id}/messages` - List channel messages
 * - `POST /api/channels/{channel_id}/messages` - Send a message
 * - `PATCH /api/channels/{channel_id}/messages/{message_id}` - Edit a message
 * - `DELETE /api/channels/{channel_id}/messages/{message_id}` - Delete a message
 *
 * ## Invitations
 * - `POST /api/workspaces/{workspace_id}/invitations` - Invite a user by email
 * - `GET /api/invitations` - List pending invitations
 */

use axum::extract::DefaultBodyLimit;
use axum::Router;
use crate::backend::server::state::AppState;
use crate::backend::auth::{signup, login, get_me};
use crate::backend::messages::handlers::{
    list_messages, create_message, update_message, delete_message,
};
use crate::backend::workspaces::handlers::{create_invitation, list_invitations};

/// Body limit for message sends. Five images at 5MB each plus
/// multipart framing; per-image size is enforced again in the handler.
const MESSAGE_BODY_LIMIT: usize = 32 * 1024 * 1024;

/// Configure API routes
///
/// This function adds the following routes to the router:
///
/// ## Authentication Routes
/// - `POST /api/auth/signup` - User registration
/// - `POST /api/auth/login` - User login
/// - `GET /api/auth/me` - Get current user info (requires authentication)
///
/// ## Message Routes
/// - `GET /api/channels/{channel_id}/messages` - List messages (requires authentication)
/// - `POST /api/channels/{channel_id}/messages` - Send a message (requires authentication)
/// - `PATCH /api/channels/{channel_id}/messages/{message_id}` - Edit own message
/// - `DELETE /api/channels/{channel_id}/messages/{message_id}` - Delete own message
///
/// ## Invitation Routes
/// - `POST /api/workspaces/{workspace_id}/invitations` - Invite by email (members only)
/// - `GET /api/invitations` - Pending invitations for the current user
///
/// # Arguments
///
/// * `router` - The router to add routes to
///
/// # Returns
///
/// Router with API routes configured
///
/// # Authentication
///
/// All routes except signup and login require a JWT token in the
/// `Authorization` header.
pub fn configure_api_routes(router: Router<AppState>) -> Router<AppState> {
    router
        // Authentication endpoints
        .route(
            "/api/auth/signup",
            axum::routing::post(signup),
        )
        .route(
            "/api/auth/login",
            axum::routing::post(login),
        )
        .route(
            "/api/auth/me",
            axum::routing::get(get_me),
        )
        // Channel message endpoints
        .route(
            "/api/channels/{channel_id}/messages",
            axum::routing::get(list_messages)
                .post(create_message)
                .layer(DefaultBodyLimit::max(MESSAGE_BODY_LIMIT)),
        )
        .route(
            "/api/channels/{channel_id}/messages/{message_id}",
            axum::routing::patch(update_message).delete(delete_message),
        )
        // Invitation endpoints
        .route(
            "/api/workspaces/{workspace_id}/invitations",
            axum::routing::post(create_invitation),
        )
        .route(
            "/api/invitations",
            axum::routing::get(list_invitations),
        )
}
