//! Route Configuration Module
//!
//! This module configures all HTTP routes for the backend server.
//! Routes are organized by functionality into focused submodules.
//!
//! # Architecture
//!
//! The routes module is organized into focused submodules:
//!
//! - **`router`** - Main router creation and route assembly
//! - **`api_routes`** - API endpoints (auth, messages, invitations)
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs          - Module exports and documentation
//! ├── router.rs       - Main router creation
//! └── api_routes.rs   - API endpoint handlers
//! ```
//!
//! # Route Organization
//!
//! Routes are added in a specific order to ensure proper matching:
//!
//! 1. **Gateway Route** - WebSocket upgrade endpoint
//! 2. **API Routes** - Authentication, messages, invitations
//! 3. **Upload Files** - Stored message images
//! 4. **Fallback Handler** - 404 errors
//!
//! # Route Types
//!
//! ## Gateway Route
//!
//! - `GET /ws` - WebSocket upgrade for the realtime gateway
//!
//! ## API Routes
//!
//! - `POST /api/auth/signup` - User registration
//! - `POST /api/auth/login` - User login
//! - `GET /api/auth/me` - Get current user
//! - `GET /api/channels/{channel_id}/messages` - List channel messages
//! - `POST /api/channels/{channel_id}/messages` - Send a message (JSON or multipart)
//! - `PATCH /api/channels/{channel_id}/messages/{message_id}` - Edit a message
//! - `DELETE /api/channels/{channel_id}/messages/{message_id}` - Delete a message
//! - `POST /api/workspaces/{workspace_id}/invitations` - Invite a user by email
//! - `GET /api/invitations` - List pending invitations for the current user
//!
//! ## Upload Files
//!
//! Message images are served from the upload directory under `/uploads`.
//!
//! # Dependencies
//!
//! - `backend::server::state` - Application state
//! - `backend::gateway` - WebSocket upgrade handler
//! - `backend::auth` - Authentication handlers
//! - `backend::messages` - Message REST handlers
//! - `backend::workspaces` - Invitation handlers

/// Main router creation
pub mod router;

/// API endpoint handlers
pub mod api_routes;

// Re-export commonly used functions
pub use router::create_router;
