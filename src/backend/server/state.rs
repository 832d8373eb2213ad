/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * The `AppState` struct is the central state container, holding:
 * - The realtime gateway handle
 * - The optional database pool
 * - The image upload directory
 *
 * # Thread Safety
 *
 * Everything here is cheap to clone per request: the gateway is behind
 * an `Arc`, `PgPool` is internally reference-counted, and the upload
 * directory is a small string.
 *
 * # State Extraction
 *
 * The `FromRef` implementations let handlers extract just the part of
 * the state they need - auth handlers take `State<Option<PgPool>>`,
 * message handlers take the full `AppState`.
 */
use axum::extract::FromRef;
use sqlx::PgPool;
use std::sync::Arc;

use crate::backend::error::ApiError;
use crate::backend::gateway::instance::Gateway;

/// Shared state for all HTTP and gateway handlers
#[derive(Clone)]
pub struct AppState {
    /// The process-wide realtime gateway
    pub gateway: Arc<Gateway>,
    /// Database pool; `None` runs the server storage-less
    pub db_pool: Option<PgPool>,
    /// Directory message images are written to
    pub upload_dir: String,
}

impl AppState {
    /// The database pool, or the persistence error handlers report
    /// when storage is required but not configured
    pub fn pool(&self) -> Result<&PgPool, ApiError> {
        self.db_pool.as_ref().ok_or_else(|| {
            tracing::error!("Database not configured");
            ApiError::persistence("database not configured")
        })
    }
}

impl FromRef<AppState> for Option<PgPool> {
    fn from_ref(state: &AppState) -> Self {
        state.db_pool.clone()
    }
}

impl FromRef<AppState> for Arc<Gateway> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.gateway)
    }
}
