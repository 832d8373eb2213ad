/**
 * Server Initialization
 *
 * This module handles the initialization and setup of the Axum HTTP
 * server: gateway creation, database loading, and route configuration.
 *
 * # Initialization Process
 *
 * 1. Load optional services (database)
 * 2. Initialize the process-wide gateway
 * 3. Assemble the application state
 * 4. Create and configure the router
 */
use axum::Router;

use crate::backend::gateway::instance;
use crate::backend::routes::router::create_router;
use crate::backend::server::config::{load_database, upload_dir};
use crate::backend::server::state::AppState;

/// Create and configure the Axum application
///
/// # Error Handling
///
/// The function is designed to be resilient: a missing or unreachable
/// database leaves `db_pool` unset and the server comes up anyway,
/// limited to what works without storage.
pub async fn create_app() -> Router<()> {
    tracing::info!("Initializing huddle backend server");

    // Step 1: Load optional services
    let db_pool = load_database().await;

    // Step 2: Initialize the process-wide gateway
    // Notification fan-out from HTTP handlers reaches the same
    // instance through the singleton accessors
    let gateway = instance::get_or_init();

    // Step 3: Assemble app state
    let app_state = AppState {
        gateway,
        db_pool,
        upload_dir: upload_dir(),
    };

    // Step 4: Create router with all routes
    let app = create_router(app_state);

    tracing::info!("Router configured");

    app
}
