/**
 * Router Configuration
 *
 * This module provides the main router creation function that combines
 * all route configurations into a single Axum router.
 *
 * # Route Order
 *
 * Routes are added in a specific order to ensure proper matching:
 * 1. Gateway route (WebSocket upgrade)
 * 2. API routes (auth, messages, invitations)
 * 3. Upload file serving
 * 4. Fallback handler (404)
 */

use axum::extract::State;
use axum::{Json, Router};
use serde_json::json;
use crate::backend::server::state::AppState;
use crate::backend::routes::api_routes::configure_api_routes;
use tower_http::services::ServeDir;

/// Health probe. Reports whether a database pool is attached so that
/// deploys can tell a degraded instance from a healthy one.
async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "database": state.db_pool.is_some(),
    }))
}

/// Create the Axum router with all routes configured
///
/// This function sets up all HTTP routes for the application in the
/// following order:
///
/// 1. **Gateway Route**: WebSocket upgrade for realtime sessions
/// 2. **API Routes**: Authentication, messages, invitations
/// 3. **Upload Files**: Serve stored message images
/// 4. **Fallback Handler**: 404 errors
///
/// # Arguments
///
/// * `app_state` - Application state containing the gateway and database pool
///
/// # Returns
///
/// Configured Axum Router ready to serve requests
pub fn create_router(app_state: AppState) -> Router<()> {
    // Start with the gateway and health routes
    let router = Router::new()
        .route(
            "/ws",
            axum::routing::get({
                use crate::backend::gateway::handle_gateway_upgrade;
                handle_gateway_upgrade
            }),
        )
        .route("/health", axum::routing::get(health));

    // Add API routes
    let router = configure_api_routes(router);

    // Serve uploaded message images
    let router = router.nest_service("/uploads", ServeDir::new(app_state.upload_dir.clone()));

    // Fallback handler for 404
    let router =
        router.fallback(|| async { (axum::http::StatusCode::NOT_FOUND, "404 Not Found") });

    // Use AppState as router state
    router.with_state(app_state)
}
