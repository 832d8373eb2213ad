/**
 * Huddle Server Entry Point
 *
 * This is the main entry point for the Huddle backend server.
 * It initializes the Axum HTTP server with the realtime gateway.
 */

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file if present
    dotenv::dotenv().ok();

    // Initialize tracing with INFO level by default
    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "info".to_string());

    eprintln!("[STARTUP] Setting RUST_LOG={}", env_filter);

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .init();

    eprintln!("[STARTUP] Tracing initialized");
    tracing::info!("[STARTUP] Server initialization started");

    // Create the Axum app
    let app = huddle::backend::server::init::create_app().await;

    let port = std::env::var("SERVER_PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse::<u16>()
        .unwrap_or(3000);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    eprintln!("[STARTUP] Starting server on {}", addr);
    tracing::info!("Starting server on {}", addr);

    // Run the server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    eprintln!("[STARTUP] Listening on {}", addr);
    eprintln!("[STARTUP] Gateway clients should connect to ws://127.0.0.1:{}/ws", port);
    axum::serve(listener, app).await?;

    Ok(())
}
