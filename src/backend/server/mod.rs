//! Server Module
//!
//! This module contains all server-side wiring for initializing and
//! configuring the Axum HTTP server.
//!
//! # Architecture
//!
//! The server module is organized into focused submodules:
//!
//! - **`state`** - Application state structure and `FromRef` implementations
//! - **`config`** - Configuration loading (database, upload directory)
//! - **`init`** - Server initialization and app creation
//!
//! # Initialization Flow
//!
//! 1. **Configuration Loading**: Connects the database if configured
//! 2. **Gateway Initialization**: Brings up the process-wide gateway
//! 3. **Router Creation**: Configures all routes against the app state

/// Application state management
pub mod state;

/// Server configuration loading
pub mod config;

/// Server initialization
pub mod init;

// Re-export commonly used types
pub use init::create_app;
pub use state::AppState;
