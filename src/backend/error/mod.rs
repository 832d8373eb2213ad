//! Backend Error Module
//!
//! This module defines the error taxonomy shared by every HTTP handler
//! and by the gateway dispatch path. Each error carries exactly one
//! category, and each category maps to exactly one HTTP status code.
//!
//! # Architecture
//!
//! The error module is organized into focused submodules:
//!
//! - **`types`** - Error type definitions, constructors and status mapping
//! - **`conversion`** - Error conversion implementations (IntoResponse, sqlx)
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - Error type definitions
//! └── conversion.rs - Error conversion implementations
//! ```
//!
//! # Error Categories
//!
//! - `Validation` - 400, malformed or unacceptable input
//! - `Authentication` - 401, missing or invalid credentials
//! - `Authorization` - 403, authenticated but not permitted
//! - `NotFound` - 404, the referenced record does not exist
//! - `Persistence` - 500, storage failed or is unavailable
//!
//! # HTTP Response Conversion
//!
//! `ApiError` implements `IntoResponse` from Axum, allowing handlers to
//! return it directly. The response body is a JSON object with a stable
//! `error` category tag and a human-readable `message`.

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

// Re-export commonly used types
pub use types::ApiError;
