//! Middleware Module
//!
//! This module contains request-processing helpers that run before
//! handler bodies, currently just authentication.
//!
//! # Architecture
//!
//! - **`auth`** - Bearer token verification and the `AuthUser` extractor

pub mod auth;

pub use auth::{authenticate_token, AuthUser, AuthenticatedUser};
