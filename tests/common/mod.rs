//! Common test utilities and helpers
//!
//! This module provides shared utilities for all tests including:
//! - Database test fixtures
//! - Mock server helpers
//! - Authentication test helpers
//! - Custom assertion macros

pub mod assertions;
pub mod mock_server;
