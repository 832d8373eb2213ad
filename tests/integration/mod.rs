//! Integration tests
//!
//! End-to-end tests for the gateway, the REST surface, the shared
//! mutation service, and the client components.

mod client_test;
mod gateway_test;
mod message_service_test;
