//! Property-based tests
//!
//! Random-input checks for the wire envelopes and the message content
//! rules shared by both transports.

mod event_proptest;
