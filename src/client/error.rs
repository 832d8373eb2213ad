/**
 * Client Error Types
 *
 * This module defines the error enum shared by the API client, the
 * channel poller and the gateway socket client.
 *
 * # Error Categories
 *
 * | Variant       | Meaning                                        |
 * |---------------|------------------------------------------------|
 * | `Transport`   | Network or HTTP-level failure (reqwest)        |
 * | `Api`         | Server answered with a non-2xx error body      |
 * | `Gateway`     | Socket connect/protocol failure                |
 * | `Timeout`     | Authentication handshake exceeded its deadline |
 * | `Serialization` | Outgoing frame could not be encoded          |
 */

use thiserror::Error;

/// Errors surfaced by the client-side sync components
#[derive(Error, Debug)]
pub enum ClientError {
    /// The request never produced an HTTP response
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with an error status and the standard
    /// `{error, message}` body
    #[error("api error {status} ({error}): {message}")]
    Api {
        status: u16,
        error: String,
        message: String,
    },

    /// The gateway socket failed to connect or violated the protocol
    #[error("gateway error: {0}")]
    Gateway(String),

    /// The authentication handshake did not complete in time
    #[error("timed out waiting for the gateway")]
    Timeout,

    /// An outgoing event could not be encoded
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// True when the server rejected the request with the given status
    pub fn is_status(&self, status: u16) -> bool {
        matches!(self, ClientError::Api { status: s, .. } if *s == status)
    }
}
