//! Error types for the conductor API client.
//!
//! # Design
//! One variant per failure plane, nothing finer. Every non-2xx response lands
//! in `Http` with the raw status code and body — callers distinguish 401 from
//! 404 from 500 by status, and the client never refines them into domain
//! errors. Network-level failures (timeout, refused connection, DNS) are a
//! separate `Transport` variant so callers can tell "the server said no" from
//! "the server never answered."

use std::fmt;

/// Errors returned by [`ConductorClient`](crate::ConductorClient) operations.
#[derive(Debug)]
pub enum ApiError {
    /// The server answered with a status outside the 2xx range. Carries the
    /// raw response body; error bodies are never JSON-decoded.
    Http { status: u16, body: String },

    /// The request never completed: timeout, connection refused, DNS
    /// failure, or any other transport-level problem.
    Transport(String),

    /// The request payload could not be serialized to JSON.
    Serialization(String),

    /// The response body could not be decoded as JSON.
    Deserialization(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Http { status, body } => {
                write!(f, "HTTP {status}: {body}")
            }
            ApiError::Transport(msg) => {
                write!(f, "transport failure: {msg}")
            }
            ApiError::Serialization(msg) => {
                write!(f, "serialization failed: {msg}")
            }
            ApiError::Deserialization(msg) => {
                write!(f, "deserialization failed: {msg}")
            }
        }
    }
}

impl std::error::Error for ApiError {}
