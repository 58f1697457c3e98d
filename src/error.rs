//! Crate-level error types.
//!
//! [`MagpieError`] unifies every error source (configuration, feed
//! transport, payload decoding, polling, persistence) behind a single
//! enum so callers can match on the variant they care about while still
//! using the `?` operator for easy propagation.

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MagpieError>;

/// Top-level error type returned by all public APIs.
#[derive(Debug, thiserror::Error)]
pub enum MagpieError {
    /// A configuration value is missing, empty, or unparseable.
    #[error("configuration error: {0}")]
    Config(String),

    /// A WebSocket operation (connect, send, receive) failed.
    #[error("websocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    /// JSON deserialization of a payload failed.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// A payload parsed as JSON but a field did not carry the expected
    /// shape (e.g. a non-numeric price string).
    ///
    /// Transport-level poll failures are not represented here; they
    /// stay inside the poll loop as
    /// [`FetchError`](crate::topic::poll::FetchError) and are retried
    /// or alerted there.
    #[error("malformed payload: {0}")]
    Malformed(String),

    /// A repository operation failed.
    #[error("persistence error: {0}")]
    Persistence(String),
}
