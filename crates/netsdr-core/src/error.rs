//! Error types for the netsdr crates.
//!
//! All fallible operations across the workspace return [`Result<T>`], which
//! uses [`Error`] as the error type. Transport-layer, protocol-layer, and
//! session-layer errors are all captured here.

/// The error type for all netsdr operations.
///
/// Variants cover the failure modes encountered when talking to a NetSDR
/// receiver: transport failures, malformed or oversized frames, correlation
/// timeouts, and misuse of a disconnected session. Every failure is scoped
/// to the single operation that triggered it; nothing here is fatal to the
/// process.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A transport-level error (TCP socket, UDP socket).
    #[error("transport error: {0}")]
    Transport(String),

    /// A protocol-level error (truncated frame, frame exceeding the
    /// 13-bit length field's ceiling).
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Timed out waiting for a control-channel response.
    ///
    /// The session remains connected and usable for the next request.
    #[error("timeout waiting for response")]
    Timeout,

    /// An invalid parameter was passed to an operation (e.g. an
    /// unsupported sample bit width).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// No connection to the receiver has been established.
    #[error("not connected")]
    NotConnected,

    /// The operation is not legal in the session's current state (e.g.
    /// starting I/Q streaming while a stream is already running).
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// The control connection was lost unexpectedly.
    #[error("connection lost")]
    ConnectionLost,

    /// An underlying I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenience `Result` alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;
