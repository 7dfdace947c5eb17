//! Asynchronous session event types.
//!
//! Events are emitted by the device session through a
//! [`tokio::sync::broadcast`] channel whenever something happens that was
//! not the direct answer to a caller's request: connection lifecycle
//! changes, unsolicited frames pushed by the receiver, and faults in the
//! background I/Q receive loop.

/// An event emitted by the device session.
///
/// Delivered on a best-effort basis through a bounded broadcast channel;
/// slow consumers may miss events under load.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// The control connection was established.
    Connected,

    /// The control connection was closed or lost.
    Disconnected,

    /// I/Q streaming was started (receiver acknowledged the run command).
    IqStarted,

    /// I/Q streaming was stopped (receiver acknowledged the idle command).
    IqStopped,

    /// A control-channel frame arrived while no request was outstanding.
    ///
    /// These are frames the receiver sent without being asked, e.g. an
    /// asynchronous status push. The raw frame bytes are delivered as-is.
    UnsolicitedFrame(Vec<u8>),

    /// The background datagram receive loop reported a fault.
    ///
    /// The loop itself keeps running where possible; this event makes its
    /// failures observable instead of silently lost.
    StreamError(String),
}
