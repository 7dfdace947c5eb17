//! Collaborator traits for the two NetSDR channels.
//!
//! The device session in `netsdr-client` is written against these traits
//! rather than concrete sockets, enabling both real network operation
//! (`netsdr-transport`) and deterministic unit testing with the mock links
//! from `netsdr-test-harness`.
//!
//! Both traits hand inbound traffic to the session through a
//! subscribe-once [`mpsc`] channel: the session is the sole subscriber and
//! fans out internally. Framing is resolved below this boundary -- a
//! [`ControlLink`] delivers whole frames, never a raw byte stream.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::Result;

/// Reliable, connection-oriented control channel to the receiver.
///
/// Implementations handle connection establishment, whole-frame delivery,
/// and error recovery at the transport layer. Protocol-level concerns
/// (message kinds, control-item codes, correlation) live in the session.
#[async_trait]
pub trait ControlLink: Send {
    /// Open the connection.
    ///
    /// Behavior when already connected is implementation-defined; the
    /// session guards idempotence itself.
    async fn connect(&mut self) -> Result<()>;

    /// Close the connection. Legal in any state.
    async fn disconnect(&mut self) -> Result<()>;

    /// Whether the connection is currently open.
    fn is_connected(&self) -> bool;

    /// Send one complete frame.
    ///
    /// Implementations should not return until all bytes have been handed
    /// to the underlying transport.
    async fn send(&mut self, frame: &[u8]) -> Result<()>;

    /// Take the inbound frame channel.
    ///
    /// Each received value is one complete frame, header included. The
    /// channel may be taken at most once per connection; subsequent calls
    /// return `None`. The channel closes when the connection is lost.
    fn frames(&mut self) -> Option<mpsc::Receiver<Vec<u8>>>;
}

/// Connectionless, high-rate data channel carrying I/Q datagrams.
///
/// UDP is assumed best-effort with no retransmission; implementations
/// must never let one bad datagram stall the receive loop.
#[async_trait]
pub trait DataLink: Send {
    /// Start the receive loop.
    async fn start(&mut self) -> Result<()>;

    /// Stop the receive loop. Legal when not started.
    async fn stop(&mut self) -> Result<()>;

    /// Take the inbound datagram channel.
    ///
    /// Each received value is one whole datagram. May be taken at most
    /// once per `start()`; subsequent calls return `None`.
    fn datagrams(&mut self) -> Option<mpsc::Receiver<Vec<u8>>>;
}
