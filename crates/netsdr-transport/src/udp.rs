//! UDP data link carrying the I/Q sample stream.
//!
//! [`UdpDataLink`] implements the [`DataLink`] trait over a bound UDP
//! socket. The data channel is best-effort: datagrams may be lost or
//! reordered, and each datagram is one complete data-item frame. A recv
//! error never terminates the loop -- one bad datagram must not stall the
//! stream.

use async_trait::async_trait;
use std::net::SocketAddr;
use tokio::net::UdpSocket;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use netsdr_core::error::{Error, Result};
use netsdr_core::link::DataLink;

/// Largest datagram the receiver produces: one maximum-size data-item
/// frame (8194 bytes), rounded up.
const RECV_BUF_LEN: usize = 8704;

/// Inbound datagram channel capacity.
///
/// Sized to absorb scheduling jitter at the highest NetSDR output rates
/// without unbounded memory growth; overflow drops the oldest pressure
/// onto the sender, which is acceptable for a lossy channel.
const DATAGRAM_CHANNEL_CAPACITY: usize = 256;

/// UDP implementation of the connectionless data channel.
#[derive(Debug)]
pub struct UdpDataLink {
    /// Local `host:port` to bind (NetSDR streams to port 60000 by default).
    bind_addr: String,
    /// Local address once bound.
    local_addr: Option<SocketAddr>,
    /// Inbound datagram channel, available until taken by the subscriber.
    datagrams_rx: Option<mpsc::Receiver<Vec<u8>>>,
    /// Background receive task.
    recv_handle: Option<JoinHandle<()>>,
}

impl UdpDataLink {
    /// Create a link that will bind the given local address on `start()`.
    pub fn new(bind_addr: impl Into<String>) -> Self {
        Self {
            bind_addr: bind_addr.into(),
            local_addr: None,
            datagrams_rx: None,
            recv_handle: None,
        }
    }

    /// Create a link bound to the given port on all interfaces.
    pub fn with_port(port: u16) -> Self {
        Self::new(format!("0.0.0.0:{}", port))
    }

    /// The bound local address, if the link has been started.
    ///
    /// Useful when binding port 0 to discover the assigned port.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }
}

#[async_trait]
impl DataLink for UdpDataLink {
    async fn start(&mut self) -> Result<()> {
        if self.recv_handle.is_some() {
            return Ok(());
        }

        tracing::debug!(addr = %self.bind_addr, "Binding data link");

        let socket = UdpSocket::bind(&self.bind_addr).await.map_err(|e| {
            tracing::error!(addr = %self.bind_addr, error = %e, "Failed to bind UDP socket");
            Error::Io(e)
        })?;
        let local_addr = socket.local_addr().map_err(Error::Io)?;

        let (datagrams_tx, datagrams_rx) = mpsc::channel(DATAGRAM_CHANNEL_CAPACITY);
        let handle = tokio::spawn(async move {
            datagram_recv_loop(socket, datagrams_tx).await;
        });

        self.local_addr = Some(local_addr);
        self.datagrams_rx = Some(datagrams_rx);
        self.recv_handle = Some(handle);

        tracing::debug!(local_addr = %local_addr, "Data link receiving");
        Ok(())
    }

    async fn stop(&mut self) -> Result<()> {
        if let Some(handle) = self.recv_handle.take() {
            tracing::debug!(addr = %self.bind_addr, "Stopping data link");
            handle.abort();
        }
        self.datagrams_rx = None;
        self.local_addr = None;
        Ok(())
    }

    fn datagrams(&mut self) -> Option<mpsc::Receiver<Vec<u8>>> {
        self.datagrams_rx.take()
    }
}

/// Background task: receive datagrams and feed the channel.
async fn datagram_recv_loop(socket: UdpSocket, datagrams_tx: mpsc::Sender<Vec<u8>>) {
    let mut buf = [0u8; RECV_BUF_LEN];

    loop {
        match socket.recv(&mut buf).await {
            Ok(n) => {
                tracing::trace!(bytes = n, "Datagram received");
                if datagrams_tx.send(buf[..n].to_vec()).await.is_err() {
                    // Subscriber gone; stop receiving.
                    break;
                }
            }
            Err(e) => {
                // Non-fatal for UDP; keep the stream alive.
                tracing::trace!(error = %e, "UDP recv error");
            }
        }
    }
}
