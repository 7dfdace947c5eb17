//! TCP control link to a NetSDR receiver.
//!
//! [`TcpControlLink`] implements the [`ControlLink`] trait over a TCP
//! connection (NetSDR listens on port 50000). The link resolves framing at
//! this boundary: a background read loop reassembles complete frames from
//! the byte stream using the 2-byte length-prefixed header, so subscribers
//! always receive whole frames, never partial reads.

use async_trait::async_trait;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt, ReadHalf, WriteHalf};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use netsdr_core::error::{Error, Result};
use netsdr_core::link::ControlLink;
use netsdr_proto::{split_header, HEADER_LEN};

/// Default connection timeout (5 seconds).
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Inbound frame channel capacity.
///
/// Control traffic is low-rate request/response; a small buffer is enough
/// to absorb a burst of unsolicited status frames.
const FRAME_CHANNEL_CAPACITY: usize = 64;

/// TCP implementation of the reliable control channel.
///
/// The connection is established by [`connect`](ControlLink::connect);
/// inbound frames are delivered through the subscribe-once channel from
/// [`frames`](ControlLink::frames).
#[derive(Debug)]
pub struct TcpControlLink {
    /// The `host:port` address of the receiver's control port.
    addr: String,
    /// Connection establishment timeout.
    connect_timeout: Duration,
    /// Write half of the stream, `None` while disconnected.
    writer: Option<WriteHalf<TcpStream>>,
    /// Inbound frame channel, available until taken by the subscriber.
    frames_rx: Option<mpsc::Receiver<Vec<u8>>>,
    /// Background frame-reassembly task.
    read_handle: Option<JoinHandle<()>>,
}

impl TcpControlLink {
    /// Create a link targeting the given `host:port` address.
    ///
    /// No connection is attempted until [`connect`](ControlLink::connect).
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            writer: None,
            frames_rx: None,
            read_handle: None,
        }
    }

    /// Create a link with a custom connection timeout.
    pub fn with_connect_timeout(addr: impl Into<String>, timeout: Duration) -> Self {
        Self {
            connect_timeout: timeout,
            ..Self::new(addr)
        }
    }

    /// The address this link targets.
    pub fn addr(&self) -> &str {
        &self.addr
    }
}

#[async_trait]
impl ControlLink for TcpControlLink {
    async fn connect(&mut self) -> Result<()> {
        if self.writer.is_some() {
            return Ok(());
        }

        tracing::debug!(addr = %self.addr, "Connecting control link");

        let stream = tokio::time::timeout(self.connect_timeout, TcpStream::connect(&self.addr))
            .await
            .map_err(|_| {
                tracing::error!(addr = %self.addr, "Control connection timed out");
                Error::Timeout
            })?
            .map_err(|e| {
                tracing::error!(addr = %self.addr, error = %e, "Control connection failed");
                map_connect_error(e, &self.addr)
            })?;

        // Small request/response frames are latency-sensitive.
        if let Err(e) = stream.set_nodelay(true) {
            tracing::warn!(addr = %self.addr, error = %e, "Failed to set TCP_NODELAY");
        }

        let (read_half, write_half) = tokio::io::split(stream);
        let (frames_tx, frames_rx) = mpsc::channel(FRAME_CHANNEL_CAPACITY);

        let addr = self.addr.clone();
        let handle = tokio::spawn(async move {
            frame_read_loop(read_half, frames_tx, addr).await;
        });

        self.writer = Some(write_half);
        self.frames_rx = Some(frames_rx);
        self.read_handle = Some(handle);

        tracing::info!(addr = %self.addr, "Control link connected");
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            tracing::debug!(addr = %self.addr, "Closing control link");
            if let Err(e) = writer.shutdown().await {
                tracing::warn!(addr = %self.addr, error = %e, "Failed to shut down control stream");
            }
        }
        if let Some(handle) = self.read_handle.take() {
            handle.abort();
        }
        self.frames_rx = None;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.writer.is_some()
    }

    async fn send(&mut self, frame: &[u8]) -> Result<()> {
        let writer = self.writer.as_mut().ok_or(Error::NotConnected)?;

        tracing::trace!(addr = %self.addr, bytes = frame.len(), "Sending frame");

        writer.write_all(frame).await.map_err(map_io_error)?;
        writer.flush().await.map_err(map_io_error)?;
        Ok(())
    }

    fn frames(&mut self) -> Option<mpsc::Receiver<Vec<u8>>> {
        self.frames_rx.take()
    }
}

/// Background task: reassemble whole frames from the TCP byte stream.
///
/// Reads the 2-byte header, resolves the declared length (0 sentinel
/// included), then reads the remainder of the frame. A malformed header
/// means the stream has lost sync, so the loop terminates and the channel
/// closes, which the session observes as a connection loss.
async fn frame_read_loop(
    mut reader: ReadHalf<TcpStream>,
    frames_tx: mpsc::Sender<Vec<u8>>,
    addr: String,
) {
    loop {
        let mut header = [0u8; HEADER_LEN];
        if let Err(e) = reader.read_exact(&mut header).await {
            tracing::debug!(addr = %addr, error = %e, "Control stream closed");
            break;
        }

        let word = u16::from_le_bytes(header);
        let (kind, total_len) = split_header(word);
        if total_len < HEADER_LEN {
            tracing::warn!(
                addr = %addr,
                kind = ?kind,
                declared = total_len,
                "Invalid frame length, dropping connection"
            );
            break;
        }

        let mut frame = vec![0u8; total_len];
        frame[..HEADER_LEN].copy_from_slice(&header);
        if let Err(e) = reader.read_exact(&mut frame[HEADER_LEN..]).await {
            tracing::debug!(addr = %addr, error = %e, "Control stream closed mid-frame");
            break;
        }

        tracing::trace!(addr = %addr, kind = ?kind, bytes = total_len, "Frame received");

        if frames_tx.send(frame).await.is_err() {
            // Subscriber dropped the channel; nothing left to deliver to.
            break;
        }
    }
}

/// Map a connection-time I/O error to the appropriate [`Error`] variant.
fn map_connect_error(e: std::io::Error, addr: &str) -> Error {
    match e.kind() {
        std::io::ErrorKind::ConnectionRefused => {
            Error::Transport(format!("connection refused: {}", addr))
        }
        _ => Error::Io(e),
    }
}

/// Map a data-path I/O error to the appropriate [`Error`] variant.
fn map_io_error(e: std::io::Error) -> Error {
    match e.kind() {
        std::io::ErrorKind::ConnectionReset
        | std::io::ErrorKind::BrokenPipe
        | std::io::ErrorKind::NotConnected
        | std::io::ErrorKind::ConnectionAborted => Error::ConnectionLost,
        _ => Error::Io(e),
    }
}
