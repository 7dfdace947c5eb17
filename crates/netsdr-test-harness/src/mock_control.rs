//! Mock control link for protocol-level testing.
//!
//! [`MockControlLink`] implements [`ControlLink`] entirely in memory,
//! enabling deterministic testing of the device session without real
//! sockets. The paired [`MockControlHandle`] stays with the test after the
//! link has been moved into the session: it records every sent frame,
//! scripts responses, and injects unsolicited frames.
//!
//! # Example
//!
//! ```
//! use netsdr_test_harness::MockControlLink;
//!
//! let (link, handle) = MockControlLink::new();
//! // Echo every request back as its response.
//! handle.set_auto_ack(true);
//! // ... move `link` into the session, assert on `handle.sent_frames()` ...
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

use netsdr_core::error::{Error, Result};
use netsdr_core::link::ControlLink;

/// Shared scripting state between a [`MockControlLink`] and its handle.
#[derive(Debug)]
struct Shared {
    /// Every frame sent through the link, in order.
    sent: Mutex<Vec<Vec<u8>>>,
    /// Scripted responses, consumed in order. Takes precedence over
    /// auto-ack.
    responses: Mutex<VecDeque<Vec<u8>>>,
    /// When set, every sent frame is echoed back as its own response.
    auto_ack: AtomicBool,
    /// Number of times `connect()` was called.
    connects: AtomicUsize,
    /// Number of times `disconnect()` was called.
    disconnects: AtomicUsize,
}

/// In-memory implementation of the reliable control channel.
#[derive(Debug)]
pub struct MockControlLink {
    shared: Arc<Shared>,
    connected: bool,
    frames_tx: mpsc::Sender<Vec<u8>>,
    frames_rx: Option<mpsc::Receiver<Vec<u8>>>,
}

/// Test-side handle to a [`MockControlLink`].
#[derive(Debug, Clone)]
pub struct MockControlHandle {
    shared: Arc<Shared>,
    frames_tx: mpsc::Sender<Vec<u8>>,
}

impl MockControlLink {
    /// Create a disconnected mock link and its scripting handle.
    pub fn new() -> (MockControlLink, MockControlHandle) {
        let shared = Arc::new(Shared {
            sent: Mutex::new(Vec::new()),
            responses: Mutex::new(VecDeque::new()),
            auto_ack: AtomicBool::new(false),
            connects: AtomicUsize::new(0),
            disconnects: AtomicUsize::new(0),
        });
        let (frames_tx, frames_rx) = mpsc::channel(64);

        let link = MockControlLink {
            shared: Arc::clone(&shared),
            connected: false,
            frames_tx: frames_tx.clone(),
            frames_rx: Some(frames_rx),
        };
        let handle = MockControlHandle { shared, frames_tx };
        (link, handle)
    }
}

#[async_trait]
impl ControlLink for MockControlLink {
    async fn connect(&mut self) -> Result<()> {
        self.shared.connects.fetch_add(1, Ordering::SeqCst);
        self.connected = true;
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        self.shared.disconnects.fetch_add(1, Ordering::SeqCst);
        self.connected = false;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    async fn send(&mut self, frame: &[u8]) -> Result<()> {
        if !self.connected {
            return Err(Error::NotConnected);
        }

        self.shared.sent.lock().unwrap().push(frame.to_vec());

        let response = {
            let mut responses = self.shared.responses.lock().unwrap();
            responses.pop_front()
        };
        let response = match response {
            Some(r) => Some(r),
            None if self.shared.auto_ack.load(Ordering::SeqCst) => Some(frame.to_vec()),
            None => None,
        };

        if let Some(response) = response {
            let _ = self.frames_tx.send(response).await;
        }
        Ok(())
    }

    fn frames(&mut self) -> Option<mpsc::Receiver<Vec<u8>>> {
        self.frames_rx.take()
    }
}

impl MockControlHandle {
    /// All frames sent through the link so far, in order.
    pub fn sent_frames(&self) -> Vec<Vec<u8>> {
        self.shared.sent.lock().unwrap().clone()
    }

    /// Forget the frames recorded so far.
    pub fn clear_sent(&self) {
        self.shared.sent.lock().unwrap().clear();
    }

    /// Script the response to the next otherwise-unscripted send.
    pub fn enqueue_response(&self, frame: &[u8]) {
        self.shared
            .responses
            .lock()
            .unwrap()
            .push_back(frame.to_vec());
    }

    /// When enabled, every sent frame is echoed back as its response
    /// unless a scripted response is queued. Disabled by default, which
    /// makes the link silent -- useful for timeout tests.
    pub fn set_auto_ack(&self, enabled: bool) {
        self.shared.auto_ack.store(enabled, Ordering::SeqCst);
    }

    /// Deliver a frame as if the device pushed it spontaneously.
    pub async fn inject_frame(&self, frame: &[u8]) {
        let _ = self.frames_tx.send(frame.to_vec()).await;
    }

    /// Number of `connect()` calls observed.
    pub fn connect_count(&self) -> usize {
        self.shared.connects.load(Ordering::SeqCst)
    }

    /// Number of `disconnect()` calls observed.
    pub fn disconnect_count(&self) -> usize {
        self.shared.disconnects.load(Ordering::SeqCst)
    }
}
