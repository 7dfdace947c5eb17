//! Mock data link for driving the I/Q sample path in tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

use netsdr_core::error::Result;
use netsdr_core::link::DataLink;

#[derive(Debug)]
struct Shared {
    started: AtomicBool,
    starts: AtomicUsize,
    stops: AtomicUsize,
    /// Sender for the current datagram channel. Replaced when `start()`
    /// opens a fresh channel after the previous receiver was consumed.
    datagrams_tx: Mutex<mpsc::Sender<Vec<u8>>>,
}

/// In-memory implementation of the best-effort data channel.
///
/// Datagrams never arrive from a socket; the test injects them through
/// the paired [`MockDataHandle`].
#[derive(Debug)]
pub struct MockDataLink {
    shared: Arc<Shared>,
    datagrams_rx: Option<mpsc::Receiver<Vec<u8>>>,
}

/// Test-side handle to a [`MockDataLink`].
#[derive(Debug, Clone)]
pub struct MockDataHandle {
    shared: Arc<Shared>,
}

impl MockDataLink {
    /// Create a stopped mock data link and its handle.
    pub fn new() -> (MockDataLink, MockDataHandle) {
        let (datagrams_tx, datagrams_rx) = mpsc::channel(256);
        let shared = Arc::new(Shared {
            started: AtomicBool::new(false),
            starts: AtomicUsize::new(0),
            stops: AtomicUsize::new(0),
            datagrams_tx: Mutex::new(datagrams_tx),
        });

        let link = MockDataLink {
            shared: Arc::clone(&shared),
            datagrams_rx: Some(datagrams_rx),
        };
        let handle = MockDataHandle { shared };
        (link, handle)
    }
}

#[async_trait]
impl DataLink for MockDataLink {
    async fn start(&mut self) -> Result<()> {
        self.shared.starts.fetch_add(1, Ordering::SeqCst);
        self.shared.started.store(true, Ordering::SeqCst);

        // Like a real socket, a restart produces a fresh inbound channel.
        if self.datagrams_rx.is_none() {
            let (datagrams_tx, datagrams_rx) = mpsc::channel(256);
            *self.shared.datagrams_tx.lock().unwrap() = datagrams_tx;
            self.datagrams_rx = Some(datagrams_rx);
        }
        Ok(())
    }

    async fn stop(&mut self) -> Result<()> {
        self.shared.stops.fetch_add(1, Ordering::SeqCst);
        self.shared.started.store(false, Ordering::SeqCst);
        self.datagrams_rx = None;
        Ok(())
    }

    fn datagrams(&mut self) -> Option<mpsc::Receiver<Vec<u8>>> {
        self.datagrams_rx.take()
    }
}

impl MockDataHandle {
    /// Whether the link is currently started.
    pub fn is_started(&self) -> bool {
        self.shared.started.load(Ordering::SeqCst)
    }

    /// Number of `start()` calls observed.
    pub fn start_count(&self) -> usize {
        self.shared.starts.load(Ordering::SeqCst)
    }

    /// Number of `stop()` calls observed.
    pub fn stop_count(&self) -> usize {
        self.shared.stops.load(Ordering::SeqCst)
    }

    /// Deliver a datagram as if it arrived on the data channel.
    pub async fn inject_datagram(&self, datagram: &[u8]) {
        let tx = self.shared.datagrams_tx.lock().unwrap().clone();
        let _ = tx.send(datagram.to_vec()).await;
    }
}
