//! NetSDR device session.
//!
//! [`NetSdrClient`] owns a control link and a data link and drives the
//! session state machine: Disconnected, Connected-Idle, and
//! Connected-Streaming. All control traffic flows through a single
//! request/response correlation point; I/Q datagrams are decoded in a
//! background task and forwarded to the caller's sample sink.
//!
//! The protocol has no transaction identifiers, so correlation rests on one
//! rule: while a request is pending, the first inbound control frame is its
//! response. A request gate serializes callers so that two pending requests
//! can never coexist.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, oneshot, Mutex};
use tokio::task::JoinHandle;

use netsdr_core::error::{Error, Result};
use netsdr_core::events::SessionEvent;
use netsdr_core::link::{ControlLink, DataLink};
use netsdr_proto::message::{decode_message, encode_control_item, ControlItem, MsgKind};
use netsdr_proto::samples::decode_samples;

/// Bit width of I/Q samples on the data channel.
pub const IQ_SAMPLE_BITS: u16 = 16;

/// I/Q output sample rate configured at connect time, in samples/second.
const DEFAULT_IQ_SAMPLE_RATE: u64 = 100_000;

/// ReceiverState parameters to start capture: complex I/Q output, run,
/// 16-bit FIFO mode, one contiguous block.
const IQ_START_PARAMS: [u8; 4] = [0x80, 0x02, 0x01, 0x01];

/// ReceiverState parameters to return the receiver to idle.
const IQ_STOP_PARAMS: [u8; 4] = [0x00, 0x01, 0x00, 0x00];

/// Session event channel capacity.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Tunable session parameters.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// How long `request()` waits for the device's response before giving
    /// up with [`Error::Timeout`].
    pub response_timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            response_timeout: Duration::from_secs(5),
        }
    }
}

/// One decoded data-item frame's worth of samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleBatch {
    /// Sequence number carried by the data-item frame.
    pub sequence: u16,
    /// Zero-extended samples in arrival order.
    pub samples: Vec<u32>,
}

/// Shared state resolved by the control dispatch task.
type PendingSlot = Arc<Mutex<Option<oneshot::Sender<Vec<u8>>>>>;

/// Device session for a NetSDR-style receiver.
///
/// Generic over its two channel collaborators so tests can substitute the
/// in-memory mocks from `netsdr-test-harness` for the real sockets.
pub struct NetSdrClient<C, D>
where
    C: ControlLink + 'static,
    D: DataLink + 'static,
{
    control: Arc<Mutex<C>>,
    data: Arc<Mutex<D>>,
    options: ClientOptions,
    connected: Arc<AtomicBool>,
    streaming: AtomicBool,
    /// At most one request awaits a response at any time.
    pending: PendingSlot,
    /// Serializes `request()` callers; held across the response await.
    request_gate: Mutex<()>,
    /// Serializes session lifecycle operations (connect, disconnect,
    /// start/stop streaming).
    op_lock: Mutex<()>,
    event_tx: broadcast::Sender<SessionEvent>,
    sample_tx: mpsc::Sender<SampleBatch>,
    dispatch_handle: Mutex<Option<JoinHandle<()>>>,
    sample_handle: Mutex<Option<JoinHandle<()>>>,
}

impl<C, D> NetSdrClient<C, D>
where
    C: ControlLink + 'static,
    D: DataLink + 'static,
{
    /// Create a session over the given links with default options.
    ///
    /// Decoded sample batches are delivered to `sample_tx` while streaming.
    pub fn new(control: C, data: D, sample_tx: mpsc::Sender<SampleBatch>) -> Self {
        Self::with_options(control, data, sample_tx, ClientOptions::default())
    }

    /// Create a session with explicit options.
    pub fn with_options(
        control: C,
        data: D,
        sample_tx: mpsc::Sender<SampleBatch>,
        options: ClientOptions,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            control: Arc::new(Mutex::new(control)),
            data: Arc::new(Mutex::new(data)),
            options,
            connected: Arc::new(AtomicBool::new(false)),
            streaming: AtomicBool::new(false),
            pending: Arc::new(Mutex::new(None)),
            request_gate: Mutex::new(()),
            op_lock: Mutex::new(()),
            event_tx,
            sample_tx,
            dispatch_handle: Mutex::new(None),
            sample_handle: Mutex::new(None),
        }
    }

    /// Subscribe to session events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.event_tx.subscribe()
    }

    /// Whether the control connection is established.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Whether I/Q streaming is active.
    pub fn is_streaming(&self) -> bool {
        self.streaming.load(Ordering::SeqCst)
    }

    /// Connect to the receiver and apply the initial configuration.
    ///
    /// Idempotent: calling on an already-connected session returns `Ok`
    /// without touching the device. After the control link opens, three
    /// setup requests go out in fixed order (I/Q output sample rate, RF
    /// filter selection, A/D modes), each awaited before the next. Setup
    /// failures are logged but do not tear the connection back down.
    pub async fn connect(&self) -> Result<()> {
        let _op = self.op_lock.lock().await;
        if self.is_connected() {
            tracing::debug!("Already connected");
            return Ok(());
        }

        let frames = {
            let mut control = self.control.lock().await;
            control.connect().await?;
            control
                .frames()
                .ok_or_else(|| Error::Transport("control frame channel already taken".into()))?
        };

        self.connected.store(true, Ordering::SeqCst);
        let handle = tokio::spawn(control_dispatch_loop(
            frames,
            Arc::clone(&self.pending),
            self.event_tx.clone(),
            Arc::clone(&self.connected),
        ));
        *self.dispatch_handle.lock().await = Some(handle);

        let _ = self.event_tx.send(SessionEvent::Connected);
        tracing::debug!("Control link connected");

        let setup: [(ControlItem, Vec<u8>); 3] = [
            (
                ControlItem::IqOutputSampleRate,
                DEFAULT_IQ_SAMPLE_RATE.to_le_bytes()[..5].to_vec(),
            ),
            (ControlItem::RfFilter, vec![0x00, 0x00]),
            (ControlItem::AdModes, vec![0x00, 0x03]),
        ];
        for (item, params) in setup {
            if let Err(e) = self.set_control_item(item, &params).await {
                tracing::warn!(item = ?item, error = %e, "Setup request failed");
            }
        }
        Ok(())
    }

    /// Tear the session down. Legal from any state.
    pub async fn disconnect(&self) -> Result<()> {
        let _op = self.op_lock.lock().await;

        if self.streaming.swap(false, Ordering::SeqCst) {
            if let Err(e) = self.data.lock().await.stop().await {
                tracing::warn!(error = %e, "Data link stop failed during disconnect");
            }
            if let Some(handle) = self.sample_handle.lock().await.take() {
                handle.abort();
            }
        }

        if let Some(handle) = self.dispatch_handle.lock().await.take() {
            handle.abort();
        }
        // Drop any armed pending sender so a stuck waiter errors out.
        self.pending.lock().await.take();

        {
            let mut control = self.control.lock().await;
            if control.is_connected() {
                control.disconnect().await?;
            }
        }

        if self.connected.swap(false, Ordering::SeqCst) {
            let _ = self.event_tx.send(SessionEvent::Disconnected);
            tracing::debug!("Disconnected");
        }
        Ok(())
    }

    /// Tune a receiver channel's NCO frequency.
    ///
    /// The frequency travels as the lowest 5 little-endian bytes of the
    /// 64-bit value, preceded by the channel selector byte.
    pub async fn change_frequency(&self, hz: u64, channel: u8) -> Result<()> {
        if !self.is_connected() {
            return Err(Error::NotConnected);
        }
        let mut params = Vec::with_capacity(6);
        params.push(channel);
        params.extend_from_slice(&hz.to_le_bytes()[..5]);

        tracing::debug!(hz, channel, "Changing frequency");
        self.set_control_item(ControlItem::ReceiverFrequency, &params)
            .await?;
        Ok(())
    }

    /// Start I/Q streaming. Legal only while connected and idle.
    ///
    /// The receiver is commanded to run first; the data link starts only
    /// after the acknowledgment, so the caller never blocks on the
    /// best-effort channel.
    pub async fn start_iq(&self) -> Result<()> {
        let _op = self.op_lock.lock().await;
        if !self.is_connected() {
            return Err(Error::NotConnected);
        }
        if self.streaming.load(Ordering::SeqCst) {
            return Err(Error::InvalidState("I/Q streaming already started".into()));
        }

        self.set_control_item(ControlItem::ReceiverState, &IQ_START_PARAMS)
            .await?;

        let datagrams = {
            let mut data = self.data.lock().await;
            data.start().await?;
            data.datagrams()
                .ok_or_else(|| Error::Transport("datagram channel already taken".into()))?
        };
        let handle = tokio::spawn(datagram_dispatch_loop(
            datagrams,
            self.sample_tx.clone(),
            self.event_tx.clone(),
        ));
        *self.sample_handle.lock().await = Some(handle);

        self.streaming.store(true, Ordering::SeqCst);
        let _ = self.event_tx.send(SessionEvent::IqStarted);
        tracing::debug!("I/Q streaming started");
        Ok(())
    }

    /// Stop I/Q streaming. Legal only while streaming.
    pub async fn stop_iq(&self) -> Result<()> {
        let _op = self.op_lock.lock().await;
        if !self.is_connected() {
            return Err(Error::NotConnected);
        }
        if !self.streaming.load(Ordering::SeqCst) {
            return Err(Error::InvalidState("I/Q streaming not started".into()));
        }

        self.set_control_item(ControlItem::ReceiverState, &IQ_STOP_PARAMS)
            .await?;

        self.data.lock().await.stop().await?;
        if let Some(handle) = self.sample_handle.lock().await.take() {
            handle.abort();
        }

        self.streaming.store(false, Ordering::SeqCst);
        let _ = self.event_tx.send(SessionEvent::IqStopped);
        tracing::debug!("I/Q streaming stopped");
        Ok(())
    }

    /// Encode and send a set-control-item request, returning the response
    /// body.
    async fn set_control_item(&self, item: ControlItem, params: &[u8]) -> Result<Vec<u8>> {
        let frame = encode_control_item(MsgKind::SetControlItem, item, params)?;
        self.request(frame).await
    }

    /// Send a control frame and await its response.
    ///
    /// The request gate serializes callers, so at most one request is ever
    /// pending. The pending slot is disarmed on every exit path; a timeout
    /// leaves the session connected and ready for the next request.
    async fn request(&self, frame: Vec<u8>) -> Result<Vec<u8>> {
        let _gate = self.request_gate.lock().await;
        if !self.is_connected() {
            return Err(Error::NotConnected);
        }

        let (tx, rx) = oneshot::channel();
        *self.pending.lock().await = Some(tx);

        tracing::trace!(len = frame.len(), "Sending request");
        if let Err(e) = self.control.lock().await.send(&frame).await {
            self.pending.lock().await.take();
            return Err(e);
        }

        match tokio::time::timeout(self.options.response_timeout, rx).await {
            Ok(Ok(response)) => {
                let msg = decode_message(&response)?;
                if !msg.recognized {
                    tracing::warn!("Response carries an unrecognized control item");
                }
                tracing::trace!(len = response.len(), "Response received");
                Ok(msg.body.to_vec())
            }
            Ok(Err(_)) => {
                self.pending.lock().await.take();
                Err(Error::ConnectionLost)
            }
            Err(_) => {
                self.pending.lock().await.take();
                tracing::warn!("Request timed out");
                Err(Error::Timeout)
            }
        }
    }
}

/// Background task: route inbound control frames.
///
/// A frame either resolves the pending request or, when nothing is
/// pending, surfaces as an unsolicited-frame event. Channel closure means
/// the control connection is gone.
async fn control_dispatch_loop(
    mut frames: mpsc::Receiver<Vec<u8>>,
    pending: PendingSlot,
    event_tx: broadcast::Sender<SessionEvent>,
    connected: Arc<AtomicBool>,
) {
    while let Some(frame) = frames.recv().await {
        tracing::trace!(len = frame.len(), "Control frame received");
        let sender = pending.lock().await.take();
        match sender {
            Some(tx) => {
                if let Err(frame) = tx.send(frame) {
                    // Requester already gave up (timeout); treat the late
                    // response as unsolicited.
                    let _ = event_tx.send(SessionEvent::UnsolicitedFrame(frame));
                }
            }
            None => {
                let _ = event_tx.send(SessionEvent::UnsolicitedFrame(frame));
            }
        }
    }

    // Frame channel closed underneath us: connection lost.
    pending.lock().await.take();
    if connected.swap(false, Ordering::SeqCst) {
        tracing::error!("Control connection lost");
        let _ = event_tx.send(SessionEvent::Disconnected);
    }
}

/// Background task: decode datagrams into sample batches.
///
/// One malformed datagram never stalls the stream; decode failures are
/// reported as [`SessionEvent::StreamError`] and skipped. The sink send is
/// non-blocking so a slow consumer drops batches instead of backing up the
/// receive loop.
async fn datagram_dispatch_loop(
    mut datagrams: mpsc::Receiver<Vec<u8>>,
    sample_tx: mpsc::Sender<SampleBatch>,
    event_tx: broadcast::Sender<SessionEvent>,
) {
    while let Some(datagram) = datagrams.recv().await {
        let msg = match decode_message(&datagram) {
            Ok(msg) => msg,
            Err(e) => {
                tracing::trace!(error = %e, "Skipping malformed datagram");
                let _ = event_tx.send(SessionEvent::StreamError(e.to_string()));
                continue;
            }
        };
        if !msg.kind.is_data_item() {
            tracing::trace!(kind = ?msg.kind, "Ignoring non-data datagram");
            continue;
        }

        let samples: Vec<u32> = match decode_samples(IQ_SAMPLE_BITS, msg.body) {
            Ok(samples) => samples.collect(),
            Err(e) => {
                let _ = event_tx.send(SessionEvent::StreamError(e.to_string()));
                continue;
            }
        };
        let batch = SampleBatch {
            sequence: msg.sequence,
            samples,
        };
        if sample_tx.try_send(batch).is_err() {
            tracing::trace!("Sample sink full; batch dropped");
        }
    }
    tracing::debug!("Datagram dispatch ended");
}

// ---- Tests ----

#[cfg(test)]
mod tests {
    use super::*;
    use netsdr_proto::message::encode_data_item;
    use netsdr_test_harness::{MockControlHandle, MockControlLink, MockDataHandle, MockDataLink};

    const TEST_TIMEOUT: Duration = Duration::from_millis(100);

    fn test_client() -> (
        NetSdrClient<MockControlLink, MockDataLink>,
        MockControlHandle,
        MockDataHandle,
        mpsc::Receiver<SampleBatch>,
    ) {
        netsdr_test_harness::init_test_logging();
        let (control, control_handle) = MockControlLink::new();
        let (data, data_handle) = MockDataLink::new();
        let (sample_tx, sample_rx) = mpsc::channel(64);
        let options = ClientOptions {
            response_timeout: TEST_TIMEOUT,
        };
        let client = NetSdrClient::with_options(control, data, sample_tx, options);
        (client, control_handle, data_handle, sample_rx)
    }

    async fn recv_event(rx: &mut broadcast::Receiver<SessionEvent>) -> SessionEvent {
        tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("timed out waiting for event")
            .expect("event channel closed")
    }

    #[tokio::test]
    async fn connect_sends_setup_requests_in_order() {
        let (client, control, _data, _samples) = test_client();
        control.set_auto_ack(true);

        client.connect().await.unwrap();
        assert!(client.is_connected());

        let sent = control.sent_frames();
        assert_eq!(sent.len(), 3);

        let expected_items = [
            (
                ControlItem::IqOutputSampleRate,
                vec![0xA0, 0x86, 0x01, 0x00, 0x00],
            ),
            (ControlItem::RfFilter, vec![0x00, 0x00]),
            (ControlItem::AdModes, vec![0x00, 0x03]),
        ];
        for (frame, (item, params)) in sent.iter().zip(expected_items) {
            let msg = decode_message(frame).unwrap();
            assert_eq!(msg.kind, MsgKind::SetControlItem);
            assert_eq!(msg.item, Some(item));
            assert_eq!(msg.body, &params[..]);
        }
    }

    #[tokio::test]
    async fn connect_is_idempotent() {
        let (client, control, _data, _samples) = test_client();
        control.set_auto_ack(true);

        client.connect().await.unwrap();
        client.connect().await.unwrap();

        assert_eq!(control.connect_count(), 1);
        assert_eq!(control.sent_frames().len(), 3, "setup runs once");
    }

    #[tokio::test]
    async fn connect_succeeds_when_setup_times_out() {
        let (client, control, _data, _samples) = test_client();
        // Silent device: every setup request times out.
        client.connect().await.unwrap();

        assert!(client.is_connected());
        assert_eq!(control.sent_frames().len(), 3);
    }

    #[tokio::test]
    async fn change_frequency_encodes_channel_and_five_byte_frequency() {
        let (client, control, _data, _samples) = test_client();
        control.set_auto_ack(true);
        client.connect().await.unwrap();
        control.clear_sent();

        client.change_frequency(145_500_000, 1).await.unwrap();

        let sent = control.sent_frames();
        assert_eq!(sent.len(), 1);
        let msg = decode_message(&sent[0]).unwrap();
        assert_eq!(msg.kind, MsgKind::SetControlItem);
        assert_eq!(msg.item, Some(ControlItem::ReceiverFrequency));

        let mut expected = vec![0x01];
        expected.extend_from_slice(&145_500_000u64.to_le_bytes()[..5]);
        assert_eq!(msg.body, &expected[..]);
    }

    #[tokio::test]
    async fn change_frequency_requires_connection() {
        let (client, _control, _data, _samples) = test_client();
        let err = client.change_frequency(7_100_000, 0).await.unwrap_err();
        assert!(matches!(err, Error::NotConnected));
    }

    #[tokio::test]
    async fn start_and_stop_iq_transition_state() {
        let (client, control, data, _samples) = test_client();
        control.set_auto_ack(true);
        client.connect().await.unwrap();
        control.clear_sent();

        client.start_iq().await.unwrap();
        assert!(client.is_streaming());
        assert!(data.is_started());

        client.stop_iq().await.unwrap();
        assert!(!client.is_streaming());
        assert!(!data.is_started());
        assert_eq!(data.stop_count(), 1);

        let sent = control.sent_frames();
        assert_eq!(sent.len(), 2, "exactly one start and one stop request");

        let start = decode_message(&sent[0]).unwrap();
        assert_eq!(start.item, Some(ControlItem::ReceiverState));
        assert_eq!(start.body, &IQ_START_PARAMS[..]);

        let stop = decode_message(&sent[1]).unwrap();
        assert_eq!(stop.item, Some(ControlItem::ReceiverState));
        assert_eq!(stop.body, &IQ_STOP_PARAMS[..]);
    }

    #[tokio::test]
    async fn start_iq_requires_connection() {
        let (client, _control, _data, _samples) = test_client();
        assert!(matches!(
            client.start_iq().await.unwrap_err(),
            Error::NotConnected
        ));
    }

    #[tokio::test]
    async fn start_iq_twice_is_invalid() {
        let (client, control, _data, _samples) = test_client();
        control.set_auto_ack(true);
        client.connect().await.unwrap();

        client.start_iq().await.unwrap();
        assert!(matches!(
            client.start_iq().await.unwrap_err(),
            Error::InvalidState(_)
        ));
        assert!(client.is_streaming(), "state unchanged by rejected call");
    }

    #[tokio::test]
    async fn stop_iq_while_idle_is_invalid() {
        let (client, control, _data, _samples) = test_client();
        control.set_auto_ack(true);
        client.connect().await.unwrap();

        assert!(matches!(
            client.stop_iq().await.unwrap_err(),
            Error::InvalidState(_)
        ));
    }

    #[tokio::test]
    async fn timeout_leaves_session_usable() {
        let (client, control, _data, _samples) = test_client();
        control.set_auto_ack(true);
        client.connect().await.unwrap();

        control.set_auto_ack(false);
        let err = client.change_frequency(14_200_000, 0).await.unwrap_err();
        assert!(matches!(err, Error::Timeout));
        assert!(client.is_connected(), "timeout does not disconnect");

        control.set_auto_ack(true);
        client.change_frequency(14_200_000, 0).await.unwrap();
    }

    #[tokio::test]
    async fn unsolicited_frame_emitted_as_event() {
        let (client, control, _data, _samples) = test_client();
        control.set_auto_ack(true);
        client.connect().await.unwrap();

        let mut events = client.subscribe();
        let frame =
            encode_control_item(MsgKind::CurrentControlItem, ControlItem::ReceiverState, &[0x01])
                .unwrap();
        control.inject_frame(&frame).await;

        match recv_event(&mut events).await {
            SessionEvent::UnsolicitedFrame(bytes) => assert_eq!(bytes, frame),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn datagrams_flow_to_sample_sink() {
        let (client, control, data, mut samples) = test_client();
        control.set_auto_ack(true);
        client.connect().await.unwrap();
        client.start_iq().await.unwrap();

        // Sequence 7, then two 16-bit samples.
        let mut params = vec![0x07, 0x00];
        params.extend_from_slice(&[0x01, 0x02, 0x03, 0x04]);
        let datagram = encode_data_item(MsgKind::DataItem0, &params).unwrap();
        data.inject_datagram(&datagram).await;

        let batch = tokio::time::timeout(Duration::from_secs(2), samples.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(batch.sequence, 7);
        assert_eq!(batch.samples, vec![0x0201, 0x0403]);
    }

    #[tokio::test]
    async fn malformed_datagram_does_not_stall_stream() {
        let (client, control, data, mut samples) = test_client();
        control.set_auto_ack(true);
        client.connect().await.unwrap();
        client.start_iq().await.unwrap();

        // Too short to carry a header; skipped with a stream error.
        data.inject_datagram(&[0x01]).await;

        let mut params = vec![0x02, 0x00];
        params.extend_from_slice(&[0xAA, 0xBB]);
        let datagram = encode_data_item(MsgKind::DataItem0, &params).unwrap();
        data.inject_datagram(&datagram).await;

        let batch = tokio::time::timeout(Duration::from_secs(2), samples.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(batch.sequence, 2);
        assert_eq!(batch.samples, vec![0xBBAA]);
    }

    #[tokio::test]
    async fn concurrent_requests_are_serialized() {
        let (client, control, _data, _samples) = test_client();
        control.set_auto_ack(true);
        client.connect().await.unwrap();
        control.clear_sent();

        let (a, b) = tokio::join!(
            client.change_frequency(7_000_000, 0),
            client.change_frequency(14_000_000, 0),
        );
        a.unwrap();
        b.unwrap();
        assert_eq!(control.sent_frames().len(), 2);
    }

    #[tokio::test]
    async fn disconnect_from_streaming_tears_everything_down() {
        let (client, control, data, _samples) = test_client();
        control.set_auto_ack(true);
        client.connect().await.unwrap();
        client.start_iq().await.unwrap();

        client.disconnect().await.unwrap();
        assert!(!client.is_connected());
        assert!(!client.is_streaming());
        assert!(!data.is_started());
        assert_eq!(control.disconnect_count(), 1);
    }

    #[tokio::test]
    async fn disconnect_while_disconnected_is_noop() {
        let (client, control, _data, _samples) = test_client();
        client.disconnect().await.unwrap();
        assert_eq!(control.disconnect_count(), 0);
    }

    #[tokio::test]
    async fn lifecycle_events_emitted_in_order() {
        let (client, control, _data, _samples) = test_client();
        control.set_auto_ack(true);
        let mut events = client.subscribe();

        client.connect().await.unwrap();
        client.start_iq().await.unwrap();
        client.stop_iq().await.unwrap();
        client.disconnect().await.unwrap();

        assert!(matches!(recv_event(&mut events).await, SessionEvent::Connected));
        assert!(matches!(recv_event(&mut events).await, SessionEvent::IqStarted));
        assert!(matches!(recv_event(&mut events).await, SessionEvent::IqStopped));
        assert!(matches!(
            recv_event(&mut events).await,
            SessionEvent::Disconnected
        ));
    }

    #[tokio::test]
    async fn restart_streaming_after_stop() {
        let (client, control, data, mut samples) = test_client();
        control.set_auto_ack(true);
        client.connect().await.unwrap();

        client.start_iq().await.unwrap();
        client.stop_iq().await.unwrap();
        client.start_iq().await.unwrap();
        assert!(client.is_streaming());
        assert_eq!(data.start_count(), 2);

        let datagram = encode_data_item(MsgKind::DataItem1, &[0x01, 0x00, 0x10, 0x20]).unwrap();
        data.inject_datagram(&datagram).await;
        let batch = tokio::time::timeout(Duration::from_secs(2), samples.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(batch.sequence, 1);
        assert_eq!(batch.samples, vec![0x2010]);
    }
}
