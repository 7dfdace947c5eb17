//! netsdr: Async client for NetSDR-protocol software-defined radios.
//!
//! A control-and-telemetry client for networked SDR receivers speaking the
//! NetSDR-style compact binary protocol: a reliable TCP control channel
//! for configuration and commands, and a connectionless UDP data channel
//! carrying digitized I/Q sample streams.
//!
//! This facade crate re-exports the public API of the workspace:
//!
//! | Crate                 | Contents                                       |
//! |-----------------------|------------------------------------------------|
//! | `netsdr-core`         | [`Error`]/[`Result`], [`SessionEvent`], traits |
//! | `netsdr-proto`        | Wire codec and sample decoder                  |
//! | `netsdr-transport`    | [`TcpControlLink`], [`UdpDataLink`]            |
//! | `netsdr-client`       | [`NetSdrClient`] device session                |
//!
//! # Quick start
//!
//! ```no_run
//! use netsdr::{NetSdrClient, TcpControlLink, UdpDataLink};
//! use tokio::sync::mpsc;
//!
//! #[tokio::main]
//! async fn main() -> netsdr::Result<()> {
//!     let control = TcpControlLink::new("192.168.1.50:50000");
//!     let data = UdpDataLink::with_port(60000);
//!     let (sample_tx, mut sample_rx) = mpsc::channel(64);
//!
//!     let client = NetSdrClient::new(control, data, sample_tx);
//!     client.connect().await?;
//!     client.change_frequency(145_500_000, 1).await?;
//!     client.start_iq().await?;
//!
//!     while let Some(batch) = sample_rx.recv().await {
//!         println!("seq {}: {} samples", batch.sequence, batch.samples.len());
//!     }
//!     Ok(())
//! }
//! ```

pub use netsdr_client::{ClientOptions, NetSdrClient, SampleBatch, IQ_SAMPLE_BITS};
pub use netsdr_core::{ControlLink, DataLink, Error, Result, SessionEvent};
pub use netsdr_proto::{
    decode_message, decode_samples, encode_control_item, encode_data_item, ControlItem,
    DecodedMessage, MsgKind, Samples, HEADER_LEN, MAX_CONTROL_LEN, MAX_DATA_LEN,
};
pub use netsdr_transport::{TcpControlLink, UdpDataLink};

/// Direct access to the member crates for callers that want the full
/// module paths.
pub use netsdr_client as client;
pub use netsdr_proto as proto;
pub use netsdr_transport as transport;
