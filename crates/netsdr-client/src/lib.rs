//! netsdr-client: Device session for NetSDR-style receivers.
//!
//! The centerpiece is [`NetSdrClient`], which owns a control link and a
//! data link (any implementations of the `netsdr-core` traits) and exposes
//! the device operations: connect/disconnect, frequency tuning, and I/Q
//! stream start/stop. Control requests are correlated positionally against
//! responses, since the wire protocol carries no transaction identifiers.
//!
//! # Example
//!
//! ```no_run
//! use netsdr_client::NetSdrClient;
//! use netsdr_transport::{TcpControlLink, UdpDataLink};
//! use tokio::sync::mpsc;
//!
//! # async fn example() -> netsdr_core::Result<()> {
//! let control = TcpControlLink::new("192.168.1.50:50000");
//! let data = UdpDataLink::with_port(60000);
//! let (sample_tx, mut sample_rx) = mpsc::channel(64);
//!
//! let client = NetSdrClient::new(control, data, sample_tx);
//! client.connect().await?;
//! client.change_frequency(145_500_000, 1).await?;
//! client.start_iq().await?;
//!
//! while let Some(batch) = sample_rx.recv().await {
//!     println!("seq {}: {} samples", batch.sequence, batch.samples.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;

pub use client::{ClientOptions, NetSdrClient, SampleBatch, IQ_SAMPLE_BITS};
