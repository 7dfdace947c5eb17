//! Transport implementations for netsdr.
//!
//! This crate provides the concrete network collaborators behind the
//! [`ControlLink`](netsdr_core::ControlLink) and
//! [`DataLink`](netsdr_core::DataLink) traits from `netsdr-core`:
//!
//! - [`TcpControlLink`]: the reliable control channel (NetSDR port 50000),
//!   with whole-frame reassembly from the TCP byte stream
//! - [`UdpDataLink`]: the best-effort I/Q data channel (NetSDR port 60000)
//!
//! # Example
//!
//! ```no_run
//! use netsdr_transport::{TcpControlLink, UdpDataLink};
//! use netsdr_core::{ControlLink, DataLink};
//!
//! # async fn example() -> netsdr_core::Result<()> {
//! let mut control = TcpControlLink::new("192.168.1.50:50000");
//! control.connect().await?;
//!
//! let mut data = UdpDataLink::with_port(60000);
//! data.start().await?;
//! # Ok(())
//! # }
//! ```

pub mod tcp;
pub mod udp;

pub use tcp::TcpControlLink;
pub use udp::UdpDataLink;
