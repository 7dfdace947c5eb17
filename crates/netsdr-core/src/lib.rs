//! netsdr-core: Core traits, events, and error definitions for netsdr.
//!
//! This crate defines the transport-agnostic abstractions the rest of the
//! workspace builds on. Applications depend on these types without pulling
//! in any concrete socket implementation.
//!
//! # Key types
//!
//! - [`ControlLink`] / [`DataLink`] -- the two channel collaborators
//! - [`SessionEvent`] -- asynchronous session notifications
//! - [`Error`] / [`Result`] -- error handling

pub mod error;
pub mod events;
pub mod link;

// Re-export key types at crate root for ergonomic `use netsdr_core::*`.
pub use error::{Error, Result};
pub use events::SessionEvent;
pub use link::{ControlLink, DataLink};
