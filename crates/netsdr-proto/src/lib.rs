//! netsdr-proto: Pure NetSDR wire-format codec and sample decoder.
//!
//! This crate implements the binary message protocol spoken on both the
//! TCP control channel and the UDP data channel of NetSDR-style receivers:
//!
//! - **Message codec** ([`message`]) -- frame, length-encode, and type-tag
//!   every message: 16-bit header (3-bit kind, 13-bit length), control-item
//!   codes, data-item sequence numbers, and the zero-length sentinel used
//!   by maximum-size data frames.
//! - **Sample decoder** ([`samples`]) -- unpack a data frame body into
//!   zero-extended 32-bit samples at a configurable bit width.
//!
//! Everything here is pure computation: no I/O, no state, no allocation on
//! the decode path beyond the caller's buffers.

pub mod message;
pub mod samples;

pub use message::{
    ControlItem, DecodedMessage, MsgKind, decode_message, encode_control_item, encode_data_item,
    split_header, HEADER_LEN, MAX_CONTROL_LEN, MAX_DATA_LEN,
};
pub use samples::{Samples, decode_samples};
