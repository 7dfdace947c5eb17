//! NetSDR binary message codec.
//!
//! Every message on the control and data channels is framed the same way:
//! a 16-bit little-endian header word whose top 3 bits select the message
//! kind and whose low 13 bits carry the total frame length in bytes. This
//! module provides pure encode/decode functions with no I/O dependencies;
//! all functions operate on raw byte slices and return parsed structures
//! or errors.
//!
//! Control-item frames carry a 2-byte little-endian item code after the
//! header; data-item frames carry a 2-byte sequence number instead. The
//! length field has one quirk: a data-item frame may legally exceed the
//! 13-bit ceiling by up to 3 bytes (8192..=8194 total), in which case the
//! length field is written as 0 and the true length is implicit from the
//! transport read.

use netsdr_core::{Error, Result};

/// Frame header size in bytes.
pub const HEADER_LEN: usize = 2;

/// Largest total length a control-item frame may have. This is the largest
/// value the 13-bit length field can hold -- a hard protocol ceiling.
pub const MAX_CONTROL_LEN: usize = 8191;

/// Largest total length a data-item frame may have. The 3 bytes past the
/// 13-bit ceiling are reachable only through the zero-length sentinel.
pub const MAX_DATA_LEN: usize = 8194;

/// Message kind from the top 3 bits of the header word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MsgKind {
    /// Host sets a control item, or the receiver reports one it set.
    SetControlItem,
    /// Host requests the current value of a control item.
    CurrentControlItem,
    /// Host requests the valid range of a control item.
    ControlItemRange,
    /// Acknowledgment for a data-item block.
    DataAck,
    /// I/Q data stream 0.
    DataItem0,
    /// I/Q data stream 1.
    DataItem1,
    /// I/Q data stream 2.
    DataItem2,
    /// I/Q data stream 3.
    DataItem3,
}

impl MsgKind {
    /// Derive the kind from the top 3 bits of a header word.
    pub fn from_bits(bits: u8) -> MsgKind {
        match bits & 0x07 {
            0 => MsgKind::SetControlItem,
            1 => MsgKind::CurrentControlItem,
            2 => MsgKind::ControlItemRange,
            3 => MsgKind::DataAck,
            4 => MsgKind::DataItem0,
            5 => MsgKind::DataItem1,
            6 => MsgKind::DataItem2,
            _ => MsgKind::DataItem3,
        }
    }

    /// The 3-bit wire encoding of this kind.
    pub fn bits(self) -> u8 {
        match self {
            MsgKind::SetControlItem => 0,
            MsgKind::CurrentControlItem => 1,
            MsgKind::ControlItemRange => 2,
            MsgKind::DataAck => 3,
            MsgKind::DataItem0 => 4,
            MsgKind::DataItem1 => 5,
            MsgKind::DataItem2 => 6,
            MsgKind::DataItem3 => 7,
        }
    }

    /// Whether this kind carries a sequence number rather than an item code.
    pub fn is_data_item(self) -> bool {
        matches!(
            self,
            MsgKind::DataItem0 | MsgKind::DataItem1 | MsgKind::DataItem2 | MsgKind::DataItem3
        )
    }
}

/// Control-item identifier naming a device parameter.
///
/// The discriminants are the NetSDR wire codes. Codes outside this set
/// decode as unrecognized (see [`DecodedMessage::recognized`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ControlItem {
    /// Receiver run/idle state and capture mode.
    ReceiverState = 0x0018,
    /// NCO center frequency of a receiver channel.
    ReceiverFrequency = 0x0020,
    /// RF front-end filter selection.
    RfFilter = 0x0044,
    /// A/D converter mode (dither, gain).
    AdModes = 0x008A,
    /// I/Q output data sample rate.
    IqOutputSampleRate = 0x00B8,
}

impl ControlItem {
    /// Look up a control item by its 16-bit wire code.
    pub fn from_code(code: u16) -> Option<ControlItem> {
        match code {
            0x0018 => Some(ControlItem::ReceiverState),
            0x0020 => Some(ControlItem::ReceiverFrequency),
            0x0044 => Some(ControlItem::RfFilter),
            0x008A => Some(ControlItem::AdModes),
            0x00B8 => Some(ControlItem::IqOutputSampleRate),
            _ => None,
        }
    }

    /// The 16-bit wire code of this item.
    pub fn code(self) -> u16 {
        self as u16
    }
}

/// A decoded message: kind, optional item code, sequence number, and body.
///
/// The body borrows from the input buffer, so no copying occurs. For
/// control-item frames the sequence number is 0; for data-item frames the
/// item is `None`. Callers must check [`recognized`](Self::recognized)
/// rather than merely the presence of a body: an unknown item code still
/// yields a body (starting at the unrecognized code bytes) so the caller
/// can log-and-continue instead of stalling the channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedMessage<'a> {
    /// The 3-bit message kind.
    pub kind: MsgKind,
    /// The raw 13-bit length field from the header. 0 is the sentinel for
    /// a maximum-size data-item frame; the actual body length is always
    /// taken from the buffer, never from this field.
    pub declared_len: u16,
    /// The control item, if the kind carries one and the code was known.
    pub item: Option<ControlItem>,
    /// The sequence number for data-item kinds, 0 otherwise.
    pub sequence: u16,
    /// Payload bytes. For an unrecognized control item this starts at the
    /// 2 bytes of the bad code.
    pub body: &'a [u8],
    /// `false` when a control-item-bearing frame carried an unknown code.
    pub recognized: bool,
}

/// Split a raw header word into its kind and total frame length in bytes,
/// resolving the zero-length sentinel to [`MAX_DATA_LEN`].
///
/// This is what a stream transport needs to reassemble whole frames from
/// a byte stream: read 2 bytes, call this, then read `len - 2` more.
pub fn split_header(word: u16) -> (MsgKind, usize) {
    let kind = MsgKind::from_bits((word >> 13) as u8);
    let len = (word & 0x1FFF) as usize;
    if len == 0 && kind.is_data_item() {
        (kind, MAX_DATA_LEN)
    } else {
        (kind, len)
    }
}

/// Build the 2-byte little-endian header for a frame.
fn encode_header(kind: MsgKind, length_field: u16) -> [u8; 2] {
    let word = ((kind.bits() as u16) << 13) | (length_field & 0x1FFF);
    word.to_le_bytes()
}

/// Encode a control-item frame: header, 2-byte item code, parameters.
///
/// # Errors
///
/// Returns [`Error::Protocol`] if the total encoded length would exceed
/// [`MAX_CONTROL_LEN`]. No partial output is produced.
pub fn encode_control_item(kind: MsgKind, item: ControlItem, params: &[u8]) -> Result<Vec<u8>> {
    let total = HEADER_LEN + 2 + params.len();
    if total > MAX_CONTROL_LEN {
        return Err(Error::Protocol(format!(
            "control-item frame length {} exceeds maximum {}",
            total, MAX_CONTROL_LEN
        )));
    }

    let mut msg = Vec::with_capacity(total);
    msg.extend_from_slice(&encode_header(kind, total as u16));
    msg.extend_from_slice(&item.code().to_le_bytes());
    msg.extend_from_slice(params);
    Ok(msg)
}

/// Encode a data-item frame: header followed directly by the parameters
/// (the first two parameter bytes are conventionally the sequence number).
///
/// Totals in `(MAX_CONTROL_LEN, MAX_DATA_LEN]` write the length field as 0,
/// the maximum-size sentinel.
///
/// # Errors
///
/// Returns [`Error::Protocol`] if the total encoded length would exceed
/// [`MAX_DATA_LEN`].
pub fn encode_data_item(kind: MsgKind, params: &[u8]) -> Result<Vec<u8>> {
    let total = HEADER_LEN + params.len();
    if total > MAX_DATA_LEN {
        return Err(Error::Protocol(format!(
            "data-item frame length {} exceeds maximum {}",
            total, MAX_DATA_LEN
        )));
    }

    let length_field = if total > MAX_CONTROL_LEN { 0 } else { total as u16 };

    let mut msg = Vec::with_capacity(total);
    msg.extend_from_slice(&encode_header(kind, length_field));
    msg.extend_from_slice(params);
    Ok(msg)
}

/// Decode a complete frame received from either channel.
///
/// Control-item-bearing kinds (the first four) read a 2-byte item code
/// after the header; data-item kinds read a 2-byte sequence number. The
/// body is whatever follows in the actual buffer -- the declared length
/// field is reported but not enforced, since the transport boundary
/// delivers whole frames.
///
/// # Errors
///
/// Returns [`Error::Protocol`] only on truncation: a buffer too short to
/// hold the header plus the code or sequence field. An unknown control
/// item code is not an error; it is reported through
/// [`DecodedMessage::recognized`].
pub fn decode_message(raw: &[u8]) -> Result<DecodedMessage<'_>> {
    if raw.len() < HEADER_LEN {
        return Err(Error::Protocol(format!(
            "frame too short: {} bytes, minimum is {}",
            raw.len(),
            HEADER_LEN
        )));
    }

    let word = u16::from_le_bytes([raw[0], raw[1]]);
    let kind = MsgKind::from_bits((word >> 13) as u8);
    let declared_len = word & 0x1FFF;

    if raw.len() < HEADER_LEN + 2 {
        return Err(Error::Protocol(format!(
            "frame truncated: {} bytes, need {} for the {} field",
            raw.len(),
            HEADER_LEN + 2,
            if kind.is_data_item() { "sequence" } else { "item code" }
        )));
    }

    if kind.is_data_item() {
        let sequence = u16::from_le_bytes([raw[2], raw[3]]);
        return Ok(DecodedMessage {
            kind,
            declared_len,
            item: None,
            sequence,
            body: &raw[4..],
            recognized: true,
        });
    }

    let code = u16::from_le_bytes([raw[2], raw[3]]);
    match ControlItem::from_code(code) {
        Some(item) => Ok(DecodedMessage {
            kind,
            declared_len,
            item: Some(item),
            sequence: 0,
            body: &raw[4..],
            recognized: true,
        }),
        None => {
            tracing::trace!(code = format!("0x{:04X}", code), "Unknown control item code");
            Ok(DecodedMessage {
                kind,
                declared_len,
                item: None,
                sequence: 0,
                // Body starts at the unrecognized code so the caller can
                // inspect or log the offending bytes.
                body: &raw[2..],
                recognized: false,
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
