//! Fixed-size touch frame and its decoder.
//!
//! Wire format (one Linux `input_event` record as emitted by a 32-bit device):
//! ```text
//! [timestamp/padding:8][event_type:2][event_code:2][value:4]
//! ```
//! Total frame size: 16 bytes.  The first 8 bytes are never interpreted.
//!
//! # Byte order
//!
//! The stream is not self-describing: nothing in a frame says which byte order
//! its integers use.  The decoder defaults to the host's native order
//! ([`ByteOrder::Native`]), which is correct when host and device agree (both
//! little-endian in the common ARM tablet → x86 desktop setup).  Hosts whose
//! byte order differs from the device must select [`ByteOrder::Little`] or
//! [`ByteOrder::Big`] explicitly.
//!
//! # Unknown channels
//!
//! Only absolute-axis events (`EV_ABS`) on the X, Y, and pressure channels
//! change state.  Every other event type or code is ignored without error so
//! that devices emitting extra channels (multi-touch slots, tilt, distance)
//! keep working.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::protocol::state::DeviceState;

/// Size of one frame on the wire, in bytes.
pub const FRAME_SIZE: usize = 16;

/// Offset of the first interpreted byte (`event_type`).
const FIELDS_OFFSET: usize = 8;

/// Absolute-axis event type.
pub const EV_ABS: u16 = 0x03;
/// Absolute X position channel.
pub const ABS_X: u16 = 0x00;
/// Absolute Y position channel.
pub const ABS_Y: u16 = 0x01;
/// Pressure channel.
pub const ABS_PRESSURE: u16 = 0x18;

/// Byte order used to read the multi-byte fields of a frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ByteOrder {
    /// Whatever order the host CPU uses.
    #[default]
    Native,
    Little,
    Big,
}

impl ByteOrder {
    fn read_u16(self, bytes: [u8; 2]) -> u16 {
        match self {
            ByteOrder::Native => u16::from_ne_bytes(bytes),
            ByteOrder::Little => u16::from_le_bytes(bytes),
            ByteOrder::Big => u16::from_be_bytes(bytes),
        }
    }

    fn read_u32(self, bytes: [u8; 4]) -> u32 {
        match self {
            ByteOrder::Native => u32::from_ne_bytes(bytes),
            ByteOrder::Little => u32::from_le_bytes(bytes),
            ByteOrder::Big => u32::from_be_bytes(bytes),
        }
    }
}

impl std::str::FromStr for ByteOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "native" => Ok(ByteOrder::Native),
            "little" | "le" => Ok(ByteOrder::Little),
            "big" | "be" => Ok(ByteOrder::Big),
            other => Err(format!("unknown byte order: {other}")),
        }
    }
}

/// One immutable 16-byte record read from the device stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawFrame([u8; FRAME_SIZE]);

impl RawFrame {
    /// Wraps an exact 16-byte record.
    pub const fn new(bytes: [u8; FRAME_SIZE]) -> Self {
        Self(bytes)
    }

    /// Copies a frame out of `bytes`.
    ///
    /// Returns `None` when `bytes` is not exactly [`FRAME_SIZE`] long; callers
    /// treat a short record as end-of-stream, never as a decode error.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        <[u8; FRAME_SIZE]>::try_from(bytes).ok().map(Self)
    }

    /// Builds a frame from its three semantic fields, zeroing the timestamp
    /// region.  Useful for tests, replay fixtures, and benchmarks.
    pub fn from_fields(fields: FrameFields, order: ByteOrder) -> Self {
        let (ty, code, value) = match order {
            ByteOrder::Native => (
                fields.event_type.to_ne_bytes(),
                fields.event_code.to_ne_bytes(),
                fields.value.to_ne_bytes(),
            ),
            ByteOrder::Little => (
                fields.event_type.to_le_bytes(),
                fields.event_code.to_le_bytes(),
                fields.value.to_le_bytes(),
            ),
            ByteOrder::Big => (
                fields.event_type.to_be_bytes(),
                fields.event_code.to_be_bytes(),
                fields.value.to_be_bytes(),
            ),
        };

        let mut bytes = [0u8; FRAME_SIZE];
        bytes[8..10].copy_from_slice(&ty);
        bytes[10..12].copy_from_slice(&code);
        bytes[12..16].copy_from_slice(&value);
        Self(bytes)
    }

    /// The raw 16 bytes.
    pub fn as_bytes(&self) -> &[u8; FRAME_SIZE] {
        &self.0
    }

    /// Reads the semantic window `[8, 16)` with the given byte order.
    pub fn fields(&self, order: ByteOrder) -> FrameFields {
        let b = &self.0;
        let f = FIELDS_OFFSET;
        FrameFields {
            event_type: order.read_u16([b[f], b[f + 1]]),
            event_code: order.read_u16([b[f + 2], b[f + 3]]),
            value: order.read_u32([b[f + 4], b[f + 5], b[f + 6], b[f + 7]]),
        }
    }
}

/// The three interpreted fields of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameFields {
    pub event_type: u16,
    pub event_code: u16,
    pub value: u32,
}

impl FrameFields {
    /// Shorthand for an absolute-axis update on `code`.
    pub const fn abs(event_code: u16, value: u32) -> Self {
        Self {
            event_type: EV_ABS,
            event_code,
            value,
        }
    }
}

/// Applies decoded frames to a [`DeviceState`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameDecoder {
    byte_order: ByteOrder,
}

impl FrameDecoder {
    /// Creates a decoder reading fields in `byte_order`.
    pub const fn new(byte_order: ByteOrder) -> Self {
        Self { byte_order }
    }

    /// The byte order this decoder reads with.
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Decodes `frame` and folds it into `state`.
    ///
    /// Never fails.  Non-`EV_ABS` types and unknown codes leave `state`
    /// untouched.
    pub fn decode(&self, frame: &RawFrame, state: &mut DeviceState) {
        let fields = frame.fields(self.byte_order);
        trace!(
            "frame type={} code={} value={}",
            fields.event_type,
            fields.event_code,
            fields.value
        );
        apply_fields(fields, state);
    }
}

/// Decodes `frame` in native byte order and folds it into `state`.
pub fn decode_frame(frame: &RawFrame, state: &mut DeviceState) {
    FrameDecoder::default().decode(frame, state);
}

fn apply_fields(fields: FrameFields, state: &mut DeviceState) {
    if fields.event_type != EV_ABS {
        return;
    }
    match fields.event_code {
        ABS_X => state.x_raw = fields.value,
        ABS_Y => state.y_raw = fields.value,
        ABS_PRESSURE => state.apply_pressure(fields.value),
        _ => {}
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
