//! # touch-core
//!
//! Shared library for Touch-Relay containing the touch frame decoder, the
//! decoded device state, the coordinate mapper, and the actuation rate gate.
//!
//! It has zero dependencies on OS APIs, UI frameworks, or network sockets.
//!
//! # Architecture overview
//!
//! Touch-Relay turns a touch-capable device (a tablet streaming raw Linux
//! input records) into a pointer on the host.  Bytes flow one way:
//!
//! ```text
//! raw bytes ─► FrameReader ─► RawFrame ─► FrameDecoder ─► DeviceState
//!                                                            │
//!                                        RateGate admits? ◄──┘
//!                                                            │
//!                              map_point(src ─► dst) ◄───────┘
//! ```
//!
//! - **`protocol`** – How bytes become state.  Each record is a fixed 16-byte
//!   frame; only absolute-axis updates (X, Y, pressure) change the state.
//!
//! - **`domain`** – Pure geometry and timing.  `Rectangle` + `map_point`
//!   project device coordinates onto a destination region (optionally rotated
//!   by 90°), and `RateGate` bounds how often the pointer is actuated.

pub mod domain;
pub mod protocol;

pub use domain::gate::{millis_to_duration, RateGate, DEFAULT_INTERVAL};
pub use domain::region::{map_point, Axis, MappedPoint, Rectangle, RegionError, DEVICE_SOURCE_RECT};
pub use protocol::frame::{ByteOrder, FrameDecoder, FrameFields, RawFrame, FRAME_SIZE};
pub use protocol::reader::FrameReader;
pub use protocol::state::DeviceState;
