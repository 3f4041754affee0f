//! Protocol module containing the frame layout, the decoder, and the reader.

pub mod frame;
pub mod reader;
pub mod state;

pub use frame::{decode_frame, ByteOrder, FrameDecoder, FrameFields, RawFrame, FRAME_SIZE};
pub use reader::FrameReader;
pub use state::DeviceState;
