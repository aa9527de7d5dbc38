//! API frame codec for DigiMesh/XBee radios in API mode (unescaped).
//!
//! Every frame on the serial link is laid out as:
//! - A start delimiter (0x7E)
//! - A 2-byte big-endian length of the frame data
//! - Frame data: type, frame ID, type-specific fields and payload
//! - A 1-byte checksum over the frame data
//!
//! The receiving side ([`FrameReceiver`]) and the builders ([`FrameBuilder`])
//! work on fixed-size buffers and never allocate, so they can run on the
//! receive path of a serial driver. [`FrameReader`], [`FrameWriter`] and, with
//! the `async` feature, `FrameCodec` adapt them to byte streams.

pub mod builder;
pub mod checksum;
#[cfg(feature = "async")]
pub mod codec;
pub mod config;
pub mod error;
pub mod frame;
pub mod frame_type;
pub mod reader;
pub mod receiver;
pub mod sequence;
pub mod writer;

pub use builder::{FrameBuilder, BROADCAST_ADDRESS, COMMAND_FRAME_OVERHEAD, DATA_FRAME_OVERHEAD};
#[cfg(feature = "async")]
pub use codec::FrameCodec;
pub use config::FrameConfig;
pub use error::{BuildError, FrameError, Result, RxError};
pub use frame::{Frame, FRAME_CAPACITY, FRAME_OVERHEAD, HEADER_SIZE, START_DELIMITER};
pub use frame_type::{
    frame_type_name, FrameType, AT_COMMAND, AT_RESPONSE, MODEM_STATUS, RECEIVE_PACKET,
    TRANSMIT_REQUEST, TRANSMIT_STATUS,
};
pub use reader::FrameReader;
pub use receiver::{BufferSlot, FrameHandle, FrameReceiver, RxState};
pub use sequence::{FrameIdSequencer, NO_ACK_FRAME_ID};
pub use writer::FrameWriter;
