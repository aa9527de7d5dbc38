//! Allocation-free API frame codec for DigiMesh/XBee radio links.
//!
//! digimesh turns the byte stream from a radio's serial port into
//! checksum-validated API frames, and builds the outbound AT command and
//! transmit request frames. The receive path runs one byte at a time with no
//! allocation, so it can sit directly in a UART interrupt handler.
//!
//! # Crate Structure
//!
//! - [`frame`] — Frame buffers, receiver, builders, checksum and stream adapters
//! - [`logging`] — `tracing` subscriber setup (behind `logging` feature)

/// Re-export frame types.
pub mod frame {
    pub use digimesh_frame::*;
}

#[cfg(feature = "logging")]
pub mod logging;

pub use digimesh_frame::{
    BuildError, Frame, FrameBuilder, FrameConfig, FrameHandle, FrameReader, FrameReceiver,
    FrameWriter, RxError,
};
