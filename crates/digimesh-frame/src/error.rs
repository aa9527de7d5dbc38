/// Conditions the receiver recovers from locally.
///
/// These never reach the caller of `add_byte` as failures. The receiver resets,
/// bumps its error counter and remembers the most recent one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RxError {
    /// A byte arrived while idle and it was not the start delimiter.
    #[error("out of sync: expected start delimiter 0x7E, got {byte:#04x}")]
    Desync { byte: u8 },

    /// The frame in progress filled the receive buffer before completing.
    #[error("frame overflowed receive buffer ({capacity} bytes)")]
    Overflow { capacity: usize },

    /// A structurally complete frame failed checksum verification.
    #[error("checksum mismatch (expected {expected:#04x}, got {actual:#04x})")]
    ChecksumMismatch { expected: u8, actual: u8 },
}

/// Errors returned by the frame builders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// The resulting frame would not fit in a frame buffer.
    #[error("frame too large ({len} bytes, max {max})")]
    CapacityExceeded { len: usize, max: usize },
}

/// Errors from the stream adapters (`FrameReader`, `FrameWriter`, `FrameCodec`).
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream ended before another complete frame was received.
    #[error("connection closed (incomplete frame)")]
    ConnectionClosed,

    /// An outbound frame could not be built.
    #[error(transparent)]
    Build(#[from] BuildError),
}

pub type Result<T> = std::result::Result<T, FrameError>;
