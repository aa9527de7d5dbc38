use crate::frame::{FRAME_CAPACITY, FRAME_OVERHEAD};

/// Default number of bytes `FrameReader` requests from its stream per read.
pub const DEFAULT_READ_CHUNK_SIZE: usize = 64;

/// Configuration for receivers, builders and the stream adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameConfig {
    /// Largest frame, in bytes, that is accepted or built. Clamped to
    /// `FRAME_OVERHEAD..=FRAME_CAPACITY`. Default: `FRAME_CAPACITY`.
    pub max_frame_len: usize,
    /// Bytes requested per `read` call by `FrameReader`. Default: 64.
    pub read_chunk_size: usize,
}

impl FrameConfig {
    /// `max_frame_len` limited to what a frame buffer can hold, and never
    /// below the size of an empty frame.
    pub fn effective_max_frame_len(&self) -> usize {
        self.max_frame_len.clamp(FRAME_OVERHEAD, FRAME_CAPACITY)
    }
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_frame_len: FRAME_CAPACITY,
            read_chunk_size: DEFAULT_READ_CHUNK_SIZE,
        }
    }
}
