use std::io::{ErrorKind, Read};

use bytes::{Buf, BytesMut};

use crate::config::FrameConfig;
use crate::error::{FrameError, Result};
use crate::frame::Frame;
use crate::receiver::FrameReceiver;

/// Reads complete frames from any `Read` stream, such as an open serial port.
///
/// Bytes are pushed through a [`FrameReceiver`] one at a time, so noise and
/// corrupted frames are skipped exactly as on a device; check
/// [`receiver().error_count()`](FrameReceiver::error_count) to see how many.
pub struct FrameReader<T> {
    inner: T,
    receiver: FrameReceiver,
    pending: BytesMut,
    config: FrameConfig,
}

impl<T: Read> FrameReader<T> {
    /// Create a new frame reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame reader with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner,
            receiver: FrameReceiver::with_config(&config),
            pending: BytesMut::with_capacity(config.read_chunk_size),
            config,
        }
    }

    /// Read the next valid frame (blocking).
    ///
    /// The returned frame borrows the reader and stays valid until the next
    /// call. Returns `Err(FrameError::ConnectionClosed)` at EOF. A frame cut off
    /// by EOF is discarded without counting an error, as `FrameCodec` does.
    pub fn read_frame(&mut self) -> Result<&Frame> {
        loop {
            while self.pending.has_remaining() {
                let byte = self.pending.get_u8();
                if let Some(handle) = self.receiver.add_byte(byte) {
                    return Ok(self.receiver.completed(handle));
                }
            }

            self.fill_pending()?;
        }
    }

    fn fill_pending(&mut self) -> Result<()> {
        let chunk_size = self.config.read_chunk_size.max(1);
        self.pending.clear();
        self.pending.resize(chunk_size, 0);

        let read = loop {
            match self.inner.read(&mut self.pending) {
                Ok(n) => break n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => {
                    self.pending.clear();
                    return Err(FrameError::Io(err));
                }
            }
        };

        self.pending.truncate(read);
        if read == 0 {
            if self.receiver.buffered() > 0 {
                tracing::debug!(
                    buffered = self.receiver.buffered(),
                    "stream ended mid-frame"
                );
                self.receiver.reset();
            }
            return Err(FrameError::ConnectionClosed);
        }
        Ok(())
    }

    /// The receiver doing the framing, for error counters and state.
    pub fn receiver(&self) -> &FrameReceiver {
        &self.receiver
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current frame reader configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}
