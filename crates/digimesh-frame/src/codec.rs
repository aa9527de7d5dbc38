use bytes::{Buf, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::config::FrameConfig;
use crate::error::{FrameError, Result};
use crate::frame::Frame;
use crate::receiver::FrameReceiver;

/// `tokio_util` codec for async serial streams.
///
/// Decoding runs every byte through a [`FrameReceiver`]; decoded frames are
/// copied out of the receive buffer since a `Stream` item must be owned.
#[derive(Debug, Default)]
pub struct FrameCodec {
    receiver: FrameReceiver,
}

impl FrameCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &FrameConfig) -> Self {
        Self {
            receiver: FrameReceiver::with_config(config),
        }
    }

    /// The receiver doing the framing, for error counters and state.
    pub fn receiver(&self) -> &FrameReceiver {
        &self.receiver
    }
}

impl Decoder for FrameCodec {
    type Item = Frame;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Frame>> {
        let mut consumed = 0usize;
        let mut decoded = None;

        for byte in src.iter() {
            consumed += 1;
            if let Some(handle) = self.receiver.add_byte(*byte) {
                decoded = Some(self.receiver.completed(handle).clone());
                break;
            }
        }

        src.advance(consumed);
        Ok(decoded)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Frame>> {
        match self.decode(src)? {
            Some(frame) => Ok(Some(frame)),
            None if self.receiver.buffered() > 0 => {
                tracing::debug!(
                    buffered = self.receiver.buffered(),
                    "stream ended mid-frame"
                );
                self.receiver.reset();
                Err(FrameError::ConnectionClosed)
            }
            None => Ok(None),
        }
    }
}

impl Encoder<Frame> for FrameCodec {
    type Error = FrameError;

    fn encode(&mut self, item: Frame, dst: &mut BytesMut) -> Result<()> {
        <Self as Encoder<&Frame>>::encode(self, &item, dst)
    }
}

impl Encoder<&Frame> for FrameCodec {
    type Error = FrameError;

    fn encode(&mut self, item: &Frame, dst: &mut BytesMut) -> Result<()> {
        dst.extend_from_slice(item.as_bytes());
        Ok(())
    }
}
