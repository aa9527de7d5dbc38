use crate::checksum;
use crate::config::FrameConfig;
use crate::error::BuildError;
use crate::frame::{Frame, FRAME_CAPACITY, FRAME_OVERHEAD, START_DELIMITER};
use crate::frame_type::{AT_COMMAND, TRANSMIT_REQUEST};
use crate::sequence::FrameIdSequencer;

/// 64-bit address that reaches every node in the network.
pub const BROADCAST_ADDRESS: u64 = 0x0000_0000_0000_FFFF;

/// Reserved 16-bit network address field of a transmit request.
pub const RESERVED_NETWORK_ADDRESS: [u8; 2] = [0xFF, 0xFE];

/// Hop limit 0 lets the radio use its configured maximum.
pub const DEFAULT_HOP_LIMIT: u8 = 0x00;

/// Transmit options 0 uses the radio's configured defaults.
pub const DEFAULT_TX_OPTIONS: u8 = 0x00;

/// AT command frame size excluding payload: overhead + type + ID.
pub const COMMAND_FRAME_OVERHEAD: usize = FRAME_OVERHEAD + 2;

/// Transmit request size excluding payload: overhead + type + ID +
/// address (8) + reserved (2) + hop limit + options.
pub const DATA_FRAME_OVERHEAD: usize = FRAME_OVERHEAD + 14;

const BODY_OFFSET: usize = 5;

/// Builds outbound API frames.
///
/// Every successful build draws one ID from the builder's [`FrameIdSequencer`].
/// Failed builds draw nothing and leave the target frame untouched. Methods take
/// `&self`, so one builder (or a `static` one) can serve several contexts.
#[derive(Debug)]
pub struct FrameBuilder {
    ids: FrameIdSequencer,
    max_frame_len: usize,
}

impl FrameBuilder {
    /// A builder with a fresh sequencer and the full buffer capacity.
    pub const fn new() -> Self {
        Self::with_sequencer(FrameIdSequencer::new())
    }

    /// A builder drawing IDs from `ids`.
    pub const fn with_sequencer(ids: FrameIdSequencer) -> Self {
        Self {
            ids,
            max_frame_len: FRAME_CAPACITY,
        }
    }

    /// A builder limited to `config.max_frame_len`.
    pub fn with_config(config: &FrameConfig) -> Self {
        Self {
            ids: FrameIdSequencer::new(),
            max_frame_len: config.effective_max_frame_len(),
        }
    }

    /// The sequencer outbound IDs come from.
    pub fn sequencer(&self) -> &FrameIdSequencer {
        &self.ids
    }

    /// Build a local AT command frame.
    ///
    /// `payload` is the two-character command name followed by any parameter
    /// bytes, e.g. `b"NITEST"` sets NI to "TEST".
    pub fn build_command_frame(&self, payload: &[u8]) -> Result<Frame, BuildError> {
        let mut frame = Frame::new();
        self.build_command_into(&mut frame, payload)?;
        Ok(frame)
    }

    /// Build an AT command frame into `frame`, returning the frame ID used.
    pub fn build_command_into(&self, frame: &mut Frame, payload: &[u8]) -> Result<u8, BuildError> {
        let len = self.check_len(payload.len() + COMMAND_FRAME_OVERHEAD)?;
        let frame_id = self.ids.next();

        let bytes = frame.fill(len);
        write_header(bytes, AT_COMMAND, frame_id);
        bytes[BODY_OFFSET..BODY_OFFSET + payload.len()].copy_from_slice(payload);
        checksum::seal(bytes);

        tracing::trace!(frame_id, len, "built AT command frame");
        Ok(frame_id)
    }

    /// Build a transmit request carrying `payload` to `address`.
    ///
    /// Address 0 is sent as [`BROADCAST_ADDRESS`].
    pub fn build_data_frame(&self, address: u64, payload: &[u8]) -> Result<Frame, BuildError> {
        let mut frame = Frame::new();
        self.build_data_into(&mut frame, address, payload)?;
        Ok(frame)
    }

    /// Build a transmit request into `frame`, returning the frame ID used.
    pub fn build_data_into(
        &self,
        frame: &mut Frame,
        address: u64,
        payload: &[u8],
    ) -> Result<u8, BuildError> {
        let len = self.check_len(payload.len() + DATA_FRAME_OVERHEAD)?;
        let address = if address == 0 {
            BROADCAST_ADDRESS
        } else {
            address
        };
        let frame_id = self.ids.next();

        let bytes = frame.fill(len);
        write_header(bytes, TRANSMIT_REQUEST, frame_id);
        bytes[5..13].copy_from_slice(&address.to_be_bytes());
        bytes[13..15].copy_from_slice(&RESERVED_NETWORK_ADDRESS);
        bytes[15] = DEFAULT_HOP_LIMIT;
        bytes[16] = DEFAULT_TX_OPTIONS;
        bytes[17..17 + payload.len()].copy_from_slice(payload);
        checksum::seal(bytes);

        tracing::trace!(frame_id, len, address, "built transmit request frame");
        Ok(frame_id)
    }

    fn check_len(&self, len: usize) -> Result<usize, BuildError> {
        if len > self.max_frame_len {
            return Err(BuildError::CapacityExceeded {
                len,
                max: self.max_frame_len,
            });
        }
        Ok(len)
    }
}

impl Default for FrameBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Delimiter, length, type and ID. `bytes` spans the whole frame.
fn write_header(bytes: &mut [u8], frame_type: u8, frame_id: u8) {
    let data_len = (bytes.len() - FRAME_OVERHEAD) as u16;
    bytes[0] = START_DELIMITER;
    bytes[1..3].copy_from_slice(&data_len.to_be_bytes());
    bytes[3] = frame_type;
    bytes[4] = frame_id;
}
