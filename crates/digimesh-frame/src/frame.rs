use std::fmt;

use crate::error::BuildError;
use crate::frame_type::FrameType;

/// Start delimiter that opens every API frame.
pub const START_DELIMITER: u8 = 0x7E;

/// Size of every frame buffer, receive and transmit.
pub const FRAME_CAPACITY: usize = 100;

/// Frame header: delimiter (1) + length (2) = 3 bytes.
pub const HEADER_SIZE: usize = 3;

/// Bytes a frame carries besides its length-counted data: header + checksum.
pub const FRAME_OVERHEAD: usize = HEADER_SIZE + 1;

/// A single API frame stored in a fixed-capacity buffer.
///
/// Wire format:
/// ```text
/// ┌──────┬─────────────┬────────────┬──────────┬──────────────────┬──────────┐
/// │ 0x7E │ Length (2B) │ Type (1B)  │ ID (1B)  │ Fields + payload │ Checksum │
/// │      │ big-endian  │            │          │                  │ (1B)     │
/// └──────┴─────────────┴────────────┴──────────┴──────────────────┴──────────┘
///          counts everything between the length field and the checksum
/// ```
///
/// The buffer never grows; `len()` is always at most [`FRAME_CAPACITY`].
#[derive(Clone)]
pub struct Frame {
    buf: [u8; FRAME_CAPACITY],
    len: usize,
}

impl Frame {
    /// An empty frame buffer.
    pub const fn new() -> Self {
        Self {
            buf: [0; FRAME_CAPACITY],
            len: 0,
        }
    }

    /// Copy raw frame bytes (delimiter through checksum) into a frame buffer.
    ///
    /// No validation beyond the capacity check is done; use
    /// [`checksum::verify`](crate::checksum::verify) for that.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, BuildError> {
        if bytes.len() > FRAME_CAPACITY {
            return Err(BuildError::CapacityExceeded {
                len: bytes.len(),
                max: FRAME_CAPACITY,
            });
        }
        let mut frame = Self::new();
        frame.buf[..bytes.len()].copy_from_slice(bytes);
        frame.len = bytes.len();
        Ok(frame)
    }

    /// The frame bytes, delimiter through checksum.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Total number of bytes in the frame.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        FRAME_CAPACITY
    }

    /// The length field (bytes 1-2), once the header is present.
    pub fn payload_len(&self) -> Option<u16> {
        (self.len >= HEADER_SIZE).then(|| u16::from_be_bytes([self.buf[1], self.buf[2]]))
    }

    /// The frame type (byte 3). `None` when the frame carries no data.
    pub fn frame_type(&self) -> Option<FrameType> {
        (self.len > FRAME_OVERHEAD).then(|| FrameType::from(self.buf[3]))
    }

    /// Byte 4: the frame ID on request and status frame types.
    pub fn frame_id(&self) -> Option<u8> {
        (self.len > FRAME_OVERHEAD + 1).then(|| self.buf[4])
    }

    /// The checksummed region: frame type through the byte before the checksum.
    pub fn frame_data(&self) -> &[u8] {
        if self.len < FRAME_OVERHEAD {
            return &[];
        }
        &self.buf[HEADER_SIZE..self.len - 1]
    }

    /// The trailing checksum byte.
    pub fn checksum(&self) -> Option<u8> {
        (self.len >= FRAME_OVERHEAD).then(|| self.buf[self.len - 1])
    }

    /// Append one byte. The caller guarantees there is room.
    pub(crate) fn push(&mut self, byte: u8) {
        debug_assert!(self.len < FRAME_CAPACITY);
        self.buf[self.len] = byte;
        self.len += 1;
    }

    pub(crate) fn clear(&mut self) {
        self.len = 0;
    }

    /// Writable view of `len` bytes; sets the frame length to `len`.
    ///
    /// The caller guarantees `len <= FRAME_CAPACITY`.
    pub(crate) fn fill(&mut self, len: usize) -> &mut [u8] {
        debug_assert!(len <= FRAME_CAPACITY);
        self.len = len;
        &mut self.buf[..len]
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Frame {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for Frame {}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("len", &self.len)
            .field("frame_type", &self.frame_type())
            .field("bytes", &format_args!("{:02X?}", self.as_bytes()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AT_NH: [u8; 8] = [0x7E, 0x00, 0x04, 0x08, 0x52, 0x4E, 0x48, 0x0F];
    const MODEM_STATUS: [u8; 6] = [0x7E, 0x00, 0x02, 0x8A, 0x00, 0x75];

    #[test]
    fn accessors_on_at_command() {
        let frame = Frame::from_bytes(&AT_NH).unwrap();

        assert_eq!(frame.len(), 8);
        assert_eq!(frame.payload_len(), Some(4));
        assert_eq!(frame.frame_type(), Some(FrameType::AtCommand));
        assert_eq!(frame.frame_id(), Some(0x52));
        assert_eq!(frame.frame_data(), &[0x08, 0x52, 0x4E, 0x48]);
        assert_eq!(frame.checksum(), Some(0x0F));
        assert_eq!(frame.as_bytes(), &AT_NH);
    }

    #[test]
    fn accessors_on_modem_status() {
        let frame = Frame::from_bytes(&MODEM_STATUS).unwrap();
        assert_eq!(frame.frame_type(), Some(FrameType::ModemStatus));
        assert_eq!(frame.frame_data(), &[0x8A, 0x00]);
    }

    #[test]
    fn short_frames_have_no_fields() {
        let empty = Frame::new();
        assert!(empty.is_empty());
        assert_eq!(empty.payload_len(), None);
        assert_eq!(empty.frame_type(), None);
        assert_eq!(empty.checksum(), None);
        assert!(empty.frame_data().is_empty());

        let bare = Frame::from_bytes(&[0x7E, 0x00, 0x00, 0xFF]).unwrap();
        assert_eq!(bare.payload_len(), Some(0));
        assert_eq!(bare.frame_type(), None);
        assert_eq!(bare.frame_id(), None);
        assert_eq!(bare.checksum(), Some(0xFF));
    }

    #[test]
    fn from_bytes_rejects_oversized_input() {
        let bytes = [0u8; FRAME_CAPACITY + 1];
        let err = Frame::from_bytes(&bytes).unwrap_err();
        assert_eq!(
            err,
            BuildError::CapacityExceeded {
                len: FRAME_CAPACITY + 1,
                max: FRAME_CAPACITY
            }
        );
    }

    #[test]
    fn full_capacity_fits() {
        let bytes = [0xAA; FRAME_CAPACITY];
        let frame = Frame::from_bytes(&bytes).unwrap();
        assert_eq!(frame.len(), frame.capacity());
    }

    #[test]
    fn equality_ignores_bytes_past_len() {
        let mut longer = Frame::from_bytes(&AT_NH).unwrap();
        longer.fill(MODEM_STATUS.len()).copy_from_slice(&MODEM_STATUS);

        assert_eq!(longer, Frame::from_bytes(&MODEM_STATUS).unwrap());
    }

    #[test]
    fn debug_shows_bytes() {
        let frame = Frame::from_bytes(&MODEM_STATUS).unwrap();
        let rendered = format!("{frame:?}");
        assert!(rendered.contains("7E"));
        assert!(rendered.contains("ModemStatus"));
    }
}
