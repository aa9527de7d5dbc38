//! Single-byte API frame checksum.
//!
//! The checksum covers everything after the length field up to, but not
//! including, the checksum byte. A frame is intact when those bytes plus the
//! checksum sum to 0xFF (mod 256).

use crate::frame::{Frame, FRAME_OVERHEAD, HEADER_SIZE};

/// Value the checksummed region plus checksum byte must sum to.
pub const CHECKSUM_TARGET: u8 = 0xFF;

/// Compute the checksum for a frame's checksummed region.
pub fn compute(data: &[u8]) -> u8 {
    let sum = data.iter().fold(0u8, |acc, byte| acc.wrapping_add(*byte));
    CHECKSUM_TARGET.wrapping_sub(sum)
}

/// Returns true if the frame's trailing byte matches its contents.
pub fn verify(frame: &Frame) -> bool {
    match frame.checksum() {
        Some(checksum) => compute(frame.frame_data()) == checksum,
        None => false,
    }
}

/// Write the checksum into the last byte of `frame_bytes` (delimiter through checksum).
pub(crate) fn seal(frame_bytes: &mut [u8]) {
    debug_assert!(frame_bytes.len() >= FRAME_OVERHEAD);
    let last = frame_bytes.len() - 1;
    frame_bytes[last] = compute(&frame_bytes[HEADER_SIZE..last]);
}
