//! Byte-at-a-time frame receiver with double buffering.
//!
//! [`FrameReceiver::add_byte`] is meant to be called from the serial receive
//! path, one byte per call. It never allocates, never blocks and never copies a
//! frame: completed frames stay in one of two internal buffers and the caller
//! gets a [`FrameHandle`] naming that buffer. While the caller reads one buffer
//! the receiver fills the other.
//!
//! A handle stays valid until the start delimiter of the frame after next
//! lands in its buffer. Reading it later yields `None`, never torn data.
//! Handles carry the identity of the receiver that issued them; any other
//! receiver resolves them to `None`.
//!
//! The transition table is internal to the receiver:
//!
//! ```compile_fail
//! use digimesh_frame::receiver::transition;
//! ```

use std::sync::atomic::{AtomicU32, Ordering};

use crate::checksum;
use crate::config::FrameConfig;
use crate::error::RxError;
use crate::frame::{Frame, FRAME_CAPACITY, FRAME_OVERHEAD, START_DELIMITER};

/// Receive state, named after the next byte the receiver expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RxState {
    /// Nothing buffered; waiting for the start delimiter.
    #[default]
    Idle,
    /// Delimiter buffered; next byte is the length MSB.
    HeaderHi,
    /// Length MSB buffered; next byte is the length LSB.
    HeaderLo,
    /// Length known; collecting until `total` bytes are buffered.
    Collecting { total: usize },
}

/// Outcome of feeding one byte to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    /// Buffer the byte and move to the given state.
    Store(RxState),
    /// Buffer the byte; it is the last one of the frame.
    Complete,
    /// Drop the byte and any frame in progress.
    Reject(RxError),
}

/// Transition table of the receiver.
///
/// `buffered` holds the bytes of the frame in progress and `capacity` is the
/// most the buffer may hold. Pure: applying the returned [`Step`] is up to the
/// caller. `buffered` must match `state`; in `HeaderLo` it holds two bytes.
pub(crate) fn transition(state: RxState, buffered: &[u8], capacity: usize, byte: u8) -> Step {
    if buffered.len() >= capacity {
        return Step::Reject(RxError::Overflow { capacity });
    }

    match state {
        RxState::Idle if byte == START_DELIMITER => Step::Store(RxState::HeaderHi),
        RxState::Idle => Step::Reject(RxError::Desync { byte }),
        RxState::HeaderHi => Step::Store(RxState::HeaderLo),
        RxState::HeaderLo => {
            let data_len = u16::from_be_bytes([buffered[1], byte]) as usize;
            Step::Store(RxState::Collecting {
                total: data_len + FRAME_OVERHEAD,
            })
        }
        RxState::Collecting { total } if buffered.len() + 1 == total => Step::Complete,
        RxState::Collecting { .. } => Step::Store(state),
    }
}

/// One of the receiver's two buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferSlot {
    First,
    Second,
}

impl BufferSlot {
    /// The other buffer.
    pub fn other(self) -> Self {
        match self {
            BufferSlot::First => BufferSlot::Second,
            BufferSlot::Second => BufferSlot::First,
        }
    }

    fn index(self) -> usize {
        match self {
            BufferSlot::First => 0,
            BufferSlot::Second => 1,
        }
    }
}

/// Names a completed frame held inside a [`FrameReceiver`].
///
/// Resolve it with [`FrameReceiver::frame`] on the receiver that returned it.
/// Handles are plain values; holding one does not stop the receiver from
/// reusing its buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle {
    receiver: u32,
    slot: BufferSlot,
    sequence: u32,
}

impl FrameHandle {
    /// Which buffer the frame lives in.
    pub fn slot(&self) -> BufferSlot {
        self.slot
    }

    /// Completion number of this frame, counting from 0.
    pub fn sequence(&self) -> u32 {
        self.sequence
    }
}

static NEXT_RECEIVER_ID: AtomicU32 = AtomicU32::new(0);

/// Incremental API frame receiver.
///
/// Feed it bytes with [`add_byte`](Self::add_byte). Bad input (noise between
/// frames, overlong frames, checksum failures) is dropped and counted in a
/// saturating error counter; the receiver always keeps going.
#[derive(Debug)]
pub struct FrameReceiver {
    id: u32,
    buffers: [Frame; 2],
    /// Completion sequence held by each buffer, if it still holds one.
    held: [Option<u32>; 2],
    active: BufferSlot,
    state: RxState,
    capacity: usize,
    completed: u32,
    error_count: u8,
    last_error: Option<RxError>,
}

impl FrameReceiver {
    /// A receiver accepting frames up to [`FRAME_CAPACITY`] bytes.
    pub fn new() -> Self {
        Self::with_capacity(FRAME_CAPACITY)
    }

    /// A receiver accepting frames up to `config.max_frame_len` bytes.
    pub fn with_config(config: &FrameConfig) -> Self {
        Self::with_capacity(config.effective_max_frame_len())
    }

    fn with_capacity(capacity: usize) -> Self {
        Self {
            id: NEXT_RECEIVER_ID.fetch_add(1, Ordering::Relaxed),
            buffers: [Frame::new(), Frame::new()],
            held: [None, None],
            active: BufferSlot::First,
            state: RxState::Idle,
            capacity,
            completed: 0,
            error_count: 0,
            last_error: None,
        }
    }

    /// Consume one byte from the link.
    ///
    /// Returns a handle when this byte completes a valid frame. The frame stays
    /// readable through [`frame`](Self::frame) until the next-but-one frame
    /// starts arriving; the caller must be done with it by then.
    pub fn add_byte(&mut self, byte: u8) -> Option<FrameHandle> {
        let slot = self.active.index();
        let step = transition(self.state, self.in_progress(), self.capacity, byte);

        match step {
            Step::Store(next) => {
                if self.state == RxState::Idle {
                    // The buffer is about to be overwritten; retire its old frame.
                    self.held[slot] = None;
                    self.buffers[slot].clear();
                }
                self.buffers[slot].push(byte);
                self.state = next;
                None
            }
            Step::Complete => {
                self.buffers[slot].push(byte);
                self.finish_frame()
            }
            Step::Reject(err) => {
                self.drop_frame(err);
                None
            }
        }
    }

    /// Look up a completed frame.
    ///
    /// Returns `None` if the handle's buffer has since started receiving a newer
    /// frame, or if another receiver issued the handle.
    pub fn frame(&self, handle: FrameHandle) -> Option<&Frame> {
        if handle.receiver != self.id {
            return None;
        }
        let slot = handle.slot.index();
        (self.held[slot] == Some(handle.sequence)).then(|| &self.buffers[slot])
    }

    /// The frame named by a handle this receiver just returned.
    pub(crate) fn completed(&self, handle: FrameHandle) -> &Frame {
        &self.buffers[handle.slot.index()]
    }

    /// Frames dropped since construction or the last clear, saturating at 255.
    pub fn error_count(&self) -> u8 {
        self.error_count
    }

    pub fn clear_error_count(&mut self) {
        self.error_count = 0;
    }

    /// The most recent condition the receiver recovered from.
    pub fn last_error(&self) -> Option<RxError> {
        self.last_error
    }

    /// Drop any frame in progress and wait for a start delimiter.
    ///
    /// Completed frames that are still held remain readable. Not counted as
    /// an error.
    pub fn reset(&mut self) {
        if self.state != RxState::Idle {
            self.buffers[self.active.index()].clear();
        }
        self.state = RxState::Idle;
    }

    pub fn state(&self) -> RxState {
        self.state
    }

    /// Number of bytes of the frame in progress.
    pub fn buffered(&self) -> usize {
        self.in_progress().len()
    }

    /// The buffer the next frame will be written into.
    pub fn active_slot(&self) -> BufferSlot {
        self.active
    }

    /// Largest frame this receiver accepts.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// While idle the active buffer may still hold an older, retired frame.
    fn in_progress(&self) -> &[u8] {
        match self.state {
            RxState::Idle => &[],
            _ => self.buffers[self.active.index()].as_bytes(),
        }
    }

    fn finish_frame(&mut self) -> Option<FrameHandle> {
        let slot = self.active;
        let frame = &self.buffers[slot.index()];
        self.state = RxState::Idle;

        if !checksum::verify(frame) {
            let err = RxError::ChecksumMismatch {
                expected: checksum::compute(frame.frame_data()),
                actual: frame.checksum().unwrap_or_default(),
            };
            self.buffers[slot.index()].clear();
            self.record_error(err);
            return None;
        }

        let sequence = self.completed;
        self.completed = self.completed.wrapping_add(1);
        self.held[slot.index()] = Some(sequence);
        self.active = slot.other();

        tracing::trace!(
            len = frame.len(),
            frame_type = frame.frame_type().map(|t| t.as_u8()),
            sequence,
            "frame received"
        );
        Some(FrameHandle {
            receiver: self.id,
            slot,
            sequence,
        })
    }

    fn drop_frame(&mut self, err: RxError) {
        if self.state != RxState::Idle {
            self.buffers[self.active.index()].clear();
        }
        self.state = RxState::Idle;
        self.record_error(err);
    }

    fn record_error(&mut self, err: RxError) {
        self.error_count = self.error_count.saturating_add(1);
        self.last_error = Some(err);
        tracing::debug!(error = %err, error_count = self.error_count, "dropped frame");
    }
}

impl Default for FrameReceiver {
    fn default() -> Self {
        Self::new()
    }
}
