use std::sync::atomic::{AtomicU8, Ordering};

/// Frame ID that asks the radio not to send a status frame.
pub const NO_ACK_FRAME_ID: u8 = 0;

/// Hands out outbound frame IDs 1, 2, ..., 255, 1, 2, ...
///
/// ID 0 disables acknowledgment, so it is never produced. Each call is a single
/// atomic read-modify-write; a sequencer can be shared between threads or
/// placed in a `static`.
#[derive(Debug)]
pub struct FrameIdSequencer {
    last: AtomicU8,
}

impl FrameIdSequencer {
    /// A sequencer whose first ID is 1.
    pub const fn new() -> Self {
        Self::starting_after(NO_ACK_FRAME_ID)
    }

    /// A sequencer whose first ID follows `last`.
    pub const fn starting_after(last: u8) -> Self {
        Self {
            last: AtomicU8::new(last),
        }
    }

    /// Draw the next frame ID.
    pub fn next(&self) -> u8 {
        let previous = self
            .last
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |id| Some(successor(id)))
            .unwrap_or_else(|id| id);
        successor(previous)
    }

    /// The most recently issued ID (0 if none yet).
    pub fn last(&self) -> u8 {
        self.last.load(Ordering::Acquire)
    }
}

impl Default for FrameIdSequencer {
    fn default() -> Self {
        Self::new()
    }
}

fn successor(id: u8) -> u8 {
    if id == u8::MAX {
        1
    } else {
        id + 1
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use super::*;

    #[test]
    fn starts_at_one() {
        let ids = FrameIdSequencer::new();
        assert_eq!(ids.last(), 0);
        assert_eq!(ids.next(), 1);
        assert_eq!(ids.next(), 2);
        assert_eq!(ids.last(), 2);
    }

    #[test]
    fn wraps_past_255_without_zero() {
        let ids = FrameIdSequencer::new();
        for expected in 1..=255u8 {
            assert_eq!(ids.next(), expected);
        }
        assert_eq!(ids.next(), 1);
    }

    #[test]
    fn starting_after_max_wraps_to_one() {
        let ids = FrameIdSequencer::starting_after(254);
        assert_eq!(ids.next(), 255);
        assert_eq!(ids.next(), 1);
    }

    #[test]
    fn concurrent_callers_get_distinct_ids() {
        let ids = Arc::new(FrameIdSequencer::new());
        let handles: Vec<_> = (0..5)
            .map(|_| {
                let ids = Arc::clone(&ids);
                std::thread::spawn(move || (0..51).map(|_| ids.next()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert_ne!(id, NO_ACK_FRAME_ID);
                assert!(seen.insert(id), "duplicate frame id {id}");
            }
        }
        assert_eq!(seen.len(), 255);
    }
}
