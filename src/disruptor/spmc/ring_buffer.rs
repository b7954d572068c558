//! The SPMC ring buffer value type: N seqlock-protected slots plus the
//! writer-claim flag and write cursor that coordinate publication.

use std::sync::atomic::Ordering;

use tracing::{ debug, trace };

use crate::error::{ Result, SeqringError };

use super::padded::{ PaddedAtomicBool, PaddedAtomicUsize };
use super::reader::ReaderState;
use super::slot::Slot;
use super::writer::WriteHandle;

/// A fixed-capacity, lock-free, single-producer multi-consumer ring buffer.
///
/// `S` is the payload size in bytes; `N` is the slot count. Both are
/// compile-time constants, so the slot array is embedded inline with no
/// heap allocation. See the module documentation for the protocol this
/// type implements.
pub struct RingBuffer<const S: usize, const N: usize> {
    pub(super) write_index: PaddedAtomicUsize,
    pub(super) global_version: PaddedAtomicUsize,
    write_claimed: PaddedAtomicBool,
    pub(super) slots: [Slot<S>; N],
}

// SAFETY: every field is either an atomic or an array of `Slot<S>`, which is
// itself `Sync` (see `slot::Slot`). Sharing `&RingBuffer` across threads is
// the buffer's entire purpose.
unsafe impl<const S: usize, const N: usize> Sync for RingBuffer<S, N> {}

impl<const S: usize, const N: usize> Default for RingBuffer<S, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const S: usize, const N: usize> RingBuffer<S, N> {
    /// Construct a zero-initialized buffer: `write_index = 0`,
    /// `global_version = 0`, `write_claimed = false`, every slot zeroed.
    pub fn new() -> Self {
        Self {
            write_index: PaddedAtomicUsize::new(0),
            global_version: PaddedAtomicUsize::new(0),
            write_claimed: PaddedAtomicBool::new(false),
            slots: std::array::from_fn(|_| Slot::default()),
        }
    }

    /// Attempt to acquire single-writer exclusivity.
    ///
    /// Returns [`SeqringError::ClaimFailed`] if another `WriteHandle` is
    /// currently outstanding. Never blocks.
    pub fn try_lock(&self) -> Result<WriteHandle<'_, S, N>> {
        match
            self.write_claimed.compare_exchange(
                false,
                true,
                Ordering::Acquire,
                Ordering::Relaxed
            )
        {
            Ok(_) => {
                trace!(slots = N, payload_size = S, "writer claim acquired");
                Ok(WriteHandle::new(self))
            }
            Err(_) => Err(SeqringError::ClaimFailed),
        }
    }

    /// Release the writer claim. Called once by `WriteHandle::drop`.
    pub(super) fn release_claim(&self) {
        self.write_claimed.store(false, Ordering::Release);
        trace!("writer claim released");
    }

    /// Create a fresh reader positioned at the start of the stream.
    ///
    /// A brand-new reader's first `pop_front` returns `None`: the
    /// admissibility predicate rejects `index == 0 && version == slot
    /// version` on a buffer that has never been published to, by design
    /// (see `reader::ReaderState::pop_front`).
    pub fn reader(&self) -> ReaderState<'_, S, N> {
        ReaderState::new(self)
    }

    /// Publish `payload` into the slot at `write_index`, then advance it.
    ///
    /// Only [`WriteHandle::push_back`](super::writer::WriteHandle::push_back)
    /// calls this; it is the sole writer-side mutation path.
    pub(super) fn publish(&self, payload: &[u8; S]) {
        let i = self.write_index.load(Ordering::Relaxed);
        let slot = &self.slots[i];
        let seq = slot.version(Ordering::Relaxed);
        debug_assert!(seq % 2 == 0, "write_index points at an odd (in-progress) slot");

        slot.begin_write(seq);
        self.global_version.store(seq + 2, Ordering::Relaxed);
        // SAFETY: the slot's version is odd for the duration of this call
        // (set above, cleared by `end_write` below), so no reader will
        // accept the payload until the copy below is complete.
        unsafe {
            slot.write_payload(payload);
        }
        slot.end_write(seq);

        let next = (i + 1) % N;
        self.write_index.store(next, Ordering::Relaxed);
        trace!(slot = i, version = seq + 2, "published");

        if next == 0 {
            debug!(lap_version = seq + 2, "write cursor wrapped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_buffer_is_zeroed() {
        let buf: RingBuffer<8, 4> = RingBuffer::new();
        assert_eq!(buf.write_index.load(Ordering::Relaxed), 0);
        assert_eq!(buf.global_version.load(Ordering::Relaxed), 0);
        for slot in &buf.slots {
            assert_eq!(slot.version(Ordering::Relaxed), 0);
        }
    }

    #[test]
    fn try_lock_excludes_a_second_writer() {
        let buf: RingBuffer<8, 4> = RingBuffer::new();
        let w1 = buf.try_lock();
        assert!(w1.is_ok());
        assert_eq!(buf.try_lock().unwrap_err(), SeqringError::ClaimFailed);
        drop(w1);
        assert!(buf.try_lock().is_ok());
    }

    #[test]
    fn publish_advances_cursor_and_global_version() {
        let buf: RingBuffer<4, 4> = RingBuffer::new();
        let w = buf.try_lock().unwrap();
        w.push_back([1, 2, 3, 4]);
        assert_eq!(buf.write_index.load(Ordering::Relaxed), 1);
        assert_eq!(buf.global_version.load(Ordering::Relaxed), 2);
        assert_eq!(buf.slots[0].version(Ordering::Acquire), 2);
    }

    #[test]
    fn after_n_publications_cursor_wraps_and_all_slots_are_version_two() {
        let buf: RingBuffer<4, 4> = RingBuffer::new();
        let w = buf.try_lock().unwrap();
        for i in 0..4u8 {
            w.push_back([i, i, i, i]);
        }
        assert_eq!(buf.write_index.load(Ordering::Relaxed), 0);
        for slot in &buf.slots {
            assert_eq!(slot.version(Ordering::Relaxed), 2);
        }
    }
}
