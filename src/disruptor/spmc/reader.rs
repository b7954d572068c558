//! Reader cursor and the shared-reader claim protocol.

use std::sync::atomic::Ordering;

use tracing::debug;

use super::padded::PaddedAtomicUsize;
use super::ring_buffer::RingBuffer;

/// A cursor into the stream published by a [`RingBuffer`].
///
/// `index` is the slot the reader next intends to consume; `version` is the
/// largest per-slot version the reader has definitively consumed. Both
/// fields are atomics so a `ReaderState` can be shared by reference across
/// cooperating consumer threads, which race to advance the same cursor via
/// compare-and-swap; each message is then delivered to at most one of them.
///
/// To consume independently instead, duplicate the state with
/// [`ReaderState::fork`] — the copy starts from the same position but
/// advances on its own from that point on.
pub struct ReaderState<'a, const S: usize, const N: usize> {
    buffer: &'a RingBuffer<S, N>,
    index: PaddedAtomicUsize,
    version: PaddedAtomicUsize,
}

/// Whether a slot carrying `seq` is acceptable to a reader at cursor
/// `(index, ver)` currently inspecting slot `i`.
///
/// The `i == 0 && seq == ver` case distinguishes a reader that has never
/// read anything from one that has completed exactly one full lap and
/// caught back up to slot 0 with nothing new published since: both start
/// with `ver` equal to the slot's current version, but only the former
/// should ever be admissible, and neither is, since there is nothing new
/// either way. This also makes a brand-new `(index=0, version=0)` reader on
/// a freshly constructed buffer correctly report `None` rather than
/// (incorrectly) accepting the initial zeroed slot as a published message.
#[inline]
fn admissible(seq: usize, ver: usize, i: usize) -> bool {
    if seq % 2 == 1 {
        return false;
    }
    if i == 0 && seq == ver {
        return false;
    }
    if seq < ver {
        return false;
    }
    true
}

impl<'a, const S: usize, const N: usize> ReaderState<'a, S, N> {
    pub(super) fn new(buffer: &'a RingBuffer<S, N>) -> Self {
        Self {
            buffer,
            index: PaddedAtomicUsize::new(0),
            version: PaddedAtomicUsize::new(0),
        }
    }

    /// Duplicate this cursor into an independent reader.
    ///
    /// The new `ReaderState` starts at the same `(index, version)` but from
    /// this point on advances on its own: it shares no atomics with the
    /// original, so the two observe the stream independently and may each
    /// see the same messages.
    pub fn fork(&self) -> Self {
        Self {
            buffer: self.buffer,
            index: PaddedAtomicUsize::new(self.index.load(Ordering::Acquire)),
            version: PaddedAtomicUsize::new(self.version.load(Ordering::Relaxed)),
        }
    }

    /// Attempt to consume the next message admissible to this cursor.
    ///
    /// Returns `None` if nothing new is available, or if this call raced
    /// another consumer sharing the same state and lost. `None` never means
    /// the stream has ended; callers retry at their discretion.
    pub fn pop_front(&self) -> Option<[u8; S]> {
        let mut i = self.index.load(Ordering::Acquire);

        loop {
            let ver = self.version.load(Ordering::Relaxed);
            let slot = &self.buffer.slots[i];
            let seq1 = slot.version(Ordering::Acquire);

            if !admissible(seq1, ver, i) {
                if seq1 % 2 == 0 && seq1 < ver {
                    debug!(slot = i, slot_version = seq1, reader_version = ver, "reader overrun: writer lapped this cursor");
                }
                return None;
            }

            // SAFETY: validated below by re-checking the version; a
            // mismatch discards this copy without letting it escape.
            let buf = unsafe { slot.read_payload() };
            let seq2 = slot.version(Ordering::Acquire);

            if seq1 != seq2 {
                // Torn read: the writer republished this slot while we were
                // copying it. Retry against the same index.
                continue;
            }

            if
                self.version.compare_exchange(
                    ver,
                    seq2,
                    Ordering::Relaxed,
                    Ordering::Relaxed
                ).is_err()
            {
                // Another cooperating consumer already claimed this slot.
                return None;
            }

            let next = (i + 1) % N;
            match
                self.index.compare_exchange(
                    i,
                    next,
                    Ordering::Release,
                    Ordering::Acquire
                )
            {
                Ok(_) => {
                    return Some(buf);
                }
                Err(observed) => {
                    // Another consumer advanced the shared cursor first.
                    // Our claim on `version` is still valid for whatever
                    // slot the cursor now points at, so retry there rather
                    // than giving up.
                    debug!(lost_index = i, now_at = observed, "reader lost index race, retrying");
                    i = observed;
                    continue;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_reader_on_fresh_buffer_is_empty() {
        let buf: RingBuffer<4, 4> = RingBuffer::new();
        let r = buf.reader();
        assert_eq!(r.pop_front(), None);
    }

    #[test]
    fn reader_sees_published_message_then_empty() {
        let buf: RingBuffer<8, 4> = RingBuffer::new();
        let w = buf.try_lock().unwrap();
        let r = buf.reader();
        w.push_back([0, 1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(r.pop_front(), Some([0, 1, 2, 3, 4, 5, 6, 7]));
        assert_eq!(r.pop_front(), None);
    }

    #[test]
    fn overrun_never_yields_a_message_older_than_the_retained_window() {
        let buf: RingBuffer<2, 4> = RingBuffer::new();
        let w = buf.try_lock().unwrap();
        let r = buf.reader();
        for i in 0..300u16 {
            let b = i.to_le_bytes();
            w.push_back([b[0], b[1]]);
        }
        match r.pop_front() {
            None => {}
            Some(p) => {
                let k = u16::from_le_bytes(p);
                assert!((k as i32) >= 300 - 4);
            }
        }
    }

    #[test]
    fn forked_reader_observes_independently() {
        let buf: RingBuffer<4, 4> = RingBuffer::new();
        let w = buf.try_lock().unwrap();
        let r1 = buf.reader();
        w.push_back([9, 9, 9, 9]);
        let r2 = r1.fork();
        assert_eq!(r1.pop_front(), Some([9, 9, 9, 9]));
        assert_eq!(r2.pop_front(), Some([9, 9, 9, 9]));
        assert_eq!(r1.pop_front(), None);
        assert_eq!(r2.pop_front(), None);
    }

    #[test]
    fn second_claim_after_release_only_yields_the_newer_message() {
        // Single-slot buffer: the second publish overwrites the slot the
        // first one occupied, so a reader that only observes the buffer
        // once both writers have finished must see the later message and
        // nothing else, regardless of exactly when it was constructed.
        let buf: RingBuffer<4, 1> = RingBuffer::new();
        {
            let w = buf.try_lock().unwrap();
            w.push_back([1, 1, 1, 1]);
        }
        let r = buf.reader();
        {
            let w = buf.try_lock().unwrap();
            w.push_back([2, 2, 2, 2]);
        }
        assert_eq!(r.pop_front(), Some([2, 2, 2, 2]));
        assert_eq!(r.pop_front(), None);
    }
}
