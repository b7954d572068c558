//! Cache-line padded atomics.
//!
//! Mirrors this crate's `PaddedProducerSequence`/`PaddedConsumerSequence`
//! pattern: a single hot atomic wrapped in a struct aligned to a full cache
//! line, so that two of these fields placed next to each other in a larger
//! struct never share a cache line and therefore never false-share under
//! concurrent access from different threads.
//!
//! `write_index`, `global_version` and `write_claimed` on [`RingBuffer`],
//! and `index`/`version` on [`ReaderState`] (Invariant 7 of the data model),
//! each get their own padded wrapper.
//!
//! [`RingBuffer`]: super::ring_buffer::RingBuffer
//! [`ReaderState`]: super::reader::ReaderState

#[cfg(not(loom))]
use std::sync::atomic::{ AtomicBool, AtomicUsize, Ordering };
#[cfg(loom)]
use loom::sync::atomic::{ AtomicBool, AtomicUsize, Ordering };

use crate::constants::CACHE_LINE_SIZE;

/// A cache-line aligned `AtomicUsize`.
///
/// The compiler pads the struct's size up to a multiple of its alignment, so
/// this occupies exactly one [`CACHE_LINE_SIZE`]-byte line regardless of the
/// platform's native word size.
#[repr(C, align(64))]
#[derive(Debug)]
pub struct PaddedAtomicUsize {
    value: AtomicUsize,
}

impl Default for PaddedAtomicUsize {
    fn default() -> Self {
        Self::new(0)
    }
}

impl PaddedAtomicUsize {
    /// Create a new padded atomic with the given initial value.
    ///
    /// `loom`'s atomics register with the model checker at construction
    /// time and cannot be built in a `const fn`; under `cfg(loom)` this is
    /// a plain associated function instead.
    #[cfg(not(loom))]
    pub const fn new(initial: usize) -> Self {
        Self { value: AtomicUsize::new(initial) }
    }

    #[cfg(loom)]
    pub fn new(initial: usize) -> Self {
        Self { value: AtomicUsize::new(initial) }
    }

    #[inline(always)]
    pub fn load(&self, order: Ordering) -> usize {
        self.value.load(order)
    }

    #[inline(always)]
    pub fn store(&self, value: usize, order: Ordering) {
        self.value.store(value, order);
    }

    #[inline(always)]
    pub fn compare_exchange(
        &self,
        current: usize,
        new: usize,
        success: Ordering,
        failure: Ordering
    ) -> Result<usize, usize> {
        self.value.compare_exchange(current, new, success, failure)
    }
}

/// A cache-line aligned `AtomicBool`, used for the single-writer claim flag.
#[repr(C, align(64))]
#[derive(Debug)]
pub struct PaddedAtomicBool {
    value: AtomicBool,
}

impl Default for PaddedAtomicBool {
    fn default() -> Self {
        Self::new(false)
    }
}

impl PaddedAtomicBool {
    /// Create a new padded atomic with the given initial value.
    ///
    /// `loom`'s atomics register with the model checker at construction
    /// time and cannot be built in a `const fn`; under `cfg(loom)` this is
    /// a plain associated function instead.
    #[cfg(not(loom))]
    pub const fn new(initial: bool) -> Self {
        Self { value: AtomicBool::new(initial) }
    }

    #[cfg(loom)]
    pub fn new(initial: bool) -> Self {
        Self { value: AtomicBool::new(initial) }
    }

    #[inline(always)]
    pub fn compare_exchange(
        &self,
        current: bool,
        new: bool,
        success: Ordering,
        failure: Ordering
    ) -> Result<bool, bool> {
        self.value.compare_exchange(current, new, success, failure)
    }

    #[inline(always)]
    pub fn store(&self, value: bool, order: Ordering) {
        self.value.store(value, order);
    }
}
