//! Lock-free single-producer multi-consumer ring buffer.
//!
//! ## Implementation
//!
//! | Pattern | Type | Use Case |
//! |---------|------|----------|
//! | SPMC | `RingBuffer<S, N>` | Fan-out: one writer, any number of readers |
//!
//! Rather than claiming batches of slots and committing a shared
//! producer/consumer cursor, the ring here uses a per-slot seqlock: every
//! slot carries its own version counter, odd while the writer is mid-publish
//! and even once the payload is stable. Readers validate a copy by
//! re-checking the version after copying the payload, and retry on a torn
//! read. See `spmc` for the full protocol.
//!
//! ## Safety
//!
//! Uses `unsafe` for the payload copy inside the seqlock read/write. Caller
//! must ensure:
//! - Only one `WriteHandle` exists per buffer (enforced by the claim flag).
//! - Readers never assume a `None` from `pop_front` means the stream ended;
//!   it means "nothing admissible right now".

pub mod spmc;

pub use spmc::{ ReaderState, RingBuffer, WriteHandle };

use crate::constants::{ DEFAULT_RING_SLOTS, DEFAULT_SLOT_SIZE };

/// The pinned reference instantiation (`S = 8`, `N = 256`) that a foreign-function
/// layer over this crate would expose. Not part of the generic core; a
/// convenience alias for callers who want the reference configuration without
/// spelling out the generic parameters.
pub type DefaultRingBuffer = RingBuffer<DEFAULT_SLOT_SIZE, DEFAULT_RING_SLOTS>;
