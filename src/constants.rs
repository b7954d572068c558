//! Core constants used by the ring buffer implementation.

/// Cache line size for alignment (64 bytes on most common server/desktop CPUs).
pub const CACHE_LINE_SIZE: usize = 64;

/// Payload size of the reference/FFI instantiation (`DefaultRingBuffer`): 8 bytes.
pub const DEFAULT_SLOT_SIZE: usize = 8;

/// Slot count of the reference/FFI instantiation (`DefaultRingBuffer`): 256 slots.
pub const DEFAULT_RING_SLOTS: usize = 256;
