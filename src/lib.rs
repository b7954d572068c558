//! seqring - lock-free single-producer multi-consumer seqlock ring buffer

pub mod constants;
pub mod disruptor;
pub mod error;

pub use disruptor::{ DefaultRingBuffer, ReaderState, RingBuffer, WriteHandle };
pub use error::{ Result, SeqringError };

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
