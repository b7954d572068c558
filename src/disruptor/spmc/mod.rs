//! Per-slot seqlock SPMC ring buffer: one writer, any number of readers.

mod padded;
mod reader;
mod ring_buffer;
mod slot;
mod writer;

pub use reader::ReaderState;
pub use ring_buffer::RingBuffer;
pub use writer::WriteHandle;
