//! Error types for the seqring ring buffer.

use thiserror::Error;

/// Result type alias for seqring operations.
pub type Result<T> = std::result::Result<T, SeqringError>;

/// Errors surfaced by the ring buffer's core protocol.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeqringError {
    /// Another writer currently holds the claim on this buffer.
    ///
    /// The writer-claim is a trylock: this is not a timeout or a deadlock,
    /// just the one possible outcome of losing the claim CAS. The caller
    /// may retry or give up; the buffer is left untouched.
    #[error("writer claim already held")]
    ClaimFailed,
}

impl SeqringError {
    /// Whether retrying the operation that produced this error might succeed.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::ClaimFailed)
    }
}
