//! Error types for queue construction and enqueue failures.

use std::fmt;
use thiserror::Error;

/// Errors surfaced at queue construction.
///
/// Once a queue exists its operations never error: a full or empty queue is a
/// normal steady-state outcome reported through `Result`/`Option` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueueError {
    /// Requested capacity is zero, or too large to round up to a supported
    /// power of two.
    #[error("invalid capacity: {requested}")]
    InvalidCapacity {
        /// The capacity the caller asked for.
        requested: usize,
    },
}

/// Enqueue failure carrying the rejected record back to the caller.
///
/// `enqueue` returns this only when the queue is definitively full;
/// `try_enqueue` returns it on any single-shot miss, which may be spurious
/// under contention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Full<T>(pub T);

impl<T> Full<T> {
    /// Recover the record that did not fit.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Display for Full<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "queue is full")
    }
}
