//! Debug assertion macros for the ring's structural invariants.
//!
//! Active only in debug builds, so there is zero overhead in release builds.

/// Assert that the in-flight record count never exceeds capacity.
///
/// Checked after computing a batch reservation size.
macro_rules! debug_assert_bounded_count {
    ($count:expr, $capacity:expr) => {
        debug_assert!(
            $count <= $capacity,
            "in-flight count {} exceeds capacity {}",
            $count,
            $capacity
        )
    };
}

/// Assert that a cursor only moves forward.
macro_rules! debug_assert_monotonic {
    ($name:literal, $old:expr, $new:expr) => {
        debug_assert!(
            $new >= $old,
            "{} cursor moved backwards: {} -> {}",
            $name,
            $old,
            $new
        )
    };
}

/// Assert that the dequeue cursor never passes the enqueue cursor.
macro_rules! debug_assert_head_not_past_tail {
    ($head:expr, $tail:expr) => {
        debug_assert!(
            $head <= $tail,
            "dequeue cursor {} passed enqueue cursor {}",
            $head,
            $tail
        )
    };
}

pub(crate) use debug_assert_bounded_count;
pub(crate) use debug_assert_head_not_past_tail;
pub(crate) use debug_assert_monotonic;
