use std::sync::atomic::{AtomicU64, Ordering};

/// Advisory operation counters.
///
/// Uses atomic counters with `Relaxed` ordering since these are purely
/// statistical: no control flow depends on exact values, and approximate
/// readings under concurrent updates are acceptable for observability.
#[derive(Debug, Default)]
pub struct Stats {
    enqueue_attempts: AtomicU64,
    enqueue_successes: AtomicU64,
    dequeue_attempts: AtomicU64,
    dequeue_successes: AtomicU64,
    batch_enqueues: AtomicU64,
    batch_dequeues: AtomicU64,
    contention_events: AtomicU64,
}

impl Stats {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn record_enqueue_attempt(&self) {
        self.enqueue_attempts.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_enqueue_success(&self) {
        self.enqueue_successes.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_dequeue_attempt(&self) {
        self.dequeue_attempts.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_dequeue_success(&self) {
        self.dequeue_successes.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_batch_enqueue(&self) {
        self.batch_enqueues.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_batch_dequeue(&self) {
        self.batch_dequeues.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_contention_event(&self) {
        self.contention_events.fetch_add(1, Ordering::Relaxed);
    }

    /// Take a point-in-time snapshot of the counters.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            enqueue_attempts: self.enqueue_attempts.load(Ordering::Relaxed),
            enqueue_successes: self.enqueue_successes.load(Ordering::Relaxed),
            dequeue_attempts: self.dequeue_attempts.load(Ordering::Relaxed),
            dequeue_successes: self.dequeue_successes.load(Ordering::Relaxed),
            batch_enqueues: self.batch_enqueues.load(Ordering::Relaxed),
            batch_dequeues: self.batch_dequeues.load(Ordering::Relaxed),
            contention_events: self.contention_events.load(Ordering::Relaxed),
        }
    }

    /// Zero every counter.
    pub fn reset(&self) {
        self.enqueue_attempts.store(0, Ordering::Relaxed);
        self.enqueue_successes.store(0, Ordering::Relaxed);
        self.dequeue_attempts.store(0, Ordering::Relaxed);
        self.dequeue_successes.store(0, Ordering::Relaxed);
        self.batch_enqueues.store(0, Ordering::Relaxed);
        self.batch_dequeues.store(0, Ordering::Relaxed);
        self.contention_events.store(0, Ordering::Relaxed);
    }
}

/// A point-in-time snapshot of the advisory counters.
///
/// Plain `Copy` data for easy aggregation and display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Calls into `enqueue`, counted once per call regardless of retries.
    pub enqueue_attempts: u64,
    /// Enqueues that placed a record.
    pub enqueue_successes: u64,
    /// Calls into `dequeue`, counted once per call regardless of retries.
    pub dequeue_attempts: u64,
    /// Dequeues that returned a record.
    pub dequeue_successes: u64,
    /// Calls into `enqueue_batch` with a non-empty input.
    pub batch_enqueues: u64,
    /// Calls into `dequeue_batch` with a non-empty output buffer.
    pub batch_dequeues: u64,
    /// Times an operation found its slot not yet recycled or filled while the
    /// queue was not definitively full or empty.
    pub contention_events: u64,
}

impl StatsSnapshot {
    /// Fraction of enqueue attempts that succeeded, 0.0 with no attempts.
    pub fn enqueue_success_rate(&self) -> f64 {
        if self.enqueue_attempts == 0 {
            return 0.0;
        }
        self.enqueue_successes as f64 / self.enqueue_attempts as f64
    }

    /// Fraction of dequeue attempts that succeeded, 0.0 with no attempts.
    pub fn dequeue_success_rate(&self) -> f64 {
        if self.dequeue_attempts == 0 {
            return 0.0;
        }
        self.dequeue_successes as f64 / self.dequeue_attempts as f64
    }
}
