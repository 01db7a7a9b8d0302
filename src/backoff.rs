use std::hint;
use std::thread;
use std::time::Duration;

/// Adaptive backoff for contended cursor operations.
///
/// Progressively increases wait cost: spin with PAUSE → yield to the
/// scheduler → microsecond sleep. Brief same-cache-line contention resolves
/// within the spin phase; the sleep phase keeps a stalled peer (for example a
/// producer preempted between reservation and publication) from pinning a
/// full core.
#[derive(Debug)]
pub struct Backoff {
    step: u32,
}

impl Backoff {
    /// Executes `2^step` PAUSE hints per wait while below this.
    const SPIN_LIMIT: u32 = 16;
    /// Yields the scheduler until this, sleeps after.
    const YIELD_LIMIT: u32 = 80;
    const SLEEP: Duration = Duration::from_micros(1);

    /// Creates a fresh backoff instance.
    #[inline]
    pub fn new() -> Self {
        Self { step: 0 }
    }

    /// Wait once, escalating with every call since the last reset.
    #[inline]
    pub fn wait(&mut self) {
        if self.step < Self::SPIN_LIMIT {
            for _ in 0..(1u32 << self.step) {
                hint::spin_loop();
            }
            self.step += 1;
        } else if self.step < Self::YIELD_LIMIT {
            thread::yield_now();
            self.step += 1;
        } else {
            thread::sleep(Self::SLEEP);
        }
    }

    /// Forget accumulated contention after forward progress.
    #[inline]
    pub fn reset(&mut self) {
        self.step = 0;
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new()
    }
}
