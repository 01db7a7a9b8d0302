use crate::error::QueueError;

/// Smallest usable capacity; requests below this round up to it.
pub(crate) const MIN_CAPACITY: usize = 2;

/// Largest capacity accepted after power-of-two rounding.
pub(crate) const MAX_CAPACITY: usize = usize::MAX >> 1;

/// Construction parameters for [`crate::PacketQueue`].
#[derive(Debug, Clone, Copy)]
pub struct Config {
    /// Requested slot count. Rounded up to a power of two, minimum 2.
    pub capacity: usize,
    /// Collect advisory operation counters (slight overhead on hot paths).
    pub enable_stats: bool,
}

impl Config {
    /// Creates a configuration with stats collection disabled.
    pub const fn new(capacity: usize) -> Self {
        Self {
            capacity,
            enable_stats: false,
        }
    }

    /// Toggles advisory stats collection.
    pub const fn stats(mut self, enable: bool) -> Self {
        self.enable_stats = enable;
        self
    }

    /// The slot count the queue will actually allocate.
    pub(crate) fn rounded_capacity(&self) -> Result<usize, QueueError> {
        if self.capacity == 0 {
            return Err(QueueError::InvalidCapacity {
                requested: self.capacity,
            });
        }
        match self.capacity.max(MIN_CAPACITY).checked_next_power_of_two() {
            Some(cap) if cap <= MAX_CAPACITY => Ok(cap),
            _ => Err(QueueError::InvalidCapacity {
                requested: self.capacity,
            }),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: 1 << 16,
            enable_stats: false,
        }
    }
}

/// Receive-ring sizing: 4K slots keep the index math resident in L1.
pub const LOW_LATENCY_CONFIG: Config = Config::new(1 << 12);

/// Work-distribution sizing: 256K slots absorb long consumer stalls.
pub const HIGH_THROUGHPUT_CONFIG: Config = Config::new(1 << 18);
