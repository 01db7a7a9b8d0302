use std::cmp::Ordering;
use std::ptr;

/// Priority tag carried by a [`Packet`].
///
/// Metadata only: the queue is strictly FIFO and never inspects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[repr(u8)]
pub enum PacketPriority {
    /// Bulk traffic.
    #[default]
    Low = 0,
    /// Latency-sensitive traffic.
    Medium = 1,
    /// Real-time traffic.
    High = 2,
    /// Control-plane messages.
    Control = 3,
}

/// Fixed-size packet record for pipeline hand-off.
///
/// Carries a raw view of the frame bytes plus routing metadata. The payload
/// pointer is owned by whichever pipeline stage currently holds the record;
/// passing a `Packet` through a queue transfers that ownership to the
/// consumer.
#[derive(Debug, Clone, Copy)]
pub struct Packet {
    /// Frame bytes, or null for a metadata-only record.
    pub data: *mut u8,
    /// Frame length in bytes.
    pub len: usize,
    /// Scheduling hint for downstream stages.
    pub priority: PacketPriority,
    /// Pipeline-unique identifier.
    pub id: u64,
}

// The holder of a Packet is the sole owner of its payload pointer.
unsafe impl Send for Packet {}

impl Packet {
    /// Full constructor.
    pub const fn new(data: *mut u8, len: usize, priority: PacketPriority, id: u64) -> Self {
        Self {
            data,
            len,
            priority,
            id,
        }
    }

    /// Metadata-only record, convenient for tests and accounting traffic.
    pub const fn with_id(id: u64) -> Self {
        Self {
            data: ptr::null_mut(),
            len: 0,
            priority: PacketPriority::Low,
            id,
        }
    }

    /// Whether the record references actual frame bytes.
    pub fn is_valid(&self) -> bool {
        !self.data.is_null() && self.len > 0
    }

    /// Clear the record back to its default state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl Default for Packet {
    fn default() -> Self {
        Self::with_id(0)
    }
}

impl PartialEq for Packet {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.priority == other.priority
    }
}

impl Eq for Packet {}

impl PartialOrd for Packet {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Packet {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.priority, self.id).cmp(&(other.priority, other.id))
    }
}
