use crate::invariants::{
    debug_assert_bounded_count, debug_assert_head_not_past_tail, debug_assert_monotonic,
};
use crate::{Backoff, Config, Full, QueueError, Stats, StatsSnapshot};
use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::sync::atomic::{AtomicU64, Ordering};

// =============================================================================
// SLOT SEQUENCE PROTOCOL
// =============================================================================
//
// Each slot carries a monotonic sequence counter; the two cursors hand out
// monotonic 64-bit tickets. For a ticket `t` addressing slot `t & mask`:
//
// - seq == t      : slot is writable by the producer holding ticket t
// - seq == t + 1  : slot is readable by the consumer holding ticket t
// - seq == t + N  : slot has been recycled for the producer one lap later
//
// Producers and consumers synchronize exclusively through the slot sequence:
// the Release store after writing or clearing a record pairs with the Acquire
// load before claiming, establishing the happens-before edge for the record
// transfer. The cursors only arbitrate same-role contention.
//
// The `seq - ticket` comparison is done in signed arithmetic: a negative
// difference means the slot's previous occupant has not been consumed yet
// (possibly full), a positive one means another thread already advanced past
// this ticket (pure contention, retry).
//
// Cursors are u64 and never wrap in practice: at 10^9 operations per second
// wrap takes over 500 years, so no wrap-around logic exists.
//
// =============================================================================

/// Single slot of the ring.
///
/// Aligned to a cache line so neighbouring slots never share one; `seq` is
/// touched by at most one producer and one consumer per lap.
#[repr(align(64))]
struct Slot<T> {
    seq: AtomicU64,
    record: UnsafeCell<MaybeUninit<T>>,
}

impl<T> Slot<T> {
    fn new(seq: u64) -> Self {
        Self {
            seq: AtomicU64::new(seq),
            record: UnsafeCell::new(MaybeUninit::uninit()),
        }
    }
}

/// Bounded lock-free MPMC FIFO for fixed-size records.
///
/// Any thread may call any operation concurrently; there are no baked-in
/// producer or consumer roles. Single-item operations are lock-free; batch
/// operations reserve multiple slots with one CAS and may spin on a
/// predecessor's publication.
///
/// # Example
///
/// ```
/// use packring::PacketQueue;
///
/// let queue = PacketQueue::new(3).unwrap();
/// assert_eq!(queue.capacity(), 4); // rounded up to a power of two
///
/// queue.enqueue(1u64).unwrap();
/// queue.enqueue(2u64).unwrap();
/// assert_eq!(queue.dequeue(), Some(1));
/// assert_eq!(queue.dequeue(), Some(2));
/// assert_eq!(queue.dequeue(), None);
/// ```
pub struct PacketQueue<T> {
    /// Enqueue cursor: the next producer ticket.
    tail: CacheAligned<AtomicU64>,
    /// Dequeue cursor: the next consumer ticket.
    head: CacheAligned<AtomicU64>,
    buffer: Box<[Slot<T>]>,
    mask: u64,
    enable_stats: bool,
    stats: Stats,
}

// Safety: slot access is coordinated by the sequence protocol; sharing the
// queue between threads moves records of T across threads.
unsafe impl<T: Send> Send for PacketQueue<T> {}
unsafe impl<T: Send> Sync for PacketQueue<T> {}

impl<T> std::fmt::Debug for PacketQueue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PacketQueue")
            .field("capacity", &self.buffer.len())
            .field("len", &self.len())
            .finish()
    }
}

impl<T> PacketQueue<T> {
    /// Creates a queue with the given capacity and stats disabled.
    ///
    /// The capacity is rounded up to a power of two, minimum 2. Returns
    /// [`QueueError::InvalidCapacity`] for 0 or for requests too large to
    /// round.
    pub fn new(capacity: usize) -> Result<Self, QueueError> {
        Self::with_config(Config::new(capacity))
    }

    /// Creates a queue with advisory stats collection enabled.
    pub fn with_stats(capacity: usize) -> Result<Self, QueueError> {
        Self::with_config(Config::new(capacity).stats(true))
    }

    /// Creates a queue from explicit construction parameters.
    pub fn with_config(config: Config) -> Result<Self, QueueError> {
        let capacity = config.rounded_capacity()?;

        let mut slots = Vec::with_capacity(capacity);
        for i in 0..capacity {
            slots.push(Slot::new(i as u64));
        }

        Ok(Self {
            tail: CacheAligned::new(AtomicU64::new(0)),
            head: CacheAligned::new(AtomicU64::new(0)),
            buffer: slots.into_boxed_slice(),
            mask: capacity as u64 - 1,
            enable_stats: config.enable_stats,
            stats: Stats::new(),
        })
    }

    #[inline]
    fn lap(&self) -> u64 {
        self.buffer.len() as u64
    }

    #[inline]
    fn slot(&self, ticket: u64) -> &Slot<T> {
        &self.buffer[(ticket & self.mask) as usize]
    }

    // ---------------------------------------------------------------------
    // SINGLE-ITEM OPERATIONS
    // ---------------------------------------------------------------------

    /// Enqueue a record, spinning through contention with adaptive backoff.
    ///
    /// Fails only when the queue is definitively full (`tail - head >=
    /// capacity` observed after the slot was found unrecycled); contention
    /// alone never produces a failure. The rejected record is handed back.
    pub fn enqueue(&self, record: T) -> Result<(), Full<T>> {
        if self.enable_stats {
            self.stats.record_enqueue_attempt();
        }

        let mut backoff = Backoff::new();
        let mut tail = self.tail.load(Ordering::Relaxed);

        loop {
            let slot = self.slot(tail);
            let seq = slot.seq.load(Ordering::Acquire);
            let diff = seq.wrapping_sub(tail) as i64;

            if diff == 0 {
                // Slot is writable for this ticket; claim it.
                match self.tail.compare_exchange_weak(
                    tail,
                    tail + 1,
                    Ordering::AcqRel,
                    Ordering::Relaxed,
                ) {
                    Ok(_) => {
                        // Safety: the CAS made this thread the sole holder of
                        // ticket `tail`; no other thread touches this slot
                        // until seq advances.
                        unsafe { (*slot.record.get()).write(record) };
                        slot.seq.store(tail + 1, Ordering::Release);

                        if self.enable_stats {
                            self.stats.record_enqueue_success();
                        }
                        return Ok(());
                    }
                    Err(current) => {
                        // Another producer took the ticket; it made progress.
                        tail = current;
                        backoff.reset();
                    }
                }
            } else if diff < 0 {
                // Slot not recycled since its last writer. Full, or a slow
                // consumer still holds the previous lap.
                let head = self.head.load(Ordering::Acquire);
                if tail.wrapping_sub(head) >= self.lap() {
                    return Err(Full(record));
                }

                if self.enable_stats {
                    self.stats.record_contention_event();
                }
                backoff.wait();
                tail = self.tail.load(Ordering::Relaxed);
            } else {
                // Another producer already advanced past this ticket.
                backoff.wait();
                tail = self.tail.load(Ordering::Relaxed);
            }
        }
    }

    /// Dequeue a record, spinning through contention with adaptive backoff.
    ///
    /// Returns `None` only when the queue is definitively empty (`head >=
    /// tail` observed after the slot was found unfilled).
    pub fn dequeue(&self) -> Option<T> {
        if self.enable_stats {
            self.stats.record_dequeue_attempt();
        }

        let mut backoff = Backoff::new();
        let mut head = self.head.load(Ordering::Relaxed);

        loop {
            let slot = self.slot(head);
            let seq = slot.seq.load(Ordering::Acquire);
            let diff = seq.wrapping_sub(head.wrapping_add(1)) as i64;

            if diff == 0 {
                // Slot holds a record for this ticket; claim it.
                match self.head.compare_exchange_weak(
                    head,
                    head + 1,
                    Ordering::AcqRel,
                    Ordering::Relaxed,
                ) {
                    Ok(_) => {
                        // Safety: the CAS made this thread the sole holder of
                        // ticket `head`; the Acquire load above synchronized
                        // with the producer's Release publication.
                        let record = unsafe { (*slot.record.get()).assume_init_read() };
                        // Recycle for the producer one lap later.
                        slot.seq.store(head + self.lap(), Ordering::Release);

                        if self.enable_stats {
                            self.stats.record_dequeue_success();
                        }
                        return Some(record);
                    }
                    Err(current) => {
                        head = current;
                        backoff.reset();
                    }
                }
            } else if diff < 0 {
                // Slot not filled for this ticket. Empty, or a slow producer
                // has reserved but not yet published.
                let tail = self.tail.load(Ordering::Acquire);
                if head >= tail {
                    return None;
                }

                if self.enable_stats {
                    self.stats.record_contention_event();
                }
                backoff.wait();
                head = self.head.load(Ordering::Relaxed);
            } else {
                // Another consumer already advanced past this ticket.
                backoff.wait();
                head = self.head.load(Ordering::Relaxed);
            }
        }
    }

    // ---------------------------------------------------------------------
    // NON-BLOCKING TRY VARIANTS
    // ---------------------------------------------------------------------

    /// Single-shot enqueue: one CAS, no backoff loop.
    ///
    /// May fail spuriously under contention even when the queue is not full.
    /// Callers needing the definitive full predicate must use [`enqueue`].
    ///
    /// [`enqueue`]: PacketQueue::enqueue
    pub fn try_enqueue(&self, record: T) -> Result<(), Full<T>> {
        let tail = self.tail.load(Ordering::Relaxed);
        let slot = self.slot(tail);
        let seq = slot.seq.load(Ordering::Acquire);

        if seq == tail
            && self
                .tail
                .compare_exchange(tail, tail + 1, Ordering::AcqRel, Ordering::Relaxed)
                .is_ok()
        {
            // Safety: same exclusivity argument as `enqueue`.
            unsafe { (*slot.record.get()).write(record) };
            slot.seq.store(tail + 1, Ordering::Release);
            return Ok(());
        }
        Err(Full(record))
    }

    /// Single-shot dequeue: one CAS, no backoff loop.
    ///
    /// May return `None` spuriously under contention even when records are
    /// available.
    pub fn try_dequeue(&self) -> Option<T> {
        let head = self.head.load(Ordering::Relaxed);
        let slot = self.slot(head);
        let seq = slot.seq.load(Ordering::Acquire);

        if seq == head.wrapping_add(1)
            && self
                .head
                .compare_exchange(head, head + 1, Ordering::AcqRel, Ordering::Relaxed)
                .is_ok()
        {
            // Safety: same exclusivity argument as `dequeue`.
            let record = unsafe { (*slot.record.get()).assume_init_read() };
            slot.seq.store(head + self.lap(), Ordering::Release);
            return Some(record);
        }
        None
    }

    // ---------------------------------------------------------------------
    // BATCH OPERATIONS
    // ---------------------------------------------------------------------

    /// Enqueue a slice of records, amortising cursor contention over one CAS
    /// per reservation.
    ///
    /// Returns the number of records actually placed, which is less than
    /// `records.len()` when the queue fills up. Publication is per-slot and
    /// in ticket order, so a concurrent consumer sees records in strictly
    /// increasing ticket order.
    pub fn enqueue_batch(&self, records: &[T]) -> usize
    where
        T: Clone,
    {
        if records.is_empty() {
            return 0;
        }
        if self.enable_stats {
            self.stats.record_batch_enqueue();
        }

        let mut enqueued = 0;
        let mut backoff = Backoff::new();

        while enqueued < records.len() {
            let tail = self.tail.load(Ordering::Acquire);
            let head = self.head.load(Ordering::Acquire);

            let in_flight = tail.wrapping_sub(head);
            if in_flight >= self.lap() {
                break; // full
            }

            let free = (self.lap() - in_flight) as usize;
            let batch = free.min(records.len() - enqueued);
            debug_assert_bounded_count!(in_flight as usize + batch, self.buffer.len());

            match self.tail.compare_exchange_weak(
                tail,
                tail + batch as u64,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    debug_assert_monotonic!("enqueue", tail, tail + batch as u64);
                    for i in 0..batch {
                        let ticket = tail + i as u64;
                        let slot = self.slot(ticket);

                        // A batch reservation can run ahead of slot recycling
                        // by late consumers from the previous lap; wait for
                        // this slot's turn to come around.
                        let mut wait = Backoff::new();
                        while slot.seq.load(Ordering::Acquire) != ticket {
                            wait.wait();
                        }

                        // Safety: seq == ticket makes this thread the slot's
                        // sole writer for this lap.
                        unsafe { (*slot.record.get()).write(records[enqueued + i].clone()) };
                        slot.seq.store(ticket + 1, Ordering::Release);
                    }
                    enqueued += batch;
                    backoff.reset();
                }
                Err(_) => backoff.wait(),
            }
        }
        enqueued
    }

    /// Dequeue up to `out.len()` records into `out`, amortising cursor
    /// contention over one CAS per reservation.
    ///
    /// Returns the number of records written to the front of `out`, which is
    /// less than `out.len()` when the queue runs dry.
    pub fn dequeue_batch(&self, out: &mut [T]) -> usize {
        if out.is_empty() {
            return 0;
        }
        if self.enable_stats {
            self.stats.record_batch_dequeue();
        }

        let mut dequeued = 0;
        let mut backoff = Backoff::new();

        while dequeued < out.len() {
            let head = self.head.load(Ordering::Acquire);
            let tail = self.tail.load(Ordering::Acquire);

            if head >= tail {
                break; // empty
            }

            let available = tail.wrapping_sub(head) as usize;
            let batch = available.min(out.len() - dequeued);
            debug_assert_head_not_past_tail!(head + batch as u64, tail);

            match self.head.compare_exchange_weak(
                head,
                head + batch as u64,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    for i in 0..batch {
                        let ticket = head + i as u64;
                        let slot = self.slot(ticket);

                        // The reservation may outrun a producer that claimed
                        // this ticket but has not published yet.
                        let mut wait = Backoff::new();
                        while slot.seq.load(Ordering::Acquire) != ticket.wrapping_add(1) {
                            wait.wait();
                        }

                        // Safety: seq == ticket + 1 makes this thread the
                        // slot's sole reader for this lap.
                        out[dequeued + i] = unsafe { (*slot.record.get()).assume_init_read() };
                        slot.seq.store(ticket + self.lap(), Ordering::Release);
                    }
                    dequeued += batch;
                    backoff.reset();
                }
                Err(_) => backoff.wait(),
            }
        }
        dequeued
    }

    // ---------------------------------------------------------------------
    // OBSERVERS
    // ---------------------------------------------------------------------

    /// Capacity after power-of-two rounding.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Advisory record count.
    ///
    /// Computed from two separate cursor loads; under concurrent updates the
    /// result may transiently exceed `capacity()`. Callers that need a value
    /// in `[0, capacity]` must clamp.
    #[inline]
    pub fn len(&self) -> usize {
        let tail = self.tail.load(Ordering::Acquire);
        let head = self.head.load(Ordering::Acquire);
        tail.wrapping_sub(head) as usize
    }

    /// Advisory emptiness check, derived from [`len`](PacketQueue::len).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Advisory fullness check, derived from [`len`](PacketQueue::len).
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len() >= self.capacity()
    }

    /// Bytes held by the queue header and the slot array.
    pub fn memory_usage(&self) -> usize {
        std::mem::size_of::<Self>() + self.buffer.len() * std::mem::size_of::<Slot<T>>()
    }

    /// Snapshot of the advisory counters; all zero when stats are disabled.
    pub fn stats(&self) -> StatsSnapshot {
        if self.enable_stats {
            self.stats.snapshot()
        } else {
            StatsSnapshot::default()
        }
    }

    /// Zero every advisory counter.
    pub fn reset_stats(&self) {
        self.stats.reset();
    }
}

impl<T> Drop for PacketQueue<T> {
    fn drop(&mut self) {
        // Exclusive access: every ticket in [head, tail) holds an initialized
        // record that was never consumed.
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Relaxed);

        let mut pos = head;
        while pos != tail {
            let slot = &self.buffer[(pos & self.mask) as usize];
            unsafe {
                (*slot.record.get()).assume_init_drop();
            }
            pos = pos.wrapping_add(1);
        }
    }
}

// ---------------------------------------------------------------------
// HELPER: cache-aligned cursor wrapper
// ---------------------------------------------------------------------

/// 128-byte alignment keeps the two cursors off each other's cache lines and
/// out of reach of adjacent-line prefetchers.
#[repr(align(128))]
struct CacheAligned<T> {
    value: T,
}

impl<T> CacheAligned<T> {
    const fn new(value: T) -> Self {
        Self { value }
    }
}

impl<T> std::ops::Deref for CacheAligned<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}
