//! packring - Lock-free bounded MPMC ring for packet-processing pipelines.
//!
//! A bounded multi-producer multi-consumer FIFO for fixed-size records,
//! coordinated entirely by per-slot sequence counters and two shared cursors.
//! Built for receive rings, work distribution among worker cores, and
//! inter-stage hand-off where per-operation latency must stay below a
//! microsecond under contention.
//!
//! # Key Features
//!
//! - Ticket-based slot sequence protocol: producers and consumers never hold
//!   a lock and never block each other through the cursors
//! - Single-CAS batch reservation amortising cursor contention over many slots
//! - Adaptive backoff (spin with PAUSE → yield → microsecond sleep)
//! - Cache-line-aligned slots, cache-line-isolated cursors
//! - Advisory operation counters, opt-in per queue at construction
//!
//! # Example
//!
//! ```
//! use packring::{Packet, PacketQueue};
//!
//! let queue = PacketQueue::new(1024).unwrap();
//!
//! queue.enqueue(Packet::with_id(7)).unwrap();
//! let packet = queue.dequeue().unwrap();
//! assert_eq!(packet.id, 7);
//!
//! // Batch hand-off
//! let burst: Vec<Packet> = (0..64).map(Packet::with_id).collect();
//! assert_eq!(queue.enqueue_batch(&burst), 64);
//!
//! let mut out = vec![Packet::default(); 64];
//! assert_eq!(queue.dequeue_batch(&mut out), 64);
//! assert_eq!(out[0].id, 0);
//! ```

mod backoff;
mod config;
mod error;
mod invariants;
mod metrics;
mod packet;
mod queue;

pub use backoff::Backoff;
pub use config::{Config, HIGH_THROUGHPUT_CONFIG, LOW_LATENCY_CONFIG};
pub use error::{Full, QueueError};
pub use metrics::{Stats, StatsSnapshot};
pub use packet::{Packet, PacketPriority};
pub use queue::PacketQueue;
