//! Lock-Free Ring Buffer for Pose Capture
//!
//! SPSC (Single Producer, Single Consumer) hand-off between the detection
//! callback and whichever thread owns the [`PoseRecorder`](crate::recorder::PoseRecorder).
//!
//! Architecture:
//! - Producer (detection callback): Never blocks, fires at the camera/model cadence
//! - Consumer (recorder owner): Drains in batches and feeds the recorder in order
//!
//! The core ring buffer is the `rtrb` crate; this module adds sequence
//! numbering and occupancy statistics.

use super::types::RawPose;
use rtrb::{Consumer, Producer, RingBuffer};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Default ring buffer capacity (must be power of 2)
pub const DEFAULT_CAPACITY: usize = 1024;

/// A pose in flight, tagged with its arrival order
#[derive(Debug, Clone)]
pub struct PoseSlot {
    pub pose: RawPose,
    pub sequence: u64,
}

/// Lock-free ring buffer for raw poses
pub struct PoseRingBuffer {
    producer: Producer<PoseSlot>,
    consumer: Consumer<PoseSlot>,
    stats: Arc<RingBufferStats>,
    capacity: usize,
}

/// Ring buffer statistics for monitoring
#[derive(Debug, Default)]
pub struct RingBufferStats {
    /// Total poses pushed
    pub poses_pushed: AtomicU64,
    /// Poses dropped due to full buffer
    pub poses_dropped: AtomicU64,
    /// Poses successfully consumed
    pub poses_consumed: AtomicU64,
    /// Peak buffer occupancy
    pub peak_occupancy: AtomicU64,
}

impl PoseRingBuffer {
    /// Create a new ring buffer with default capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a new ring buffer with specified capacity
    ///
    /// # Panics
    /// Panics if capacity is not a power of 2
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(
            capacity.is_power_of_two(),
            "Ring buffer capacity must be a power of 2"
        );

        let (producer, consumer) = RingBuffer::new(capacity);

        Self {
            producer,
            consumer,
            stats: Arc::new(RingBufferStats::default()),
            capacity,
        }
    }

    /// Split into the producer half (detection side) and consumer half
    /// (recorder side).
    pub fn split(self) -> (PoseProducer, PoseConsumer) {
        (
            PoseProducer {
                inner: self.producer,
                sequence: 0,
                stats: Arc::clone(&self.stats),
                capacity: self.capacity,
            },
            PoseConsumer {
                inner: self.consumer,
                stats: self.stats,
            },
        )
    }

    /// Get statistics
    pub fn stats(&self) -> Arc<RingBufferStats> {
        Arc::clone(&self.stats)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for PoseRingBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Producer half of the ring buffer (detection thread)
pub struct PoseProducer {
    inner: Producer<PoseSlot>,
    sequence: u64,
    stats: Arc<RingBufferStats>,
    capacity: usize,
}

impl PoseProducer {
    /// Push a pose. Never blocks; a full buffer drops the pose and bumps the
    /// drop counter.
    ///
    /// Returns true if the pose was pushed, false if dropped.
    #[inline]
    pub fn push(&mut self, pose: RawPose) -> bool {
        match self.try_push(pose) {
            Ok(_) => true,
            Err(_) => {
                self.stats.poses_dropped.fetch_add(1, Ordering::Relaxed);
                false
            }
        }
    }

    /// Push a pose, handing it back when the buffer is full so the caller can
    /// retry instead of losing it. A rejected push leaves the stats untouched.
    #[inline]
    pub fn try_push(&mut self, pose: RawPose) -> Result<u64, RawPose> {
        let sequence = self.sequence;
        match self.inner.push(PoseSlot { pose, sequence }) {
            Ok(()) => {
                self.sequence += 1;
                self.stats.poses_pushed.fetch_add(1, Ordering::Relaxed);
                self.record_occupancy();
                Ok(sequence)
            }
            Err(rtrb::PushError::Full(slot)) => Err(slot.pose),
        }
    }

    fn record_occupancy(&self) {
        let occupied = (self.capacity - self.inner.slots()) as u64;
        let mut peak = self.stats.peak_occupancy.load(Ordering::Relaxed);
        while occupied > peak {
            match self.stats.peak_occupancy.compare_exchange_weak(
                peak,
                occupied,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(p) => peak = p,
            }
        }
    }

    /// Free slots
    #[inline]
    pub fn available_slots(&self) -> usize {
        self.inner.slots()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.inner.is_full()
    }

    /// Next sequence number to be assigned
    #[inline]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

/// Consumer half of the ring buffer (recorder thread)
pub struct PoseConsumer {
    inner: Consumer<PoseSlot>,
    stats: Arc<RingBufferStats>,
}

impl PoseConsumer {
    #[inline]
    pub fn pop(&mut self) -> Option<PoseSlot> {
        match self.inner.pop() {
            Ok(slot) => {
                self.stats.poses_consumed.fetch_add(1, Ordering::Relaxed);
                Some(slot)
            }
            Err(_) => None,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Number of poses waiting
    #[inline]
    pub fn available(&self) -> usize {
        self.inner.slots()
    }

    /// Pop up to `max_count` poses in arrival order
    pub fn pop_batch(&mut self, max_count: usize) -> Vec<PoseSlot> {
        let mut batch = Vec::with_capacity(max_count.min(self.available()));
        while batch.len() < max_count {
            match self.pop() {
                Some(slot) => batch.push(slot),
                None => break,
            }
        }
        batch
    }
}
