//! Real-time-safe render statistics.
//!
//! On the render path only the `add_*`/`note_*` methods and the scoped
//! [`BlockTimer`] are used; those touch atomics and the `quanta` clock
//! only. Snapshotting reads the atomics from a control context and is not
//! meant for the render thread.

use std::sync::atomic::{AtomicU64, Ordering};

use quanta::{Clock, Instant};

/// Point-in-time view of the counters, for logging/telemetry.
#[derive(Debug, Clone)]
pub struct StatsSnapshot {
    /// Render quanta completed.
    pub blocks_rendered: u64,
    /// Frames written across all blocks.
    pub frames_processed: u64,
    /// Control messages displaced by newer ones on queue overflow.
    pub displaced_messages: u64,
    /// Shortest block duration observed (ns).
    pub min_block_nanos: Option<u64>,
    /// Longest block duration observed (ns).
    pub max_block_nanos: Option<u64>,
    /// EMA of block duration (ns).
    pub ema_block_nanos: f64,
}

/// Atomics-only monitor shared between the renderer and its handle.
pub struct RenderStats {
    clock: Clock,

    blocks_rendered: AtomicU64,
    frames_processed: AtomicU64,
    displaced_messages: AtomicU64,

    // u64::MAX / 0 mean "nothing recorded yet"
    min_block_nanos: AtomicU64,
    max_block_nanos: AtomicU64,
    /// EMA of block duration stored as f64 bits.
    ema_block_bits: AtomicU64,
    ema_alpha: f64,
}

impl RenderStats {
    pub fn new() -> Self {
        Self {
            clock: Clock::new(),
            blocks_rendered: AtomicU64::new(0),
            frames_processed: AtomicU64::new(0),
            displaced_messages: AtomicU64::new(0),
            min_block_nanos: AtomicU64::new(u64::MAX),
            max_block_nanos: AtomicU64::new(0),
            ema_block_bits: AtomicU64::new(0f64.to_bits()),
            ema_alpha: 0.05,
        }
    }

    /// Record one completed block of `frames` frames.
    pub(crate) fn add_block(&self, frames: u64) {
        self.blocks_rendered.fetch_add(1, Ordering::Relaxed);
        self.frames_processed.fetch_add(frames, Ordering::Relaxed);
    }

    /// Record a control message lost to queue overflow.
    pub(crate) fn note_displaced(&self) {
        self.displaced_messages.fetch_add(1, Ordering::Relaxed);
    }

    /// Time the enclosing block; duration is recorded when the guard drops.
    pub(crate) fn block_timer(&self) -> BlockTimer<'_> {
        BlockTimer {
            stats: self,
            start: self.clock.now(),
        }
    }

    fn record_block_nanos(&self, nanos: u64) {
        self.min_block_nanos.fetch_min(nanos, Ordering::Relaxed);
        self.max_block_nanos.fetch_max(nanos, Ordering::Relaxed);

        // Single writer (the render thread), so load + store is enough.
        let prev = f64::from_bits(self.ema_block_bits.load(Ordering::Relaxed));
        let next = prev + self.ema_alpha * (nanos as f64 - prev);
        self.ema_block_bits.store(next.to_bits(), Ordering::Relaxed);
    }

    /// Read the counters. Not real-time safe; call from a control context.
    pub fn snapshot(&self) -> StatsSnapshot {
        let min = self.min_block_nanos.load(Ordering::Relaxed);
        let max = self.max_block_nanos.load(Ordering::Relaxed);
        StatsSnapshot {
            blocks_rendered: self.blocks_rendered.load(Ordering::Relaxed),
            frames_processed: self.frames_processed.load(Ordering::Relaxed),
            displaced_messages: self.displaced_messages.load(Ordering::Relaxed),
            min_block_nanos: (min != u64::MAX).then_some(min),
            max_block_nanos: (max != 0).then_some(max),
            ema_block_nanos: f64::from_bits(self.ema_block_bits.load(Ordering::Relaxed)),
        }
    }
}

impl Default for RenderStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Guard returned by [`RenderStats::block_timer`].
pub(crate) struct BlockTimer<'a> {
    stats: &'a RenderStats,
    start: Instant,
}

impl Drop for BlockTimer<'_> {
    fn drop(&mut self) {
        let elapsed = self.stats.clock.now().duration_since(self.start);
        self.stats.record_block_nanos(elapsed.as_nanos() as u64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        let stats = RenderStats::new();
        stats.add_block(128);
        stats.add_block(128);
        stats.note_displaced();

        let snap = stats.snapshot();
        assert_eq!(snap.blocks_rendered, 2);
        assert_eq!(snap.frames_processed, 256);
        assert_eq!(snap.displaced_messages, 1);
    }

    #[test]
    fn test_empty_snapshot_has_no_timings() {
        let snap = RenderStats::new().snapshot();
        assert_eq!(snap.min_block_nanos, None);
        assert_eq!(snap.max_block_nanos, None);
    }

    #[test]
    fn test_block_timer_records_duration() {
        let stats = RenderStats::new();
        {
            let _timer = stats.block_timer();
            std::hint::black_box((0..1000).sum::<u64>());
        }

        let snap = stats.snapshot();
        assert!(snap.min_block_nanos.is_some());
        assert!(snap.max_block_nanos.unwrap() >= snap.min_block_nanos.unwrap());
        assert!(snap.ema_block_nanos > 0.0);
    }
}
