use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::info;

/// Tracks job and scanning counters, shared by all workers.
///
/// Counters only grow. Take a [`RunStats`] snapshot before a run and use
/// [`RunStats::since`] to get the figures for that run alone.
#[derive(Debug, Clone)]
pub struct RunMetrics {
    // Job lifecycle
    jobs_dequeued: Arc<AtomicU64>,
    jobs_completed: Arc<AtomicU64>,
    jobs_failed: Arc<AtomicU64>,
    jobs_cancelled: Arc<AtomicU64>,

    // Scanning volume
    lines_scanned: Arc<AtomicU64>,
    bytes_scanned: Arc<AtomicU64>,
}

impl RunMetrics {
    /// Creates a new RunMetrics instance
    pub fn new() -> Self {
        Self {
            jobs_dequeued: Arc::new(AtomicU64::new(0)),
            jobs_completed: Arc::new(AtomicU64::new(0)),
            jobs_failed: Arc::new(AtomicU64::new(0)),
            jobs_cancelled: Arc::new(AtomicU64::new(0)),
            lines_scanned: Arc::new(AtomicU64::new(0)),
            bytes_scanned: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Records a job taken off the queue by a worker
    pub fn record_dequeued(&self) {
        self.jobs_dequeued.fetch_add(1, Ordering::Relaxed);
    }

    /// Records the terminal state of a dequeued job
    pub fn record_outcome(&self, success: bool, cancelled: bool) {
        let counter = if success {
            &self.jobs_completed
        } else if cancelled {
            &self.jobs_cancelled
        } else {
            &self.jobs_failed
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Records one scanned line of `bytes` length
    pub fn record_line(&self, bytes: u64) {
        self.lines_scanned.fetch_add(1, Ordering::Relaxed);
        self.bytes_scanned.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Gets a snapshot of the counters
    pub fn get_stats(&self) -> RunStats {
        RunStats {
            jobs_dequeued: self.jobs_dequeued.load(Ordering::Relaxed),
            jobs_completed: self.jobs_completed.load(Ordering::Relaxed),
            jobs_failed: self.jobs_failed.load(Ordering::Relaxed),
            jobs_cancelled: self.jobs_cancelled.load(Ordering::Relaxed),
            lines_scanned: self.lines_scanned.load(Ordering::Relaxed),
            bytes_scanned: self.bytes_scanned.load(Ordering::Relaxed),
        }
    }
}

impl Default for RunMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time copy of [`RunMetrics`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub jobs_dequeued: u64,
    pub jobs_completed: u64,
    pub jobs_failed: u64,
    pub jobs_cancelled: u64,
    pub lines_scanned: u64,
    pub bytes_scanned: u64,
}

impl RunStats {
    /// Counters accumulated between `earlier` and this snapshot
    pub fn since(&self, earlier: &RunStats) -> RunStats {
        RunStats {
            jobs_dequeued: self.jobs_dequeued.saturating_sub(earlier.jobs_dequeued),
            jobs_completed: self.jobs_completed.saturating_sub(earlier.jobs_completed),
            jobs_failed: self.jobs_failed.saturating_sub(earlier.jobs_failed),
            jobs_cancelled: self.jobs_cancelled.saturating_sub(earlier.jobs_cancelled),
            lines_scanned: self.lines_scanned.saturating_sub(earlier.lines_scanned),
            bytes_scanned: self.bytes_scanned.saturating_sub(earlier.bytes_scanned),
        }
    }

    /// Logs the counters
    pub fn log(&self) {
        info!(
            "Run stats:\n\
             Jobs dequeued: {}\n\
             Jobs completed/failed/cancelled: {}/{}/{}\n\
             Lines scanned: {}\n\
             Bytes scanned: {}",
            self.jobs_dequeued,
            self.jobs_completed,
            self.jobs_failed,
            self.jobs_cancelled,
            self.lines_scanned,
            self.bytes_scanned
        );
    }
}
