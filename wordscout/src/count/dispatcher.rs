use crossbeam::channel::{self, Receiver};
use crossbeam::sync::WaitGroup;
use std::thread;
use tracing::{debug, info};

use super::scanner::LineScanner;
use super::worker::Worker;
use crate::cancel::CancellationToken;
use crate::config::CountConfig;
use crate::errors::{CountError, CountResult};
use crate::metrics::RunMetrics;
use crate::results::{FileCount, Job};

/// Owns the job queue and result channel for counting runs over one
/// validated configuration
#[derive(Debug)]
pub struct FileProcessor {
    config: CountConfig,
    metrics: RunMetrics,
}

impl FileProcessor {
    pub fn new(config: CountConfig) -> Self {
        Self {
            config,
            metrics: RunMetrics::new(),
        }
    }

    pub fn config(&self) -> &CountConfig {
        &self.config
    }

    /// Counters accumulated over every run of this processor. They are
    /// updated live, so they can be watched while a run is in progress.
    pub fn metrics(&self) -> &RunMetrics {
        &self.metrics
    }

    /// Counts the configured word in every configured file.
    ///
    /// Spawns `worker_count` workers, enqueues one job per file in input
    /// order, closes the queue and blocks until every worker has exited. The
    /// returned receiver is already closed: draining it yields each result
    /// once, in completion order, and then ends.
    ///
    /// Without cancellation there is exactly one result per file. After
    /// cancellation, jobs that no worker had picked up yet produce nothing.
    ///
    /// Failing to spawn a worker thread is the one run-level error: it is
    /// returned before any job is queued, and workers already started exit
    /// on the closed queue.
    pub fn process_files(&self, cancel: &CancellationToken) -> CountResult<Receiver<FileCount>> {
        let files = self.config.files();
        let word = self.config.word();
        let worker_count = self.config.worker_count().get();
        let before = self.metrics.get_stats();

        info!(
            "Counting '{}' in {} files with {} workers",
            word,
            files.len(),
            worker_count
        );

        // Sized so that neither the dispatcher nor the workers block on send
        let (job_tx, job_rx) = channel::bounded::<Job>(files.len());
        let (result_tx, result_rx) = channel::bounded::<FileCount>(files.len());
        let done = WaitGroup::new();

        for id in 0..worker_count {
            let worker = Worker::new(id, LineScanner::new(self.metrics.clone()));
            let jobs = job_rx.clone();
            let results = result_tx.clone();
            let cancel = cancel.clone();
            let done = done.clone();

            thread::Builder::new()
                .name(format!("wordscout-worker-{}", id))
                .spawn(move || worker.run(jobs, results, cancel, done))
                .map_err(CountError::WorkerSpawn)?;
        }

        for path in files {
            if job_tx.send(Job::new(path, word)).is_err() {
                debug!("Job queue closed early, {} not queued", path.display());
                break;
            }
        }
        // No more jobs: workers exit once the queue is empty
        drop(job_tx);
        drop(job_rx);

        done.wait();
        debug!("All {} workers finished", worker_count);

        // End of stream for the consumer
        drop(result_tx);

        self.metrics.get_stats().since(&before).log();
        info!("Count complete. {} results ready", result_rx.len());

        Ok(result_rx)
    }
}
