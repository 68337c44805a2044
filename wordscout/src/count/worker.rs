use crossbeam::channel::{select, Receiver, Sender};
use crossbeam::sync::WaitGroup;
use tracing::{debug, trace, warn};

use super::scanner::LineScanner;
use crate::cancel::CancellationToken;
use crate::results::{FileCount, Job};

/// Drains the job queue, publishing one [`FileCount`] per job it takes
#[derive(Debug, Clone)]
pub struct Worker {
    id: usize,
    scanner: LineScanner,
}

impl Worker {
    pub fn new(id: usize, scanner: LineScanner) -> Self {
        Self { id, scanner }
    }

    /// Runs until the queue is closed and empty, or until `cancel` fires.
    ///
    /// Jobs still queued when cancellation is observed are left untouched and
    /// produce no result. `done` is released when this returns, whichever way
    /// the loop ended.
    pub fn run(
        &self,
        jobs: Receiver<Job>,
        results: Sender<FileCount>,
        cancel: CancellationToken,
        done: WaitGroup,
    ) {
        debug!("Worker {} started", self.id);
        let metrics = self.scanner.metrics();

        loop {
            if cancel.is_cancelled() {
                warn!(
                    "Worker {} shutting down gracefully due to cancellation",
                    self.id
                );
                break;
            }

            select! {
                recv(jobs) -> job => {
                    let Ok(job) = job else {
                        debug!("Worker {} found the job queue drained", self.id);
                        break;
                    };
                    metrics.record_dequeued();
                    trace!("Worker {} picked up {}", self.id, job.path.display());

                    let file_count = self.scanner.scan(&job, &cancel);
                    metrics.record_outcome(file_count.is_success(), file_count.is_cancelled());
                    if let Some(e) = file_count.error() {
                        if !e.is_cancelled() {
                            warn!("Failed to count words in {}: {}", job.path.display(), e);
                        }
                    }

                    if results.send(file_count).is_err() {
                        warn!("Worker {} lost its result channel, stopping", self.id);
                        break;
                    }
                }
                recv(cancel.receiver()) -> _ => {
                    warn!(
                        "Worker {} shutting down gracefully due to cancellation",
                        self.id
                    );
                    break;
                }
            }
        }

        debug!("Worker {} finished", self.id);
        drop(done);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CountError;
    use crossbeam::channel;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_worker_drains_queue() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        fs::write(&a, "go go\n").unwrap();
        fs::write(&b, "stop\n").unwrap();

        let (job_tx, job_rx) = channel::bounded(3);
        let (result_tx, result_rx) = channel::bounded(3);
        job_tx.send(Job::new(&a, "go")).unwrap();
        job_tx.send(Job::new(&b, "go")).unwrap();
        job_tx.send(Job::new(dir.path().join("missing.txt"), "go")).unwrap();
        drop(job_tx);

        let done = WaitGroup::new();
        Worker::new(0, LineScanner::default()).run(
            job_rx,
            result_tx,
            CancellationToken::new(),
            done.clone(),
        );
        done.wait();

        let results: Vec<FileCount> = result_rx.iter().collect();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].outcome.as_ref().unwrap(), &2);
        assert_eq!(results[1].outcome.as_ref().unwrap(), &0);
        assert!(matches!(results[2].outcome, Err(CountError::FileNotFound(_))));
    }

    #[test]
    fn test_worker_stops_on_cancellation_without_results() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.txt");
        fs::write(&a, "go\n").unwrap();

        let (job_tx, job_rx) = channel::bounded(2);
        let (result_tx, result_rx) = channel::bounded(2);
        job_tx.send(Job::new(&a, "go")).unwrap();
        job_tx.send(Job::new(&a, "go")).unwrap();

        let cancel = CancellationToken::new();
        cancel.cancel();

        let scanner = LineScanner::default();
        Worker::new(1, scanner.clone()).run(job_rx, result_tx, cancel, WaitGroup::new());

        // Queued jobs are dropped, not reported
        assert_eq!(result_rx.iter().count(), 0);
        assert_eq!(scanner.metrics().get_stats().jobs_dequeued, 0);
        assert_eq!(job_tx.len(), 2);
    }

    #[test]
    fn test_worker_wakes_on_cancellation_while_idle() {
        let (_job_tx, job_rx) = channel::bounded::<Job>(1);
        let (result_tx, result_rx) = channel::bounded(1);
        let cancel = CancellationToken::new();
        let done = WaitGroup::new();

        let worker = Worker::new(2, LineScanner::default());
        let worker_cancel = cancel.clone();
        let worker_done = done.clone();
        let handle = std::thread::spawn(move || {
            worker.run(job_rx, result_tx, worker_cancel, worker_done);
        });

        cancel.cancel();
        done.wait();
        handle.join().unwrap();
        assert_eq!(result_rx.iter().count(), 0);
    }
}
