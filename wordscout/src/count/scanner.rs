use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::trace;

use crate::cancel::CancellationToken;
use crate::errors::CountError;
use crate::metrics::RunMetrics;
use crate::results::{FileCount, Job};

const BUFFER_CAPACITY: usize = 65536;
const LINE_CAPACITY: usize = 256;

/// Counts non-overlapping, case-sensitive occurrences of `word` in `line`.
/// Word boundaries are not considered: "cat" is found in "category".
pub fn count_occurrences(line: &str, word: &str) -> usize {
    if word.is_empty() {
        return 0;
    }
    line.matches(word).count()
}

/// Reads one file line by line and totals the occurrences of a word
#[derive(Debug, Clone, Default)]
pub struct LineScanner {
    metrics: RunMetrics,
}

impl LineScanner {
    pub fn new(metrics: RunMetrics) -> Self {
        Self { metrics }
    }

    pub fn metrics(&self) -> &RunMetrics {
        &self.metrics
    }

    /// Scans the file named by `job`.
    ///
    /// The cancellation token is polled once per line, before the line is
    /// counted. A cancelled or failed scan reports its error with no count;
    /// whatever was accumulated up to that point is discarded.
    pub fn scan(&self, job: &Job, cancel: &CancellationToken) -> FileCount {
        self.count_word(&job.path, &job.word, cancel)
    }

    pub fn count_word(&self, path: &Path, word: &str, cancel: &CancellationToken) -> FileCount {
        trace!("Scanning file: {}", path.display());

        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) => return FileCount::failed(path, CountError::open_failed(path, e)),
        };

        // The reader owns the handle, so it is closed on every return below.
        let mut reader = BufReader::with_capacity(BUFFER_CAPACITY, file);
        let mut line = Vec::with_capacity(LINE_CAPACITY);
        let mut word_count = 0;

        loop {
            line.clear();
            match reader.read_until(b'\n', &mut line) {
                Ok(0) => break,
                Ok(read) => self.metrics.record_line(read as u64),
                Err(e) => return FileCount::failed(path, CountError::scan_failed(path, e)),
            }

            if cancel.is_cancelled() {
                trace!("Scan of {} cancelled", path.display());
                return FileCount::failed(path, CountError::Cancelled);
            }

            let text = String::from_utf8_lossy(trim_line_ending(&line));
            word_count += count_occurrences(&text, word);
        }

        trace!("Counted {} occurrences in {}", word_count, path.display());
        FileCount::counted(path, word_count)
    }
}

fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
