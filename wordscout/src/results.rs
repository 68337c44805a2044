//! Result types produced by a counting run.
//!
//! A [`Job`] is created per input path and consumed by exactly one worker.
//! Every dispatched job yields exactly one [`FileCount`]; ownership of that
//! value moves through the result channel to whoever drains it.
//! [`CountSummary`] is an optional aggregate for consumers that want totals.
use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::errors::{CountError, CountResult};

/// A unit of work: one file and the word to count in it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub path: PathBuf,
    pub word: String,
}

impl Job {
    pub fn new(path: impl Into<PathBuf>, word: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            word: word.into(),
        }
    }
}

/// Outcome of processing one [`Job`]
#[derive(Debug)]
pub struct FileCount {
    /// The path from the job, used to correlate results with inputs
    pub path: PathBuf,
    /// The number of occurrences, or the error that stopped the scan
    pub outcome: CountResult<usize>,
}

impl FileCount {
    pub fn counted(path: impl Into<PathBuf>, word_count: usize) -> Self {
        Self {
            path: path.into(),
            outcome: Ok(word_count),
        }
    }

    pub fn failed(path: impl Into<PathBuf>, error: CountError) -> Self {
        Self {
            path: path.into(),
            outcome: Err(error),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Occurrences found, zero when the job failed
    pub fn word_count(&self) -> usize {
        self.outcome.as_ref().copied().unwrap_or(0)
    }

    pub fn error(&self) -> Option<&CountError> {
        self.outcome.as_ref().err()
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn is_cancelled(&self) -> bool {
        self.error().is_some_and(CountError::is_cancelled)
    }
}

impl Serialize for FileCount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("FileCount", 3)?;
        state.serialize_field("path", &self.path)?;
        state.serialize_field("word_count", &self.word_count())?;
        state.serialize_field("error", &self.error().map(|e| e.to_string()))?;
        state.end()
    }
}

/// Aggregate of every [`FileCount`] received from one run
#[derive(Debug, Default, Serialize)]
pub struct CountSummary {
    /// Results in arrival order
    pub file_counts: Vec<FileCount>,
    /// Sum of word counts over successful files
    pub total_words: usize,
    /// Number of files counted without error
    pub files_counted: usize,
    /// Number of files whose scan failed for a reason other than cancellation
    pub files_failed: usize,
    /// Number of in-flight files interrupted by cancellation
    pub files_cancelled: usize,
}

impl CountSummary {
    pub fn new() -> Self {
        Default::default()
    }

    /// Adds a file result to the summary
    pub fn add_file_count(&mut self, file_count: FileCount) {
        match &file_count.outcome {
            Ok(count) => {
                self.total_words += count;
                self.files_counted += 1;
            }
            Err(e) if e.is_cancelled() => self.files_cancelled += 1,
            Err(_) => self.files_failed += 1,
        }
        self.file_counts.push(file_count);
    }

    /// Number of results received, whatever their outcome
    pub fn files_reported(&self) -> usize {
        self.file_counts.len()
    }

    /// Results ordered by path, for output that does not depend on scheduling
    pub fn sorted_by_path(&self) -> Vec<&FileCount> {
        let mut sorted: Vec<&FileCount> = self.file_counts.iter().collect();
        sorted.sort_by(|a, b| a.path.cmp(&b.path));
        sorted
    }
}

impl FromIterator<FileCount> for CountSummary {
    fn from_iter<I: IntoIterator<Item = FileCount>>(iter: I) -> Self {
        let mut summary = CountSummary::new();
        for file_count in iter {
            summary.add_file_count(file_count);
        }
        summary
    }
}
