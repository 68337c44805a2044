//! The counting pipeline.
//!
//! ```text
//! CountConfig -> FileProcessor -> job queue -> Worker x N -> LineScanner
//!                                                  |
//!                     consumer <- result channel <-+
//! ```
//!
//! [`FileProcessor`] owns both channels for the duration of one run. Each
//! [`Worker`] runs on its own thread and `select!`s between the job queue and
//! the cancellation token; the [`LineScanner`] polls the token between lines.
//! Cancellation is therefore observed at job and line granularity only: a
//! line that is being counted is always finished.
pub mod dispatcher;
pub mod engine;
pub mod scanner;
pub mod worker;

pub use dispatcher::FileProcessor;
pub use engine::count_words;
pub use scanner::{count_occurrences, LineScanner};
pub use worker::Worker;
