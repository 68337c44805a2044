pub mod cancel;
pub mod config;
pub mod count;
pub mod errors;
pub mod metrics;
pub mod results;

pub use cancel::CancellationToken;
pub use config::{CountConfig, CountSettings, SettingsOverrides};
pub use count::{count_words, FileProcessor};
pub use errors::{CountError, CountResult};
pub use results::{CountSummary, FileCount, Job};
