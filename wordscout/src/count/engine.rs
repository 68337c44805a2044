use tracing::info;

use super::dispatcher::FileProcessor;
use crate::cancel::CancellationToken;
use crate::config::CountConfig;
use crate::errors::CountResult;
use crate::results::CountSummary;

/// Runs a full count and collects every result into a summary
pub fn count_words(config: &CountConfig, cancel: &CancellationToken) -> CountResult<CountSummary> {
    let processor = FileProcessor::new(config.clone());
    let summary: CountSummary = processor.process_files(cancel)?.into_iter().collect();

    info!(
        "Found {} occurrences of '{}' in {} of {} files",
        summary.total_words,
        config.word(),
        summary.files_counted,
        config.files().len()
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_count_words_summary() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test.txt");
        std::fs::write(&file_path, "test line\ntest line 2\n").unwrap();
        let missing = dir.path().join("missing.txt");

        let config = CountConfig::new(vec![file_path, missing], "test", 2).unwrap();

        let summary = count_words(&config, &CancellationToken::new()).unwrap();
        assert_eq!(summary.files_reported(), 2);
        assert_eq!(summary.files_counted, 1);
        assert_eq!(summary.files_failed, 1);
        assert_eq!(summary.total_words, 2);
    }
}
