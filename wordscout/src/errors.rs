//! Error types for wordscout.
//!
//! Errors fall into two groups with different propagation rules:
//!
//! 1. **Run-level errors** abort a run before any file is touched. Only
//!    [`CountError::ConfigError`] and [`CountError::WorkerSpawn`] belong here.
//! 2. **Per-file errors** are captured into the [`FileCount`](crate::results::FileCount)
//!    of the file that produced them and never affect sibling files:
//!    ```rust,ignore
//!    for file_count in receiver {
//!        match file_count.outcome {
//!            Ok(count) => println!("{}: {}", file_count.path.display(), count),
//!            Err(CountError::Cancelled) => { /* run was cancelled mid-scan */ }
//!            Err(e) => eprintln!("{}: {}", file_count.path.display(), e),
//!        }
//!    }
//!    ```
use std::path::PathBuf;
use thiserror::Error;

/// Result type for counting operations
pub type CountResult<T> = Result<T, CountError>;

/// Errors that can occur while configuring or running a count
#[derive(Error, Debug)]
pub enum CountError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),
    #[error("Failed to open {path}: {source}")]
    FileOpen {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to read {path}: {source}")]
    Scan {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Operation cancelled")]
    Cancelled,
    #[error("Failed to spawn worker thread: {0}")]
    WorkerSpawn(std::io::Error),
}

impl CountError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound(path.into())
    }

    pub fn permission_denied(path: impl Into<PathBuf>) -> Self {
        Self::PermissionDenied(path.into())
    }

    /// Classifies a failure to open `path` by its io error kind
    pub fn open_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::FileNotFound(path),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            _ => Self::FileOpen { path, source },
        }
    }

    pub fn scan_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Scan {
            path: path.into(),
            source,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::ConfigError(_))
    }
}

impl From<config::ConfigError> for CountError {
    fn from(err: config::ConfigError) -> Self {
        Self::ConfigError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::Path;

    #[test]
    fn test_error_creation() {
        let path = Path::new("test.txt");
        let err = CountError::file_not_found(path);
        assert!(matches!(err, CountError::FileNotFound(_)));

        let err = CountError::permission_denied(path);
        assert!(matches!(err, CountError::PermissionDenied(_)));

        let err = CountError::config_error("worker count must be at least 1");
        assert!(err.is_config_error());
        assert!(!err.is_cancelled());

        assert!(CountError::Cancelled.is_cancelled());
    }

    #[test]
    fn test_open_failed_classification() {
        let err = CountError::open_failed("a.txt", io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(err, CountError::FileNotFound(_)));

        let err = CountError::open_failed(
            "a.txt",
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        assert!(matches!(err, CountError::PermissionDenied(_)));

        let err = CountError::open_failed("a.txt", io::Error::from(io::ErrorKind::Other));
        assert!(matches!(err, CountError::FileOpen { .. }));
    }

    #[test]
    fn test_error_messages() {
        let err = CountError::config_error("Missing required field");
        assert_eq!(
            err.to_string(),
            "Configuration error: Missing required field"
        );

        let err = CountError::file_not_found("test.txt");
        assert_eq!(err.to_string(), "File not found: test.txt");

        assert_eq!(CountError::Cancelled.to_string(), "Operation cancelled");

        let err = CountError::scan_failed("big.txt", io::Error::new(io::ErrorKind::Other, "boom"));
        assert_eq!(err.to_string(), "Failed to read big.txt: boom");
    }
}
