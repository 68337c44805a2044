use config::{Config as ConfigBuilder, Environment, File, Map, Source, Value};
use serde::Deserialize;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::errors::{CountError, CountResult};

/// Environment variable prefix, e.g. `APP_WORD=go`
pub const ENV_PREFIX: &str = "APP";

/// Name of the configuration file looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "config.yaml";

const DEFAULT_FILE: &str = "./sample1.txt";
const DEFAULT_WORD: &str = "go";
const DEFAULT_WORKER_COUNT: i64 = 1;

/// Run parameters as read from configuration sources, before validation.
///
/// # Configuration Locations
///
/// Sources are layered in order of increasing precedence:
/// 1. Built-in defaults
/// 2. Global `$HOME/.config/wordscout/config.yaml`
/// 3. Local `config.yaml` in the current directory
/// 4. Custom config file passed to [`CountSettings::load_from`]
/// 5. `APP_FILES` (comma separated), `APP_WORD`, `APP_WORKER_COUNT` (or
///    `APP_WORKERCOUNT`), `APP_LOG_LEVEL`
///
/// CLI arguments are layered on top with [`CountSettings::merge_with_cli`].
///
/// # Configuration Format
///
/// ```yaml
/// files:
///   - "./notes.txt"
///   - "./todo.txt"
/// word: "go"
/// worker_count: 4   # `workerCount` is accepted too
/// log_level: "info"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CountSettings {
    #[serde(default)]
    pub files: Vec<PathBuf>,
    #[serde(default)]
    pub word: String,
    /// Signed so that negative values from the environment reach validation
    /// instead of failing to deserialize.
    #[serde(default = "default_worker_count")]
    pub worker_count: i64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_worker_count() -> i64 {
    DEFAULT_WORKER_COUNT
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Keys that older configuration files and `APP_WORKERCOUNT` use for
/// `worker_count`
const LEGACY_WORKER_COUNT_KEYS: [&str; 2] = ["workercount", "workerCount"];

/// Renames legacy keys to their current name inside a single source, so
/// that a legacy key in a higher layer still overrides the current key in a
/// lower one. The current key wins when one source carries both.
#[derive(Debug, Clone)]
struct LegacyKeys<S>(S);

impl<S> Source for LegacyKeys<S>
where
    S: Source + Clone + Send + Sync + 'static,
{
    fn clone_into_box(&self) -> Box<dyn Source + Send + Sync> {
        Box::new(self.clone())
    }

    fn collect(&self) -> Result<Map<String, Value>, config::ConfigError> {
        let mut values = self.0.collect()?;
        for key in LEGACY_WORKER_COUNT_KEYS {
            if let Some(value) = values.remove(key) {
                values.entry("worker_count".to_string()).or_insert(value);
            }
        }
        Ok(values)
    }
}

/// Values supplied on the command line. `None` and empty lists leave the
/// configured value untouched.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub files: Vec<PathBuf>,
    pub word: Option<String>,
    pub worker_count: Option<i64>,
    pub log_level: Option<String>,
}

impl CountSettings {
    /// Loads settings from the default locations and the environment
    pub fn load() -> CountResult<Self> {
        Self::load_from(None)
    }

    /// Loads settings, additionally reading a specific file which must exist
    pub fn load_from(config_path: Option<&Path>) -> CountResult<Self> {
        Self::build(config_path, None)
    }

    /// Same as [`CountSettings::load_from`] but reads `APP_*` variables from
    /// `env` instead of the process environment.
    pub fn load_with_env(
        config_path: Option<&Path>,
        env: Map<String, String>,
    ) -> CountResult<Self> {
        Self::build(config_path, Some(env))
    }

    fn build(config_path: Option<&Path>, env: Option<Map<String, String>>) -> CountResult<Self> {
        let mut builder = ConfigBuilder::builder()
            .set_default("files", vec![DEFAULT_FILE])?
            .set_default("word", DEFAULT_WORD)?
            .set_default("worker_count", DEFAULT_WORKER_COUNT)?
            .set_default("log_level", default_log_level())?;

        let optional_files = [
            dirs::config_dir().map(|p| p.join("wordscout/config.yaml")),
            Some(PathBuf::from(LOCAL_CONFIG_FILE)),
        ];
        for path in optional_files.iter().flatten() {
            if path.exists() {
                debug!("Reading configuration from {}", path.display());
                builder = builder.add_source(LegacyKeys(File::from(path.as_path())));
            }
        }

        if let Some(path) = config_path {
            if !path.exists() {
                return Err(CountError::config_error(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            debug!("Reading configuration from {}", path.display());
            builder = builder.add_source(LegacyKeys(File::from(path)));
        }

        builder = builder.add_source(LegacyKeys(
            Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("files")
                .source(env),
        ));

        Ok(builder.build()?.try_deserialize()?)
    }

    /// Merges CLI arguments with configuration values
    pub fn merge_with_cli(mut self, cli: SettingsOverrides) -> Self {
        // CLI values take precedence over config file values
        if !cli.files.is_empty() {
            self.files = cli.files;
        }
        if let Some(word) = cli.word {
            self.word = word;
        }
        if let Some(worker_count) = cli.worker_count {
            self.worker_count = worker_count;
        }
        if let Some(log_level) = cli.log_level {
            self.log_level = log_level;
        }
        self
    }

    /// Checks the settings and freezes them into a [`CountConfig`]
    pub fn validate(self) -> CountResult<CountConfig> {
        let files: Vec<PathBuf> = self
            .files
            .into_iter()
            .filter(|p| !p.as_os_str().is_empty())
            .collect();
        CountConfig::with_log_level(files, self.word, self.worker_count, self.log_level)
    }
}

/// Validated, immutable parameters for one counting run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountConfig {
    files: Vec<PathBuf>,
    word: String,
    worker_count: NonZeroUsize,
    log_level: String,
}

impl CountConfig {
    /// Builds a config directly, applying the same checks as
    /// [`CountSettings::validate`]
    pub fn new(
        files: Vec<PathBuf>,
        word: impl Into<String>,
        worker_count: i64,
    ) -> CountResult<Self> {
        Self::with_log_level(files, word, worker_count, default_log_level())
    }

    fn with_log_level(
        files: Vec<PathBuf>,
        word: impl Into<String>,
        worker_count: i64,
        log_level: String,
    ) -> CountResult<Self> {
        let word = word.into();
        if files.is_empty() {
            return Err(CountError::config_error("at least one file is required"));
        }
        if word.is_empty() {
            return Err(CountError::config_error("target word must not be empty"));
        }
        let worker_count = usize::try_from(worker_count)
            .ok()
            .and_then(NonZeroUsize::new)
            .ok_or_else(|| {
                CountError::config_error(format!(
                    "worker count must be at least 1, got {}",
                    worker_count
                ))
            })?;

        Ok(Self {
            files,
            word,
            worker_count,
            log_level,
        })
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn worker_count(&self) -> NonZeroUsize {
        self.worker_count
    }

    pub fn log_level(&self) -> &str {
        &self.log_level
    }
}
