//! Configuration file loading.
//!
//! Settings live in a TOML file at `$SMLOG_CONFIG` or
//! `~/.config/smlog/config.toml`. Every key is optional; a missing file
//! yields the built-in defaults, and CLI flags override whatever the file
//! provides.
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::logs::LogKind;

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "SMLOG_CONFIG";

/// Default location of SmarterMail server logs.
pub const DEFAULT_LOGS_DIR: &str = "/var/lib/smartermail/Logs";

/// Raw shape of the TOML config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    logs_dir: Option<PathBuf>,
    staging_dir: Option<PathBuf>,
    default_kind: Option<LogKind>,
    max_workers: Option<usize>,
    use_index_cache: Option<bool>,
}

/// Resolved application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root directory of source logs.
    pub logs_dir: PathBuf,
    /// Scratch directory for staged logs.
    pub staging_dir: PathBuf,
    /// Kind assumed when the CLI does not name one.
    pub default_kind: LogKind,
    /// Upper bound on parallel search workers.
    pub max_workers: usize,
    /// Hint that an external index cache exists for the logs.
    pub use_index_cache: bool,
}

impl Config {
    /// Load configuration from `path`, or from the default location when
    /// `path` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when an existing file cannot be read
    /// and [`ConfigError::Parse`] when its contents are not valid TOML or
    /// carry unknown keys or invalid values.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config_path = path.map_or_else(default_config_path, Path::to_path_buf);
        let file = match std::fs::read_to_string(&config_path) {
            Ok(raw) => toml::from_str::<FileConfig>(&raw).map_err(|e| ConfigError::Parse {
                path: config_path.clone(),
                message: e.message().to_string(),
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => FileConfig::default(),
            Err(e) => {
                return Err(ConfigError::Io {
                    path: config_path,
                    source: e,
                });
            }
        };
        Ok(Self::from_file(file))
    }

    fn from_file(file: FileConfig) -> Self {
        Self {
            logs_dir: file
                .logs_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOGS_DIR)),
            staging_dir: file.staging_dir.unwrap_or_else(default_staging_dir),
            default_kind: file.default_kind.unwrap_or(LogKind::Smtp),
            max_workers: file.max_workers.unwrap_or_else(default_max_workers),
            use_index_cache: file.use_index_cache.unwrap_or(false),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_file(FileConfig::default())
    }
}

/// Default config path, honouring `$SMLOG_CONFIG`.
#[must_use]
pub fn default_config_path() -> PathBuf {
    if let Ok(value) = std::env::var(CONFIG_ENV)
        && !value.is_empty()
    {
        return PathBuf::from(value);
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("smlog")
        .join("config.toml")
}

fn default_staging_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("smlog")
        .join("staging")
}

fn default_max_workers() -> usize {
    std::thread::available_parallelism().map_or(1, std::num::NonZero::get)
}
