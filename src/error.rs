//! Domain-specific error types for the log search engine.
//!
//! This module provides a structured error hierarchy using [`thiserror`].
//! Internal modules return typed errors (e.g., [`StagingError`],
//! [`SearchError`]) while command handlers at the CLI boundary convert them
//! to [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! SmlogError
//! ├── Kind(KindError)       — kind normalisation, date stamp parsing
//! ├── Config(ConfigError)   — TOML parsing, config file I/O
//! ├── Staging(StagingError) — copy/unzip failures, malformed archives
//! ├── Match(MatchError)     — search predicate compilation
//! └── Search(SearchError)   — target resolution, scanning, cancellation
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the log search engine.
///
/// Aggregates domain-specific sub-errors and is convertible to
/// [`anyhow::Error`] for use at CLI command boundaries.
#[derive(Error, Debug)]
pub enum SmlogError {
    /// Log kind or date stamp error.
    #[error("Log kind error: {0}")]
    Kind(#[from] KindError),

    /// Configuration-related error (parsing, I/O).
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Staging error (copy, unzip, malformed archive).
    #[error("Staging error: {0}")]
    Staging(#[from] StagingError),

    /// Search predicate compilation error.
    #[error("Search term error: {0}")]
    Match(#[from] MatchError),

    /// Search execution error (target resolution, scanning, cancellation).
    #[error("Search error: {0}")]
    Search(#[from] SearchError),
}

impl SmlogError {
    /// Whether this error is a usage or configuration mistake rather than an
    /// unexpected internal failure.
    ///
    /// Usage errors map to process exit code 2; everything else to 1.
    #[must_use]
    pub const fn is_usage(&self) -> bool {
        match self {
            Self::Kind(_) | Self::Config(_) | Self::Match(_) => true,
            Self::Search(e) => matches!(e, SearchError::TargetNotFound { .. }),
            Self::Staging(_) => false,
        }
    }
}

/// Errors that arise from log kind and date stamp handling.
#[derive(Error, Debug)]
pub enum KindError {
    /// The kind string does not normalise to a known canonical kind.
    #[error("Unsupported log kind '{0}'")]
    Unsupported(String),

    /// A caller-supplied date stamp is not `YYYY.MM.DD`.
    #[error("Invalid log date stamp '{0}': expected YYYY.MM.DD")]
    InvalidDateStamp(String),
}

/// Errors that arise from configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An I/O error occurred while reading the config file.
    #[error("IO error reading config file {}: {source}", path.display())]
    Io {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The config file contains a syntax or type error.
    #[error("Invalid config file {}: {message}", path.display())]
    Parse {
        /// Path to the file that could not be parsed.
        path: PathBuf,
        /// Parser diagnostic.
        message: String,
    },
}

/// Errors that arise while staging a source log onto scratch storage.
#[derive(Error, Debug)]
pub enum StagingError {
    /// An unrecoverable filesystem error during stage.
    #[error("IO error staging {}: {source}", path.display())]
    Io {
        /// Source or target path involved in the failed operation.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A zipped source does not contain exactly one file member.
    #[error("Archive {} must contain exactly one file member, found {members}", path.display())]
    InvalidArchive {
        /// Path of the offending archive.
        path: PathBuf,
        /// Number of non-directory members found.
        members: usize,
    },
}

/// Errors that arise from search predicate compilation.
#[derive(Error, Debug)]
pub enum MatchError {
    /// The mode string is not one of the supported search modes.
    #[error("Unsupported search mode '{0}'. Choose one of: literal, wildcard, regex, fuzzy")]
    UnsupportedMode(String),

    /// The term is not a valid regular expression.
    #[error("Invalid regex pattern '{pattern}': {message}")]
    InvalidRegex {
        /// The pattern that failed to compile.
        pattern: String,
        /// Regex engine diagnostic.
        message: String,
    },

    /// The fuzzy threshold is outside `[0.0, 1.0]`.
    #[error("Invalid fuzzy threshold {0}: choose a value between 0.00 and 1.00")]
    InvalidFuzzyThreshold(f64),
}

/// Errors that arise while resolving targets or scanning staged files.
#[derive(Error, Debug)]
pub enum SearchError {
    /// Neither a date nor an explicit file yields a matching source log.
    #[error("No {kind} log matching {target}")]
    TargetNotFound {
        /// Canonical kind that was requested.
        kind: String,
        /// Human-readable description of the requested target.
        target: String,
    },

    /// I/O failure while scanning a staged file.
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        /// Path of the staged file being scanned.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The orchestrator observed a cancellation request.
    #[error("Search cancelled")]
    Cancelled,

    /// The parallel worker pool could not be started.
    #[error("Failed to start worker pool: {0}")]
    WorkerPool(String),
}

/// Map an error chain to a process exit code.
///
/// Usage and configuration errors yield `2`; everything else `1`. The
/// chain is probed both for a wrapped [`SmlogError`] and for the bare
/// domain errors that command handlers bubble up directly.
#[must_use]
pub fn exit_code_for(error: &anyhow::Error) -> i32 {
    if let Some(e) = error.downcast_ref::<SmlogError>() {
        return if e.is_usage() { 2 } else { 1 };
    }
    if error.downcast_ref::<KindError>().is_some()
        || error.downcast_ref::<ConfigError>().is_some()
        || error.downcast_ref::<MatchError>().is_some()
    {
        return 2;
    }
    if let Some(SearchError::TargetNotFound { .. }) = error.downcast_ref::<SearchError>() {
        return 2;
    }
    1
}
