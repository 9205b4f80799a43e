// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed log tree and request builders so
// each integration test can set up an isolated environment without
// repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code, clippy::expect_used)]

use std::io::Write as _;
use std::path::PathBuf;

use chrono::NaiveDate;
use smlog_cli::logs::LogKind;
use smlog_cli::search::{DEFAULT_FUZZY_THRESHOLD, SearchMode, SearchRequest};

/// An isolated logs-plus-staging tree backed by a [`tempfile::TempDir`].
///
/// The directory is deleted automatically when the fixture is dropped.
pub struct LogsFixture {
    /// Temporary directory containing `logs/` and `staging/`.
    pub root: tempfile::TempDir,
}

impl LogsFixture {
    /// Create a fixture with empty `logs/` and `staging/` directories.
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        std::fs::create_dir_all(root.path().join("logs")).expect("create logs dir");
        std::fs::create_dir_all(root.path().join("staging")).expect("create staging dir");
        Self { root }
    }

    /// Path of the source logs directory.
    pub fn logs_dir(&self) -> PathBuf {
        self.root.path().join("logs")
    }

    /// Path of the staging directory.
    pub fn staging_dir(&self) -> PathBuf {
        self.root.path().join("staging")
    }

    /// Write a plain log file under `logs/` and return its path.
    pub fn write_log(&self, name: &str, content: &str) -> PathBuf {
        let path = self.logs_dir().join(name);
        std::fs::write(&path, content).expect("write log file");
        path
    }

    /// Write a single-member zip archive under `logs/` and return its path.
    pub fn write_zipped_log(&self, name: &str, member_name: &str, content: &str) -> PathBuf {
        let path = self.logs_dir().join(name);
        let file = std::fs::File::create(&path).expect("create zip file");
        let mut writer = zip::ZipWriter::new(file);
        writer
            .start_file(member_name, zip::write::SimpleFileOptions::default())
            .expect("start zip member");
        writer
            .write_all(content.as_bytes())
            .expect("write zip member");
        writer.finish().expect("finish zip");
        path
    }
}

/// `NaiveDate` shorthand for fixtures.
pub fn day(year: i32, month: u32, date: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, date).expect("valid fixture date")
}

/// A literal-mode search request with test-friendly defaults.
///
/// The refresh date is pinned far away from any fixture stamp so staging
/// reuse behaviour is deterministic.
pub fn literal_request(term: &str, kind: LogKind) -> SearchRequest {
    SearchRequest {
        term: term.to_string(),
        mode: SearchMode::Literal,
        ignore_case: true,
        fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
        kind,
        max_workers: 4,
        use_index_cache: false,
        refresh_date: day(2030, 1, 1),
        force_restage: false,
    }
}
