#![allow(clippy::expect_used, clippy::unwrap_used)]
//! Integration tests for the `prune` command and staging retention.

mod common;

use std::time::{Duration, SystemTime};

use common::LogsFixture;
use smlog_cli::cli::{GlobalOpts, PruneOpts};
use smlog_cli::commands;
use smlog_cli::staging::prune_staging;

fn global_opts(fixture: &LogsFixture) -> GlobalOpts {
    GlobalOpts {
        config: Some(fixture.root.path().join("no-config.toml")),
        logs_dir: Some(fixture.logs_dir()),
        staging_dir: Some(fixture.staging_dir()),
    }
}

fn write_staged_with_age(fixture: &LogsFixture, name: &str, age: Duration) -> std::path::PathBuf {
    let path = fixture.staging_dir().join(name);
    std::fs::write(&path, "staged content\n").unwrap();
    let file = std::fs::OpenOptions::new().write(true).open(&path).unwrap();
    file.set_modified(SystemTime::now() - age).unwrap();
    path
}

#[test]
fn prune_command_removes_only_expired_files() {
    let fixture = LogsFixture::new();
    let old = write_staged_with_age(
        &fixture,
        "2024.01.01-smtpLog.log",
        Duration::from_secs(30 * 86_400),
    );
    let fresh = write_staged_with_age(
        &fixture,
        "2024.05.01-smtpLog.log",
        Duration::from_secs(86_400),
    );

    let result = commands::prune::run(
        &global_opts(&fixture),
        &PruneOpts { retention_days: 14 },
    );
    assert!(result.is_ok(), "unexpected failure: {result:?}");
    assert!(!old.exists(), "expired file should be removed");
    assert!(fresh.exists(), "fresh file should be kept");
}

#[test]
fn prune_command_with_missing_staging_dir_is_ok() {
    let fixture = LogsFixture::new();
    let mut global = global_opts(&fixture);
    global.staging_dir = Some(fixture.root.path().join("nonexistent"));

    let result = commands::prune::run(&global, &PruneOpts { retention_days: 14 });
    assert!(result.is_ok(), "unexpected failure: {result:?}");
}

#[test]
fn retention_sweep_reports_counts() {
    let fixture = LogsFixture::new();
    write_staged_with_age(
        &fixture,
        "2024.01.01-smtpLog.log",
        Duration::from_secs(30 * 86_400),
    );
    write_staged_with_age(
        &fixture,
        "2024.05.01-smtpLog.log",
        Duration::from_secs(86_400),
    );

    let stats = prune_staging(&fixture.staging_dir(), 14, SystemTime::now()).unwrap();
    assert_eq!(stats.removed, 1);
    assert_eq!(stats.kept, 1);
    assert_eq!(stats.skipped, 0);
}
