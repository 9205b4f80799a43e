//! Discovery of source log files in the logs directory.
use std::path::Path;

use chrono::NaiveDate;

use super::filename::{LogFileInfo, parse_log_filename};
use super::kind::LogKind;

/// Return log files of `kind` under `logs_dir`, freshest first.
///
/// Ordering: date stamp descending, plain files before zipped ones for the
/// same stamp, then filename ascending. A missing or unreadable directory
/// yields an empty list.
#[must_use]
pub fn discover_logs(logs_dir: &Path, kind: LogKind) -> Vec<LogFileInfo> {
    let entries = match std::fs::read_dir(logs_dir) {
        Ok(entries) => entries,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("cannot read logs directory {}: {e}", logs_dir.display());
            }
            return Vec::new();
        }
    };

    let mut infos: Vec<LogFileInfo> = Vec::new();
    for entry in entries {
        let Ok(entry) = entry else { continue };
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let info = parse_log_filename(&path);
        if info.kind == Some(kind) {
            infos.push(info);
        }
    }

    infos.sort_by(|a, b| {
        b.stamp
            .cmp(&a.stamp)
            .then_with(|| a.zipped.cmp(&b.zipped))
            .then_with(|| a.path.file_name().cmp(&b.path.file_name()))
    });
    infos
}

/// Return the log of `kind` stamped `target_date`, if present.
///
/// When both a plain and a zipped variant exist, the plain one wins.
#[must_use]
pub fn find_log_by_date(logs_dir: &Path, kind: LogKind, target_date: NaiveDate) -> Option<LogFileInfo> {
    discover_logs(logs_dir, kind)
        .into_iter()
        .find(|info| info.stamp == Some(target_date))
}

/// Return the most recent log for `kind`, if any.
#[must_use]
pub fn newest_log(logs_dir: &Path, kind: LogKind) -> Option<LogFileInfo> {
    discover_logs(logs_dir, kind).into_iter().next()
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), b"").expect("write fixture file");
    }

    #[test]
    fn missing_directory_yields_empty() {
        let found = discover_logs(Path::new("/nonexistent/logs"), LogKind::Smtp);
        assert!(found.is_empty());
    }

    #[test]
    fn filters_by_kind_and_sorts_newest_first() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "2024.01.01-smtpLog.log");
        touch(tmp.path(), "2024.01.03-smtpLog.log");
        touch(tmp.path(), "2024.01.02-smtpLog.log");
        touch(tmp.path(), "2024.01.02-delivery.log");
        touch(tmp.path(), "README.md");

        let found = discover_logs(tmp.path(), LogKind::Smtp);
        let names: Vec<String> = found.iter().map(LogFileInfo::base_name).collect();
        assert_eq!(
            names,
            vec![
                "2024.01.03-smtpLog.log",
                "2024.01.02-smtpLog.log",
                "2024.01.01-smtpLog.log",
            ]
        );
    }

    #[test]
    fn plain_variant_sorts_before_zipped_for_same_stamp() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "2024.01.02-smtpLog.log.zip");
        touch(tmp.path(), "2024.01.02-smtpLog.log");

        let found = discover_logs(tmp.path(), LogKind::Smtp);
        assert_eq!(found.len(), 2);
        assert!(!found[0].zipped);
        assert!(found[1].zipped);
    }

    #[test]
    fn aliases_in_filenames_match_canonical_kind() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "2024.01.02-imapLog.log");
        touch(tmp.path(), "2024.01.03-imap.log");

        let found = discover_logs(tmp.path(), LogKind::Imap);
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn find_log_by_date_picks_exact_stamp() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "2024.01.01-smtpLog.log");
        touch(tmp.path(), "2024.01.02-smtpLog.log");

        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let found = find_log_by_date(tmp.path(), LogKind::Smtp, date).unwrap();
        assert_eq!(found.stamp, Some(date));
    }

    #[test]
    fn find_log_by_date_prefers_plain_over_zipped() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "2024.01.01-smtpLog.log.zip");
        touch(tmp.path(), "2024.01.01-smtpLog.log");

        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let found = find_log_by_date(tmp.path(), LogKind::Smtp, date).unwrap();
        assert!(!found.zipped);
    }

    #[test]
    fn find_log_by_date_returns_none_when_absent() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "2024.01.01-smtpLog.log");

        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert!(find_log_by_date(tmp.path(), LogKind::Smtp, date).is_none());
    }

    #[test]
    fn newest_log_returns_freshest() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "2024.01.01-popLog.log");
        touch(tmp.path(), "2024.02.01-popLog.log");

        let newest = newest_log(tmp.path(), LogKind::Pop).unwrap();
        assert_eq!(newest.stamp, NaiveDate::from_ymd_opt(2024, 2, 1));
    }

    #[test]
    fn newest_log_none_for_empty_dir() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(newest_log(tmp.path(), LogKind::Pop).is_none());
    }
}
