//! Parsing of `YYYY.MM.DD-<kind>.log[.zip]` log filenames.
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use super::kind::LogKind;
use crate::error::KindError;

static LOG_NAME: LazyLock<Regex> =
    LazyLock::new(|| compiled(r"^(\d{4})\.(\d{2})\.(\d{2})-([A-Za-z]+)\.log(\.zip)?$"));

static STAMP: LazyLock<Regex> = LazyLock::new(|| compiled(r"^(\d{4})\.(\d{2})\.(\d{2})$"));

// Patterns here are string literals; compilation cannot fail at runtime.
#[allow(clippy::expect_used)]
fn compiled(pattern: &str) -> Regex {
    Regex::new(pattern).expect("hand-written pattern is valid")
}

/// Parsed details about a log file path.
///
/// When the filename does not match the canonical pattern (or names an
/// unknown kind, or carries an impossible calendar date), `stamp` and
/// `kind` are both `None` so callers can skip the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFileInfo {
    /// Original path the info was parsed from.
    pub path: PathBuf,
    /// Calendar date encoded in the filename.
    pub stamp: Option<NaiveDate>,
    /// Canonical kind encoded in the filename.
    pub kind: Option<LogKind>,
    /// Whether the file is a `.zip` archive.
    pub zipped: bool,
}

impl LogFileInfo {
    /// Filename with any trailing `.zip` stripped.
    ///
    /// This is the name the decoded log takes in the staging directory.
    #[must_use]
    pub fn base_name(&self) -> String {
        let name = self
            .path
            .file_name()
            .map_or_else(String::new, |n| n.to_string_lossy().into_owned());
        match name.strip_suffix(".zip") {
            Some(stem) => stem.to_string(),
            None => name,
        }
    }
}

/// Parse `path`'s filename into a [`LogFileInfo`].
///
/// Never fails: a filename outside the canonical pattern yields an info
/// with no stamp and no kind.
#[must_use]
pub fn parse_log_filename(path: &Path) -> LogFileInfo {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let unmatched = |path: &Path| LogFileInfo {
        path: path.to_path_buf(),
        stamp: None,
        kind: None,
        zipped: path.extension().is_some_and(|e| e == "zip"),
    };

    let Some(captures) = LOG_NAME.captures(&name) else {
        return unmatched(path);
    };
    let Some(stamp) = ymd_from_captures(&captures) else {
        return unmatched(path);
    };
    let Some(kind) = captures
        .get(4)
        .and_then(|m| LogKind::parse(m.as_str()).ok())
    else {
        return unmatched(path);
    };

    LogFileInfo {
        path: path.to_path_buf(),
        stamp: Some(stamp),
        kind: Some(kind),
        zipped: captures.get(5).is_some(),
    }
}

/// Parse a caller-supplied `YYYY.MM.DD` date stamp.
///
/// # Errors
///
/// Returns [`KindError::InvalidDateStamp`] when the stamp is malformed or
/// names an impossible calendar date.
pub fn parse_stamp(value: &str) -> Result<NaiveDate, KindError> {
    STAMP
        .captures(value)
        .and_then(|captures| ymd_from_captures(&captures))
        .ok_or_else(|| KindError::InvalidDateStamp(value.to_string()))
}

fn ymd_from_captures(captures: &regex::Captures<'_>) -> Option<NaiveDate> {
    let year: i32 = captures.get(1)?.as_str().parse().ok()?;
    let month: u32 = captures.get(2)?.as_str().parse().ok()?;
    let day: u32 = captures.get(3)?.as_str().parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_log_filename() {
        let info = parse_log_filename(Path::new("/logs/2024.01.15-smtpLog.log"));
        assert_eq!(info.stamp, NaiveDate::from_ymd_opt(2024, 1, 15));
        assert_eq!(info.kind, Some(LogKind::Smtp));
        assert!(!info.zipped);
    }

    #[test]
    fn parses_zipped_log_filename() {
        let info = parse_log_filename(Path::new("/logs/2024.01.15-delivery.log.zip"));
        assert_eq!(info.stamp, NaiveDate::from_ymd_opt(2024, 1, 15));
        assert_eq!(info.kind, Some(LogKind::Delivery));
        assert!(info.zipped);
    }

    #[test]
    fn non_canonical_filename_yields_empty_info() {
        let info = parse_log_filename(Path::new("/logs/notes.txt"));
        assert_eq!(info.stamp, None);
        assert_eq!(info.kind, None);
    }

    #[test]
    fn unknown_kind_word_yields_empty_info() {
        let info = parse_log_filename(Path::new("/logs/2024.01.15-syslog.log"));
        assert_eq!(info.stamp, None);
        assert_eq!(info.kind, None);
    }

    #[test]
    fn impossible_calendar_date_yields_empty_info() {
        let info = parse_log_filename(Path::new("/logs/2024.13.40-smtpLog.log"));
        assert_eq!(info.stamp, None);
        assert_eq!(info.kind, None);
    }

    #[test]
    fn base_name_strips_zip_suffix() {
        let info = parse_log_filename(Path::new("/logs/2024.01.15-smtpLog.log.zip"));
        assert_eq!(info.base_name(), "2024.01.15-smtpLog.log");
    }

    #[test]
    fn base_name_of_plain_file_is_file_name() {
        let info = parse_log_filename(Path::new("/logs/2024.01.15-smtpLog.log"));
        assert_eq!(info.base_name(), "2024.01.15-smtpLog.log");
    }

    #[test]
    fn parse_stamp_accepts_canonical_form() {
        let stamp = parse_stamp("2024.02.29").unwrap();
        assert_eq!(stamp, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn parse_stamp_rejects_dashes() {
        let err = parse_stamp("2024-01-01").unwrap_err();
        assert!(matches!(err, KindError::InvalidDateStamp(_)));
    }

    #[test]
    fn parse_stamp_rejects_impossible_date() {
        let err = parse_stamp("2023.02.29").unwrap_err();
        assert!(matches!(err, KindError::InvalidDateStamp(_)));
    }
}
