//! Pruning of stale files from the staging directory.
use std::path::Path;
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Days, Local, NaiveDate};

use crate::error::StagingError;
use crate::logs::parse_log_filename;

/// Default retention window for staged files, in days.
pub const DEFAULT_RETENTION_DAYS: u32 = 14;

/// Outcome of a retention sweep.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PruneStats {
    /// Files deleted because they aged out of the window.
    pub removed: usize,
    /// Files still within the window.
    pub kept: usize,
    /// Files skipped because their age could not be determined or the
    /// delete failed.
    pub skipped: usize,
}

/// Delete staged files whose age exceeds `retention_days`.
///
/// Age is judged by filesystem modification time. When the mtime is
/// missing or lies in the future, the date stamp parsed from the filename
/// is used instead; a file with neither is skipped with a warning. Delete
/// failures are warnings, not errors, and the sweep continues.
///
/// `now` is a parameter so tests can pin the clock.
///
/// # Errors
///
/// Returns [`StagingError::Io`] only when the staging directory itself
/// cannot be enumerated. A missing directory is an empty sweep, not an
/// error.
pub fn prune_staging(
    staging_dir: &Path,
    retention_days: u32,
    now: SystemTime,
) -> Result<PruneStats, StagingError> {
    let entries = match std::fs::read_dir(staging_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(PruneStats::default()),
        Err(e) => {
            return Err(StagingError::Io {
                path: staging_dir.to_path_buf(),
                source: e,
            });
        }
    };

    let cutoff_time = now
        .checked_sub(Duration::from_secs(u64::from(retention_days) * 86_400))
        .unwrap_or(SystemTime::UNIX_EPOCH);
    let cutoff_date = DateTime::<Local>::from(now)
        .date_naive()
        .checked_sub_days(Days::new(u64::from(retention_days)))
        .unwrap_or(NaiveDate::MIN);

    let mut stats = PruneStats::default();
    for entry in entries {
        let Ok(entry) = entry else { continue };
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let expired = match file_age_marker(&path, now) {
            Some(AgeMarker::Mtime(mtime)) => mtime < cutoff_time,
            Some(AgeMarker::Stamp(stamp)) => stamp < cutoff_date,
            None => {
                tracing::warn!(
                    "cannot determine age of staged file {}; skipping",
                    path.display()
                );
                stats.skipped += 1;
                continue;
            }
        };

        if !expired {
            stats.kept += 1;
            continue;
        }
        match std::fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!("pruned staged file {}", path.display());
                stats.removed += 1;
            }
            Err(e) => {
                tracing::warn!("failed to prune {}: {e}", path.display());
                stats.skipped += 1;
            }
        }
    }
    Ok(stats)
}

enum AgeMarker {
    Mtime(SystemTime),
    Stamp(NaiveDate),
}

/// The most trustworthy age signal available for `path`.
///
/// A future mtime is nonsense (clock skew, restored backups) and falls
/// back to the filename stamp.
fn file_age_marker(path: &Path, now: SystemTime) -> Option<AgeMarker> {
    let mtime = std::fs::metadata(path).and_then(|m| m.modified()).ok();
    if let Some(mtime) = mtime
        && mtime <= now
    {
        return Some(AgeMarker::Mtime(mtime));
    }
    parse_log_filename(path).stamp.map(AgeMarker::Stamp)
}
