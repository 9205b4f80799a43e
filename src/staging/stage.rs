//! Materialising source logs onto local scratch storage.
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::error::StagingError;
use crate::logs::{LogFileInfo, parse_log_filename};

/// A source log materialised in the staging directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedLog {
    /// Path of the original source log.
    pub source_path: PathBuf,
    /// Path of the decoded file on the staging filesystem.
    pub staged_path: PathBuf,
    /// Parsed filename details of the source.
    pub info: LogFileInfo,
}

/// Copy `source` into `staging_dir`, unzipping single-member archives.
///
/// The staged name is the source filename with any `.zip` suffix stripped.
/// An existing staged file is reused unless `force` is set or the source
/// filename's date stamp equals `refresh_date` (the current day's log is
/// volatile and is re-staged on every call). Writes go to a `.partial`
/// sibling first and are renamed into place, so a failed stage never
/// leaves a half-written target visible.
///
/// # Errors
///
/// Returns [`StagingError::InvalidArchive`] when a zipped source does not
/// contain exactly one file member, and [`StagingError::Io`] for any
/// filesystem failure.
pub fn stage_log(
    source: &Path,
    staging_dir: &Path,
    refresh_date: NaiveDate,
    force: bool,
) -> Result<StagedLog, StagingError> {
    fs::create_dir_all(staging_dir).map_err(|e| io_error(staging_dir, e))?;

    let info = parse_log_filename(source);
    let target = staging_dir.join(info.base_name());
    let refresh = force || info.stamp == Some(refresh_date);

    if target.exists() && !refresh {
        tracing::debug!("reusing staged file {}", target.display());
        return Ok(StagedLog {
            source_path: source.to_path_buf(),
            staged_path: target,
            info,
        });
    }

    if target.exists() {
        fs::remove_file(&target).map_err(|e| io_error(&target, e))?;
    }

    let partial = partial_path(&target);
    let written = if info.zipped {
        extract_single_member(source, &partial)
    } else {
        copy_preserving_mtime(source, &partial)
    };
    if let Err(e) = written {
        fs::remove_file(&partial).ok();
        return Err(e);
    }
    fs::rename(&partial, &target).map_err(|e| {
        fs::remove_file(&partial).ok();
        io_error(&target, e)
    })?;

    tracing::debug!("staged {} -> {}", source.display(), target.display());
    Ok(StagedLog {
        source_path: source.to_path_buf(),
        staged_path: target,
        info,
    })
}

fn partial_path(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map_or_else(String::new, |n| n.to_string_lossy().into_owned());
    name.push_str(".partial");
    target.with_file_name(name)
}

fn io_error(path: &Path, source: io::Error) -> StagingError {
    StagingError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Copy a plain source log, carrying the source's modification time over.
fn copy_preserving_mtime(source: &Path, dest: &Path) -> Result<(), StagingError> {
    let modified = fs::metadata(source)
        .and_then(|m| m.modified())
        .map_err(|e| io_error(source, e))?;
    fs::copy(source, dest).map_err(|e| io_error(source, e))?;
    let file = fs::OpenOptions::new()
        .write(true)
        .open(dest)
        .map_err(|e| io_error(dest, e))?;
    file.set_modified(modified).ok();
    Ok(())
}

/// Stream the single file member of `archive_path` into `dest`.
fn extract_single_member(archive_path: &Path, dest: &Path) -> Result<(), StagingError> {
    let file = fs::File::open(archive_path).map_err(|e| io_error(archive_path, e))?;
    let mut archive =
        zip::ZipArchive::new(file).map_err(|e| io_error(archive_path, io::Error::other(e)))?;

    let mut file_members: Vec<usize> = Vec::new();
    for index in 0..archive.len() {
        let member = archive
            .by_index(index)
            .map_err(|e| io_error(archive_path, io::Error::other(e)))?;
        if !member.is_dir() {
            file_members.push(index);
        }
    }
    let Some((&index, [])) = file_members.split_first() else {
        return Err(StagingError::InvalidArchive {
            path: archive_path.to_path_buf(),
            members: file_members.len(),
        });
    };

    let mut member = archive
        .by_index(index)
        .map_err(|e| io_error(archive_path, io::Error::other(e)))?;
    let mut out = fs::File::create(dest).map_err(|e| io_error(dest, e))?;
    io::copy(&mut member, &mut out).map_err(|e| io_error(dest, e))?;
    Ok(())
}
