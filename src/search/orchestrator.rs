//! Multi-file search execution: stage, plan, fan out, aggregate.
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::error::{SearchError, SmlogError};
use crate::logs::LogKind;
use crate::search::cancel::CancelToken;
use crate::search::driver::{SearchResult, scan_log};
use crate::search::matcher::{LineMatcher, SearchMode};
use crate::search::planner::{ExecutionPlan, choose_execution_plan};
use crate::staging::{StagedLog, stage_log};

/// A fully-normalised search invocation.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    /// Term to search for; interpretation depends on `mode`.
    pub term: String,
    /// How the term is interpreted.
    pub mode: SearchMode,
    /// Fold case during matching.
    pub ignore_case: bool,
    /// Similarity threshold for fuzzy mode, in `[0.0, 1.0]`.
    pub fuzzy_threshold: f64,
    /// Kind of the target logs; selects the grouping strategy.
    pub kind: LogKind,
    /// Upper bound on parallel workers.
    pub max_workers: usize,
    /// Hint that an external per-file index cache exists for the targets.
    pub use_index_cache: bool,
    /// Date whose logs are considered volatile and re-staged.
    pub refresh_date: NaiveDate,
    /// Re-stage every target regardless of date.
    pub force_restage: bool,
}

/// Results of a search run, in input-target order.
#[derive(Debug)]
pub struct SearchOutcome {
    /// Per-file results, ordered like the input targets.
    pub results: Vec<SearchResult>,
    /// The plan the run executed under.
    pub plan: ExecutionPlan,
    /// The staged files that were scanned, ordered like the input targets.
    pub staged: Vec<StagedLog>,
}

/// Stage `sources`, choose an execution plan, and scan every staged file.
///
/// The matcher is compiled before any file is touched so malformed terms
/// fail fast. Per-file results come back in input order regardless of
/// worker completion order; any per-file failure aborts the whole run.
///
/// # Errors
///
/// Returns matcher compilation errors, [`StagingError`](crate::error::StagingError)
/// wrapped per offending file, [`SearchError::Read`] for scan failures,
/// and [`SearchError::Cancelled`] when `cancel` trips mid-run.
pub fn run_search(
    sources: &[PathBuf],
    staging_dir: &Path,
    request: &SearchRequest,
    cancel: &CancelToken,
) -> Result<SearchOutcome, SmlogError> {
    let matcher = LineMatcher::compile(
        &request.term,
        request.mode,
        request.ignore_case,
        request.fuzzy_threshold,
    )?;

    let mut staged: Vec<StagedLog> = Vec::with_capacity(sources.len());
    let mut total_bytes: u64 = 0;
    for source in sources {
        if cancel.is_cancelled() {
            return Err(SearchError::Cancelled.into());
        }
        let staged_log = stage_log(source, staging_dir, request.refresh_date, request.force_restage)?;
        total_bytes += std::fs::metadata(&staged_log.staged_path)
            .map(|m| m.len())
            .unwrap_or(0);
        staged.push(staged_log);
    }

    let plan = choose_execution_plan(
        staged.len(),
        total_bytes,
        request.use_index_cache,
        request.max_workers,
    );
    tracing::debug!(
        "searching {} file(s), {total_bytes} bytes, {} worker(s) ({})",
        staged.len(),
        plan.workers,
        plan.reason
    );

    let results = if plan.workers <= 1 {
        scan_serial(&staged, request, &matcher, cancel)?
    } else {
        scan_parallel(&staged, request, &matcher, cancel, plan.workers)?
    };

    Ok(SearchOutcome {
        results,
        plan,
        staged,
    })
}

fn scan_serial(
    staged: &[StagedLog],
    request: &SearchRequest,
    matcher: &LineMatcher,
    cancel: &CancelToken,
) -> Result<Vec<SearchResult>, SearchError> {
    staged
        .iter()
        .map(|s| {
            scan_log(
                &s.staged_path,
                request.kind,
                &request.term,
                matcher,
                cancel,
            )
        })
        .collect()
}

/// Scan with a bounded rayon pool. Each worker reads one file at a time;
/// there is no shared mutable state, and collecting into a `Vec` keeps
/// input order independent of completion order.
fn scan_parallel(
    staged: &[StagedLog],
    request: &SearchRequest,
    matcher: &LineMatcher,
    cancel: &CancelToken,
    workers: usize,
) -> Result<Vec<SearchResult>, SearchError> {
    use rayon::prelude::*;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("smlog-worker-{i}"))
        .build()
        .map_err(|e| SearchError::WorkerPool(e.to_string()))?;

    pool.install(|| {
        staged
            .par_iter()
            .map(|s| {
                scan_log(
                    &s.staged_path,
                    request.kind,
                    &request.term,
                    matcher,
                    cancel,
                )
            })
            .collect()
    })
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::search::matcher::DEFAULT_FUZZY_THRESHOLD;
    use std::fs;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn request(term: &str, kind: LogKind) -> SearchRequest {
        SearchRequest {
            term: term.to_string(),
            mode: SearchMode::Literal,
            ignore_case: true,
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            kind,
            max_workers: 8,
            use_index_cache: false,
            refresh_date: day(2024, 6, 1),
            force_restage: false,
        }
    }

    fn write_source(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn single_file_run_is_serial_and_finds_matches() {
        let tmp = tempfile::tempdir().unwrap();
        let source = write_source(
            tmp.path(),
            "2024.01.01-smtpLog.log",
            "00:00:00 [1.1.1.1][ABC123] needle here\n",
        );
        let staging = tmp.path().join("staging");

        let outcome = run_search(
            &[source],
            &staging,
            &request("needle", LogKind::Smtp),
            &CancelToken::new(),
        )
        .unwrap();

        assert_eq!(outcome.plan.workers, 1);
        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.results[0].total_conversations(), 1);
    }

    #[test]
    fn results_preserve_input_order_across_parallel_run() {
        let tmp = tempfile::tempdir().unwrap();
        let staging = tmp.path().join("staging");
        // Four targets trip the medium-workload rule (two workers), so the
        // parallel path runs while order must still follow the inputs.
        let sources: Vec<PathBuf> = (1..=4)
            .map(|d| {
                write_source(
                    tmp.path(),
                    &format!("2024.01.0{d}-smtpLog.log"),
                    &format!("00:00:0{d} [1.1.1.1][ID{d}] needle {d}\n"),
                )
            })
            .collect();

        let outcome = run_search(
            &sources,
            &staging,
            &request("needle", LogKind::Smtp),
            &CancelToken::new(),
        )
        .unwrap();

        assert!(outcome.plan.workers > 1, "expected a parallel plan");
        assert_eq!(outcome.results.len(), 4);
        for (index, result) in outcome.results.iter().enumerate() {
            let expected = format!("2024.01.0{}-smtpLog.log", index + 1);
            assert!(
                result.log_path.ends_with(&expected),
                "result {index} out of order: {}",
                result.log_path.display()
            );
        }
    }

    #[test]
    fn invalid_regex_fails_before_staging() {
        let tmp = tempfile::tempdir().unwrap();
        let source = write_source(
            tmp.path(),
            "2024.01.01-smtpLog.log",
            "00:00:00 [1.1.1.1][ABC123] hi\n",
        );
        let staging = tmp.path().join("staging");

        let mut req = request("(", LogKind::Smtp);
        req.mode = SearchMode::Regex;
        let err = run_search(&[source], &staging, &req, &CancelToken::new()).unwrap_err();

        assert!(matches!(
            err,
            SmlogError::Match(crate::error::MatchError::InvalidRegex { .. })
        ));
        assert!(
            !staging.exists(),
            "staging must not happen when the term is malformed"
        );
    }

    #[test]
    fn cancelled_before_start_returns_cancelled() {
        let tmp = tempfile::tempdir().unwrap();
        let source = write_source(
            tmp.path(),
            "2024.01.01-smtpLog.log",
            "00:00:00 [1.1.1.1][ABC123] hi\n",
        );
        let staging = tmp.path().join("staging");
        let token = CancelToken::new();
        token.cancel();

        let err = run_search(
            &[source],
            &staging,
            &request("hi", LogKind::Smtp),
            &token,
        )
        .unwrap_err();
        assert!(matches!(err, SmlogError::Search(SearchError::Cancelled)));
    }

    #[test]
    fn staging_failure_aborts_whole_run() {
        let tmp = tempfile::tempdir().unwrap();
        let good = write_source(
            tmp.path(),
            "2024.01.01-smtpLog.log",
            "00:00:00 [1.1.1.1][ABC123] hi\n",
        );
        let missing = tmp.path().join("2024.01.02-smtpLog.log");
        let staging = tmp.path().join("staging");

        let err = run_search(
            &[good, missing],
            &staging,
            &request("hi", LogKind::Smtp),
            &CancelToken::new(),
        )
        .unwrap_err();
        assert!(matches!(err, SmlogError::Staging(_)));
    }

    #[test]
    fn zipped_sources_are_decoded_before_scanning() {
        let tmp = tempfile::tempdir().unwrap();
        let zip_path = tmp.path().join("2024.01.01-smtpLog.log.zip");
        {
            use std::io::Write as _;
            let file = fs::File::create(&zip_path).unwrap();
            let mut writer = zip::ZipWriter::new(file);
            writer
                .start_file(
                    "2024.01.01-smtpLog.log",
                    zip::write::SimpleFileOptions::default(),
                )
                .unwrap();
            writer
                .write_all(b"00:00:00 [1.1.1.1][ABC123] zipped needle\n")
                .unwrap();
            writer.finish().unwrap();
        }
        let staging = tmp.path().join("staging");

        let outcome = run_search(
            &[zip_path],
            &staging,
            &request("needle", LogKind::Smtp),
            &CancelToken::new(),
        )
        .unwrap();
        assert_eq!(outcome.results[0].total_conversations(), 1);
        assert!(
            outcome.staged[0]
                .staged_path
                .ends_with("2024.01.01-smtpLog.log")
        );
    }
}
