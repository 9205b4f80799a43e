//! The `search` command: resolve targets, run the engine, render results.
use std::path::PathBuf;

use anyhow::Result;
use chrono::{Local, NaiveDate};

use super::render::render_search_results;
use crate::cli::{GlobalOpts, SearchOpts};
use crate::config::Config;
use crate::error::{SearchError, SmlogError};
use crate::logs::{LogKind, discover_logs, find_log_by_date, parse_stamp};
use crate::search::{CancelToken, SearchRequest, run_search};

/// Run the search command.
///
/// # Errors
///
/// Returns an error for configuration problems, unresolvable targets,
/// staging failures, malformed terms, scan I/O failures, and cancellation.
pub fn run(global: &GlobalOpts, opts: &SearchOpts, cancel: &CancelToken) -> Result<()> {
    let config = Config::load(global.config.as_deref()).map_err(SmlogError::from)?;
    let logs_dir = global.logs_dir.clone().unwrap_or_else(|| config.logs_dir.clone());
    let staging_dir = global
        .staging_dir
        .clone()
        .unwrap_or_else(|| config.staging_dir.clone());
    let kind = opts.kind.unwrap_or(config.default_kind);

    let sources = resolve_targets(opts, &logs_dir, kind).map_err(SmlogError::from)?;
    tracing::debug!("resolved {} target(s) for kind {kind}", sources.len());

    let refresh_date = match &opts.refresh_date {
        Some(stamp) => parse_stamp(stamp).map_err(SmlogError::from)?,
        None => today(),
    };
    let request = SearchRequest {
        term: opts.term.clone(),
        mode: opts.mode,
        ignore_case: !opts.case_sensitive,
        fuzzy_threshold: opts.fuzzy_threshold,
        kind,
        max_workers: opts.max_workers.unwrap_or(config.max_workers),
        use_index_cache: opts.index_cache || config.use_index_cache,
        refresh_date,
        force_restage: opts.refresh,
    };

    let outcome = run_search(&sources, &staging_dir, &request, cancel)?;
    for line in render_search_results(&outcome.results, kind, opts.matching_only) {
        println!("{line}");
    }
    Ok(())
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Resolve the source files the search will run over.
///
/// An explicit `--file` wins; `--date` selects that day's log; otherwise
/// every discovered log of the kind is searched, newest first, with
/// plain/zipped duplicates of the same day collapsed onto the plain one.
fn resolve_targets(
    opts: &SearchOpts,
    logs_dir: &std::path::Path,
    kind: LogKind,
) -> Result<Vec<PathBuf>, SmlogError> {
    if let Some(file) = &opts.file {
        if !file.is_file() {
            return Err(SearchError::TargetNotFound {
                kind: kind.to_string(),
                target: format!("file {}", file.display()),
            }
            .into());
        }
        return Ok(vec![file.clone()]);
    }

    if let Some(stamp) = &opts.date {
        let date = parse_stamp(stamp)?;
        let info = find_log_by_date(logs_dir, kind, date).ok_or_else(|| {
            SearchError::TargetNotFound {
                kind: kind.to_string(),
                target: format!("date {stamp}"),
            }
        })?;
        return Ok(vec![info.path]);
    }

    let discovered = discover_logs(logs_dir, kind);
    let mut seen: std::collections::HashSet<String> = std::collections::HashSet::new();
    let sources: Vec<PathBuf> = discovered
        .into_iter()
        .filter(|info| seen.insert(info.base_name()))
        .map(|info| info.path)
        .collect();
    if sources.is_empty() {
        return Err(SearchError::TargetNotFound {
            kind: kind.to_string(),
            target: format!("directory {}", logs_dir.display()),
        }
        .into());
    }
    Ok(sources)
}
