//! Single-pass scan of one staged log: grouping interleaved with matching.
//!
//! The scanner streams the file line by line, attributing each line to a
//! flow per the kind's [`FlowStrategy`] while running the compiled
//! predicate against it. Only one pass is made; the file is never slurped.
use std::collections::{HashMap, HashSet};
use std::io::{BufRead as _, BufReader};
use std::path::{Path, PathBuf};

use crate::error::SearchError;
use crate::logs::{FlowStrategy, LogKind};
use crate::search::cancel::CancelToken;
use crate::search::matcher::LineMatcher;
use crate::search::parsers::{
    parse_admin_line, parse_delivery_line, parse_retrieval_line, parse_session_line,
    starts_with_timestamp,
};

/// A group of related log lines sharing a flow identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    /// Flow identifier derived by the kind's grouping strategy.
    pub flow_id: String,
    /// 1-based index of the first line attributed to this flow.
    pub first_line_number: usize,
    /// Lines in original file order, without the trailing newline and any
    /// trailing carriage returns.
    pub lines: Vec<String>,
}

/// The outcome of scanning one staged file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// The term that was searched for.
    pub term: String,
    /// The staged file that was scanned.
    pub log_path: PathBuf,
    /// Matched conversations, sorted by first line number ascending.
    pub conversations: Vec<Conversation>,
    /// Total number of lines read.
    pub total_lines: usize,
    /// Accepted lines that could not be attributed to any flow, in source
    /// order, as read (only the newline stripped).
    pub orphan_matches: Vec<(usize, String)>,
    /// Every accepted line, in source order, as read (only the newline
    /// stripped). Superset of the orphans; feeds the matching-only result
    /// mode.
    pub matching_rows: Vec<(usize, String)>,
}

impl SearchResult {
    /// Number of matched conversations.
    #[must_use]
    pub fn total_conversations(&self) -> usize {
        self.conversations.len()
    }
}

#[derive(Debug)]
struct ConversationBuilder {
    first_line_number: usize,
    lines: Vec<String>,
}

impl ConversationBuilder {
    fn new(first_line_number: usize) -> Self {
        Self {
            first_line_number,
            lines: Vec::new(),
        }
    }

    // Builder lines drop trailing carriage returns (Windows-originated
    // logs); match bookkeeping keeps the line as read.
    fn push(&mut self, line: &str) {
        self.lines.push(line.trim_end_matches('\r').to_string());
    }

    fn into_conversation(self, flow_id: String) -> Conversation {
        Conversation {
            flow_id,
            first_line_number: self.first_line_number,
            lines: self.lines,
        }
    }
}

/// Derive the flow key carried by an event line, per strategy.
///
/// Ungrouped kinds never carry a key in the line itself; their flows are
/// keyed by line number at the call site.
fn flow_key(strategy: FlowStrategy, line: &str) -> Option<String> {
    match strategy {
        FlowStrategy::Session => parse_session_line(line).map(|e| e.log_id.to_string()),
        FlowStrategy::Delivery => parse_delivery_line(line).map(|e| e.id.to_string()),
        FlowStrategy::Retrieval => parse_retrieval_line(line).map(|e| e.id.to_string()),
        FlowStrategy::Admin => parse_admin_line(line).map(|e| e.flow_key()),
        FlowStrategy::Ungrouped => None,
    }
}

/// Scan `path` once, grouping lines into flows and matching each against
/// `matcher`.
///
/// Invalid UTF-8 is tolerated: offending bytes are replaced with the
/// substitution character and the line is processed normally. The token is
/// polled before every line.
///
/// # Errors
///
/// Returns [`SearchError::Read`] on I/O failure and
/// [`SearchError::Cancelled`] when the token trips mid-scan.
pub fn scan_log(
    path: &Path,
    kind: LogKind,
    term: &str,
    matcher: &LineMatcher,
    cancel: &CancelToken,
) -> Result<SearchResult, SearchError> {
    let read_error = |source: std::io::Error| SearchError::Read {
        path: path.to_path_buf(),
        source,
    };

    let file = std::fs::File::open(path).map_err(read_error)?;
    let mut reader = BufReader::new(file);

    let strategy = kind.flow_strategy();
    let mut builders: HashMap<String, ConversationBuilder> = HashMap::new();
    let mut matched_ids: HashSet<String> = HashSet::new();
    let mut orphan_matches: Vec<(usize, String)> = Vec::new();
    let mut matching_rows: Vec<(usize, String)> = Vec::new();
    let mut current_id: Option<String> = None;
    let mut total_lines = 0usize;
    let mut buf: Vec<u8> = Vec::new();

    loop {
        if cancel.is_cancelled() {
            return Err(SearchError::Cancelled);
        }
        buf.clear();
        let bytes_read = reader.read_until(b'\n', &mut buf).map_err(read_error)?;
        if bytes_read == 0 {
            break;
        }
        total_lines += 1;
        let line_number = total_lines;
        if buf.last() == Some(&b'\n') {
            buf.pop();
        }
        let line = String::from_utf8_lossy(&buf);

        // Flow attribution. `owner` is the flow this line belongs to, if
        // any; a floating continuation with no open flow leaves it unset.
        let mut owner: Option<String> = None;
        if let Some(key) = flow_key(strategy, &line) {
            builders
                .entry(key.clone())
                .or_insert_with(|| ConversationBuilder::new(line_number))
                .push(&line);
            current_id = Some(key.clone());
            owner = Some(key);
        } else if starts_with_timestamp(&line) {
            if strategy.timestamp_opens_new_flow() {
                let key = line_number.to_string();
                builders
                    .entry(key.clone())
                    .or_insert_with(|| ConversationBuilder::new(line_number))
                    .push(&line);
                current_id = Some(key.clone());
                owner = Some(key);
            } else {
                // Timestamped but unparseable: closes the open flow.
                current_id = None;
            }
        } else if let Some(id) = current_id.clone() {
            builders
                .entry(id.clone())
                .or_insert_with(|| ConversationBuilder::new(line_number))
                .push(&line);
            owner = Some(id);
        }

        if matcher.is_match(&line) {
            matching_rows.push((line_number, line.to_string()));
            match owner {
                Some(id) => {
                    matched_ids.insert(id);
                }
                None => orphan_matches.push((line_number, line.to_string())),
            }
        }
    }

    let mut conversations: Vec<Conversation> = matched_ids
        .into_iter()
        .filter_map(|id| builders.remove(&id).map(|b| b.into_conversation(id)))
        .collect();
    conversations.sort_by_key(|c| c.first_line_number);

    Ok(SearchResult {
        term: term.to_string(),
        log_path: path.to_path_buf(),
        conversations,
        total_lines,
        orphan_matches,
        matching_rows,
    })
}
