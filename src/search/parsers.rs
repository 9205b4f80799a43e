//! Per-kind parsers for individual SmarterMail log lines.
//!
//! All parsers are total: a line that does not match the kind's format
//! yields `None`, never an error. The borrowed fields point back into the
//! input line.
use std::sync::LazyLock;

use regex::Regex;

const TIME: &str = r"\d{2}:\d{2}:\d{2}(?:\.\d{3})?";

static TIME_PREFIX: LazyLock<Regex> = LazyLock::new(|| compiled(&format!("^{TIME}")));

static SESSION: LazyLock<Regex> =
    LazyLock::new(|| compiled(&format!(r"^({TIME}) \[([^\]]+)\]\[([^\]]+)\] (.*)$")));

static BRACKETED: LazyLock<Regex> =
    LazyLock::new(|| compiled(&format!(r"^({TIME}) \[([^\]]+)\] (.*)$")));

static ADMIN_TRAILING: LazyLock<Regex> =
    LazyLock::new(|| compiled(&format!(r"^\[([^\]]+)\] (.*) ({TIME})$")));

// Patterns here are built from literal fragments; compilation cannot fail
// at runtime.
#[allow(clippy::expect_used)]
fn compiled(pattern: &str) -> Regex {
    Regex::new(pattern).expect("hand-written pattern is valid")
}

/// A parsed SMTP/IMAP/POP session line: `HH:MM:SS [ip][log_id] message`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionLine<'a> {
    /// Timestamp fragment at the start of the line.
    pub timestamp: &'a str,
    /// Client IP between the first brackets.
    pub ip: &'a str,
    /// Session log id between the second brackets.
    pub log_id: &'a str,
    /// Free-form message after the brackets.
    pub message: &'a str,
}

/// A parsed line with a single bracketed id: `HH:MM:SS [id] message`.
///
/// Used for both delivery logs (delivery id) and IMAP-retrieval logs
/// (retrieval id).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BracketedLine<'a> {
    /// Timestamp fragment at the start of the line.
    pub timestamp: &'a str,
    /// Bracketed identifier.
    pub id: &'a str,
    /// Free-form message after the bracket.
    pub message: &'a str,
}

/// A parsed administrative line.
///
/// Administrative logs mostly use the leading-timestamp form
/// `HH:MM:SS [ip] message`, but some subsystems emit the timestamp at the
/// end of the line instead: `[ip] message HH:MM:SS`. Both parse to the
/// same shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminLine<'a> {
    /// Timestamp fragment (leading or trailing).
    pub timestamp: &'a str,
    /// Source IP between the brackets.
    pub ip: &'a str,
    /// Free-form message.
    pub message: &'a str,
}

impl AdminLine<'_> {
    /// Composite flow key grouping simultaneous events from one IP.
    #[must_use]
    pub fn flow_key(&self) -> String {
        format!("{} {}", self.ip, self.timestamp)
    }
}

/// Whether `line` begins with the `HH:MM:SS[.mmm]` timestamp fragment.
#[must_use]
pub fn starts_with_timestamp(line: &str) -> bool {
    TIME_PREFIX.is_match(line)
}

/// Parse an SMTP/IMAP/POP session line.
#[must_use]
pub fn parse_session_line(line: &str) -> Option<SessionLine<'_>> {
    let captures = SESSION.captures(line)?;
    Some(SessionLine {
        timestamp: captures.get(1)?.as_str(),
        ip: captures.get(2)?.as_str(),
        log_id: captures.get(3)?.as_str(),
        message: captures.get(4)?.as_str(),
    })
}

/// Parse a delivery log line.
#[must_use]
pub fn parse_delivery_line(line: &str) -> Option<BracketedLine<'_>> {
    parse_bracketed_line(line)
}

/// Parse an IMAP-retrieval log line.
#[must_use]
pub fn parse_retrieval_line(line: &str) -> Option<BracketedLine<'_>> {
    parse_bracketed_line(line)
}

fn parse_bracketed_line(line: &str) -> Option<BracketedLine<'_>> {
    let captures = BRACKETED.captures(line)?;
    Some(BracketedLine {
        timestamp: captures.get(1)?.as_str(),
        id: captures.get(2)?.as_str(),
        message: captures.get(3)?.as_str(),
    })
}

/// Parse an administrative log line, accepting both timestamp positions.
#[must_use]
pub fn parse_admin_line(line: &str) -> Option<AdminLine<'_>> {
    if let Some(captures) = BRACKETED.captures(line) {
        return Some(AdminLine {
            timestamp: captures.get(1)?.as_str(),
            ip: captures.get(2)?.as_str(),
            message: captures.get(3)?.as_str(),
        });
    }
    let captures = ADMIN_TRAILING.captures(line)?;
    Some(AdminLine {
        timestamp: captures.get(3)?.as_str(),
        ip: captures.get(1)?.as_str(),
        message: captures.get(2)?.as_str(),
    })
}
