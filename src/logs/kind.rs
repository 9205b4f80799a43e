//! Canonical SmarterMail log kinds and their grouping strategies.
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::KindError;

/// A canonical SmarterMail log kind.
///
/// Kinds are parsed case-insensitively and legacy aliases (`smtpLog`,
/// `imapLog`, `popLog`, `imapRetrievalLog`, `ldapLog`) normalise to their
/// canonical variant. The set is closed: anything else is rejected with
/// [`KindError::Unsupported`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum LogKind {
    /// SMTP protocol sessions.
    Smtp,
    /// IMAP protocol sessions.
    Imap,
    /// POP protocol sessions.
    Pop,
    /// Message delivery pipeline.
    Delivery,
    /// Administrative actions (logins, settings changes).
    Administrative,
    /// IMAP message retrieval jobs.
    ImapRetrieval,
    /// License activation events.
    Activation,
    /// Automatic folder cleaning.
    AutoCleanFolders,
    /// Calendar processing.
    Calendars,
    /// Content filter evaluation.
    ContentFilter,
    /// Event subsystem.
    Event,
    /// General error dumps.
    GeneralErrors,
    /// Search index maintenance.
    Indexing,
    /// LDAP connector.
    Ldap,
    /// Scheduled maintenance jobs.
    Maintenance,
    /// Performance profiler output.
    Profiler,
    /// Spam check verdicts.
    SpamChecks,
    /// WebDAV access.
    WebDav,
}

/// How the scanner derives a flow identifier for lines of a given kind.
///
/// This is the strategy object behind the single parametric scanner: each
/// variant selects a line parser and a flow-key derivation, and
/// [`FlowStrategy::timestamp_opens_new_flow`] tells the scanner what a
/// timestamped-but-unparseable line means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowStrategy {
    /// `HH:MM:SS [ip][log_id] message` — flow key is the bracketed log id.
    Session,
    /// `HH:MM:SS [delivery_id] message` — flow key is the bracketed id.
    Delivery,
    /// `HH:MM:SS [retrieval_id] ...` — flow key is the bracketed id.
    Retrieval,
    /// `HH:MM:SS [ip] message` — flow key is `"<ip> <timestamp>"`.
    Admin,
    /// No identifier in the line; each timestamped line opens a fresh
    /// single-entry flow keyed by its line number.
    Ungrouped,
}

impl FlowStrategy {
    /// Whether a line that begins with a timestamp but fails the kind's
    /// parser starts a new flow anyway.
    ///
    /// True only for ungrouped kinds, where the timestamp itself is the
    /// event boundary. For grouped kinds such a line closes the current
    /// flow without opening a new one.
    #[must_use]
    pub const fn timestamp_opens_new_flow(self) -> bool {
        matches!(self, Self::Ungrouped)
    }
}

/// All canonical kinds, in display order.
pub const ALL_KINDS: [LogKind; 18] = [
    LogKind::Smtp,
    LogKind::Imap,
    LogKind::Pop,
    LogKind::Delivery,
    LogKind::Administrative,
    LogKind::ImapRetrieval,
    LogKind::Activation,
    LogKind::AutoCleanFolders,
    LogKind::Calendars,
    LogKind::ContentFilter,
    LogKind::Event,
    LogKind::GeneralErrors,
    LogKind::Indexing,
    LogKind::Ldap,
    LogKind::Maintenance,
    LogKind::Profiler,
    LogKind::SpamChecks,
    LogKind::WebDav,
];

impl LogKind {
    /// Returns the canonical lowercase tag for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Smtp => "smtp",
            Self::Imap => "imap",
            Self::Pop => "pop",
            Self::Delivery => "delivery",
            Self::Administrative => "administrative",
            Self::ImapRetrieval => "imapretrieval",
            Self::Activation => "activation",
            Self::AutoCleanFolders => "autocleanfolders",
            Self::Calendars => "calendars",
            Self::ContentFilter => "contentfilter",
            Self::Event => "event",
            Self::GeneralErrors => "generalerrors",
            Self::Indexing => "indexing",
            Self::Ldap => "ldap",
            Self::Maintenance => "maintenance",
            Self::Profiler => "profiler",
            Self::SpamChecks => "spamchecks",
            Self::WebDav => "webdav",
        }
    }

    /// Parse a kind tag, accepting canonical tags and legacy aliases.
    ///
    /// The input is trimmed and lowercased before lookup.
    ///
    /// # Errors
    ///
    /// Returns [`KindError::Unsupported`] when the tag does not normalise
    /// to a known kind.
    pub fn parse(value: &str) -> Result<Self, KindError> {
        match value.trim().to_lowercase().as_str() {
            "smtp" | "smtplog" => Ok(Self::Smtp),
            "imap" | "imaplog" => Ok(Self::Imap),
            "pop" | "poplog" => Ok(Self::Pop),
            "delivery" => Ok(Self::Delivery),
            "administrative" => Ok(Self::Administrative),
            "imapretrieval" | "imapretrievallog" => Ok(Self::ImapRetrieval),
            "activation" => Ok(Self::Activation),
            "autocleanfolders" => Ok(Self::AutoCleanFolders),
            "calendars" => Ok(Self::Calendars),
            "contentfilter" => Ok(Self::ContentFilter),
            "event" => Ok(Self::Event),
            "generalerrors" => Ok(Self::GeneralErrors),
            "indexing" => Ok(Self::Indexing),
            "ldap" | "ldaplog" => Ok(Self::Ldap),
            "maintenance" => Ok(Self::Maintenance),
            "profiler" => Ok(Self::Profiler),
            "spamchecks" => Ok(Self::SpamChecks),
            "webdav" => Ok(Self::WebDav),
            _ => Err(KindError::Unsupported(value.to_string())),
        }
    }

    /// The grouping strategy used when scanning logs of this kind.
    #[must_use]
    pub const fn flow_strategy(self) -> FlowStrategy {
        match self {
            Self::Smtp | Self::Imap | Self::Pop => FlowStrategy::Session,
            Self::Delivery => FlowStrategy::Delivery,
            Self::ImapRetrieval => FlowStrategy::Retrieval,
            Self::Administrative => FlowStrategy::Admin,
            _ => FlowStrategy::Ungrouped,
        }
    }

    /// Label used when rendering grouped results of this kind.
    ///
    /// Administrative and ungrouped kinds produce short entries rather
    /// than protocol conversations.
    #[must_use]
    pub const fn result_label(self) -> &'static str {
        match self.flow_strategy() {
            FlowStrategy::Admin | FlowStrategy::Ungrouped => "entry",
            _ => "conversation",
        }
    }
}

impl fmt::Display for LogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogKind {
    type Err = KindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for LogKind {
    type Error = KindError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}
