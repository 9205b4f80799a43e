//! Compilation of search terms into line predicates.
//!
//! Four modes are supported: literal substring, wildcard (`*`/`?`),
//! regular expression, and fuzzy similarity. Compilation validates the
//! term up front so malformed input fails before any file is opened; the
//! compiled [`LineMatcher`] is a pure predicate shared freely across
//! worker threads.
use std::fmt;
use std::str::FromStr;

use regex::{Regex, RegexBuilder};

use crate::error::MatchError;

/// Default similarity threshold for fuzzy matching.
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 0.75;

/// How a search term is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    /// Exact substring match; regex metacharacters have no meaning.
    #[default]
    Literal,
    /// `*` matches any run of characters, `?` matches one character.
    Wildcard,
    /// The term is a regular expression, searched unanchored.
    Regex,
    /// Approximate match: best substring window scored against the term.
    Fuzzy,
}

impl SearchMode {
    /// Parse a mode tag (case-insensitive, trimmed).
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::UnsupportedMode`] for anything outside the
    /// four supported modes.
    pub fn parse(value: &str) -> Result<Self, MatchError> {
        match value.trim().to_lowercase().as_str() {
            "literal" => Ok(Self::Literal),
            "wildcard" => Ok(Self::Wildcard),
            "regex" => Ok(Self::Regex),
            "fuzzy" => Ok(Self::Fuzzy),
            _ => Err(MatchError::UnsupportedMode(value.to_string())),
        }
    }

    /// Canonical lowercase tag for this mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Literal => "literal",
            Self::Wildcard => "wildcard",
            Self::Regex => "regex",
            Self::Fuzzy => "fuzzy",
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchMode {
    type Err = MatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A compiled line predicate.
///
/// Construction is the only fallible step; matching never fails and never
/// rewrites the line it is given.
#[derive(Debug, Clone)]
pub struct LineMatcher {
    engine: Engine,
}

#[derive(Debug, Clone)]
enum Engine {
    Literal {
        needle: String,
        ignore_case: bool,
    },
    Pattern(Regex),
    Fuzzy {
        needle: String,
        ignore_case: bool,
        threshold: f64,
    },
}

impl LineMatcher {
    /// Compile `(term, mode, ignore_case, fuzzy_threshold)` into a predicate.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::InvalidRegex`] when a regex or wildcard term
    /// fails to compile and [`MatchError::InvalidFuzzyThreshold`] when the
    /// threshold lies outside `[0.0, 1.0]`.
    pub fn compile(
        term: &str,
        mode: SearchMode,
        ignore_case: bool,
        fuzzy_threshold: f64,
    ) -> Result<Self, MatchError> {
        if !(0.0..=1.0).contains(&fuzzy_threshold) {
            return Err(MatchError::InvalidFuzzyThreshold(fuzzy_threshold));
        }

        let engine = match mode {
            SearchMode::Literal => Engine::Literal {
                needle: if ignore_case {
                    term.to_lowercase()
                } else {
                    term.to_string()
                },
                ignore_case,
            },
            SearchMode::Wildcard => Engine::Pattern(build_pattern(
                &wildcard_to_regex(term),
                term,
                ignore_case,
            )?),
            SearchMode::Regex => Engine::Pattern(build_pattern(term, term, ignore_case)?),
            SearchMode::Fuzzy => Engine::Fuzzy {
                needle: if ignore_case {
                    term.to_lowercase()
                } else {
                    term.to_string()
                },
                ignore_case,
                threshold: fuzzy_threshold,
            },
        };
        Ok(Self { engine })
    }

    /// Whether `line` satisfies the compiled predicate.
    #[must_use]
    pub fn is_match(&self, line: &str) -> bool {
        match &self.engine {
            Engine::Literal {
                needle,
                ignore_case,
            } => {
                if *ignore_case {
                    line.to_lowercase().contains(needle)
                } else {
                    line.contains(needle)
                }
            }
            Engine::Pattern(regex) => regex.is_match(line),
            Engine::Fuzzy {
                needle,
                ignore_case,
                threshold,
            } => {
                let score = if *ignore_case {
                    partial_ratio(needle, &line.to_lowercase(), *threshold)
                } else {
                    partial_ratio(needle, line, *threshold)
                };
                score >= *threshold
            }
        }
    }
}

fn build_pattern(pattern: &str, term: &str, ignore_case: bool) -> Result<Regex, MatchError> {
    RegexBuilder::new(pattern)
        .case_insensitive(ignore_case)
        .build()
        .map_err(|e| MatchError::InvalidRegex {
            pattern: term.to_string(),
            message: e.to_string(),
        })
}

/// Convert a wildcard term into regex source.
///
/// Every character is escaped except `*` (any run) and `?` (one char).
#[must_use]
pub fn wildcard_to_regex(term: &str) -> String {
    let mut source = String::with_capacity(term.len() * 2);
    for ch in term.chars() {
        match ch {
            '*' => source.push_str(".*"),
            '?' => source.push('.'),
            _ => source.push_str(&regex::escape(&ch.to_string())),
        }
    }
    source
}

/// Similarity in `[0.0, 1.0]` between `term` and the best-matching
/// substring window of `line`.
///
/// The reference scorer slides a window of the term's character length
/// over the line and takes the maximum Levenshtein-derived ratio. `cutoff`
/// is an early-exit bound: scanning stops at the first window scoring at
/// or above it. An accelerated partial-ratio implementation can replace
/// this function wholesale since the cutoff is already part of the
/// contract.
#[must_use]
pub fn partial_ratio(term: &str, line: &str, cutoff: f64) -> f64 {
    if term.is_empty() {
        return 1.0;
    }
    let line_chars: Vec<char> = line.chars().collect();
    let window_len = term.chars().count();
    if line_chars.len() <= window_len {
        return strsim::normalized_levenshtein(term, line);
    }

    let mut best = 0.0_f64;
    for window in line_chars.windows(window_len) {
        let candidate: String = window.iter().collect();
        let score = strsim::normalized_levenshtein(term, &candidate);
        if score > best {
            best = score;
            if best >= cutoff {
                return best;
            }
        }
    }
    best
}
