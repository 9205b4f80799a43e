use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::logs::LogKind;
use crate::search::matcher::{DEFAULT_FUZZY_THRESHOLD, SearchMode};
use crate::staging::DEFAULT_RETENTION_DAYS;

#[derive(Parser, Debug)]
#[command(
    name = "smlog",
    about = "SmarterMail log search and grouping engine",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    /// Path to the config file (default: ~/.config/smlog/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the source logs directory
    #[arg(long, global = true)]
    pub logs_dir: Option<PathBuf>,

    /// Override the staging directory
    #[arg(long, global = true)]
    pub staging_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search logs and group related lines into conversations
    Search(SearchOpts),
    /// List available logs for a kind
    List(ListOpts),
    /// Delete staged files older than the retention window
    Prune(PruneOpts),
    /// Print version information
    Version,
}

#[derive(Parser, Debug, Clone)]
pub struct SearchOpts {
    /// Term to search for
    pub term: String,

    /// Log kind to search (e.g. smtp, delivery, generalerrors)
    #[arg(short, long, value_parser = LogKind::parse)]
    pub kind: Option<LogKind>,

    /// Search only the log stamped with this date
    #[arg(short, long, value_name = "YYYY.MM.DD", conflicts_with = "file")]
    pub date: Option<String>,

    /// Search an explicit log file instead of discovering by kind
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// How the term is interpreted
    #[arg(short, long, default_value = "literal", value_parser = SearchMode::parse)]
    pub mode: SearchMode,

    /// Match case exactly instead of folding
    #[arg(long)]
    pub case_sensitive: bool,

    /// Similarity threshold for fuzzy mode (0.0 to 1.0)
    #[arg(long, default_value_t = DEFAULT_FUZZY_THRESHOLD)]
    pub fuzzy_threshold: f64,

    /// Cap on parallel workers (defaults to config, then CPU count)
    #[arg(long)]
    pub max_workers: Option<usize>,

    /// Signal that an external index cache exists for the targets
    #[arg(long)]
    pub index_cache: bool,

    /// Show only rows that directly match the term
    #[arg(long)]
    pub matching_only: bool,

    /// Re-stage targets even when a staged copy exists
    #[arg(long)]
    pub refresh: bool,

    /// Override the date whose logs count as volatile (for testing)
    #[arg(long, value_name = "YYYY.MM.DD", hide = true)]
    pub refresh_date: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct ListOpts {
    /// Log kind to list (e.g. smtp, delivery, generalerrors)
    #[arg(short, long, value_parser = LogKind::parse)]
    pub kind: Option<LogKind>,
}

#[derive(Parser, Debug, Clone)]
pub struct PruneOpts {
    /// Delete staged files older than this many days
    #[arg(long, default_value_t = DEFAULT_RETENTION_DAYS)]
    pub retention_days: u32,
}
