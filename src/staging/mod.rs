//! Staging of source logs onto scratch storage and retention of the
//! staging directory.

pub mod retention;
pub mod stage;

pub use retention::{DEFAULT_RETENTION_DAYS, PruneStats, prune_staging};
pub use stage::{StagedLog, stage_log};
