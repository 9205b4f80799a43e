//! The `prune` command: sweep stale files out of the staging directory.
use std::time::SystemTime;

use anyhow::Result;

use crate::cli::{GlobalOpts, PruneOpts};
use crate::config::Config;
use crate::error::SmlogError;
use crate::staging::prune_staging;

/// Run the prune command.
///
/// # Errors
///
/// Returns an error when the configuration file cannot be loaded or the
/// staging directory cannot be enumerated. Individual delete failures are
/// warnings, not errors.
pub fn run(global: &GlobalOpts, opts: &PruneOpts) -> Result<()> {
    let config = Config::load(global.config.as_deref()).map_err(SmlogError::from)?;
    let staging_dir = global
        .staging_dir
        .clone()
        .unwrap_or_else(|| config.staging_dir.clone());

    let stats = prune_staging(&staging_dir, opts.retention_days, SystemTime::now())
        .map_err(SmlogError::from)?;
    println!(
        "{} removed, {} kept, {} skipped ({} day retention, {})",
        stats.removed,
        stats.kept,
        stats.skipped,
        opts.retention_days,
        staging_dir.display()
    );
    Ok(())
}
