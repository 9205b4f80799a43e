//! The `list` command: show available logs for a kind.
use anyhow::Result;

use crate::cli::{GlobalOpts, ListOpts};
use crate::config::Config;
use crate::error::SmlogError;
use crate::logs::{LogFileInfo, discover_logs};

/// Run the list command.
///
/// # Errors
///
/// Returns an error when the configuration file cannot be loaded.
pub fn run(global: &GlobalOpts, opts: &ListOpts) -> Result<()> {
    let config = Config::load(global.config.as_deref()).map_err(SmlogError::from)?;
    let logs_dir = global.logs_dir.clone().unwrap_or_else(|| config.logs_dir.clone());
    let kind = opts.kind.unwrap_or(config.default_kind);

    let logs = discover_logs(&logs_dir, kind);
    if logs.is_empty() {
        println!("No {kind} logs found in {}", logs_dir.display());
        return Ok(());
    }

    println!("{} {kind} log(s) in {}", logs.len(), logs_dir.display());
    for info in &logs {
        println!("{}", describe(info));
    }
    Ok(())
}

fn describe(info: &LogFileInfo) -> String {
    let stamp = info
        .stamp
        .map_or_else(|| "----------".to_string(), |s| s.format("%Y.%m.%d").to_string());
    let format = if info.zipped { "zip  " } else { "plain" };
    let size = std::fs::metadata(&info.path).map_or(0, |m| m.len());
    let name = info
        .path
        .file_name()
        .map_or_else(String::new, |n| n.to_string_lossy().into_owned());
    format!("{stamp}  {format}  {size:>12}  {name}")
}
