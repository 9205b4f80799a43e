//! The `version` command.

/// Print the embedded version string.
pub fn run() {
    let version = option_env!("SMLOG_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"));
    println!("smlog {version}");
}
