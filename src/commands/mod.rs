//! CLI command handlers.
//!
//! Each submodule owns one subcommand. Handlers resolve configuration,
//! call into the engine, and render output; they return [`anyhow::Result`]
//! with typed [`SmlogError`](crate::error::SmlogError) values underneath
//! so `main` can map them to exit codes.

pub mod list;
pub mod prune;
pub mod render;
pub mod search;
pub mod version;
