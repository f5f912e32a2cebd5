//! CLI module
//!
//! Provides subcommands for running the admin server and for read-only
//! reports over the stored data:
//! - `serve`: admin HTTP API
//! - `stats`, `patterns`, `activity`, `candidates`: reports printed to stdout

pub mod report;
pub mod serve;

use std::path::Path;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::config::AppConfig;

/// Response cache and question pattern learning for an assistant
#[derive(Parser)]
#[command(name = "assistant-cache")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the admin HTTP API
    Serve,

    /// Show cache and learning statistics
    Stats(report::StatsArgs),

    /// List learned patterns, most frequent first
    Patterns(report::PatternsArgs),

    /// Show activity inside a trailing time window
    Activity(report::ActivityArgs),

    /// List frequent patterns not yet promoted
    Candidates,
}

/// Loads `.env` and the layered configuration from `./config`
///
/// A broken file or variable is an error: the configuration decides where
/// the stores live, so falling back to defaults would silently switch data.
pub fn load_config() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();
    load_config_from(Path::new("config"))
}

fn load_config_from(dir: &Path) -> anyhow::Result<AppConfig> {
    AppConfig::load_from(dir)
        .with_context(|| format!("Failed to load configuration from {}", dir.display()))
}
