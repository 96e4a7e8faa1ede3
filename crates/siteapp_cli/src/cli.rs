//! Command-line and environment configuration.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Value of `--db` that selects a throwaway in-memory database.
pub const IN_MEMORY_DB: &str = ":memory:";

/// siteapp: operator login and person records over HTTP
#[derive(Parser, Debug)]
#[command(name = "siteapp", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub serve: ServeArgs,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print core and schema versions, then exit
    Info,
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Bind address
    #[arg(long, default_value = "127.0.0.1", env = "SITEAPP_HOST")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 8000, env = "SITEAPP_PORT")]
    pub port: u16,

    /// SQLite database file, or `:memory:`
    #[arg(long, default_value = "siteapp.sqlite3", env = "SITEAPP_DB")]
    pub db: String,

    /// trace|debug|info|warn|error (default depends on build mode)
    #[arg(long, env = "SITEAPP_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files; logs go to stderr when unset
    #[arg(long, env = "SITEAPP_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}
