//! claude-usage CLI
//!
//! Usage and context-window statistics for Claude Code, computed from the
//! local transcript store and rendered as a single status line.

mod aggregation;
mod cli;
mod commands;
mod config;
mod data;
mod estimation;
mod models;
mod storage;

use tracing_subscriber::EnvFilter;


fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = cli::run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
