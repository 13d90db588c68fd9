//! Application settings and path constants.

use std::path::PathBuf;
use std::time::Duration;


/// Context window capacity assumed for every session (tokens).
pub const CONTEXT_LIMIT: u64 = 200_000;

/// Percentage at which the status line should start warning.
pub const CONTEXT_WARNING_THRESHOLD: f64 = 45.0;

/// How long an analyzed session stays fresh in the cache (seconds).
pub const CACHE_TTL_SECS: u64 = 5;

/// A project counts as active if a transcript changed within this window (seconds).
pub const ACTIVE_SESSION_WINDOW_SECS: u64 = 300;

/// Length of the rolling usage cycle (hours).
pub const CYCLE_HOURS: u64 = 5;

/// Token heuristics.
pub const CONTENT_CHARS_PER_TOKEN: u64 = 4;
pub const FILE_BYTES_PER_TOKEN: u64 = 6;

/// Extension of transcript files inside a project directory.
pub const TRANSCRIPT_EXTENSION: &str = "jsonl";


/// Get Claude's project transcript directory.
pub fn get_claude_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".claude")
        .join("projects")
}


/// Get the path of the persisted usage summary.
pub fn get_usage_data_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".claude")
        .join("usage")
        .join("usage_data.json")
}


/// Resolved runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Root holding one directory per project.
    pub projects_dir: PathBuf,
    /// Project whose transcript feeds the context estimate.
    pub project_path: PathBuf,
    /// Where `update` writes the summary.
    pub usage_data_path: PathBuf,
    pub cache_ttl: Duration,
}


impl Default for Settings {
    fn default() -> Self {
        Self {
            projects_dir: get_claude_data_dir(),
            project_path: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            usage_data_path: get_usage_data_path(),
            cache_ttl: Duration::from_secs(CACHE_TTL_SECS),
        }
    }
}


impl Settings {
    /// Apply CLI/env overrides on top of the defaults.
    pub fn with_overrides(
        projects_dir: Option<PathBuf>,
        project_path: Option<PathBuf>,
        usage_data_path: Option<PathBuf>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            projects_dir: projects_dir.unwrap_or(defaults.projects_dir),
            project_path: project_path.unwrap_or(defaults.project_path),
            usage_data_path: usage_data_path.unwrap_or(defaults.usage_data_path),
            cache_ttl: defaults.cache_ttl,
        }
    }
}
