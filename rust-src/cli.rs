//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands;
use crate::config::Settings;


/// claude-usage - usage and context-window statistics for Claude Code
#[derive(Parser)]
#[command(name = "claude-usage")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Claude projects directory (default: ~/.claude/projects)
    #[arg(long, global = true, env = "CLAUDE_PROJECTS_DIR")]
    projects_dir: Option<PathBuf>,

    /// Project whose session feeds the context estimate (default: current directory)
    #[arg(long, global = true, env = "CLAUDE_PROJECT_DIR")]
    project: Option<PathBuf>,

    /// Where to write the usage summary (default: ~/.claude/usage/usage_data.json)
    #[arg(long, global = true, env = "CLAUDE_USAGE_FILE")]
    output: Option<PathBuf>,
}


#[derive(Subcommand)]
enum Commands {
    /// Print the status line (reads Claude Code's JSON payload from stdin)
    Status,

    /// Recompute cycle and weekly usage and save the summary
    Update,

    /// Print the estimated context-window usage of the current session
    Context,
}


/// Run the CLI
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::with_overrides(cli.projects_dir, cli.project, cli.output);

    match cli.command.unwrap_or(Commands::Status) {
        Commands::Status => commands::status::run(&settings),
        Commands::Update => commands::update::run(&settings),
        Commands::Context => commands::context::run(&settings),
    }
}
