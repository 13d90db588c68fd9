//! Context command: print the current context-window estimate.

use anyhow::Result;

use crate::config::Settings;
use crate::data::TranscriptScanner;
use crate::estimation::ContextEstimator;


/// Run the context command.
pub fn run(settings: &Settings) -> Result<()> {
    let estimator = ContextEstimator::new(TranscriptScanner::new(&settings.projects_dir));

    match estimator.estimate(&settings.project_path) {
        Some(usage) => println!("{}", serde_json::to_string_pretty(&usage)?),
        None => println!("unavailable"),
    }

    Ok(())
}
