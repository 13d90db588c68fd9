//! Update command: recompute usage and persist the summary.

use anyhow::Result;

use crate::aggregation::UsageAggregator;
use crate::config::Settings;
use crate::storage::save_usage_summary;


/// Run the update command.
pub fn run(settings: &Settings) -> Result<()> {
    let mut aggregator = UsageAggregator::new(settings);
    let summary = aggregator.calculate_usage();
    save_usage_summary(&summary, &settings.usage_data_path)?;

    println!("CURRENT 5H CYCLE");
    println!("{}", "-".repeat(40));
    println!("  Prompts:             {:>15}", summary.cycle_prompts);

    println!("\nTHIS WEEK");
    println!("{}", "-".repeat(40));
    println!("  Prompts:             {:>15}", summary.weekly_prompts);
    println!("  Sessions:            {:>15}", summary.sessions.len());
    println!("  Sonnet Hours:        {:>15.2}", summary.weekly_sonnet_hours);
    println!("  Opus Hours:          {:>15.2}", summary.weekly_opus_hours);

    if let Some(context) = &summary.context {
        println!("\nCONTEXT WINDOW");
        println!("{}", "-".repeat(40));
        println!(
            "  Estimated Tokens:    {:>15}",
            format!("{}/{}", context.estimated_tokens, context.context_limit)
        );
        println!("  Used:                {:>14}%", context.percentage);
        if context.is_warning() {
            println!("  \x1b[33mAbove {}% - consider starting a fresh session\x1b[0m", context.warning_threshold);
        }
    }

    println!("\nSaved: {}", settings.usage_data_path.display());

    Ok(())
}
