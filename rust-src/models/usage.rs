//! Usage summary and context-window models.

use serde::{Deserialize, Serialize};

use crate::config::{CONTEXT_LIMIT, CONTEXT_WARNING_THRESHOLD};
use crate::models::Session;


/// Estimated context-window fill for the current session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContextUsage {
    pub estimated_tokens: u64,
    pub context_limit: u64,
    /// Rounded to one decimal.
    pub percentage: f64,
    pub warning_threshold: f64,
}


impl ContextUsage {
    /// Build from a token estimate against the fixed context limit.
    pub fn from_tokens(estimated_tokens: u64) -> Self {
        Self::with_limit(estimated_tokens, CONTEXT_LIMIT)
    }

    pub fn with_limit(estimated_tokens: u64, context_limit: u64) -> Self {
        let percentage = if context_limit == 0 {
            0.0
        } else {
            round_to(estimated_tokens as f64 / context_limit as f64 * 100.0, 1)
        };
        Self {
            estimated_tokens,
            context_limit,
            percentage,
            warning_threshold: CONTEXT_WARNING_THRESHOLD,
        }
    }

    pub fn is_warning(&self) -> bool {
        self.percentage >= self.warning_threshold
    }
}


/// Usage rolled up over the current cycle and week.
///
/// Times are epoch seconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageSummary {
    pub cycle_prompts: u64,
    pub cycle_start: f64,
    pub weekly_sonnet_hours: f64,
    pub weekly_opus_hours: f64,
    pub weekly_prompts: u64,
    pub weekly_start: f64,
    pub last_updated: f64,
    /// Sessions that started inside the weekly window.
    pub sessions: Vec<Session>,
    pub context: Option<ContextUsage>,
}


/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
