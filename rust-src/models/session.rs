//! Session statistics derived from one transcript.

use serde::Serialize;


/// Aggregated statistics for a single transcript file.
///
/// Times are epoch seconds; `duration_hours` is zero unless at least one
/// timestamp was parsed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Session {
    pub session_id: String,
    pub start_time: f64,
    pub end_time: f64,
    pub duration_hours: f64,
    pub prompt_count: u64,
    pub sonnet_responses: u64,
    pub opus_responses: u64,
    pub project: String,
}


impl Session {
    /// Sessions without any elapsed time are ignored by aggregation.
    pub fn is_real(&self) -> bool {
        self.duration_hours > 0.0
    }

    /// Responses attributed to either model family.
    pub fn attributed_responses(&self) -> u64 {
        self.sonnet_responses + self.opus_responses
    }

    /// Split this session's duration by each family's share of responses.
    ///
    /// Returns `(sonnet_hours, opus_hours)`, or `None` when no response was
    /// attributed.
    pub fn model_hours(&self) -> Option<(f64, f64)> {
        let total = self.attributed_responses();
        if total == 0 {
            return None;
        }
        let total = total as f64;
        Some((
            self.duration_hours * (self.sonnet_responses as f64 / total),
            self.duration_hours * (self.opus_responses as f64 / total),
        ))
    }
}
