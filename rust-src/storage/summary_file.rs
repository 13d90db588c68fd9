//! Persisted usage summary (`usage_data.json`).
//!
//! Field names here are read by other tools and must not change.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::{round_to, UsageSummary};


/// On-disk shape of the usage summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageSnapshot {
    pub current_5h_cycle: CycleSnapshot,
    pub current_week: WeekSnapshot,
    /// Epoch milliseconds.
    pub last_updated: i64,
}


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleSnapshot {
    pub start_time: i64,
    pub total_prompts: u64,
    /// Legacy figure: prompts / 10.
    pub total_hours: f64,
}


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekSnapshot {
    pub start_time: i64,
    pub sonnet4_hours: f64,
    pub opus4_hours: f64,
    pub total_sessions: usize,
}


impl From<&UsageSummary> for UsageSnapshot {
    fn from(summary: &UsageSummary) -> Self {
        Self {
            current_5h_cycle: CycleSnapshot {
                start_time: to_millis(summary.cycle_start),
                total_prompts: summary.cycle_prompts,
                total_hours: round_to(summary.cycle_prompts as f64 / 10.0, 2),
            },
            current_week: WeekSnapshot {
                start_time: to_millis(summary.weekly_start),
                sonnet4_hours: summary.weekly_sonnet_hours,
                opus4_hours: summary.weekly_opus_hours,
                total_sessions: summary.sessions.len(),
            },
            last_updated: to_millis(summary.last_updated),
        }
    }
}


/// Write the summary, creating the parent directory if needed.
pub fn save_usage_summary(summary: &UsageSummary, path: &Path) -> Result<UsageSnapshot> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let snapshot = UsageSnapshot::from(summary);
    let json = serde_json::to_string_pretty(&snapshot)?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write usage summary: {}", path.display()))?;

    Ok(snapshot)
}


/// Epoch seconds to truncated epoch milliseconds.
fn to_millis(seconds: f64) -> i64 {
    (seconds * 1000.0).trunc() as i64
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use tempfile::TempDir;

    fn summary() -> UsageSummary {
        UsageSummary {
            cycle_prompts: 17,
            cycle_start: 1_705_536_000.0,
            weekly_sonnet_hours: 3.25,
            weekly_opus_hours: 1.5,
            weekly_prompts: 40,
            weekly_start: 1_705_276_800.0,
            last_updated: 1_705_539_600.1239,
            sessions: Vec::new(),
            context: None,
        }
    }

    #[test]
    fn test_snapshot_fields() {
        let snapshot = UsageSnapshot::from(&summary());
        assert_eq!(snapshot.current_5h_cycle.start_time, 1_705_536_000_000);
        assert_eq!(snapshot.current_5h_cycle.total_prompts, 17);
        assert_eq!(snapshot.current_5h_cycle.total_hours, 1.7);
        assert_eq!(snapshot.current_week.start_time, 1_705_276_800_000);
        assert_eq!(snapshot.current_week.total_sessions, 0);
        assert_eq!(snapshot.last_updated, 1_705_539_600_123);
    }

    #[test]
    fn test_save_writes_stable_field_names() {
        let tmp_dir = TempDir::new().unwrap();
        let path = tmp_dir.path().join("nested").join("usage_data.json");

        save_usage_summary(&summary(), &path).unwrap();

        let raw: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["current_5h_cycle"]["total_prompts"], 17);
        assert_eq!(raw["current_week"]["sonnet4_hours"], 3.25);
        assert_eq!(raw["current_week"]["opus4_hours"], 1.5);
        assert!(raw["last_updated"].is_i64());
    }

    #[test]
    fn test_saved_file_reads_back() {
        let tmp_dir = TempDir::new().unwrap();
        let path = tmp_dir.path().join("usage_data.json");

        let saved = save_usage_summary(&summary(), &path).unwrap();
        let loaded: UsageSnapshot =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved, loaded);
    }

    #[test]
    fn test_save_into_unwritable_location_fails() {
        let tmp_dir = TempDir::new().unwrap();
        let blocker = tmp_dir.path().join("file");
        fs::write(&blocker, "").unwrap();
        assert!(save_usage_summary(&summary(), &blocker.join("usage_data.json")).is_err());
    }
}
