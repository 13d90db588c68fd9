//! Cycle and weekly usage roll-up across every transcript.

use std::path::PathBuf;

use chrono::{DateTime, Local, TimeZone};
use tracing::debug;

use crate::aggregation::windows::{epoch_seconds, UsageWindows};
use crate::config::Settings;
use crate::data::{SessionAnalyzer, TranscriptScanner};
use crate::estimation::ContextEstimator;
use crate::models::{round_to, ContextUsage, Session, UsageSummary};


/// Collects sessions from the whole transcript store and summarizes them.
#[derive(Debug)]
pub struct UsageAggregator {
    scanner: TranscriptScanner,
    analyzer: SessionAnalyzer,
    context: ContextEstimator,
    project_path: PathBuf,
}


impl UsageAggregator {
    pub fn new(settings: &Settings) -> Self {
        let scanner = TranscriptScanner::new(&settings.projects_dir);
        Self {
            analyzer: SessionAnalyzer::new(settings.cache_ttl),
            context: ContextEstimator::new(scanner.clone()),
            scanner,
            project_path: settings.project_path.clone(),
        }
    }

    /// Every real (non-zero duration) session across all projects.
    pub fn all_sessions(&mut self) -> Vec<Session> {
        let mut sessions = Vec::new();
        for project_dir in self.scanner.project_dirs() {
            for transcript in self.scanner.transcripts(&project_dir) {
                let session = self.analyzer.get(&transcript);
                if session.is_real() {
                    sessions.push(session);
                } else {
                    debug!(path = %transcript.display(), "skipping session without duration");
                }
            }
        }
        debug!(
            sessions = sessions.len(),
            cached = self.analyzer.cache().len(),
            "collected sessions"
        );
        sessions
    }

    pub fn calculate_usage(&mut self) -> UsageSummary {
        self.calculate_usage_at(&Local::now())
    }

    /// Summarize usage as of `now`; the week follows `now`'s timezone.
    pub fn calculate_usage_at<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> UsageSummary {
        let sessions = self.all_sessions();
        let context = self.context.estimate(&self.project_path);
        roll_up(
            sessions,
            UsageWindows::at(now),
            epoch_seconds(now),
            context,
        )
    }
}


/// Filter sessions into the windows and total them.
pub fn roll_up(
    sessions: Vec<Session>,
    windows: UsageWindows,
    last_updated: f64,
    context: Option<ContextUsage>,
) -> UsageSummary {
    let cycle_prompts: u64 = sessions
        .iter()
        .filter(|s| s.start_time >= windows.cycle_start)
        .map(|s| s.prompt_count)
        .sum();

    let week_sessions: Vec<Session> = sessions
        .into_iter()
        .filter(|s| s.start_time >= windows.week_start)
        .collect();

    let weekly_prompts: u64 = week_sessions.iter().map(|s| s.prompt_count).sum();

    let (sonnet_hours, opus_hours) = week_sessions
        .iter()
        .filter_map(Session::model_hours)
        .fold((0.0, 0.0), |(sonnet, opus), (s, o)| (sonnet + s, opus + o));

    UsageSummary {
        cycle_prompts,
        cycle_start: windows.cycle_start,
        weekly_sonnet_hours: round_to(sonnet_hours, 2),
        weekly_opus_hours: round_to(opus_hours, 2),
        weekly_prompts,
        weekly_start: windows.week_start,
        last_updated,
        sessions: week_sessions,
        context,
    }
}
