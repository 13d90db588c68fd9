//! Per-transcript session analysis with a short-lived cache.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::data::reader::TranscriptReader;
use crate::data::timestamp::parse_timestamp;
use crate::models::{ModelFamily, RecordKind, Session};


/// A computed session and when it was computed.
#[derive(Debug, Clone)]
struct CacheEntry {
    session: Session,
    computed_at: Instant,
}


/// Sessions keyed by transcript path.
///
/// Entries expire on wall-clock age only; file modification time is never
/// consulted.
#[derive(Debug)]
pub struct SessionCache {
    ttl: Duration,
    entries: HashMap<PathBuf, CacheEntry>,
}


impl SessionCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// The cached session for `path`, if still fresh.
    pub fn get(&self, path: &Path) -> Option<&Session> {
        self.entries
            .get(path)
            .filter(|entry| entry.computed_at.elapsed() < self.ttl)
            .map(|entry| &entry.session)
    }

    pub fn insert(&mut self, path: PathBuf, session: Session) {
        self.entries.insert(
            path,
            CacheEntry {
                session,
                computed_at: Instant::now(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}


/// Turns transcripts into [`Session`] statistics.
#[derive(Debug)]
pub struct SessionAnalyzer {
    cache: SessionCache,
}


impl SessionAnalyzer {
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: SessionCache::new(ttl),
        }
    }

    /// Analyze a transcript, serving a fresh cached result when available.
    pub fn get(&mut self, path: &Path) -> Session {
        if let Some(session) = self.cache.get(path) {
            debug!(path = %path.display(), "session cache hit");
            return session.clone();
        }

        let session = analyze_transcript(path);
        self.cache.insert(path.to_path_buf(), session.clone());
        session
    }

    pub fn cache(&self) -> &SessionCache {
        &self.cache
    }
}


/// Scan one transcript without caching.
///
/// Unreadable files produce an empty session; malformed lines are skipped.
pub fn analyze_transcript(path: &Path) -> Session {
    let mut first: Option<f64> = None;
    let mut last: Option<f64> = None;
    let mut prompt_count = 0;
    let mut sonnet_responses = 0;
    let mut opus_responses = 0;

    match TranscriptReader::open(path) {
        Ok(reader) => {
            for item in reader {
                let record = match item {
                    Ok(record) => record,
                    Err(e) if e.is_line_local() => {
                        debug!("{e}");
                        continue;
                    }
                    Err(e) => {
                        warn!("{e}");
                        break;
                    }
                };

                if let Some(epoch) = record.timestamp.as_deref().and_then(parse_timestamp) {
                    first = Some(first.map_or(epoch, |t| t.min(epoch)));
                    last = Some(last.map_or(epoch, |t| t.max(epoch)));
                }

                match record.classify() {
                    RecordKind::UserPrompt => prompt_count += 1,
                    RecordKind::Assistant(ModelFamily::Opus) => opus_responses += 1,
                    RecordKind::Assistant(ModelFamily::Sonnet) => sonnet_responses += 1,
                    _ => {}
                }
            }
        }
        Err(e) => warn!("{e}"),
    }

    let (start_time, end_time) = match (first, last) {
        (Some(start), Some(end)) => (start, end),
        _ => (0.0, 0.0),
    };

    Session {
        session_id: file_label(path.file_stem()),
        start_time,
        end_time,
        duration_hours: (end_time - start_time) / 3600.0,
        prompt_count,
        sonnet_responses,
        opus_responses,
        project: file_label(path.parent().and_then(Path::file_name)),
    }
}


fn file_label(name: Option<&std::ffi::OsStr>) -> String {
    name.map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::thread;

    const TRANSCRIPT: &str = r#"{"type":"summary","summary":"Refactor"}
{"type":"user","timestamp":"2024-01-15T10:00:00.123Z","userType":"external","isMeta":false,"message":{"role":"user","content":"add tests"}}
{"type":"assistant","timestamp":"2024-01-15T10:30:00Z","message":{"model":"claude-sonnet-4-20250514","content":[{"type":"text","text":"ok"}]}}
not json at all
{"type":"user","timestamp":"2024-01-15T11:00:00Z","userType":"external","message":{"role":"user","content":"<command-name>/clear</command-name>"}}
{"type":"assistant","timestamp":"null","message":{"model":"claude-opus-4-5","content":"done"}}
{"type":"assistant","timestamp":"2024-01-15T12:00:00Z","message":{"model":"claude-haiku","content":"x"}}
{"type":"user","timestamp":"2024-01-15T11:30:00Z","userType":"external","isMeta":true,"message":{"role":"user","content":"meta"}}
"#;

    fn write_transcript(dir: &Path, project: &str, name: &str, body: &str) -> PathBuf {
        let project_dir = dir.join(project);
        fs::create_dir_all(&project_dir).unwrap();
        let path = project_dir.join(name);
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_analyze_transcript() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_transcript(dir.path(), "-work-app", "abc-123.jsonl", TRANSCRIPT);

        let session = analyze_transcript(&path);

        assert_eq!(session.session_id, "abc-123");
        assert_eq!(session.project, "-work-app");
        assert_eq!(session.prompt_count, 1);
        assert_eq!(session.sonnet_responses, 1);
        assert_eq!(session.opus_responses, 1);
        assert_eq!(session.end_time - session.start_time, 7200.0);
        assert_eq!(session.duration_hours, 2.0);
        assert!(session.is_real());
    }

    #[test]
    fn test_no_timestamps_means_zero_duration() {
        let dir = tempfile::tempdir().unwrap();
        let body = r#"{"type":"user","userType":"external","message":{"role":"user","content":"hi"}}"#;
        let path = write_transcript(dir.path(), "p", "s.jsonl", body);

        let session = analyze_transcript(&path);
        assert_eq!(session.prompt_count, 1);
        assert_eq!(session.start_time, 0.0);
        assert_eq!(session.end_time, 0.0);
        assert_eq!(session.duration_hours, 0.0);
        assert!(!session.is_real());
    }

    #[test]
    fn test_missing_file_is_empty_session() {
        let dir = tempfile::tempdir().unwrap();
        let session = analyze_transcript(&dir.path().join("p").join("gone.jsonl"));
        assert_eq!(session.session_id, "gone");
        assert_eq!(session.prompt_count, 0);
        assert_eq!(session.duration_hours, 0.0);
    }

    #[test]
    fn test_cache_hit_within_ttl() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_transcript(dir.path(), "p", "s.jsonl", TRANSCRIPT);
        let mut analyzer = SessionAnalyzer::new(Duration::from_secs(5));

        let first = analyzer.get(&path);
        // A changed file is not re-read while the entry is fresh.
        fs::write(&path, "").unwrap();
        let second = analyzer.get(&path);

        assert_eq!(first, second);
        assert_eq!(second.prompt_count, 1);
        assert_eq!(analyzer.cache().len(), 1);
    }

    #[test]
    fn test_cache_expires_after_ttl() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_transcript(dir.path(), "p", "s.jsonl", TRANSCRIPT);
        let mut analyzer = SessionAnalyzer::new(Duration::from_millis(250));

        let first = analyzer.get(&path);
        fs::write(&path, "").unwrap();
        let second = analyzer.get(&path);
        assert_eq!(first, second);

        thread::sleep(Duration::from_millis(300));
        let third = analyzer.get(&path);
        assert_eq!(third.prompt_count, 0);
        assert_eq!(third.duration_hours, 0.0);
    }

    #[test]
    fn test_cache_entries_are_per_path() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_transcript(dir.path(), "p", "a.jsonl", TRANSCRIPT);
        let b = write_transcript(dir.path(), "p", "b.jsonl", "");
        let mut analyzer = SessionAnalyzer::new(Duration::from_secs(5));

        assert_eq!(analyzer.get(&a).prompt_count, 1);
        assert_eq!(analyzer.get(&b).prompt_count, 0);
        assert_eq!(analyzer.cache().len(), 2);
    }
}
