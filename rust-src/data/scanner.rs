//! Transcript discovery under the Claude projects directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tracing::{debug, warn};

use crate::config::{ACTIVE_SESSION_WINDOW_SECS, TRANSCRIPT_EXTENSION};


/// Locates project directories and transcripts under a storage root.
///
/// Filesystem errors degrade to "nothing found".
#[derive(Debug, Clone)]
pub struct TranscriptScanner {
    root: PathBuf,
    active_window: Duration,
}


impl TranscriptScanner {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            active_window: Duration::from_secs(ACTIVE_SESSION_WINDOW_SECS),
        }
    }

    /// All project directories under the root.
    pub fn project_dirs(&self) -> Vec<PathBuf> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(root = %self.root.display(), error = %e, "projects root unreadable");
                return Vec::new();
            }
        };

        let mut dirs: Vec<PathBuf> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .collect();
        dirs.sort();
        dirs
    }

    /// Transcript files directly inside a project directory.
    pub fn transcripts(&self, project_dir: &Path) -> Vec<PathBuf> {
        let entries = match fs::read_dir(project_dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(dir = %project_dir.display(), error = %e, "cannot list project directory");
                return Vec::new();
            }
        };

        let mut files: Vec<PathBuf> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && is_transcript(path))
            .collect();
        files.sort();
        files
    }

    /// Resolve the directory holding a project's transcripts.
    ///
    /// Falls back to the project with the most recently active transcript
    /// when no directory matches the encoded path.
    pub fn resolve_project_dir(&self, project_path: &Path) -> Option<PathBuf> {
        let exact = self.root.join(encode_project_path(project_path));
        if exact.is_dir() {
            return Some(exact);
        }

        if !self.root.is_dir() {
            return None;
        }

        let now = SystemTime::now();
        self.project_dirs()
            .into_iter()
            .filter(|dir| !is_hidden(dir))
            .filter_map(|dir| {
                let (_, modified) = self.latest_transcript(&dir)?;
                let age = now.duration_since(modified).unwrap_or(Duration::ZERO);
                (age < self.active_window).then_some((dir, modified))
            })
            .max_by_key(|(_, modified)| *modified)
            .map(|(dir, _)| dir)
    }

    /// The most recently modified transcript for a project, if any.
    pub fn current_transcript(&self, project_path: &Path) -> Option<PathBuf> {
        let dir = self.resolve_project_dir(project_path)?;
        self.latest_transcript(&dir).map(|(path, _)| path)
    }

    fn latest_transcript(&self, dir: &Path) -> Option<(PathBuf, SystemTime)> {
        self.transcripts(dir)
            .into_iter()
            .filter_map(|path| {
                let modified = fs::metadata(&path).and_then(|m| m.modified()).ok()?;
                Some((path, modified))
            })
            .max_by_key(|(_, modified)| *modified)
    }
}


/// Encode a project path the way Claude names its project directories.
///
/// `/Users/foo/app` becomes `-Users-foo-app`.
pub fn encode_project_path(project_path: &Path) -> String {
    project_path
        .to_string_lossy()
        .chars()
        .map(|c| if c == '/' || c == '\\' { '-' } else { c })
        .collect()
}


fn is_transcript(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == TRANSCRIPT_EXTENSION)
}


fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}
