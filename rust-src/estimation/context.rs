//! Context-window estimate for the active session.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::data::{TranscriptReader, TranscriptScanner};
use crate::estimation::tokens::TokenEstimate;
use crate::models::ContextUsage;


/// Estimates how full the current session's context window is.
#[derive(Debug, Clone)]
pub struct ContextEstimator {
    scanner: TranscriptScanner,
}


impl ContextEstimator {
    pub fn new(scanner: TranscriptScanner) -> Self {
        Self { scanner }
    }

    /// `None` when no current transcript resolves for the project.
    pub fn estimate(&self, project_path: &Path) -> Option<ContextUsage> {
        let transcript = self.scanner.current_transcript(project_path)?;
        let estimate = estimate_transcript(&transcript)?;
        debug!(
            path = %transcript.display(),
            content_based = estimate.content_based,
            file_size_based = estimate.file_size_based,
            "context estimate"
        );
        Some(ContextUsage::from_tokens(estimate.larger_of_both()))
    }
}


/// Both token estimates for one transcript file.
pub fn estimate_transcript(path: &Path) -> Option<TokenEstimate> {
    let file_bytes = match fs::metadata(path) {
        Ok(meta) => meta.len(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot stat transcript");
            return None;
        }
    };

    let reader = match TranscriptReader::open(path) {
        Ok(reader) => reader,
        Err(e) => {
            warn!("{e}");
            return None;
        }
    };

    let mut content_chars: u64 = 0;
    for item in reader {
        match item {
            Ok(record) => content_chars += record.content_chars() as u64,
            Err(e) if e.is_line_local() => debug!("{e}"),
            Err(e) => {
                warn!("{e}");
                break;
            }
        }
    }

    Some(TokenEstimate::new(content_chars, file_bytes))
}
