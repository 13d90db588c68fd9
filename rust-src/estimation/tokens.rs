//! Heuristic token estimates.

use crate::config::{CONTENT_CHARS_PER_TOKEN, FILE_BYTES_PER_TOKEN};


/// Tokens for a given amount of visible text.
pub fn content_based_tokens(content_chars: u64) -> u64 {
    content_chars / CONTENT_CHARS_PER_TOKEN
}


/// Tokens for a whole transcript file, JSON structure included.
pub fn file_size_based_tokens(file_bytes: u64) -> u64 {
    file_bytes / FILE_BYTES_PER_TOKEN
}


/// Both estimates for one transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenEstimate {
    pub content_based: u64,
    pub file_size_based: u64,
}


impl TokenEstimate {
    pub fn new(content_chars: u64, file_bytes: u64) -> Self {
        Self {
            content_based: content_based_tokens(content_chars),
            file_size_based: file_size_based_tokens(file_bytes),
        }
    }

    /// Combination rule: the larger estimate wins, so missed content never
    /// undercounts.
    pub fn larger_of_both(&self) -> u64 {
        self.content_based.max(self.file_size_based)
    }
}
