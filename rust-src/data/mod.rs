//! Data access layer for Claude Code transcripts.

mod analyzer;
mod reader;
mod scanner;
mod timestamp;

pub use analyzer::SessionAnalyzer;
pub use reader::TranscriptReader;
pub use scanner::TranscriptScanner;
