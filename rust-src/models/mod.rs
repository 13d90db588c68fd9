//! Data models for transcripts, sessions and usage summaries.

pub mod lenient;
mod session;
mod transcript;
mod usage;

pub use session::Session;
pub use transcript::{ModelFamily, RecordKind, TranscriptRecord};
pub use usage::{round_to, ContextUsage, UsageSummary};
