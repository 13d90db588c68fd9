//! Configuration and settings for claude-usage.

mod settings;

pub use settings::{
    Settings,
    ACTIVE_SESSION_WINDOW_SECS,
    CONTENT_CHARS_PER_TOKEN,
    CONTEXT_LIMIT,
    CONTEXT_WARNING_THRESHOLD,
    CYCLE_HOURS,
    FILE_BYTES_PER_TOKEN,
    TRANSCRIPT_EXTENSION,
};
