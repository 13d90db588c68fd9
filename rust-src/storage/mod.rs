//! Storage layer for the persisted usage summary.

mod summary_file;

pub use summary_file::save_usage_summary;
