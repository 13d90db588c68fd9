//! Aggregation layer for usage statistics.

mod usage;
mod windows;

pub use usage::UsageAggregator;
