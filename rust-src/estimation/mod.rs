//! Token and context-window estimation.

mod context;
mod tokens;

pub use context::ContextEstimator;
