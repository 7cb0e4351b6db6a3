//! Data models and structures for the HTTP benchmarker

pub mod config;
pub mod metrics;

// Re-export main model types
pub use config::Config;
pub use metrics::{ProbeResult, RunState, Summary};
