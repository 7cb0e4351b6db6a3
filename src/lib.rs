//! HTTP Benchmarker
//!
//! A small HTTP server benchmarking tool in the spirit of `ab`. It issues a
//! fixed number of GET requests against one target at a bounded concurrency
//! level and reports latency, throughput and error totals.
//!
//! The heart of the crate is [`executor::Dispatcher`], which keeps exactly
//! `concurrency` probes in flight, refills the window as results arrive and
//! drains outstanding work once the request budget or time limit is reached.

pub mod app;
pub mod cli;
pub mod config;
pub mod client;
pub mod error;
pub mod executor;
pub mod logging;
pub mod models;
pub mod output;
pub mod stats;
pub mod types;

// Re-export commonly used types
pub use error::{AppError, Result};
pub use models::{Config, ProbeResult, RunState, Summary};
pub use client::{HttpProbe, Probe};
pub use executor::{DispatchSettings, DispatchState, Dispatcher};
pub use stats::Aggregator;
pub use types::TargetInfo;
pub use output::{OutputFormatter, ColoredFormatter, PlainFormatter, OutputFormatterFactory};

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Default configuration values
pub mod defaults {
    pub const DEFAULT_REQUESTS: u64 = 1;
    pub const DEFAULT_CONCURRENCY: u64 = 1;
    pub const DEFAULT_TIMEOUT_SECS: f64 = 30.0;
    pub const DEFAULT_TIME_LIMIT_SECS: f64 = 0.0;
    pub const DEFAULT_ENABLE_COLOR: bool = true;

    /// Request budget used when a time limit is set. Acts as a safety cap so
    /// a run can never loop forever if the limit check lags.
    pub const TIME_LIMIT_REQUEST_CAP: u64 = 50_000;

    /// Status reported for probes that finished at or past their timeout.
    pub const REQUEST_TIMEOUT_STATUS: u16 = 408;
}
