//! Result aggregation for benchmark runs
//!
//! The [`Aggregator`] is a fold over the arrival stream of [`ProbeResult`]
//! values. It owns the [`RunState`] outright and is driven by the dispatch
//! loop, which is the only place results are consumed, so the totals never
//! need a lock.

use crate::{
    models::{ProbeResult, RunState, Summary},
    types::TargetInfo,
};
use tokio::time::Instant;

/// Folds probe results into running totals and produces the final summary
#[derive(Debug)]
pub struct Aggregator {
    state: RunState,
}

impl Aggregator {
    /// Start a new aggregation with the dispatch start time
    pub fn new(started_at: Instant) -> Self {
        Self {
            state: RunState::new(started_at),
        }
    }

    /// Reserve the next sequence number for a probe about to launch
    pub fn next_sequence(&mut self) -> u64 {
        self.state.launched += 1;
        self.state.launched
    }

    /// Fold one arriving result into the totals
    pub fn record(&mut self, result: &ProbeResult) {
        debug_assert!(self.state.completed < self.state.launched, "result arrived for a probe never launched");

        if result.is_failure() {
            self.state.failed += 1;
        }
        self.state.completed += 1;

        // First arrival wins, regardless of sequence number
        if self.state.document_length.is_none() {
            self.state.document_length = Some(result.bytes);
        }
        self.state.total_transferred += result.bytes;
    }

    /// Current run state
    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn launched(&self) -> u64 {
        self.state.launched
    }

    pub fn completed(&self) -> u64 {
        self.state.completed
    }

    pub fn started_at(&self) -> Instant {
        self.state.started_at
    }

    /// Every launched probe has reported
    pub fn is_drained(&self) -> bool {
        self.state.is_drained()
    }

    /// Stamp the end time and project the summary
    pub fn finish(mut self, ended_at: Instant, target: &TargetInfo, concurrency: u64) -> Summary {
        self.state.ended_at = Some(ended_at);
        Summary::from_state(&self.state, target, concurrency)
    }
}
