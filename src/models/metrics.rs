//! Probe results, run state and the final benchmark summary

use crate::defaults::REQUEST_TIMEOUT_STATUS;
use crate::types::{ProbeOutcome, TargetInfo};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::Instant;

/// Result of a single GET probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResult {
    /// 1-based sequence number assigned at launch
    pub sequence: u64,
    /// HTTP status code, 0 when no response was received
    pub status: u16,
    /// Body bytes read
    pub bytes: u64,
    /// Time from request start to body completion (or failure)
    #[serde(with = "duration_secs")]
    pub duration: Duration,
}

impl ProbeResult {
    /// Build a result for a completed response, applying the client-side
    /// timeout rule: elapsed at or past the timeout is reported as 408 with
    /// no bytes.
    pub fn completed(sequence: u64, status: u16, bytes: u64, elapsed: Duration, timeout: Duration) -> Self {
        if elapsed >= timeout {
            Self::timed_out(sequence, elapsed)
        } else {
            Self {
                sequence,
                status,
                bytes,
                duration: elapsed,
            }
        }
    }

    /// Result for a probe that finished at or past its timeout
    pub fn timed_out(sequence: u64, elapsed: Duration) -> Self {
        Self {
            sequence,
            status: REQUEST_TIMEOUT_STATUS,
            bytes: 0,
            duration: elapsed,
        }
    }

    /// Result for a probe that never received a response
    pub fn transport_failure(sequence: u64, elapsed: Duration) -> Self {
        Self {
            sequence,
            status: 0,
            bytes: 0,
            duration: elapsed,
        }
    }

    pub fn outcome(&self) -> ProbeOutcome {
        ProbeOutcome::from_status(self.status)
    }

    /// Whether this result counts as failed (non-2xx or no response)
    pub fn is_failure(&self) -> bool {
        self.outcome().is_failure()
    }
}

/// Running totals of a benchmark. Owned by the dispatch loop; only the
/// consumer of the result channel mutates it.
#[derive(Debug, Clone)]
pub struct RunState {
    /// Probes launched so far (also the last sequence number handed out)
    pub launched: u64,
    /// Probes whose result has been consumed
    pub completed: u64,
    /// Completed probes classified as failed
    pub failed: u64,
    /// Sum of body bytes across all completed probes
    pub total_transferred: u64,
    /// Byte count of the first result to arrive
    pub document_length: Option<u64>,
    /// Dispatch start
    pub started_at: Instant,
    /// Wall-clock dispatch start
    pub started_at_utc: DateTime<Utc>,
    /// Set when the last outstanding result has been consumed
    pub ended_at: Option<Instant>,
}

impl RunState {
    pub fn new(started_at: Instant) -> Self {
        Self {
            launched: 0,
            completed: 0,
            failed: 0,
            total_transferred: 0,
            document_length: None,
            started_at,
            started_at_utc: Utc::now(),
            ended_at: None,
        }
    }

    /// Probes launched but not yet completed
    pub fn in_flight(&self) -> u64 {
        self.launched - self.completed
    }

    /// Every launched probe has reported
    pub fn is_drained(&self) -> bool {
        self.completed == self.launched
    }

    /// Wall-clock time from start to last completion, or to now while running
    pub fn total_duration(&self) -> Duration {
        match self.ended_at {
            Some(end) => end.saturating_duration_since(self.started_at),
            None => self.started_at.elapsed(),
        }
    }
}

/// Final benchmark report handed to the output layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub host: String,
    pub port: u16,
    pub document_path: String,
    /// Size of the first body observed; `0` if nothing completed
    pub document_length: u64,
    pub concurrency: u64,
    pub started_at: DateTime<Utc>,
    #[serde(with = "duration_secs")]
    pub total_duration: Duration,
    /// Final launched count
    pub requested: u64,
    pub completed: u64,
    pub failed: u64,
    pub total_transferred: u64,
    /// `None` when the total duration is zero
    pub requests_per_second: Option<f64>,
    /// Mean seconds per request across all concurrent requests; `None` when nothing was launched
    pub time_per_request: Option<f64>,
    /// Bytes per second; `None` when the total duration is zero
    pub transfer_rate: Option<f64>,
}

impl Summary {
    /// Project a finished run state into a summary
    pub fn from_state(state: &RunState, target: &TargetInfo, concurrency: u64) -> Self {
        let total_duration = state.total_duration();
        let secs = total_duration.as_secs_f64();

        Self {
            host: target.host.clone(),
            port: target.port,
            document_path: target.path.clone(),
            document_length: state.document_length.unwrap_or(0),
            concurrency,
            started_at: state.started_at_utc,
            total_duration,
            requested: state.launched,
            completed: state.completed,
            failed: state.failed,
            total_transferred: state.total_transferred,
            requests_per_second: rate(state.launched as f64, secs),
            time_per_request: rate(secs, state.launched as f64),
            transfer_rate: rate(state.total_transferred as f64, secs),
        }
    }

    /// Completed requests that succeeded
    pub fn succeeded(&self) -> u64 {
        self.completed - self.failed
    }
}

fn rate(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator > 0.0 {
        Some(numerator / denominator)
    } else {
        None
    }
}

/// Serialize durations as fractional seconds
mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(duration.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completed_within_timeout() {
        let result = ProbeResult::completed(3, 200, 512, Duration::from_millis(100), Duration::from_secs(1));
        assert_eq!(result.sequence, 3);
        assert_eq!(result.status, 200);
        assert_eq!(result.bytes, 512);
        assert!(!result.is_failure());
    }

    #[test]
    fn test_elapsed_equal_to_timeout_is_timeout() {
        let timeout = Duration::from_millis(500);
        let result = ProbeResult::completed(1, 200, 512, timeout, timeout);
        assert_eq!(result.status, 408);
        assert_eq!(result.bytes, 0);
        assert_eq!(result.duration, timeout);
        assert_eq!(result.outcome(), ProbeOutcome::Timeout);
    }

    #[test]
    fn test_elapsed_past_timeout_overrides_error_status() {
        let result = ProbeResult::completed(1, 503, 40, Duration::from_secs(3), Duration::from_secs(2));
        assert_eq!(result.status, 408);
        assert_eq!(result.bytes, 0);
    }

    #[test]
    fn test_transport_failure() {
        let result = ProbeResult::transport_failure(7, Duration::from_millis(12));
        assert_eq!(result.status, 0);
        assert_eq!(result.bytes, 0);
        assert_eq!(result.duration, Duration::from_millis(12));
        assert!(result.is_failure());
    }

    #[test]
    fn test_summary_rates_with_zero_duration() {
        let now = Instant::now();
        let mut state = RunState::new(now);
        state.launched = 4;
        state.completed = 4;
        state.total_transferred = 400;
        state.ended_at = Some(now);

        let target = TargetInfo::parse("http://localhost/").unwrap();
        let summary = Summary::from_state(&state, &target, 2);

        assert_eq!(summary.total_duration, Duration::ZERO);
        assert_eq!(summary.requests_per_second, None);
        assert_eq!(summary.transfer_rate, None);
        assert_eq!(summary.time_per_request, Some(0.0));
    }

    #[test]
    fn test_summary_rates_with_nothing_launched() {
        let now = Instant::now();
        let mut state = RunState::new(now);
        state.ended_at = Some(now + Duration::from_secs(1));

        let target = TargetInfo::parse("http://localhost/").unwrap();
        let summary = Summary::from_state(&state, &target, 1);

        assert_eq!(summary.requests_per_second, Some(0.0));
        assert_eq!(summary.time_per_request, None);
        assert_eq!(summary.document_length, 0);
    }

    #[test]
    fn test_summary_json_shape() {
        let now = Instant::now();
        let mut state = RunState::new(now);
        state.launched = 2;
        state.completed = 2;
        state.failed = 1;
        state.total_transferred = 300;
        state.document_length = Some(150);
        state.ended_at = Some(now + Duration::from_secs(2));

        let target = TargetInfo::parse("https://example.com:8443/health").unwrap();
        let summary = Summary::from_state(&state, &target, 2);
        let json = serde_json::to_value(&summary).unwrap();

        assert_eq!(json["host"], "example.com");
        assert_eq!(json["port"], 8443);
        assert_eq!(json["document_path"], "/health");
        assert_eq!(json["total_duration"], 2.0);
        assert_eq!(json["requests_per_second"], 1.0);
        assert_eq!(json["transfer_rate"], 150.0);
        assert_eq!(summary.succeeded(), 1);
    }
}
