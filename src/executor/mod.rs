//! Bounded-concurrency request dispatch
//!
//! The [`Dispatcher`] keeps a fixed-size window of probes in flight. Each
//! probe runs on its own tokio task and reports exactly once on a shared
//! result channel. The dispatch loop is the only consumer of that channel
//! and the only writer of the run totals:
//! - `Filling`: the initial wave of up to `concurrency` probes is launched
//! - `Steady`: every arriving result triggers one replacement launch
//! - `Draining`: the request budget or time limit is spent; outstanding
//!   probes are awaited without launching more
//! - `Done`: every launched probe has reported

use crate::{
    client::Probe,
    error::{AppError, Result},
    logging::{LogLevel, Logger},
    models::{Config, ProbeResult, Summary},
    stats::Aggregator,
    types::TargetInfo,
};
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use std::{fmt, panic::AssertUnwindSafe, sync::Arc, time::Duration};
use tokio::{sync::mpsc, time::Instant};

/// Dispatch loop state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DispatchState {
    Filling,
    Steady,
    Draining,
    Done,
}

impl DispatchState {
    /// State after a launch opportunity, given the launched count so far
    pub fn after_launch(launched: u64, requested: u64, limit_exceeded: bool) -> Self {
        if launched >= requested || limit_exceeded {
            DispatchState::Draining
        } else {
            DispatchState::Steady
        }
    }

    /// Whether new probes may still be launched in this state
    pub fn is_launching(&self) -> bool {
        matches!(self, DispatchState::Filling | DispatchState::Steady)
    }
}

impl fmt::Display for DispatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DispatchState::Filling => "filling",
            DispatchState::Steady => "steady",
            DispatchState::Draining => "draining",
            DispatchState::Done => "done",
        };
        write!(f, "{}", name)
    }
}

/// Request budget, window size and optional time limit for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchSettings {
    pub requested: u64,
    pub concurrency: u64,
    pub time_limit: Option<Duration>,
}

impl DispatchSettings {
    pub fn new(requested: u64, concurrency: u64) -> Self {
        Self {
            requested,
            concurrency,
            time_limit: None,
        }
    }

    /// Stop launching once `limit` has elapsed; a zero limit disables it
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = (!limit.is_zero()).then_some(limit);
        self
    }

    /// Whether the time limit is enabled and has elapsed since `started`
    pub fn limit_exceeded(&self, started: Instant) -> bool {
        match self.time_limit {
            Some(limit) => started.elapsed() >= limit,
            None => false,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.requested == 0 {
            return Err(AppError::validation("Request count must be greater than zero"));
        }
        if self.concurrency == 0 {
            return Err(AppError::validation("Concurrency must be greater than zero"));
        }
        if self.requested < self.concurrency {
            return Err(AppError::validation(format!(
                "Cannot use concurrency level {} greater than total number of requests {}",
                self.concurrency, self.requested
            )));
        }
        Ok(())
    }
}

impl From<&Config> for DispatchSettings {
    fn from(config: &Config) -> Self {
        let settings = Self::new(config.requests, config.concurrency);
        match config.time_limit() {
            Some(limit) => settings.with_time_limit(limit),
            None => settings,
        }
    }
}

/// Drives probes through the in-flight window and folds their results
pub struct Dispatcher {
    probe: Arc<dyn Probe>,
    settings: DispatchSettings,
    target: TargetInfo,
    logger: Option<Arc<Logger>>,
}

impl Dispatcher {
    pub fn new(probe: Arc<dyn Probe>, target: TargetInfo, settings: DispatchSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            probe,
            settings,
            target,
            logger: None,
        })
    }

    /// Build a dispatcher from a validated configuration
    pub fn from_config(probe: Arc<dyn Probe>, config: &Config) -> Result<Self> {
        Self::new(probe, config.target()?, DispatchSettings::from(config))
    }

    pub fn with_logger(mut self, logger: Arc<Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn settings(&self) -> &DispatchSettings {
        &self.settings
    }

    /// Run to completion without observing individual results
    pub async fn run(&self) -> Result<Summary> {
        self.run_with(|_| {}).await
    }

    /// Run to completion, handing every result to `on_result` as it arrives
    pub async fn run_with<F>(&self, mut on_result: F) -> Result<Summary>
    where
        F: FnMut(&ProbeResult),
    {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut aggregator = Aggregator::new(Instant::now());
        let started = aggregator.started_at();
        let requested = self.settings.requested;

        let mut state = DispatchState::Filling;
        self.log_state(state, &aggregator).await;

        let wave = self.settings.concurrency.min(requested);
        for _ in 0..wave {
            if self.settings.limit_exceeded(started) {
                break;
            }
            self.launch(&mut aggregator, &tx).await;
        }
        state = self
            .transition(state, &aggregator, self.settings.limit_exceeded(started))
            .await;

        while !aggregator.is_drained() {
            let result = rx
                .recv()
                .await
                .ok_or_else(|| AppError::internal("Result channel closed with probes still in flight"))?;

            // Replacement goes out before the result is folded in
            if state == DispatchState::Steady {
                let exceeded = self.settings.limit_exceeded(started);
                if !exceeded && aggregator.launched() < requested {
                    self.launch(&mut aggregator, &tx).await;
                }
                state = self.transition(state, &aggregator, exceeded).await;
            }

            aggregator.record(&result);
            self.log_result(&result).await;
            on_result(&result);
        }

        state = DispatchState::Done;
        self.log_state(state, &aggregator).await;

        Ok(aggregator.finish(Instant::now(), &self.target, self.settings.concurrency))
    }

    async fn launch(&self, aggregator: &mut Aggregator, tx: &mpsc::UnboundedSender<ProbeResult>) {
        let sequence = aggregator.next_sequence();
        let probe = Arc::clone(&self.probe);
        let tx = tx.clone();

        tokio::spawn(async move {
            let start = Instant::now();
            // A panicking probe still has to free its slot
            let result = match AssertUnwindSafe(probe.probe(sequence)).catch_unwind().await {
                Ok(result) => result,
                Err(_) => ProbeResult::transport_failure(sequence, start.elapsed()),
            };
            let _ = tx.send(result);
        });

        if let Some(logger) = self.logger.as_ref().filter(|l| l.would_log(LogLevel::Trace)) {
            logger
                .trace(&format!("Launched request #{}", sequence))
                .field("sequence", sequence)
                .field("in_flight", aggregator.state().in_flight())
                .log()
                .await;
        }
    }

    async fn transition(&self, current: DispatchState, aggregator: &Aggregator, limit_exceeded: bool) -> DispatchState {
        let next = DispatchState::after_launch(aggregator.launched(), self.settings.requested, limit_exceeded);
        if next != current {
            self.log_state(next, aggregator).await;
        }
        next
    }

    async fn log_state(&self, state: DispatchState, aggregator: &Aggregator) {
        if let Some(logger) = &self.logger {
            logger
                .debug(&format!("Dispatcher entering {} state", state))
                .field("state", state)
                .field("launched", aggregator.launched())
                .field("completed", aggregator.completed())
                .field("elapsed_secs", aggregator.started_at().elapsed().as_secs_f64())
                .log()
                .await;
        }
    }

    async fn log_result(&self, result: &ProbeResult) {
        if let Some(logger) = &self.logger {
            logger
                .debug(&format!("Request #{} finished", result.sequence))
                .probe(result)
                .log()
                .await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Probe that sleeps for a fixed time and returns a fixed status
    struct FixedProbe {
        status: u16,
        bytes: u64,
        delay: Duration,
        seen: Mutex<Vec<u64>>,
    }

    impl FixedProbe {
        fn new(status: u16, bytes: u64, delay: Duration) -> Self {
            Self {
                status,
                bytes,
                delay,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Probe for FixedProbe {
        async fn probe(&self, sequence: u64) -> ProbeResult {
            self.seen.lock().unwrap().push(sequence);
            tokio::time::sleep(self.delay).await;
            ProbeResult {
                sequence,
                status: self.status,
                bytes: self.bytes,
                duration: self.delay,
            }
        }
    }

    fn target() -> TargetInfo {
        TargetInfo::parse("http://localhost:8080/").unwrap()
    }

    #[test]
    fn test_state_after_launch() {
        assert_eq!(DispatchState::after_launch(3, 10, false), DispatchState::Steady);
        assert_eq!(DispatchState::after_launch(10, 10, false), DispatchState::Draining);
        assert_eq!(DispatchState::after_launch(3, 10, true), DispatchState::Draining);
        assert!(DispatchState::Filling.is_launching());
        assert!(!DispatchState::Draining.is_launching());
        assert_eq!(DispatchState::Done.to_string(), "done");
    }

    #[test]
    fn test_settings_validation() {
        assert!(DispatchSettings::new(10, 3).validate().is_ok());
        assert!(DispatchSettings::new(0, 1).validate().is_err());
        assert!(DispatchSettings::new(5, 0).validate().is_err());
        assert!(DispatchSettings::new(2, 3).validate().is_err());
    }

    #[test]
    fn test_zero_time_limit_is_disabled() {
        let settings = DispatchSettings::new(1, 1).with_time_limit(Duration::ZERO);
        assert_eq!(settings.time_limit, None);
    }

    #[test]
    fn test_settings_from_config() {
        let mut config = Config::for_url("http://localhost/");
        config.requests = 50_000;
        config.concurrency = 4;
        config.time_limit_seconds = 2.5;

        let settings = DispatchSettings::from(&config);
        assert_eq!(settings.requested, 50_000);
        assert_eq!(settings.concurrency, 4);
        assert_eq!(settings.time_limit, Some(Duration::from_millis(2500)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_runs_every_request_once() {
        let probe = Arc::new(FixedProbe::new(200, 100, Duration::from_millis(100)));
        let dispatcher = Dispatcher::new(probe.clone(), target(), DispatchSettings::new(10, 3)).unwrap();

        let mut observed = Vec::new();
        let summary = dispatcher.run_with(|result| observed.push(result.sequence)).await.unwrap();

        assert_eq!(summary.requested, 10);
        assert_eq!(summary.completed, 10);
        assert_eq!(summary.failed, 0);
        assert_eq!(summary.total_transferred, 1000);
        assert_eq!(summary.document_length, 100);

        observed.sort_unstable();
        assert_eq!(observed, (1..=10).collect::<Vec<_>>());

        let mut seen = probe.seen.lock().unwrap().clone();
        seen.sort_unstable();
        assert_eq!(seen, (1..=10).collect::<Vec<_>>());
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_refills_in_waves() {
        let probe = Arc::new(FixedProbe::new(200, 1, Duration::from_secs(1)));
        let dispatcher = Dispatcher::new(probe, target(), DispatchSettings::new(6, 3)).unwrap();

        let summary = dispatcher.run().await.unwrap();

        // Two full waves of one second each
        assert_eq!(summary.completed, 6);
        assert!(summary.total_duration >= Duration::from_secs(2));
        assert!(summary.total_duration < Duration::from_millis(2100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_time_limit_stops_launches() {
        let probe = Arc::new(FixedProbe::new(200, 10, Duration::from_secs(10)));
        let settings = DispatchSettings::new(50_000, 2).with_time_limit(Duration::from_secs(1));
        let dispatcher = Dispatcher::new(probe, target(), settings).unwrap();

        let summary = dispatcher.run().await.unwrap();

        assert_eq!(summary.requested, 2);
        assert_eq!(summary.completed, 2);
        assert_eq!(dispatcher.settings().requested, 50_000);
        // Outstanding probes are drained, overshooting the limit
        assert!(summary.total_duration >= Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_logger_does_not_change_results() {
        let probe = Arc::new(FixedProbe::new(500, 3, Duration::from_millis(5)));
        // Quiet logger: dispatch only emits trace and debug entries
        let logger = Logger::with_config("DISPATCH".to_string(), &Config::default());

        let dispatcher = Dispatcher::new(probe, target(), DispatchSettings::new(4, 2))
            .unwrap()
            .with_logger(Arc::new(logger));

        let summary = dispatcher.run().await.unwrap();
        assert_eq!(summary.completed, 4);
        assert_eq!(summary.failed, 4);
    }
}
