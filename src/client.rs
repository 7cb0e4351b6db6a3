//! HTTP probe implementation and timing measurements

#[cfg(test)]
mod integration_tests;

use crate::{
    error::Result,
    logging::Logger,
    models::{Config, ProbeResult},
    types::TargetInfo,
};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, Url};
use std::{sync::Arc, time::Duration};
use tokio::time::Instant;

/// A single timed request against the benchmark target.
///
/// Implementations must yield exactly one [`ProbeResult`] per call and must
/// not fail: transport problems are reported through the result's status.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Issue one request tagged with `sequence`
    async fn probe(&self, sequence: u64) -> ProbeResult;
}

/// Reqwest-backed GET probe sharing one pooled client
pub struct HttpProbe {
    client: Client,
    url: Url,
    timeout: Duration,
    logger: Option<Arc<Logger>>,
}

impl HttpProbe {
    /// Create a probe for the configured target
    pub fn new(config: &Config) -> Result<Self> {
        let target = config.target()?;
        Self::with_target(&target, config.timeout(), config.concurrency)
    }

    /// Create a probe for an already parsed target
    pub fn with_target(target: &TargetInfo, timeout: Duration, concurrency: u64) -> Result<Self> {
        // No client timeout: timeouts are judged after the body completes
        let client = Client::builder()
            .user_agent(format!("{}/{}", crate::PKG_NAME, crate::VERSION))
            .pool_max_idle_per_host(usize::try_from(concurrency).unwrap_or(usize::MAX))
            .build()?;

        Ok(Self {
            client,
            url: target.as_url()?,
            timeout,
            logger: None,
        })
    }

    /// Attach a logger for transport-level diagnostics
    pub fn with_logger(mut self, logger: Arc<Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn log_failure(&self, sequence: u64, stage: &str, error: &reqwest::Error) {
        if let Some(logger) = &self.logger {
            logger
                .debug(&format!("Request #{} failed during {}: {}", sequence, stage, error))
                .field("sequence", sequence)
                .field("stage", stage)
                .field("error_kind", error_kind(error))
                .log()
                .await;
        }
    }
}

#[async_trait]
impl Probe for HttpProbe {
    async fn probe(&self, sequence: u64) -> ProbeResult {
        let start = Instant::now();

        let response = match self.client.get(self.url.clone()).send().await {
            Ok(response) => response,
            Err(e) => {
                let elapsed = start.elapsed();
                self.log_failure(sequence, "send", &e).await;
                return ProbeResult::transport_failure(sequence, elapsed);
            }
        };

        let status = response.status().as_u16();
        let mut bytes: u64 = 0;
        let mut body = response.bytes_stream();

        // Count the body without keeping it; a mid-body error keeps the
        // status and the partial count
        while let Some(chunk) = body.next().await {
            match chunk {
                Ok(chunk) => bytes += chunk.len() as u64,
                Err(e) => {
                    self.log_failure(sequence, "body read", &e).await;
                    break;
                }
            }
        }

        ProbeResult::completed(sequence, status, bytes, start.elapsed(), self.timeout)
    }
}

fn error_kind(error: &reqwest::Error) -> &'static str {
    if error.is_timeout() {
        "timeout"
    } else if error.is_connect() {
        "connect"
    } else if error.is_body() || error.is_decode() {
        "body"
    } else {
        "request"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_from_config() {
        let mut config = Config::for_url("http://127.0.0.1:9/status");
        config.timeout_seconds = 1.5;
        config.concurrency = 4;
        config.requests = 4;

        let probe = HttpProbe::new(&config).unwrap();
        assert_eq!(probe.timeout(), Duration::from_millis(1500));
        assert_eq!(probe.url.path(), "/status");
    }

    #[test]
    fn test_probe_rejects_invalid_target() {
        let config = Config::for_url("not a url");
        assert!(HttpProbe::new(&config).is_err());
    }

    #[tokio::test]
    async fn test_connection_refused_is_status_zero() {
        // Bind then drop a listener so the port is very likely closed
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let target = TargetInfo::parse(&format!("http://127.0.0.1:{}/", port)).unwrap();
        let probe = HttpProbe::with_target(&target, Duration::from_secs(5), 1).unwrap();

        let result = probe.probe(1).await;
        assert_eq!(result.sequence, 1);
        assert_eq!(result.status, 0);
        assert_eq!(result.bytes, 0);
        assert!(result.is_failure());
    }
}
