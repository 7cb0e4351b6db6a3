//! Type definitions and aliases

use serde::{Deserialize, Serialize};
use url::Url;

// Re-export commonly used types
pub use crate::error::{AppError, Result};

/// Parsed benchmark target. Built once at startup so a malformed URL is
/// rejected before any request is sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetInfo {
    /// Full target URL as given by the user
    pub url: String,
    /// Server hostname (without brackets for IPv6 literals)
    pub host: String,
    /// Explicit port, or the scheme default
    pub port: u16,
    /// Document path
    pub path: String,
}

impl TargetInfo {
    /// Parse and validate an absolute http(s) URL
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(AppError::config("Target URL cannot be empty"));
        }

        let parsed = Url::parse(raw)
            .map_err(|e| AppError::config(format!("Invalid target URL '{}': {}", raw, e)))?;

        match parsed.scheme() {
            "http" | "https" => {}
            other => {
                return Err(AppError::config(format!(
                    "Unsupported URL scheme '{}' in '{}' (expected http or https)",
                    other, raw
                )));
            }
        }

        let host = match parsed.host() {
            Some(url::Host::Ipv6(addr)) => addr.to_string(),
            Some(host) => host.to_string(),
            None => return Err(AppError::config(format!("Target URL '{}' has no host", raw))),
        };

        let port = parsed
            .port_or_known_default()
            .ok_or_else(|| AppError::config(format!("Cannot determine port for '{}'", raw)))?;

        Ok(Self {
            url: parsed.to_string(),
            host,
            port,
            path: parsed.path().to_string(),
        })
    }

    /// Parsed form of the target URL
    pub fn as_url(&self) -> Result<Url> {
        Ok(Url::parse(&self.url)?)
    }
}

/// Outcome class of a single probe, derived from its status code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProbeOutcome {
    /// 2xx response within the timeout
    Success,
    /// Non-2xx response
    HttpError,
    /// Response completed at or after the timeout
    Timeout,
    /// Request never produced a response
    TransportError,
}

impl ProbeOutcome {
    /// Classify a reported status code
    pub fn from_status(status: u16) -> Self {
        match status {
            0 => Self::TransportError,
            crate::defaults::REQUEST_TIMEOUT_STATUS => Self::Timeout,
            200..=299 => Self::Success,
            _ => Self::HttpError,
        }
    }

    /// Whether this outcome counts toward the failed total
    pub fn is_failure(&self) -> bool {
        !matches!(self, Self::Success)
    }
}
