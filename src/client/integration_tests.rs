//! HTTP probe integration tests against mock servers

use super::*;
use std::time::Duration;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

/// Mock HTTP server for controlled probe scenarios
pub struct MockHttpServer {
    server: MockServer,
}

impl MockHttpServer {
    /// Create a new mock HTTP server
    pub async fn new() -> Self {
        let server = MockServer::start().await;
        Self { server }
    }

    /// Base URL of the mock server
    pub fn url(&self) -> String {
        self.server.uri()
    }

    /// Full URL for a path on the mock server
    pub fn target(&self, request_path: &str) -> TargetInfo {
        TargetInfo::parse(&format!("{}{}", self.url(), request_path)).unwrap()
    }

    /// Respond to GET with a fixed body and optional delay
    pub async fn mock_body(&self, request_path: &str, status: u16, body: &str, delay_ms: Option<u64>) {
        let mut template = ResponseTemplate::new(status).set_body_string(body.to_string());

        if let Some(delay) = delay_ms {
            template = template.set_delay(Duration::from_millis(delay));
        }

        Mock::given(method("GET"))
            .and(path(request_path))
            .respond_with(template)
            .mount(&self.server)
            .await;
    }

    /// Number of requests the server has seen
    pub async fn request_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or(0)
    }
}

mod http_probe_integration_tests {
    use super::*;

    #[tokio::test]
    async fn test_success_counts_body_bytes() {
        let server = MockHttpServer::new().await;
        server.mock_body("/doc", 200, &"x".repeat(100), None).await;

        let probe = HttpProbe::with_target(&server.target("/doc"), Duration::from_secs(5), 1).unwrap();
        let result = probe.probe(1).await;

        assert_eq!(result.sequence, 1);
        assert_eq!(result.status, 200);
        assert_eq!(result.bytes, 100);
        assert!(result.duration < Duration::from_secs(5));
        assert!(!result.is_failure());
    }

    #[tokio::test]
    async fn test_large_body_is_fully_read() {
        let server = MockHttpServer::new().await;
        server.mock_body("/large", 200, &"y".repeat(256 * 1024), None).await;

        let probe = HttpProbe::with_target(&server.target("/large"), Duration::from_secs(10), 1).unwrap();
        let result = probe.probe(9).await;

        assert_eq!(result.status, 200);
        assert_eq!(result.bytes, 256 * 1024);
    }

    #[tokio::test]
    async fn test_error_status_is_reported_with_bytes() {
        let server = MockHttpServer::new().await;
        server.mock_body("/missing", 404, "Not Found", None).await;

        let probe = HttpProbe::with_target(&server.target("/missing"), Duration::from_secs(5), 1).unwrap();
        let result = probe.probe(2).await;

        assert_eq!(result.status, 404);
        assert_eq!(result.bytes, 9);
        assert!(result.is_failure());
    }

    #[tokio::test]
    async fn test_slow_response_becomes_408() {
        let server = MockHttpServer::new().await;
        server.mock_body("/slow", 200, "late body", Some(300)).await;

        let probe = HttpProbe::with_target(&server.target("/slow"), Duration::from_millis(100), 1).unwrap();
        let result = probe.probe(3).await;

        // The request is allowed to finish; the timeout is judged afterwards
        assert_eq!(result.status, 408);
        assert_eq!(result.bytes, 0);
        assert!(result.duration >= Duration::from_millis(300));
        assert_eq!(server.request_count().await, 1);
    }

    #[tokio::test]
    async fn test_each_probe_sends_one_request() {
        let server = MockHttpServer::new().await;
        server.mock_body("/", 200, "ok", None).await;

        let probe = HttpProbe::with_target(&server.target("/"), Duration::from_secs(5), 2).unwrap();
        for sequence in 1..=3 {
            let result = probe.probe(sequence).await;
            assert_eq!(result.sequence, sequence);
            assert_eq!(result.status, 200);
        }

        assert_eq!(server.request_count().await, 3);
    }
}
