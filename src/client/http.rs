//! HTTP implementation of the listing API

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client as HttpClient;
use reqwest::header::{ACCEPT, CONTENT_TYPE};

use super::ListingApi;
use super::decode;
use super::models::FetchOutcome;
use super::pagination::PageRequest;

/// Listing endpoint path, relative to the base URL
const LISTING_PATH: &str = "/api/airdrops";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client-side throttle so repeated refreshes cannot flood the site
const RATE_LIMIT_PER_SECOND: NonZeroU32 = NonZeroU32::new(5).unwrap();

/// reqwest-backed listing client
pub struct HttpListingClient {
    http: HttpClient,
    base_url: String,
    timeout: Duration,
    rate_limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl HttpListingClient {
    /// Create a client for the site at `base_url`
    pub fn with_base_url(base_url: &str, timeout: Duration) -> Self {
        let http = HttpClient::builder()
            .user_agent(concat!("airdrophunter/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|e| {
                log::warn!("Falling back to default HTTP client: {}", e);
                HttpClient::new()
            });

        let quota = Quota::per_second(RATE_LIMIT_PER_SECOND);

        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send the request and classify the response, without the timeout guard
    async fn request_page(&self, page: PageRequest) -> FetchOutcome {
        let url = format!("{}{}", self.base_url, LISTING_PATH);

        let response = match self
            .http
            .get(&url)
            .query(&page.to_query_params())
            .header(ACCEPT, "application/json")
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return transport_failure(e),
        };

        let status = response.status();
        log::debug!("Response status: {}", status);

        if let Some(outcome) = decode::check_status(status.as_u16()) {
            return outcome;
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        if let Some(outcome) = decode::check_content_type(content_type.as_deref()) {
            return outcome;
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return FetchOutcome::EmptyOrMalformed {
                    reason: format!("Failed to read response: {}", e),
                };
            }
        };

        log::debug!("Response length: {}", body.len());
        decode::decode_body(&body)
    }
}

#[async_trait]
impl ListingApi for HttpListingClient {
    async fn fetch_page(&self, page: PageRequest) -> FetchOutcome {
        self.rate_limiter.until_ready().await;

        log::debug!(
            "Fetching airdrops offset={} limit={}",
            page.offset,
            page.limit
        );

        // Dropping the request future on timeout cancels it
        match tokio::time::timeout(self.timeout, self.request_page(page)).await {
            Ok(outcome) => outcome,
            Err(_) => {
                log::warn!("Request timed out after {:?}", self.timeout);
                FetchOutcome::Timeout
            }
        }
    }
}

/// Map a transport-level reqwest error onto an outcome
fn transport_failure(err: reqwest::Error) -> FetchOutcome {
    if err.is_timeout() {
        FetchOutcome::Timeout
    } else if err.is_connect() {
        FetchOutcome::NetworkFailure {
            reason: format!("Failed to connect: {}", err),
        }
    } else {
        FetchOutcome::NetworkFailure {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn client_for(server: &mockito::Server) -> HttpListingClient {
        HttpListingClient::with_base_url(&server.url(), Duration::from_secs(5))
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = HttpListingClient::with_base_url("http://localhost:3000/", DEFAULT_TIMEOUT);
        assert_eq!(client.base_url(), "http://localhost:3000");
    }

    #[tokio::test]
    async fn test_fetch_success_sends_paging_query() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/airdrops")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("limit".into(), "12".into()),
                Matcher::UrlEncoded("offset".into(), "24".into()),
            ]))
            .match_header("accept", "application/json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success":true,"data":[{"id":"1"}],"stats":{"total":1}}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let outcome = client
            .fetch_page(PageRequest { offset: 24, limit: 12 })
            .await;

        match outcome {
            FetchOutcome::Success(page) => {
                assert_eq!(page.items, vec![json!({"id": "1"})]);
                assert_eq!(page.stats, Some(json!({"total": 1})));
            }
            other => panic!("Expected success, got {:?}", other),
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_http_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/airdrops")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":"Internal server error"}"#)
            .create_async()
            .await;

        let outcome = client_for(&server).fetch_page(PageRequest::default()).await;
        assert_eq!(
            outcome,
            FetchOutcome::NetworkFailure {
                reason: "HTTP 500".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_fetch_html_body_rejected_by_content_type() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/airdrops")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<html><body>Maintenance</body></html>")
            .create_async()
            .await;

        let outcome = client_for(&server).fetch_page(PageRequest::default()).await;
        assert_eq!(
            outcome,
            FetchOutcome::EmptyOrMalformed {
                reason: "bad content-type".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_fetch_invalid_json() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/airdrops")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("{\"success\": true, \"data\": [")
            .create_async()
            .await;

        let outcome = client_for(&server).fetch_page(PageRequest::default()).await;
        assert!(matches!(outcome, FetchOutcome::EmptyOrMalformed { .. }));
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        // Bind then drop a listener to get a port nothing listens on
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client =
            HttpListingClient::with_base_url(&format!("http://{}", addr), Duration::from_secs(5));
        let outcome = client.fetch_page(PageRequest::default()).await;
        assert!(matches!(outcome, FetchOutcome::NetworkFailure { .. }));
    }

    #[tokio::test]
    async fn test_fetch_times_out() {
        // Accepts connections but never answers
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let _server = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let client = HttpListingClient::with_base_url(
            &format!("http://{}", addr),
            Duration::from_millis(200),
        );
        let outcome = client.fetch_page(PageRequest::default()).await;
        assert_eq!(outcome, FetchOutcome::Timeout);
    }
}
