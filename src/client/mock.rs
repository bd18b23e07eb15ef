//! Mock listing client for testing
//!
//! Plays back scripted outcomes without touching the network.

use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use super::ListingApi;
use super::models::{FetchOutcome, ListingPage};
use super::pagination::PageRequest;

/// Mock API client for testing.
///
/// Queue outcomes with the builder methods; once the queue is empty every
/// call fails with a network error.
///
/// # Example
/// ```ignore
/// let mock = MockListingClient::new()
///     .then_items(sample_items(12))
///     .then(FetchOutcome::Timeout);
/// ```
pub struct MockListingClient {
    /// Outcomes to return, in order
    script: Arc<Mutex<VecDeque<Scripted>>>,
    /// Every page requested, in call order
    requests: Arc<Mutex<Vec<PageRequest>>>,
}

/// One scripted response with an optional delay before it resolves
struct Scripted {
    outcome: FetchOutcome,
    delay: Option<Duration>,
}

impl Default for MockListingClient {
    fn default() -> Self {
        Self {
            script: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl MockListingClient {
    /// Create a mock whose every call fails with a network error.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an outcome for the next unanswered call.
    pub fn then(self, outcome: FetchOutcome) -> Self {
        self.push(outcome, None)
    }

    /// Queue an outcome that resolves only after `delay`.
    pub fn then_delayed(self, outcome: FetchOutcome, delay: Duration) -> Self {
        self.push(outcome, Some(delay))
    }

    /// Queue a successful page of `items` with a `{total}` stats block.
    pub fn then_items(self, items: Vec<Value>) -> Self {
        let stats = json!({ "total": items.len() });
        self.then(success(items, Some(stats)))
    }

    /// Pages requested so far.
    pub async fn requests(&self) -> Vec<PageRequest> {
        self.requests.lock().await.clone()
    }

    /// Number of calls made so far.
    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }

    fn push(self, outcome: FetchOutcome, delay: Option<Duration>) -> Self {
        // Builders run before the mock is shared, so the lock is uncontended
        self.script
            .try_lock()
            .expect("mock script locked during setup")
            .push_back(Scripted { outcome, delay });
        self
    }
}

#[async_trait]
impl ListingApi for MockListingClient {
    async fn fetch_page(&self, page: PageRequest) -> FetchOutcome {
        self.requests.lock().await.push(page);

        let next = self.script.lock().await.pop_front();
        match next {
            Some(Scripted { outcome, delay }) => {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                outcome
            }
            None => FetchOutcome::NetworkFailure {
                reason: "mock network unreachable".to_string(),
            },
        }
    }
}

/// Build a successful outcome
pub fn success(items: Vec<Value>, stats: Option<Value>) -> FetchOutcome {
    FetchOutcome::Success(ListingPage {
        items,
        stats,
        data_source: Some("mock".to_string()),
        total: None,
    })
}

/// `count` distinct airdrop records with ids starting at `first_id`
pub fn sample_items(first_id: usize, count: usize) -> Vec<Value> {
    (first_id..first_id + count)
        .map(|id| json!({ "id": id.to_string(), "name": format!("Airdrop {}", id) }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_script_then_fallback() {
        let mock = MockListingClient::new()
            .then_items(sample_items(1, 2))
            .then(FetchOutcome::Timeout);

        assert!(matches!(
            mock.fetch_page(PageRequest::default()).await,
            FetchOutcome::Success(_)
        ));
        assert_eq!(
            mock.fetch_page(PageRequest::default()).await,
            FetchOutcome::Timeout
        );
        assert!(matches!(
            mock.fetch_page(PageRequest::default()).await,
            FetchOutcome::NetworkFailure { .. }
        ));
        assert_eq!(mock.call_count().await, 3);
    }

    #[tokio::test]
    async fn test_records_requests() {
        let mock = MockListingClient::new();
        let page = PageRequest { offset: 12, limit: 12 };
        mock.fetch_page(page).await;
        assert_eq!(mock.requests().await, vec![page]);
    }

    #[test]
    fn test_sample_items_ids() {
        let items = sample_items(13, 2);
        assert_eq!(items[0]["id"], "13");
        assert_eq!(items[1]["id"], "14");
    }
}
