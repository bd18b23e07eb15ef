//! Airdrop listing API client
//!
//! Fetching is total: every failure mode (timeout, transport, status, content
//! type, body) comes back as a [`FetchOutcome`] so callers apply one fallback
//! policy instead of handling errors per call site.

use async_trait::async_trait;

pub mod decode;
pub mod http;
#[cfg(test)]
pub mod mock;
pub mod models;
pub mod pagination;

pub use http::HttpListingClient;
#[cfg(test)]
pub use mock::MockListingClient;
pub use models::{FetchOutcome, ListingPage};
pub use pagination::{DEFAULT_PAGE_SIZE, PageRequest};

/// Source of listing pages
#[async_trait]
pub trait ListingApi: Send + Sync {
    /// Fetch one page of airdrops. Never fails; see [`FetchOutcome`].
    async fn fetch_page(&self, page: PageRequest) -> FetchOutcome;
}
