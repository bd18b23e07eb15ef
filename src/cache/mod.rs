//! Local cache for the airdrop listing
//!
//! A typed payload cache ([`CacheStore`]) over a pluggable key-value store.
//! The durable store is SQLite in the user's cache directory; an in-memory
//! store stands in for `--no-cache` runs and tests.

pub mod key;
pub mod manager;
pub mod storage;
pub mod store;

use std::time::Duration;

/// Staleness windows used by the feed
pub struct CacheWindows;

impl CacheWindows {
    /// Cached listing older than this triggers a background refresh
    pub const AIRDROPS_STALE: Duration = Duration::from_millis(150_000); // 2.5 min
}

// Re-export main types
pub use manager::{CacheStats, CacheStore, CachedPayload, ClearStats};
pub use storage::SqliteStore;
pub use store::{KeyValueStore, MemoryStore};
