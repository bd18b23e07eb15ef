//! Resilient airdrop feed
//!
//! Serves the listing to a view with a degrade-not-crash policy: last known
//! good cache first, then the network, then a built-in emergency dataset. The
//! view always has something to render; failures show up only as an error
//! string next to usable data.
//!
//! ```text
//! Bootstrapping ─hit─▶ ServingCache{stale} ─background ok─▶ ServingLive
//!       │                          └─background fails─▶ (unchanged)
//!       └─miss─▶ fetch ─ok─▶ ServingLive
//!                      └─fail─▶ ServingEmergencyFallback
//! ```
//!
//! Overlapping fetches are not coalesced: each applies its result when it
//! resolves, so the last response to arrive wins.

pub mod fallback;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tokio::task::JoinHandle;

use crate::cache::manager::now_ms;
use crate::cache::{CacheStats, CacheStore, CacheWindows, ClearStats, KeyValueStore};
use crate::client::{DEFAULT_PAGE_SIZE, FetchOutcome, ListingApi, ListingPage, PageRequest};
use crate::config::Preferences;

use fallback::{emergency_airdrops, emergency_stats, source};

/// Where the feed currently gets its data from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FeedPhase {
    /// Nothing served yet
    Bootstrapping,
    /// Serving the persisted payload; `refreshing` while a background fetch runs
    ServingCache { stale: bool, refreshing: bool },
    /// Serving a response fetched during this session
    ServingLive,
    /// Serving the built-in dataset
    ServingEmergencyFallback,
}

/// Everything a view needs to render the feed
#[derive(Debug, Clone, Serialize)]
pub struct FeedSnapshot {
    pub airdrops: Vec<Value>,
    pub stats: Value,
    pub loading: bool,
    pub error: Option<String>,
    pub is_stale: bool,
    pub last_fetch: Option<i64>,
    pub has_more: bool,
    /// Total number of airdrops, when the server reported one
    pub total: Option<u64>,
    pub data_source: String,
    pub phase: FeedPhase,
}

/// Tunables for the feed
#[derive(Debug, Clone)]
pub struct FeedSettings {
    pub page_size: usize,
    pub stale_after: Duration,
    pub background_refresh: bool,
    pub background_delay: Duration,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            stale_after: CacheWindows::AIRDROPS_STALE,
            background_refresh: true,
            background_delay: Duration::from_secs(1),
        }
    }
}

impl From<&Preferences> for FeedSettings {
    fn from(prefs: &Preferences) -> Self {
        Self {
            page_size: prefs.page_size,
            stale_after: prefs.stale_after(),
            background_refresh: prefs.background_refresh,
            background_delay: prefs.background_delay(),
        }
    }
}

/// Whether a fetch may show a loading indicator and surface errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FetchMode {
    Foreground,
    Background,
}

/// Mutable view state
struct FeedState {
    snapshot: FeedSnapshot,
    /// Offset of the last page appended
    offset: usize,
}

/// The feed controller. Cheap to clone; clones share state.
pub struct AirdropFeed<C, S: KeyValueStore> {
    client: Arc<C>,
    cache: Arc<Mutex<CacheStore<S>>>,
    state: Arc<Mutex<FeedState>>,
    cache_key: String,
    settings: FeedSettings,
}

impl<C, S: KeyValueStore> Clone for AirdropFeed<C, S> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            cache: Arc::clone(&self.cache),
            state: Arc::clone(&self.state),
            cache_key: self.cache_key.clone(),
            settings: self.settings.clone(),
        }
    }
}

impl<C, S> AirdropFeed<C, S>
where
    C: ListingApi + 'static,
    S: KeyValueStore + 'static,
{
    /// Create a feed that starts out showing the built-in dataset.
    pub fn new(
        client: C,
        cache: CacheStore<S>,
        cache_key: impl Into<String>,
        settings: FeedSettings,
    ) -> Self {
        let snapshot = FeedSnapshot {
            airdrops: emergency_airdrops(),
            stats: emergency_stats(),
            loading: true,
            error: None,
            is_stale: false,
            last_fetch: None,
            has_more: true,
            total: None,
            data_source: source::EMERGENCY.to_string(),
            phase: FeedPhase::Bootstrapping,
        };

        Self {
            client: Arc::new(client),
            cache: Arc::new(Mutex::new(cache)),
            state: Arc::new(Mutex::new(FeedState {
                snapshot,
                offset: 0,
            })),
            cache_key: cache_key.into(),
            settings,
        }
    }

    /// Current view of the feed
    pub fn snapshot(&self) -> FeedSnapshot {
        self.lock_state().snapshot.clone()
    }

    /// Serve cached data if there is any, otherwise fetch the first page.
    ///
    /// When the cache is stale and background refresh is enabled, one
    /// refresh is spawned and its handle returned; the cached data is already
    /// exposed by the time this returns.
    pub async fn bootstrap(&self) -> Option<JoinHandle<()>> {
        let cached = self.lock_cache().read(&self.cache_key);

        let Some(payload) = cached.filter(|p| !p.items.is_empty()) else {
            log::info!("No cached airdrops, fetching from API");
            self.fetch_first_page(FetchMode::Foreground).await;
            return None;
        };

        let stale = self
            .lock_cache()
            .is_stale(&self.cache_key, self.settings.stale_after);
        let refreshing = stale && self.settings.background_refresh;

        log::info!(
            "Using cached data ({} airdrops, stale: {})",
            payload.items.len(),
            stale
        );

        {
            let mut state = self.lock_state();
            let page = PageRequest::first(self.settings.page_size);
            let snap = &mut state.snapshot;

            snap.has_more = page.is_full(payload.items.len());
            snap.airdrops = payload.items;
            snap.stats = non_null_or_emergency(payload.stats);
            snap.last_fetch = Some(payload.fetched_at_epoch_ms);
            snap.total = None;
            snap.data_source = source::CACHE.to_string();
            snap.loading = false;
            snap.is_stale = stale;
            snap.phase = FeedPhase::ServingCache { stale, refreshing };
            state.offset = 0;
        }

        if !refreshing {
            return None;
        }

        log::info!("Cache is stale, refreshing in background");
        let feed = self.clone();
        let delay = self.settings.background_delay;
        Some(tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            feed.fetch_first_page(FetchMode::Background).await;
        }))
    }

    /// Foreground re-fetch of the first page, whatever the cache holds.
    pub async fn refresh(&self) {
        self.fetch_first_page(FetchMode::Foreground).await;
    }

    /// Append the next page.
    ///
    /// On failure the loaded items stay as they are; `has_more` turns false
    /// and the error is reported until the next call.
    pub async fn load_more(&self) {
        let page = {
            let mut state = self.lock_state();
            state.snapshot.loading = true;
            state.snapshot.error = None;
            PageRequest {
                offset: state.offset,
                limit: self.settings.page_size,
            }
            .next()
        };

        let outcome = self.client.fetch_page(page).await;

        let mut state = self.lock_state();
        match outcome {
            FetchOutcome::Success(listing) => {
                log::debug!(
                    "Loaded {} more airdrops at offset {}",
                    listing.items.len(),
                    page.offset
                );
                state.snapshot.has_more = page.is_full(listing.items.len());
                if listing.total.is_some() {
                    state.snapshot.total = listing.total;
                }
                state.snapshot.airdrops.extend(listing.items);
                state.snapshot.error = None;
                state.offset = page.offset;
            }
            other => {
                let reason = other.failure_reason().unwrap_or_default();
                log::warn!("Load more failed: {}", reason);
                state.snapshot.error = Some(format!("API Error: {}", reason));
                state.snapshot.has_more = false;
            }
        }
        state.snapshot.loading = false;
    }

    /// Drop every cached entry and fall back to the built-in dataset.
    ///
    /// Does not fetch; the next `refresh` repopulates.
    pub fn clear_cache(&self) -> ClearStats {
        let cleared = self.lock_cache().clear_all();
        log::info!("Cleared {} cache entries", cleared.entries_removed);

        let mut state = self.lock_state();
        let snap = &mut state.snapshot;
        snap.airdrops = emergency_airdrops();
        snap.stats = emergency_stats();
        snap.last_fetch = None;
        snap.is_stale = true;
        snap.has_more = false;
        snap.total = None;
        snap.data_source = source::EMERGENCY.to_string();
        snap.phase = FeedPhase::ServingEmergencyFallback;
        state.offset = 0;

        cleared
    }

    /// Statistics of the underlying cache
    pub fn cache_stats(&self) -> CacheStats {
        self.lock_cache().stats()
    }

    async fn fetch_first_page(&self, mode: FetchMode) {
        if mode == FetchMode::Foreground {
            let mut state = self.lock_state();
            state.snapshot.loading = true;
            state.snapshot.error = None;
        }

        let page = PageRequest::first(self.settings.page_size);
        log::debug!("{:?} fetch starting", mode);

        match self.client.fetch_page(page).await {
            FetchOutcome::Success(listing) => self.apply_live(page, listing, mode),
            other => {
                let reason = other.failure_reason().unwrap_or_default();
                match mode {
                    FetchMode::Foreground => self.apply_emergency(&reason),
                    FetchMode::Background => self.keep_cached(&reason),
                }
            }
        }
    }

    fn apply_live(&self, page: PageRequest, listing: ListingPage, mode: FetchMode) {
        let count = listing.items.len();
        let stats = listing
            .stats
            .map(non_null_or_emergency)
            .unwrap_or_else(emergency_stats);

        self.lock_cache()
            .write(&self.cache_key, &listing.items, &stats);

        log::info!(
            "Fetched {} airdrops (source: {})",
            count,
            listing.data_source.as_deref().unwrap_or(source::API)
        );

        let mut state = self.lock_state();
        let snap = &mut state.snapshot;
        snap.airdrops = listing.items;
        snap.stats = stats;
        snap.last_fetch = Some(now_ms());
        snap.is_stale = false;
        snap.data_source = listing
            .data_source
            .unwrap_or_else(|| source::API.to_string());
        snap.error = None;
        snap.has_more = page.is_full(count);
        snap.total = listing.total;
        snap.phase = FeedPhase::ServingLive;
        if mode == FetchMode::Foreground {
            snap.loading = false;
        }
        state.offset = 0;
    }

    fn apply_emergency(&self, reason: &str) {
        log::warn!("Fetch failed, using emergency fallback data: {}", reason);

        let mut state = self.lock_state();
        let snap = &mut state.snapshot;
        snap.airdrops = emergency_airdrops();
        snap.stats = emergency_stats();
        snap.last_fetch = Some(now_ms());
        snap.data_source = source::EMERGENCY_FALLBACK.to_string();
        snap.error = Some(format!("API Error: {}", reason));
        snap.has_more = false;
        snap.total = None;
        snap.loading = false;
        snap.phase = FeedPhase::ServingEmergencyFallback;
        state.offset = 0;
    }

    fn keep_cached(&self, reason: &str) {
        log::warn!("Background refresh failed, keeping cached data: {}", reason);

        let mut state = self.lock_state();
        if let FeedPhase::ServingCache { stale, .. } = state.snapshot.phase {
            state.snapshot.phase = FeedPhase::ServingCache {
                stale,
                refreshing: false,
            };
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, FeedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_cache(&self) -> MutexGuard<'_, CacheStore<S>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn non_null_or_emergency(stats: Value) -> Value {
    if stats.is_null() { emergency_stats() } else { stats }
}
