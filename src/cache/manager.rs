//! Payload cache over a [`KeyValueStore`]
//!
//! Stores the last good listing response together with the time it was
//! fetched. Nothing here ever fails towards the caller: storage and
//! serialization problems are logged and treated as a miss or a no-op, since
//! the cache is disposable and the feed must keep rendering.

use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::key;
use super::store::KeyValueStore;

/// How far ahead of the local clock a stored timestamp may be and still be
/// trusted. Anything later is treated as corrupt.
pub const MAX_CLOCK_SKEW_MS: i64 = 60_000;

/// Current wall-clock time in epoch milliseconds
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Last successful listing response, as persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedPayload {
    /// Opaque airdrop records
    pub items: Vec<Value>,

    /// Opaque aggregate block
    #[serde(default)]
    pub stats: Value,

    /// When the data was fetched
    pub fetched_at_epoch_ms: i64,
}

impl CachedPayload {
    /// Age of the payload relative to `now_ms`, clamped at zero
    pub fn age_ms(&self, now_ms: i64) -> i64 {
        now_ms.saturating_sub(self.fetched_at_epoch_ms).max(0)
    }

    /// Whether the timestamp is too far in the future to be believed
    pub fn is_from_future(&self, now_ms: i64) -> bool {
        self.fetched_at_epoch_ms > now_ms.saturating_add(MAX_CLOCK_SKEW_MS)
    }
}

/// Statistics over the namespaced entries
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct CacheStats {
    pub total_items: usize,
    pub total_size: usize,
    pub oldest_item: Option<i64>,
    pub newest_item: Option<i64>,
}

/// Statistics about cache clear operation
#[derive(Debug)]
pub struct ClearStats {
    pub entries_removed: usize,
}

/// Typed cache of listing payloads
pub struct CacheStore<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> CacheStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Store `items` and `stats` under `key`, stamped with the current time.
    pub fn write(&mut self, key: &str, items: &[Value], stats: &Value) {
        self.write_at(key, items, stats, now_ms());
    }

    /// Store a payload stamped with `now_ms`.
    ///
    /// The stored timestamp never moves backwards within
    /// [`MAX_CLOCK_SKEW_MS`]: if the entry records a slightly later fetch
    /// time (clock skew between processes), that time is kept. A timestamp
    /// further ahead than that is replaced.
    pub fn write_at(&mut self, key: &str, items: &[Value], stats: &Value, now_ms: i64) {
        let fetched_at_epoch_ms = match self.read(key) {
            Some(existing)
                if existing.fetched_at_epoch_ms > now_ms && !existing.is_from_future(now_ms) =>
            {
                existing.fetched_at_epoch_ms
            }
            _ => now_ms,
        };

        let payload = CachedPayload {
            items: items.to_vec(),
            stats: stats.clone(),
            fetched_at_epoch_ms,
        };
        self.put_payload(key, &payload);
    }

    /// Store a fully formed payload as-is
    pub fn put_payload(&mut self, key: &str, payload: &CachedPayload) {
        let json = match serde_json::to_string(payload) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Cache serialize failed for {}: {}", key, e);
                return;
            }
        };

        if let Err(e) = self.store.set(key, &json) {
            log::warn!("Cache write failed for {}: {}", key, e);
        }
    }

    /// Read the payload under `key`; missing or unreadable entries are `None`
    pub fn read(&self, key: &str) -> Option<CachedPayload> {
        let raw = match self.store.get(key) {
            Ok(raw) => raw?,
            Err(e) => {
                log::warn!("Cache read failed for {}: {}", key, e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(payload) => Some(payload),
            Err(e) => {
                log::warn!("Cache parse error for {}: {}", key, e);
                None
            }
        }
    }

    /// Whether the entry is older than `threshold` (absent counts as stale)
    pub fn is_stale(&self, key: &str, threshold: Duration) -> bool {
        self.is_stale_at(key, threshold, now_ms())
    }

    /// [`Self::is_stale`] evaluated at an explicit time.
    ///
    /// A timestamp implausibly far in the future also counts as stale.
    pub fn is_stale_at(&self, key: &str, threshold: Duration, now_ms: i64) -> bool {
        match self.read(key) {
            None => true,
            Some(payload) if payload.is_from_future(now_ms) => {
                log::debug!(
                    "Cache entry {} stamped {} is ahead of the clock",
                    key,
                    payload.fetched_at_epoch_ms
                );
                true
            }
            Some(payload) => {
                let threshold_ms = i64::try_from(threshold.as_millis()).unwrap_or(i64::MAX);
                payload.age_ms(now_ms) > threshold_ms
            }
        }
    }

    /// Remove one entry
    pub fn clear(&mut self, key: &str) {
        if let Err(e) = self.store.remove(key) {
            log::warn!("Cache clear failed for {}: {}", key, e);
        }
    }

    /// Remove every namespaced entry
    pub fn clear_all(&mut self) -> ClearStats {
        let keys = self.namespaced_keys();
        let mut entries_removed = 0;

        for k in &keys {
            match self.store.remove(k) {
                Ok(()) => entries_removed += 1,
                Err(e) => log::warn!("Cache clear failed for {}: {}", k, e),
            }
        }

        ClearStats { entries_removed }
    }

    /// Size and age bounds of the namespaced entries
    pub fn stats(&self) -> CacheStats {
        let mut stats = CacheStats::default();

        for k in self.namespaced_keys() {
            let Ok(Some(raw)) = self.store.get(&k) else {
                continue;
            };

            stats.total_items += 1;
            stats.total_size += raw.len();

            // Unparseable entries still count towards size
            if let Ok(payload) = serde_json::from_str::<CachedPayload>(&raw) {
                let ts = payload.fetched_at_epoch_ms;
                stats.oldest_item = Some(stats.oldest_item.map_or(ts, |o| o.min(ts)));
                stats.newest_item = Some(stats.newest_item.map_or(ts, |n| n.max(ts)));
            }
        }

        stats
    }

    fn namespaced_keys(&self) -> Vec<String> {
        match self.store.keys() {
            Ok(keys) => keys.into_iter().filter(|k| key::is_namespaced(k)).collect(),
            Err(e) => {
                log::warn!("Cache key listing failed: {}", e);
                Vec::new()
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::storage::SqliteStore;
    use crate::cache::store::MemoryStore;
    use crate::error::CacheError;
    use serde_json::json;
    use tempfile::TempDir;

    const KEY: &str = "airdrophunter_airdrops";

    fn memory_cache() -> CacheStore<MemoryStore> {
        CacheStore::new(MemoryStore::new())
    }

    /// Store whose every operation fails
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> std::result::Result<Option<String>, CacheError> {
            Err(CacheError::Io("disk gone".to_string()))
        }
        fn set(&mut self, _key: &str, _value: &str) -> std::result::Result<(), CacheError> {
            Err(CacheError::Io("quota exceeded".to_string()))
        }
        fn remove(&mut self, _key: &str) -> std::result::Result<(), CacheError> {
            Err(CacheError::Io("disk gone".to_string()))
        }
        fn keys(&self) -> std::result::Result<Vec<String>, CacheError> {
            Err(CacheError::Io("disk gone".to_string()))
        }
    }

    #[test]
    fn test_write_read_roundtrip() {
        let mut cache = memory_cache();
        let items = vec![json!({"id": "1", "name": "LayerZero"}), json!({"id": "2"})];
        let stats = json!({"total": 2, "active": 1});

        cache.write(KEY, &items, &stats);

        let payload = cache.read(KEY).unwrap();
        assert_eq!(payload.items, items);
        assert_eq!(payload.stats, stats);
    }

    #[test]
    fn test_roundtrip_on_sqlite() {
        let dir = TempDir::new().unwrap();
        let mut cache = CacheStore::new(SqliteStore::open_at(dir.path()).unwrap());
        let items = vec![json!({"id": "7", "networks": ["Ethereum"]})];

        cache.write(KEY, &items, &json!({"total": 1}));

        let payload = cache.read(KEY).unwrap();
        assert_eq!(payload.items, items);
        assert_eq!(payload.stats, json!({"total": 1}));
    }

    #[test]
    fn test_serialized_shape() {
        let mut cache = memory_cache();
        cache.write_at(KEY, &[json!({"id": "1"})], &json!({}), 42);

        let raw = cache.store_mut().get(KEY).unwrap().unwrap();
        let value: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["fetchedAtEpochMs"], json!(42));
        assert!(value["items"].is_array());
    }

    #[test]
    fn test_read_missing_is_none() {
        let cache = memory_cache();
        assert!(cache.read(KEY).is_none());
    }

    #[test]
    fn test_read_corrupt_is_none() {
        let mut cache = memory_cache();
        cache.store_mut().set(KEY, "{not json").unwrap();
        assert!(cache.read(KEY).is_none());

        // Valid JSON but items is not an array
        cache
            .store_mut()
            .set(KEY, r#"{"items": "nope", "fetchedAtEpochMs": 1}"#)
            .unwrap();
        assert!(cache.read(KEY).is_none());
    }

    #[test]
    fn test_write_overwrites_and_advances_timestamp() {
        let mut cache = memory_cache();
        cache.write_at(KEY, &[json!({"id": "1"})], &json!({}), 1_000);
        cache.write_at(KEY, &[json!({"id": "2"})], &json!({}), 5_000);

        let payload = cache.read(KEY).unwrap();
        assert_eq!(payload.items, vec![json!({"id": "2"})]);
        assert_eq!(payload.fetched_at_epoch_ms, 5_000);
    }

    #[test]
    fn test_write_never_moves_timestamp_backwards() {
        let mut cache = memory_cache();
        cache.write_at(KEY, &[json!({"id": "1"})], &json!({}), 9_000);
        cache.write_at(KEY, &[json!({"id": "2"})], &json!({}), 3_000);

        let payload = cache.read(KEY).unwrap();
        assert_eq!(payload.items, vec![json!({"id": "2"})]);
        assert_eq!(payload.fetched_at_epoch_ms, 9_000);
    }

    #[test]
    fn test_absent_is_stale() {
        let cache = memory_cache();
        assert!(cache.is_stale(KEY, Duration::from_secs(3600)));
    }

    #[test]
    fn test_stale_threshold_law() {
        let mut cache = memory_cache();
        let now = 1_000_000;
        let age_ms = 200_000;
        cache.write_at(KEY, &[json!({"id": "1"})], &json!({}), now - age_ms);

        // Stale exactly when threshold < age
        assert!(cache.is_stale_at(KEY, Duration::from_millis(150_000), now));
        assert!(cache.is_stale_at(KEY, Duration::from_millis(199_999), now));
        assert!(!cache.is_stale_at(KEY, Duration::from_millis(200_000), now));
        assert!(!cache.is_stale_at(KEY, Duration::from_millis(250_000), now));
    }

    #[test]
    fn test_fresh_write_is_not_stale() {
        let mut cache = memory_cache();
        cache.write(KEY, &[json!({"id": "1"})], &json!({}));
        assert!(!cache.is_stale(KEY, Duration::from_secs(150)));
    }

    #[test]
    fn test_clear_then_read_absent() {
        let mut cache = memory_cache();
        cache.write(KEY, &[json!({"id": "1"})], &json!({}));
        cache.clear(KEY);
        assert!(cache.read(KEY).is_none());

        // Clearing again is fine
        cache.clear(KEY);
        cache.clear("airdrophunter_never_written");
    }

    #[test]
    fn test_clear_all_only_touches_namespace() {
        let mut cache = memory_cache();
        cache.write("airdrophunter_a", &[json!({})], &json!({}));
        cache.write("airdrophunter_b", &[json!({})], &json!({}));
        cache.store_mut().set("other_app", "keep me").unwrap();

        let cleared = cache.clear_all();
        assert_eq!(cleared.entries_removed, 2);
        assert!(cache.read("airdrophunter_a").is_none());
        assert!(cache.read("airdrophunter_b").is_none());
        assert_eq!(
            cache.store_mut().get("other_app").unwrap(),
            Some("keep me".to_string())
        );
    }

    #[test]
    fn test_stats() {
        let mut cache = memory_cache();
        cache.write_at("airdrophunter_a", &[json!({})], &json!({}), 100);
        cache.write_at("airdrophunter_b", &[json!({})], &json!({}), 300);
        cache.store_mut().set("airdrophunter_junk", "xyz").unwrap();
        cache.store_mut().set("elsewhere", "ignored").unwrap();

        let stats = cache.stats();
        assert_eq!(stats.total_items, 3);
        assert!(stats.total_size > 3);
        assert_eq!(stats.oldest_item, Some(100));
        assert_eq!(stats.newest_item, Some(300));
    }

    #[test]
    fn test_empty_stats() {
        let cache = memory_cache();
        assert_eq!(cache.stats(), CacheStats::default());
    }

    #[test]
    fn test_failing_store_never_raises() {
        let mut cache = CacheStore::new(BrokenStore);

        cache.write(KEY, &[json!({"id": "1"})], &json!({}));
        assert!(cache.read(KEY).is_none());
        assert!(cache.is_stale(KEY, Duration::from_secs(1)));
        cache.clear(KEY);
        assert_eq!(cache.clear_all().entries_removed, 0);
        assert_eq!(cache.stats(), CacheStats::default());
    }

    #[test]
    fn test_age_ms_clamps() {
        let payload = CachedPayload {
            items: vec![],
            stats: Value::Null,
            fetched_at_epoch_ms: 1_000,
        };
        assert_eq!(payload.age_ms(3_500), 2_500);
        assert_eq!(payload.age_ms(500), 0);

        let ancient = CachedPayload {
            fetched_at_epoch_ms: i64::MIN,
            ..payload
        };
        assert_eq!(ancient.age_ms(1_000), i64::MAX);
    }

    #[test]
    fn test_extreme_timestamps_do_not_overflow() {
        let mut cache = memory_cache();
        cache
            .store_mut()
            .set(
                KEY,
                r#"{"items":[{"id":"1"}],"stats":{},"fetchedAtEpochMs":-9223372036854775808}"#,
            )
            .unwrap();
        assert!(cache.is_stale_at(KEY, Duration::from_secs(150), 1_700_000_000_000));

        cache
            .store_mut()
            .set(
                KEY,
                r#"{"items":[{"id":"1"}],"stats":{},"fetchedAtEpochMs":9223372036854775807}"#,
            )
            .unwrap();
        assert!(cache.is_stale_at(KEY, Duration::from_secs(150), i64::MIN));
        assert!(cache.is_stale_at(KEY, Duration::from_secs(150), 1_700_000_000_000));
    }

    #[test]
    fn test_small_skew_is_fresh() {
        let mut cache = memory_cache();
        cache.write_at(KEY, &[json!({"id": "1"})], &json!({}), 10_000 + MAX_CLOCK_SKEW_MS);
        assert!(!cache.is_stale_at(KEY, Duration::from_secs(150), 10_000));
    }

    #[test]
    fn test_far_future_timestamp_is_replaced() {
        let mut cache = memory_cache();
        let now = 1_700_000_000_000;
        let far_future = now + 365 * 24 * 3600 * 1000;
        cache.write_at(KEY, &[json!({"id": "1"})], &json!({}), far_future);
        assert!(cache.is_stale_at(KEY, Duration::from_secs(150), now));

        cache.write_at(KEY, &[json!({"id": "2"})], &json!({}), now);

        let payload = cache.read(KEY).unwrap();
        assert_eq!(payload.items, vec![json!({"id": "2"})]);
        assert_eq!(payload.fetched_at_epoch_ms, now);
        assert!(!cache.is_stale_at(KEY, Duration::from_secs(150), now));
    }
}
