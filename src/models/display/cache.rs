//! Cache status display model

use serde::Serialize;
use tabled::Tabled;

use crate::cache::CacheStats;
use crate::output::formatters::{format_size, format_timestamp_ms};

/// Summary row for `cache status`
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct CacheEntryDisplay {
    #[tabled(rename = "ENTRIES")]
    pub entries: usize,

    #[tabled(rename = "SIZE")]
    pub size: String,

    #[tabled(rename = "OLDEST")]
    pub oldest: String,

    #[tabled(rename = "NEWEST")]
    pub newest: String,

    #[tabled(rename = "LOCATION")]
    pub location: String,
}

impl CacheEntryDisplay {
    pub fn new(stats: &CacheStats, location: String) -> Self {
        Self {
            entries: stats.total_items,
            size: format_size(stats.total_size),
            oldest: format_timestamp_ms(stats.oldest_item),
            newest: format_timestamp_ms(stats.newest_item),
            location,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_cache() {
        let display = CacheEntryDisplay::new(&CacheStats::default(), "memory".to_string());
        assert_eq!(display.entries, 0);
        assert_eq!(display.size, "0 bytes");
        assert_eq!(display.oldest, "never");
    }
}
