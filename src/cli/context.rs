//! Command execution context
//!
//! Loads config, merges CLI overrides and wires the feed to its client and
//! store, so every command starts from the same place.

use crate::cache::{CacheStore, KeyValueStore, MemoryStore, SqliteStore, key};
use crate::cli::OutputFormat;
use crate::cli::args::GlobalOptions;
use crate::client::HttpListingClient;
use crate::config::Config;
use crate::error::Result;
use crate::feed::{AirdropFeed, FeedSettings};

/// Storage backend chosen at runtime
pub type DynStore = Box<dyn KeyValueStore>;

/// The feed as the CLI runs it
pub type CliFeed = AirdropFeed<HttpListingClient, DynStore>;

/// Context for command execution
pub struct CommandContext {
    /// Loaded configuration with CLI overrides applied
    pub config: Config,
    /// Output format after flag/config resolution
    pub format: OutputFormat,
    pub feed: CliFeed,
}

impl CommandContext {
    /// Create a context with the feed ready to bootstrap.
    ///
    /// # Errors
    /// Returns error if the config file is malformed or the base URL override
    /// is invalid. An unavailable cache is not an error; the run continues
    /// with an in-memory store.
    pub fn new(opts: &GlobalOptions) -> Result<Self> {
        let config = load_config(opts)?;
        let format = resolve_format(opts.format, &config);

        let client = HttpListingClient::with_base_url(
            &config.api_base_url,
            config.preferences.request_timeout(),
        );
        let cache_key = key::scoped(key::AIRDROPS, &config.api_base_url);
        log::debug!("Feed cache key: {}", cache_key);

        let feed = AirdropFeed::new(
            client,
            CacheStore::new(open_store(opts.no_cache)),
            cache_key,
            FeedSettings::from(&config.preferences),
        );

        Ok(Self {
            config,
            format,
            feed,
        })
    }
}

/// Load the config file and apply the `--api-url` override
pub fn load_config(opts: &GlobalOptions) -> Result<Config> {
    let mut config = Config::load_at(opts.config_ref())?;

    if let Some(url) = opts.api_url_ref() {
        config.api_base_url = url.trim().to_string();
        config.validate()?;
    }

    Ok(config)
}

/// Flag wins, then the config preference, then pretty
pub fn resolve_format(flag: Option<OutputFormat>, config: &Config) -> OutputFormat {
    if let Some(format) = flag {
        return format;
    }

    match config.preferences.format.as_deref().map(str::parse) {
        Some(Ok(format)) => format,
        Some(Err(e)) => {
            log::warn!("Ignoring format preference: {}", e);
            OutputFormat::default()
        }
        None => OutputFormat::default(),
    }
}

/// Durable store unless disabled; falls back to memory if SQLite is unavailable
pub fn open_store(no_cache: bool) -> DynStore {
    if no_cache {
        log::debug!("Cache disabled, using in-memory store");
        return Box::new(MemoryStore::new());
    }

    match SqliteStore::open() {
        Ok(store) => Box::new(store),
        Err(e) => {
            log::warn!("Cache unavailable, continuing without it: {}", e);
            Box::new(MemoryStore::new())
        }
    }
}
