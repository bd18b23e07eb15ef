//! Status command implementation

use colored::Colorize;

use crate::cache::{CacheStore, SqliteStore, key};
use crate::cli::args::GlobalOptions;
use crate::cli::context::{load_config, open_store};
use crate::config::{Config, DEFAULT_API_BASE_URL};
use crate::error::Result;
use crate::output::formatters::{format_age, format_size};

/// Display configuration and cache status
pub fn run(opts: &GlobalOptions) -> Result<()> {
    println!("{}\n", "AirdropHunter Status".bold());

    let config_path = Config::resolve_path(opts.config_ref())?;
    if config_path.exists() {
        println!("Config file: {}", config_path.display().to_string().cyan());
    } else {
        println!(
            "{} No config file at {} (using defaults)",
            "○".dimmed(),
            config_path.display()
        );
        println!("  → Run 'airdrophunter init' to create one");
    }

    let config = match load_config(opts) {
        Ok(config) => config,
        Err(e) => {
            println!("{} Configuration invalid: {}", "✗".red(), e);
            println!();
            return Ok(());
        }
    };

    println!();
    if config.api_base_url == DEFAULT_API_BASE_URL {
        println!("{} API: {}", "✓".green(), config.api_base_url);
    } else {
        println!(
            "{} Custom API: {}",
            "○".dimmed(),
            config.api_base_url.cyan()
        );
    }

    let prefs = &config.preferences;
    println!(
        "{} Page size {}, stale after {}s, timeout {}s",
        "✓".green(),
        prefs.page_size,
        prefs.stale_after_secs,
        prefs.request_timeout_secs
    );
    if prefs.background_refresh {
        println!(
            "{} Background refresh after {}ms",
            "✓".green(),
            prefs.background_delay_ms
        );
    } else {
        println!("{} Background refresh disabled", "○".dimmed());
    }

    println!();
    if opts.no_cache {
        println!("{} Cache disabled for this run", "○".dimmed());
    } else {
        if let Ok(dir) = SqliteStore::cache_dir() {
            println!("Cache dir: {}", dir.display().to_string().cyan());
        }

        let cache = CacheStore::new(open_store(false));
        let feed_key = key::scoped(key::AIRDROPS, &config.api_base_url);

        match cache.read(&feed_key) {
            Some(payload) => {
                let now = crate::cache::manager::now_ms();
                let marker = if cache.is_stale(&feed_key, prefs.stale_after()) {
                    format!("{} stale", "⚠".yellow())
                } else {
                    format!("{} fresh", "✓".green())
                };
                println!(
                    "{} Cached feed: {} airdrops, fetched {}",
                    marker,
                    payload.items.len(),
                    format_age(payload.fetched_at_epoch_ms, now)
                );
            }
            None => println!("{} No cached feed for this API", "○".dimmed()),
        }

        let stats = cache.stats();
        println!(
            "  {} entries, {}",
            stats.total_items,
            format_size(stats.total_size)
        );
    }

    println!();
    Ok(())
}
