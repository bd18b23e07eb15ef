//! Cache management commands

use serde_json::json;

use crate::cache::SqliteStore;
use crate::cli::OutputFormat;
use crate::cli::args::GlobalOptions;
use crate::cli::context::CommandContext;
use crate::error::Result;
use crate::models::CacheEntryDisplay;
use crate::output::Formattable;
use crate::output::formatters::format_size;
use crate::output::json::format_json;

/// Show cache statistics
pub fn status(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let stats = ctx.feed.cache_stats();
    let location = cache_location(opts.no_cache);

    match ctx.format {
        OutputFormat::Json => {
            let data = json!({
                "total_entries": stats.total_items,
                "total_size_bytes": stats.total_size,
                "total_size_human": format_size(stats.total_size),
                "oldest_entry_timestamp": stats.oldest_item,
                "newest_entry_timestamp": stats.newest_item,
                "path": location,
            });
            println!("{}", format_json(&data)?);
        }
        format => vec![CacheEntryDisplay::new(&stats, location)].print(format)?,
    }

    Ok(())
}

/// Remove every airdrophunter cache entry
pub fn clear(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let cleared = ctx.feed.clear_cache();

    match ctx.format {
        OutputFormat::Json => {
            let data = json!({
                "entries_removed": cleared.entries_removed,
                "success": true,
            });
            println!("{}", format_json(&data)?);
        }
        _ => {
            if cleared.entries_removed > 0 {
                println!("Cleared {} cache entries", cleared.entries_removed);
            } else {
                println!("Cache was already empty");
            }
        }
    }

    Ok(())
}

/// Print the cache directory
pub fn path() -> Result<()> {
    println!("{}", SqliteStore::cache_dir()?.display());
    Ok(())
}

fn cache_location(no_cache: bool) -> String {
    if no_cache {
        return "memory".to_string();
    }
    SqliteStore::cache_dir()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| "unknown".to_string())
}
