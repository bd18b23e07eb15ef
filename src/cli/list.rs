//! Feed commands: list and refresh

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use log::debug;
use tokio::task::JoinHandle;

use crate::cli::OutputFormat;
use crate::cli::args::GlobalOptions;
use crate::cli::context::CommandContext;
use crate::error::Result;
use crate::output::Formattable;

/// Show the feed: cached data first, then the network.
///
/// A stale cache is printed straight away and refreshed in the background so
/// the next run is fresh. With `wait`, the refreshed feed is printed instead.
pub async fn list(opts: &GlobalOptions, pages: u32, wait: bool) -> Result<()> {
    let ctx = CommandContext::new(opts)?;

    let spinner = spinner(ctx.format, "Loading airdrops...");
    let background = ctx.feed.bootstrap().await;

    let background = if wait {
        if let Some(handle) = background {
            spinner.set_message("Refreshing stale cache...");
            join_refresh(handle).await;
        }
        None
    } else {
        background
    };

    for page in 1..pages {
        if !ctx.feed.snapshot().has_more {
            debug!("No more pages after {}", page);
            break;
        }
        spinner.set_message(format!("Loading page {}...", page + 1));
        ctx.feed.load_more().await;
    }
    spinner.finish_and_clear();

    ctx.feed.snapshot().print(ctx.format)?;

    // Let the refresh land in the cache before the process exits
    if let Some(handle) = background {
        join_refresh(handle).await;
    }

    Ok(())
}

/// Re-fetch the first page regardless of cache freshness
pub async fn refresh(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;

    let spinner = spinner(ctx.format, "Refreshing airdrops...");
    ctx.feed.refresh().await;
    spinner.finish_and_clear();

    ctx.feed.snapshot().print(ctx.format)
}

async fn join_refresh(handle: JoinHandle<()>) {
    if let Err(e) = handle.await {
        log::warn!("Background refresh task failed: {}", e);
    }
}

/// Loading indicator on stderr; hidden for JSON so output stays parseable
fn spinner(format: OutputFormat, message: &'static str) -> ProgressBar {
    if format == OutputFormat::Json {
        return ProgressBar::hidden();
    }

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
