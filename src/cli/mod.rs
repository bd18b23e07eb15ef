//! CLI command definitions and handlers

use clap::{Parser, Subcommand};
pub use clap_complete::Shell;

pub mod args;
pub mod cache;
pub mod completions;
pub mod context;
pub mod init;
pub mod list;
pub mod status;

pub use args::OutputFormat;
pub use context::CommandContext;

/// AirdropHunter - browse crypto airdrop listings from the terminal
#[derive(Parser, Debug)]
#[command(name = "airdrophunter")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (pretty, table, json)
    #[arg(
        long,
        global = true,
        env = "AIRDROPHUNTER_FORMAT",
        hide_env = true,
        hide_possible_values = true
    )]
    pub format: Option<OutputFormat>,

    /// Override config file location
    #[arg(long, global = true, env = "AIRDROPHUNTER_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Override the site base URL
    #[arg(long, global = true, env = "AIRDROPHUNTER_API_URL", hide_env = true)]
    pub api_url: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true, env = "AIRDROPHUNTER_DEBUG", hide_env = true)]
    pub debug: bool,

    /// Keep the cache in memory for this run only
    #[arg(long, global = true, env = "AIRDROPHUNTER_NO_CACHE", hide_env = true)]
    pub no_cache: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the airdrop feed (cache first, then network)
    #[command(
        visible_alias = "ls",
        after_help = "EXAMPLES:\n  \
            airdrophunter list                  # Cached feed, refreshed in background if stale\n  \
            airdrophunter list --wait           # Wait for the background refresh\n  \
            airdrophunter list --pages 3        # First three pages\n  \
            airdrophunter list --format json | jq '.data.airdrops'"
    )]
    List {
        /// Number of pages to load
        #[arg(
            long,
            short = 'p',
            default_value_t = 1,
            value_parser = clap::value_parser!(u32).range(1..)
        )]
        pages: u32,

        /// Wait for a background refresh and show its result
        #[arg(long, short = 'w')]
        wait: bool,
    },

    /// Fetch the first page from the network, ignoring cache freshness
    Refresh,

    /// Manage the local feed cache
    #[command(subcommand)]
    Cache(CacheCommands),

    /// Create a configuration file
    Init {
        /// Site base URL (skips the interactive prompt)
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Show configuration and cache status
    Status,

    /// Display version information
    Version,

    /// Generate shell completions
    #[command(after_help = "\
Examples:
  bash:   airdrophunter completion bash > /etc/bash_completion.d/airdrophunter
  zsh:    airdrophunter completion zsh > \"${fpath[1]}/_airdrophunter\"
  fish:   airdrophunter completion fish > ~/.config/fish/completions/airdrophunter.fish")]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Cache management subcommands
#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// Show cache statistics
    Status,
    /// Clear all cached data
    Clear,
    /// Print cache directory path
    Path,
}
