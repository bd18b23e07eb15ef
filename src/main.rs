//! AirdropHunter CLI - resilient terminal client for the AirdropHunter listing

use clap::Parser;

mod cache;
mod cli;
mod client;
mod config;
mod error;
mod feed;
mod models;
mod output;

use cli::args::GlobalOptions;
use cli::{CacheCommands, Cli, Commands};
use error::Result;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.debug);
    let opts = GlobalOptions::from_cli(&cli);

    match cli.command {
        Commands::List { pages, wait } => cli::list::list(&opts, pages, wait).await,
        Commands::Refresh => cli::list::refresh(&opts).await,
        Commands::Cache(cache_cmd) => match cache_cmd {
            CacheCommands::Status => cli::cache::status(&opts),
            CacheCommands::Clear => cli::cache::clear(&opts),
            CacheCommands::Path => cli::cache::path(),
        },
        Commands::Init { base_url } => cli::init::run(&opts, base_url).await,
        Commands::Status => cli::status::run(&opts),
        Commands::Version => {
            println!("airdrophunter version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Completion { shell } => {
            cli::completions::run(shell);
            Ok(())
        }
    }
}

/// `--debug` forces debug level; otherwise RUST_LOG applies, defaulting to warn
fn init_logging(debug: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if debug {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.format_timestamp_millis().init();
}
