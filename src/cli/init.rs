//! Init command implementation

use colored::Colorize;
use dialoguer::{Confirm, Input, Select, theme::ColorfulTheme};

use crate::cli::args::GlobalOptions;
use crate::client::{FetchOutcome, HttpListingClient, ListingApi, PageRequest};
use crate::config::{Config, DEFAULT_API_BASE_URL};
use crate::error::Result;

const FORMATS: [&str; 3] = ["pretty", "table", "json"];

/// Run the init command.
///
/// With `base_url` the config is written without prompting. Either way the
/// endpoint is probed once; an unreachable site is reported but still saved,
/// since the feed works offline from its fallback data.
pub async fn run(opts: &GlobalOptions, base_url: Option<String>) -> Result<()> {
    let mut config = Config::load_at(opts.config_ref()).unwrap_or_default();

    match base_url {
        Some(url) => config.api_base_url = url.trim().to_string(),
        None => prompt(&mut config)?,
    }
    config.validate()?;

    println!("\n{}", "Checking the listing endpoint...".cyan());
    let client = HttpListingClient::with_base_url(
        &config.api_base_url,
        config.preferences.request_timeout(),
    );
    match client.fetch_page(PageRequest::first(1)).await {
        FetchOutcome::Success(_) => println!("{}", "✓ Endpoint reachable".green()),
        other => println!(
            "{} {}",
            "⚠ Endpoint check failed:".yellow(),
            other.failure_reason().unwrap_or_default()
        ),
    }

    config.save_at(opts.config_ref())?;

    let config_path = Config::resolve_path(opts.config_ref())?;
    println!(
        "\n{} Configuration saved to: {}",
        "✓".green(),
        config_path.display()
    );

    println!("\n{}", "You're all set! Try running:".bold());
    println!("  {} - Show the airdrop feed", "airdrophunter list".cyan());
    println!("  {} - Show configuration status", "airdrophunter status".cyan());

    Ok(())
}

fn prompt(config: &mut Config) -> Result<()> {
    let theme = ColorfulTheme::default();

    println!("{}", "Welcome to AirdropHunter!".bold().green());
    println!("Let's set up your feed configuration.\n");

    config.api_base_url = Input::with_theme(&theme)
        .with_prompt("Site base URL")
        .default(DEFAULT_API_BASE_URL.to_string())
        .interact_text()?;

    let current = config
        .preferences
        .format
        .as_deref()
        .and_then(|f| FORMATS.iter().position(|name| *name == f))
        .unwrap_or(0);
    let format = Select::with_theme(&theme)
        .with_prompt("Default output format")
        .items(&FORMATS)
        .default(current)
        .interact()?;
    config.preferences.format = Some(FORMATS[format].to_string());

    config.preferences.background_refresh = Confirm::with_theme(&theme)
        .with_prompt("Refresh stale cached data in the background?")
        .default(config.preferences.background_refresh)
        .interact()?;

    Ok(())
}
