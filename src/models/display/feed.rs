//! Rendering of a whole feed snapshot

use colored::Colorize;
use serde_json::Value;

use super::AirdropDisplay;
use super::common::{field_bool, field_list, field_str};
use crate::cache::manager::now_ms;
use crate::cli::OutputFormat;
use crate::error::Result;
use crate::feed::FeedSnapshot;
use crate::output::formatters::{format_age, format_count};
use crate::output::{Formattable, json, table};

impl Formattable for FeedSnapshot {
    fn format(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Json => Ok(json::format_json(self)?),
            OutputFormat::Table => {
                let rows: Vec<AirdropDisplay> =
                    self.airdrops.iter().map(AirdropDisplay::from).collect();
                Ok(format!("{}\n{}", table::format_table(&rows), self.footer()))
            }
            OutputFormat::Pretty => Ok(self.pretty()),
        }
    }
}

impl FeedSnapshot {
    /// One-line provenance summary: source, freshness, paging
    fn footer(&self) -> String {
        let count = match self.total {
            Some(total) if total > self.airdrops.len() as u64 => {
                format!("{} of {} airdrops", self.airdrops.len(), total)
            }
            _ => format!("{} airdrops", self.airdrops.len()),
        };
        let mut parts = vec![count, format!("source: {}", self.data_source)];
        if let Some(fetched) = self.last_fetch {
            parts.push(format!("fetched {}", format_age(fetched, now_ms())));
        }
        if self.is_stale {
            parts.push("stale".to_string());
        }
        if self.has_more {
            parts.push("more available".to_string());
        }
        parts.join(" · ")
    }

    fn pretty(&self) -> String {
        let mut out = Vec::new();

        out.push(format!("{}  {}", "AirdropHunter".bold(), self.footer().dimmed()));
        if let Some(error) = &self.error {
            out.push(format!("{} {}", "⚠".yellow(), error.yellow()));
        }
        if let Some(stats) = stats_line(&self.stats) {
            out.push(stats);
        }

        if self.airdrops.is_empty() {
            out.push(String::new());
            out.push("No airdrops found.".to_string());
        }

        for record in &self.airdrops {
            out.push(String::new());
            out.extend(pretty_airdrop(record));
        }

        out.join("\n")
    }
}

/// `Total: 2 · Active: 2 · ...` from whatever numeric fields the stats carry
fn stats_line(stats: &Value) -> Option<String> {
    let object = stats.as_object()?;
    let parts: Vec<String> = object
        .iter()
        .filter(|(_, v)| v.is_number())
        .map(|(k, v)| format!("{}: {}", capitalize(k), v))
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" · "))
    }
}

fn pretty_airdrop(record: &Value) -> Vec<String> {
    let mut title = format!(
        "{} {}  [{}]",
        "●".cyan(),
        field_str(record, "name").bold(),
        field_str(record, "status")
    );
    if field_bool(record, "isConfirmed") {
        title.push_str(&format!(" {}", "✓ confirmed".green()));
    }
    if field_bool(record, "isHot") {
        title.push_str(&format!(" {}", "hot".red()));
    }

    let mut lines = vec![title];

    let description = field_str(record, "description");
    if description != "-" {
        lines.push(format!("  {}", description));
    }

    let mut details = vec![
        format!("Reward: {}", field_str(record, "reward")),
        format!("Difficulty: {}", field_str(record, "difficulty")),
        format!("Rating: {}", field_str(record, "rating")),
    ];
    if let Some(participants) = record.get("participants").and_then(Value::as_u64) {
        details.push(format!("{} participants", format_count(participants)));
    }
    lines.push(format!("  {}", details.join(" · ").dimmed()));

    let networks = field_list(record, "networks");
    if networks != "-" {
        lines.push(format!("  Networks: {}", networks));
    }

    lines
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
