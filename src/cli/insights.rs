//! Reporting commands: insights, stats, open.

#![allow(clippy::print_stdout)]

use super::format::{BAR_WIDTH, average, trait_bar};
use crate::models::{InsightReport, TraitStatistics};
use crate::services::generate_insights;
use crate::storage::RecordStore;
use serde::Serialize;
use std::fmt::Write as _;

const BANNER_LOGO: &str = r"
   _____ ____  ___ ____   ____ ____  ____   ___  __  __ ____ _____
  |  ___|  _ \|_ _|  _ \ / ___|  _ \|  _ \ / _ \|  \/  |  _ \_   _|
  | |_  | |_) || || | | | |  _| |_) | |_) | | | | |\/| | |_) || |
  |  _| |  _ < | || |_| | |_| |  __/|  _ <| |_| | |  | |  __/ | |
  |_|   |_| \_\___|____/ \____|_|   |_| \_\\___/|_|  |_|_|    |_|
";

const BANNER_TAGLINE: &str = "A prompt vault for vibe coders";

/// Patterns shown per section in `insights`.
const PATTERNS_SHOWN: usize = 5;

/// Tags shown by `open`.
const OPEN_TAGS_SHOWN: usize = 5;

/// Prints the banner and a pointer to `--help`.
pub fn print_welcome() {
    print!("{}", banner());
    println!(
        "  v{}  Type `fridgprompt --help` for commands\n",
        env!("CARGO_PKG_VERSION")
    );
}

fn banner() -> String {
    format!("{BANNER_LOGO}        {BANNER_TAGLINE}\n\n")
}

/// Shows what the rated history says about traits.
///
/// # Errors
///
/// Returns an error if statistics cannot be read or serialized.
pub fn cmd_insights(store: &dyn RecordStore, json: bool) -> anyhow::Result<()> {
    let report = generate_insights(store.trait_statistics()?);
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_insights(&report));
    }
    Ok(())
}

/// Renders an insight report for the terminal.
#[must_use]
pub fn render_insights(report: &InsightReport) -> String {
    let mut out = String::new();
    if !report.ready {
        let _ = writeln!(out, "{}", report.message.as_deref().unwrap_or_default());
        let _ = writeln!(out, "\nRate more prompts with: fridgprompt rate <id> <1-5>");
        return out;
    }

    let stats = &report.stats;
    let _ = writeln!(out, "Your Vault");
    let _ = writeln!(out, "  {} prompts stored", stats.total_prompts);
    let _ = writeln!(out, "  {} rated", stats.rated_prompts);
    let _ = writeln!(out, "  {:.1} avg rating", stats.avg_rating);

    if !report.good_patterns.is_empty() {
        let _ = writeln!(out, "\nIn your ★★★★★ prompts:");
        for score in report.good_patterns.iter().take(PATTERNS_SHOWN) {
            let bar = trait_bar(score.percentage, BAR_WIDTH);
            let _ = writeln!(out, "  ✓ {bar} {}", score.trait_name.title());
        }
    }

    if !report.bad_patterns.is_empty() {
        let _ = writeln!(out, "\nIn your ★ prompts:");
        for score in report.bad_patterns.iter().take(PATTERNS_SHOWN) {
            let bar = trait_bar(score.percentage, BAR_WIDTH);
            let _ = writeln!(out, "  ✗ {bar} {}", score.trait_name.title());
        }
    }

    if !report.suggestions.is_empty() {
        let _ = writeln!(out, "\nSuggestions:");
        for suggestion in &report.suggestions {
            let _ = writeln!(out, "  → {suggestion}");
        }
    }
    out
}

/// Vault totals as emitted by `stats --json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSummary {
    /// Stored prompts.
    pub total_prompts: u64,
    /// Rated prompts.
    pub rated_prompts: u64,
    /// Mean rating; absent when nothing is rated.
    pub avg_rating: Option<f64>,
}

impl From<&TraitStatistics> for StatsSummary {
    fn from(stats: &TraitStatistics) -> Self {
        Self {
            total_prompts: stats.total_prompts,
            rated_prompts: stats.rated_prompts,
            avg_rating: (stats.rated_prompts > 0).then_some(stats.avg_rating),
        }
    }
}

/// Shows vault totals.
///
/// # Errors
///
/// Returns an error if statistics cannot be read or serialized.
pub fn cmd_stats(store: &dyn RecordStore, json: bool) -> anyhow::Result<()> {
    let stats = store.trait_statistics()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&StatsSummary::from(&stats))?);
    } else {
        print!("{}", render_stats(&stats));
    }
    Ok(())
}

/// Renders vault totals.
#[must_use]
pub fn render_stats(stats: &TraitStatistics) -> String {
    format!(
        "Fridgprompt Stats\n  Prompts:     {}\n  Rated:       {}\n  Avg Rating:  {}\n",
        stats.total_prompts,
        stats.rated_prompts,
        average(stats.avg_rating, stats.rated_prompts, "N/A"),
    )
}

/// Shows the banner with a short vault summary.
///
/// # Errors
///
/// Returns an error if the vault cannot be read.
pub fn cmd_open(store: &dyn RecordStore) -> anyhow::Result<()> {
    let stats = store.trait_statistics()?;
    let tags = store.all_tags()?;
    print!("{}", banner());
    print!("{}", render_open(&stats, &tags));
    Ok(())
}

/// Renders the `open` summary below the banner.
#[must_use]
pub fn render_open(stats: &TraitStatistics, tags: &[String]) -> String {
    if stats.total_prompts == 0 {
        return "  Your fridge is empty!\n  Add your first prompt: fridgprompt add\n\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(out, "  {} prompts stored", stats.total_prompts);
    let _ = writeln!(
        out,
        "  {} rated ({} avg)",
        stats.rated_prompts,
        average(stats.avg_rating, stats.rated_prompts, "-")
    );
    if !tags.is_empty() {
        let shown: Vec<&str> = tags.iter().take(OPEN_TAGS_SHOWN).map(String::as_str).collect();
        let _ = writeln!(out, "  Tags: {}", shown.join(", "));
    }
    out.push('\n');
    out
}
