//! Prompt vault commands: add, list, show, search, rate, tags.

// CLI commands are allowed to print
#![allow(clippy::print_stdout)]
#![allow(clippy::print_stderr)]
// CLI commands take owned strings from clap parsing
#![allow(clippy::needless_pass_by_value)]

use super::format::{PREVIEW_WIDTH, SEARCH_PREVIEW_WIDTH, preview, stars, stars_or};
use crate::models::{ListFilter, NewPrompt, PromptRecord, PromptTrait, Rating, parse_tags};
use crate::storage::RecordStore;
use anyhow::{Context, bail};
use std::fmt::Write as _;
use std::io::{BufRead, IsTerminal, Read};

/// Arguments for `add`.
#[derive(Debug, Clone, Default)]
pub struct AddArgs {
    /// Prompt text; read from stdin when absent.
    pub content: Option<String>,
    /// Model label.
    pub model: Option<String>,
    /// Task type label.
    pub task_type: Option<String>,
    /// Comma-separated tags.
    pub tags: Option<String>,
}

/// Stores a new prompt.
///
/// # Errors
///
/// Returns an error if no content was given or the prompt cannot be saved.
pub fn cmd_add(store: &dyn RecordStore, mut args: AddArgs) -> anyhow::Result<()> {
    let content = match args.content.take() {
        Some(content) => content,
        None => read_content_from_stdin()?,
    };
    if content.trim().is_empty() {
        bail!("No prompt content provided.");
    }
    if std::io::stdin().is_terminal() {
        args = ask_missing_details(args, &mut std::io::stdin().lock())?;
    }

    let mut prompt = NewPrompt::new(content)
        .with_tags(args.tags.as_deref().map(parse_tags).unwrap_or_default());
    if let Some(model) = args.model.filter(|m| !m.trim().is_empty()) {
        prompt = prompt.with_model(model.trim());
    }
    if let Some(task_type) = args.task_type.filter(|t| !t.trim().is_empty()) {
        prompt = prompt.with_task_type(task_type.trim());
    }

    let id = store.add(&prompt).context("failed to save prompt")?;
    println!("Saved as #{id}");
    Ok(())
}

/// Reads prompt text from piped stdin, or interactively until EOF.
fn read_content_from_stdin() -> anyhow::Result<String> {
    let mut stdin = std::io::stdin();
    if stdin.is_terminal() {
        eprintln!("Enter your prompt (Ctrl+D when done):");
    }
    let mut content = String::new();
    stdin
        .read_to_string(&mut content)
        .context("failed to read prompt from stdin")?;
    Ok(content.trim().to_string())
}

/// Asks for model, task type and tags when no flag supplied them.
///
/// Blank answers leave the field unset.
fn ask_missing_details(mut args: AddArgs, input: &mut impl BufRead) -> anyhow::Result<AddArgs> {
    if args.model.is_none() {
        args.model = ask_optional(input, "Model used (optional):")?;
    }
    if args.task_type.is_none() {
        args.task_type = ask_optional(input, "Task type (optional):")?;
    }
    if args.tags.is_none() {
        args.tags = ask_optional(input, "Tags, comma-separated (optional):")?;
    }
    Ok(args)
}

fn ask_optional(input: &mut impl BufRead, question: &str) -> anyhow::Result<Option<String>> {
    eprint!("{question} ");
    let mut line = String::new();
    input
        .read_line(&mut line)
        .context("failed to read answer from stdin")?;
    let answer = line.trim();
    Ok((!answer.is_empty()).then(|| answer.to_string()))
}

/// Lists stored prompts.
///
/// # Errors
///
/// Returns an error if the vault cannot be read.
pub fn cmd_list(
    store: &dyn RecordStore,
    tag: Option<String>,
    rating: Option<u8>,
    limit: usize,
) -> anyhow::Result<()> {
    let mut filter = ListFilter::new().with_limit(limit);
    if let Some(tag) = tag {
        filter = filter.with_tag(tag);
    }
    if let Some(rating) = rating {
        filter = filter.with_rating(Rating::new(rating)?);
    }

    let records = store.list(&filter)?;
    print!("{}", render_table(&records));
    Ok(())
}

/// Renders records as a table.
#[must_use]
pub fn render_table(records: &[PromptRecord]) -> String {
    if records.is_empty() {
        return "No prompts found.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<5} {:<50} {:<7} {:<20} MODEL",
        "#", "PROMPT", "RATING", "TAGS"
    );
    let _ = writeln!(out, "{}", "-".repeat(96));
    for record in records {
        let tags = record
            .tags
            .iter()
            .take(3)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(
            out,
            "{:<5} {:<50} {:<7} {:<20} {}",
            record.id,
            preview(&record.content, PREVIEW_WIDTH),
            stars_or(record.rating, "--"),
            preview(&tags, 20),
            record.model.as_deref().unwrap_or(""),
        );
    }
    out
}

/// Shows one prompt in full.
///
/// # Errors
///
/// Returns an error if the prompt does not exist or the vault cannot be read.
pub fn cmd_show(store: &dyn RecordStore, id: i64) -> anyhow::Result<()> {
    let Some(record) = store.get(id)? else {
        bail!("Prompt #{id} not found.");
    };
    print!("{}", render_detail(&record));
    Ok(())
}

/// Renders one prompt with its metadata, outcome, and traits.
#[must_use]
pub fn render_detail(record: &PromptRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Prompt #{}  {}",
        record.id,
        stars_or(record.rating, "Not rated")
    );
    let _ = writeln!(out, "{}", "-".repeat(60));
    let _ = writeln!(out, "{}", record.content);
    let _ = writeln!(out, "{}", "-".repeat(60));

    let mut meta = Vec::new();
    if let Some(model) = &record.model {
        meta.push(format!("Model: {model}"));
    }
    if let Some(task_type) = &record.task_type {
        meta.push(format!("Type: {task_type}"));
    }
    if !record.tags.is_empty() {
        meta.push(format!("Tags: {}", record.tags.join(", ")));
    }
    if !meta.is_empty() {
        let _ = writeln!(out, "{}", meta.join("  "));
    }
    let _ = writeln!(
        out,
        "Added: {}",
        record.created_at.format("%Y-%m-%d %H:%M UTC")
    );

    if let Some(outcome) = &record.outcome {
        let _ = writeln!(out, "\nOutcome:\n  {outcome}");
    }

    if record.is_analyzed() {
        let _ = writeln!(out, "\nDetected Traits:");
        for (name, detected) in &record.traits {
            let icon = if *detected { "✓" } else { "✗" };
            let (title, description) = PromptTrait::parse(name)
                .map_or_else(|| (name.replace('_', " "), ""), |t| (t.title(), t.description()));
            let _ = writeln!(out, "  {icon} {title} - {description}");
        }
    }
    out
}

/// Full-text search.
///
/// # Errors
///
/// Returns an error if the vault cannot be searched.
pub fn cmd_search(store: &dyn RecordStore, query: String, limit: usize) -> anyhow::Result<()> {
    let records = store.search(&query, limit)?;
    print!("{}", render_search(&query, &records));
    Ok(())
}

/// Renders search hits.
#[must_use]
pub fn render_search(query: &str, records: &[PromptRecord]) -> String {
    if records.is_empty() {
        return format!("No prompts matching '{query}'\n");
    }

    let mut out = format!("Found {} prompts:\n\n", records.len());
    for record in records {
        let _ = writeln!(out, "#{} {}", record.id, stars_or(record.rating, ""));
        let _ = writeln!(out, "  {}\n", preview(&record.content, SEARCH_PREVIEW_WIDTH));
    }
    out
}

/// Rates a prompt.
///
/// # Errors
///
/// Returns an error if the rating is out of range or the prompt does not exist.
pub fn cmd_rate(
    store: &dyn RecordStore,
    id: i64,
    rating: u8,
    outcome: Option<String>,
) -> anyhow::Result<()> {
    let rating = Rating::new(rating)?;
    if !store.rate(id, rating, outcome.as_deref())? {
        bail!("Prompt #{id} not found.");
    }
    println!("Rated #{id}: {}", stars(rating));
    Ok(())
}

/// Lists every tag.
///
/// # Errors
///
/// Returns an error if the vault cannot be read.
pub fn cmd_tags(store: &dyn RecordStore) -> anyhow::Result<()> {
    let tags = store.all_tags()?;
    if tags.is_empty() {
        println!("No tags yet.");
    } else {
        println!("Tags:\n  {}", tags.join(", "));
    }
    Ok(())
}
