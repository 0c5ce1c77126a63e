//! Binary entry point for fridgprompt.
//!
//! This binary provides the CLI interface for the prompt vault.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow needless_pass_by_value for command functions
#![allow(clippy::needless_pass_by_value)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use anyhow::Context;
use clap::{Parser, Subcommand};
use fridgprompt::cli::{self, AddArgs};
use fridgprompt::config::FridgConfig;
use fridgprompt::detection::build_detector;
use fridgprompt::observability::{self, InitOptions};
use fridgprompt::storage::SqliteRecordStore;
use std::path::PathBuf;
use std::process::ExitCode;

/// Fridgprompt - A prompt vault for vibe coders.
///
/// Store, rate, and analyze your prompts to discover what makes them work.
#[derive(Parser)]
#[command(name = "fridgprompt")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Add a new prompt to the vault.
    ///
    /// The prompt comes from the argument, piped stdin, or is typed in
    /// until Ctrl+D.
    Add {
        /// The prompt text.
        content: Option<String>,

        /// Model used (e.g. claude-4, gpt-4).
        #[arg(short, long)]
        model: Option<String>,

        /// Task type (e.g. feature, bugfix, refactor).
        #[arg(short, long)]
        task_type: Option<String>,

        /// Comma-separated tags.
        #[arg(long)]
        tags: Option<String>,
    },

    /// List stored prompts.
    List {
        /// Filter by tag.
        #[arg(long)]
        tag: Option<String>,

        /// Filter by rating (1-5).
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        rating: Option<u8>,

        /// Number of prompts to show (defaults to `list_limit` from config).
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Show details of a specific prompt.
    Show {
        /// Prompt ID.
        id: i64,
    },

    /// Search prompts by content and outcome.
    Search {
        /// The search query.
        query: String,

        /// Number of results.
        #[arg(short = 'n', long, default_value = "10")]
        limit: usize,
    },

    /// Rate a prompt (1-5 stars).
    Rate {
        /// Prompt ID.
        id: i64,

        /// Rating from 1 to 5.
        #[arg(value_parser = clap::value_parser!(u8).range(1..=5))]
        rating: u8,

        /// Notes about the outcome.
        #[arg(short, long)]
        outcome: Option<String>,
    },

    /// Analyze unanalyzed prompts for traits using a local LLM.
    Analyze {
        /// Ollama model to use.
        #[arg(long)]
        model: Option<String>,

        /// Use simple rule-based analysis (no LLM).
        #[arg(long)]
        simple: bool,
    },

    /// Show or detect traits for a specific prompt.
    Traits {
        /// Prompt ID.
        id: i64,

        /// Ollama model to use.
        #[arg(long)]
        model: Option<String>,

        /// Use simple rule-based analysis (no LLM).
        #[arg(long)]
        simple: bool,
    },

    /// Show patterns from your rated prompts.
    Insights {
        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List all tags.
    Tags,

    /// Show basic statistics.
    Stats {
        /// Print the totals as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Open the fridge and see what's inside.
    Open,
}

/// Main entry point.
fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match FridgConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    if let Err(e) = observability::init_from_config(
        &config.logging,
        InitOptions {
            verbose: cli.verbose,
        },
    ) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run_command(cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "Command failed");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        },
    }
}

/// Runs the selected command.
fn run_command(cli: Cli, config: &FridgConfig) -> anyhow::Result<()> {
    let Some(command) = cli.command else {
        cli::print_welcome();
        return Ok(());
    };

    let store = SqliteRecordStore::new(&config.db_path).with_context(|| {
        format!("failed to open prompt vault at {}", config.db_path.display())
    })?;

    match command {
        Commands::Add {
            content,
            model,
            task_type,
            tags,
        } => cli::cmd_add(
            &store,
            AddArgs {
                content,
                model,
                task_type,
                tags,
            },
        ),

        Commands::List { tag, rating, limit } => {
            cli::cmd_list(&store, tag, rating, limit.unwrap_or(config.list_limit))
        },

        Commands::Show { id } => cli::cmd_show(&store, id),

        Commands::Search { query, limit } => cli::cmd_search(&store, query, limit),

        Commands::Rate {
            id,
            rating,
            outcome,
        } => cli::cmd_rate(&store, id, rating, outcome),

        Commands::Analyze { model, simple } => {
            let detector = build_detector(&config.llm, !simple, model.as_deref());
            cli::cmd_analyze(&store, detector.as_ref()).map(|_| ())
        },

        Commands::Traits { id, model, simple } => {
            let detector = build_detector(&config.llm, !simple, model.as_deref());
            cli::cmd_traits(&store, detector.as_ref(), id)
        },

        Commands::Insights { json } => cli::cmd_insights(&store, json),

        Commands::Tags => cli::cmd_tags(&store),

        Commands::Stats { json } => cli::cmd_stats(&store, json),

        Commands::Open => cli::cmd_open(&store),
    }
}
