//! # Fridgprompt
//!
//! A personal knowledge base for AI coding prompts.
//!
//! Prompts are stored with ratings and outcome notes, tagged with the
//! structural traits they show (clear goal, examples, constraints, ...), and
//! mined for which traits go with good and bad results.
//!
//! ## Features
//!
//! - Local `SQLite` vault with full-text search
//! - Trait detection via a local Ollama model, with a keyword fallback
//! - Insight engine that turns rating-bucketed trait rates into suggestions
//!
//! ## Example
//!
//! ```rust,ignore
//! use fridgprompt::{RecordStore, SqliteRecordStore, generate_insights};
//!
//! let store = SqliteRecordStore::new(config.db_path)?;
//! let report = generate_insights(store.trait_statistics()?);
//! for suggestion in &report.suggestions {
//!     println!("{suggestion}");
//! }
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
// multiple_crate_versions is inherently crate-level (detects duplicate transitive dependencies).
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

// Module declarations
pub mod cli;
pub mod config;
pub mod detection;
pub mod llm;
pub mod models;
pub mod observability;
pub mod services;
pub mod storage;

// Re-exports for convenience
pub use config::FridgConfig;
pub use detection::{FallbackDetector, KeywordDetector, LlmTraitDetector, TraitDetector};
pub use llm::LlmProvider;
pub use models::{
    InsightReport, ListFilter, NewPrompt, PromptRecord, PromptTrait, Rating, TraitMap, TraitScore,
    TraitStatistics,
};
pub use services::{generate_insights, generate_insights_for};
pub use storage::{RecordStore, SqliteRecordStore};

/// Error type for fridgprompt operations.
///
/// Uses `thiserror` for automatic `Display` and `Error` trait implementations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Empty prompt content, rating outside 1..=5 |
/// | `NotFound` | Traits saved for a prompt id that does not exist |
/// | `OperationFailed` | Database queries fail, LLM unreachable or replies with bad JSON |
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    ///
    /// Raised when:
    /// - Prompt content is empty or whitespace
    /// - A rating is outside 1..=5
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A referenced record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// An operation failed.
    ///
    /// Raised when:
    /// - `SQLite` database operations fail
    /// - The config file cannot be read or parsed
    /// - The LLM request fails or its reply cannot be parsed
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

/// Result type alias for fridgprompt operations.
pub type Result<T> = std::result::Result<T, Error>;
