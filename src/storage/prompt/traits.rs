//! Record store trait definition.

use crate::Result;
use crate::models::{ListFilter, NewPrompt, PromptRecord, Rating, TraitMap, TraitStatistics};

/// Trait for prompt vault backends.
pub trait RecordStore: Send + Sync {
    /// Stores a new prompt.
    ///
    /// # Returns
    ///
    /// The identifier assigned to the prompt.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is empty or the prompt cannot be saved.
    fn add(&self, prompt: &NewPrompt) -> Result<i64>;

    /// Gets a prompt with its tags and traits.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be accessed.
    fn get(&self, id: i64) -> Result<Option<PromptRecord>>;

    /// Lists prompts newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be accessed.
    fn list(&self, filter: &ListFilter) -> Result<Vec<PromptRecord>>;

    /// Full-text search over content and outcome notes, best match first.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be accessed.
    fn search(&self, query: &str, limit: usize) -> Result<Vec<PromptRecord>>;

    /// Rates a prompt. The outcome is only overwritten by a non-blank one.
    ///
    /// # Returns
    ///
    /// True if the prompt exists and was rated.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be accessed.
    fn rate(&self, id: i64, rating: Rating, outcome: Option<&str>) -> Result<bool>;

    /// Stores detected traits, replacing earlier values for the same traits.
    ///
    /// # Errors
    ///
    /// Returns an error if the prompt does not exist or storage fails.
    fn save_traits(&self, id: i64, traits: &TraitMap) -> Result<()>;

    /// Prompts that have no stored traits yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be accessed.
    fn unanalyzed(&self) -> Result<Vec<PromptRecord>>;

    /// Aggregates per-trait detection rates for the high and low rating
    /// buckets plus overall counts.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be accessed.
    fn trait_statistics(&self) -> Result<TraitStatistics>;

    /// All tag names, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be accessed.
    fn all_tags(&self) -> Result<Vec<String>>;
}
