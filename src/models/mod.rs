//! Data models for fridgprompt.
//!
//! This module contains the trait catalog, stored prompt records, and the
//! statistics and reports produced by the insight engine.

mod insight;
mod prompt_trait;
mod record;

pub use insight::{InsightReport, TraitScore, TraitStatistics};
pub use prompt_trait::{PromptTrait, TraitMap, trait_description};
pub use record::{ListFilter, NewPrompt, PromptRecord, Rating, normalize_tags, parse_tags};
