//! Trait statistics and insight reports.

use super::PromptTrait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregated trait detection rates over the rated history.
///
/// Percentages are in `0.0..=100.0`. A trait missing from either map is
/// treated as 0% for that bucket.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraitStatistics {
    /// Number of stored prompts.
    pub total_prompts: u64,
    /// Number of prompts with a rating.
    pub rated_prompts: u64,
    /// Mean rating over rated prompts, 0 when none are rated.
    pub avg_rating: f64,
    /// Detection rate per trait among prompts rated 4 or 5.
    #[serde(default)]
    pub high_rated_traits: BTreeMap<String, f64>,
    /// Detection rate per trait among prompts rated 1 or 2.
    #[serde(default)]
    pub low_rated_traits: BTreeMap<String, f64>,
}

impl TraitStatistics {
    /// Detection rate of `t` in the high bucket.
    #[must_use]
    pub fn high_rate(&self, t: PromptTrait) -> f64 {
        self.high_rated_traits.get(t.as_str()).copied().unwrap_or(0.0)
    }

    /// Detection rate of `t` in the low bucket.
    #[must_use]
    pub fn low_rate(&self, t: PromptTrait) -> f64 {
        self.low_rated_traits.get(t.as_str()).copied().unwrap_or(0.0)
    }
}

/// A trait paired with the percentage that ranked it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraitScore {
    /// The trait.
    #[serde(rename = "trait")]
    pub trait_name: PromptTrait,
    /// Detection rate in the bucket that qualified it.
    pub percentage: f64,
}

impl TraitScore {
    /// Creates a score.
    #[must_use]
    pub const fn new(trait_name: PromptTrait, percentage: f64) -> Self {
        Self {
            trait_name,
            percentage,
        }
    }
}

/// Derived summary of which traits go with good and bad outcomes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightReport {
    /// False when there are too few ratings to say anything.
    pub ready: bool,
    /// Explanation when not ready.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// The statistics the report was computed from.
    pub stats: TraitStatistics,
    /// Traits common in high-rated prompts, strongest first.
    pub good_patterns: Vec<TraitScore>,
    /// Traits common in low-rated prompts yet rare in high-rated ones, strongest first.
    pub bad_patterns: Vec<TraitScore>,
    /// Up to five actionable suggestions.
    pub suggestions: Vec<String>,
}

impl InsightReport {
    /// Creates a not-ready report carrying only the statistics.
    #[must_use]
    pub const fn not_ready(stats: TraitStatistics, message: String) -> Self {
        Self {
            ready: false,
            message: Some(message),
            stats,
            good_patterns: Vec::new(),
            bad_patterns: Vec::new(),
            suggestions: Vec::new(),
        }
    }
}
