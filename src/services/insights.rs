//! Trait insight engine.
//!
//! Turns aggregated [`TraitStatistics`] into an [`InsightReport`]: which
//! traits show up in the best prompts, which ones go with poor ratings, and
//! what to try next.
//!
//! # Rules
//!
//! | Output | Condition |
//! |--------|-----------|
//! | good pattern | `high >= 70` |
//! | bad pattern | `low >= 60 && high < 40` |
//! | "keep using" | `high >= 70 && low < 40` |
//! | "missing ..." | `low >= 60 && high < 40` |
//! | "try adding" | `high < 30`, structural traits only |
//!
//! Suggestion rules are checked in that order and the first match wins, so a
//! trait contributes at most one suggestion. Suggestions keep catalog order
//! and are cut at [`MAX_SUGGESTIONS`].
//!
//! The engine is pure: no I/O, no errors. Below [`MIN_RATED_PROMPTS`] ratings
//! the report is returned with `ready = false` and nothing else computed.

use crate::models::{InsightReport, PromptTrait, TraitScore, TraitStatistics};

/// Ratings needed before percentages mean anything.
pub const MIN_RATED_PROMPTS: u64 = 5;

/// Suggestions kept in a report.
pub const MAX_SUGGESTIONS: usize = 5;

/// High-bucket rate at or above which a trait is a good pattern.
pub const GOOD_PATTERN_MIN_HIGH: f64 = 70.0;

/// Low-bucket rate at or above which a trait may be a bad pattern.
pub const BAD_PATTERN_MIN_LOW: f64 = 60.0;

/// High-bucket rate below which a trait may be a bad pattern.
pub const BAD_PATTERN_MAX_HIGH: f64 = 40.0;

/// Low-bucket rate below which a good pattern earns a "keep using" nudge.
pub const KEEP_USING_MAX_LOW: f64 = 40.0;

/// High-bucket rate below which a structural trait is considered rarely used.
pub const RARELY_USED_MAX_HIGH: f64 = 30.0;

/// Generates insights over the full trait catalog.
#[must_use]
pub fn generate_insights(stats: TraitStatistics) -> InsightReport {
    generate_insights_for(&PromptTrait::ALL, stats)
}

/// Generates insights over an explicit, ordered set of traits.
///
/// Order of `catalog` decides tie-breaks in the pattern rankings and the order
/// of suggestions.
#[must_use]
pub fn generate_insights_for(catalog: &[PromptTrait], stats: TraitStatistics) -> InsightReport {
    if stats.rated_prompts < MIN_RATED_PROMPTS {
        let message = format!(
            "Need at least {MIN_RATED_PROMPTS} rated prompts for insights. You have {}.",
            stats.rated_prompts
        );
        tracing::debug!(rated = stats.rated_prompts, "insights not ready");
        return InsightReport::not_ready(stats, message);
    }

    let mut good_patterns = Vec::new();
    let mut bad_patterns = Vec::new();
    let mut suggestions = Vec::new();

    for &t in catalog {
        let high = stats.high_rate(t);
        let low = stats.low_rate(t);

        if is_good_pattern(high) {
            good_patterns.push(TraitScore::new(t, high));
        }
        if is_bad_pattern(high, low) {
            bad_patterns.push(TraitScore::new(t, low));
        }
        if let Some(suggestion) = suggest(t, high, low) {
            suggestions.push(suggestion);
        }
    }

    rank(&mut good_patterns);
    rank(&mut bad_patterns);
    suggestions.truncate(MAX_SUGGESTIONS);

    tracing::debug!(
        rated = stats.rated_prompts,
        good = good_patterns.len(),
        bad = bad_patterns.len(),
        suggestions = suggestions.len(),
        "generated insights"
    );

    InsightReport {
        ready: true,
        message: None,
        stats,
        good_patterns,
        bad_patterns,
        suggestions,
    }
}

fn is_good_pattern(high: f64) -> bool {
    high >= GOOD_PATTERN_MIN_HIGH
}

fn is_bad_pattern(high: f64, low: f64) -> bool {
    low >= BAD_PATTERN_MIN_LOW && high < BAD_PATTERN_MAX_HIGH
}

/// Picks the first applicable suggestion for a trait.
fn suggest(t: PromptTrait, high: f64, low: f64) -> Option<String> {
    let label = t.label();
    if high >= GOOD_PATTERN_MIN_HIGH && low < KEEP_USING_MAX_LOW {
        Some(format!(
            "Keep using '{label}' - it's in {high:.0}% of your best prompts."
        ))
    } else if is_bad_pattern(high, low) {
        Some(format!("Missing '{label}' correlates with lower ratings."))
    } else if high < RARELY_USED_MAX_HIGH && t.is_structural() {
        Some(format!(
            "Try adding '{label}' more often - you rarely use it."
        ))
    } else {
        None
    }
}

/// Sorts strongest first. `sort_by` is stable, so equal percentages keep
/// catalog order.
fn rank(scores: &mut [TraitScore]) {
    scores.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));
}
