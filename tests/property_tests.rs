//! Property-based tests for the insight engine.
//!
//! Uses proptest to verify invariants across random statistics:
//! - The readiness gate hides all patterns
//! - Pattern membership respects the thresholds
//! - Rankings are sorted and stable on ties
//! - Suggestions are bounded
//! - Output is deterministic

// Property tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use fridgprompt::models::{PromptTrait, TraitStatistics};
use fridgprompt::services::{MAX_SUGGESTIONS, MIN_RATED_PROMPTS, generate_insights};
use proptest::prelude::*;
use std::collections::BTreeMap;

/// A percentage that is either a random value or one of the threshold edges.
fn percentage() -> impl Strategy<Value = f64> {
    prop_oneof![
        0.0f64..=100.0,
        prop::sample::select(vec![0.0, 29.9, 30.0, 39.9, 40.0, 59.9, 60.0, 69.9, 70.0, 100.0]),
    ]
}

/// Rates for a random subset of the catalog.
fn rates() -> impl Strategy<Value = BTreeMap<String, f64>> {
    prop::collection::vec(prop::option::of(percentage()), PromptTrait::ALL.len()).prop_map(
        |values| {
            PromptTrait::ALL
                .iter()
                .zip(values)
                .filter_map(|(t, v)| v.map(|v| (t.as_str().to_string(), v)))
                .collect()
        },
    )
}

fn stats_with(rated: u64) -> impl Strategy<Value = TraitStatistics> {
    (rates(), rates(), 1.0f64..=5.0).prop_map(move |(high, low, avg)| TraitStatistics {
        total_prompts: rated + 3,
        rated_prompts: rated,
        avg_rating: avg,
        high_rated_traits: high,
        low_rated_traits: low,
    })
}

fn ready_stats() -> impl Strategy<Value = TraitStatistics> {
    (MIN_RATED_PROMPTS..500).prop_flat_map(stats_with)
}

proptest! {
    /// Property: fewer than the minimum rated prompts is never ready.
    #[test]
    fn prop_not_ready_below_minimum(stats in (0..MIN_RATED_PROMPTS).prop_flat_map(stats_with)) {
        let rated = stats.rated_prompts;
        let report = generate_insights(stats.clone());

        prop_assert!(!report.ready);
        prop_assert!(report.good_patterns.is_empty());
        prop_assert!(report.bad_patterns.is_empty());
        prop_assert!(report.suggestions.is_empty());
        prop_assert!(report.message.unwrap().contains(&rated.to_string()));
        prop_assert_eq!(report.stats, stats);
    }

    /// Property: pattern lists only hold traits past their thresholds.
    #[test]
    fn prop_patterns_respect_thresholds(stats in ready_stats()) {
        let report = generate_insights(stats.clone());
        prop_assert!(report.ready);

        for score in &report.good_patterns {
            let high = stats.high_rate(score.trait_name);
            prop_assert!(high >= 70.0);
            prop_assert!((score.percentage - high).abs() < f64::EPSILON);
        }
        for score in &report.bad_patterns {
            let low = stats.low_rate(score.trait_name);
            prop_assert!(low >= 60.0);
            prop_assert!(stats.high_rate(score.trait_name) < 40.0);
            prop_assert!((score.percentage - low).abs() < f64::EPSILON);
        }
    }

    /// Property: every qualifying trait is reported exactly once.
    #[test]
    fn prop_patterns_are_complete(stats in ready_stats()) {
        let report = generate_insights(stats.clone());

        let expected_good = PromptTrait::ALL.iter().filter(|t| stats.high_rate(**t) >= 70.0).count();
        let expected_bad = PromptTrait::ALL
            .iter()
            .filter(|t| stats.low_rate(**t) >= 60.0 && stats.high_rate(**t) < 40.0)
            .count();
        prop_assert_eq!(report.good_patterns.len(), expected_good);
        prop_assert_eq!(report.bad_patterns.len(), expected_bad);
    }

    /// Property: rankings are descending, catalog order on ties.
    #[test]
    fn prop_rankings_sorted_and_stable(stats in ready_stats()) {
        let report = generate_insights(stats);

        for list in [&report.good_patterns, &report.bad_patterns] {
            for pair in list.windows(2) {
                prop_assert!(pair[0].percentage >= pair[1].percentage);
                if pair[0].percentage.total_cmp(&pair[1].percentage).is_eq() {
                    prop_assert!(pair[0].trait_name < pair[1].trait_name);
                }
            }
        }
    }

    /// Property: no trait is both a good and a bad pattern.
    #[test]
    fn prop_good_and_bad_disjoint(stats in ready_stats()) {
        let report = generate_insights(stats);
        for good in &report.good_patterns {
            prop_assert!(report.bad_patterns.iter().all(|bad| bad.trait_name != good.trait_name));
        }
    }

    /// Property: suggestions never exceed the cap.
    #[test]
    fn prop_suggestions_bounded(stats in ready_stats()) {
        prop_assert!(generate_insights(stats).suggestions.len() <= MAX_SUGGESTIONS);
    }

    /// Property: identical input gives identical output.
    #[test]
    fn prop_deterministic(stats in ready_stats()) {
        let first = serde_json::to_string(&generate_insights(stats.clone())).unwrap();
        let second = serde_json::to_string(&generate_insights(stats)).unwrap();
        prop_assert_eq!(first, second);
    }
}
