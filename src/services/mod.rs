//! Business logic services.
//!
//! Services are pure functions over data read from the vault.

mod insights;

pub use insights::{
    BAD_PATTERN_MAX_HIGH, BAD_PATTERN_MIN_LOW, GOOD_PATTERN_MIN_HIGH, KEEP_USING_MAX_LOW,
    MAX_SUGGESTIONS, MIN_RATED_PROMPTS, RARELY_USED_MAX_HIGH, generate_insights,
    generate_insights_for,
};
