//! Terminal rendering helpers shared by the commands.

use crate::models::Rating;

/// Width of the trait bars in `insights`.
pub const BAR_WIDTH: usize = 20;

/// Characters kept from a prompt in table previews.
pub const PREVIEW_WIDTH: usize = 50;

/// Characters kept from a prompt in search results.
pub const SEARCH_PREVIEW_WIDTH: usize = 100;

/// Renders a percentage as `[████░░░░] NN%`.
///
/// The filled part rounds down; out-of-range input is clamped to the bar.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn trait_bar(percentage: f64, width: usize) -> String {
    let fraction = (percentage / 100.0).clamp(0.0, 1.0);
    let filled = ((fraction * width as f64) as usize).min(width);
    format!(
        "[{}{}] {percentage:.0}%",
        "█".repeat(filled),
        "░".repeat(width - filled)
    )
}

/// Renders a rating as five stars, e.g. `★★★☆☆`.
#[must_use]
pub fn stars(rating: Rating) -> String {
    let filled = usize::from(rating.get());
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

/// Stars for an optional rating, with `fallback` when unrated.
#[must_use]
pub fn stars_or(rating: Option<Rating>, fallback: &str) -> String {
    rating.map_or_else(|| fallback.to_string(), stars)
}

/// Single-line preview of `content`.
///
/// Text longer than `width` characters keeps its first `width - 3` followed
/// by `...`. Newlines become spaces.
#[must_use]
pub fn preview(content: &str, width: usize) -> String {
    let one_line = content.replace(['\r', '\n'], " ");
    if one_line.chars().count() <= width {
        return one_line;
    }
    let kept: String = one_line.chars().take(width.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Average rating to one decimal, or `fallback` when nothing is rated.
#[must_use]
pub fn average(avg_rating: f64, rated_prompts: u64, fallback: &str) -> String {
    if rated_prompts == 0 {
        fallback.to_string()
    } else {
        format!("{avg_rating:.1}")
    }
}
