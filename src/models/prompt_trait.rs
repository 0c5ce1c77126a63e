//! Prompt trait catalog.
//!
//! The catalog is a closed set of ten boolean characteristics a prompt's text
//! can exhibit. Declaration order of [`PromptTrait::ALL`] is the canonical
//! presentation order and the tie-break order for insight rankings.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Detected traits for a single prompt, keyed by trait identifier.
///
/// Keys are plain strings so records written by other detectors (or older
/// catalogs) still load; unknown identifiers are carried but ignored by the
/// insight engine.
pub type TraitMap = BTreeMap<String, bool>;

/// A rateable textual characteristic of a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptTrait {
    /// States what you want built or fixed.
    ClearGoal,
    /// Explains the project or situation.
    GivesContext,
    /// Points to specific files or functions.
    ReferencesFiles,
    /// Includes error message or logs.
    ShowsError,
    /// Explains what should happen.
    DescribesBehavior,
    /// Limits scope or style.
    SetsConstraints,
    /// Splits into steps or parts.
    BreaksDownTask,
    /// Provides sample input/output.
    ShowsExample,
    /// Gives reasoning or motivation.
    ExplainsWhy,
    /// Says what NOT to do.
    SpecifiesNegative,
}

impl PromptTrait {
    /// Every trait in canonical order.
    pub const ALL: [Self; 10] = [
        Self::ClearGoal,
        Self::GivesContext,
        Self::ReferencesFiles,
        Self::ShowsError,
        Self::DescribesBehavior,
        Self::SetsConstraints,
        Self::BreaksDownTask,
        Self::ShowsExample,
        Self::ExplainsWhy,
        Self::SpecifiesNegative,
    ];

    /// Structural traits that earn a "try adding" nudge when rarely present
    /// in high-rated prompts.
    pub const STRUCTURAL: [Self; 2] = [Self::ShowsExample, Self::BreaksDownTask];

    /// Returns the stable identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ClearGoal => "clear_goal",
            Self::GivesContext => "gives_context",
            Self::ReferencesFiles => "references_files",
            Self::ShowsError => "shows_error",
            Self::DescribesBehavior => "describes_behavior",
            Self::SetsConstraints => "sets_constraints",
            Self::BreaksDownTask => "breaks_down_task",
            Self::ShowsExample => "shows_example",
            Self::ExplainsWhy => "explains_why",
            Self::SpecifiesNegative => "specifies_negative",
        }
    }

    /// Returns the one-line description.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::ClearGoal => "States what you want built or fixed",
            Self::GivesContext => "Explains the project or situation",
            Self::ReferencesFiles => "Points to specific files or functions",
            Self::ShowsError => "Includes error message or logs",
            Self::DescribesBehavior => "Explains what should happen",
            Self::SetsConstraints => "Limits scope or style",
            Self::BreaksDownTask => "Splits into steps or parts",
            Self::ShowsExample => "Provides sample input/output",
            Self::ExplainsWhy => "Gives reasoning or motivation",
            Self::SpecifiesNegative => "Says what NOT to do",
        }
    }

    /// Parses a trait identifier. Unknown identifiers yield `None`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }

    /// Returns the identifier with underscores replaced by spaces.
    #[must_use]
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }

    /// Returns the label with each word capitalized, for headings.
    #[must_use]
    pub fn title(&self) -> String {
        self.as_str()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                chars.next().map_or_else(String::new, |first| {
                    first.to_uppercase().chain(chars).collect()
                })
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Returns true for the structural traits.
    #[must_use]
    pub fn is_structural(&self) -> bool {
        Self::STRUCTURAL.contains(self)
    }
}

impl fmt::Display for PromptTrait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Looks up the description for an identifier.
///
/// Returns `None` for identifiers outside the catalog instead of failing.
#[must_use]
pub fn trait_description(identifier: &str) -> Option<&'static str> {
    PromptTrait::parse(identifier).map(|t| t.description())
}
