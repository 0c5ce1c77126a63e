//! Stored prompt records.

use super::TraitMap;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A star rating in the inclusive range 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    /// Lowest accepted rating.
    pub const MIN: u8 = 1;
    /// Highest accepted rating.
    pub const MAX: u8 = 5;
    /// Ratings at or above this count as high.
    pub const HIGH_FLOOR: u8 = 4;
    /// Ratings at or below this count as low.
    pub const LOW_CEILING: u8 = 2;

    /// Creates a rating.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] when `value` is outside 1..=5.
    pub fn new(value: u8) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(Error::InvalidInput(format!(
                "rating must be between {} and {}, got {value}",
                Self::MIN,
                Self::MAX
            )))
        }
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<i64> for Rating {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        u8::try_from(value)
            .map_err(|_| Error::InvalidInput(format!("rating out of range: {value}")))
            .and_then(Self::new)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A prompt stored in the vault.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptRecord {
    /// Store-assigned identifier.
    pub id: i64,
    /// The prompt text.
    pub content: String,
    /// Free-text notes about how it went.
    pub outcome: Option<String>,
    /// Star rating, absent until rated.
    pub rating: Option<Rating>,
    /// Model the prompt was given to.
    pub model: Option<String>,
    /// Kind of task (feature, bugfix, ...).
    pub task_type: Option<String>,
    /// When the prompt was stored.
    pub created_at: DateTime<Utc>,
    /// Last rating or edit.
    pub updated_at: DateTime<Utc>,
    /// Unique tags in insertion order.
    pub tags: Vec<String>,
    /// Detected traits; empty until analyzed.
    pub traits: TraitMap,
}

impl PromptRecord {
    /// Returns true once traits have been detected.
    #[must_use]
    pub fn is_analyzed(&self) -> bool {
        !self.traits.is_empty()
    }
}

/// Input for storing a new prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewPrompt {
    /// The prompt text.
    pub content: String,
    /// Model the prompt was given to.
    pub model: Option<String>,
    /// Kind of task.
    pub task_type: Option<String>,
    /// Tags; normalized on insert.
    pub tags: Vec<String>,
}

impl NewPrompt {
    /// Creates a prompt with only content set.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }

    /// Sets the model label.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the task type label.
    #[must_use]
    pub fn with_task_type(mut self, task_type: impl Into<String>) -> Self {
        self.task_type = Some(task_type.into());
        self
    }

    /// Sets the tags.
    #[must_use]
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Checks the prompt has content.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for blank content.
    pub fn validate(&self) -> Result<()> {
        if self.content.trim().is_empty() {
            return Err(Error::InvalidInput("prompt content is empty".to_string()));
        }
        Ok(())
    }
}

/// Filter for listing prompts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListFilter {
    /// Only prompts carrying this tag.
    pub tag: Option<String>,
    /// Only prompts with exactly this rating.
    pub rating: Option<Rating>,
    /// Maximum rows returned.
    pub limit: usize,
    /// Rows skipped before the first returned.
    pub offset: usize,
}

impl Default for ListFilter {
    fn default() -> Self {
        Self {
            tag: None,
            rating: None,
            limit: 20,
            offset: 0,
        }
    }
}

impl ListFilter {
    /// Creates a filter with default paging.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts to a tag.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Restricts to a rating.
    #[must_use]
    pub const fn with_rating(mut self, rating: Rating) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Sets the page size.
    #[must_use]
    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Sets the page offset.
    #[must_use]
    pub const fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }
}

/// Splits a comma-separated tag string, trimming and dropping blanks and
/// duplicates while keeping first-seen order.
#[must_use]
pub fn parse_tags(input: &str) -> Vec<String> {
    normalize_tags(input.split(','))
}

/// Trims, drops blanks, and removes duplicates, keeping first-seen order.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.as_ref().trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}
