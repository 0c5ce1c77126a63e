//! Keyword-based trait detection.
//!
//! Matches lowercase substrings against per-trait signal lists. Fast, offline,
//! and crude: "app" also matches "happy".

use super::TraitDetector;
use crate::Result;
use crate::models::{PromptTrait, TraitMap};

/// Signal substrings for each trait.
const SIGNALS: [(PromptTrait, &[&str]); 10] = [
    (
        PromptTrait::ClearGoal,
        &["add", "create", "build", "fix", "make", "implement", "want"],
    ),
    (
        PromptTrait::GivesContext,
        &["using", "project", "app", "this is", "we have", "i have"],
    ),
    (
        PromptTrait::ReferencesFiles,
        &[
            ".py", ".js", ".ts", ".tsx", ".jsx", ".css", ".html", "component", "file", "function",
        ],
    ),
    (
        PromptTrait::ShowsError,
        &[
            "error",
            "exception",
            "failed",
            "crash",
            "bug",
            "issue",
            "typeerror",
            "syntaxerror",
        ],
    ),
    (
        PromptTrait::DescribesBehavior,
        &["should", "when", "if clicked", "displays", "shows", "returns", "behave"],
    ),
    (
        PromptTrait::SetsConstraints,
        &["simple", "only", "don't use", "without", "keep it", "no external", "limit"],
    ),
    (
        PromptTrait::BreaksDownTask,
        &["first", "then", "step", "1.", "2.", "finally", "after that"],
    ),
    (
        PromptTrait::ShowsExample,
        &["example", "like this", "such as", "e.g.", "for instance", "{\"", "```"],
    ),
    (
        PromptTrait::ExplainsWhy,
        &["because", "since", "reason", "so that", "in order to", "need to"],
    ),
    (
        PromptTrait::SpecifiesNegative,
        &["don't", "do not", "avoid", "never", "without", "not include", "skip"],
    ),
];

/// Rule-based detector used offline and as the LLM fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordDetector;

impl KeywordDetector {
    /// Detects traits without going through the [`TraitDetector`] result.
    #[must_use]
    pub fn detect_traits(content: &str) -> TraitMap {
        let lower = content.to_lowercase();
        SIGNALS
            .iter()
            .map(|(t, signals)| {
                let present = signals.iter().any(|signal| lower.contains(signal));
                (t.as_str().to_string(), present)
            })
            .collect()
    }
}

impl TraitDetector for KeywordDetector {
    fn name(&self) -> &'static str {
        "keyword"
    }

    fn detect(&self, content: &str) -> Result<TraitMap> {
        Ok(Self::detect_traits(content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn present(content: &str) -> Vec<String> {
        KeywordDetector::detect_traits(content)
            .into_iter()
            .filter_map(|(name, on)| on.then_some(name))
            .collect()
    }

    #[test]
    fn test_signals_cover_catalog_in_order() {
        let traits: Vec<PromptTrait> = SIGNALS.iter().map(|(t, _)| *t).collect();
        assert_eq!(traits, PromptTrait::ALL.to_vec());
    }

    #[test]
    fn test_emits_all_traits() {
        let traits = KeywordDetector::detect_traits("");
        assert_eq!(traits.len(), PromptTrait::ALL.len());
        assert!(traits.values().all(|v| !v));
    }

    #[test_case("Please ADD a login page", PromptTrait::ClearGoal; "case insensitive goal")]
    #[test_case("This is a React project", PromptTrait::GivesContext; "context")]
    #[test_case("look at main.py", PromptTrait::ReferencesFiles; "file extension")]
    #[test_case("TypeError: x is undefined", PromptTrait::ShowsError; "error")]
    #[test_case("it should redirect", PromptTrait::DescribesBehavior; "behavior")]
    #[test_case("keep it small", PromptTrait::SetsConstraints; "constraint")]
    #[test_case("1. parse 2. render", PromptTrait::BreaksDownTask; "numbered steps")]
    #[test_case("output like this: {\"a\": 1}", PromptTrait::ShowsExample; "example")]
    #[test_case("so that users can log in", PromptTrait::ExplainsWhy; "reason")]
    #[test_case("never touch the db", PromptTrait::SpecifiesNegative; "negative")]
    fn test_detects_trait(content: &str, expected: PromptTrait) {
        let traits = KeywordDetector::detect_traits(content);
        assert_eq!(traits.get(expected.as_str()), Some(&true), "{content}");
    }

    #[test]
    fn test_shared_signal_sets_both_traits() {
        let found = present("do it without libraries");
        assert!(found.contains(&"sets_constraints".to_string()));
        assert!(found.contains(&"specifies_negative".to_string()));
    }

    #[test]
    fn test_plain_text_detects_nothing() {
        assert!(present("hello there").is_empty());
    }

    #[test]
    fn test_detector_never_fails() {
        assert!(KeywordDetector.detect("anything at all").is_ok());
        assert_eq!(KeywordDetector.name(), "keyword");
    }
}
