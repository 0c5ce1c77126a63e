//! LLM-based trait detection.

use super::TraitDetector;
use crate::llm::{LlmProvider, extract_json_object};
use crate::models::{PromptTrait, TraitMap};
use crate::{Error, Result};
use serde_json::Value;
use std::fmt::Write as _;

/// Builds the classification prompt sent to the model.
#[must_use]
pub fn build_analysis_prompt(content: &str) -> String {
    let mut traits_list = String::new();
    for t in PromptTrait::ALL {
        let _ = writeln!(traits_list, "- {}: {}", t.as_str(), t.description());
    }

    format!(
        "Analyze this vibe coding prompt and identify which traits are present.\n\n\
         TRAITS TO DETECT:\n{traits_list}\n\
         PROMPT TO ANALYZE:\n\"\"\"\n{content}\n\"\"\"\n\n\
         Return ONLY a JSON object with trait names as keys and boolean values.\n\
         Example: {{\"clear_goal\": true, \"gives_context\": false, \"references_files\": true, ...}}\n\n\
         Include ALL traits in your response. Be accurate - only mark true if the trait is clearly present.\n\n\
         JSON response:"
    )
}

/// Detector that asks a language model to classify the prompt.
pub struct LlmTraitDetector<P: LlmProvider> {
    provider: P,
}

impl<P: LlmProvider> LlmTraitDetector<P> {
    /// Creates a detector over `provider`.
    #[must_use]
    pub const fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Returns the underlying provider.
    #[must_use]
    pub const fn provider(&self) -> &P {
        &self.provider
    }
}

/// Reads a model reply into a full trait map.
///
/// A reply without any JSON object yields all traits absent. Values that are
/// not booleans are read by truthiness.
fn parse_response(response: &str) -> Result<TraitMap> {
    let Some(json) = extract_json_object(response) else {
        tracing::debug!("LLM reply had no JSON object, marking all traits absent");
        return Ok(PromptTrait::ALL
            .iter()
            .map(|t| (t.as_str().to_string(), false))
            .collect());
    };

    let parsed: Value = serde_json::from_str(json).map_err(|e| Error::OperationFailed {
        operation: "parse_trait_response".to_string(),
        cause: e.to_string(),
    })?;
    let Value::Object(fields) = parsed else {
        return Err(Error::OperationFailed {
            operation: "parse_trait_response".to_string(),
            cause: "expected a JSON object".to_string(),
        });
    };

    Ok(PromptTrait::ALL
        .iter()
        .map(|t| {
            let present = fields.get(t.as_str()).is_some_and(is_truthy);
            (t.as_str().to_string(), present)
        })
        .collect())
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

impl<P: LlmProvider> TraitDetector for LlmTraitDetector<P> {
    fn name(&self) -> &'static str {
        "llm"
    }

    fn detect(&self, content: &str) -> Result<TraitMap> {
        let prompt = build_analysis_prompt(content);
        let response = self.provider.complete(&prompt)?;
        let traits = parse_response(response.trim())?;
        tracing::debug!(
            provider = self.provider.name(),
            detected = traits.values().filter(|v| **v).count(),
            "LLM trait detection complete"
        );
        Ok(traits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct CannedProvider {
        reply: String,
        seen: Mutex<Vec<String>>,
    }

    impl CannedProvider {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl LlmProvider for CannedProvider {
        fn name(&self) -> &'static str {
            "canned"
        }

        fn complete(&self, prompt: &str) -> Result<String> {
            self.seen.lock().unwrap().push(prompt.to_string());
            Ok(self.reply.clone())
        }
    }

    struct DownProvider;

    impl LlmProvider for DownProvider {
        fn name(&self) -> &'static str {
            "down"
        }

        fn complete(&self, _prompt: &str) -> Result<String> {
            Err(Error::OperationFailed {
                operation: "ollama_request".to_string(),
                cause: "connection refused".to_string(),
            })
        }
    }

    #[test]
    fn test_prompt_lists_catalog_and_content() {
        let prompt = build_analysis_prompt("Fix the navbar");
        for t in PromptTrait::ALL {
            assert!(prompt.contains(&format!("- {}: {}", t.as_str(), t.description())));
        }
        assert!(prompt.contains("\"\"\"\nFix the navbar\n\"\"\""));
        assert!(prompt.ends_with("JSON response:"));
    }

    #[test]
    fn test_detect_fills_missing_traits() {
        let detector = LlmTraitDetector::new(CannedProvider::new(
            "Sure! Here you go:\n```json\n{\"clear_goal\": true, \"shows_error\": false}\n```",
        ));
        let traits = detector.detect("Fix the navbar").unwrap();

        assert_eq!(traits.len(), PromptTrait::ALL.len());
        assert_eq!(traits.get("clear_goal"), Some(&true));
        assert_eq!(traits.get("gives_context"), Some(&false));

        let seen = detector.provider().seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].contains("Fix the navbar"));
    }

    #[test]
    fn test_detect_ignores_unknown_keys() {
        let detector = LlmTraitDetector::new(CannedProvider::new(
            r#"{"clear_goal": true, "is_polite": true}"#,
        ));
        let traits = detector.detect("x").unwrap();
        assert!(!traits.contains_key("is_polite"));
    }

    #[test]
    fn test_truthy_values() {
        let traits =
            parse_response(r#"{"clear_goal": 1, "explains_why": "yes", "shows_example": 0, "skip": null}"#)
                .unwrap();
        assert_eq!(traits.get("clear_goal"), Some(&true));
        assert_eq!(traits.get("explains_why"), Some(&true));
        assert_eq!(traits.get("shows_example"), Some(&false));
    }

    #[test]
    fn test_no_json_means_all_absent() {
        let traits = parse_response("I cannot help with that.").unwrap();
        assert_eq!(traits.len(), PromptTrait::ALL.len());
        assert!(traits.values().all(|v| !v));
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(parse_response("{clear_goal: yes}").is_err());
    }

    #[test]
    fn test_provider_error_propagates() {
        let detector = LlmTraitDetector::new(DownProvider);
        assert!(detector.detect("anything").is_err());
        assert_eq!(detector.name(), "llm");
    }
}
