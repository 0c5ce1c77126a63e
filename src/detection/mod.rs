//! Trait detection.
//!
//! A [`TraitDetector`] reads a prompt and reports which catalog traits it
//! shows. Two strategies are available:
//!
//! | Detector | Source | Failure mode |
//! |----------|--------|--------------|
//! | [`KeywordDetector`] | Lowercase substring rules | Never fails |
//! | [`LlmTraitDetector`] | Local model via [`LlmProvider`](crate::llm::LlmProvider) | Network or parse errors |
//!
//! [`FallbackDetector`] chains them so an unreachable model degrades to the
//! keyword rules instead of failing the command.

mod fallback;
mod keyword;
mod llm;

pub use fallback::FallbackDetector;
pub use keyword::KeywordDetector;
pub use llm::{LlmTraitDetector, build_analysis_prompt};

use crate::Result;
use crate::config::LlmConfig;
use crate::llm::{LlmHttpConfig, OllamaClient};
use crate::models::TraitMap;

/// Detects prompt traits.
pub trait TraitDetector: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Detects traits in `content`.
    ///
    /// Implementations report every catalog trait, present or not.
    ///
    /// # Errors
    ///
    /// Returns an error if detection could not run.
    fn detect(&self, content: &str) -> Result<TraitMap>;
}

/// Builds the detector for a command.
///
/// With `use_llm` off this is the keyword detector alone. Otherwise an
/// Ollama-backed detector is tried first and the keyword detector covers its
/// failures. Model precedence is `model_override`, then the config file,
/// then `OLLAMA_MODEL`, then the client default.
#[must_use]
pub fn build_detector(
    config: &LlmConfig,
    use_llm: bool,
    model_override: Option<&str>,
) -> Box<dyn TraitDetector> {
    if !use_llm {
        tracing::debug!("Using keyword trait detection");
        return Box::new(KeywordDetector);
    }

    let mut client = OllamaClient::new().with_http_config(LlmHttpConfig::from_config(config));
    if let Some(endpoint) = &config.endpoint {
        client = client.with_endpoint(endpoint);
    }
    if let Some(model) = model_override.or(config.model.as_deref()) {
        client = client.with_model(model);
    }
    tracing::debug!(
        model = client.model(),
        endpoint = client.endpoint(),
        "Using LLM trait detection"
    );

    Box::new(FallbackDetector::new(
        LlmTraitDetector::new(client),
        KeywordDetector,
    ))
}
