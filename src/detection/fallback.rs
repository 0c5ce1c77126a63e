//! Primary/secondary detector chaining.

use super::TraitDetector;
use crate::Result;
use crate::models::TraitMap;

/// Runs `primary`, falling back to `secondary` when it fails.
pub struct FallbackDetector<A, B> {
    primary: A,
    secondary: B,
}

impl<A: TraitDetector, B: TraitDetector> FallbackDetector<A, B> {
    /// Chains two detectors.
    #[must_use]
    pub const fn new(primary: A, secondary: B) -> Self {
        Self { primary, secondary }
    }
}

impl<A: TraitDetector, B: TraitDetector> TraitDetector for FallbackDetector<A, B> {
    fn name(&self) -> &'static str {
        "fallback"
    }

    fn detect(&self, content: &str) -> Result<TraitMap> {
        match self.primary.detect(content) {
            Ok(traits) => Ok(traits),
            Err(e) => {
                tracing::warn!(
                    primary = self.primary.name(),
                    secondary = self.secondary.name(),
                    error = %e,
                    "Trait detection failed, falling back"
                );
                self.secondary.detect(content)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::detection::KeywordDetector;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Fixed(bool);

    impl TraitDetector for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn detect(&self, _content: &str) -> Result<TraitMap> {
            Ok(TraitMap::from([("clear_goal".to_string(), self.0)]))
        }
    }

    #[derive(Default)]
    struct Failing {
        calls: AtomicUsize,
    }

    impl TraitDetector for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn detect(&self, _content: &str) -> Result<TraitMap> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(Error::OperationFailed {
                operation: "ollama_request".to_string(),
                cause: "connection refused".to_string(),
            })
        }
    }

    #[test]
    fn test_primary_wins_on_success() {
        let detector = FallbackDetector::new(Fixed(true), Fixed(false));
        let traits = detector.detect("x").unwrap();
        assert_eq!(traits.get("clear_goal"), Some(&true));
    }

    #[test]
    fn test_secondary_used_on_failure() {
        let detector = FallbackDetector::new(Failing::default(), KeywordDetector);
        let traits = detector.detect("Fix the crash").unwrap();
        assert_eq!(traits.get("shows_error"), Some(&true));
        assert_eq!(detector.primary.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_both_failing_is_error() {
        let detector = FallbackDetector::new(Failing::default(), Failing::default());
        assert!(detector.detect("x").is_err());
    }
}
