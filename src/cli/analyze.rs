//! Trait detection commands: analyze, traits.

#![allow(clippy::print_stdout)]
#![allow(clippy::print_stderr)]

use crate::detection::TraitDetector;
use crate::models::{PromptRecord, PromptTrait};
use crate::storage::RecordStore;
use anyhow::bail;
use std::fmt::Write as _;

/// Summary of an `analyze` run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalyzeSummary {
    /// Prompts whose traits were stored.
    pub analyzed: usize,
    /// Prompts where detection or saving failed.
    pub failed: usize,
}

/// Detects and stores traits for every prompt that has none yet.
///
/// A failure on one prompt is reported and the run continues.
///
/// # Errors
///
/// Returns an error if the list of pending prompts cannot be read.
pub fn cmd_analyze(
    store: &dyn RecordStore,
    detector: &dyn TraitDetector,
) -> anyhow::Result<AnalyzeSummary> {
    let pending = store.unanalyzed()?;
    if pending.is_empty() {
        println!("All prompts have been analyzed.");
        return Ok(AnalyzeSummary::default());
    }

    println!("Analyzing {} prompts...\n", pending.len());
    let mut summary = AnalyzeSummary::default();

    for record in &pending {
        let result = detector
            .detect(&record.content)
            .and_then(|traits| store.save_traits(record.id, &traits).map(|()| traits));

        match result {
            Ok(traits) => {
                summary.analyzed += 1;
                let detected = traits.values().filter(|v| **v).count();
                println!("#{} ✓ {detected} traits detected", record.id);
            },
            Err(e) => {
                summary.failed += 1;
                tracing::warn!(prompt_id = record.id, error = %e, "Trait analysis failed");
                println!("#{} ✗ Error: {e}", record.id);
            },
        }
    }

    tracing::info!(
        analyzed = summary.analyzed,
        failed = summary.failed,
        detector = detector.name(),
        "Analysis run complete"
    );
    Ok(summary)
}

/// Shows present and missing traits for one prompt, detecting them first
/// if the prompt has not been analyzed.
///
/// # Errors
///
/// Returns an error if the prompt does not exist or detection fails.
pub fn cmd_traits(
    store: &dyn RecordStore,
    detector: &dyn TraitDetector,
    id: i64,
) -> anyhow::Result<()> {
    let Some(mut record) = store.get(id)? else {
        bail!("Prompt #{id} not found.");
    };

    if !record.is_analyzed() {
        eprintln!("Analyzing...");
        let traits = detector.detect(&record.content)?;
        store.save_traits(id, &traits)?;
        record.traits = traits;
    }

    print!("{}", render_traits(&record));
    Ok(())
}

/// Renders traits in catalog order, present first.
#[must_use]
pub fn render_traits(record: &PromptRecord) -> String {
    let (present, missing): (Vec<PromptTrait>, Vec<PromptTrait>) = PromptTrait::ALL
        .into_iter()
        .partition(|t| record.traits.get(t.as_str()).copied().unwrap_or(false));

    let mut out = format!("\nTraits for Prompt #{}\n", record.id);
    if !present.is_empty() {
        let _ = writeln!(out, "\nPresent:");
        for t in &present {
            let _ = writeln!(out, "  ✓ {} - {}", t.title(), t.description());
        }
    }
    if !missing.is_empty() {
        let _ = writeln!(out, "\nMissing:");
        for t in &missing {
            let _ = writeln!(out, "  ✗ {} - {}", t.title(), t.description());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::KeywordDetector;
    use crate::models::{NewPrompt, TraitMap};
    use crate::storage::SqliteRecordStore;
    use crate::{Error, Result};

    struct Broken;

    impl TraitDetector for Broken {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn detect(&self, _content: &str) -> Result<TraitMap> {
            Err(Error::OperationFailed {
                operation: "detect".to_string(),
                cause: "offline".to_string(),
            })
        }
    }

    #[test]
    fn test_analyze_stores_traits() {
        let store = SqliteRecordStore::in_memory().unwrap();
        store.add(&NewPrompt::new("Fix the crash in app.py")).unwrap();
        store.add(&NewPrompt::new("hello")).unwrap();

        let summary = cmd_analyze(&store, &KeywordDetector).unwrap();
        assert_eq!(summary, AnalyzeSummary { analyzed: 2, failed: 0 });
        assert!(store.unanalyzed().unwrap().is_empty());

        let again = cmd_analyze(&store, &KeywordDetector).unwrap();
        assert_eq!(again, AnalyzeSummary::default());
    }

    #[test]
    fn test_analyze_continues_after_failure() {
        let store = SqliteRecordStore::in_memory().unwrap();
        store.add(&NewPrompt::new("one")).unwrap();
        store.add(&NewPrompt::new("two")).unwrap();

        let summary = cmd_analyze(&store, &Broken).unwrap();
        assert_eq!(summary, AnalyzeSummary { analyzed: 0, failed: 2 });
        assert_eq!(store.unanalyzed().unwrap().len(), 2);
    }

    #[test]
    fn test_traits_detects_once() {
        let store = SqliteRecordStore::in_memory().unwrap();
        let id = store.add(&NewPrompt::new("Fix the crash")).unwrap();

        cmd_traits(&store, &KeywordDetector, id).unwrap();
        assert!(store.get(id).unwrap().unwrap().is_analyzed());

        // Stored traits are reused, so a failing detector is never called.
        cmd_traits(&store, &Broken, id).unwrap();
    }

    #[test]
    fn test_traits_missing_prompt() {
        let store = SqliteRecordStore::in_memory().unwrap();
        assert!(cmd_traits(&store, &KeywordDetector, 9).is_err());
    }

    #[test]
    fn test_render_traits_partition() {
        let store = SqliteRecordStore::in_memory().unwrap();
        let id = store.add(&NewPrompt::new("x")).unwrap();
        let mut record = store.get(id).unwrap().unwrap();
        record.traits = TraitMap::from([("clear_goal".to_string(), true)]);

        let text = render_traits(&record);
        let present_at = text.find("Present:").unwrap();
        let missing_at = text.find("Missing:").unwrap();
        let goal_at = text.find("✓ Clear Goal").unwrap();
        assert!(present_at < goal_at && goal_at < missing_at);
        assert_eq!(text.matches("✗ ").count(), 9);
    }
}
