//! Structured logging configuration.

use crate::config::LoggingSettings;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a filter directive; wins over `RUST_LOG`.
pub const LOG_ENV: &str = "FRIDGPROMPT_LOG";

const DEFAULT_LEVEL: &str = "warn";
const VERBOSE_LEVEL: &str = "fridgprompt=debug,info";

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable, compact.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

impl LogFormat {
    /// Parses a format name; anything unrecognised is `Pretty`.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// Logging configuration.
#[derive(Debug)]
pub struct LoggingConfig {
    /// Output format.
    pub format: LogFormat,
    /// Event filter.
    pub filter: EnvFilter,
}

impl LoggingConfig {
    /// Builds logging configuration from settings, the environment, and the
    /// `--verbose` flag.
    ///
    /// Precedence for the filter: `FRIDGPROMPT_LOG`, then `RUST_LOG`, then
    /// `--verbose`, then the config file level, then `warn`.
    #[must_use]
    pub fn from_settings(settings: Option<&LoggingSettings>, verbose: bool) -> Self {
        let format = settings
            .and_then(|s| s.format.as_deref())
            .map(LogFormat::parse)
            .unwrap_or_default();

        let directive = filter_directive(settings, verbose);
        let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL));

        Self { format, filter }
    }
}

/// Resolves the filter directive string.
fn filter_directive(settings: Option<&LoggingSettings>, verbose: bool) -> String {
    let from_env = [LOG_ENV, "RUST_LOG"]
        .into_iter()
        .find_map(|key| std::env::var(key).ok().filter(|v| !v.trim().is_empty()));

    if let Some(directive) = from_env {
        return directive;
    }
    if verbose {
        return VERBOSE_LEVEL.to_string();
    }
    settings
        .and_then(|s| s.level.clone())
        .unwrap_or_else(|| DEFAULT_LEVEL.to_string())
}
