//! Configuration management.
//!
//! Settings come from a TOML file plus a few environment overrides. Lookup
//! order for the file:
//!
//! 1. `--config <path>` on the command line
//! 2. `FRIDGPROMPT_CONFIG`
//! 3. `<platform config dir>/fridgprompt/config.toml`
//!
//! A missing file is not an error; defaults apply. `FRIDGPROMPT_DB_PATH`
//! overrides the database location whatever the file says.
//!
//! ```toml
//! db_path = "/home/me/.fridgprompt/prompts.db"
//! list_limit = 10
//!
//! [llm]
//! model = "qwen2.5:7b"
//! endpoint = "http://localhost:11434"
//! timeout_ms = 60000
//!
//! [logging]
//! level = "info"
//! format = "json"
//! ```

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming a config file.
pub const CONFIG_PATH_ENV: &str = "FRIDGPROMPT_CONFIG";

/// Environment variable overriding the database path.
pub const DB_PATH_ENV: &str = "FRIDGPROMPT_DB_PATH";

/// Main configuration for fridgprompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FridgConfig {
    /// Path to the `SQLite` vault.
    pub db_path: PathBuf,
    /// Default number of rows for `list`.
    pub list_limit: usize,
    /// Local LLM settings.
    pub llm: LlmConfig,
    /// Logging settings.
    pub logging: LoggingSettings,
}

/// LLM provider configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LlmConfig {
    /// Model name.
    pub model: Option<String>,
    /// Base URL of the Ollama server.
    pub endpoint: Option<String>,
    /// Request timeout in milliseconds.
    pub timeout_ms: Option<u64>,
    /// Connect timeout in milliseconds.
    pub connect_timeout_ms: Option<u64>,
}

/// Logging section of the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LoggingSettings {
    /// Filter directive, e.g. `info` or `fridgprompt=debug`.
    pub level: Option<String>,
    /// `pretty` or `json`.
    pub format: Option<String>,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Database path.
    pub db_path: Option<String>,
    /// Default list size.
    pub list_limit: Option<usize>,
    /// LLM configuration.
    pub llm: Option<LlmConfig>,
    /// Logging configuration.
    pub logging: Option<LoggingSettings>,
}

impl Default for FridgConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            list_limit: 10,
            llm: LlmConfig::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl FridgConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves configuration from an explicit path, the environment, or the
    /// default location, then applies environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly named file cannot be read or parsed.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config = if let Some(path) = explicit {
            Self::load_from_file(path)?
        } else if let Some(path) = std::env::var_os(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
            Self::load_from_file(Path::new(&path))?
        } else {
            Self::load_default()
        };

        Ok(config.with_env_overrides())
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::OperationFailed {
            operation: "read_config_file".to_string(),
            cause: format!("{}: {e}", path.display()),
        })?;

        Self::parse(&contents)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid config file.
    pub fn parse(contents: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(contents).map_err(|e| Error::OperationFailed {
            operation: "parse_config_file".to_string(),
            cause: e.to_string(),
        })?;

        Ok(Self::from_config_file(file))
    }

    /// Loads configuration from the platform config directory.
    ///
    /// Returns default configuration if no config file is found or it fails
    /// to load.
    #[must_use]
    pub fn load_default() -> Self {
        let Some(path) = default_config_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }

        match Self::load_from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config file");
                Self::default()
            },
        }
    }

    /// Converts a `ConfigFile` to `FridgConfig`.
    fn from_config_file(file: ConfigFile) -> Self {
        let mut config = Self::default();

        if let Some(db_path) = file.db_path {
            config.db_path = expand_home(&db_path);
        }
        if let Some(list_limit) = file.list_limit {
            config.list_limit = list_limit;
        }
        if let Some(llm) = file.llm {
            config.llm = llm;
        }
        if let Some(logging) = file.logging {
            config.logging = logging;
        }

        config
    }

    /// Applies environment variable overrides.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(path) = std::env::var_os(DB_PATH_ENV).filter(|p| !p.is_empty()) {
            self.db_path = PathBuf::from(path);
        }
        self
    }

    /// Sets the database path.
    #[must_use]
    pub fn with_db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.db_path = path.into();
        self
    }
}

/// Returns the default database path, `~/.fridgprompt/prompts.db`.
#[must_use]
pub fn default_db_path() -> PathBuf {
    directories::BaseDirs::new().map_or_else(
        || PathBuf::from(".fridgprompt").join("prompts.db"),
        |d| d.home_dir().join(".fridgprompt").join("prompts.db"),
    )
}

/// Returns `<platform config dir>/fridgprompt/config.toml`.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("fridgprompt").join("config.toml"))
}

/// Expands a leading `~/` to the home directory.
fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), directories::BaseDirs::new()) {
        (Some(rest), Some(dirs)) => dirs.home_dir().join(rest),
        _ => PathBuf::from(path),
    }
}
