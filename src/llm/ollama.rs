//! Ollama (local) client.

use super::{LlmHttpConfig, LlmProvider, build_http_client};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Ollama local LLM client.
pub struct OllamaClient {
    /// API endpoint.
    endpoint: String,
    /// Model to use.
    model: String,
    /// HTTP client.
    client: reqwest::blocking::Client,
}

impl OllamaClient {
    /// Default API endpoint.
    pub const DEFAULT_ENDPOINT: &'static str = "http://localhost:11434";

    /// Default model.
    pub const DEFAULT_MODEL: &'static str = "qwen2.5:7b";

    /// Sampling temperature; kept low so repeated analysis agrees with itself.
    const TEMPERATURE: f32 = 0.1;

    /// Upper bound on generated tokens.
    const NUM_PREDICT: u32 = 500;

    /// Port Ollama listens on when the host names none.
    pub const DEFAULT_PORT: u16 = 11434;

    /// Creates a new Ollama client.
    ///
    /// Reads `OLLAMA_HOST` and `OLLAMA_MODEL`, falling back to the defaults.
    #[must_use]
    pub fn new() -> Self {
        let endpoint = std::env::var("OLLAMA_HOST")
            .map_or_else(|_| Self::DEFAULT_ENDPOINT.to_string(), |host| normalize_endpoint(&host));
        let model =
            std::env::var("OLLAMA_MODEL").unwrap_or_else(|_| Self::DEFAULT_MODEL.to_string());

        Self {
            endpoint,
            model,
            client: build_http_client(LlmHttpConfig::from_env()),
        }
    }

    /// Sets the API endpoint.
    ///
    /// Accepts the same forms as `OLLAMA_HOST`, e.g. `localhost:11434` or
    /// `http://gpu-box:11434/`.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl AsRef<str>) -> Self {
        self.endpoint = normalize_endpoint(endpoint.as_ref());
        self
    }

    /// Sets the model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets HTTP client timeouts for LLM requests.
    #[must_use]
    pub fn with_http_config(mut self, config: LlmHttpConfig) -> Self {
        self.client = build_http_client(config);
        self
    }

    /// Returns the configured model.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns the normalized endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Calls `/api/generate` without streaming and returns the reply text.
    fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/generate", self.endpoint);
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: Self::TEMPERATURE,
                num_predict: Self::NUM_PREDICT,
            },
        };

        let response = self.client.post(&url).json(&body).send().map_err(|e| {
            self.failure("ollama_request", format!("{} error: {e}", transport_kind(&e)))
        })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().unwrap_or_default();
            return Err(self.failure("ollama_request", format!("{url} answered {status}: {detail}")));
        }

        response
            .json::<GenerateResponse>()
            .map(|reply| reply.response)
            .map_err(|e| self.failure("ollama_response", e.to_string()))
    }

    /// Logs a failed call and turns it into an [`Error`].
    fn failure(&self, operation: &str, cause: String) -> Error {
        tracing::warn!(
            model = %self.model,
            endpoint = %self.endpoint,
            operation,
            cause = %cause,
            "Ollama call failed"
        );
        Error::OperationFailed {
            operation: operation.to_string(),
            cause,
        }
    }
}

/// Classifies a transport error for logs and messages.
fn transport_kind(e: &reqwest::Error) -> &'static str {
    if e.is_builder() {
        "invalid endpoint"
    } else if e.is_timeout() {
        "timeout"
    } else if e.is_connect() {
        "connect"
    } else {
        "transport"
    }
}

/// Turns an `OLLAMA_HOST` style value into a base URL.
///
/// A missing scheme becomes `http://`, and a bare host then gets the
/// default Ollama port. Hosts with an explicit scheme keep that scheme's
/// default port. Trailing slashes are dropped.
fn normalize_endpoint(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return OllamaClient::DEFAULT_ENDPOINT.to_string();
    }
    if trimmed.contains("://") {
        return trimmed.to_string();
    }

    let (authority, path) = trimmed
        .find('/')
        .map_or((trimmed, ""), |at| trimmed.split_at(at));
    if has_port(authority) {
        format!("http://{authority}{path}")
    } else {
        format!("http://{authority}:{}{path}", OllamaClient::DEFAULT_PORT)
    }
}

fn has_port(authority: &str) -> bool {
    // `[::1]:11434` style IPv6 literals carry colons inside the brackets.
    authority.rsplit_once(']').map_or_else(
        || authority.contains(':'),
        |(_, after)| after.starts_with(':'),
    )
}

impl Default for OllamaClient {
    fn default() -> Self {
        Self::new()
    }
}

impl LlmProvider for OllamaClient {
    fn name(&self) -> &'static str {
        "ollama"
    }

    fn complete(&self, prompt: &str) -> Result<String> {
        self.generate(prompt)
    }
}

/// Request to the Generate API.
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

/// Sampling options for the Generate API.
#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: u32,
}

/// Response from the Generate API.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}
