//! Process configuration.
//!
//! All settings resolve from explicit struct fields first, then the
//! environment, then defaults. The recognized variables:
//!
//! | Variable | Meaning |
//! |----------|---------|
//! | `LLM_ENDPOINT` | Base URL of the embedding/generation service |
//! | `LLM_API_KEY` | Bearer token sent to the LLM service |
//! | `QDRANT_URL` | Vector store URL (default `http://localhost:6333`) |
//! | `QDRANT_API_KEY` | API key sent to the vector store |
//!
//! An unset `LLM_ENDPOINT` is not an error: the embedding provider and the
//! orchestrator both carry deterministic fallbacks for that case.

/// Default vector store URL when `QDRANT_URL` is unset.
pub const DEFAULT_STORE_URL: &str = "http://localhost:6333";

/// Per-request timeout for every outbound HTTP call, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Resolved process settings shared by the store client, the embedding
/// provider, and the orchestrator. Read-only after construction.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base URL of the LLM service, e.g. `http://localhost:11434`.
    /// `None` selects the deterministic fallback paths.
    pub llm_endpoint: Option<String>,
    /// Bearer token for the LLM service.
    pub llm_api_key: Option<String>,
    /// Vector store URL.
    pub store_url: String,
    /// API key for the vector store.
    pub store_api_key: Option<String>,
    /// Timeout applied to each outbound HTTP request.
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            llm_endpoint: None,
            llm_api_key: None,
            store_url: DEFAULT_STORE_URL.to_string(),
            store_api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    /// Resolve settings from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            llm_endpoint: env_non_empty("LLM_ENDPOINT"),
            llm_api_key: env_non_empty("LLM_API_KEY"),
            store_url: env_non_empty("QDRANT_URL")
                .unwrap_or_else(|| DEFAULT_STORE_URL.to_string()),
            store_api_key: env_non_empty("QDRANT_API_KEY"),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Whether a remote generation/embedding endpoint is configured.
    pub fn llm_enabled(&self) -> bool {
        self.llm_endpoint.is_some()
    }
}

/// Read an environment variable, treating empty values as unset.
fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
