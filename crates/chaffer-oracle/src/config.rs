//! Configuration for the oracle client.
//!
//! All configuration is loaded from environment variables: which LLM
//! backend to talk to (URL, key, model), where the prompt templates live,
//! and whether the user has consented to the model subsystem at all. The
//! consent flag is the one piece of state that outlives a session, and it
//! lives out here rather than in the engine.

use crate::error::OracleError;

/// Complete oracle configuration loaded from the environment.
#[derive(Debug, Clone)]
pub struct OracleConfig {
    /// LLM backend configuration.
    pub backend: LlmBackendConfig,
    /// Path to the prompt templates directory.
    pub templates_dir: String,
    /// Whether the user consented to downloading/contacting the model.
    /// When false the oracle subsystem does not load at all.
    pub model_consent: bool,
}

/// Configuration for a single LLM backend.
#[derive(Debug, Clone)]
pub struct LlmBackendConfig {
    /// The backend type (openai-compatible or anthropic).
    pub backend_type: BackendType,
    /// Base API URL (e.g. `https://api.openai.com/v1`).
    pub api_url: String,
    /// API key for authentication.
    pub api_key: String,
    /// Model identifier.
    pub model: String,
}

/// Supported LLM backend types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    /// `OpenAI`-compatible chat completions API (works with `OpenAI`,
    /// `DeepSeek`, Ollama, and local inference servers).
    OpenAi,
    /// Anthropic Messages API (different request format).
    Anthropic,
}

impl OracleConfig {
    /// Load configuration from environment variables.
    ///
    /// Required variables:
    /// - `CHAFFER_BACKEND` -- backend type (`openai`, `ollama`, `anthropic`, ...)
    /// - `CHAFFER_API_URL` -- API base URL
    /// - `CHAFFER_API_KEY` -- API key
    /// - `CHAFFER_MODEL` -- model name
    ///
    /// Optional variables:
    /// - `CHAFFER_TEMPLATES_DIR` -- prompt template directory (default `templates`)
    /// - `CHAFFER_MODEL_CONSENT` -- consent flag (default `false`)
    pub fn from_env() -> Result<Self, OracleError> {
        let backend = load_backend_config()?;

        let templates_dir =
            std::env::var("CHAFFER_TEMPLATES_DIR").unwrap_or_else(|_| "templates".to_owned());

        let model_consent: bool = std::env::var("CHAFFER_MODEL_CONSENT")
            .unwrap_or_else(|_| "false".to_owned())
            .parse()
            .map_err(|e| OracleError::Config(format!("invalid CHAFFER_MODEL_CONSENT: {e}")))?;

        Ok(Self {
            backend,
            templates_dir,
            model_consent,
        })
    }
}

/// Read a required environment variable.
fn env_var(name: &str) -> Result<String, OracleError> {
    std::env::var(name)
        .map_err(|e| OracleError::Config(format!("missing required env var {name}: {e}")))
}

/// Load the LLM backend config from the environment.
fn load_backend_config() -> Result<LlmBackendConfig, OracleError> {
    let backend_str = env_var("CHAFFER_BACKEND")?;
    let api_url = env_var("CHAFFER_API_URL")?;
    let api_key = env_var("CHAFFER_API_KEY")?;
    let model = env_var("CHAFFER_MODEL")?;

    let backend_type = parse_backend_type(&backend_str)?;

    Ok(LlmBackendConfig {
        backend_type,
        api_url,
        api_key,
        model,
    })
}

/// Map a backend name string to the typed enum.
fn parse_backend_type(name: &str) -> Result<BackendType, OracleError> {
    match name.to_lowercase().as_str() {
        "openai" | "deepseek" | "ollama" | "webllm" => Ok(BackendType::OpenAi),
        "anthropic" | "claude" => Ok(BackendType::Anthropic),
        other => Err(OracleError::Config(format!("unknown backend type: {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_type_aliases() {
        assert_eq!(parse_backend_type("openai").ok(), Some(BackendType::OpenAi));
        assert_eq!(parse_backend_type("Ollama").ok(), Some(BackendType::OpenAi));
        assert_eq!(
            parse_backend_type("anthropic").ok(),
            Some(BackendType::Anthropic)
        );
        assert_eq!(
            parse_backend_type("claude").ok(),
            Some(BackendType::Anthropic)
        );
        assert!(parse_backend_type("carrier-pigeon").is_err());
    }

    #[test]
    fn direct_config_construction() {
        // from_env needs real env vars; the struct itself is plain data.
        let config = LlmBackendConfig {
            backend_type: BackendType::OpenAi,
            api_url: "http://localhost:11434/v1".to_owned(),
            api_key: "unused".to_owned(),
            model: "llama3.1:8b".to_owned(),
        };
        assert_eq!(config.backend_type, BackendType::OpenAi);
    }
}
