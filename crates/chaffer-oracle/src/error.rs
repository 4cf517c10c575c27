//! Error types for the oracle client.
//!
//! Uses `thiserror` for typed errors surfacing through the whole call
//! pipeline: configuration, prompt rendering, the HTTP call, and reply
//! parsing. None of these are fatal to the shop -- the engine converts
//! them into abandoned encounters.

/// Errors that can occur while consulting the negotiation oracle.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    /// Configuration is invalid or missing.
    #[error("config error: {0}")]
    Config(String),

    /// The user has not consented to the model subsystem loading.
    #[error("model download consent has not been given")]
    ConsentWithheld,

    /// Failed to load or render a prompt template.
    #[error("template error: {0}")]
    Template(String),

    /// The LLM backend returned an error or was unreachable.
    #[error("LLM backend error: {0}")]
    Backend(String),

    /// The reply could not be parsed into a valid contract shape.
    #[error("response parse error: {0}")]
    Parse(String),

    /// A call is already in flight; the service holds at most one.
    #[error("an oracle call is already in flight")]
    Busy,

    /// The service is not in the ready state.
    #[error("oracle service is not ready: {status}")]
    NotReady {
        /// The lifecycle state the service is in.
        status: &'static str,
    },

    /// Serialization or deserialization failure.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
}
