//! Negotiation oracle client for the Chaffer simulation.
//!
//! The engine treats customer reasoning as an external black box: given a
//! structured context it expects a spoken line plus a decision. This
//! crate is that box's Rust side -- prompt rendering, the HTTP call to an
//! LLM backend, reply parsing and validation, and the service lifecycle
//! around it all. Nothing in here mutates shop state.
//!
//! # Modules
//!
//! - [`config`] -- Environment configuration incl. the consent gate
//! - [`error`] -- Error types for the whole call pipeline ([`OracleError`])
//! - [`llm`] -- Enum-dispatched LLM backends over `reqwest`
//! - [`parse`] -- Reply parsing with recovery strategies
//! - [`prompt`] -- `minijinja` prompt templates loaded from disk
//! - [`service`] -- [`OracleService`] lifecycle and the in-flight flag

pub mod config;
pub mod error;
pub mod llm;
pub mod parse;
pub mod prompt;
pub mod service;

// Re-export primary types at crate root for convenience.
pub use config::{BackendType, LlmBackendConfig, OracleConfig};
pub use error::OracleError;
pub use llm::{LlmBackend, create_backend};
pub use parse::{parse_counter_reply, parse_opening_reply};
pub use prompt::{PromptEngine, RenderedPrompt};
pub use service::{OracleService, ServiceStatus};
