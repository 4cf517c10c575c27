//! The oracle service: lifecycle, consent gating, and the in-flight flag.
//!
//! One [`OracleService`] instance is created at startup and injected into
//! the driver -- there is no ambient global handle. The service owns the
//! LLM backend and the prompt engine, tracks an explicit lifecycle
//! (uninitialized, loading, ready, failed), and enforces the
//! one-outstanding-call discipline with an in-flight flag rather than
//! trusting every caller to serialize.
//!
//! Error policy: service-state problems (not ready, busy) are returned as
//! errors for the caller to surface; call failures (transport, template,
//! parse) are folded into the `Failed` outcome variants so the engine can
//! abandon the encounter through its normal transition path.

use std::sync::atomic::{AtomicBool, Ordering};

use chaffer_types::commands::{CounterOutcome, OpeningOutcome};
use chaffer_types::contract::{CounterContext, OpeningContext};
use tracing::{debug, info, warn};

use crate::config::OracleConfig;
use crate::error::OracleError;
use crate::llm::{LlmBackend, create_backend};
use crate::parse::{parse_counter_reply, parse_opening_reply};
use crate::prompt::PromptEngine;

// ---------------------------------------------------------------------------
// ServiceStatus
// ---------------------------------------------------------------------------

/// Lifecycle state of the oracle subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceStatus {
    /// Not initialized; consent may be missing.
    Uninitialized,
    /// Initialization in progress.
    Loading,
    /// Ready to take calls.
    Ready,
    /// Initialization failed; calls are rejected.
    Failed,
}

impl ServiceStatus {
    /// Stable name for logs and error messages.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Failed => "failed",
        }
    }
}

impl core::fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// OracleService
// ---------------------------------------------------------------------------

/// The negotiation oracle, wrapped in an explicit service object.
pub struct OracleService {
    backend: Option<LlmBackend>,
    prompts: Option<PromptEngine>,
    status: ServiceStatus,
    in_flight: AtomicBool,
}

impl OracleService {
    /// Create an uninitialized service.
    pub const fn new() -> Self {
        Self {
            backend: None,
            prompts: None,
            status: ServiceStatus::Uninitialized,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Current lifecycle state.
    pub const fn status(&self) -> ServiceStatus {
        self.status
    }

    /// Whether a call is currently outstanding.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Initialize the backend and prompt engine from configuration.
    ///
    /// Consent is checked first: without it the service stays
    /// uninitialized and the subsystem never loads. A failure during
    /// loading moves the service to the failed state.
    ///
    /// # Errors
    ///
    /// Returns [`OracleError::ConsentWithheld`] without consent, or the
    /// underlying [`OracleError`] when loading fails.
    pub fn initialize(&mut self, config: &OracleConfig) -> Result<(), OracleError> {
        if !config.model_consent {
            warn!("model consent withheld, oracle subsystem will not load");
            return Err(OracleError::ConsentWithheld);
        }

        self.status = ServiceStatus::Loading;
        info!(templates_dir = %config.templates_dir, "loading oracle prompt templates");

        let prompts = match PromptEngine::new(&config.templates_dir) {
            Ok(prompts) => prompts,
            Err(e) => {
                self.status = ServiceStatus::Failed;
                return Err(e);
            }
        };

        let backend = create_backend(&config.backend);
        info!(
            backend = backend.name(),
            model = %config.backend.model,
            "oracle service ready"
        );

        self.prompts = Some(prompts);
        self.backend = Some(backend);
        self.status = ServiceStatus::Ready;
        Ok(())
    }

    /// Ask the customer to survey the shelf and open (or leave).
    ///
    /// # Errors
    ///
    /// Returns [`OracleError::NotReady`] or [`OracleError::Busy`] when the
    /// service cannot take the call. Failures of the call itself come back
    /// as `Ok(OpeningOutcome::Failed { .. })` for the engine to absorb.
    pub async fn opening_offer(
        &self,
        context: &OpeningContext,
    ) -> Result<OpeningOutcome, OracleError> {
        let (backend, prompts) = self.ready_parts()?;
        let _guard = self.begin_call()?;

        let outcome = match Self::run_opening(backend, prompts, context).await {
            Ok(reply) => OpeningOutcome::Reply(reply),
            Err(e) => {
                warn!(error = %e, "opening oracle call failed");
                OpeningOutcome::Failed {
                    message: e.to_string(),
                }
            }
        };
        Ok(outcome)
    }

    /// Ask the customer to react to the shopkeeper's counter.
    ///
    /// # Errors
    ///
    /// Returns [`OracleError::NotReady`] or [`OracleError::Busy`] when the
    /// service cannot take the call. Failures of the call itself come back
    /// as `Ok(CounterOutcome::Failed { .. })` for the engine to absorb.
    pub async fn counter_decision(
        &self,
        context: &CounterContext,
        player_text: &str,
    ) -> Result<CounterOutcome, OracleError> {
        let (backend, prompts) = self.ready_parts()?;
        let _guard = self.begin_call()?;

        let outcome = match Self::run_counter(backend, prompts, context, player_text).await {
            Ok(reply) => CounterOutcome::Reply(reply),
            Err(e) => {
                warn!(error = %e, "counter oracle call failed");
                CounterOutcome::Failed {
                    message: e.to_string(),
                }
            }
        };
        Ok(outcome)
    }

    /// The full opening pipeline: render, call, parse.
    async fn run_opening(
        backend: &LlmBackend,
        prompts: &PromptEngine,
        context: &OpeningContext,
    ) -> Result<chaffer_types::OpeningReply, OracleError> {
        let prompt = prompts.render_opening(context)?;
        let raw = backend.complete(&prompt).await?;
        debug!(raw = %raw, "opening reply received");
        parse_opening_reply(&raw)
    }

    /// The full counter pipeline: render, call, parse.
    async fn run_counter(
        backend: &LlmBackend,
        prompts: &PromptEngine,
        context: &CounterContext,
        player_text: &str,
    ) -> Result<chaffer_types::CounterReply, OracleError> {
        let prompt = prompts.render_counter(context, player_text)?;
        let raw = backend.complete(&prompt).await?;
        debug!(raw = %raw, "counter reply received");
        parse_counter_reply(&raw)
    }

    /// Borrow the backend and prompt engine, or report the lifecycle state.
    fn ready_parts(&self) -> Result<(&LlmBackend, &PromptEngine), OracleError> {
        match (self.status, &self.backend, &self.prompts) {
            (ServiceStatus::Ready, Some(backend), Some(prompts)) => Ok((backend, prompts)),
            _ => Err(OracleError::NotReady {
                status: self.status.as_str(),
            }),
        }
    }

    /// Claim the in-flight flag for one call.
    fn begin_call(&self) -> Result<InFlightGuard<'_>, OracleError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(OracleError::Busy);
        }
        Ok(InFlightGuard {
            flag: &self.in_flight,
        })
    }
}

impl Default for OracleService {
    fn default() -> Self {
        Self::new()
    }
}

/// Clears the in-flight flag when the call completes, whatever the
/// outcome.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
