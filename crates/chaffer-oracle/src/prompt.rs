//! Prompt template loading and rendering via `minijinja`.
//!
//! Templates are loaded from the filesystem (default: `templates/`
//! directory) so customer behavior can be tuned without recompiling. Two
//! prompt kinds exist, one per contract request: the opening survey of the
//! shelf and the counter-offer round. Both render a system message from
//! the typed context; the opening user line is a fixed greeting, the
//! counter user line is the shopkeeper's own words.

use chaffer_types::contract::{CounterContext, OpeningContext};
use minijinja::Environment;

use crate::error::OracleError;

/// Template file names expected in the templates directory.
const OPENING_SYSTEM_TEMPLATE: &str = "opening_system.j2";
/// Fixed greeting sent as the user line of an opening request.
const OPENING_USER_TEMPLATE: &str = "opening_user.j2";
/// System template for the counter round.
const COUNTER_SYSTEM_TEMPLATE: &str = "counter_system.j2";

/// Manages prompt template loading and rendering.
///
/// Wraps a `minijinja` [`Environment`] with the negotiation templates
/// pre-loaded. Edit the files on disk and rebuild the engine to pick up
/// changes.
pub struct PromptEngine {
    env: Environment<'static>,
}

/// The complete rendered prompt ready to send to an LLM backend.
#[derive(Debug, Clone)]
pub struct RenderedPrompt {
    /// System message establishing who the customer is and the rules of
    /// the exchange.
    pub system: String,
    /// User message: the greeting or the shopkeeper's spoken line.
    pub user: String,
}

impl PromptEngine {
    /// Create a new prompt engine loading templates from the given
    /// directory.
    ///
    /// The directory must contain `opening_system.j2`, `opening_user.j2`,
    /// and `counter_system.j2`.
    ///
    /// # Errors
    ///
    /// Returns [`OracleError::Template`] when a file is missing or fails
    /// to compile.
    pub fn new(templates_dir: &str) -> Result<Self, OracleError> {
        let mut env = Environment::new();

        for name in [
            OPENING_SYSTEM_TEMPLATE,
            OPENING_USER_TEMPLATE,
            COUNTER_SYSTEM_TEMPLATE,
        ] {
            let source = load_template(templates_dir, name)?;
            env.add_template_owned(name.to_owned(), source)
                .map_err(|e| OracleError::Template(format!("failed to add {name}: {e}")))?;
        }

        Ok(Self { env })
    }

    /// Render the opening request prompt for a customer surveying the
    /// shelf.
    ///
    /// # Errors
    ///
    /// Returns [`OracleError::Template`] on render failure.
    pub fn render_opening(&self, context: &OpeningContext) -> Result<RenderedPrompt, OracleError> {
        let system = self.render(OPENING_SYSTEM_TEMPLATE, context)?;
        let user = self.render(OPENING_USER_TEMPLATE, context)?;
        Ok(RenderedPrompt { system, user })
    }

    /// Render the counter request prompt. The user line is the
    /// shopkeeper's own words, passed through untouched.
    ///
    /// # Errors
    ///
    /// Returns [`OracleError::Template`] on render failure.
    pub fn render_counter(
        &self,
        context: &CounterContext,
        player_text: &str,
    ) -> Result<RenderedPrompt, OracleError> {
        let system = self.render(COUNTER_SYSTEM_TEMPLATE, context)?;
        Ok(RenderedPrompt {
            system,
            user: player_text.to_owned(),
        })
    }

    /// Render one named template against a serializable context.
    fn render<S: serde::Serialize>(&self, name: &str, context: S) -> Result<String, OracleError> {
        self.env
            .get_template(name)
            .map_err(|e| OracleError::Template(format!("missing template {name}: {e}")))?
            .render(context)
            .map_err(|e| OracleError::Template(format!("{name} render failed: {e}")))
    }
}

/// Read a template file from disk.
fn load_template(dir: &str, filename: &str) -> Result<String, OracleError> {
    let path = format!("{dir}/{filename}");
    std::fs::read_to_string(&path)
        .map_err(|e| OracleError::Template(format!("failed to read {path}: {e}")))
}
