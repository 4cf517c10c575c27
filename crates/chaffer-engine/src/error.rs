//! Error types for the Chaffer engine.
//!
//! All operations that can fail return typed errors rather than panicking.
//! Every variant maps to a rejected transition: the command is refused, a
//! message is surfaced, and no state is mutated.

use chaffer_types::Phase;

/// Errors that can occur while applying a shop command.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The shop cannot cover a purchase, upgrade, or payment.
    #[error("not enough gold: need {needed}g, have {available}g")]
    InsufficientGold {
        /// Gold required for the operation.
        needed: u32,
        /// Gold currently on hand.
        available: u32,
    },

    /// The named catalog template does not exist.
    #[error("unknown catalog item: {id}")]
    UnknownTemplate {
        /// The id that failed to resolve.
        id: String,
    },

    /// The command is not legal in the current phase.
    #[error("cannot {action} during the {phase} phase")]
    PhaseViolation {
        /// What was attempted.
        action: &'static str,
        /// The phase the shop is in.
        phase: Phase,
    },

    /// The game-over latch is closed; no transition is legal anymore.
    #[error("the shop is closed for good")]
    GameOver,

    /// A negotiation is in progress and blocks this command.
    #[error("a negotiation is in progress")]
    NegotiationActive,

    /// The command requires an active negotiation and there is none.
    #[error("no negotiation is in progress")]
    NoNegotiation,

    /// The command requires a visiting customer and there is none.
    #[error("no customer is in the shop")]
    NoCustomer,

    /// A customer is already in the shop.
    #[error("a customer is already in the shop")]
    CustomerPresent,

    /// Customers will not enter an empty shop.
    #[error("nothing is on display")]
    ShelfEmpty,

    /// An oracle decision arrived before the shopkeeper countered.
    #[error("the customer is still waiting for a counter price")]
    NoPlayerOffer,

    /// An invariant the engine maintains was found broken.
    #[error("internal engine error: {0}")]
    Internal(&'static str),
}
