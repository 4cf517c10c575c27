//! Shop and negotiation state machine for the Chaffer simulation.
//!
//! This crate is the logic layer: everything that mutates shop state
//! without touching I/O. It sits between `chaffer-types` (which defines
//! the data structures) and the oracle/driver crates (which handle LLM
//! calls and the terminal).
//!
//! The single entry point is [`Shop::apply`]: one [`ShopCommand`] in, a
//! list of [`ShopEvent`]s out, or a typed rejection that mutated nothing.
//!
//! # Modules
//!
//! - [`day`] -- Day counter, phase machine, and the game-over latch
//! - [`error`] -- Error types for all engine operations ([`EngineError`])
//! - [`ledger`] -- Gold and loan bookkeeping ([`EconomyLedger`])
//! - [`negotiation`] -- Turn transitions of the active negotiation
//! - [`reputation`] -- Score, tier thresholds, catalog gating
//! - [`shop`] -- The aggregate and its command-processing path ([`Shop`])
//! - [`spawner`] -- Archetype selection and per-encounter randomization
//! - [`stock`] -- Back-room inventory and the bounded shelf ([`StockRoom`])
//!
//! [`ShopCommand`]: chaffer_types::ShopCommand
//! [`ShopEvent`]: chaffer_types::ShopEvent

pub mod day;
pub mod error;
pub mod ledger;
pub mod negotiation;
pub mod reputation;
pub mod shop;
pub mod spawner;
pub mod stock;

// Re-export primary types at crate root for convenience.
pub use day::DayCycle;
pub use error::EngineError;
pub use ledger::{EconomyLedger, PeriodOutcome};
pub use negotiation::{OracleTurn, PlayerTurn, patience_mood};
pub use reputation::{ReputationTracker, sale_reputation_delta};
pub use shop::Shop;
pub use spawner::spawn_customer;
pub use stock::StockRoom;
