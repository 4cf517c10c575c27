//! Shared type definitions for the Chaffer shop simulation.
//!
//! This crate is the single source of truth for all types used across the
//! Chaffer workspace: the engine, the oracle client, and the driver all
//! speak in these shapes.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for instance identifiers
//! - [`enums`] -- Enumeration types (phases, tiers, categories, speakers)
//! - [`catalog`] -- Immutable item and customer templates plus literals
//! - [`instances`] -- Runtime entities (items, customers, the negotiation)
//! - [`commands`] -- The closed transition-request union
//! - [`events`] -- Typed transition outputs with dialogue rendering
//! - [`contract`] -- The oracle request/reply contract

pub mod catalog;
pub mod commands;
pub mod contract;
pub mod enums;
pub mod events;
pub mod ids;
pub mod instances;

// Re-export all public types at crate root for convenience.
pub use catalog::{
    CUSTOMER_ARCHETYPES, CustomerTemplate, FLAVOR_TRAITS, ItemTemplate, WHOLESALE_CATALOG,
    item_template,
};
pub use commands::{CounterOutcome, OpeningOutcome, ShopCommand};
pub use contract::{
    CounterContext, CounterDecision, CounterReply, CustomerCard, DisplayedItem, OpeningContext,
    OpeningDecision, OpeningReply,
};
pub use enums::{ItemCategory, Phase, Speaker, Tier};
pub use events::ShopEvent;
pub use ids::{CustomerId, ItemInstanceId, NegotiationId};
pub use instances::{CustomerInstance, ItemInstance, Negotiation, NegotiationTurn};
