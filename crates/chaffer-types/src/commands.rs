//! The closed command vocabulary collaborators may submit to the engine.
//!
//! Every external intent -- player action or oracle reply -- is one
//! [`ShopCommand`] variant carrying exactly the fields that transition
//! needs. The engine applies one command at a time; there is no other
//! mutation path, which makes the no-reentrancy discipline mechanically
//! checkable.

use serde::{Deserialize, Serialize};

use crate::contract::{CounterReply, OpeningReply};
use crate::ids::ItemInstanceId;
use crate::instances::CustomerInstance;

// ---------------------------------------------------------------------------
// Oracle outcome wrappers
// ---------------------------------------------------------------------------

/// What came back from an opening request.
///
/// Transport failures and malformed replies travel through the same
/// transition path as valid decisions so the engine can abandon the
/// encounter in one place instead of crashing or stalling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpeningOutcome {
    /// The oracle produced a well-formed reply.
    Reply(OpeningReply),
    /// The call failed or the reply could not be validated.
    Failed {
        /// Diagnostic shown alongside the "confused customer" line.
        message: String,
    },
}

/// What came back from a counter request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CounterOutcome {
    /// The oracle produced a well-formed reply.
    Reply(CounterReply),
    /// The call failed or the reply could not be validated.
    Failed {
        /// Diagnostic shown alongside the "confused customer" line.
        message: String,
    },
}

// ---------------------------------------------------------------------------
// ShopCommand
// ---------------------------------------------------------------------------

/// A single transition request over the shop state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShopCommand {
    /// Stock one unit of a catalog good. Legal only with sufficient gold.
    BuyItem {
        /// Catalog id of the template to stock.
        template_id: String,
    },
    /// Move an inventory item onto the shelf. Legal only during setting
    /// up, while the shelf has free capacity.
    MoveItemToShelf {
        /// The instance to display.
        instance_id: ItemInstanceId,
    },
    /// Buy one more shelf slot at `capacity * 200` gold.
    UpgradeShelf,
    /// A spawned customer walks in. Legal only while selling, with a
    /// non-empty shelf and no customer or negotiation in progress.
    SetCustomer {
        /// The customer instance produced by the spawner.
        customer: CustomerInstance,
    },
    /// Discard the idle customer without reputation consequences.
    ClearCustomer,
    /// Feed the opening oracle outcome to the engine, creating the
    /// negotiation or discarding the customer.
    StartNegotiation {
        /// The oracle's opening decision, or its failure.
        outcome: OpeningOutcome,
    },
    /// The shopkeeper counters with a price and a spoken line. Costs one
    /// point of patience; reaching zero ends the encounter immediately.
    SubmitPlayerOffer {
        /// Free-text line shown in the dialogue.
        text: String,
        /// Counter price in gold.
        price: u32,
    },
    /// Feed the counter oracle outcome to the engine.
    ApplyAgentDecision {
        /// The oracle's counter decision, or its failure.
        outcome: CounterOutcome,
    },
    /// Sell at the customer's current standing offer.
    AcceptCurrentOffer,
    /// Abandon the negotiation; costs the same reputation as a rejection.
    WalkAway,
    /// Advance the day-phase machine one step.
    AdvancePhase,
}
