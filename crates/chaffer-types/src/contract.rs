//! Request/reply contract for the external negotiation oracle.
//!
//! The oracle is a black box: given a structured context it returns a
//! spoken line plus a decision. The engine never sees prompts or raw model
//! output -- only these types. Replies use the camelCase field names the
//! original wire contract fixed (`spokenResponse`, `itemId`), and are
//! treated as untrusted input: the parser validates shape and signs, the
//! engine validates references.

use serde::{Deserialize, Serialize};

use crate::instances::{CustomerInstance, ItemInstance, Negotiation};

// ---------------------------------------------------------------------------
// Context payloads (engine -> oracle)
// ---------------------------------------------------------------------------

/// Identity card for the customer, rendered into both prompt kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerCard {
    /// Display name.
    pub name: String,
    /// Flavor description.
    pub description: String,
    /// Personality traits.
    pub traits: Vec<String>,
    /// Gold budget for this visit.
    pub budget: u32,
}

impl From<&CustomerInstance> for CustomerCard {
    fn from(customer: &CustomerInstance) -> Self {
        Self {
            name: customer.name.clone(),
            description: customer.description.clone(),
            traits: customer.traits.clone(),
            budget: customer.budget,
        }
    }
}

/// One shelf item as presented to the oracle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayedItem {
    /// Instance id the oracle must echo back to choose this item.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Sticker price.
    pub asking_price: u32,
    /// Reference value offers are reasoned from.
    pub base_value: u32,
}

impl From<&ItemInstance> for DisplayedItem {
    fn from(item: &ItemInstance) -> Self {
        Self {
            id: item.instance_id.to_string(),
            name: item.name.clone(),
            asking_price: item.asking_price,
            base_value: item.base_value,
        }
    }
}

/// Context for the opening request: the customer surveys the shelf and
/// either makes an initial offer on one item or leaves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningContext {
    /// The visiting customer.
    pub customer: CustomerCard,
    /// The shopkeeper's current reputation.
    pub reputation: i32,
    /// Everything currently displayed for sale.
    pub items: Vec<DisplayedItem>,
    /// Customer interest categories, as display strings.
    pub interests: Vec<String>,
}

/// Context for a counter request: the shopkeeper has countered and the
/// customer must accept, reject, or counter again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterContext {
    /// The negotiating customer.
    pub customer: CustomerCard,
    /// The shopkeeper's current reputation.
    pub reputation: i32,
    /// Name of the item under negotiation.
    pub item_name: String,
    /// Reference value of the item.
    pub base_value: u32,
    /// Remaining customer patience.
    pub patience: u32,
    /// The customer's previous standing offer.
    pub customer_offer: u32,
    /// The shopkeeper's new counter price.
    pub player_offer: u32,
}

impl CounterContext {
    /// Build the counter context from an active negotiation.
    ///
    /// Returns `None` until the shopkeeper has sent a counter price --
    /// there is nothing for the oracle to react to before that.
    pub fn from_negotiation(
        negotiation: &Negotiation,
        item_name: &str,
        base_value: u32,
        reputation: i32,
    ) -> Option<Self> {
        let player_offer = negotiation.player_offer?;
        Some(Self {
            customer: CustomerCard::from(&negotiation.customer),
            reputation,
            item_name: item_name.to_owned(),
            base_value,
            patience: negotiation.patience,
            customer_offer: negotiation.customer_offer,
            player_offer,
        })
    }
}

// ---------------------------------------------------------------------------
// Reply payloads (oracle -> engine)
// ---------------------------------------------------------------------------

/// The oracle's decision on an opening request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpeningDecision {
    /// The customer picked an item and made an opening offer.
    InitialOffer,
    /// The customer walks out without engaging.
    Leave,
}

/// Validated reply to an opening request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningReply {
    /// The customer's spoken line.
    pub spoken_response: String,
    /// Opening offer in gold; required for `InitialOffer`.
    pub offer: Option<u32>,
    /// Instance id of the chosen item, exactly as listed in the context.
    /// The engine resolves it against the shelf; an unresolvable id aborts
    /// the encounter.
    pub item_id: Option<String>,
    /// What the customer decided to do.
    pub decision: OpeningDecision,
}

/// The oracle's decision on a counter request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterDecision {
    /// The customer raises a new offer and hands the turn back.
    Counter,
    /// The customer accepts the shopkeeper's price.
    Accept,
    /// The customer ends the negotiation.
    Reject,
}

/// Validated reply to a counter request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterReply {
    /// The customer's spoken line.
    pub spoken_response: String,
    /// New offer in gold; required for `Counter`.
    pub offer: Option<u32>,
    /// What the customer decided to do.
    pub decision: CounterDecision,
}
