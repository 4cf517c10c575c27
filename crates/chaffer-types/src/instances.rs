//! Runtime entity instances: items, customers, and the negotiation
//! aggregate.
//!
//! Instances copy their template's fields at creation time so later catalog
//! edits can never mutate live state. Behavior over these types lives in
//! `chaffer-engine`; this module only defines shapes and constructors.

use serde::{Deserialize, Serialize};

use crate::catalog::{CustomerTemplate, ItemTemplate};
use crate::enums::{ItemCategory, Speaker, Tier};
use crate::ids::{CustomerId, ItemInstanceId, NegotiationId};

// ---------------------------------------------------------------------------
// ItemInstance
// ---------------------------------------------------------------------------

/// A purchased unit of stock.
///
/// Owned by exactly one of {back-room inventory, shelf} at any time, and
/// destroyed when sold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemInstance {
    /// Unique identifier minted at purchase time.
    pub instance_id: ItemInstanceId,
    /// Catalog id of the template this instance was stocked from.
    pub template_id: String,
    /// Display name.
    pub name: String,
    /// Category, matched against customer interests.
    pub category: ItemCategory,
    /// Rarity tier.
    pub tier: Tier,
    /// Price paid to stock this unit.
    pub wholesale_price: u32,
    /// Reference value customers reason about.
    pub base_value: u32,
    /// Sticker price shown to customers. Fixed at stock time.
    pub asking_price: u32,
}

impl ItemInstance {
    /// Mint a new instance from a catalog template.
    ///
    /// The asking price defaults to 1.5x the base value, rounded to the
    /// nearest whole gold piece.
    pub fn from_template(template: &ItemTemplate) -> Self {
        let asking_price = template
            .base_value
            .saturating_mul(3)
            .saturating_add(1)
            .checked_div(2)
            .unwrap_or(template.base_value);
        Self {
            instance_id: ItemInstanceId::new(),
            template_id: template.id.to_owned(),
            name: template.name.to_owned(),
            category: template.category,
            tier: template.tier,
            wholesale_price: template.wholesale_price,
            base_value: template.base_value,
            asking_price,
        }
    }
}

// ---------------------------------------------------------------------------
// CustomerInstance
// ---------------------------------------------------------------------------

/// A customer visiting the shop for exactly one encounter.
///
/// Created by the spawner (which randomizes the budget and adds one flavor
/// trait) and discarded when the customer leaves or a sale concludes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInstance {
    /// Unique identifier for this encounter.
    pub customer_id: CustomerId,
    /// Display name, copied from the archetype.
    pub name: String,
    /// Flavor description, copied from the archetype.
    pub description: String,
    /// Archetype traits plus at most one drawn flavor trait.
    pub traits: Vec<String>,
    /// Randomized gold budget for this visit.
    pub budget: u32,
    /// Item categories this customer shops for.
    pub interests: Vec<ItemCategory>,
    /// Rarity tier of the source archetype.
    pub tier: Tier,
}

impl CustomerInstance {
    /// Copy an archetype verbatim, without spawner randomization.
    ///
    /// The spawner layers budget variance and the extra trait on top of
    /// this; tests use it directly for deterministic customers.
    pub fn from_template(template: &CustomerTemplate) -> Self {
        Self {
            customer_id: CustomerId::new(),
            name: template.name.to_owned(),
            description: template.description.to_owned(),
            traits: template.traits.iter().map(|t| (*t).to_owned()).collect(),
            budget: template.budget,
            interests: template.interests.to_vec(),
            tier: template.tier,
        }
    }

    /// Whether this customer carries the given personality trait.
    pub fn has_trait(&self, name: &str) -> bool {
        self.traits.iter().any(|t| t == name)
    }

    /// Starting patience for a negotiation with this customer.
    ///
    /// Impatient customers tolerate 3 haggling rounds, patient ones 7,
    /// everyone else 5.
    pub fn starting_patience(&self) -> u32 {
        if self.has_trait("impatient") {
            3
        } else if self.has_trait("patient") {
            7
        } else {
            5
        }
    }
}

// ---------------------------------------------------------------------------
// Negotiation
// ---------------------------------------------------------------------------

/// One spoken turn of an active negotiation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NegotiationTurn {
    /// Which party spoke.
    pub speaker: Speaker,
    /// The spoken line.
    pub text: String,
    /// The offer attached to the line, if any.
    pub offer: Option<u32>,
}

/// The transient bargaining aggregate for a single customer encounter.
///
/// At most one exists at a time, and only while the shop is in the selling
/// phase. Every terminal outcome deletes the aggregate rather than marking
/// a status; existence is the "active" flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Negotiation {
    /// Unique identifier of this negotiation.
    pub negotiation_id: NegotiationId,
    /// The shelf item under negotiation. The item stays on the shelf
    /// until the sale concludes.
    pub item_id: ItemInstanceId,
    /// The customer bargaining for the item.
    pub customer: CustomerInstance,
    /// The customer's current standing offer.
    pub customer_offer: u32,
    /// The shopkeeper's latest counter price, if one has been sent.
    pub player_offer: Option<u32>,
    /// Ordered turn history, starting with the customer's opening move.
    pub history: Vec<NegotiationTurn>,
    /// Remaining patience. Monotonically non-increasing; 0 terminates.
    pub patience: u32,
    /// Patience at creation, fixed from the customer's traits.
    pub initial_patience: u32,
}

impl Negotiation {
    /// Open a negotiation with the customer's initial offer as the first
    /// turn of the history.
    pub fn open(
        item_id: ItemInstanceId,
        customer: CustomerInstance,
        customer_offer: u32,
        spoken: String,
    ) -> Self {
        let patience = customer.starting_patience();
        Self {
            negotiation_id: NegotiationId::new(),
            item_id,
            customer,
            customer_offer,
            player_offer: None,
            history: vec![NegotiationTurn {
                speaker: Speaker::Customer,
                text: spoken,
                offer: Some(customer_offer),
            }],
            patience,
            initial_patience: patience,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::{CUSTOMER_ARCHETYPES, WHOLESALE_CATALOG};

    fn template(name: &str) -> &'static CustomerTemplate {
        CUSTOMER_ARCHETYPES
            .iter()
            .find(|c| c.name == name)
            .unwrap()
    }

    #[test]
    fn item_instance_copies_template_fields() {
        let healing = WHOLESALE_CATALOG.first().copied().unwrap();
        let instance = ItemInstance::from_template(&healing);
        assert_eq!(instance.template_id, healing.id);
        assert_eq!(instance.base_value, healing.base_value);
        // 1.5x rounded: base 50 -> asking 75.
        assert_eq!(instance.asking_price, 75);
    }

    #[test]
    fn asking_price_rounds_half_up() {
        let lockpicks = ItemTemplate {
            id: "t",
            name: "t",
            category: ItemCategory::Tool,
            tier: Tier::Common,
            wholesale_price: 15,
            base_value: 35,
        };
        // 35 * 1.5 = 52.5 -> 53.
        assert_eq!(ItemInstance::from_template(&lockpicks).asking_price, 53);
    }

    #[test]
    fn instances_get_fresh_ids() {
        let t = WHOLESALE_CATALOG.first().unwrap();
        let a = ItemInstance::from_template(t);
        let b = ItemInstance::from_template(t);
        assert_ne!(a.instance_id, b.instance_id);
    }

    #[test]
    fn starting_patience_from_traits() {
        let mercenary = CustomerInstance::from_template(template("Gruff Mercenary"));
        assert_eq!(mercenary.starting_patience(), 3); // impatient

        let trader = CustomerInstance::from_template(template("Shrewd Trader"));
        assert_eq!(trader.starting_patience(), 7); // patient

        let farmer = CustomerInstance::from_template(template("Weary Farmer"));
        assert_eq!(farmer.starting_patience(), 5); // neither
    }

    #[test]
    fn negotiation_opens_with_customer_turn() {
        let customer = CustomerInstance::from_template(template("Weary Farmer"));
        let item_id = ItemInstanceId::new();
        let negotiation =
            Negotiation::open(item_id, customer, 40, String::from("I'll give you 40."));

        assert_eq!(negotiation.customer_offer, 40);
        assert_eq!(negotiation.player_offer, None);
        assert_eq!(negotiation.patience, negotiation.initial_patience);
        assert_eq!(negotiation.history.len(), 1);
        assert_eq!(
            negotiation.history.first().map(|t| t.speaker),
            Some(Speaker::Customer)
        );
        assert_eq!(negotiation.history.first().and_then(|t| t.offer), Some(40));
    }
}
