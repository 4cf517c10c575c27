//! Static catalog data: purchasable goods and customer archetypes.
//!
//! Pure data with no behavior. Templates are immutable; runtime state only
//! ever works with instances copied from them (see [`crate::instances`]).

use crate::enums::{ItemCategory, Tier};

// ---------------------------------------------------------------------------
// Item templates
// ---------------------------------------------------------------------------

/// An immutable wholesale good definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemTemplate {
    /// Stable catalog identifier.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Category, matched against customer interests.
    pub category: ItemCategory,
    /// Rarity tier gating market availability by reputation.
    pub tier: Tier,
    /// Price the shopkeeper pays to stock one unit.
    pub wholesale_price: u32,
    /// Reference value customers reason about when making offers.
    pub base_value: u32,
}

/// Goods available for purchase during the management phase.
pub const WHOLESALE_CATALOG: &[ItemTemplate] = &[
    ItemTemplate {
        id: "wh001",
        name: "Healing Potion",
        category: ItemCategory::Potion,
        tier: Tier::Common,
        wholesale_price: 25,
        base_value: 50,
    },
    ItemTemplate {
        id: "wh002",
        name: "Mana Potion",
        category: ItemCategory::Potion,
        tier: Tier::Common,
        wholesale_price: 30,
        base_value: 60,
    },
    ItemTemplate {
        id: "wh003",
        name: "Iron Sword",
        category: ItemCategory::Weapon,
        tier: Tier::Rare,
        wholesale_price: 100,
        base_value: 180,
    },
    ItemTemplate {
        id: "wh004",
        name: "Leather Armor",
        category: ItemCategory::Armor,
        tier: Tier::Uncommon,
        wholesale_price: 80,
        base_value: 150,
    },
    ItemTemplate {
        id: "wh005",
        name: "Wooden Shield",
        category: ItemCategory::Shield,
        tier: Tier::Uncommon,
        wholesale_price: 50,
        base_value: 90,
    },
    ItemTemplate {
        id: "wh006",
        name: "Lockpicks",
        category: ItemCategory::Tool,
        tier: Tier::Common,
        wholesale_price: 15,
        base_value: 35,
    },
    ItemTemplate {
        id: "wh007",
        name: "Rope (50ft)",
        category: ItemCategory::Tool,
        tier: Tier::Common,
        wholesale_price: 10,
        base_value: 20,
    },
    ItemTemplate {
        id: "wh008",
        name: "Torch",
        category: ItemCategory::General,
        tier: Tier::Common,
        wholesale_price: 5,
        base_value: 10,
    },
];

/// Look up an item template by its catalog id.
pub fn item_template(id: &str) -> Option<&'static ItemTemplate> {
    WHOLESALE_CATALOG.iter().find(|t| t.id == id)
}

// ---------------------------------------------------------------------------
// Customer templates
// ---------------------------------------------------------------------------

/// An immutable customer archetype definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustomerTemplate {
    /// Display name.
    pub name: &'static str,
    /// Flavor description inserted into the oracle prompt.
    pub description: &'static str,
    /// Personality traits driving offer behavior and patience.
    pub traits: &'static [&'static str],
    /// Base gold budget before per-encounter variance.
    pub budget: u32,
    /// Item categories this archetype shops for.
    pub interests: &'static [ItemCategory],
    /// Rarity tier gating arrival by reputation.
    pub tier: Tier,
}

/// The customer archetype pool.
pub const CUSTOMER_ARCHETYPES: &[CustomerTemplate] = &[
    CustomerTemplate {
        name: "Nervous Apprentice",
        description: "a young apprentice clutching a small coin purse",
        traits: &["timid", "easily impressed", "frugal"],
        budget: 60,
        interests: &[ItemCategory::Potion, ItemCategory::Tool],
        tier: Tier::Common,
    },
    CustomerTemplate {
        name: "Gruff Mercenary",
        description: "a battle-scarred mercenary looking for functional gear",
        traits: &["practical", "impatient", "fair"],
        budget: 250,
        interests: &[ItemCategory::Weapon, ItemCategory::Armor, ItemCategory::Potion],
        tier: Tier::Uncommon,
    },
    CustomerTemplate {
        name: "Shrewd Trader",
        description: "a traveling trader with a keen eye for value",
        traits: &["calculating", "patient", "stingy", "knowledgeable"],
        budget: 300,
        interests: &[ItemCategory::General, ItemCategory::Tool],
        tier: Tier::Uncommon,
    },
    CustomerTemplate {
        name: "Flustered Noble",
        description: "a minor noble, clearly out of their element",
        traits: &["arrogant", "impatient", "distracted", "impulsive"],
        budget: 400,
        interests: &[ItemCategory::Armor, ItemCategory::Weapon],
        tier: Tier::Rare,
    },
    CustomerTemplate {
        name: "Curious Scholar",
        description: "a scholar interested in unusual items",
        traits: &["curious", "patient", "distracted"],
        budget: 120,
        interests: &[ItemCategory::Potion, ItemCategory::Tool],
        tier: Tier::Common,
    },
    CustomerTemplate {
        name: "Weary Farmer",
        description: "a farmer looking for simple tools or protection",
        traits: &["practical", "frugal", "honest"],
        budget: 80,
        interests: &[ItemCategory::Tool, ItemCategory::Shield, ItemCategory::General],
        tier: Tier::Common,
    },
];

/// Pool of minor flavor traits added to customer instances.
///
/// One trait not already present on the archetype is drawn per encounter;
/// if every pool entry is already present, none is added.
pub const FLAVOR_TRAITS: &[&str] = &[
    "in a hurry",
    "distracted",
    "cheerful",
    "grumpy",
    "curious",
    "suspicious",
    "talkative",
    "quiet",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_ids_are_unique() {
        for (i, a) in WHOLESALE_CATALOG.iter().enumerate() {
            for b in WHOLESALE_CATALOG.iter().skip(i.saturating_add(1)) {
                assert_ne!(a.id, b.id);
            }
        }
    }

    #[test]
    fn wholesale_price_below_base_value() {
        // Selling at base value must always beat the wholesale cost,
        // otherwise the economy cannot be survived.
        for t in WHOLESALE_CATALOG {
            assert!(t.wholesale_price < t.base_value, "{} is unprofitable", t.id);
        }
    }

    #[test]
    fn item_template_lookup() {
        let torch = item_template("wh008");
        assert_eq!(torch.map(|t| t.name), Some("Torch"));
        assert!(item_template("wh999").is_none());
    }

    #[test]
    fn common_tier_entries_exist_in_both_catalogs() {
        // A fresh shop (reputation 0) must have goods to buy and
        // customers who can arrive.
        assert!(WHOLESALE_CATALOG.iter().any(|t| t.tier == Tier::Common));
        assert!(CUSTOMER_ARCHETYPES.iter().any(|c| c.tier == Tier::Common));
    }

    #[test]
    fn archetype_traits_do_not_collide_with_entire_flavor_pool() {
        // At least one flavor trait must remain drawable for every
        // archetype, so instances normally gain an extra trait.
        for c in CUSTOMER_ARCHETYPES {
            let drawable = FLAVOR_TRAITS.iter().any(|t| !c.traits.contains(t));
            assert!(drawable, "{} exhausts the flavor pool", c.name);
        }
    }
}
