//! Enumeration types shared across the Chaffer workspace.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// The phase of the shop's day cycle.
///
/// The cycle runs setting up -> selling -> management -> setting up (next
/// day). `GameOver` is absorbing: once entered, no further transitions are
/// accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Morning: stock moves from the back room onto the shelf.
    SettingUp,
    /// Daytime: customers arrive and negotiations run.
    Selling,
    /// Night: wholesale buying and shelf upgrades.
    Management,
    /// Terminal state reached by defaulting on the loan.
    GameOver,
}

impl core::fmt::Display for Phase {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::SettingUp => "setting up",
            Self::Selling => "selling",
            Self::Management => "management",
            Self::GameOver => "game over",
        };
        write!(f, "{name}")
    }
}

// ---------------------------------------------------------------------------
// Tier
// ---------------------------------------------------------------------------

/// Rarity/availability bracket for catalog entries.
///
/// Both customer archetypes and market goods carry a tier; reputation
/// thresholds unlock higher tiers (the thresholds differ between the two
/// catalogs and live in the engine's reputation module).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Tier 0: always available.
    Common,
    /// Tier 1: unlocked at the first reputation threshold.
    Uncommon,
    /// Tier 2: unlocked at the second reputation threshold.
    Rare,
}

impl core::fmt::Display for Tier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::Common => "common",
            Self::Uncommon => "uncommon",
            Self::Rare => "rare",
        };
        write!(f, "{name}")
    }
}

// ---------------------------------------------------------------------------
// ItemCategory
// ---------------------------------------------------------------------------

/// Category of a market good, matched against customer interests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    /// Consumable brews.
    Potion,
    /// Blades and similar armaments.
    Weapon,
    /// Worn protection.
    Armor,
    /// Carried protection.
    Shield,
    /// Practical implements.
    Tool,
    /// Everything else.
    General,
}

impl core::fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::Potion => "potion",
            Self::Weapon => "weapon",
            Self::Armor => "armor",
            Self::Shield => "shield",
            Self::Tool => "tool",
            Self::General => "general",
        };
        write!(f, "{name}")
    }
}

// ---------------------------------------------------------------------------
// Speaker
// ---------------------------------------------------------------------------

/// Which party spoke a negotiation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    /// The visiting customer (driven by the oracle).
    Customer,
    /// The shopkeeper.
    Player,
}
