//! Reputation tracking and tier gating.
//!
//! Reputation is a single unbounded integer, adjusted only by negotiation
//! terminations. It gates which customer archetypes can walk in and which
//! wholesale goods the market offers: each catalog entry carries a tier,
//! and a tier unlocks once the score reaches its threshold. The two
//! catalogs use different threshold tables.

use chaffer_types::catalog::{CUSTOMER_ARCHETYPES, CustomerTemplate, ItemTemplate, WHOLESALE_CATALOG};
use chaffer_types::enums::Tier;

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

/// Reputation required for tier-1 customer archetypes.
const CUSTOMER_UNCOMMON_THRESHOLD: i32 = 5;

/// Reputation required for tier-2 customer archetypes.
const CUSTOMER_RARE_THRESHOLD: i32 = 15;

/// Reputation required for tier-1 market goods.
const MARKET_UNCOMMON_THRESHOLD: i32 = 10;

/// Reputation required for tier-2 market goods.
const MARKET_RARE_THRESHOLD: i32 = 25;

/// Reputation lost when a negotiation ends in rejection, patience
/// exhaustion, or a walk-away.
pub const FAILED_NEGOTIATION_PENALTY: i32 = -1;

// ---------------------------------------------------------------------------
// ReputationTracker
// ---------------------------------------------------------------------------

/// The shopkeeper's standing with the customer base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReputationTracker {
    score: i32,
}

impl ReputationTracker {
    /// Create a tracker at score zero.
    pub const fn new() -> Self {
        Self { score: 0 }
    }

    /// Create a tracker at an explicit score (tests, scenario setup).
    pub const fn with_score(score: i32) -> Self {
        Self { score }
    }

    /// The current score.
    pub const fn score(&self) -> i32 {
        self.score
    }

    /// Apply a delta from a negotiation termination.
    pub const fn adjust(&mut self, delta: i32) {
        self.score = self.score.saturating_add(delta);
    }

    /// The highest customer tier unlocked at the current score.
    pub const fn max_customer_tier(&self) -> Tier {
        if self.score >= CUSTOMER_RARE_THRESHOLD {
            Tier::Rare
        } else if self.score >= CUSTOMER_UNCOMMON_THRESHOLD {
            Tier::Uncommon
        } else {
            Tier::Common
        }
    }

    /// The highest market tier unlocked at the current score.
    pub const fn max_market_tier(&self) -> Tier {
        if self.score >= MARKET_RARE_THRESHOLD {
            Tier::Rare
        } else if self.score >= MARKET_UNCOMMON_THRESHOLD {
            Tier::Uncommon
        } else {
            Tier::Common
        }
    }

    /// Customer archetypes eligible to walk in at the current score.
    pub fn eligible_archetypes(&self) -> Vec<&'static CustomerTemplate> {
        let max = self.max_customer_tier();
        CUSTOMER_ARCHETYPES.iter().filter(|c| c.tier <= max).collect()
    }

    /// Wholesale goods the market offers at the current score.
    pub fn available_goods(&self) -> Vec<&'static ItemTemplate> {
        let max = self.max_market_tier();
        WHOLESALE_CATALOG.iter().filter(|t| t.tier <= max).collect()
    }
}

/// Reputation delta for a completed sale.
///
/// `+1` when the agreed price lands below 80% of the item's base value
/// (the customer got the worse end of the bargain); `0` otherwise. The
/// asymmetry is deliberate: the player is rewarded for extracting value
/// and never penalized for a successful sale. Integer arithmetic only --
/// `price / base < 0.8` is evaluated as `price * 10 < base * 8`.
pub fn sale_reputation_delta(price: u32, base_value: u32) -> i32 {
    let base = u64::from(base_value.max(1));
    let scaled_price = u64::from(price).saturating_mul(10);
    let scaled_base = base.saturating_mul(8);
    i32::from(scaled_price < scaled_base)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
