//! Customer spawner: turns archetypes into per-encounter instances.
//!
//! Selection is uniform over the archetypes whose tier the current
//! reputation has unlocked. Instantiation randomizes the budget by up to
//! 15% in either direction (floored at 10 gold) and adds one flavor trait
//! the archetype does not already carry. All randomness flows through the
//! caller's [`Rng`] so scenario tests stay deterministic.

use chaffer_types::catalog::{CustomerTemplate, FLAVOR_TRAITS};
use chaffer_types::ids::CustomerId;
use chaffer_types::instances::CustomerInstance;
use rand::Rng;

use crate::reputation::ReputationTracker;

/// Budget variance bound, in thousandths (±15%).
const BUDGET_VARIANCE_PERMILLE: i64 = 150;

/// Minimum budget after variance.
const BUDGET_FLOOR: u32 = 10;

/// Spawn a customer instance for one encounter.
///
/// Returns `None` when no archetype is eligible -- unreachable with the
/// shipped catalog, which always has tier-0 entries, but the pool is data.
pub fn spawn_customer(
    reputation: &ReputationTracker,
    rng: &mut impl Rng,
) -> Option<CustomerInstance> {
    let eligible = reputation.eligible_archetypes();
    if eligible.is_empty() {
        tracing::warn!(
            score = reputation.score(),
            "no eligible customer archetypes at current reputation"
        );
        return None;
    }

    let index = rng.random_range(0..eligible.len());
    let template = eligible.get(index).copied()?;
    Some(instantiate(template, rng))
}

/// Build a randomized instance from a chosen archetype.
pub fn instantiate(template: &CustomerTemplate, rng: &mut impl Rng) -> CustomerInstance {
    let mut traits: Vec<String> = template.traits.iter().map(|t| (*t).to_owned()).collect();
    if let Some(extra) = draw_flavor_trait(&traits, rng) {
        traits.push(extra);
    }

    CustomerInstance {
        customer_id: CustomerId::new(),
        name: template.name.to_owned(),
        description: template.description.to_owned(),
        traits,
        budget: randomized_budget(template.budget, rng),
        interests: template.interests.to_vec(),
        tier: template.tier,
    }
}

/// Apply ±15% variance to a base budget, rounded, floored at 10.
fn randomized_budget(base: u32, rng: &mut impl Rng) -> u32 {
    let variance: i64 = rng.random_range(-BUDGET_VARIANCE_PERMILLE..=BUDGET_VARIANCE_PERMILLE);
    let scaled = i64::from(base)
        .saturating_mul(variance.saturating_add(1000))
        .saturating_add(500)
        .checked_div(1000)
        .unwrap_or(i64::from(base));
    u32::try_from(scaled).unwrap_or(BUDGET_FLOOR).max(BUDGET_FLOOR)
}

/// Draw one flavor trait not already present, or `None` when the pool is
/// exhausted.
fn draw_flavor_trait(existing: &[String], rng: &mut impl Rng) -> Option<String> {
    let available: Vec<&str> = FLAVOR_TRAITS
        .iter()
        .copied()
        .filter(|t| !existing.iter().any(|e| e == t))
        .collect();
    if available.is_empty() {
        return None;
    }
    let index = rng.random_range(0..available.len());
    available.get(index).map(|t| (*t).to_owned())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
