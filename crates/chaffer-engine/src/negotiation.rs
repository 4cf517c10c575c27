//! Turn transitions for the active negotiation.
//!
//! A negotiation is a strict two-party turn protocol: the customer opens,
//! the shopkeeper counters, the oracle answers for the customer, repeat.
//! This module implements the two mid-protocol transitions -- the player
//! turn and the oracle turn -- as pure functions over the aggregate. The
//! shop aggregate owns creation, deletion, and the side effects of
//! terminal outcomes (gold, reputation, shelf).
//!
//! # Invariants
//!
//! - Patience is monotonically non-increasing and only the player turn
//!   decrements it.
//! - Reaching exactly zero patience terminates the negotiation without
//!   another oracle round trip.
//! - An oracle decision arriving at zero patience is forced to a
//!   rejection regardless of what the oracle returned.

use chaffer_types::contract::{CounterDecision, CounterReply};
use chaffer_types::enums::Speaker;
use chaffer_types::instances::{Negotiation, NegotiationTurn};

// ---------------------------------------------------------------------------
// Player turn
// ---------------------------------------------------------------------------

/// Result of the shopkeeper submitting a counter price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerTurn {
    /// Patience hit zero on this submission; the negotiation ends as a
    /// rejection without consulting the oracle.
    Exhausted,
    /// The offer was recorded; the oracle decides next.
    AwaitingOracle,
}

/// Apply the shopkeeper's counter to the negotiation.
///
/// Decrements patience by one (floor zero) first. If that lands exactly on
/// zero the negotiation is over -- the caller deletes the aggregate and
/// applies the rejection penalty; the offer is still recorded in history so
/// the transcript shows the final attempt. Otherwise the offer becomes the
/// standing player offer awaiting the oracle's decision.
pub fn submit_player_offer(negotiation: &mut Negotiation, text: String, price: u32) -> PlayerTurn {
    negotiation.patience = negotiation.patience.saturating_sub(1);
    negotiation.history.push(NegotiationTurn {
        speaker: Speaker::Player,
        text,
        offer: Some(price),
    });

    if negotiation.patience == 0 {
        return PlayerTurn::Exhausted;
    }

    negotiation.player_offer = Some(price);
    PlayerTurn::AwaitingOracle
}

// ---------------------------------------------------------------------------
// Oracle turn
// ---------------------------------------------------------------------------

/// Result of applying the oracle's decision for the customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OracleTurn {
    /// The customer accepted the shopkeeper's price.
    Accepted {
        /// The agreed sale price (the player's standing offer).
        price: u32,
    },
    /// The customer ended the negotiation.
    Rejected,
    /// The customer countered; control returns to the player.
    Countered {
        /// The customer's new standing offer.
        offer: u32,
    },
    /// The reply was semantically incomplete (a counter without an
    /// offer). The caller abandons the encounter.
    Malformed {
        /// What was wrong with the reply.
        reason: String,
    },
}

/// Apply the oracle's counter-round decision to the negotiation.
///
/// At zero patience the decision is forced to a rejection -- the protocol
/// tells the oracle as much, but the engine does not trust it to comply.
/// A counter must carry an offer; the protocol also instructs that it
/// strictly improve on the customer's previous offer, but a violating
/// value is accepted with a warning rather than rejected.
pub fn apply_oracle_decision(negotiation: &mut Negotiation, reply: &CounterReply) -> OracleTurn {
    if negotiation.patience == 0 {
        tracing::warn!(
            customer = %negotiation.customer.name,
            "oracle decision arrived at zero patience, forcing rejection"
        );
        return OracleTurn::Rejected;
    }

    match reply.decision {
        CounterDecision::Accept => match negotiation.player_offer {
            Some(price) => OracleTurn::Accepted { price },
            None => OracleTurn::Malformed {
                reason: String::from("acceptance with no player offer on the table"),
            },
        },
        CounterDecision::Reject => OracleTurn::Rejected,
        CounterDecision::Counter => {
            let Some(offer) = reply.offer else {
                return OracleTurn::Malformed {
                    reason: String::from("counter decision carried no offer"),
                };
            };
            if offer <= negotiation.customer_offer {
                tracing::warn!(
                    customer = %negotiation.customer.name,
                    previous = negotiation.customer_offer,
                    offer,
                    "counter does not improve on the previous offer"
                );
            }
            negotiation.customer_offer = offer;
            negotiation.history.push(NegotiationTurn {
                speaker: Speaker::Customer,
                text: reply.spoken_response.clone(),
                offer: Some(offer),
            });
            OracleTurn::Countered { offer }
        }
    }
}

// ---------------------------------------------------------------------------
// Mood
// ---------------------------------------------------------------------------

/// Describe the customer's mood from remaining patience.
///
/// Collaborators show this instead of the raw counter. Livid is only
/// reachable in the instant before the aggregate is deleted.
pub fn patience_mood(current: u32, initial: u32) -> &'static str {
    let initial = initial.max(1);
    let scaled = u64::from(current).saturating_mul(10);
    let bound = u64::from(initial);
    if scaled >= bound.saturating_mul(8) {
        "Patient"
    } else if scaled >= bound.saturating_mul(5) {
        "Considering"
    } else if scaled >= bound.saturating_mul(2) {
        "Restless"
    } else if current > 0 {
        "Impatient!"
    } else {
        "Livid!"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chaffer_types::catalog::CUSTOMER_ARCHETYPES;
    use chaffer_types::ids::ItemInstanceId;
    use chaffer_types::instances::CustomerInstance;

    use super::*;

    fn customer(name: &str) -> CustomerInstance {
        let template = CUSTOMER_ARCHETYPES
            .iter()
            .find(|c| c.name == name)
            .unwrap();
        CustomerInstance::from_template(template)
    }

    fn open_with(name: &str, offer: u32) -> Negotiation {
        Negotiation::open(
            ItemInstanceId::new(),
            customer(name),
            offer,
            String::from("Here is my offer."),
        )
    }

    fn counter_reply(decision: CounterDecision, offer: Option<u32>) -> CounterReply {
        CounterReply {
            spoken_response: String::from("Hmm."),
            offer,
            decision,
        }
    }

    // -----------------------------------------------------------------------
    // Player turn
    // -----------------------------------------------------------------------

    #[test]
    fn player_offer_decrements_patience_and_records_turn() {
        let mut negotiation = open_with("Weary Farmer", 40);
        assert_eq!(negotiation.patience, 5);

        let turn = submit_player_offer(&mut negotiation, String::from("How about 60?"), 60);
        assert_eq!(turn, PlayerTurn::AwaitingOracle);
        assert_eq!(negotiation.patience, 4);
        assert_eq!(negotiation.player_offer, Some(60));
        assert_eq!(negotiation.history.len(), 2);
        assert_eq!(
            negotiation.history.last().map(|t| t.speaker),
            Some(Speaker::Player)
        );
    }

    #[test]
    fn impatient_customer_exhausts_on_third_counter() {
        // Initial patience 3 (impatient): 3 -> 2 -> 1 -> 0.
        let mut negotiation = open_with("Gruff Mercenary", 100);
        assert_eq!(negotiation.initial_patience, 3);

        assert_eq!(
            submit_player_offer(&mut negotiation, String::from("150?"), 150),
            PlayerTurn::AwaitingOracle
        );
        assert_eq!(negotiation.patience, 2);
        assert_eq!(
            submit_player_offer(&mut negotiation, String::from("140?"), 140),
            PlayerTurn::AwaitingOracle
        );
        assert_eq!(negotiation.patience, 1);
        // Third submission lands on zero: terminated without an oracle call.
        assert_eq!(
            submit_player_offer(&mut negotiation, String::from("130?"), 130),
            PlayerTurn::Exhausted
        );
        assert_eq!(negotiation.patience, 0);
    }

    #[test]
    fn patience_is_non_increasing() {
        let mut negotiation = open_with("Shrewd Trader", 50);
        let mut last = negotiation.patience;
        for price in [90, 85, 80, 78, 76, 74, 72, 70] {
            let _ = submit_player_offer(&mut negotiation, String::from("..."), price);
            assert!(negotiation.patience <= last);
            last = negotiation.patience;
        }
        assert_eq!(negotiation.patience, 0);
    }

    // -----------------------------------------------------------------------
    // Oracle turn
    // -----------------------------------------------------------------------

    #[test]
    fn accept_uses_player_price() {
        let mut negotiation = open_with("Weary Farmer", 40);
        let _ = submit_player_offer(&mut negotiation, String::from("60?"), 60);

        let turn = apply_oracle_decision(
            &mut negotiation,
            &counter_reply(CounterDecision::Accept, None),
        );
        assert_eq!(turn, OracleTurn::Accepted { price: 60 });
    }

    #[test]
    fn accept_without_player_offer_is_malformed() {
        let mut negotiation = open_with("Weary Farmer", 40);
        let turn = apply_oracle_decision(
            &mut negotiation,
            &counter_reply(CounterDecision::Accept, None),
        );
        assert!(matches!(turn, OracleTurn::Malformed { .. }));
    }

    #[test]
    fn counter_updates_standing_offer_and_history() {
        let mut negotiation = open_with("Weary Farmer", 40);
        let _ = submit_player_offer(&mut negotiation, String::from("70?"), 70);

        let turn = apply_oracle_decision(
            &mut negotiation,
            &counter_reply(CounterDecision::Counter, Some(55)),
        );
        assert_eq!(turn, OracleTurn::Countered { offer: 55 });
        assert_eq!(negotiation.customer_offer, 55);
        assert_eq!(negotiation.history.len(), 3);
        assert_eq!(negotiation.history.last().and_then(|t| t.offer), Some(55));
    }

    #[test]
    fn counter_without_offer_is_malformed() {
        let mut negotiation = open_with("Weary Farmer", 40);
        let _ = submit_player_offer(&mut negotiation, String::from("70?"), 70);

        let turn = apply_oracle_decision(
            &mut negotiation,
            &counter_reply(CounterDecision::Counter, None),
        );
        assert!(matches!(turn, OracleTurn::Malformed { .. }));
        // Standing offer untouched.
        assert_eq!(negotiation.customer_offer, 40);
    }

    #[test]
    fn non_improving_counter_is_accepted_with_warning() {
        // Deliberately preserved loose behavior: the engine takes the
        // value and only logs the protocol violation.
        let mut negotiation = open_with("Weary Farmer", 40);
        let _ = submit_player_offer(&mut negotiation, String::from("70?"), 70);

        let turn = apply_oracle_decision(
            &mut negotiation,
            &counter_reply(CounterDecision::Counter, Some(35)),
        );
        assert_eq!(turn, OracleTurn::Countered { offer: 35 });
        assert_eq!(negotiation.customer_offer, 35);
    }

    #[test]
    fn zero_patience_forces_rejection() {
        let mut negotiation = open_with("Weary Farmer", 40);
        negotiation.patience = 0;

        let turn = apply_oracle_decision(
            &mut negotiation,
            &counter_reply(CounterDecision::Accept, None),
        );
        assert_eq!(turn, OracleTurn::Rejected);

        let turn = apply_oracle_decision(
            &mut negotiation,
            &counter_reply(CounterDecision::Counter, Some(200)),
        );
        assert_eq!(turn, OracleTurn::Rejected);
    }

    // -----------------------------------------------------------------------
    // Mood
    // -----------------------------------------------------------------------

    #[test]
    fn mood_descriptions_step_down_with_patience() {
        assert_eq!(patience_mood(5, 5), "Patient");
        assert_eq!(patience_mood(4, 5), "Patient");
        assert_eq!(patience_mood(3, 5), "Considering");
        assert_eq!(patience_mood(2, 5), "Restless");
        assert_eq!(patience_mood(1, 5), "Restless");
        assert_eq!(patience_mood(1, 7), "Impatient!");
        assert_eq!(patience_mood(0, 5), "Livid!");
    }
}
