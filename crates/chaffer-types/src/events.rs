//! Typed events emitted by engine transitions.
//!
//! Every successful command application returns the events it produced.
//! Each event's `Display` implementation is the player-facing dialogue
//! line, so collaborators can render a transcript without interpreting
//! variants -- but the variants stay typed for anyone who needs to react
//! to specific outcomes (the driver, tests).

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ShopEvent
// ---------------------------------------------------------------------------

/// An observable consequence of one applied [`ShopCommand`].
///
/// [`ShopCommand`]: crate::commands::ShopCommand
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShopEvent {
    /// A unit of stock was purchased into the back room.
    ItemPurchased {
        /// Item name.
        name: String,
        /// Wholesale price paid.
        price: u32,
    },
    /// An item moved from the back room onto the shelf.
    ItemShelved {
        /// Item name.
        name: String,
    },
    /// The shelf gained a slot.
    ShelfUpgraded {
        /// New capacity.
        capacity: u32,
        /// Gold spent.
        cost: u32,
    },
    /// Setting up ended; customers may now arrive.
    ShopOpened,
    /// Selling ended; the management phase begins.
    ShopClosed,
    /// A new day started in the setting-up phase.
    DayStarted {
        /// The new day number.
        day: u32,
    },
    /// The recurring loan payment fell due this evening.
    LoanDue {
        /// Payment amount.
        amount: u32,
    },
    /// The loan payment was covered.
    LoanPaid {
        /// Payment amount.
        amount: u32,
    },
    /// The loan payment could not be covered.
    LoanDefaulted {
        /// Payment amount that was due.
        amount: u32,
        /// Gold on hand at the time.
        gold: u32,
    },
    /// The game-over latch closed. Terminal.
    GameOver,
    /// A customer walked in.
    CustomerEntered {
        /// Customer name.
        name: String,
    },
    /// The customer left without a negotiation (chose to leave, or was
    /// cleared while idle).
    CustomerLeft {
        /// Customer name.
        name: String,
        /// Parting line, if the oracle provided one.
        line: Option<String>,
    },
    /// The oracle replied but named no item or offer.
    CustomerUndecided {
        /// Customer name.
        name: String,
    },
    /// The oracle chose an item id that is not on the shelf.
    CustomerConfusedItem {
        /// Customer name.
        name: String,
    },
    /// The oracle call failed or its reply was malformed; the encounter
    /// was abandoned.
    OracleFailed {
        /// Customer name.
        name: String,
        /// Diagnostic from the oracle layer.
        message: String,
    },
    /// A negotiation opened with the customer's initial offer.
    NegotiationOpened {
        /// Customer name.
        name: String,
        /// Spoken opening line.
        line: String,
        /// Opening offer in gold.
        offer: u32,
    },
    /// The shopkeeper sent a counter price.
    PlayerOffered {
        /// Spoken line.
        text: String,
        /// Counter price in gold.
        price: u32,
    },
    /// The customer countered with a new offer.
    CustomerCountered {
        /// Customer name.
        name: String,
        /// Spoken line.
        line: String,
        /// New offer in gold.
        offer: u32,
    },
    /// The customer spoke without attaching an offer (acceptances,
    /// rejections).
    CustomerSpoke {
        /// Customer name.
        name: String,
        /// Spoken line.
        line: String,
    },
    /// Patience ran out on the shopkeeper's last counter.
    PatienceExhausted {
        /// Customer name.
        name: String,
    },
    /// The item sold and the negotiation closed.
    SaleCompleted {
        /// Item name.
        item: String,
        /// Agreed price in gold.
        price: u32,
        /// Reputation change applied (+1 or 0).
        reputation_delta: i32,
    },
    /// The negotiation ended without a sale (rejection or walk-away).
    NegotiationFailed {
        /// Customer name.
        name: String,
    },
}

impl core::fmt::Display for ShopEvent {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ItemPurchased { name, price } => {
                write!(f, "Bought {name} for {price}g.")
            }
            Self::ItemShelved { name } => write!(f, "Placed {name} on the shelf."),
            Self::ShelfUpgraded { capacity, cost } => {
                write!(f, "Upgraded shelf capacity to {capacity}! (-{cost}g)")
            }
            Self::ShopOpened => write!(f, "Shop opened for the day!"),
            Self::ShopClosed => write!(
                f,
                "Shop closed for the night. Time to manage inventory and buy stock."
            ),
            Self::DayStarted { day } => {
                write!(f, "Day {day} begins. Time to set up the shelves.")
            }
            Self::LoanDue { amount } => write!(f, "Loan payment of {amount}g is due!"),
            Self::LoanPaid { amount } => write!(f, "Paid {amount}g loan payment. Phew!"),
            Self::LoanDefaulted { amount, gold } => {
                write!(f, "Cannot pay {amount}g loan! You only have {gold}g!")
            }
            Self::GameOver => write!(f, "GAME OVER - The loan sharks are coming..."),
            Self::CustomerEntered { name } => write!(f, "{name} enters the shop!"),
            Self::CustomerLeft { name, line } => {
                let parting = line.as_deref().unwrap_or("Changed my mind.");
                write!(f, "{name}: {parting}")
            }
            Self::CustomerUndecided { name } => {
                write!(f, "{name} looks around indecisively.")
            }
            Self::CustomerConfusedItem { name } => {
                write!(f, "{name} seems confused about an item.")
            }
            Self::OracleFailed { name, message } => {
                write!(f, "{name} trails off mid-sentence. ({message})")
            }
            Self::NegotiationOpened { name, line, offer } => {
                write!(f, "{name}: {line} (Offers {offer}g)")
            }
            Self::PlayerOffered { text, price } => {
                write!(f, "You: {text} (Offer {price}g)")
            }
            Self::CustomerCountered { name, line, offer } => {
                write!(f, "{name}: {line} (Offers {offer}g)")
            }
            Self::CustomerSpoke { name, line } => write!(f, "{name}: {line}"),
            Self::PatienceExhausted { name } => {
                write!(f, "{name} has run out of patience! Negotiation ended. (-1 Rep)")
            }
            Self::SaleCompleted {
                item,
                price,
                reputation_delta,
            } => {
                if *reputation_delta > 0 {
                    write!(f, "Sold {item} for {price}g! (+{reputation_delta} Rep)")
                } else {
                    write!(f, "Sold {item} for {price}g! (0 Rep)")
                }
            }
            Self::NegotiationFailed { name } => {
                write!(f, "{name} leaves in frustration. (-1 Rep)")
            }
        }
    }
}
