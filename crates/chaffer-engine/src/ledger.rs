//! Gold and loan bookkeeping.
//!
//! The ledger owns the shop's liquid gold, the recurring loan payment, the
//! outstanding principal, and the next due day. It exposes a single
//! `settle_period` operation evaluated at the selling-to-management
//! boundary; everything else is checked debit/credit.
//!
//! All amounts are integer gold. Spends are validated before any mutation,
//! so gold can never go negative.

use crate::error::EngineError;

/// Starting gold for a new shop.
pub const STARTING_GOLD: u32 = 1000;

/// The fixed per-period loan payment.
pub const LOAN_PAYMENT: u32 = 500;

/// Total principal owed at the start of the game.
pub const LOAN_PRINCIPAL: u32 = 5000;

/// Day the first payment falls due.
pub const FIRST_DUE_DAY: u32 = 7;

/// Days between loan payments.
const PAYMENT_INTERVAL_DAYS: u32 = 7;

// ---------------------------------------------------------------------------
// Settlement outcome
// ---------------------------------------------------------------------------

/// The result of evaluating the loan at a period boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodOutcome {
    /// No payment was due yet.
    NotDue,
    /// The payment was debited and the principal reduced.
    Paid {
        /// Amount debited.
        amount: u32,
    },
    /// Gold could not cover the payment. Fatal to the session.
    Defaulted {
        /// Amount that was due.
        amount: u32,
        /// Gold on hand at the time.
        gold: u32,
    },
}

// ---------------------------------------------------------------------------
// EconomyLedger
// ---------------------------------------------------------------------------

/// The shop's money: gold on hand plus the standing loan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EconomyLedger {
    /// Liquid gold. Never negative; spends are checked first.
    gold: u32,
    /// Fixed payment debited each period.
    loan_payment: u32,
    /// Outstanding principal. Saturates at zero.
    loan_principal: u32,
    /// Next day a payment falls due. Advances by seven per payment.
    next_due_day: u32,
}

impl EconomyLedger {
    /// Create a ledger with explicit figures.
    pub const fn new(gold: u32, loan_payment: u32, loan_principal: u32, first_due_day: u32) -> Self {
        Self {
            gold,
            loan_payment,
            loan_principal,
            next_due_day: first_due_day,
        }
    }

    /// Gold currently on hand.
    pub const fn gold(&self) -> u32 {
        self.gold
    }

    /// The fixed per-period payment.
    pub const fn loan_payment(&self) -> u32 {
        self.loan_payment
    }

    /// Outstanding principal.
    pub const fn loan_principal(&self) -> u32 {
        self.loan_principal
    }

    /// The next day a payment falls due.
    pub const fn next_due_day(&self) -> u32 {
        self.next_due_day
    }

    /// Whether the payment is due on the given day.
    pub const fn is_payment_due(&self, day: u32) -> bool {
        day >= self.next_due_day
    }

    /// Debit gold for a purchase or upgrade.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InsufficientGold`] without mutating if the
    /// balance cannot cover the amount.
    pub fn try_spend(&mut self, amount: u32) -> Result<(), EngineError> {
        match self.gold.checked_sub(amount) {
            Some(remaining) => {
                self.gold = remaining;
                Ok(())
            }
            None => Err(EngineError::InsufficientGold {
                needed: amount,
                available: self.gold,
            }),
        }
    }

    /// Credit sale proceeds.
    pub const fn credit(&mut self, amount: u32) {
        self.gold = self.gold.saturating_add(amount);
    }

    /// Evaluate the loan at a period boundary.
    ///
    /// If no payment is due on `day`, nothing changes. If one is due and
    /// gold covers it, the payment is debited, the principal reduced, and
    /// the due day advanced by seven. Otherwise nothing is mutated and the
    /// default outcome is returned -- latching game over is the day-phase
    /// machine's job, not the ledger's.
    pub const fn settle_period(&mut self, day: u32) -> PeriodOutcome {
        if !self.is_payment_due(day) {
            return PeriodOutcome::NotDue;
        }

        match self.gold.checked_sub(self.loan_payment) {
            Some(remaining) => {
                self.gold = remaining;
                self.loan_principal = self.loan_principal.saturating_sub(self.loan_payment);
                self.next_due_day = self.next_due_day.saturating_add(PAYMENT_INTERVAL_DAYS);
                PeriodOutcome::Paid {
                    amount: self.loan_payment,
                }
            }
            None => PeriodOutcome::Defaulted {
                amount: self.loan_payment,
                gold: self.gold,
            },
        }
    }
}

impl Default for EconomyLedger {
    fn default() -> Self {
        Self::new(STARTING_GOLD, LOAN_PAYMENT, LOAN_PRINCIPAL, FIRST_DUE_DAY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
