//! The shop aggregate and its single transition path.
//!
//! [`Shop`] owns every piece of mutable state: the day cycle, the economy
//! ledger, the reputation tracker, the stock room, the visiting customer,
//! and the active negotiation. The only way to mutate any of it is
//! [`Shop::apply`], which processes exactly one [`ShopCommand`] at a time
//! and returns the events the transition produced. The engine is not
//! re-entrant by construction -- `apply` takes `&mut self`.
//!
//! Once the game-over latch closes, every command is rejected.

use chaffer_types::commands::{CounterOutcome, OpeningOutcome, ShopCommand};
use chaffer_types::contract::{
    CounterContext, CustomerCard, DisplayedItem, OpeningContext, OpeningDecision, OpeningReply,
};
use chaffer_types::enums::Phase;
use chaffer_types::events::ShopEvent;
use chaffer_types::ids::ItemInstanceId;
use chaffer_types::instances::{CustomerInstance, Negotiation};

use crate::day::DayCycle;
use crate::error::EngineError;
use crate::ledger::{EconomyLedger, PeriodOutcome};
use crate::negotiation::{self, OracleTurn, PlayerTurn};
use crate::reputation::{FAILED_NEGOTIATION_PENALTY, ReputationTracker, sale_reputation_delta};
use crate::stock::StockRoom;

// ---------------------------------------------------------------------------
// Shop
// ---------------------------------------------------------------------------

/// Complete mutable state of one play session.
#[derive(Debug, Clone, Default)]
pub struct Shop {
    day: DayCycle,
    ledger: EconomyLedger,
    reputation: ReputationTracker,
    stock: StockRoom,
    customer: Option<CustomerInstance>,
    negotiation: Option<Negotiation>,
}

impl Shop {
    /// Open a fresh shop: day 1, management phase, starting gold and loan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a shop from explicit parts (tests, scenario setup).
    pub const fn from_parts(
        day: DayCycle,
        ledger: EconomyLedger,
        reputation: ReputationTracker,
        stock: StockRoom,
    ) -> Self {
        Self {
            day,
            ledger,
            reputation,
            stock,
            customer: None,
            negotiation: None,
        }
    }

    // -- Read access ---------------------------------------------------------

    /// The day cycle.
    pub const fn day(&self) -> &DayCycle {
        &self.day
    }

    /// The current phase.
    pub const fn phase(&self) -> Phase {
        self.day.phase()
    }

    /// The economy ledger.
    pub const fn ledger(&self) -> &EconomyLedger {
        &self.ledger
    }

    /// Gold on hand.
    pub const fn gold(&self) -> u32 {
        self.ledger.gold()
    }

    /// The reputation tracker.
    pub const fn reputation(&self) -> &ReputationTracker {
        &self.reputation
    }

    /// The stock room.
    pub const fn stock(&self) -> &StockRoom {
        &self.stock
    }

    /// The visiting customer, if any.
    pub const fn customer(&self) -> Option<&CustomerInstance> {
        self.customer.as_ref()
    }

    /// The active negotiation, if any.
    pub const fn negotiation(&self) -> Option<&Negotiation> {
        self.negotiation.as_ref()
    }

    /// Wholesale goods currently offered at the shop's reputation.
    pub fn market(&self) -> Vec<&'static chaffer_types::ItemTemplate> {
        self.reputation.available_goods()
    }

    // -- Oracle context ------------------------------------------------------

    /// Build the opening request context for the visiting customer.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NoCustomer`] without a visitor and
    /// [`EngineError::ShelfEmpty`] when nothing is displayed.
    pub fn opening_context(&self) -> Result<OpeningContext, EngineError> {
        let customer = self.customer.as_ref().ok_or(EngineError::NoCustomer)?;
        if self.stock.shelf().is_empty() {
            return Err(EngineError::ShelfEmpty);
        }
        Ok(OpeningContext {
            customer: CustomerCard::from(customer),
            reputation: self.reputation.score(),
            items: self.stock.shelf().iter().map(DisplayedItem::from).collect(),
            interests: customer.interests.iter().map(ToString::to_string).collect(),
        })
    }

    /// Build the counter request context for the active negotiation.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NoNegotiation`] without one, and
    /// [`EngineError::NoPlayerOffer`] before the shopkeeper has countered.
    pub fn counter_context(&self) -> Result<CounterContext, EngineError> {
        let negotiation = self.negotiation.as_ref().ok_or(EngineError::NoNegotiation)?;
        let item = self
            .stock
            .find_on_shelf(negotiation.item_id)
            .ok_or(EngineError::Internal("negotiated item missing from shelf"))?;
        CounterContext::from_negotiation(
            negotiation,
            &item.name,
            item.base_value,
            self.reputation.score(),
        )
        .ok_or(EngineError::NoPlayerOffer)
    }

    // -- The transition path -------------------------------------------------

    /// Apply one command, returning the events it produced.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] when the command is illegal in the current
    /// state. A rejected command mutates nothing.
    pub fn apply(&mut self, command: ShopCommand) -> Result<Vec<ShopEvent>, EngineError> {
        if self.day.is_game_over() {
            return Err(EngineError::GameOver);
        }

        match command {
            ShopCommand::BuyItem { template_id } => self.buy_item(&template_id),
            ShopCommand::MoveItemToShelf { instance_id } => self.move_item_to_shelf(instance_id),
            ShopCommand::UpgradeShelf => self.upgrade_shelf(),
            ShopCommand::SetCustomer { customer } => self.set_customer(customer),
            ShopCommand::ClearCustomer => self.clear_customer(),
            ShopCommand::StartNegotiation { outcome } => self.start_negotiation(outcome),
            ShopCommand::SubmitPlayerOffer { text, price } => self.submit_player_offer(text, price),
            ShopCommand::ApplyAgentDecision { outcome } => self.apply_agent_decision(outcome),
            ShopCommand::AcceptCurrentOffer => self.accept_current_offer(),
            ShopCommand::WalkAway => self.walk_away(),
            ShopCommand::AdvancePhase => self.advance_phase(),
        }
    }

    // -- Stock transitions ---------------------------------------------------

    fn buy_item(&mut self, template_id: &str) -> Result<Vec<ShopEvent>, EngineError> {
        let template =
            chaffer_types::item_template(template_id).ok_or_else(|| EngineError::UnknownTemplate {
                id: template_id.to_owned(),
            })?;
        self.ledger.try_spend(template.wholesale_price)?;
        let instance = chaffer_types::ItemInstance::from_template(template);
        let event = ShopEvent::ItemPurchased {
            name: instance.name.clone(),
            price: instance.wholesale_price,
        };
        self.stock.add_to_inventory(instance);
        Ok(vec![event])
    }

    fn move_item_to_shelf(
        &mut self,
        instance_id: ItemInstanceId,
    ) -> Result<Vec<ShopEvent>, EngineError> {
        // Hardened engine invariant: shelving only happens while setting up.
        if self.phase() != Phase::SettingUp {
            return Err(EngineError::PhaseViolation {
                action: "place items on the shelf",
                phase: self.phase(),
            });
        }
        let name = self
            .stock
            .inventory()
            .iter()
            .find(|i| i.instance_id == instance_id)
            .map(|i| i.name.clone());
        if self.stock.move_to_shelf(instance_id) {
            Ok(vec![ShopEvent::ItemShelved {
                name: name.unwrap_or_default(),
            }])
        } else {
            // Unknown instance or full shelf: a silent no-op by contract.
            Ok(Vec::new())
        }
    }

    fn upgrade_shelf(&mut self) -> Result<Vec<ShopEvent>, EngineError> {
        let cost = self.stock.upgrade_cost();
        self.ledger.try_spend(cost)?;
        self.stock.upgrade();
        Ok(vec![ShopEvent::ShelfUpgraded {
            capacity: self.stock.capacity(),
            cost,
        }])
    }

    // -- Customer transitions ------------------------------------------------

    fn set_customer(&mut self, customer: CustomerInstance) -> Result<Vec<ShopEvent>, EngineError> {
        if self.phase() != Phase::Selling {
            return Err(EngineError::PhaseViolation {
                action: "greet a customer",
                phase: self.phase(),
            });
        }
        if self.negotiation.is_some() {
            return Err(EngineError::NegotiationActive);
        }
        if self.customer.is_some() {
            return Err(EngineError::CustomerPresent);
        }
        if self.stock.shelf().is_empty() {
            return Err(EngineError::ShelfEmpty);
        }
        let event = ShopEvent::CustomerEntered {
            name: customer.name.clone(),
        };
        self.customer = Some(customer);
        Ok(vec![event])
    }

    fn clear_customer(&mut self) -> Result<Vec<ShopEvent>, EngineError> {
        if self.negotiation.is_some() {
            return Err(EngineError::NegotiationActive);
        }
        match self.customer.take() {
            Some(customer) => Ok(vec![ShopEvent::CustomerLeft {
                name: customer.name,
                line: None,
            }]),
            None => Ok(Vec::new()),
        }
    }

    // -- Negotiation transitions ---------------------------------------------

    fn start_negotiation(
        &mut self,
        outcome: OpeningOutcome,
    ) -> Result<Vec<ShopEvent>, EngineError> {
        if self.negotiation.is_some() {
            return Err(EngineError::NegotiationActive);
        }
        let customer = self.customer.take().ok_or(EngineError::NoCustomer)?;

        let reply = match outcome {
            OpeningOutcome::Reply(reply) => reply,
            OpeningOutcome::Failed { message } => {
                // Encounter failure: discard the customer, stay idle.
                return Ok(vec![ShopEvent::OracleFailed {
                    name: customer.name,
                    message,
                }]);
            }
        };

        match reply.decision {
            OpeningDecision::Leave => Ok(vec![ShopEvent::CustomerLeft {
                name: customer.name,
                line: some_nonempty(reply.spoken_response),
            }]),
            OpeningDecision::InitialOffer => self.open_from_offer(customer, reply),
        }
    }

    /// Resolve an initial-offer reply into a live negotiation.
    fn open_from_offer(
        &mut self,
        customer: CustomerInstance,
        reply: OpeningReply,
    ) -> Result<Vec<ShopEvent>, EngineError> {
        let (Some(offer), Some(raw_item_id)) = (reply.offer, reply.item_id) else {
            // An initial offer without both fields is indecision, not an
            // error: the customer simply fails to engage.
            return Ok(vec![ShopEvent::CustomerUndecided {
                name: customer.name,
            }]);
        };

        let Some(item) = self
            .stock
            .shelf()
            .iter()
            .find(|i| i.instance_id.to_string() == raw_item_id)
        else {
            tracing::warn!(
                customer = %customer.name,
                item_id = %raw_item_id,
                "oracle chose an item id that is not on the shelf"
            );
            return Ok(vec![ShopEvent::CustomerConfusedItem {
                name: customer.name,
            }]);
        };

        let item_id = item.instance_id;
        let name = customer.name.clone();
        let line = reply.spoken_response.clone();
        self.negotiation = Some(Negotiation::open(
            item_id,
            customer,
            offer,
            reply.spoken_response,
        ));
        Ok(vec![ShopEvent::NegotiationOpened { name, line, offer }])
    }

    fn submit_player_offer(
        &mut self,
        text: String,
        price: u32,
    ) -> Result<Vec<ShopEvent>, EngineError> {
        let negotiation = self.negotiation.as_mut().ok_or(EngineError::NoNegotiation)?;
        let turn = negotiation::submit_player_offer(negotiation, text.clone(), price);
        let mut events = vec![ShopEvent::PlayerOffered { text, price }];
        match turn {
            PlayerTurn::AwaitingOracle => Ok(events),
            PlayerTurn::Exhausted => {
                let name = negotiation.customer.name.clone();
                self.negotiation = None;
                self.reputation.adjust(FAILED_NEGOTIATION_PENALTY);
                events.push(ShopEvent::PatienceExhausted { name });
                Ok(events)
            }
        }
    }

    fn apply_agent_decision(
        &mut self,
        outcome: CounterOutcome,
    ) -> Result<Vec<ShopEvent>, EngineError> {
        let negotiation = self.negotiation.as_mut().ok_or(EngineError::NoNegotiation)?;
        if negotiation.player_offer.is_none() {
            return Err(EngineError::NoPlayerOffer);
        }
        let name = negotiation.customer.name.clone();

        let reply = match outcome {
            CounterOutcome::Reply(reply) => reply,
            CounterOutcome::Failed { message } => {
                // Encounter failure mid-negotiation: abandon without a
                // reputation penalty.
                self.negotiation = None;
                return Ok(vec![ShopEvent::OracleFailed { name, message }]);
            }
        };

        let spoken = reply.spoken_response.clone();
        match negotiation::apply_oracle_decision(negotiation, &reply) {
            OracleTurn::Accepted { price } => {
                let mut events = vec![ShopEvent::CustomerSpoke { name, line: spoken }];
                events.extend(self.finish_sale(price)?);
                Ok(events)
            }
            OracleTurn::Rejected => {
                self.negotiation = None;
                self.reputation.adjust(FAILED_NEGOTIATION_PENALTY);
                Ok(vec![
                    ShopEvent::CustomerSpoke { name: name.clone(), line: spoken },
                    ShopEvent::NegotiationFailed { name },
                ])
            }
            OracleTurn::Countered { offer } => Ok(vec![ShopEvent::CustomerCountered {
                name,
                line: spoken,
                offer,
            }]),
            OracleTurn::Malformed { reason } => {
                self.negotiation = None;
                Ok(vec![ShopEvent::OracleFailed {
                    name,
                    message: reason,
                }])
            }
        }
    }

    fn accept_current_offer(&mut self) -> Result<Vec<ShopEvent>, EngineError> {
        let negotiation = self.negotiation.as_ref().ok_or(EngineError::NoNegotiation)?;
        let price = negotiation.customer_offer;
        self.finish_sale(price)
    }

    fn walk_away(&mut self) -> Result<Vec<ShopEvent>, EngineError> {
        let negotiation = self.negotiation.take().ok_or(EngineError::NoNegotiation)?;
        self.reputation.adjust(FAILED_NEGOTIATION_PENALTY);
        Ok(vec![ShopEvent::NegotiationFailed {
            name: negotiation.customer.name,
        }])
    }

    /// Conclude the active negotiation as a sale at `price`.
    ///
    /// Removes the item from the shelf (destroying the instance), credits
    /// the gold, applies the deal-quality reputation rule, and deletes the
    /// aggregate.
    fn finish_sale(&mut self, price: u32) -> Result<Vec<ShopEvent>, EngineError> {
        let negotiation = self.negotiation.take().ok_or(EngineError::NoNegotiation)?;
        let item = self
            .stock
            .take_from_shelf(negotiation.item_id)
            .ok_or(EngineError::Internal("negotiated item missing from shelf"))?;

        self.ledger.credit(price);
        let delta = sale_reputation_delta(price, item.base_value);
        self.reputation.adjust(delta);

        Ok(vec![ShopEvent::SaleCompleted {
            item: item.name,
            price,
            reputation_delta: delta,
        }])
    }

    // -- Day-phase transition ------------------------------------------------

    fn advance_phase(&mut self) -> Result<Vec<ShopEvent>, EngineError> {
        match self.phase() {
            Phase::SettingUp => {
                self.day.begin_selling()?;
                Ok(vec![ShopEvent::ShopOpened])
            }
            Phase::Selling => self.close_for_the_night(),
            Phase::Management => {
                self.day.next_day()?;
                Ok(vec![ShopEvent::DayStarted {
                    day: self.day.day(),
                }])
            }
            Phase::GameOver => Err(EngineError::GameOver),
        }
    }

    /// The selling-to-management boundary, where the loan is settled.
    ///
    /// On default the phase transition is aborted: the shop latches game
    /// over instead of reaching management.
    fn close_for_the_night(&mut self) -> Result<Vec<ShopEvent>, EngineError> {
        if self.negotiation.is_some() {
            return Err(EngineError::NegotiationActive);
        }
        // An idle customer does not survive closing time.
        self.customer = None;

        let mut events = Vec::new();
        if self.ledger.is_payment_due(self.day.day()) {
            events.push(ShopEvent::LoanDue {
                amount: self.ledger.loan_payment(),
            });
            match self.ledger.settle_period(self.day.day()) {
                PeriodOutcome::Paid { amount } => {
                    events.push(ShopEvent::LoanPaid { amount });
                }
                PeriodOutcome::Defaulted { amount, gold } => {
                    events.push(ShopEvent::LoanDefaulted { amount, gold });
                    events.push(ShopEvent::GameOver);
                    self.day.latch_game_over();
                    return Ok(events);
                }
                PeriodOutcome::NotDue => {}
            }
        }

        self.day.close_shop()?;
        events.push(ShopEvent::ShopClosed);
        Ok(events)
    }
}

/// Wrap a spoken line, treating an empty string as absent.
fn some_nonempty(line: String) -> Option<String> {
    if line.is_empty() { None } else { Some(line) }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
