//! Terminal driver for the Chaffer shop simulation.
//!
//! Wires the engine and the oracle service into an interactive play loop:
//! player input becomes [`ShopCommand`]s, oracle replies are fed back in
//! as outcomes, and every [`ShopEvent`] prints as a dialogue line.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load oracle configuration from the environment
//! 3. Initialize the oracle service (consent-gated)
//! 4. Run the input loop until quit or game over

use std::io::{BufRead, Write as _};

use anyhow::Context;
use chaffer_engine::{Shop, patience_mood, spawn_customer};
use chaffer_oracle::{OracleConfig, OracleError, OracleService};
use chaffer_types::{ShopCommand, ShopEvent};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Application entry point for the shop driver.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    info!("chaffer starting");

    let mut oracle = OracleService::new();
    match OracleConfig::from_env() {
        Ok(config) => match oracle.initialize(&config) {
            Ok(()) => println!("AI model ready ({}).", config.backend.model),
            Err(OracleError::ConsentWithheld) => {
                println!(
                    "Model consent not given (set CHAFFER_MODEL_CONSENT=true); \
                     customers will not come in."
                );
            }
            Err(e) => println!("AI Error: {e}. Customers will not come in."),
        },
        Err(e) => println!("AI Error: {e}. Customers will not come in."),
    }

    let mut shop = Shop::new();
    let mut rng = rand::rng();

    println!();
    println!("You inherit a small shop and a large debt. Type `help` for commands.");
    print_status(&shop);

    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush().context("flushing prompt")?;

        let mut line = String::new();
        if stdin
            .lock()
            .read_line(&mut line)
            .context("reading input")?
            == 0
        {
            break; // EOF
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let mut parts = line.split_whitespace();
        let verb = parts.next().unwrap_or_default();
        match verb {
            "quit" | "exit" => break,
            "help" => print_help(),
            "status" => print_status(&shop),
            "market" => print_market(&shop),
            "stock" => print_stock(&shop),
            "buy" => {
                let id = parts.next().unwrap_or_default().to_owned();
                dispatch(&mut shop, ShopCommand::BuyItem { template_id: id });
            }
            "shelve" => shelve(&mut shop, parts.next()),
            "upgrade" => dispatch(&mut shop, ShopCommand::UpgradeShelf),
            "advance" | "open" | "close" | "sleep" => {
                dispatch(&mut shop, ShopCommand::AdvancePhase);
            }
            "customer" => next_customer(&mut shop, &oracle, &mut rng).await,
            "offer" => {
                let price = parts.next().unwrap_or_default().to_owned();
                let text = parts.collect::<Vec<_>>().join(" ");
                send_offer(&mut shop, &oracle, &price, text).await;
            }
            "accept" => dispatch(&mut shop, ShopCommand::AcceptCurrentOffer),
            "walk" => dispatch(&mut shop, ShopCommand::WalkAway),
            "leave" => dispatch(&mut shop, ShopCommand::ClearCustomer),
            other => println!("Unknown command `{other}`. Type `help`."),
        }

        if shop.day().is_game_over() {
            println!("The shutters stay down. Thanks for playing.");
            break;
        }
    }

    Ok(())
}

/// Apply one command and print its dialogue lines or rejection.
fn dispatch(shop: &mut Shop, command: ShopCommand) {
    match shop.apply(command) {
        Ok(events) => print_events(&events),
        Err(e) => println!("{e}"),
    }
}

/// Spawn a customer, run the opening oracle round, and feed the outcome
/// back into the engine.
async fn next_customer(shop: &mut Shop, oracle: &OracleService, rng: &mut impl rand::Rng) {
    let Some(customer) = spawn_customer(shop.reputation(), rng) else {
        println!("No customers seem interested in your shop today.");
        return;
    };
    if let Err(e) = shop
        .apply(ShopCommand::SetCustomer { customer })
        .map(|events| print_events(&events))
    {
        println!("{e}");
        return;
    }

    let context = match shop.opening_context() {
        Ok(context) => context,
        Err(e) => {
            println!("{e}");
            return;
        }
    };

    match oracle.opening_offer(&context).await {
        Ok(outcome) => dispatch(shop, ShopCommand::StartNegotiation { outcome }),
        Err(e) => {
            // Service-level refusal (not ready, busy): the customer cannot
            // be served at all, so send them away without an encounter.
            println!("{e}");
            dispatch(shop, ShopCommand::ClearCustomer);
        }
    }
}

/// Validate and submit the player's counter, then run the oracle round if
/// the negotiation survived the patience cost.
async fn send_offer(shop: &mut Shop, oracle: &OracleService, price: &str, text: String) {
    let Ok(price) = price.parse::<u32>() else {
        println!("Please enter a valid price number!");
        return;
    };
    let text = if text.is_empty() {
        format!("How about {price}g?")
    } else {
        text
    };

    match shop.apply(ShopCommand::SubmitPlayerOffer {
        text: text.clone(),
        price,
    }) {
        Ok(events) => {
            let ended = events
                .iter()
                .any(|e| matches!(e, ShopEvent::PatienceExhausted { .. }));
            print_events(&events);
            if ended {
                return;
            }
        }
        Err(e) => {
            println!("{e}");
            return;
        }
    }

    let context = match shop.counter_context() {
        Ok(context) => context,
        Err(e) => {
            println!("{e}");
            return;
        }
    };

    match oracle.counter_decision(&context, &text).await {
        Ok(outcome) => dispatch(shop, ShopCommand::ApplyAgentDecision { outcome }),
        Err(e) => println!("{e}"),
    }
}

/// Move an inventory item to the shelf by its `stock` listing number.
fn shelve(shop: &mut Shop, index: Option<&str>) {
    let Some(Ok(index)) = index.map(str::parse::<usize>) else {
        println!("Usage: shelve <number from `stock`>");
        return;
    };
    let Some(instance_id) = shop
        .stock()
        .inventory()
        .get(index.wrapping_sub(1))
        .map(|i| i.instance_id)
    else {
        println!("No such item in the back room.");
        return;
    };
    dispatch(shop, ShopCommand::MoveItemToShelf { instance_id });
}

fn print_events(events: &[ShopEvent]) {
    for event in events {
        println!("{event}");
    }
}

fn print_status(shop: &Shop) {
    let ledger = shop.ledger();
    println!(
        "Day {} ({}) | Gold: {}g | Rep: {} | Loan: {}g / {}g (Due Day {})",
        shop.day().day(),
        shop.phase(),
        shop.gold(),
        shop.reputation().score(),
        ledger.loan_payment(),
        ledger.loan_principal(),
        ledger.next_due_day(),
    );
    if let Some(negotiation) = shop.negotiation() {
        println!(
            "Negotiating with {} | their offer {}g | mood: {}",
            negotiation.customer.name,
            negotiation.customer_offer,
            patience_mood(negotiation.patience, negotiation.initial_patience),
        );
    } else if let Some(customer) = shop.customer() {
        println!("{} is browsing.", customer.name);
    }
}

fn print_market(shop: &Shop) {
    println!("Wholesale Market (Rep: {}):", shop.reputation().score());
    for template in shop.market() {
        println!(
            "  {} - {} ({}g, sells around {}g)",
            template.id, template.name, template.wholesale_price, template.base_value
        );
    }
}

fn print_stock(shop: &Shop) {
    println!("Back room:");
    for (n, item) in shop.stock().inventory().iter().enumerate() {
        println!("  {}. {} (base {}g)", n.saturating_add(1), item.name, item.base_value);
    }
    println!(
        "Shelf ({}/{}):",
        shop.stock().shelf_occupancy(),
        shop.stock().capacity()
    );
    for item in shop.stock().shelf() {
        println!("  {} (asking {}g)", item.name, item.asking_price);
    }
}

fn print_help() {
    println!("Commands:");
    println!("  status            Show day, gold, reputation, loan");
    println!("  market            List wholesale goods for your reputation");
    println!("  stock             List back room and shelf");
    println!("  buy <id>          Buy a wholesale item (management)");
    println!("  shelve <n>        Display a back-room item (setting up)");
    println!("  upgrade           Buy one more shelf slot");
    println!("  advance           Move to the next phase of the day");
    println!("  customer          Invite the next customer (selling)");
    println!("  offer <g> [text]  Counter the customer's offer");
    println!("  accept            Sell at the customer's current offer");
    println!("  walk              Abandon the negotiation");
    println!("  leave             Send an idle customer away");
    println!("  quit              Leave the shop");
}
