//! card_service - card issuance and payment walkthrough
//!
//! Issues a card, runs payments through limit validation and the payment
//! state machine, then reverses one. Every step is logged.

use card_service::domain::AuditMetadata;
use card_service::{
    Aggregate, AppResult, Card, CardError, CardId, Clock, Config, IssueCard, Money, Payment,
    RequestPayment, ReversalKind,
};
use rand::rngs::OsRng;
use rand::Rng;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const ACTOR: &str = "walkthrough";

/// Initialize tracing/logging
fn init_tracing(json: bool) {
    let registry = tracing_subscriber::registry().with(
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "card_service=debug".into()),
    );

    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    init_tracing(config.is_production());

    let clock = config.clock();
    tracing::info!(
        environment = %config.environment,
        business_offset = %config.business_offset,
        today = %clock.today(),
        "Starting card service"
    );

    let mut card = issue_card(&config, &clock)?;
    let audit = AuditMetadata::created(Some(ACTOR.to_string()), &clock);
    tracing::debug!("Card audit: {}", serde_json::to_string(&audit)?);

    let mut coffee = pay(&mut card, "Coffee House", "MER-00000001", Money::of(45_000)?, &clock)?;
    let oversized = card.card_type().default_single_limit().add(&Money::of(1)?)?;
    pay(&mut card, "Electronics Mall", "MER-00000002", oversized, &clock)?;

    if coffee.is_approved() {
        reverse(&mut card, &mut coffee, &clock)?;
    }

    tracing::info!(
        card_number = %card.card_number(),
        status = %card.status(),
        daily_used = %card.daily_used().formatted(),
        monthly_used = %card.monthly_used().formatted(),
        "Card usage"
    );
    tracing::info!("Payment: {}", serde_json::to_string(&coffee.to_state())?);

    Ok(())
}

/// Issue a card and give it the id persistence would assign
fn issue_card(config: &Config, clock: &impl Clock) -> AppResult<Card> {
    let mut command = IssueCard::new("USR-0000demo", config.default_card_type);
    if command.card_type.requires_account() {
        command.account_id = Some("ACC-0000demo".to_string());
    }

    let card = Card::issue(command, clock)?;
    let mut state = card.to_state();
    state.card_id = Some(CardId::generate());
    state.version = Some(1);

    Ok(Card::restore(state))
}

/// Authorize a payment against the card's limits. A limit or status failure
/// declines the payment instead of failing the call.
fn pay(
    card: &mut Card,
    merchant_name: &str,
    merchant_id: &str,
    amount: Money,
    clock: &impl Clock,
) -> AppResult<Payment> {
    let card_id = card
        .id()
        .cloned()
        .ok_or_else(|| CardError::CardNotFound(card.display_id()))?;

    let mut payment = Payment::request(
        RequestPayment::new(card_id, merchant_name, merchant_id, amount),
        clock,
    )?;

    let authorization = card
        .check_single_payment_limit(&amount)
        .and_then(|_| card.validate_payment(&amount, clock));

    match authorization {
        Ok(()) => {
            card.record_payment(&amount, clock)?;
            payment.approve(approval_number(), clock)?;
        }
        Err(err) => {
            tracing::warn!(code = err.code(), error = %err, "Payment declined");
            payment.decline(err.to_string())?;
        }
    }

    Ok(payment)
}

/// Cancel on the approval day, refund afterwards; usage is given back either way
fn reverse(card: &mut Card, payment: &mut Payment, clock: &impl Clock) -> AppResult<()> {
    match payment.reversal_kind(clock) {
        Some(ReversalKind::Cancel) => payment.cancel("customer request", clock)?,
        Some(ReversalKind::Refund) => payment.refund("customer request", clock)?,
        None => return Ok(()),
    }
    card.record_cancellation(&payment.amount());
    Ok(())
}

fn approval_number() -> String {
    format!("{:08}", OsRng.gen_range(0..100_000_000u32))
}
