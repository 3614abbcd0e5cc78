//! Card Aggregate
//!
//! Card owns its status, its card-type policy and a rolling usage ledger.
//! Daily and monthly usage reset lazily: every usage-affecting call compares
//! the stored anchors with the clock's current date and month.

use chrono::NaiveDate;
use rand::rngs::OsRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::{CardError, CardId, CardNumber, Clock, Money, YearMonth};

use super::{Aggregate, CardStatus, CardType};

/// Years between issue and expiry
const VALIDITY_YEARS: i32 = 5;

/// Input for issuing a new card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueCard {
    pub user_id: String,
    pub account_id: Option<String>,
    pub card_type: CardType,
    /// Card-type default when absent
    pub daily_limit: Option<Money>,
    /// Card-type default when absent
    pub monthly_limit: Option<Money>,
}

impl IssueCard {
    pub fn new(user_id: impl Into<String>, card_type: CardType) -> Self {
        Self {
            user_id: user_id.into(),
            account_id: None,
            card_type,
            daily_limit: None,
            monthly_limit: None,
        }
    }
}

/// Persisted field values of a card, as handed over by the persistence adapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardState {
    pub card_id: Option<CardId>,
    pub card_number: CardNumber,
    pub user_id: String,
    pub account_id: Option<String>,
    pub card_type: CardType,
    pub status: CardStatus,
    pub expiry_date: YearMonth,
    pub cvc: String,
    pub daily_limit: Money,
    pub monthly_limit: Money,
    pub daily_used: Money,
    pub monthly_used: Money,
    pub last_used_date: Option<NaiveDate>,
    pub last_used_month: Option<YearMonth>,
    pub version: Option<i64>,
}

/// Card Aggregate
#[derive(Debug, Clone)]
pub struct Card {
    card_id: Option<CardId>,
    card_number: CardNumber,
    user_id: String,
    account_id: Option<String>,
    card_type: CardType,
    status: CardStatus,
    expiry_date: YearMonth,
    cvc: String,

    daily_limit: Money,
    monthly_limit: Money,
    daily_used: Money,
    monthly_used: Money,
    last_used_date: Option<NaiveDate>,
    last_used_month: Option<YearMonth>,

    /// Optimistic locking token, managed by persistence
    version: Option<i64>,
}

impl Card {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Issue a new card: fresh number and CVC, ACTIVE, expiring in five years.
    ///
    /// # Errors
    /// - `CardError::AccountRequired` if the card type needs a linked account and none is given
    /// - `CardError::InvalidLimit` if a supplied limit is zero
    pub fn issue(command: IssueCard, clock: &impl Clock) -> Result<Self, CardError> {
        if command.card_type.requires_account() && command.account_id.is_none() {
            return Err(CardError::AccountRequired {
                card_type: command.card_type,
            });
        }

        for limit in [command.daily_limit, command.monthly_limit].into_iter().flatten() {
            if !limit.is_positive() {
                return Err(CardError::InvalidLimit(limit.amount()));
            }
        }

        let today = clock.today();
        let this_month = YearMonth::from_date(today);
        let card_type = command.card_type;

        let card = Self {
            card_id: None,
            card_number: CardNumber::generate(),
            user_id: command.user_id,
            account_id: command.account_id,
            card_type,
            status: CardStatus::Active,
            expiry_date: this_month.plus_years(VALIDITY_YEARS),
            cvc: generate_cvc(),
            daily_limit: command
                .daily_limit
                .unwrap_or_else(|| card_type.default_daily_limit()),
            monthly_limit: command
                .monthly_limit
                .unwrap_or_else(|| card_type.default_monthly_limit()),
            daily_used: Money::ZERO,
            monthly_used: Money::ZERO,
            last_used_date: Some(today),
            last_used_month: Some(this_month),
            version: None,
        };

        tracing::info!(
            card_number = %card.card_number,
            card_type = %card.card_type,
            expiry = %card.expiry_date,
            "Card issued"
        );

        Ok(card)
    }

    /// Rebuild a card from persisted values. Nothing is re-derived or re-validated.
    pub fn restore(state: CardState) -> Self {
        Self {
            card_id: state.card_id,
            card_number: state.card_number,
            user_id: state.user_id,
            account_id: state.account_id,
            card_type: state.card_type,
            status: state.status,
            expiry_date: state.expiry_date,
            cvc: state.cvc,
            daily_limit: state.daily_limit,
            monthly_limit: state.monthly_limit,
            daily_used: state.daily_used,
            monthly_used: state.monthly_used,
            last_used_date: state.last_used_date,
            last_used_month: state.last_used_month,
            version: state.version,
        }
    }

    /// Current field values for the persistence adapter
    pub fn to_state(&self) -> CardState {
        CardState {
            card_id: self.card_id.clone(),
            card_number: self.card_number.clone(),
            user_id: self.user_id.clone(),
            account_id: self.account_id.clone(),
            card_type: self.card_type,
            status: self.status,
            expiry_date: self.expiry_date,
            cvc: self.cvc.clone(),
            daily_limit: self.daily_limit,
            monthly_limit: self.monthly_limit,
            daily_used: self.daily_used,
            monthly_used: self.monthly_used,
            last_used_date: self.last_used_date,
            last_used_month: self.last_used_month,
            version: self.version,
        }
    }

    // =========================================================================
    // Limits
    // =========================================================================

    /// Check that a payment of `amount` may go through.
    ///
    /// Applies the lazy usage reset but records nothing.
    pub fn validate_payment(&mut self, amount: &Money, clock: &impl Clock) -> Result<(), CardError> {
        self.ensure_can_pay(clock)?;
        self.reset_usage_if_needed(clock);

        if !self.daily_used.is_within_limit(amount, &self.daily_limit) {
            return Err(CardError::DailyLimitExceeded {
                used: self.daily_used.amount(),
                limit: self.daily_limit.amount(),
                requested: amount.amount(),
            });
        }

        if !self.monthly_used.is_within_limit(amount, &self.monthly_limit) {
            return Err(CardError::MonthlyLimitExceeded {
                used: self.monthly_used.amount(),
                limit: self.monthly_limit.amount(),
                requested: amount.amount(),
            });
        }

        Ok(())
    }

    /// Per-payment cap of the card type.
    pub fn check_single_payment_limit(&self, amount: &Money) -> Result<(), CardError> {
        let limit = self.card_type.default_single_limit();
        if amount.is_greater_than(&limit) {
            return Err(CardError::SinglePaymentLimitExceeded {
                requested: amount.amount(),
                limit: limit.amount(),
            });
        }
        Ok(())
    }

    /// Add an approved payment to the daily and monthly usage.
    ///
    /// Call only after `validate_payment` succeeded for the same amount.
    pub fn record_payment(&mut self, amount: &Money, clock: &impl Clock) -> Result<(), CardError> {
        let today = self.reset_usage_if_needed(clock);

        let daily_used = self.daily_used.add(amount)?;
        let monthly_used = self.monthly_used.add(amount)?;

        self.daily_used = daily_used;
        self.monthly_used = monthly_used;
        self.last_used_date = Some(today);
        self.last_used_month = Some(YearMonth::from_date(today));

        tracing::debug!(
            card_id = %self.display_id(),
            amount = %amount,
            daily_used = %self.daily_used,
            monthly_used = %self.monthly_used,
            "Payment recorded"
        );

        Ok(())
    }

    /// Take a cancelled amount back out of the usage.
    ///
    /// Each counter is floored at zero on its own.
    pub fn record_cancellation(&mut self, amount: &Money) {
        let (daily_used, daily_clamped) = subtract_floored(&self.daily_used, amount);
        let (monthly_used, monthly_clamped) = subtract_floored(&self.monthly_used, amount);

        if daily_clamped || monthly_clamped {
            tracing::warn!(
                card_id = %self.display_id(),
                amount = %amount,
                daily_used = %self.daily_used,
                monthly_used = %self.monthly_used,
                "Cancellation exceeds recorded usage, clamping to zero"
            );
        }

        self.daily_used = daily_used;
        self.monthly_used = monthly_used;
    }

    /// Zero the usage counters whose anchor is stale. Returns the business date used.
    fn reset_usage_if_needed(&mut self, clock: &impl Clock) -> NaiveDate {
        let today = clock.today();
        let this_month = YearMonth::from_date(today);

        if self.last_used_date != Some(today) {
            self.daily_used = Money::ZERO;
            self.last_used_date = Some(today);
        }

        if self.last_used_month != Some(this_month) {
            self.monthly_used = Money::ZERO;
            self.last_used_month = Some(this_month);
        }

        today
    }

    /// Replace limits. `None` or zero keeps the current value.
    pub fn change_limits(&mut self, daily_limit: Option<Money>, monthly_limit: Option<Money>) {
        if let Some(limit) = daily_limit.filter(Money::is_positive) {
            self.daily_limit = limit;
        }
        if let Some(limit) = monthly_limit.filter(Money::is_positive) {
            self.monthly_limit = limit;
        }

        tracing::debug!(
            card_id = %self.display_id(),
            daily_limit = %self.daily_limit,
            monthly_limit = %self.monthly_limit,
            "Card limits changed"
        );
    }

    // =========================================================================
    // Status changes
    // =========================================================================

    pub fn activate(&mut self, clock: &impl Clock) -> Result<(), CardError> {
        if self.status.is_active() {
            return Err(CardError::CardAlreadyActive {
                card_id: self.display_id(),
            });
        }
        self.ensure_transition(CardStatus::Active)?;
        if self.is_expired(clock) {
            return Err(CardError::CardExpired {
                card_id: self.display_id(),
            });
        }
        self.set_status(CardStatus::Active);
        Ok(())
    }

    pub fn deactivate(&mut self) -> Result<(), CardError> {
        self.ensure_transition(CardStatus::Inactive)?;
        self.set_status(CardStatus::Inactive);
        Ok(())
    }

    /// Lost or stolen report
    pub fn block(&mut self) -> Result<(), CardError> {
        self.ensure_transition(CardStatus::Blocked)?;
        self.set_status(CardStatus::Blocked);
        Ok(())
    }

    pub fn unblock(&mut self) -> Result<(), CardError> {
        if !self.status.is_blocked() {
            return Err(CardError::InvalidStatusTransition {
                from: self.status,
                to: CardStatus::Active,
            });
        }
        self.set_status(CardStatus::Active);
        Ok(())
    }

    pub fn terminate(&mut self) -> Result<(), CardError> {
        self.ensure_transition(CardStatus::Terminated)?;
        self.set_status(CardStatus::Terminated);
        Ok(())
    }

    /// Mark the card expired. Callers invoke this only once the expiry month has passed.
    pub fn expire(&mut self) {
        self.set_status(CardStatus::Expired);
    }

    fn set_status(&mut self, to: CardStatus) {
        tracing::info!(
            card_id = %self.display_id(),
            from = %self.status,
            to = %to,
            "Card status changed"
        );
        self.status = to;
    }

    fn ensure_transition(&self, to: CardStatus) -> Result<(), CardError> {
        if !self.status.can_transition_to(to) {
            return Err(CardError::InvalidStatusTransition {
                from: self.status,
                to,
            });
        }
        Ok(())
    }

    fn ensure_can_pay(&self, clock: &impl Clock) -> Result<(), CardError> {
        if self.can_pay(clock) {
            return Ok(());
        }

        let card_id = self.display_id();
        if self.is_expired(clock) {
            return Err(CardError::CardExpired { card_id });
        }
        match self.status {
            CardStatus::Blocked => Err(CardError::CardBlocked { card_id }),
            CardStatus::Terminated => Err(CardError::CardTerminated { card_id }),
            status => Err(CardError::CardNotActive { card_id, status }),
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Past the expiry month
    pub fn is_expired(&self, clock: &impl Clock) -> bool {
        clock.current_month().is_after(&self.expiry_date)
    }

    pub fn can_pay(&self, clock: &impl Clock) -> bool {
        self.status.can_pay() && !self.is_expired(clock)
    }

    pub fn is_debit_card(&self) -> bool {
        self.card_type.is_debit()
    }

    pub fn is_credit_card(&self) -> bool {
        self.card_type.is_credit()
    }

    // =========================================================================
    // Getters
    // =========================================================================

    pub fn card_number(&self) -> &CardNumber {
        &self.card_number
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn account_id(&self) -> Option<&str> {
        self.account_id.as_deref()
    }

    pub fn card_type(&self) -> CardType {
        self.card_type
    }

    pub fn status(&self) -> CardStatus {
        self.status
    }

    pub fn expiry_date(&self) -> YearMonth {
        self.expiry_date
    }

    pub fn cvc(&self) -> &str {
        &self.cvc
    }

    pub fn daily_limit(&self) -> Money {
        self.daily_limit
    }

    pub fn monthly_limit(&self) -> Money {
        self.monthly_limit
    }

    pub fn daily_used(&self) -> Money {
        self.daily_used
    }

    pub fn monthly_used(&self) -> Money {
        self.monthly_used
    }

    pub fn last_used_date(&self) -> Option<NaiveDate> {
        self.last_used_date
    }

    pub fn last_used_month(&self) -> Option<YearMonth> {
        self.last_used_month
    }

    pub fn version(&self) -> Option<i64> {
        self.version
    }
}

impl Aggregate for Card {
    type Id = CardId;

    fn aggregate_type() -> &'static str {
        "Card"
    }

    fn id(&self) -> Option<&CardId> {
        self.card_id.as_ref()
    }
}

fn generate_cvc() -> String {
    format!("{:03}", OsRng.gen_range(0..1000))
}

/// `used - amount`, or zero when that would go negative. The flag reports clamping.
fn subtract_floored(used: &Money, amount: &Money) -> (Money, bool) {
    match used.subtract(amount) {
        Ok(rest) => (rest, false),
        Err(_) => (Money::ZERO, true),
    }
}
