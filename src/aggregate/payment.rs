//! Payment Aggregate
//!
//! A payment is requested PENDING, then approved or declined by the
//! authorization flow. Approved payments can be cancelled or refunded.
//! The payment holds only the id of its card.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{CardId, Clock, Money, PaymentError, PaymentId};

use super::{Aggregate, PaymentStatus};

/// Input for requesting a payment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestPayment {
    pub card_id: CardId,
    pub merchant_name: String,
    pub merchant_id: String,
    pub amount: Money,
    /// Carried for the caller's duplicate detection, never checked here
    pub idempotency_key: Option<String>,
}

impl RequestPayment {
    pub fn new(
        card_id: CardId,
        merchant_name: impl Into<String>,
        merchant_id: impl Into<String>,
        amount: Money,
    ) -> Self {
        Self {
            card_id,
            merchant_name: merchant_name.into(),
            merchant_id: merchant_id.into(),
            amount,
            idempotency_key: None,
        }
    }
}

/// Persisted field values of a payment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentState {
    pub payment_id: Option<PaymentId>,
    pub card_id: CardId,
    pub merchant_name: String,
    pub merchant_id: String,
    pub amount: Money,
    pub status: PaymentStatus,
    pub approval_number: Option<String>,
    pub fail_reason: Option<String>,
    pub cancel_reason: Option<String>,
    pub idempotency_key: Option<String>,
    pub requested_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

/// How an approved payment should be reversed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReversalKind {
    /// Same business day as the approval
    Cancel,
    /// Any later day
    Refund,
}

/// Payment Aggregate
#[derive(Debug, Clone)]
pub struct Payment {
    payment_id: Option<PaymentId>,
    card_id: CardId,
    merchant_name: String,
    merchant_id: String,
    amount: Money,
    status: PaymentStatus,
    approval_number: Option<String>,
    fail_reason: Option<String>,
    cancel_reason: Option<String>,
    idempotency_key: Option<String>,
    requested_at: DateTime<Utc>,
    approved_at: Option<DateTime<Utc>>,
    cancelled_at: Option<DateTime<Utc>>,
}

impl Payment {
    /// Create a PENDING payment.
    ///
    /// # Errors
    /// - `PaymentError::InvalidAmount` if the amount is zero
    pub fn request(command: RequestPayment, clock: &impl Clock) -> Result<Self, PaymentError> {
        if !command.amount.is_positive() {
            return Err(PaymentError::InvalidAmount(command.amount.amount()));
        }

        let payment = Self {
            payment_id: None,
            card_id: command.card_id,
            merchant_name: command.merchant_name,
            merchant_id: command.merchant_id,
            amount: command.amount,
            status: PaymentStatus::Pending,
            approval_number: None,
            fail_reason: None,
            cancel_reason: None,
            idempotency_key: command.idempotency_key,
            requested_at: clock.now(),
            approved_at: None,
            cancelled_at: None,
        };

        tracing::info!(
            card_id = %payment.card_id,
            merchant_id = %payment.merchant_id,
            amount = %payment.amount,
            "Payment requested"
        );

        Ok(payment)
    }

    /// Rebuild a payment from persisted values.
    pub fn restore(state: PaymentState) -> Self {
        Self {
            payment_id: state.payment_id,
            card_id: state.card_id,
            merchant_name: state.merchant_name,
            merchant_id: state.merchant_id,
            amount: state.amount,
            status: state.status,
            approval_number: state.approval_number,
            fail_reason: state.fail_reason,
            cancel_reason: state.cancel_reason,
            idempotency_key: state.idempotency_key,
            requested_at: state.requested_at,
            approved_at: state.approved_at,
            cancelled_at: state.cancelled_at,
        }
    }

    pub fn to_state(&self) -> PaymentState {
        PaymentState {
            payment_id: self.payment_id.clone(),
            card_id: self.card_id.clone(),
            merchant_name: self.merchant_name.clone(),
            merchant_id: self.merchant_id.clone(),
            amount: self.amount,
            status: self.status,
            approval_number: self.approval_number.clone(),
            fail_reason: self.fail_reason.clone(),
            cancel_reason: self.cancel_reason.clone(),
            idempotency_key: self.idempotency_key.clone(),
            requested_at: self.requested_at,
            approved_at: self.approved_at,
            cancelled_at: self.cancelled_at,
        }
    }

    // =========================================================================
    // Status changes
    // =========================================================================

    pub fn approve(
        &mut self,
        approval_number: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<(), PaymentError> {
        self.ensure_pending()?;
        self.ensure_transition(PaymentStatus::Approved)?;

        self.approval_number = Some(approval_number.into());
        self.approved_at = Some(clock.now());
        self.set_status(PaymentStatus::Approved);
        Ok(())
    }

    pub fn decline(&mut self, reason: impl Into<String>) -> Result<(), PaymentError> {
        self.ensure_pending()?;
        self.ensure_transition(PaymentStatus::Declined)?;

        self.fail_reason = Some(reason.into());
        self.set_status(PaymentStatus::Declined);
        Ok(())
    }

    /// Same-day reversal of an approved payment
    pub fn cancel(&mut self, reason: impl Into<String>, clock: &impl Clock) -> Result<(), PaymentError> {
        self.reverse(PaymentStatus::Cancelled, reason.into(), clock)
    }

    /// Later reversal of an approved payment
    pub fn refund(&mut self, reason: impl Into<String>, clock: &impl Clock) -> Result<(), PaymentError> {
        self.reverse(PaymentStatus::Refunded, reason.into(), clock)
    }

    fn reverse(
        &mut self,
        to: PaymentStatus,
        reason: String,
        clock: &impl Clock,
    ) -> Result<(), PaymentError> {
        if !self.status.can_cancel() {
            return Err(PaymentError::PaymentCannotCancel {
                payment_id: self.display_id(),
                status: self.status,
            });
        }
        self.ensure_transition(to)?;

        self.cancel_reason = Some(reason);
        self.cancelled_at = Some(clock.now());
        self.set_status(to);
        Ok(())
    }

    fn ensure_pending(&self) -> Result<(), PaymentError> {
        match self.status {
            PaymentStatus::Pending => Ok(()),
            PaymentStatus::Approved => Err(PaymentError::PaymentAlreadyApproved {
                payment_id: self.display_id(),
            }),
            status => Err(PaymentError::PaymentCannotCancel {
                payment_id: self.display_id(),
                status,
            }),
        }
    }

    fn ensure_transition(&self, to: PaymentStatus) -> Result<(), PaymentError> {
        if !self.status.can_transition_to(to) {
            return Err(PaymentError::InvalidStatusTransition {
                from: self.status,
                to,
            });
        }
        Ok(())
    }

    fn set_status(&mut self, to: PaymentStatus) {
        tracing::info!(
            payment_id = %self.display_id(),
            card_id = %self.card_id,
            from = %self.status,
            to = %to,
            "Payment status changed"
        );
        self.status = to;
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn is_pending(&self) -> bool {
        self.status.is_pending()
    }

    pub fn is_approved(&self) -> bool {
        self.status.is_approved()
    }

    pub fn is_declined(&self) -> bool {
        self.status.is_declined()
    }

    /// Declined, cancelled or refunded; nothing can change any more
    pub fn is_final(&self) -> bool {
        self.status.is_final()
    }

    pub fn can_cancel(&self) -> bool {
        self.status.can_cancel()
    }

    /// Which reversal applies right now. Advisory only: `cancel` and `refund`
    /// do not consult it.
    pub fn reversal_kind(&self, clock: &impl Clock) -> Option<ReversalKind> {
        if !self.status.is_approved() {
            return None;
        }
        let approved_at = self.approved_at?;
        if clock.date_of(approved_at) >= clock.today() {
            Some(ReversalKind::Cancel)
        } else {
            Some(ReversalKind::Refund)
        }
    }

    // =========================================================================
    // Getters
    // =========================================================================

    pub fn card_id(&self) -> &CardId {
        &self.card_id
    }

    pub fn merchant_name(&self) -> &str {
        &self.merchant_name
    }

    pub fn merchant_id(&self) -> &str {
        &self.merchant_id
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn status(&self) -> PaymentStatus {
        self.status
    }

    pub fn approval_number(&self) -> Option<&str> {
        self.approval_number.as_deref()
    }

    pub fn fail_reason(&self) -> Option<&str> {
        self.fail_reason.as_deref()
    }

    pub fn cancel_reason(&self) -> Option<&str> {
        self.cancel_reason.as_deref()
    }

    pub fn idempotency_key(&self) -> Option<&str> {
        self.idempotency_key.as_deref()
    }

    pub fn requested_at(&self) -> DateTime<Utc> {
        self.requested_at
    }

    pub fn approved_at(&self) -> Option<DateTime<Utc>> {
        self.approved_at
    }

    pub fn cancelled_at(&self) -> Option<DateTime<Utc>> {
        self.cancelled_at
    }
}

impl Aggregate for Payment {
    type Id = PaymentId;

    fn aggregate_type() -> &'static str {
        "Payment"
    }

    fn id(&self) -> Option<&PaymentId> {
        self.payment_id.as_ref()
    }
}
