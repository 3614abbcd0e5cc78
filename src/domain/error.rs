//! Domain Error Types
//!
//! Pure domain errors that don't depend on infrastructure.
//! Every error carries a stable code that outer layers can surface.

use rust_decimal::Decimal;
use thiserror::Error;

use super::money::MoneyError;
use crate::aggregate::{CardStatus, CardType, PaymentStatus};

/// Coarse classification shared by card and payment errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input at construction time
    InvalidFormat,
    /// Raised by external lookups, never by the aggregates themselves
    NotFound,
    /// A requested amount would breach a configured cap
    LimitExceeded,
    /// The current status forbids the operation
    StateConflict,
    /// The target status is unreachable from the current one
    InvalidTransition,
}

/// Card aggregate errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CardError {
    #[error("Invalid card id format: {0}")]
    InvalidCardIdFormat(String),

    #[error("Invalid card number format: {0}")]
    InvalidCardNumberFormat(String),

    #[error("Invalid limit: {0}")]
    InvalidLimit(Decimal),

    #[error("Invalid expiry date: {0}")]
    InvalidExpiryDate(String),

    #[error("Linked account required for card type {card_type}")]
    AccountRequired { card_type: CardType },

    #[error("Card not found: {0}")]
    CardNotFound(String),

    #[error("Daily limit exceeded: used {used}, limit {limit}, requested {requested}")]
    DailyLimitExceeded {
        used: Decimal,
        limit: Decimal,
        requested: Decimal,
    },

    #[error("Monthly limit exceeded: used {used}, limit {limit}, requested {requested}")]
    MonthlyLimitExceeded {
        used: Decimal,
        limit: Decimal,
        requested: Decimal,
    },

    #[error("Single payment limit exceeded: requested {requested}, limit {limit}")]
    SinglePaymentLimitExceeded { requested: Decimal, limit: Decimal },

    #[error("Card is not active: card {card_id}, status {status}")]
    CardNotActive { card_id: String, status: CardStatus },

    #[error("Card is blocked: {card_id}")]
    CardBlocked { card_id: String },

    #[error("Card is expired: {card_id}")]
    CardExpired { card_id: String },

    #[error("Card is terminated: {card_id}")]
    CardTerminated { card_id: String },

    #[error("Card is already active: {card_id}")]
    CardAlreadyActive { card_id: String },

    #[error("Invalid card status transition: {from} -> {to}")]
    InvalidStatusTransition { from: CardStatus, to: CardStatus },

    #[error(transparent)]
    Money(#[from] MoneyError),
}

impl CardError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidCardIdFormat(_)
            | Self::InvalidCardNumberFormat(_)
            | Self::InvalidLimit(_)
            | Self::InvalidExpiryDate(_)
            | Self::AccountRequired { .. } => ErrorKind::InvalidFormat,
            Self::CardNotFound(_) => ErrorKind::NotFound,
            Self::DailyLimitExceeded { .. }
            | Self::MonthlyLimitExceeded { .. }
            | Self::SinglePaymentLimitExceeded { .. } => ErrorKind::LimitExceeded,
            Self::CardNotActive { .. }
            | Self::CardBlocked { .. }
            | Self::CardExpired { .. }
            | Self::CardTerminated { .. }
            | Self::CardAlreadyActive { .. } => ErrorKind::StateConflict,
            Self::InvalidStatusTransition { .. } => ErrorKind::InvalidTransition,
            Self::Money(err) => money_kind(err),
        }
    }

    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidCardIdFormat(_) => "CRD_001",
            Self::InvalidCardNumberFormat(_) => "CRD_003",
            Self::InvalidLimit(_) => "CRD_006",
            Self::InvalidExpiryDate(_) => "CRD_007",
            Self::AccountRequired { .. } => "CRD_008",
            Self::CardNotFound(_) => "CRD_010",
            Self::DailyLimitExceeded { .. } => "CRD_020",
            Self::MonthlyLimitExceeded { .. } => "CRD_021",
            Self::SinglePaymentLimitExceeded { .. } => "CRD_022",
            Self::CardNotActive { .. } => "CRD_030",
            Self::CardBlocked { .. } => "CRD_031",
            Self::CardExpired { .. } => "CRD_032",
            Self::CardTerminated { .. } => "CRD_033",
            Self::CardAlreadyActive { .. } => "CRD_034",
            Self::InvalidStatusTransition { .. } => "CRD_035",
            Self::Money(err) => money_code(err),
        }
    }

    /// Check if this is a client error (the request can never succeed as sent)
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Money(MoneyError::Overflow))
    }
}

/// Payment aggregate errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PaymentError {
    #[error("Invalid payment id format: {0}")]
    InvalidPaymentIdFormat(String),

    #[error("Invalid payment amount: {0}")]
    InvalidAmount(Decimal),

    #[error("Payment not found: {0}")]
    PaymentNotFound(String),

    #[error("Payment already approved: {payment_id}")]
    PaymentAlreadyApproved { payment_id: String },

    #[error("Payment cannot be cancelled: payment {payment_id}, status {status}")]
    PaymentCannotCancel {
        payment_id: String,
        status: PaymentStatus,
    },

    #[error("Invalid payment status transition: {from} -> {to}")]
    InvalidStatusTransition {
        from: PaymentStatus,
        to: PaymentStatus,
    },

    #[error(transparent)]
    Money(#[from] MoneyError),
}

impl PaymentError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidPaymentIdFormat(_) | Self::InvalidAmount(_) => ErrorKind::InvalidFormat,
            Self::PaymentNotFound(_) => ErrorKind::NotFound,
            Self::PaymentAlreadyApproved { .. } | Self::PaymentCannotCancel { .. } => {
                ErrorKind::StateConflict
            }
            Self::InvalidStatusTransition { .. } => ErrorKind::InvalidTransition,
            Self::Money(err) => money_kind(err),
        }
    }

    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidPaymentIdFormat(_) => "PAY_001",
            Self::InvalidAmount(_) => "PAY_002",
            Self::PaymentNotFound(_) => "PAY_010",
            Self::PaymentAlreadyApproved { .. } => "PAY_020",
            Self::PaymentCannotCancel { .. } => "PAY_022",
            Self::InvalidStatusTransition { .. } => "PAY_030",
            Self::Money(err) => money_code(err),
        }
    }

    /// Check if this is a client error (the request can never succeed as sent)
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Money(MoneyError::Overflow))
    }
}

pub(crate) fn money_kind(err: &MoneyError) -> ErrorKind {
    match err {
        MoneyError::InsufficientBalance { .. } => ErrorKind::LimitExceeded,
        MoneyError::InvalidAmount(_) | MoneyError::Overflow | MoneyError::Parse(_) => {
            ErrorKind::InvalidFormat
        }
    }
}

pub(crate) fn money_code(err: &MoneyError) -> &'static str {
    match err {
        MoneyError::InsufficientBalance { .. } => "PAY_023",
        MoneyError::InvalidAmount(_) | MoneyError::Overflow | MoneyError::Parse(_) => "PAY_002",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_daily_limit_error() {
        let err = CardError::DailyLimitExceeded {
            used: dec!(980000),
            limit: dec!(1000000),
            requested: dec!(50000),
        };

        assert_eq!(err.kind(), ErrorKind::LimitExceeded);
        assert_eq!(err.code(), "CRD_020");
        assert!(err.is_client_error());
        assert!(err.to_string().contains("980000"));
        assert!(err.to_string().contains("50000"));
    }

    #[test]
    fn test_transition_error_display() {
        let err = CardError::InvalidStatusTransition {
            from: CardStatus::Terminated,
            to: CardStatus::Active,
        };

        assert_eq!(err.kind(), ErrorKind::InvalidTransition);
        assert_eq!(err.to_string(), "Invalid card status transition: TERMINATED -> ACTIVE");
    }

    #[test]
    fn test_state_conflict_kinds() {
        let blocked = CardError::CardBlocked {
            card_id: "CRD-a1b2c3d4".to_string(),
        };
        let cannot_cancel = PaymentError::PaymentCannotCancel {
            payment_id: "PAY-a1b2c3d4".to_string(),
            status: PaymentStatus::Cancelled,
        };

        assert_eq!(blocked.kind(), ErrorKind::StateConflict);
        assert_eq!(cannot_cancel.kind(), ErrorKind::StateConflict);
        assert_eq!(cannot_cancel.code(), "PAY_022");
    }

    #[test]
    fn test_not_found_kinds() {
        assert_eq!(CardError::CardNotFound("CRD-a1b2c3d4".into()).kind(), ErrorKind::NotFound);
        assert_eq!(PaymentError::PaymentNotFound("PAY-a1b2c3d4".into()).code(), "PAY_010");
    }

    #[test]
    fn test_money_errors_pass_through() {
        let err: CardError = MoneyError::InvalidAmount(dec!(-1)).into();
        assert_eq!(err.kind(), ErrorKind::InvalidFormat);
        assert_eq!(err.to_string(), "Invalid amount: -1");

        let overflow: PaymentError = MoneyError::Overflow.into();
        assert!(!overflow.is_client_error());
    }
}
