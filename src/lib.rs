//! card_service Library
//!
//! Domain core of the card issuance and payment service.
//! Re-exports modules for integration testing and external use.

pub mod aggregate;
pub mod config;
pub mod domain;
mod error;

pub use aggregate::{
    Aggregate, Card, CardState, CardStatus, CardType, IssueCard, Payment, PaymentState,
    PaymentStatus, RequestPayment, ReversalKind,
};
pub use config::{Config, ConfigError};
pub use domain::{
    CardError, CardId, CardNumber, Clock, ErrorKind, FixedClock, Money, MoneyError, PaymentError,
    PaymentId, SystemClock, YearMonth,
};
pub use error::{AppError, AppResult};
