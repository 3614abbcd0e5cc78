//! Aggregate module
//!
//! Aggregate roots of the card service: `Card` and `Payment`.

pub mod card;
pub mod card_status;
pub mod card_type;
pub mod payment;
pub mod payment_status;

pub use card::{Card, CardState, IssueCard};
pub use card_status::CardStatus;
pub use card_type::CardType;
pub use payment::{Payment, PaymentState, RequestPayment, ReversalKind};
pub use payment_status::PaymentStatus;

/// Placeholder used in errors and logs for an aggregate that has no id yet
pub const NEW_AGGREGATE_ID: &str = "NEW";

/// Aggregate trait that both aggregate roots implement
pub trait Aggregate {
    /// Identifier type
    type Id: std::fmt::Display;

    /// Get the aggregate type name (for logs and storage)
    fn aggregate_type() -> &'static str;

    /// Get the aggregate ID; `None` until the aggregate has been persisted
    fn id(&self) -> Option<&Self::Id>;

    /// Not yet persisted
    fn is_new(&self) -> bool {
        self.id().is_none()
    }

    /// Id rendered for errors and logs
    fn display_id(&self) -> String {
        self.id()
            .map(ToString::to_string)
            .unwrap_or_else(|| NEW_AGGREGATE_ID.to_string())
    }
}
