//! Domain module
//!
//! Value objects, time source and error types shared by the aggregates.

pub mod card_number;
pub mod clock;
pub mod error;
pub mod id;
pub mod metadata;
pub mod money;
pub mod year_month;

pub use card_number::CardNumber;
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{CardError, ErrorKind, PaymentError};
pub use id::{CardId, PaymentId};
pub use metadata::AuditMetadata;
pub use money::{Money, MoneyError};
pub use year_month::{YearMonth, YearMonthError};
