//! Payment status state machine
//!
//! ```text
//! PENDING  -> APPROVED | DECLINED
//! APPROVED -> CANCELLED | REFUNDED
//! DECLINED, CANCELLED, REFUNDED (final)
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// Requested, waiting for approval
    Pending,
    Approved,
    Declined,
    /// Reversed before settlement
    Cancelled,
    /// Reversed after settlement
    Refunded,
}

impl Default for PaymentStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl PaymentStatus {
    pub const ALL: [PaymentStatus; 5] = [
        Self::Pending,
        Self::Approved,
        Self::Declined,
        Self::Cancelled,
        Self::Refunded,
    ];

    pub fn allowed_transitions(self) -> &'static [PaymentStatus] {
        use PaymentStatus::*;
        match self {
            Pending => &[Approved, Declined],
            Approved => &[Cancelled, Refunded],
            Declined | Cancelled | Refunded => &[],
        }
    }

    pub fn can_transition_to(self, target: PaymentStatus) -> bool {
        self != target && self.allowed_transitions().contains(&target)
    }

    /// No further change will ever happen.
    pub fn is_final(self) -> bool {
        matches!(self, Self::Declined | Self::Cancelled | Self::Refunded)
    }

    /// Cancel or refund is possible.
    pub fn can_cancel(self) -> bool {
        self == Self::Approved
    }

    pub fn is_pending(self) -> bool {
        self == Self::Pending
    }

    pub fn is_approved(self) -> bool {
        self == Self::Approved
    }

    pub fn is_declined(self) -> bool {
        self == Self::Declined
    }

    pub fn is_cancelled_or_refunded(self) -> bool {
        matches!(self, Self::Cancelled | Self::Refunded)
    }

    /// Approved and not reversed.
    pub fn is_successful(self) -> bool {
        self == Self::Approved
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Declined => "DECLINED",
            Self::Cancelled => "CANCELLED",
            Self::Refunded => "REFUNDED",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Unknown payment status: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::PaymentStatus::*;

    #[test]
    fn test_transition_table() {
        for from in PaymentStatus::ALL {
            for to in PaymentStatus::ALL {
                let expected = matches!(
                    (from, to),
                    (Pending, Approved) | (Pending, Declined) | (Approved, Cancelled) | (Approved, Refunded)
                );
                assert_eq!(from.can_transition_to(to), expected, "{from} -> {to}");
            }
        }
    }

    #[test]
    fn test_final_statuses_have_no_exits() {
        for status in PaymentStatus::ALL {
            assert_eq!(status.is_final(), status.allowed_transitions().is_empty());
        }
    }

    #[test]
    fn test_flags() {
        assert!(Approved.can_cancel());
        assert!(!Pending.can_cancel());
        assert!(Refunded.is_cancelled_or_refunded());
        assert!(Approved.is_successful());
        assert!(!Cancelled.is_successful());
    }

    #[test]
    fn test_parse() {
        assert_eq!("REFUNDED".parse::<PaymentStatus>().unwrap(), Refunded);
        assert!("UNKNOWN".parse::<PaymentStatus>().is_err());
    }
}
