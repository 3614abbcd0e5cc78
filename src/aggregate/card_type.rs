//! Card type policy
//!
//! Each card type carries its default limits and account-linking rules.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardType {
    /// Linked to an account, debited immediately
    Debit,
    /// Post-paid against a credit line
    Credit,
    /// Spends a pre-loaded balance
    Prepaid,
}

impl Default for CardType {
    fn default() -> Self {
        Self::Debit
    }
}

impl CardType {
    pub const ALL: [CardType; 3] = [Self::Debit, Self::Credit, Self::Prepaid];

    /// Storage code
    pub fn code(self) -> &'static str {
        match self {
            Self::Debit => "DEB",
            Self::Credit => "CRD",
            Self::Prepaid => "PRE",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Debit => "Debit card",
            Self::Credit => "Credit card",
            Self::Prepaid => "Prepaid card",
        }
    }

    pub fn default_daily_limit(self) -> Money {
        Money::from_whole(match self {
            Self::Debit => 5_000_000,
            Self::Credit => 10_000_000,
            Self::Prepaid => 1_000_000,
        })
    }

    pub fn default_monthly_limit(self) -> Money {
        Money::from_whole(match self {
            Self::Debit => 50_000_000,
            Self::Credit => 100_000_000,
            Self::Prepaid => 5_000_000,
        })
    }

    /// Cap for a single payment
    pub fn default_single_limit(self) -> Money {
        Money::from_whole(match self {
            Self::Debit => 3_000_000,
            Self::Credit => 5_000_000,
            Self::Prepaid => 500_000,
        })
    }

    pub fn requires_account(self) -> bool {
        self == Self::Debit
    }

    pub fn has_credit(self) -> bool {
        self == Self::Credit
    }

    pub fn is_debit(self) -> bool {
        self == Self::Debit
    }

    pub fn is_credit(self) -> bool {
        self == Self::Credit
    }

    pub fn is_prepaid(self) -> bool {
        self == Self::Prepaid
    }

    /// Debit and prepaid payments leave the balance at once.
    pub fn requires_immediate_debit(self) -> bool {
        matches!(self, Self::Debit | Self::Prepaid)
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for CardType {
    type Err = String;

    /// Accepts the storage code (`DEB`) or the variant name (`DEBIT`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s)
            .or_else(|| match s {
                "DEBIT" => Some(Self::Debit),
                "CREDIT" => Some(Self::Credit),
                "PREPAID" => Some(Self::Prepaid),
                _ => None,
            })
            .ok_or_else(|| format!("Unknown card type: {s}"))
    }
}
