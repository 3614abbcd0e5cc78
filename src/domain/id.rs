//! Domain identifiers
//!
//! Aggregate ids are prefixed opaque strings: `CRD-1a2b3c4d`, `PAY-9f8e7d6c`.
//! The token after the prefix is exactly 8 ASCII hex digits.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::error::{CardError, PaymentError};

/// Length of the token that follows `<PREFIX>-`
const TOKEN_LEN: usize = 8;

/// Generate a new id of the form `<prefix>-xxxxxxxx`.
pub fn generate_domain_id(prefix: &str) -> String {
    let token = Uuid::new_v4().simple().to_string();
    format!("{prefix}-{}", &token[..TOKEN_LEN])
}

/// Check `value` against `<prefix>-<8 hex digits>`.
pub fn is_valid_domain_id(value: &str, prefix: &str) -> bool {
    value
        .strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('-'))
        .map(|token| token.len() == TOKEN_LEN && token.bytes().all(|b| b.is_ascii_hexdigit()))
        .unwrap_or(false)
}

macro_rules! domain_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal, $err:ty, $variant:path) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            pub const PREFIX: &'static str = $prefix;

            pub fn new(value: impl Into<String>) -> Result<Self, $err> {
                let value = value.into();
                if !is_valid_domain_id(&value, Self::PREFIX) {
                    return Err($variant(value));
                }
                Ok(Self(value))
            }

            /// Generate a fresh, valid id.
            pub fn generate() -> Self {
                Self(generate_domain_id(Self::PREFIX))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = $err;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = $err;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

domain_id!(
    /// Card identifier, `CRD-xxxxxxxx`.
    CardId,
    "CRD",
    CardError,
    CardError::InvalidCardIdFormat
);

domain_id!(
    /// Payment identifier, `PAY-xxxxxxxx`.
    PaymentId,
    "PAY",
    PaymentError,
    PaymentError::InvalidPaymentIdFormat
);
