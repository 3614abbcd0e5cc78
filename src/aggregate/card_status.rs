//! Card status state machine
//!
//! ```text
//! ACTIVE   -> INACTIVE | BLOCKED | EXPIRED | TERMINATED
//! INACTIVE -> ACTIVE | BLOCKED | TERMINATED
//! BLOCKED  -> ACTIVE | INACTIVE | TERMINATED
//! EXPIRED  -> TERMINATED
//! TERMINATED (final)
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardStatus {
    /// Normal, payable
    Active,
    /// Suspended by the holder; can be reactivated
    Inactive,
    /// Reported lost or stolen
    Blocked,
    /// Past its expiry month; needs reissue
    Expired,
    /// Closed for good
    Terminated,
}

impl Default for CardStatus {
    fn default() -> Self {
        Self::Active
    }
}

impl CardStatus {
    pub const ALL: [CardStatus; 5] = [
        Self::Active,
        Self::Inactive,
        Self::Blocked,
        Self::Expired,
        Self::Terminated,
    ];

    /// Statuses reachable from `self`.
    pub fn allowed_transitions(self) -> &'static [CardStatus] {
        use CardStatus::*;
        match self {
            Active => &[Inactive, Blocked, Expired, Terminated],
            Inactive => &[Active, Blocked, Terminated],
            Blocked => &[Active, Inactive, Terminated],
            Expired => &[Terminated],
            Terminated => &[],
        }
    }

    /// Single authority for card status changes. Self-transitions are never allowed.
    pub fn can_transition_to(self, target: CardStatus) -> bool {
        self != target && self.allowed_transitions().contains(&target)
    }

    pub fn can_pay(self) -> bool {
        self == Self::Active
    }

    pub fn can_reactivate(self) -> bool {
        matches!(self, Self::Inactive | Self::Blocked)
    }

    pub fn can_terminate(self) -> bool {
        self != Self::Terminated
    }

    pub fn is_active(self) -> bool {
        self == Self::Active
    }

    pub fn is_blocked(self) -> bool {
        self == Self::Blocked
    }

    pub fn is_expired(self) -> bool {
        self == Self::Expired
    }

    pub fn is_terminated(self) -> bool {
        self == Self::Terminated
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Inactive => "INACTIVE",
            Self::Blocked => "BLOCKED",
            Self::Expired => "EXPIRED",
            Self::Terminated => "TERMINATED",
        }
    }
}

impl fmt::Display for CardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CardStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Unknown card status: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::CardStatus::*;

    #[test]
    fn test_transition_table() {
        let expected: [(CardStatus, &[CardStatus]); 5] = [
            (Active, &[Inactive, Blocked, Expired, Terminated]),
            (Inactive, &[Active, Blocked, Terminated]),
            (Blocked, &[Active, Inactive, Terminated]),
            (Expired, &[Terminated]),
            (Terminated, &[]),
        ];

        for (from, allowed) in expected {
            for to in CardStatus::ALL {
                assert_eq!(
                    from.can_transition_to(to),
                    allowed.contains(&to),
                    "{from} -> {to}"
                );
            }
        }
    }

    #[test]
    fn test_self_transition_rejected() {
        for status in CardStatus::ALL {
            assert!(!status.can_transition_to(status));
        }
    }

    #[test]
    fn test_policy_flags() {
        assert!(Active.can_pay());
        assert!(!Inactive.can_pay());
        assert!(Blocked.can_reactivate());
        assert!(!Expired.can_reactivate());
        assert!(Expired.can_terminate());
        assert!(!Terminated.can_terminate());
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("BLOCKED".parse::<CardStatus>().unwrap(), Blocked);
        assert!("blocked".parse::<CardStatus>().is_err());
        assert_eq!(Terminated.to_string(), "TERMINATED");
        assert_eq!(serde_json::to_string(&Inactive).unwrap(), "\"INACTIVE\"");
    }
}
