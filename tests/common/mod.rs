//! Common test utilities

#![allow(dead_code)]

use card_service::{Card, CardId, CardType, FixedClock, IssueCard, Money};
use chrono::{FixedOffset, TimeZone, Utc};

/// Korean business calendar used by most scenarios
pub fn kst() -> FixedOffset {
    FixedOffset::east_opt(9 * 3600).unwrap()
}

/// Clock frozen at the given UTC instant, on the UTC calendar
pub fn utc_clock(year: i32, month: u32, day: u32, hour: u32) -> FixedClock {
    FixedClock::new(Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap())
}

/// Clock frozen at the given UTC instant, on the UTC+9 calendar
pub fn kst_clock(year: i32, month: u32, day: u32, hour: u32) -> FixedClock {
    utc_clock(year, month, day, hour).with_offset(kst())
}

pub fn won(amount: i64) -> Money {
    Money::of(amount).unwrap()
}

/// Issue a card and assign it a persisted id
pub fn issue_card(card_type: CardType, clock: &FixedClock) -> Card {
    let mut command = IssueCard::new("USR-0000test", card_type);
    if card_type.requires_account() {
        command.account_id = Some("ACC-0000test".to_string());
    }

    let card = Card::issue(command, clock).unwrap();
    let mut state = card.to_state();
    state.card_id = Some(CardId::new("CRD-0000abcd").unwrap());
    state.version = Some(1);
    Card::restore(state)
}

/// Debit card with custom limits
pub fn card_with_limits(daily: i64, monthly: i64, clock: &FixedClock) -> Card {
    let mut card = issue_card(CardType::Debit, clock);
    card.change_limits(Some(won(daily)), Some(won(monthly)));
    card
}
