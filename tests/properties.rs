//! Property tests for card numbers, money, status tables and usage accounting

use card_service::domain::card_number::{luhn_check_digit, luhn_is_valid};
use card_service::{CardNumber, CardStatus, CardType, Money, PaymentStatus};
use chrono::Duration;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

mod common;
use common::{card_with_limits, issue_card, kst_clock, won};

fn arb_card_status() -> impl Strategy<Value = CardStatus> {
    prop::sample::select(CardStatus::ALL.to_vec())
}

fn arb_payment_status() -> impl Strategy<Value = PaymentStatus> {
    prop::sample::select(PaymentStatus::ALL.to_vec())
}

fn card_table(from: CardStatus, to: CardStatus) -> bool {
    use card_service::CardStatus::*;
    matches!(
        (from, to),
        (Active, Inactive | Blocked | Expired | Terminated)
            | (Inactive, Active | Blocked | Terminated)
            | (Blocked, Active | Inactive | Terminated)
            | (Expired, Terminated)
    )
}

fn payment_table(from: PaymentStatus, to: PaymentStatus) -> bool {
    use card_service::PaymentStatus::*;
    matches!(
        (from, to),
        (Pending, Approved | Declined) | (Approved, Cancelled | Refunded)
    )
}

proptest! {
    #[test]
    fn prop_check_digit_makes_number_valid(base in "[0-9]{15}") {
        let full = format!("{}{}", base, luhn_check_digit(&base));
        prop_assert!(luhn_is_valid(&full));
        prop_assert!(CardNumber::parse(&full).is_ok());
    }

    #[test]
    fn prop_single_digit_substitution_is_caught(
        base in "[0-9]{15}",
        position in 0usize..16,
        delta in 1u8..10,
    ) {
        let valid = format!("{}{}", base, luhn_check_digit(&base));
        let mut bytes = valid.into_bytes();
        bytes[position] = b'0' + (bytes[position] - b'0' + delta) % 10;
        let mutated = String::from_utf8(bytes).unwrap();

        prop_assert!(!luhn_is_valid(&mutated));
        prop_assert!(CardNumber::parse(&mutated).is_err());
    }

    #[test]
    fn prop_generated_numbers_are_valid(seed in any::<u64>()) {
        let number = CardNumber::generate_with(&mut StdRng::seed_from_u64(seed));
        prop_assert!(luhn_is_valid(number.value()));
        prop_assert!(number.value().starts_with("9410"));
        prop_assert_eq!(CardNumber::parse(&number.formatted()).unwrap(), number);
    }

    #[test]
    fn prop_add_then_subtract_is_identity(x in 0i64..=i64::MAX / 2, y in 0i64..=i64::MAX / 2) {
        let x = Money::of(x).unwrap();
        let y = Money::of(y).unwrap();
        prop_assert_eq!(x.add(&y).unwrap().subtract(&y).unwrap(), x);
    }

    #[test]
    fn prop_subtract_beyond_value_fails(x in 0i64..1_000_000_000, extra in 1i64..1_000_000_000) {
        let held = Money::of(x).unwrap();
        let requested = Money::of(x + extra).unwrap();
        prop_assert!(held.subtract(&requested).is_err());
    }

    #[test]
    fn prop_card_transitions_match_table(from in arb_card_status(), to in arb_card_status()) {
        prop_assert_eq!(from.can_transition_to(to), card_table(from, to));
    }

    #[test]
    fn prop_payment_transitions_match_table(from in arb_payment_status(), to in arb_payment_status()) {
        prop_assert_eq!(from.can_transition_to(to), payment_table(from, to));
    }

    #[test]
    fn prop_usage_accumulates_and_clamps(
        a in 1i64..1_000_000,
        b in 1i64..1_000_000,
        extra in 1i64..1_000_000,
    ) {
        let clock = kst_clock(2026, 10, 17, 3);
        let mut card = issue_card(CardType::Credit, &clock);
        prop_assert_eq!(card.daily_used(), Money::ZERO);
        prop_assert_eq!(card.monthly_used(), Money::ZERO);

        card.record_payment(&won(a), &clock).unwrap();
        card.record_payment(&won(b), &clock).unwrap();
        prop_assert_eq!(card.daily_used(), won(a + b));
        prop_assert_eq!(card.monthly_used(), won(a + b));

        card.record_cancellation(&won(a + b + extra));
        prop_assert_eq!(card.daily_used(), Money::ZERO);
        prop_assert_eq!(card.monthly_used(), Money::ZERO);
    }

    #[test]
    fn prop_rollover_resets_daily_only(used in 1i64..1_000_000, hours in 1i64..24) {
        // 2026-10-10 12:00 in UTC+9; the month does not change within a day
        let clock = kst_clock(2026, 10, 10, 3);
        let mut card = card_with_limits(1_000_000, 10_000_000, &clock);
        card.record_payment(&won(used), &clock).unwrap();

        let tomorrow = clock.advance(Duration::hours(12 + hours));
        card.validate_payment(&won(1), &tomorrow).unwrap();

        prop_assert_eq!(card.daily_used(), Money::ZERO);
        prop_assert_eq!(card.monthly_used(), won(used));
    }
}
