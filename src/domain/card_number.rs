//! Card number
//!
//! 16-digit card numbers protected by the Luhn checksum.
//!
//! ```text
//! 9410 XXXX XXXX XXXC
//! ^^^^ issuer BIN
//!      ^^^^^^^^^^^^^ random digits
//!                  ^ Luhn check digit
//! ```

use rand::rngs::OsRng;
use rand::{CryptoRng, Rng};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::CardError;

/// Issuer identification prefix
pub const BIN: &str = "9410";

const LENGTH: usize = 16;

/// Random digits between the BIN and the check digit
const RANDOM_DIGITS: usize = LENGTH - BIN.len() - 1;

/// A Luhn-valid 16-digit card number.
///
/// `Display` and `Debug` show the masked form only.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CardNumber(String);

impl CardNumber {
    /// Parse a card number, ignoring hyphens.
    ///
    /// # Errors
    /// - `CardError::InvalidCardNumberFormat` unless the digits are exactly 16
    ///   and pass the Luhn check
    pub fn parse(value: &str) -> Result<Self, CardError> {
        let digits: String = value.chars().filter(|c| *c != '-').collect();

        if digits.len() != LENGTH || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CardError::InvalidCardNumberFormat(mask_raw(&digits)));
        }
        if !luhn_is_valid(&digits) {
            return Err(CardError::InvalidCardNumberFormat(mask_raw(&digits)));
        }

        Ok(Self(digits))
    }

    /// Generate a new card number from the OS random source.
    pub fn generate() -> Self {
        Self::generate_with(&mut OsRng)
    }

    /// Generate a new card number from the given random source.
    pub fn generate_with<R: Rng + CryptoRng>(rng: &mut R) -> Self {
        let mut digits = String::with_capacity(LENGTH);
        digits.push_str(BIN);
        for _ in 0..RANDOM_DIGITS {
            let digit: u32 = rng.gen_range(0..10);
            digits.push(char::from(b'0' + digit as u8));
        }

        let check = luhn_check_digit(&digits);
        digits.push(char::from(b'0' + check as u8));

        Self(digits)
    }

    /// Raw 16 digits. Do not log this.
    pub fn value(&self) -> &str {
        &self.0
    }

    /// `9410-****-****-1234`
    pub fn masked(&self) -> String {
        format!("{}-****-****-{}", &self.0[..4], &self.0[12..])
    }

    /// `9410-1234-5678-9012`
    pub fn formatted(&self) -> String {
        format!(
            "{}-{}-{}-{}",
            &self.0[..4],
            &self.0[4..8],
            &self.0[8..12],
            &self.0[12..]
        )
    }

    /// First 6 digits (BIN + 2).
    pub fn prefix(&self) -> &str {
        &self.0[..6]
    }

    pub fn last_four(&self) -> &str {
        &self.0[12..]
    }
}

/// Luhn check over a string of ASCII digits.
pub fn luhn_is_valid(digits: &str) -> bool {
    !digits.is_empty()
        && digits.bytes().all(|b| b.is_ascii_digit())
        && luhn_sum(digits, false) % 10 == 0
}

/// Check digit to append to `base` so the result is Luhn-valid.
///
/// The rightmost digit of `base` is the first one doubled, since it sits
/// next to the check digit.
pub fn luhn_check_digit(base: &str) -> u32 {
    (10 - luhn_sum(base, true) % 10) % 10
}

fn luhn_sum(digits: &str, double_first: bool) -> u32 {
    let mut sum = 0;
    let mut double = double_first;

    // non-digits are skipped
    for mut digit in digits.chars().rev().filter_map(|c| c.to_digit(10)) {
        if double {
            digit *= 2;
            if digit > 9 {
                digit -= 9;
            }
        }
        sum += digit;
        double = !double;
    }

    sum
}

fn mask_raw(digits: &str) -> String {
    if digits.len() < 8 || !digits.is_ascii() {
        return "****".to_string();
    }
    format!("{}-****-****-{}", &digits[..4], &digits[digits.len() - 4..])
}

impl fmt::Display for CardNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked())
    }
}

impl fmt::Debug for CardNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CardNumber").field(&self.masked()).finish()
    }
}

impl FromStr for CardNumber {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CardNumber {
    type Error = CardError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CardNumber> for String {
    fn from(number: CardNumber) -> Self {
        number.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    // Standard Luhn test number
    const VALID: &str = "4539578763621486";

    #[test]
    fn test_parse_valid() {
        let number = CardNumber::parse(VALID).unwrap();
        assert_eq!(number.value(), VALID);
    }

    #[test]
    fn test_parse_strips_hyphens() {
        let number = CardNumber::parse("4539-5787-6362-1486").unwrap();
        assert_eq!(number.value(), VALID);
    }

    #[test]
    fn test_parse_rejects_bad_checksum() {
        let result = CardNumber::parse("4539578763621487");
        assert!(matches!(result, Err(CardError::InvalidCardNumberFormat(_))));
    }

    #[test]
    fn test_parse_rejects_wrong_length_and_non_digits() {
        for bad in ["453957876362148", "45395787636214860", "4539a78763621486", "", "４５３９５７８７６３６２１４８６"] {
            assert!(
                matches!(CardNumber::parse(bad), Err(CardError::InvalidCardNumberFormat(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_error_does_not_leak_number() {
        let err = CardNumber::parse("4539578763621487").unwrap_err();
        let message = err.to_string();
        assert!(!message.contains("4539578763621487"));
        assert!(message.contains("4539-****-****-1487"));
    }

    #[test]
    fn test_generate_is_luhn_valid() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let number = CardNumber::generate_with(&mut rng);
            assert_eq!(number.value().len(), 16);
            assert!(number.value().starts_with(BIN));
            assert!(luhn_is_valid(number.value()));
            assert!(CardNumber::parse(number.value()).is_ok());
        }
    }

    #[test]
    fn test_generate_with_os_rng() {
        let number = CardNumber::generate();
        assert!(luhn_is_valid(number.value()));
    }

    #[test]
    fn test_check_digit() {
        assert_eq!(luhn_check_digit("453957876362148"), 6);
        assert_eq!(luhn_check_digit("7992739871"), 3);
    }

    #[test]
    fn test_formatting() {
        let number = CardNumber::parse(VALID).unwrap();
        assert_eq!(number.masked(), "4539-****-****-1486");
        assert_eq!(number.formatted(), "4539-5787-6362-1486");
        assert_eq!(number.prefix(), "453957");
        assert_eq!(number.last_four(), "1486");
        assert_eq!(number.to_string(), "4539-****-****-1486");
        assert!(!format!("{number:?}").contains(VALID));
    }
}
