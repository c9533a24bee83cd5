//! # Price Parser
//!
//! Turns whatever the cart collaborator hands us into [`Money`].
//!
//! ## Accepted Shapes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Raw value (JSON)           Parsed                                      │
//! │  ────────────────           ──────                                      │
//! │  120                        120.00   (integers are whole units)         │
//! │  12.5                       12.50                                       │
//! │  "12.50"                    12.50                                       │
//! │  "$1,234.56"                1234.56  (symbols + thousands commas)       │
//! │  "৳ 450 Tk"                 450.00                                      │
//! │  "Rs. 450", "Tk. 1,200.00"  450.00, 1200.00 (abbreviation dot skipped)  │
//! │  "0.125"                    0.13     (half-up to cents)                 │
//! │                                                                         │
//! │  "-5", "abc", "1.2.3", "1,5" PriceError → caller substitutes 0         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Amounts are parsed into a [`Decimal`] and rounded half away from zero to
//! two places. Floats go through their shortest round-trip representation,
//! so `1.005` rounds to `1.01` instead of falling victim to
//! `1.005 * 100 = 100.49999`.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::warn;
use ts_rs::TS;

use crate::error::PriceError;
use crate::money::Money;

/// A monetary value of unknown shape, as stored in a cart snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(untagged)]
pub enum PriceInput {
    /// Whole currency units.
    Integer(i64),
    /// Decimal currency units.
    Float(f64),
    /// Free-form text, possibly with symbols and separators.
    Text(String),
}

impl From<i64> for PriceInput {
    fn from(value: i64) -> Self {
        PriceInput::Integer(value)
    }
}

impl From<f64> for PriceInput {
    fn from(value: f64) -> Self {
        PriceInput::Float(value)
    }
}

impl From<&str> for PriceInput {
    fn from(value: &str) -> Self {
        PriceInput::Text(value.to_string())
    }
}

impl From<String> for PriceInput {
    fn from(value: String) -> Self {
        PriceInput::Text(value)
    }
}

/// Parses a raw price into a non-negative amount.
///
/// ```rust
/// use checkout_core::price::{parse_price, PriceInput};
///
/// let price = parse_price(&PriceInput::from("$1,234.56")).unwrap();
/// assert_eq!(price.cents(), 123456);
///
/// assert!(parse_price(&PriceInput::from(-3)).is_err());
/// ```
pub fn parse_price(input: &PriceInput) -> Result<Money, PriceError> {
    match input {
        PriceInput::Integer(units) => {
            if *units < 0 {
                return Err(PriceError::Negative(units.to_string()));
            }
            units
                .checked_mul(100)
                .map(Money::from_cents)
                .ok_or_else(|| PriceError::OutOfRange(units.to_string()))
        }
        PriceInput::Float(value) => {
            if !value.is_finite() {
                return Err(PriceError::NotNumeric(value.to_string()));
            }
            if *value < 0.0 {
                return Err(PriceError::Negative(value.to_string()));
            }
            let rendered = value.to_string();
            decimal_to_cents(&rendered, &rendered).map(Money::from_cents)
        }
        PriceInput::Text(text) => parse_text(text),
    }
}

/// Parses a raw price, substituting zero on failure.
///
/// The failure is logged; callers that need to surface it to the user
/// should use [`parse_price`] and keep the error.
pub fn parse_price_or_zero(input: &PriceInput) -> Money {
    parse_price(input).unwrap_or_else(|e| {
        warn!(price = ?input, error = %e, "Unparseable price, substituting zero");
        Money::zero()
    })
}

fn parse_text(raw: &str) -> Result<Money, PriceError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(PriceError::Empty);
    }

    let Some(first_digit) = text.find(|c: char| c.is_ascii_digit()) else {
        return Err(PriceError::NotNumeric(raw.to_string()));
    };
    let last_digit = text
        .rfind(|c: char| c.is_ascii_digit())
        .unwrap_or(first_digit);

    // A minus sign ahead of the first digit marks a negative amount ("-$5", "$-5").
    let prefix = &text[..first_digit];
    let negative = prefix.contains('-');

    // A dot right before the digits is a decimal point (".5", "$.5") unless it
    // closes an abbreviation ("Rs. 450", "Tk.1,200").
    let start = match prefix.strip_suffix('.') {
        Some(before) if !before.ends_with(char::is_alphabetic) => first_digit - 1,
        _ => first_digit,
    };

    // Keep a trailing dot ("5.") so it is checked with the rest of the number.
    let mut end = last_digit + 1;
    if text[end..].starts_with('.') {
        end += 1;
    }

    let number = &text[start..end];
    let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));

    if fraction.contains('.') || !fraction.chars().all(|c| c.is_ascii_digit()) {
        return Err(PriceError::NotNumeric(raw.to_string()));
    }
    if !is_grouped_whole(whole) {
        return Err(PriceError::NotNumeric(raw.to_string()));
    }

    let whole_digits: String = whole.chars().filter(|c| *c != ',').collect();
    let normalized = match (whole_digits.is_empty(), fraction.is_empty()) {
        (_, true) => whole_digits,
        (true, false) => format!("0.{fraction}"),
        (false, false) => format!("{whole_digits}.{fraction}"),
    };

    let cents = decimal_to_cents(&normalized, raw)?;
    if negative && cents > 0 {
        return Err(PriceError::Negative(raw.to_string()));
    }

    Ok(Money::from_cents(cents))
}

/// Whole-unit digits, optionally split into thousands groups ("1,234,567").
///
/// The first group holds one to three digits and every later group exactly
/// three, so "1,5" and "12,34" are rejected.
fn is_grouped_whole(whole: &str) -> bool {
    if !whole.contains(',') {
        return whole.chars().all(|c| c.is_ascii_digit());
    }

    let mut groups = whole.split(',');
    let leading_ok = groups
        .next()
        .is_some_and(|g| (1..=3).contains(&g.len()) && g.chars().all(|c| c.is_ascii_digit()));

    leading_ok && groups.all(|g| g.len() == 3 && g.chars().all(|c| c.is_ascii_digit()))
}

/// Parses a plain decimal string and rounds it half away from zero to cents.
fn decimal_to_cents(normalized: &str, raw: &str) -> Result<i64, PriceError> {
    let out_of_range = || PriceError::OutOfRange(raw.to_string());

    let amount = Decimal::from_str(normalized).map_err(|_| out_of_range())?;
    amount
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|cents| cents.to_i64())
        .ok_or_else(out_of_range)
}

// =============================================================================
// Unit Tests
// =============================================================================
