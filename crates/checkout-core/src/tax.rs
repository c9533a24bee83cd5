//! # Tax Calculator
//!
//! Applies the store tax rate to the taxable base.
//!
//! ## Taxable Base
//! Tax is charged on the subtotal unless the store explicitly opts into
//! taxing delivery as well. Discounts never reduce the taxable base.
//!
//! ```text
//! Subtotal: 600.00     Shipping: 0.00     Rate: 8%
//!      │
//!      ▼
//! calculate_tax(600.00, 8%) ← THIS MODULE
//!      │
//!      ▼
//! Tax: 48.00
//! ```

use serde::{Deserialize, Serialize};
use tracing::warn;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::TaxRate;
use crate::validation::validate_tax_rate_bps;

/// What the tax rate is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TaxBase {
    /// Line items only.
    #[default]
    Subtotal,
    /// Line items plus the delivery fee.
    SubtotalAndShipping,
}

/// Store tax policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxPolicy {
    pub rate: TaxRate,
    #[serde(default)]
    pub base: TaxBase,
}

impl TaxPolicy {
    pub const fn new(rate: TaxRate) -> Self {
        TaxPolicy {
            rate,
            base: TaxBase::Subtotal,
        }
    }
}

/// Tax settings record, as stored by the admin settings page.
///
/// ```toml
/// [tax]
/// rate_bps = 800
/// base = "subtotal"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaxSettings {
    #[serde(default)]
    pub rate_bps: u32,

    #[serde(default)]
    pub base: TaxBase,
}

impl TryFrom<&TaxSettings> for TaxPolicy {
    type Error = ValidationError;

    fn try_from(settings: &TaxSettings) -> Result<Self, Self::Error> {
        validate_tax_rate_bps(settings.rate_bps)?;
        Ok(TaxPolicy {
            rate: TaxRate::from_bps(settings.rate_bps),
            base: settings.base,
        })
    }
}

/// A computed tax amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxQuote {
    pub amount: Money,
    /// The base the rate was applied to.
    pub taxable: Money,
    pub rate: TaxRate,
    /// True when no policy was available and tax fell back to zero.
    pub policy_missing: bool,
}

/// Returns `base × rate / 100`, rounded half-up to cents.
///
/// ```rust
/// use checkout_core::money::Money;
/// use checkout_core::tax::calculate_tax;
/// use checkout_core::TaxRate;
///
/// let tax = calculate_tax(Money::from_cents(1000), TaxRate::from_bps(825));
/// // 10.00 × 8.25% = 0.825 → 0.83
/// assert_eq!(tax.cents(), 83);
/// ```
pub fn calculate_tax(base: Money, rate: TaxRate) -> Money {
    base.non_negative().apply_bps(rate.bps())
}

/// Computes tax for an order under the store policy.
pub fn tax_for(subtotal: Money, shipping: Money, policy: Option<&TaxPolicy>) -> TaxQuote {
    let Some(policy) = policy else {
        warn!("No tax policy configured, charging no tax");
        return TaxQuote {
            amount: Money::zero(),
            taxable: subtotal,
            rate: TaxRate::zero(),
            policy_missing: true,
        };
    };

    let taxable = match policy.base {
        TaxBase::Subtotal => subtotal,
        TaxBase::SubtotalAndShipping => subtotal + shipping,
    };

    TaxQuote {
        amount: calculate_tax(taxable, policy.rate),
        taxable,
        rate: policy.rate,
        policy_missing: false,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_calculation_basic() {
        // 100.00 at 5% = 5.00
        let tax = calculate_tax(Money::from_cents(10000), TaxRate::from_bps(500));
        assert_eq!(tax.cents(), 500);
    }

    #[test]
    fn test_tax_calculation_with_rounding() {
        // 10.00 at 8.25% = 0.825 → 0.83
        let tax = calculate_tax(Money::from_cents(1000), TaxRate::from_bps(825));
        assert_eq!(tax.cents(), 83);

        // 0.30 at 5% = 0.015 → 0.02
        let tax = calculate_tax(Money::from_cents(30), TaxRate::from_bps(500));
        assert_eq!(tax.cents(), 2);
    }

    #[test]
    fn test_negative_base_taxes_nothing() {
        let tax = calculate_tax(Money::from_cents(-1000), TaxRate::from_bps(500));
        assert!(tax.is_zero());
    }

    #[test]
    fn test_subtotal_base_ignores_shipping() {
        let policy = TaxPolicy::new(TaxRate::from_bps(800));
        let quote = tax_for(Money::from_cents(60000), Money::from_cents(1000), Some(&policy));
        assert_eq!(quote.amount.cents(), 4800);
        assert_eq!(quote.taxable.cents(), 60000);
    }

    #[test]
    fn test_subtotal_and_shipping_base() {
        let policy = TaxPolicy {
            rate: TaxRate::from_bps(1000),
            base: TaxBase::SubtotalAndShipping,
        };
        let quote = tax_for(Money::from_cents(10000), Money::from_cents(1000), Some(&policy));
        assert_eq!(quote.amount.cents(), 1100);
        assert_eq!(quote.taxable.cents(), 11000);
    }

    #[test]
    fn test_missing_policy_is_zero() {
        let quote = tax_for(Money::from_cents(10000), Money::zero(), None);
        assert!(quote.amount.is_zero());
        assert!(quote.policy_missing);
    }

    #[test]
    fn test_settings_conversion() {
        let settings = TaxSettings {
            rate_bps: 800,
            base: TaxBase::Subtotal,
        };
        let policy = TaxPolicy::try_from(&settings).unwrap();
        assert_eq!(policy.rate.bps(), 800);

        let too_high = TaxSettings {
            rate_bps: 10001,
            base: TaxBase::Subtotal,
        };
        assert!(TaxPolicy::try_from(&too_high).is_err());
    }
}
