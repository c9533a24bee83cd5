//! # Shipping Calculator
//!
//! Derives the delivery fee from the fulfillment mode and the store policy.
//!
//! ## Decision Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Pickup? ──yes──► 0                       (always wins)                 │
//! │     │                                                                   │
//! │     no                                                                  │
//! │     ▼                                                                   │
//! │  Policy? ──none──► 0 + PolicyMissing      (fail safe, never block)      │
//! │     │                                                                   │
//! │     ├── Free ─────────────────────────► 0                               │
//! │     ├── FreeOverAmount ─ subtotal ≥ threshold ─► 0                      │
//! │     │                  └ otherwise ────────────► flat_cost              │
//! │     └── Flat ─────────────────────────► flat_cost                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::warn;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::Fulfillment;
use crate::validation::validate_amount_cents;

// =============================================================================
// Policy
// =============================================================================

/// Store shipping policy.
///
/// The threshold only exists on the variant that needs it, so a
/// "free over amount" policy without a threshold cannot be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ShippingPolicy {
    /// Delivery is always free.
    Free,
    /// Free once the subtotal reaches `threshold`, otherwise `flat_cost`.
    FreeOverAmount { flat_cost: Money, threshold: Money },
    /// Always `flat_cost`.
    Flat { flat_cost: Money },
}

/// Shipping mode as written in settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShippingMode {
    Free,
    FreeOverAmount,
    #[default]
    Flat,
}

impl FromStr for ShippingMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "free" => Ok(ShippingMode::Free),
            "free_over_amount" | "free-over-amount" => Ok(ShippingMode::FreeOverAmount),
            "flat" => Ok(ShippingMode::Flat),
            _ => Err(ValidationError::NotAllowed {
                field: "shipping mode".to_string(),
                allowed: vec![
                    "free".to_string(),
                    "free_over_amount".to_string(),
                    "flat".to_string(),
                ],
            }),
        }
    }
}

impl std::fmt::Display for ShippingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShippingMode::Free => write!(f, "free"),
            ShippingMode::FreeOverAmount => write!(f, "free_over_amount"),
            ShippingMode::Flat => write!(f, "flat"),
        }
    }
}

/// Flat shipping settings record, as stored by the admin settings page.
///
/// ```toml
/// [shipping]
/// mode = "free_over_amount"
/// flat_cost_cents = 1000
/// free_threshold_cents = 50000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShippingSettings {
    #[serde(default)]
    pub mode: ShippingMode,

    #[serde(default)]
    pub flat_cost_cents: i64,

    #[serde(default)]
    pub free_threshold_cents: Option<i64>,
}

impl TryFrom<&ShippingSettings> for ShippingPolicy {
    type Error = ValidationError;

    fn try_from(settings: &ShippingSettings) -> Result<Self, Self::Error> {
        let flat_cost = non_negative("flat_cost_cents", settings.flat_cost_cents)?;

        match settings.mode {
            ShippingMode::Free => Ok(ShippingPolicy::Free),
            ShippingMode::Flat => Ok(ShippingPolicy::Flat { flat_cost }),
            ShippingMode::FreeOverAmount => {
                let threshold =
                    settings
                        .free_threshold_cents
                        .ok_or_else(|| ValidationError::Required {
                            field: "free_threshold_cents".to_string(),
                        })?;
                Ok(ShippingPolicy::FreeOverAmount {
                    flat_cost,
                    threshold: non_negative("free_threshold_cents", threshold)?,
                })
            }
        }
    }
}

fn non_negative(field: &str, cents: i64) -> Result<Money, ValidationError> {
    validate_amount_cents(field, cents)?;
    Ok(Money::from_cents(cents))
}

// =============================================================================
// Calculation
// =============================================================================

/// Why the fee came out the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ShippingBasis {
    Pickup,
    Free,
    OverThreshold,
    BelowThreshold,
    Flat,
    PolicyMissing,
}

/// A computed shipping fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ShippingQuote {
    pub fee: Money,
    pub basis: ShippingBasis,
}

impl ShippingQuote {
    /// True when no policy was available and the fee fell back to zero.
    pub fn policy_missing(&self) -> bool {
        self.basis == ShippingBasis::PolicyMissing
    }
}

/// Computes the shipping fee for an order.
///
/// ```rust
/// use checkout_core::money::Money;
/// use checkout_core::shipping::{shipping_fee, ShippingPolicy};
/// use checkout_core::Fulfillment;
///
/// let policy = ShippingPolicy::Flat { flat_cost: Money::from_cents(1000) };
/// let quote = shipping_fee(Money::from_cents(5000), Fulfillment::Pickup, Some(&policy));
/// assert!(quote.fee.is_zero());
/// ```
pub fn shipping_fee(
    subtotal: Money,
    fulfillment: Fulfillment,
    policy: Option<&ShippingPolicy>,
) -> ShippingQuote {
    if fulfillment == Fulfillment::Pickup {
        return ShippingQuote {
            fee: Money::zero(),
            basis: ShippingBasis::Pickup,
        };
    }

    let Some(policy) = policy else {
        warn!("No shipping policy configured, charging no shipping");
        return ShippingQuote {
            fee: Money::zero(),
            basis: ShippingBasis::PolicyMissing,
        };
    };

    match *policy {
        ShippingPolicy::Free => ShippingQuote {
            fee: Money::zero(),
            basis: ShippingBasis::Free,
        },
        ShippingPolicy::FreeOverAmount {
            flat_cost,
            threshold,
        } => {
            if subtotal >= threshold {
                ShippingQuote {
                    fee: Money::zero(),
                    basis: ShippingBasis::OverThreshold,
                }
            } else {
                ShippingQuote {
                    fee: flat_cost.non_negative(),
                    basis: ShippingBasis::BelowThreshold,
                }
            }
        }
        ShippingPolicy::Flat { flat_cost } => ShippingQuote {
            fee: flat_cost.non_negative(),
            basis: ShippingBasis::Flat,
        },
    }
}

/// How much more the customer must spend to get free delivery.
///
/// `None` unless the order is a delivery under a `FreeOverAmount` policy
/// and still below the threshold.
pub fn amount_until_free_shipping(
    subtotal: Money,
    fulfillment: Fulfillment,
    policy: Option<&ShippingPolicy>,
) -> Option<Money> {
    match (fulfillment, policy) {
        (Fulfillment::Delivery, Some(ShippingPolicy::FreeOverAmount { threshold, .. }))
            if subtotal < *threshold =>
        {
            Some(*threshold - subtotal)
        }
        _ => None,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn over_500() -> ShippingPolicy {
        ShippingPolicy::FreeOverAmount {
            flat_cost: Money::from_cents(1000),
            threshold: Money::from_cents(50000),
        }
    }

    #[test]
    fn test_flat() {
        let policy = ShippingPolicy::Flat {
            flat_cost: Money::from_cents(1000),
        };
        let quote = shipping_fee(Money::from_cents(10000), Fulfillment::Delivery, Some(&policy));
        assert_eq!(quote.fee.cents(), 1000);
        assert_eq!(quote.basis, ShippingBasis::Flat);
    }

    #[test]
    fn test_free_over_amount_at_threshold() {
        let policy = over_500();
        let at = shipping_fee(Money::from_cents(50000), Fulfillment::Delivery, Some(&policy));
        assert!(at.fee.is_zero());
        assert_eq!(at.basis, ShippingBasis::OverThreshold);

        let below = shipping_fee(Money::from_cents(49999), Fulfillment::Delivery, Some(&policy));
        assert_eq!(below.fee.cents(), 1000);
        assert_eq!(below.basis, ShippingBasis::BelowThreshold);
    }

    #[test]
    fn test_pickup_overrides_policy() {
        let policy = ShippingPolicy::Flat {
            flat_cost: Money::from_cents(1000),
        };
        let quote = shipping_fee(Money::from_cents(100), Fulfillment::Pickup, Some(&policy));
        assert!(quote.fee.is_zero());
        assert_eq!(quote.basis, ShippingBasis::Pickup);

        // Pickup wins even with no policy at all
        let quote = shipping_fee(Money::from_cents(100), Fulfillment::Pickup, None);
        assert!(!quote.policy_missing());
    }

    #[test]
    fn test_missing_policy_is_free() {
        let quote = shipping_fee(Money::from_cents(100), Fulfillment::Delivery, None);
        assert!(quote.fee.is_zero());
        assert!(quote.policy_missing());
    }

    #[test]
    fn test_amount_until_free_shipping() {
        let policy = over_500();
        assert_eq!(
            amount_until_free_shipping(Money::from_cents(45000), Fulfillment::Delivery, Some(&policy)),
            Some(Money::from_cents(5000))
        );
        assert_eq!(
            amount_until_free_shipping(Money::from_cents(60000), Fulfillment::Delivery, Some(&policy)),
            None
        );
        assert_eq!(
            amount_until_free_shipping(Money::from_cents(100), Fulfillment::Pickup, Some(&policy)),
            None
        );
    }

    #[test]
    fn test_settings_conversion() {
        let settings = ShippingSettings {
            mode: ShippingMode::FreeOverAmount,
            flat_cost_cents: 1000,
            free_threshold_cents: Some(50000),
        };
        assert_eq!(ShippingPolicy::try_from(&settings).unwrap(), over_500());

        let missing_threshold = ShippingSettings {
            free_threshold_cents: None,
            ..settings.clone()
        };
        assert!(matches!(
            ShippingPolicy::try_from(&missing_threshold),
            Err(ValidationError::Required { .. })
        ));

        let negative = ShippingSettings {
            mode: ShippingMode::Flat,
            flat_cost_cents: -1,
            free_threshold_cents: None,
        };
        assert!(ShippingPolicy::try_from(&negative).is_err());
    }

    #[test]
    fn test_settings_reject_negative_amounts_by_field() {
        let negative_cost = ShippingSettings {
            mode: ShippingMode::Free,
            flat_cost_cents: -1,
            free_threshold_cents: None,
        };
        assert!(matches!(
            ShippingPolicy::try_from(&negative_cost),
            Err(ValidationError::OutOfRange { field, min: 0, .. }) if field == "flat_cost_cents"
        ));

        let negative_threshold = ShippingSettings {
            mode: ShippingMode::FreeOverAmount,
            flat_cost_cents: 1000,
            free_threshold_cents: Some(-50000),
        };
        assert!(matches!(
            ShippingPolicy::try_from(&negative_threshold),
            Err(ValidationError::OutOfRange { field, .. }) if field == "free_threshold_cents"
        ));
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("free".parse::<ShippingMode>().unwrap(), ShippingMode::Free);
        assert_eq!(
            "FREE_OVER_AMOUNT".parse::<ShippingMode>().unwrap(),
            ShippingMode::FreeOverAmount
        );
        assert_eq!(" flat ".parse::<ShippingMode>().unwrap(), ShippingMode::Flat);
        assert!("express".parse::<ShippingMode>().is_err());
    }

    #[test]
    fn test_policy_serde_shape() {
        let json = serde_json::to_value(over_500()).unwrap();
        assert_eq!(json["mode"], "free_over_amount");
        assert_eq!(json["threshold"], 50000);
    }

    proptest! {
        #[test]
        fn prop_free_policy_never_charges(subtotal in 0i64..=10_000_000) {
            let quote = shipping_fee(Money::from_cents(subtotal), Fulfillment::Delivery, Some(&ShippingPolicy::Free));
            prop_assert!(quote.fee.is_zero());
        }

        #[test]
        fn prop_threshold_rule(subtotal in 0i64..=10_000_000, threshold in 0i64..=10_000_000, flat in 0i64..=10_000) {
            let policy = ShippingPolicy::FreeOverAmount {
                flat_cost: Money::from_cents(flat),
                threshold: Money::from_cents(threshold),
            };
            let quote = shipping_fee(Money::from_cents(subtotal), Fulfillment::Delivery, Some(&policy));
            if subtotal >= threshold {
                prop_assert!(quote.fee.is_zero());
            } else {
                prop_assert_eq!(quote.fee.cents(), flat);
            }
        }
    }
}
