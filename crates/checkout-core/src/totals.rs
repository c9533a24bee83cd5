//! # Total Composer
//!
//! Combines every partial calculation into one immutable [`OrderTotal`].
//!
//! ## Dependency Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  LineItems ──► aggregate ──► subtotal ─┬──► shipping_fee ──┐            │
//! │                                        │                    │           │
//! │                                        ├──► tax_for ◄───────┤ (only     │
//! │                                        │                    │  when tax │
//! │                                        │                    │  base has │
//! │                                        │                    │  shipping)│
//! │  DiscountState ────────────────────────┼──► discount_amount │           │
//! │                                        │                    │           │
//! │  Loyalty balance ──────────────────────┴──► project         │           │
//! │                                                             ▼           │
//! │          grand_total = max(0, subtotal + shipping + tax − discount)     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Recomputation
//! The composer holds no state. The storefront calls [`compose`] again
//! whenever the cart, code or fulfillment mode changes; identical input
//! always yields an identical `OrderTotal`.

use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::cart::{aggregate, Subtotal};
use crate::discount::{discount_amount, DiscountState};
use crate::error::DiscountRejected;
use crate::loyalty::{project, LoyaltyState};
use crate::money::Money;
use crate::shipping::{amount_until_free_shipping, shipping_fee, ShippingBasis};
use crate::tax::tax_for;
use crate::types::{Fulfillment, LineItem, StoreSettings, TaxRate};

// =============================================================================
// Issues
// =============================================================================

/// Which policy was absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    Shipping,
    Tax,
}

/// A problem the composer recovered from.
///
/// Issues never change the shape of the result; they tell the UI which
/// numbers deserve a warning badge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CheckoutIssue {
    /// A line was priced at zero.
    InvalidPrice { line_id: String, reason: String },
    /// The entered code was refused; no discount applied.
    DiscountRejected { rejection: DiscountRejected },
    /// A code is still being validated; no discount applied yet.
    DiscountPending { code: String },
    /// A store policy is missing; its charge fell back to zero.
    PolicyMissing { policy: PolicyKind },
}

// =============================================================================
// Input
// =============================================================================

/// Everything one calculation needs, borrowed from the caller.
#[derive(Debug, Clone, Copy)]
pub struct CheckoutInput<'a> {
    pub items: &'a [LineItem],
    pub settings: &'a StoreSettings,
    pub fulfillment: Fulfillment,
    pub discount: Option<&'a DiscountState>,
    /// Loyalty balance of the signed-in customer. `None` for guests.
    pub loyalty_points: Option<u32>,
    /// Aggregate of `items` the caller already computed. Must match `items`.
    pub subtotal: Option<&'a Subtotal>,
}

impl<'a> CheckoutInput<'a> {
    /// Delivery order, no discount, guest customer.
    pub fn new(items: &'a [LineItem], settings: &'a StoreSettings) -> Self {
        CheckoutInput {
            items,
            settings,
            fulfillment: Fulfillment::Delivery,
            discount: None,
            loyalty_points: None,
            subtotal: None,
        }
    }

    pub fn with_fulfillment(mut self, fulfillment: Fulfillment) -> Self {
        self.fulfillment = fulfillment;
        self
    }

    pub fn with_discount(mut self, discount: &'a DiscountState) -> Self {
        self.discount = Some(discount);
        self
    }

    pub fn with_loyalty_points(mut self, points: u32) -> Self {
        self.loyalty_points = Some(points);
        self
    }

    /// Reuses an aggregate of `items` instead of pricing the lines again.
    pub fn with_subtotal(mut self, subtotal: &'a Subtotal) -> Self {
        self.subtotal = Some(subtotal);
        self
    }
}

// =============================================================================
// Output
// =============================================================================

/// The composed checkout breakdown.
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  ORDER SUMMARY                                                          │
/// │  Subtotal                                      $100.00                  │
/// │  Shipping                                       $10.00                  │
/// │  Tax (5%)                                        $5.00                  │
/// │  Discount (SAVE10)                             -$10.00                  │
/// │  ─────────────────────────────────────────────────────                  │
/// │  TOTAL                                         $105.00                  │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
/// The same value is handed to the order-creation collaborator, which
/// persists it and requests the payment intent for `grand_total`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderTotal {
    pub subtotal: Money,
    pub shipping: Money,
    pub tax: Money,
    pub discount: Money,
    pub grand_total: Money,
    pub currency_symbol: String,

    pub shipping_basis: ShippingBasis,
    pub tax_rate: TaxRate,
    /// Spend needed to unlock free delivery, when that applies.
    pub free_shipping_remaining: Option<Money>,
    /// Code behind `discount`, if one is applied.
    pub applied_code: Option<String>,
    pub loyalty: Option<LoyaltyState>,
    pub issues: Vec<CheckoutIssue>,
}

impl OrderTotal {
    /// Formats an amount with this order's currency symbol.
    pub fn format(&self, amount: Money) -> String {
        amount.format_with(&self.currency_symbol)
    }

    /// True when every input was used as given.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

// =============================================================================
// Composition
// =============================================================================

/// Computes the full order breakdown.
///
/// ```rust
/// use checkout_core::money::Money;
/// use checkout_core::shipping::ShippingPolicy;
/// use checkout_core::tax::TaxPolicy;
/// use checkout_core::totals::{compose, CheckoutInput};
/// use checkout_core::{LineItem, StoreSettings, TaxRate};
///
/// let settings = StoreSettings {
///     shipping: Some(ShippingPolicy::Flat { flat_cost: Money::from_cents(1000) }),
///     tax: Some(TaxPolicy::new(TaxRate::from_bps(500))),
///     ..StoreSettings::default()
/// };
/// let items = vec![LineItem::new("platter", "100.00", 1)];
///
/// let total = compose(&CheckoutInput::new(&items, &settings));
/// assert_eq!(total.grand_total.cents(), 11500);
/// assert_eq!(total.format(total.grand_total), "$115.00");
/// ```
pub fn compose(input: &CheckoutInput<'_>) -> OrderTotal {
    let settings = input.settings;
    let mut issues = Vec::new();

    // 1. Subtotal
    let aggregated;
    let subtotal = match input.subtotal {
        Some(subtotal) => subtotal,
        None => {
            aggregated = aggregate(input.items);
            &aggregated
        }
    };
    issues.extend(
        subtotal
            .invalid_lines
            .iter()
            .map(|line| CheckoutIssue::InvalidPrice {
                line_id: line.line_id.clone(),
                reason: line.reason.clone(),
            }),
    );
    let subtotal = subtotal.amount;

    // 2. Shipping
    let shipping = shipping_fee(subtotal, input.fulfillment, settings.shipping.as_ref());
    if shipping.policy_missing() {
        issues.push(CheckoutIssue::PolicyMissing {
            policy: PolicyKind::Shipping,
        });
    }

    // 3. Tax
    let tax = tax_for(subtotal, shipping.fee, settings.tax.as_ref());
    if tax.policy_missing {
        issues.push(CheckoutIssue::PolicyMissing {
            policy: PolicyKind::Tax,
        });
    }

    // 4. Discount (subtotal only)
    let active_code = match input.discount {
        Some(DiscountState::Applied { discount }) => Some(discount),
        Some(DiscountState::Rejected { rejection }) => {
            issues.push(CheckoutIssue::DiscountRejected {
                rejection: rejection.clone(),
            });
            None
        }
        Some(DiscountState::Validating { code }) => {
            issues.push(CheckoutIssue::DiscountPending { code: code.clone() });
            None
        }
        Some(DiscountState::Unapplied) | None => None,
    };
    let discount = discount_amount(subtotal, active_code);

    // 5. Loyalty
    let loyalty = match (&settings.loyalty, input.loyalty_points) {
        (Some(config), Some(points)) => Some(project(subtotal, points, config)),
        _ => None,
    };

    let grand_total = (subtotal + shipping.fee + tax.amount - discount).non_negative();

    debug!(
        %subtotal,
        shipping = %shipping.fee,
        tax = %tax.amount,
        %discount,
        %grand_total,
        issues = issues.len(),
        "Order total composed"
    );

    OrderTotal {
        subtotal,
        shipping: shipping.fee,
        tax: tax.amount,
        discount,
        grand_total,
        currency_symbol: settings.currency_symbol.clone(),
        shipping_basis: shipping.basis,
        tax_rate: tax.rate,
        free_shipping_remaining: amount_until_free_shipping(
            subtotal,
            input.fulfillment,
            settings.shipping.as_ref(),
        ),
        applied_code: active_code.map(|c| c.code.clone()),
        loyalty,
        issues,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
