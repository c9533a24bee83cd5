//! # Domain Types
//!
//! Shared types used across the checkout calculation.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    LineItem     │   │  StoreSettings  │   │    TaxRate      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (opaque)    │   │  currency       │   │  bps (u32)      │       │
//! │  │  name           │   │  shipping?      │   │  825 = 8.25%    │       │
//! │  │  unit_price     │   │  tax?           │   └─────────────────┘       │
//! │  │  quantity       │   │  loyalty?       │                              │
//! │  └─────────────────┘   └─────────────────┘   ┌─────────────────┐       │
//! │                                              │  Fulfillment    │       │
//! │                                              │  Delivery       │       │
//! │                                              │  Pickup         │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `?` marks an explicit `Option`: "this store has no such policy" is a
//! value, not a null that leaks into arithmetic.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::loyalty::LoyaltyConfig;
use crate::price::PriceInput;
use crate::shipping::ShippingPolicy;
use crate::tax::TaxPolicy;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000, so 825 bps = 8.25%. Integer rates keep
/// the tax calculation exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage.
    ///
    /// Negative, NaN and infinite inputs are treated as 0%.
    ///
    /// ```rust
    /// use checkout_core::TaxRate;
    ///
    /// assert_eq!(TaxRate::from_percentage(8.25).bps(), 825);
    /// assert_eq!(TaxRate::from_percentage(-3.0).bps(), 0);
    /// ```
    pub fn from_percentage(pct: f64) -> Self {
        if !pct.is_finite() || pct <= 0.0 {
            return TaxRate::zero();
        }
        TaxRate((pct * 100.0).round().min(u32::MAX as f64) as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One product in the cart snapshot.
///
/// The price is kept in its raw shape; it is parsed during aggregation so a
/// single malformed price degrades that line instead of the whole cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    /// Opaque identifier from the cart collaborator.
    pub id: String,

    /// Display name, if the snapshot carries one.
    #[serde(default)]
    pub name: Option<String>,

    /// Unit price as received.
    pub unit_price: PriceInput,

    /// Quantity in cart (≥ 1).
    pub quantity: u32,
}

impl LineItem {
    pub fn new(id: impl Into<String>, unit_price: impl Into<PriceInput>, quantity: u32) -> Self {
        LineItem {
            id: id.into(),
            name: None,
            unit_price: unit_price.into(),
            quantity,
        }
    }

    /// Attaches a display name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

// =============================================================================
// Fulfillment
// =============================================================================

/// How the order reaches the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Fulfillment {
    /// Delivered to the customer's address.
    #[default]
    Delivery,
    /// Collected at the café. Never incurs a delivery fee.
    Pickup,
}

// =============================================================================
// Store Settings
// =============================================================================

/// Store-wide configuration consumed by a single calculation.
///
/// Loaded once per session by the settings collaborator and passed into
/// every call; the core never reads configuration on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StoreSettings {
    /// ISO 4217 code.
    pub currency_code: String,

    /// Symbol used for display.
    pub currency_symbol: String,

    /// Shipping policy, if configured.
    #[serde(default)]
    pub shipping: Option<ShippingPolicy>,

    /// Tax policy, if configured.
    #[serde(default)]
    pub tax: Option<TaxPolicy>,

    /// Loyalty programme, if the store runs one.
    #[serde(default)]
    pub loyalty: Option<LoyaltyConfig>,
}

impl Default for StoreSettings {
    /// No policies at all: every fee falls back to zero.
    fn default() -> Self {
        StoreSettings {
            currency_code: "USD".to_string(),
            currency_symbol: "$".to_string(),
            shipping: None,
            tax: None,
            loyalty: None,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
