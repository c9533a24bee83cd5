//! # checkout-core: Pure Checkout Calculations for Star Café
//!
//! Everything the storefront needs to turn a cart into an order total:
//! subtotal, delivery fee, tax, discount, loyalty projection. No I/O, no
//! clock reads, no stored state.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Star Café Checkout                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Storefront (cart, settings, code registry)         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ snapshots                              │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ checkout-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   price ──► cart ──► shipping ──► tax ──► discount ──► totals  │   │
//! │  │                                              loyalty ──┘        │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO CLOCK • NO NETWORK • PURE FUNCTIONS               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ OrderTotal                             │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │        Order creation / payment intent (outside this crate)     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Integer-cent `Money` with half-up basis-point math
//! - [`price`] - Tolerant parsing of raw line prices
//! - [`cart`] - Line-item aggregation into a subtotal
//! - [`shipping`] - Delivery fee policies
//! - [`tax`] - Tax policies and calculation
//! - [`discount`] - Discount codes, registry checks, code lifecycle
//! - [`loyalty`] - Points and tier projection
//! - [`totals`] - Composes all of the above into an [`OrderTotal`]
//! - [`validation`] - Input rules
//! - [`error`] - Error types
//!
//! ## Example Usage
//!
//! ```rust
//! use checkout_core::money::Money;
//! use checkout_core::shipping::ShippingPolicy;
//! use checkout_core::tax::TaxPolicy;
//! use checkout_core::{compose, CheckoutInput, LineItem, StoreSettings, TaxRate};
//!
//! let settings = StoreSettings {
//!     shipping: Some(ShippingPolicy::FreeOverAmount {
//!         flat_cost: Money::from_cents(1000),
//!         threshold: Money::from_cents(50000),
//!     }),
//!     tax: Some(TaxPolicy::new(TaxRate::from_bps(800))),
//!     ..StoreSettings::default()
//! };
//! let items = vec![LineItem::new("catering-tray", "600.00", 1)];
//!
//! let total = compose(&CheckoutInput::new(&items, &settings));
//! assert!(total.shipping.is_zero());
//! assert_eq!(total.grand_total.cents(), 64800);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod discount;
pub mod error;
pub mod loyalty;
pub mod money;
pub mod price;
pub mod shipping;
pub mod tax;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use discount::{DiscountCode, DiscountCodeRecord, DiscountKind, DiscountState};
pub use error::{
    CoreError, CoreResult, DiscountError, DiscountRejected, PriceError, RejectionReason,
    ValidationError,
};
pub use money::Money;
pub use price::PriceInput;
pub use totals::{compose, CheckoutInput, CheckoutIssue, OrderTotal};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum lines allowed in a single cart.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line.
///
/// Catches accidental over-ordering (typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: u32 = 999;

/// Maximum discount code length.
pub const MAX_CODE_LENGTH: usize = 32;
