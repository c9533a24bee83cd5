//! # Validation Module
//!
//! Input validation utilities for checkout inputs and settings.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Storefront (TypeScript)                                      │
//! │  └── Immediate form feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Settings conversion (tax rate, shipping threshold)                │
//! │  └── Cart / discount code shape checks                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Calculation                                                  │
//! │  └── Never fails: clamps and substitutes safe defaults                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use checkout_core::validation::{validate_discount_code, validate_quantity};
//!
//! assert!(validate_discount_code("SAVE20").is_ok());
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::ValidationError;
use crate::price::parse_price;
use crate::types::LineItem;
use crate::{MAX_CART_ITEMS, MAX_CODE_LENGTH, MAX_ITEM_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a line item identifier.
///
/// ## Rules
/// - Must not be empty
/// - At most 100 characters
pub fn validate_line_id(id: &str) -> ValidationResult<()> {
    let id = id.trim();

    if id.is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    if id.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "id".to_string(),
            max: 100,
        });
    }

    Ok(())
}

/// Validates the shape of a discount code before it is sent for lookup.
///
/// ## Rules
/// - Must not be empty
/// - At most 32 characters
/// - Letters, numbers, hyphens and underscores only
///
/// ```rust
/// use checkout_core::validation::validate_discount_code;
///
/// assert!(validate_discount_code("WELCOME-10").is_ok());
/// assert!(validate_discount_code("").is_err());
/// assert!(validate_discount_code("has space").is_err());
/// ```
pub fn validate_discount_code(code: &str) -> ValidationResult<()> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "discount code".to_string(),
        });
    }

    if code.chars().count() > MAX_CODE_LENGTH {
        return Err(ValidationError::TooLong {
            field: "discount code".to_string(),
            max: MAX_CODE_LENGTH,
        });
    }

    if !code
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "discount code".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: u32) -> ValidationResult<()> {
    if qty == 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: i64::from(MAX_ITEM_QUANTITY),
        });
    }

    Ok(())
}

/// Validates an amount in cents (shipping costs, thresholds).
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free shipping, complimentary items)
pub fn validate_amount_cents(field: &str, cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a tax rate in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    validate_percentage_bps("tax_rate", bps)
}

/// Validates a percentage in basis points (0% to 100%).
pub fn validate_percentage_bps(field: &str, bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates cart size (number of distinct lines).
///
/// ## Rules
/// - Must not exceed MAX_CART_ITEMS (100)
pub fn validate_cart_size(lines: usize) -> ValidationResult<()> {
    if lines > MAX_CART_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "cart items".to_string(),
            min: 0,
            max: MAX_CART_ITEMS as i64,
        });
    }

    Ok(())
}

/// Validates a whole line item: id, quantity and a parseable price.
///
/// The calculation itself never calls this; it is for collaborators that
/// want to reject a bad line at the door instead of pricing it at zero.
pub fn validate_line_item(item: &LineItem) -> ValidationResult<()> {
    validate_line_id(&item.id)?;
    validate_quantity(item.quantity)?;
    parse_price(&item.unit_price).map_err(|e| ValidationError::InvalidFormat {
        field: "unit_price".to_string(),
        reason: e.to_string(),
    })?;
    Ok(())
}

/// Validates every line and the cart size.
pub fn validate_cart(items: &[LineItem]) -> ValidationResult<()> {
    validate_cart_size(items.len())?;
    items.iter().try_for_each(validate_line_item)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_line_id() {
        assert!(validate_line_id("latte-large").is_ok());
        assert!(validate_line_id("").is_err());
        assert!(validate_line_id("   ").is_err());
        assert!(validate_line_id(&"x".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_discount_code() {
        assert!(validate_discount_code("SAVE20").is_ok());
        assert!(validate_discount_code("summer_sale-2024").is_ok());
        assert!(validate_discount_code("").is_err());
        assert!(validate_discount_code("50% OFF").is_err());
        assert!(validate_discount_code(&"A".repeat(33)).is_err());
    }

    #[test]
    fn test_discount_code_length_counts_characters() {
        // 17 characters, 34 bytes
        let umlauts = "ÄÖÜÄÖÜÄÖÜÄÖÜÄÖÜÄ";
        assert!(validate_discount_code(umlauts).is_ok());
        assert!(validate_discount_code(&"Ä".repeat(32)).is_ok());
        assert!(matches!(
            validate_discount_code(&"Ä".repeat(33)),
            Err(ValidationError::TooLong { max: 32, .. })
        ));
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_amount_cents() {
        assert!(validate_amount_cents("flat_cost_cents", 0).is_ok());
        assert!(validate_amount_cents("flat_cost_cents", 1099).is_ok());
        assert_eq!(
            validate_amount_cents("flat_cost_cents", -100),
            Err(ValidationError::OutOfRange {
                field: "flat_cost_cents".to_string(),
                min: 0,
                max: i64::MAX,
            })
        );
    }

    #[test]
    fn test_validate_tax_rate_bps() {
        assert!(validate_tax_rate_bps(0).is_ok());
        assert!(validate_tax_rate_bps(825).is_ok());
        assert!(validate_tax_rate_bps(10000).is_ok());
        assert!(validate_tax_rate_bps(10001).is_err());
    }

    #[test]
    fn test_validate_line_item() {
        assert!(validate_line_item(&LineItem::new("latte", "4.50", 1)).is_ok());
        assert!(validate_line_item(&LineItem::new("latte", "4.50", 0)).is_err());
        assert!(matches!(
            validate_line_item(&LineItem::new("latte", "free?", 1)),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_validate_cart() {
        let ok: Vec<LineItem> = (0..3).map(|i| LineItem::new(format!("l{i}"), 1, 1)).collect();
        assert!(validate_cart(&ok).is_ok());

        let too_many: Vec<LineItem> = (0..=MAX_CART_ITEMS)
            .map(|i| LineItem::new(format!("l{i}"), 1, 1))
            .collect();
        assert!(validate_cart(&too_many).is_err());
    }
}
