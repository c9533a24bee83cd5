//! # Line-Item Aggregator
//!
//! Sums `unit_price × quantity` across a cart snapshot.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Latte        "4.50"   x2  ──►   9.00                                   │
//! │  Croissant    3         x1  ──►   3.00                                  │
//! │  Mystery      "n/a"     x4  ──►   0.00  + InvalidLine { "mystery" }     │
//! │                                  ──────                                 │
//! │                       Subtotal   12.00                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Summation is commutative, so line order never matters.

use serde::{Deserialize, Serialize};
use tracing::warn;
use ts_rs::TS;

use crate::money::Money;
use crate::price::parse_price;
use crate::types::LineItem;

/// A line whose price could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InvalidLine {
    pub line_id: String,
    pub reason: String,
}

/// Result of aggregating a cart.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Subtotal {
    /// Σ(parsed unit price × quantity).
    pub amount: Money,

    /// Number of distinct lines.
    pub item_count: usize,

    /// Σ quantity.
    pub total_quantity: u32,

    /// Lines that contributed zero because their price was unusable.
    pub invalid_lines: Vec<InvalidLine>,
}

/// Aggregates a cart snapshot into a subtotal.
///
/// ```rust
/// use checkout_core::cart::aggregate;
/// use checkout_core::LineItem;
///
/// let items = vec![LineItem::new("latte", "4.50", 2), LineItem::new("bun", 3, 1)];
/// let subtotal = aggregate(&items);
/// assert_eq!(subtotal.amount.cents(), 1200);
/// assert_eq!(subtotal.total_quantity, 3);
/// ```
pub fn aggregate(items: &[LineItem]) -> Subtotal {
    let mut subtotal = Subtotal {
        item_count: items.len(),
        ..Subtotal::default()
    };

    for item in items {
        subtotal.total_quantity = subtotal.total_quantity.saturating_add(item.quantity);

        match parse_price(&item.unit_price) {
            Ok(price) => subtotal.amount += price.multiply_quantity(item.quantity),
            Err(e) => {
                warn!(line_id = %item.id, error = %e, "Line price unparseable, counting as zero");
                subtotal.invalid_lines.push(InvalidLine {
                    line_id: item.id.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    subtotal
}

impl Subtotal {
    /// True when every line priced cleanly.
    pub fn is_clean(&self) -> bool {
        self.invalid_lines.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_cart_is_zero() {
        let subtotal = aggregate(&[]);
        assert!(subtotal.amount.is_zero());
        assert_eq!(subtotal.item_count, 0);
        assert!(subtotal.is_clean());
    }

    #[test]
    fn test_mixed_price_shapes() {
        let items = vec![
            LineItem::new("latte", "4.50", 2),
            LineItem::new("croissant", 3, 1),
            LineItem::new("cake", 5.25, 2),
        ];
        let subtotal = aggregate(&items);
        assert_eq!(subtotal.amount.cents(), 900 + 300 + 1050);
        assert_eq!(subtotal.item_count, 3);
        assert_eq!(subtotal.total_quantity, 5);
    }

    #[test]
    fn test_invalid_line_counts_as_zero() {
        let items = vec![
            LineItem::new("latte", "4.50", 2),
            LineItem::new("mystery", "n/a", 4),
        ];
        let subtotal = aggregate(&items);
        assert_eq!(subtotal.amount.cents(), 900);
        assert!(!subtotal.is_clean());
        assert_eq!(subtotal.invalid_lines.len(), 1);
        assert_eq!(subtotal.invalid_lines[0].line_id, "mystery");
    }

    proptest! {
        #[test]
        fn prop_subtotal_is_sum_of_lines(
            lines in prop::collection::vec((0i64..=100_000, 1u32..=999), 0..=20)
        ) {
            let items: Vec<LineItem> = lines
                .iter()
                .enumerate()
                .map(|(i, (units, qty))| LineItem::new(format!("item-{i}"), *units, *qty))
                .collect();

            let expected: i64 = lines.iter().map(|(units, qty)| units * 100 * i64::from(*qty)).sum();
            prop_assert_eq!(aggregate(&items).amount.cents(), expected);
        }

        #[test]
        fn prop_subtotal_is_order_independent(
            lines in prop::collection::vec((0i64..=100_000, 1u32..=999), 0..=20)
        ) {
            let items: Vec<LineItem> = lines
                .iter()
                .enumerate()
                .map(|(i, (units, qty))| LineItem::new(format!("item-{i}"), *units, *qty))
                .collect();
            let mut reversed = items.clone();
            reversed.reverse();

            prop_assert_eq!(aggregate(&items).amount, aggregate(&reversed).amount);
        }
    }
}
