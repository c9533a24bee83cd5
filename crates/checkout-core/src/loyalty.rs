//! # Loyalty Projector
//!
//! Shows what this order is worth in loyalty points without touching the
//! customer's balance. Points are credited by the order collaborator after
//! the payment is confirmed.
//!
//! ## Tier Progress
//! ```text
//! tier_span = 500, tiers = [Bronze, Silver, Gold]
//!
//!   0 ────────── 500 ────────── 1000 ─────────────►
//!   │   Bronze    │   Silver     │   Gold (top)
//!
//! current = 620  →  tier Silver, next Gold, 380 to go
//!                   progress = (620 mod 500) / 500 = 24%
//! current = 1400 →  tier Gold, no next tier, progress 100%
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

/// Label used when the store configured no tiers.
pub const DEFAULT_TIER: &str = "Member";

/// A reward that can be bought with points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Reward {
    pub label: String,
    pub cost: u32,
}

/// Store loyalty programme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LoyaltyConfig {
    /// Points earned per whole currency unit spent.
    pub points_per_unit: u32,

    /// Points between consecutive tiers.
    pub tier_span: u32,

    /// Tier labels, lowest first.
    #[serde(default)]
    pub tiers: Vec<String>,

    #[serde(default)]
    pub rewards: Vec<Reward>,
}

impl Default for LoyaltyConfig {
    fn default() -> Self {
        LoyaltyConfig {
            points_per_unit: 1,
            tier_span: 500,
            tiers: vec![
                "Bronze".to_string(),
                "Silver".to_string(),
                "Gold".to_string(),
                "Platinum".to_string(),
            ],
            rewards: Vec::new(),
        }
    }
}

/// Loyalty snapshot for display next to the order total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LoyaltyState {
    /// Balance before this order.
    pub current_points: u32,

    /// Points this order will earn once confirmed.
    pub points_earned: u32,

    /// Balance after this order is credited.
    pub projected_points: u32,

    /// Tier at the current balance.
    pub tier: String,

    /// Tier at the projected balance.
    pub projected_tier: String,

    pub next_tier: Option<String>,

    pub points_to_next_tier: Option<u32>,

    /// Progress toward the next tier, 0–100.
    pub progress_percent: u8,

    /// Rewards affordable with the current balance, cheapest first.
    pub redeemable_rewards: Vec<Reward>,
}

/// Points earned for a subtotal: whole currency units × rate, rounded down.
///
/// ```rust
/// use checkout_core::loyalty::points_for;
/// use checkout_core::money::Money;
///
/// assert_eq!(points_for(Money::from_cents(1299), 1), 12);
/// assert_eq!(points_for(Money::from_cents(-500), 1), 0);
/// ```
pub fn points_for(subtotal: Money, points_per_unit: u32) -> u32 {
    let points = subtotal.non_negative().cents() as i128 * points_per_unit as i128 / 100;
    points.min(u32::MAX as i128) as u32
}

/// Projects the customer's loyalty standing for this order.
pub fn project(subtotal: Money, current_points: u32, config: &LoyaltyConfig) -> LoyaltyState {
    let points_earned = points_for(subtotal, config.points_per_unit);
    let projected_points = current_points.saturating_add(points_earned);

    let standing = Standing::at(current_points, config);

    let mut redeemable_rewards: Vec<Reward> = config
        .rewards
        .iter()
        .filter(|r| r.cost <= current_points)
        .cloned()
        .collect();
    redeemable_rewards.sort_by(|a, b| a.cost.cmp(&b.cost).then_with(|| a.label.cmp(&b.label)));

    LoyaltyState {
        current_points,
        points_earned,
        projected_points,
        tier: standing.tier,
        projected_tier: Standing::at(projected_points, config).tier,
        next_tier: standing.next_tier,
        points_to_next_tier: standing.points_to_next_tier,
        progress_percent: standing.progress_percent,
        redeemable_rewards,
    }
}

struct Standing {
    tier: String,
    next_tier: Option<String>,
    points_to_next_tier: Option<u32>,
    progress_percent: u8,
}

impl Standing {
    fn at(points: u32, config: &LoyaltyConfig) -> Self {
        let top = Standing {
            tier: config
                .tiers
                .last()
                .cloned()
                .unwrap_or_else(|| DEFAULT_TIER.to_string()),
            next_tier: None,
            points_to_next_tier: None,
            progress_percent: 100,
        };

        let span = config.tier_span;
        if span == 0 || config.tiers.len() < 2 {
            return top;
        }

        let index = (points / span) as usize;
        let (Some(tier), Some(next)) = (config.tiers.get(index), config.tiers.get(index + 1)) else {
            return top;
        };

        let into_tier = points % span;
        let progress = (u64::from(into_tier) * 100 / u64::from(span)).min(100) as u8;

        Standing {
            tier: tier.clone(),
            next_tier: Some(next.clone()),
            points_to_next_tier: Some(span - into_tier),
            progress_percent: progress,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn config() -> LoyaltyConfig {
        LoyaltyConfig {
            points_per_unit: 1,
            tier_span: 500,
            tiers: vec!["Bronze".into(), "Silver".into(), "Gold".into()],
            rewards: vec![
                Reward {
                    label: "Free dessert".into(),
                    cost: 300,
                },
                Reward {
                    label: "Free drink".into(),
                    cost: 150,
                },
                Reward {
                    label: "Dinner for two".into(),
                    cost: 2000,
                },
            ],
        }
    }

    #[test]
    fn test_points_floor_whole_units() {
        assert_eq!(points_for(Money::from_cents(10099), 1), 100);
        assert_eq!(points_for(Money::from_cents(10099), 2), 201);
        assert_eq!(points_for(Money::zero(), 5), 0);
    }

    #[test]
    fn test_mid_tier_progress() {
        let state = project(Money::from_cents(5000), 620, &config());
        assert_eq!(state.tier, "Silver");
        assert_eq!(state.next_tier.as_deref(), Some("Gold"));
        assert_eq!(state.points_to_next_tier, Some(380));
        assert_eq!(state.progress_percent, 24);
        assert_eq!(state.points_earned, 50);
        assert_eq!(state.projected_points, 670);
    }

    #[test]
    fn test_projected_tier_crosses_boundary() {
        let state = project(Money::from_cents(10000), 450, &config());
        assert_eq!(state.tier, "Bronze");
        assert_eq!(state.projected_tier, "Silver");
    }

    #[test]
    fn test_top_tier_is_complete() {
        let state = project(Money::zero(), 1400, &config());
        assert_eq!(state.tier, "Gold");
        assert!(state.next_tier.is_none());
        assert!(state.points_to_next_tier.is_none());
        assert_eq!(state.progress_percent, 100);
    }

    #[test]
    fn test_degenerate_configs() {
        let no_tiers = LoyaltyConfig {
            tiers: Vec::new(),
            ..config()
        };
        let state = project(Money::zero(), 10, &no_tiers);
        assert_eq!(state.tier, DEFAULT_TIER);
        assert_eq!(state.progress_percent, 100);

        let zero_span = LoyaltyConfig {
            tier_span: 0,
            ..config()
        };
        let state = project(Money::zero(), 10, &zero_span);
        assert_eq!(state.tier, "Gold");
    }

    #[test]
    fn test_redeemable_rewards_sorted() {
        let state = project(Money::zero(), 320, &config());
        let labels: Vec<&str> = state
            .redeemable_rewards
            .iter()
            .map(|r| r.label.as_str())
            .collect();
        assert_eq!(labels, vec!["Free drink", "Free dessert"]);
    }

    proptest! {
        #[test]
        fn prop_progress_in_range(points in 0u32..=100_000, span in 0u32..=5_000) {
            let cfg = LoyaltyConfig { tier_span: span, ..config() };
            let state = project(Money::zero(), points, &cfg);
            prop_assert!(state.progress_percent <= 100);
        }

        #[test]
        fn prop_projection_never_mutates_balance(subtotal in 0i64..=10_000_000, points in 0u32..=100_000) {
            let state = project(Money::from_cents(subtotal), points, &config());
            prop_assert_eq!(state.current_points, points);
            prop_assert_eq!(state.projected_points, points + state.points_earned);
        }
    }
}
