//! # Quote Command
//!
//! Composes an order total from snapshot files.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. StoreConfig ──► StoreSettings                                      │
//! │  2. --cart cart.json ──► Vec<LineItem>   (--strict: validate_cart)     │
//! │  3. --code CODE --codes codes.json                                     │
//! │        DiscountState::submit(CODE)            Unapplied ──► Validating  │
//! │        check_code(registry, CODE, subtotal, now)                       │
//! │        DiscountState::resolve(outcome)        ──► Applied | Rejected   │
//! │  4. compose(CheckoutInput) ──► OrderTotal                              │
//! │  5. print text breakdown or JSON                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use clap::Args;
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info};

use checkout_core::cart::aggregate;
use checkout_core::discount::check_code;
use checkout_core::shipping::ShippingBasis;
use checkout_core::totals::PolicyKind;
use checkout_core::validation::validate_cart;
use checkout_core::{
    compose, CheckoutInput, CheckoutIssue, DiscountCodeRecord, DiscountState, Fulfillment,
    LineItem, Money, OrderTotal,
};

use super::read_json;
use crate::config::StoreConfig;
use crate::error::CliResult;

#[derive(Debug, Clone, Args)]
pub struct QuoteArgs {
    /// Cart snapshot: JSON array of line items
    #[arg(long)]
    pub cart: PathBuf,

    /// Customer collects the order (no delivery fee)
    #[arg(long)]
    pub pickup: bool,

    /// Discount code to apply
    #[arg(long, requires = "codes")]
    pub code: Option<String>,

    /// Discount code registry: JSON array of code records
    #[arg(long)]
    pub codes: Option<PathBuf>,

    /// Customer's current loyalty balance (omit for guests)
    #[arg(long)]
    pub points: Option<u32>,

    /// Refuse carts with malformed lines instead of pricing them at zero
    #[arg(long)]
    pub strict: bool,

    /// Print the total as JSON
    #[arg(long)]
    pub json: bool,
}

/// Runs the quote and writes the result to `out`.
pub fn execute(
    args: &QuoteArgs,
    config: &StoreConfig,
    now: DateTime<Utc>,
    out: &mut impl Write,
) -> CliResult<OrderTotal> {
    let settings = config.to_settings()?;

    let items: Vec<LineItem> = read_json(&args.cart)?;
    if args.strict {
        validate_cart(&items)?;
    }
    debug!(lines = items.len(), "Cart loaded");

    let subtotal = aggregate(&items);
    let discount = resolve_discount(args, subtotal.amount, now)?;

    let fulfillment = if args.pickup {
        Fulfillment::Pickup
    } else {
        Fulfillment::Delivery
    };
    let mut input = CheckoutInput::new(&items, &settings)
        .with_subtotal(&subtotal)
        .with_fulfillment(fulfillment)
        .with_discount(&discount);
    if let Some(points) = args.points {
        input = input.with_loyalty_points(points);
    }

    let total = compose(&input);
    info!(grand_total = %total.grand_total, issues = total.issues.len(), "Quote composed");

    if args.json {
        serde_json::to_writer_pretty(&mut *out, &total)?;
        writeln!(out)?;
    } else {
        render_text(&total, out)?;
    }

    Ok(total)
}

/// Drives the discount lifecycle for the requested code.
fn resolve_discount(
    args: &QuoteArgs,
    subtotal: Money,
    now: DateTime<Utc>,
) -> CliResult<DiscountState> {
    let mut state = DiscountState::default();
    let (Some(code), Some(registry)) = (&args.code, &args.codes) else {
        return Ok(state);
    };

    state.submit(code)?;

    let records: Vec<DiscountCodeRecord> = read_json(registry)?;
    state.resolve(check_code(&records, code, subtotal, now))?;

    Ok(state)
}

// =============================================================================
// Text Output
// =============================================================================

const WIDTH: usize = 36;

fn row(out: &mut impl Write, label: &str, amount: String) -> std::io::Result<()> {
    writeln!(out, "{:<22}{:>14}", label, amount)
}

fn render_text(total: &OrderTotal, out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "ORDER SUMMARY")?;
    row(out, "Subtotal", total.format(total.subtotal))?;
    row(
        out,
        &format!("Shipping ({})", basis_label(total.shipping_basis)),
        total.format(total.shipping),
    )?;
    row(
        out,
        &format!("Tax ({:.2}%)", total.tax_rate.percentage()),
        total.format(total.tax),
    )?;
    if !total.discount.is_zero() {
        let label = match &total.applied_code {
            Some(code) => format!("Discount ({})", code),
            None => "Discount".to_string(),
        };
        row(out, &label, format!("-{}", total.format(total.discount)))?;
    }
    writeln!(out, "{}", "-".repeat(WIDTH))?;
    row(out, "TOTAL", total.format(total.grand_total))?;

    if let Some(remaining) = total.free_shipping_remaining {
        writeln!(out)?;
        writeln!(out, "Add {} more for free delivery", total.format(remaining))?;
    }

    if let Some(loyalty) = &total.loyalty {
        writeln!(out)?;
        writeln!(
            out,
            "Loyalty: {} points ({}), +{} with this order",
            loyalty.current_points, loyalty.tier, loyalty.points_earned
        )?;
        match (&loyalty.next_tier, loyalty.points_to_next_tier) {
            (Some(next), Some(remaining)) => writeln!(
                out,
                "         {} more to {} ({}% there)",
                remaining, next, loyalty.progress_percent
            )?,
            _ => writeln!(out, "         top tier reached")?,
        }
    }

    if !total.issues.is_empty() {
        writeln!(out)?;
        for issue in &total.issues {
            writeln!(out, "! {}", issue_message(issue))?;
        }
    }

    Ok(())
}

fn basis_label(basis: ShippingBasis) -> &'static str {
    match basis {
        ShippingBasis::Pickup => "pickup",
        ShippingBasis::Free => "free",
        ShippingBasis::OverThreshold => "free over threshold",
        ShippingBasis::BelowThreshold | ShippingBasis::Flat => "flat",
        ShippingBasis::PolicyMissing => "not configured",
    }
}

fn issue_message(issue: &CheckoutIssue) -> String {
    match issue {
        CheckoutIssue::InvalidPrice { line_id, reason } => {
            format!("line '{}' priced at zero: {}", line_id, reason)
        }
        CheckoutIssue::DiscountRejected { rejection } => rejection.to_string(),
        CheckoutIssue::DiscountPending { code } => {
            format!("discount code {} is still being validated", code)
        }
        CheckoutIssue::PolicyMissing { policy } => match policy {
            PolicyKind::Shipping => "no shipping policy configured, delivery charged at zero",
            PolicyKind::Tax => "no tax policy configured, tax charged at zero",
        }
        .to_string(),
    }
}
