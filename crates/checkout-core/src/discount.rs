//! # Discount Engine
//!
//! Discount arithmetic, registry checks and the code lifecycle.
//!
//! ## Arithmetic
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  No code ─────────────────────────────────────────────► 0               │
//! │                                                                         │
//! │  Percentage ─► subtotal × pct ─► min(cap) ─► min(subtotal)              │
//! │                200.00 × 20%  =  40.00 ─► 30.00 ─► 30.00                 │
//! │                                                                         │
//! │  Fixed ──────► min(value, subtotal)                                     │
//! │                min(75.00, 50.00) = 50.00                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Discounts depend on the subtotal only. Shipping and tax are never
//! discounted.
//!
//! ## Lifecycle
//! ```text
//!              submit                 resolve(Ok)
//!  Unapplied ─────────► Validating ─────────────► Applied
//!      ▲                    │                        │
//!      │                    │ resolve(Err)           │ submit (replaces)
//!      │      dismiss       ▼                        ▼
//!      └──────────────── Rejected               Validating
//!
//!  clear: any state ──► Unapplied
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use ts_rs::TS;

use crate::error::{DiscountError, DiscountRejected, RejectionReason, ValidationError};
use crate::money::Money;
use crate::validation::{validate_discount_code, validate_percentage_bps, ValidationResult};

// =============================================================================
// Discount Code
// =============================================================================

/// How a code reduces the subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiscountKind {
    /// Percentage of the subtotal, in basis points (2000 = 20%).
    Percentage { percent_bps: u32 },
    /// Fixed amount off.
    Fixed { amount: Money },
}

/// A code that passed registry validation and may be applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiscountCode {
    pub code: String,
    pub kind: DiscountKind,
    /// Upper bound on the discount amount, if the code has one.
    #[serde(default)]
    pub max_discount: Option<Money>,
}

impl DiscountCode {
    /// A percentage code. `percent_bps` must be within 0–10000.
    pub fn percentage(code: impl Into<String>, percent_bps: u32) -> ValidationResult<Self> {
        validate_percentage_bps("discount percentage", percent_bps)?;
        Ok(DiscountCode {
            code: code.into(),
            kind: DiscountKind::Percentage { percent_bps },
            max_discount: None,
        })
    }

    /// A fixed-amount code. `amount` must not be negative.
    pub fn fixed(code: impl Into<String>, amount: Money) -> ValidationResult<Self> {
        if amount.is_negative() {
            return Err(ValidationError::MustBePositive {
                field: "discount amount".to_string(),
            });
        }
        Ok(DiscountCode {
            code: code.into(),
            kind: DiscountKind::Fixed { amount },
            max_discount: None,
        })
    }

    /// Sets the maximum discount amount.
    pub fn with_cap(mut self, cap: Money) -> Self {
        self.max_discount = Some(cap.non_negative());
        self
    }
}

/// Computes the discount for a subtotal.
///
/// The result is always within `0..=subtotal`.
///
/// ```rust
/// use checkout_core::discount::{discount_amount, DiscountCode};
/// use checkout_core::money::Money;
///
/// let code = DiscountCode::percentage("SAVE20", 2000)
///     .unwrap()
///     .with_cap(Money::from_cents(3000));
/// let discount = discount_amount(Money::from_cents(20000), Some(&code));
/// assert_eq!(discount.cents(), 3000);
/// ```
pub fn discount_amount(subtotal: Money, code: Option<&DiscountCode>) -> Money {
    let subtotal = subtotal.non_negative();
    let Some(code) = code else {
        return Money::zero();
    };

    let raw = match code.kind {
        DiscountKind::Percentage { percent_bps } => subtotal.apply_bps(percent_bps),
        DiscountKind::Fixed { amount } => amount.non_negative(),
    };

    let capped = match code.max_discount {
        Some(cap) => raw.min(cap.non_negative()),
        None => raw,
    };

    capped.min(subtotal)
}

// =============================================================================
// Registry Records
// =============================================================================

/// A row from the discount code registry.
///
/// The registry collaborator owns these; the checks below are the rules it
/// applies before handing a [`DiscountCode`] to the calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountCodeRecord {
    pub code: String,
    pub kind: DiscountKind,
    #[serde(default)]
    pub max_discount: Option<Money>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub usage_limit: Option<u32>,
    #[serde(default)]
    pub times_used: u32,
    #[serde(default)]
    pub min_order: Option<Money>,
}

fn default_true() -> bool {
    true
}

impl DiscountCodeRecord {
    /// Checks the record against an order and, if every rule passes,
    /// produces the code to apply.
    ///
    /// ## Check Order
    /// inactive → not yet valid → expired → usage limit → minimum order
    ///
    /// A row whose percentage or amount fails the [`DiscountCode`]
    /// constructors is rejected as [`RejectionReason::Misconfigured`].
    pub fn redeem(&self, subtotal: Money, now: DateTime<Utc>) -> Result<DiscountCode, DiscountRejected> {
        let reject = |reason: RejectionReason| -> Result<DiscountCode, DiscountRejected> {
            Err(DiscountRejected::new(self.code.clone(), reason))
        };

        if !self.is_active {
            return reject(RejectionReason::Inactive);
        }
        if self.starts_at.is_some_and(|starts| now < starts) {
            return reject(RejectionReason::NotYetValid);
        }
        if self.expires_at.is_some_and(|expires| now >= expires) {
            return reject(RejectionReason::Expired);
        }
        if self.usage_limit.is_some_and(|limit| self.times_used >= limit) {
            return reject(RejectionReason::UsageLimitReached);
        }
        if let Some(minimum) = self.min_order {
            if subtotal < minimum {
                return reject(RejectionReason::BelowMinimumOrder { minimum });
            }
        }

        let built = match self.kind {
            DiscountKind::Percentage { percent_bps } => {
                DiscountCode::percentage(self.code.clone(), percent_bps)
            }
            DiscountKind::Fixed { amount } => DiscountCode::fixed(self.code.clone(), amount),
        };

        match built {
            Ok(code) => Ok(match self.max_discount {
                Some(cap) => code.with_cap(cap),
                None => code,
            }),
            Err(e) => {
                warn!(code = %self.code, error = %e, "Registry row is invalid, rejecting code");
                reject(RejectionReason::Misconfigured)
            }
        }
    }
}

/// Finds a record by code, ignoring case and surrounding whitespace.
pub fn lookup_code<'a>(
    records: &'a [DiscountCodeRecord],
    code: &str,
) -> Result<&'a DiscountCodeRecord, DiscountRejected> {
    let wanted = code.trim();
    records
        .iter()
        .find(|r| r.code.eq_ignore_ascii_case(wanted))
        .ok_or_else(|| DiscountRejected::new(wanted, RejectionReason::NotFound))
}

/// Looks a code up and runs the registry checks in one step.
pub fn check_code(
    records: &[DiscountCodeRecord],
    code: &str,
    subtotal: Money,
    now: DateTime<Utc>,
) -> Result<DiscountCode, DiscountRejected> {
    lookup_code(records, code)?.redeem(subtotal, now)
}

// =============================================================================
// Lifecycle
// =============================================================================

/// Where a discount code is in its lifecycle.
///
/// At most one code is active at a time: submitting a new code discards
/// whatever was applied before.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DiscountState {
    #[default]
    Unapplied,
    Validating {
        code: String,
    },
    Applied {
        discount: DiscountCode,
    },
    Rejected {
        rejection: DiscountRejected,
    },
}

impl DiscountState {
    /// Short state name, for logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            DiscountState::Unapplied => "unapplied",
            DiscountState::Validating { .. } => "validating",
            DiscountState::Applied { .. } => "applied",
            DiscountState::Rejected { .. } => "rejected",
        }
    }

    /// Starts validating a code. Allowed from every state.
    ///
    /// A malformed code is refused up front and the state is left unchanged.
    pub fn submit(&mut self, code: &str) -> ValidationResult<()> {
        validate_discount_code(code)?;
        let code = code.trim().to_string();
        debug!(from = self.name(), %code, "Discount code submitted");
        *self = DiscountState::Validating { code };
        Ok(())
    }

    /// Records the registry's answer for the pending code.
    pub fn resolve(
        &mut self,
        outcome: Result<DiscountCode, DiscountRejected>,
    ) -> Result<(), DiscountError> {
        let pending = match &*self {
            DiscountState::Validating { code } => code.as_str(),
            other => {
                return Err(DiscountError::InvalidTransition {
                    action: "resolve",
                    state: other.name(),
                })
            }
        };

        let received = match &outcome {
            Ok(discount) => &discount.code,
            Err(rejection) => &rejection.code,
        };
        if !received.eq_ignore_ascii_case(pending) {
            return Err(DiscountError::StaleResult {
                pending: pending.to_string(),
                received: received.clone(),
            });
        }

        *self = match outcome {
            Ok(discount) => {
                info!(code = %discount.code, "Discount code applied");
                DiscountState::Applied { discount }
            }
            Err(rejection) => {
                info!(code = %rejection.code, reason = %rejection.reason, "Discount code rejected");
                DiscountState::Rejected { rejection }
            }
        };
        Ok(())
    }

    /// Acknowledges a rejection, returning to `Unapplied`.
    pub fn dismiss(&mut self) -> Result<(), DiscountError> {
        if !matches!(self, DiscountState::Rejected { .. }) {
            return Err(DiscountError::InvalidTransition {
                action: "dismiss",
                state: self.name(),
            });
        }
        *self = DiscountState::Unapplied;
        Ok(())
    }

    /// Removes any code (user action or order completion).
    pub fn clear(&mut self) {
        *self = DiscountState::Unapplied;
    }

    /// The code currently applied, if any.
    pub fn active_code(&self) -> Option<&DiscountCode> {
        match self {
            DiscountState::Applied { discount } => Some(discount),
            _ => None,
        }
    }

    /// The current rejection, if any.
    pub fn rejection(&self) -> Option<&DiscountRejected> {
        match self {
            DiscountState::Rejected { rejection } => Some(rejection),
            _ => None,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
