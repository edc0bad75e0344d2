//! # Invoice Rules
//!
//! Numbering, due-date checks, payment settlement and server-side
//! recomputation of a validated invoice.
//!
//! ## Invoice Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   DRAFT ──send──► SENT ──due date passes──► OVERDUE                     │
//! │     │               │                          │                        │
//! │     │               └──── Σ payments ≥ total ──┴──► PAID                │
//! │     │                                                                   │
//! │     └──────────────────── cancel ─────────────────► CANCELLED           │
//! │                                                                         │
//! │   PAID and CANCELLED are closed: never overdue.                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Time and randomness come in as parameters ([`Clock`], [`rand::Rng`]) so
//! every function here is deterministic under test.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::arithmetic::{compute_item_total, compute_subtotal, compute_tax, InvoiceTotals};
use crate::clock::{Clock, SystemClock};
use crate::error::{FieldViolation, ValidationError};
use crate::temporal::parse_date;
use crate::types::{Invoice, InvoiceStatus};
use crate::{DEFAULT_INVOICE_PREFIX, INVOICE_SUFFIX_RANGE};

// =============================================================================
// Numbering
// =============================================================================

/// Generates an invoice number: `{prefix}-{epoch millis}-{000..999}`.
///
/// ## Uniqueness
/// Two calls in the same millisecond that draw the same suffix collide.
/// Callers that need strict uniqueness must enforce it in storage (unique
/// constraint plus retry).
///
/// ## Example
/// ```rust
/// use bizdesk_core::invoice::generate_invoice_number;
/// use bizdesk_core::FixedClock;
/// use rand::rngs::mock::StepRng;
///
/// let clock = FixedClock::from_millis(1_700_000_000_000).unwrap();
/// let number = generate_invoice_number("INV", &clock, &mut StepRng::new(0, 0));
/// assert_eq!(number, "INV-1700000000000-000");
/// ```
pub fn generate_invoice_number<C, R>(prefix: &str, clock: &C, rng: &mut R) -> String
where
    C: Clock + ?Sized,
    R: Rng + ?Sized,
{
    let millis = clock.now().timestamp_millis();
    let suffix = rng.gen_range(0..INVOICE_SUFFIX_RANGE);
    format!("{}-{}-{:03}", prefix, millis, suffix)
}

/// [`generate_invoice_number`] with the `INV` prefix, wall clock and thread RNG.
pub fn generate_default_invoice_number() -> String {
    generate_invoice_number(DEFAULT_INVOICE_PREFIX, &SystemClock, &mut rand::thread_rng())
}

// =============================================================================
// Due Dates
// =============================================================================

/// True when the invoice is still open and its due date is strictly before
/// `now`.
pub fn is_overdue(due: DateTime<Utc>, status: InvoiceStatus, now: DateTime<Utc>) -> bool {
    !status.is_closed() && due < now
}

/// [`is_overdue`] for a date string. Unparseable dates are never overdue.
pub fn is_overdue_str(due: &str, status: InvoiceStatus, now: DateTime<Utc>) -> bool {
    parse_date(due).is_some_and(|due| is_overdue(due, status, now))
}

/// Status to display: open invoices past their due date read as OVERDUE.
pub fn effective_status(
    status: InvoiceStatus,
    due: DateTime<Utc>,
    now: DateTime<Utc>,
) -> InvoiceStatus {
    if is_overdue(due, status, now) {
        InvoiceStatus::Overdue
    } else {
        status
    }
}

// =============================================================================
// Settlement
// =============================================================================

/// Outcome of applying recorded payments to an invoice total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Settlement {
    /// Sum of all payments.
    pub paid: f64,
    /// Amount still owed, never negative.
    pub balance: f64,
    pub fully_paid: bool,
}

/// Sums payment amounts against an invoice total.
///
/// ```text
/// payments: [400, 600]   total: 1000   →  paid 1000, balance 0, fully paid
/// payments: [250]        total: 1000   →  paid 250,  balance 750
/// ```
pub fn settle<I>(invoice_total: f64, payments: I) -> Settlement
where
    I: IntoIterator<Item = f64>,
{
    let paid = payments.into_iter().fold(0.0, |sum, amount| sum + amount);
    let settlement = Settlement {
        paid,
        balance: (invoice_total - paid).max(0.0),
        fully_paid: paid >= invoice_total,
    };
    debug!(
        invoice_total,
        paid,
        fully_paid = settlement.fully_paid,
        "Settled payments"
    );
    settlement
}

/// Status after payments: PAID once payments cover the total, otherwise
/// unchanged.
pub fn settled_status(current: InvoiceStatus, invoice_total: f64, paid: f64) -> InvoiceStatus {
    if paid >= invoice_total {
        InvoiceStatus::Paid
    } else {
        current
    }
}

// =============================================================================
// Recomputation
// =============================================================================

impl Invoice {
    /// Recomputes every derived amount from the line items.
    ///
    /// Client-sent item totals, subtotal and total are overwritten. `tax` is
    /// kept as an absolute amount; `discount` is capped at the subtotal.
    pub fn recompute_totals(&mut self) -> InvoiceTotals {
        let tax = self.tax;
        self.apply_totals(|_| tax)
    }

    /// Like [`Invoice::recompute_totals`], with tax derived from a percentage
    /// rate of the new subtotal.
    pub fn recompute_totals_with_rate(&mut self, tax_rate_percent: f64) -> InvoiceTotals {
        self.apply_totals(|subtotal| compute_tax(subtotal, tax_rate_percent))
    }

    fn apply_totals(&mut self, tax_for: impl FnOnce(f64) -> f64) -> InvoiceTotals {
        for item in &mut self.items {
            item.total = compute_item_total(item.quantity, item.unit_price);
        }

        let tax = tax_for(compute_subtotal(&self.items));
        let totals = InvoiceTotals::from_amounts(&self.items, tax, self.discount);
        debug!(
            items = self.items.len(),
            subtotal = totals.subtotal,
            total = totals.total,
            "Recomputed invoice totals"
        );

        self.subtotal = totals.subtotal;
        self.tax = totals.tax;
        self.discount = totals.discount;
        self.total = totals.total;
        totals
    }

    /// True when this invoice is past due at `now`.
    pub fn is_overdue_at(&self, now: DateTime<Utc>) -> bool {
        is_overdue(self.due_date, self.status, now)
    }

    /// Rejects derived amounts that overflowed `f64`.
    ///
    /// Each input passes validation on its own, but `quantity × unitPrice` or
    /// the running subtotal can still reach infinity. JSON has no infinity,
    /// so such an invoice would serialize its amounts as `null`.
    pub fn check_amounts(&self) -> Result<(), ValidationError> {
        let mut violations: Vec<FieldViolation> = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| !item.total.is_finite())
            .map(|(index, _)| {
                FieldViolation::new(format!("items[{}].total", index), AMOUNT_OUT_OF_RANGE)
            })
            .collect();

        for (field, amount) in [
            ("subtotal", self.subtotal),
            ("tax", self.tax),
            ("total", self.total),
        ] {
            if !amount.is_finite() {
                violations.push(FieldViolation::new(field, AMOUNT_OUT_OF_RANGE));
            }
        }

        match ValidationError::from_violations(violations) {
            Some(err) => {
                debug!(violations = err.len(), "Invoice amounts out of range");
                Err(err)
            }
            None => Ok(()),
        }
    }
}

const AMOUNT_OUT_OF_RANGE: &str = "Amount is too large";

// =============================================================================
// Unit Tests
// =============================================================================
