//! # Invoice Arithmetic
//!
//! Pure functions deriving invoice amounts from line items.
//!
//! ## Derivation Chain
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     How an Invoice Total Is Built                       │
//! │                                                                         │
//! │  item.quantity × item.unitPrice ──► item.total                          │
//! │                                        │                                │
//! │                         Σ item.total ──► subtotal                       │
//! │                                        │                                │
//! │            ┌───────────────────────────┼──────────────────────┐         │
//! │            ▼                           │                      ▼         │
//! │  subtotal × rate / 100 ──► tax         │   min(amount, subtotal) ──►    │
//! │            │                           │          discount              │
//! │            └──────────────►  max(0, subtotal + tax − discount)          │
//! │                                        │                                │
//! │                                        ▼                                │
//! │                                      total                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Floating Point
//! Amounts are `f64` and no rounding is applied here. [`crate::display`] rounds to
//! two decimals. The operation order matches what the web client computes,
//! so both sides agree bit for bit.
//!
//! ## Usage
//! ```rust
//! use bizdesk_core::arithmetic::{compute_discount, compute_tax, compute_total};
//!
//! let tax = compute_tax(100.0, 10.0);
//! let discount = compute_discount(100.0, 250.0); // capped at the subtotal
//! assert_eq!(compute_total(100.0, tax, discount), 10.0);
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::InvoiceItem;

// =============================================================================
// Line Items
// =============================================================================

/// Anything priced as `quantity × unit price`.
pub trait LineAmount {
    fn quantity(&self) -> f64;
    fn unit_price(&self) -> f64;

    #[inline]
    fn line_total(&self) -> f64 {
        compute_item_total(self.quantity(), self.unit_price())
    }
}

impl LineAmount for InvoiceItem {
    #[inline]
    fn quantity(&self) -> f64 {
        self.quantity
    }

    #[inline]
    fn unit_price(&self) -> f64 {
        self.unit_price
    }
}

/// `(quantity, unit_price)`
impl LineAmount for (f64, f64) {
    #[inline]
    fn quantity(&self) -> f64 {
        self.0
    }

    #[inline]
    fn unit_price(&self) -> f64 {
        self.1
    }
}

impl<T: LineAmount + ?Sized> LineAmount for &T {
    #[inline]
    fn quantity(&self) -> f64 {
        (**self).quantity()
    }

    #[inline]
    fn unit_price(&self) -> f64 {
        (**self).unit_price()
    }
}

// =============================================================================
// Core Functions
// =============================================================================

#[inline]
pub fn compute_item_total(quantity: f64, unit_price: f64) -> f64 {
    quantity * unit_price
}

/// Sum of line totals. `0.0` for no items.
pub fn compute_subtotal<I>(items: I) -> f64
where
    I: IntoIterator,
    I::Item: LineAmount,
{
    // fold from +0.0: Iterator::sum starts at -0.0 for floats
    items
        .into_iter()
        .fold(0.0, |sum, item| sum + item.line_total())
}

/// Tax for a percentage rate: `8.25` means 8.25%.
#[inline]
pub fn compute_tax(subtotal: f64, tax_rate_percent: f64) -> f64 {
    subtotal * (tax_rate_percent / 100.0)
}

/// The discount actually applied. Never more than the subtotal.
#[inline]
pub fn compute_discount(subtotal: f64, discount_amount: f64) -> f64 {
    discount_amount.min(subtotal)
}

/// Grand total, floored at zero.
#[inline]
pub fn compute_total(subtotal: f64, tax: f64, discount: f64) -> f64 {
    (subtotal + tax - discount).max(0.0)
}

// =============================================================================
// Totals Bundle
// =============================================================================

/// Every derived amount of one invoice.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InvoiceTotals {
    pub subtotal: f64,
    pub tax: f64,
    /// Applied discount (after capping).
    pub discount: f64,
    pub total: f64,
}

impl InvoiceTotals {
    /// Totals with tax derived from a percentage rate.
    pub fn from_rate<I>(items: I, tax_rate_percent: f64, discount_amount: f64) -> Self
    where
        I: IntoIterator,
        I::Item: LineAmount,
    {
        let subtotal = compute_subtotal(items);
        Self::assemble(subtotal, compute_tax(subtotal, tax_rate_percent), discount_amount)
    }

    /// Totals with an absolute tax amount, as stored on an invoice.
    pub fn from_amounts<I>(items: I, tax_amount: f64, discount_amount: f64) -> Self
    where
        I: IntoIterator,
        I::Item: LineAmount,
    {
        Self::assemble(compute_subtotal(items), tax_amount, discount_amount)
    }

    fn assemble(subtotal: f64, tax: f64, discount_amount: f64) -> Self {
        let discount = compute_discount(subtotal, discount_amount);
        InvoiceTotals {
            subtotal,
            tax,
            discount,
            total: compute_total(subtotal, tax, discount),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn item(quantity: f64, unit_price: f64) -> InvoiceItem {
        InvoiceItem {
            description: "Line".to_string(),
            quantity,
            unit_price,
            total: 0.0,
        }
    }

    #[test]
    fn test_item_total() {
        assert_eq!(compute_item_total(5.0, 10.0), 50.0);
        assert_eq!(compute_item_total(2.0, 99.99), 199.98);
        assert_eq!(compute_item_total(10.0, 0.0), 0.0);
    }

    #[test]
    fn test_subtotal() {
        let items = [item(2.0, 10.0), item(3.0, 15.0), item(1.0, 50.0)];
        assert_eq!(compute_subtotal(&items), 115.0);
        assert_eq!(compute_subtotal(items.iter()), 115.0);
    }

    #[test]
    fn test_subtotal_of_nothing_is_positive_zero() {
        let total = compute_subtotal(Vec::<(f64, f64)>::new());
        assert_eq!(total, 0.0);
        assert!(total.is_sign_positive());
    }

    #[test]
    fn test_tax() {
        assert_eq!(compute_tax(100.0, 10.0), 10.0);
        assert_eq!(compute_tax(100.0, 0.0), 0.0);
        assert_eq!(compute_tax(250.0, 8.5), 21.25);
    }

    #[test]
    fn test_discount_is_capped() {
        assert_eq!(compute_discount(100.0, 10.0), 10.0);
        assert_eq!(compute_discount(200.0, 15.0), 15.0);
        assert_eq!(compute_discount(100.0, 0.0), 0.0);
        assert_eq!(compute_discount(50.0, 100.0), 50.0);
    }

    #[test]
    fn test_total() {
        assert_eq!(compute_total(100.0, 10.0, 5.0), 105.0);
        assert_eq!(compute_total(200.0, 20.0, 10.0), 210.0);
        assert_eq!(compute_total(100.0, 0.0, 0.0), 100.0);
    }

    #[test]
    fn test_total_never_negative() {
        assert_eq!(compute_total(10.0, 0.0, 50.0), 0.0);
    }

    #[test]
    fn test_totals_from_rate() {
        let items = [(2.0, 10.0), (3.0, 15.0), (1.0, 50.0)];
        let totals = InvoiceTotals::from_rate(&items, 10.0, 5.0);
        assert_eq!(
            totals,
            InvoiceTotals {
                subtotal: 115.0,
                tax: 11.5,
                discount: 5.0,
                total: 121.5,
            }
        );
    }

    #[test]
    fn test_totals_from_amounts_caps_discount() {
        let totals = InvoiceTotals::from_amounts([(1.0, 40.0)], 4.0, 100.0);
        assert_eq!(totals.discount, 40.0);
        assert_eq!(totals.total, 4.0);
    }

    #[test]
    fn test_totals_serialize_camel_case() {
        let json = serde_json::to_value(InvoiceTotals::from_rate([(1.0, 10.0)], 0.0, 0.0)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "subtotal": 10.0, "tax": 0.0, "discount": 0.0, "total": 10.0 })
        );
    }
}
