//! Property-based tests for bizdesk-core.
//!
//! These tests verify invariants hold for arbitrary inputs using proptest.
//!
//! Run with: cargo test -p bizdesk-core --test `property_tests`

use bizdesk_core::arithmetic::{
    compute_discount, compute_item_total, compute_subtotal, compute_tax, compute_total,
    InvoiceTotals,
};
use bizdesk_core::invoice::{generate_invoice_number, is_overdue, settle, settled_status};
use bizdesk_core::validation::{validate_client, validate_invoice};
use bizdesk_core::{ClientStatus, EntityKind, FixedClock, InvoiceStatus, Mode};
use chrono::{DateTime, Utc};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use regex::Regex;
use serde_json::json;

// ============================================================================
// Arbitrary generators
// ============================================================================

fn arb_amount() -> impl Strategy<Value = f64> {
    (0i64..10_000_000i64).prop_map(|cents| cents as f64 / 100.0)
}

fn arb_line() -> impl Strategy<Value = (f64, f64)> {
    ((1u32..500u32).prop_map(f64::from), arb_amount())
}

fn arb_lines() -> impl Strategy<Value = Vec<(f64, f64)>> {
    prop::collection::vec(arb_line(), 0..20)
}

fn arb_rate() -> impl Strategy<Value = f64> {
    (0u32..10_000u32).prop_map(|bps| f64::from(bps) / 100.0)
}

fn arb_instant() -> impl Strategy<Value = DateTime<Utc>> {
    (1_000_000_000_000i64..4_000_000_000_000i64)
        .prop_map(|ms| DateTime::from_timestamp_millis(ms).unwrap())
}

fn arb_status() -> impl Strategy<Value = InvoiceStatus> {
    prop_oneof![
        Just(InvoiceStatus::Draft),
        Just(InvoiceStatus::Sent),
        Just(InvoiceStatus::Paid),
        Just(InvoiceStatus::Overdue),
        Just(InvoiceStatus::Cancelled),
    ]
}

// ============================================================================
// Arithmetic Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Discount never exceeds the subtotal
    #[test]
    fn prop_discount_capped(subtotal in arb_amount(), discount in arb_amount()) {
        let applied = compute_discount(subtotal, discount);
        prop_assert!(applied <= subtotal);
        prop_assert!(applied >= 0.0);
        if discount <= subtotal {
            prop_assert_eq!(applied, discount);
        }
    }

    /// Total is floored at zero
    #[test]
    fn prop_total_non_negative(
        subtotal in arb_amount(),
        tax in arb_amount(),
        discount in -1_000_000.0f64..1_000_000.0f64
    ) {
        prop_assert!(compute_total(subtotal, tax, discount) >= 0.0);
    }

    /// Subtotal is the running sum of line totals
    #[test]
    fn prop_subtotal_matches_line_sum(lines in arb_lines()) {
        let mut expected = 0.0;
        for (quantity, unit_price) in &lines {
            expected += compute_item_total(*quantity, *unit_price);
        }
        prop_assert_eq!(compute_subtotal(&lines), expected);
        prop_assert!(compute_subtotal(&lines) >= 0.0);
    }

    /// Zero rate means zero tax
    #[test]
    fn prop_zero_rate_zero_tax(subtotal in arb_amount()) {
        prop_assert_eq!(compute_tax(subtotal, 0.0), 0.0);
    }

    /// Bundled totals agree with the individual functions
    #[test]
    fn prop_totals_bundle_consistent(
        lines in arb_lines(),
        rate in arb_rate(),
        discount in arb_amount()
    ) {
        let totals = InvoiceTotals::from_rate(&lines, rate, discount);
        let subtotal = compute_subtotal(&lines);
        let tax = compute_tax(subtotal, rate);
        let applied = compute_discount(subtotal, discount);

        prop_assert_eq!(totals.subtotal, subtotal);
        prop_assert_eq!(totals.tax, tax);
        prop_assert_eq!(totals.discount, applied);
        prop_assert_eq!(totals.total, compute_total(subtotal, tax, applied));
        prop_assert!(totals.total >= 0.0);
    }
}

// ============================================================================
// Invoice Rule Properties
// ============================================================================

proptest! {
    /// Closed invoices are never overdue
    #[test]
    fn prop_closed_never_overdue(due in arb_instant(), now in arb_instant()) {
        prop_assert!(!is_overdue(due, InvoiceStatus::Paid, now));
        prop_assert!(!is_overdue(due, InvoiceStatus::Cancelled, now));
    }

    /// Open invoices are overdue exactly when due < now
    #[test]
    fn prop_open_overdue_iff_past_due(
        due in arb_instant(),
        now in arb_instant(),
        status in arb_status()
    ) {
        if !status.is_closed() {
            prop_assert_eq!(is_overdue(due, status, now), due < now);
        }
    }

    /// Invoice numbers always have the PREFIX-<13 digits>-<3 digits> shape
    #[test]
    fn prop_invoice_number_shape(
        millis in 1_000_000_000_000i64..9_999_999_999_999i64,
        seed in any::<u64>(),
        prefix in "[A-Z]{1,6}"
    ) {
        let clock = FixedClock::from_millis(millis).unwrap();
        let number = generate_invoice_number(&prefix, &clock, &mut StdRng::seed_from_u64(seed));
        let pattern = Regex::new(&format!(r"^{}-\d{{13}}-\d{{3}}$", prefix)).unwrap();
        prop_assert!(pattern.is_match(&number), "bad number: {}", number);
    }

    /// Settlement marks PAID exactly when payments cover the total
    #[test]
    fn prop_settlement(total in arb_amount(), payments in prop::collection::vec(arb_amount(), 0..5)) {
        let settlement = settle(total, payments.iter().copied());
        prop_assert!(settlement.balance >= 0.0);
        prop_assert_eq!(settlement.fully_paid, settlement.paid >= total);
        let status = settled_status(InvoiceStatus::Sent, total, settlement.paid);
        prop_assert_eq!(status == InvoiceStatus::Paid, settlement.fully_paid);
    }
}

// ============================================================================
// Validation Properties
// ============================================================================

proptest! {
    /// Any non-blank name yields a valid client with the default status
    #[test]
    fn prop_client_name_only(name in "[A-Za-z][A-Za-z0-9 &.]{0,30}") {
        let client = validate_client(&json!({ "name": name })).unwrap();
        prop_assert_eq!(client.name, name.trim());
        prop_assert_eq!(client.status, ClientStatus::Active);
    }

    /// Blank names are always rejected on the name field
    #[test]
    fn prop_blank_name_rejected(name in "[ \t]{0,5}") {
        let err = bizdesk_core::validate(EntityKind::Client, &json!({ "name": name }), Mode::Create)
            .unwrap_err();
        prop_assert!(err.has_field("name"));
    }

    /// Every well-formed invoice validates and recomputes to a non-negative total
    #[test]
    fn prop_invoice_recompute(lines in prop::collection::vec(arb_line(), 1..8), tax in arb_amount()) {
        let items: Vec<_> = lines
            .iter()
            .map(|(quantity, unit_price)| json!({
                "description": "Line",
                "quantity": quantity,
                "unitPrice": unit_price,
                "total": 0
            }))
            .collect();
        let raw = json!({
            "clientId": "client-1",
            "issueDate": "2024-01-01",
            "dueDate": "2024-02-01",
            "subtotal": 0,
            "tax": tax,
            "total": 0,
            "items": items
        });

        let mut invoice = validate_invoice(&raw).unwrap();
        let totals = invoice.recompute_totals();
        prop_assert_eq!(totals.subtotal, compute_subtotal(&lines));
        prop_assert!(invoice.total >= 0.0);
        prop_assert_eq!(invoice.items.len(), lines.len());
    }
}
