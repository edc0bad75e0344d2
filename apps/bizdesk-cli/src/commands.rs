//! # Command Handlers
//!
//! Each handler takes already-read input and returns a [`Report`]; `main`
//! owns printing and the process exit code.
//!
//! ## Exit Codes
//! ```text
//! 0  success
//! 1  unreadable input, malformed JSON, bad configuration
//! 2  the record was read but broke one or more validation rules
//! ```

use anyhow::{ensure, Context, Result};
use rand::Rng;
use serde_json::{json, Value};
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

use bizdesk_core::invoice::{effective_status, generate_invoice_number, is_overdue_str};
use bizdesk_core::temporal::require_date;
use bizdesk_core::validation::{validate, Mode};
use bizdesk_core::{
    Clock, CoreError, EntityKind, FieldViolation, FixedClock, Invoice, InvoiceStatus, SystemClock,
};

pub const EXIT_REJECTED: i32 = 2;

// =============================================================================
// Report
// =============================================================================

/// What a command produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    /// Printed to stdout.
    Accepted(Value),
    /// Violations printed to stdout; the process exits with [`EXIT_REJECTED`].
    Rejected(Vec<FieldViolation>),
}

impl Report {
    pub fn exit_code(&self) -> i32 {
        match self {
            Report::Accepted(_) => 0,
            Report::Rejected(_) => EXIT_REJECTED,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Report::Accepted(value) => value.clone(),
            Report::Rejected(violations) => json!({ "violations": violations }),
        }
    }
}

// =============================================================================
// Input
// =============================================================================

/// Reads a whole document from a file, or stdin for `None` / `-`.
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) if p != Path::new("-") => std::fs::read_to_string(p)
            .with_context(|| format!("Failed to read {}", p.display())),
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}

/// Wall clock, or a fixed instant from `--at`.
pub fn clock_at(at: Option<&str>) -> Result<Box<dyn Clock>, CoreError> {
    Ok(match at {
        Some(at) => Box::new(FixedClock::new(require_date(at)?)),
        None => Box::new(SystemClock),
    })
}

fn parse_json(input: &str) -> Result<Value> {
    serde_json::from_str(input).context("Input is not valid JSON")
}

// =============================================================================
// validate
// =============================================================================

/// `bizdesk validate <entity> [--partial]`
pub fn validate_record(kind: EntityKind, mode: Mode, input: &str) -> Result<Report> {
    let raw = parse_json(input)?;
    Ok(match validate(kind, &raw, mode) {
        Ok(record) => Report::Accepted(record.into_value()),
        Err(err) => Report::Rejected(err.into_violations()),
    })
}

// =============================================================================
// totals
// =============================================================================

/// Tax and discount choices for `bizdesk totals`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TotalsOptions {
    /// `--tax-rate`: always wins over the invoice's tax amount.
    pub tax_rate: Option<f64>,
    /// `--discount`: replaces the invoice's discount amount.
    pub discount: Option<f64>,
    /// Configured rate, used only when the invoice carries no `tax`.
    pub default_tax_rate: f64,
}

/// `bizdesk totals`: validates an invoice and recomputes it server-side.
pub fn invoice_totals(input: &str, options: TotalsOptions, clock: &dyn Clock) -> Result<Report> {
    let raw = parse_json(input)?;
    let has_tax = raw.get("tax").is_some_and(|tax| !tax.is_null());

    let record = match validate(EntityKind::Invoice, &raw, Mode::Create) {
        Ok(record) => record,
        Err(err) => return Ok(Report::Rejected(err.into_violations())),
    };
    let mut invoice: Invoice = record.into_typed()?;

    if let Some(rate) = options.tax_rate {
        ensure!(
            rate.is_finite() && rate >= 0.0,
            "--tax-rate must be a non-negative percentage, got {}",
            rate
        );
    }
    if let Some(discount) = options.discount {
        ensure!(
            discount.is_finite() && discount >= 0.0,
            "--discount must be a non-negative amount, got {}",
            discount
        );
        invoice.discount = discount;
    }

    let rate = match options.tax_rate {
        Some(rate) => Some(rate),
        None if !has_tax && options.default_tax_rate > 0.0 => Some(options.default_tax_rate),
        None => None,
    };
    let totals = match rate {
        Some(rate) => {
            debug!(rate, "Applying tax rate");
            invoice.recompute_totals_with_rate(rate)
        }
        None => invoice.recompute_totals(),
    };
    if let Err(err) = invoice.check_amounts() {
        warn!(violations = err.len(), "Recomputed totals overflowed");
        return Ok(Report::Rejected(err.into_violations()));
    }

    let status = effective_status(invoice.status, invoice.due_date, clock.now());
    Ok(Report::Accepted(json!({
        "invoice": invoice,
        "totals": totals,
        "effectiveStatus": status,
    })))
}

// =============================================================================
// number
// =============================================================================

/// `bizdesk number`
pub fn invoice_number<R: Rng + ?Sized>(prefix: &str, clock: &dyn Clock, rng: &mut R) -> String {
    generate_invoice_number(prefix, clock, rng)
}

// =============================================================================
// overdue
// =============================================================================

/// `bizdesk overdue <DUE_DATE> <STATUS>`
pub fn overdue(due: &str, status: &str, clock: &dyn Clock) -> Result<bool, CoreError> {
    let status: InvoiceStatus = status.parse()?;
    if bizdesk_core::temporal::parse_date(due).is_none() {
        warn!(due, "Unparseable due date, treating as not overdue");
    }
    Ok(is_overdue_str(due, status, clock.now()))
}
