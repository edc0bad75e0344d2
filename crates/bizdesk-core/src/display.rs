//! # Display Formatting
//!
//! Renders amounts the way the web client shows them (en-US grouping).
//! The engine itself never rounds; rounding to cents happens only here.
//!
//! ```text
//! format_currency(1234.56, "USD")  →  $1,234.56
//! format_currency(-5.5, "USD")     →  -$5.50
//! format_currency(1234.56, "CHF")  →  CHF 1,234.56
//! format_number(1234567.0)         →  1,234,567
//! format_percent(12.34, 2)         →  12.34%
//! ```

use num_format::{Locale, ToFormattedString};

/// Currency code used when none is configured.
pub const DEFAULT_CURRENCY: &str = "USD";

fn symbol_for(code: &str) -> Option<&'static str> {
    match code {
        "USD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        _ => None,
    }
}

/// Splits `|value|` rounded to `places` decimals into whole and fractional
/// units, plus whether a minus sign is needed.
fn split_rounded(value: f64, places: u32) -> (bool, u64, u64) {
    let scale = 10u64.pow(places);
    let units = (value.abs() * scale as f64).round() as u64;
    (value < 0.0 && units != 0, units / scale, units % scale)
}

/// Amount with currency symbol, thousands separators and two decimals.
///
/// Unknown codes are written before the number, e.g. `CHF 10.00`.
pub fn format_currency(amount: f64, currency: &str) -> String {
    if !amount.is_finite() {
        return amount.to_string();
    }

    let (negative, whole, cents) = split_rounded(amount, 2);
    let sign = if negative { "-" } else { "" };
    let digits = format!("{}.{:02}", whole.to_formatted_string(&Locale::en), cents);
    match symbol_for(currency) {
        Some(symbol) => format!("{}{}{}", sign, symbol, digits),
        None => format!("{}{} {}", sign, currency, digits),
    }
}

/// Number with thousands separators and at most three decimals, trailing
/// zeros dropped.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let (negative, whole, fraction) = split_rounded(value, 3);
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&whole.to_formatted_string(&Locale::en));
    if fraction != 0 {
        let digits = format!("{:03}", fraction);
        out.push('.');
        out.push_str(digits.trim_end_matches('0'));
    }
    out
}

/// Percentage with a fixed number of decimals: `8.25` is `8.25%`.
pub fn format_percent(value: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, value)
}
