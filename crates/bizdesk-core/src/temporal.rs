//! # Date Normalization
//!
//! Temporal fields arrive as strings. They are normalized to one internal
//! type, `DateTime<Utc>`, at the validation boundary and never carried as
//! "string or date" past it.
//!
//! ## Accepted Forms
//! ```text
//! 2024-01-15T12:00:00Z          RFC 3339, any offset      → converted to UTC
//! 2024-01-15T12:00:00.250+02:00
//! 2024-01-15                    calendar date             → 00:00:00 UTC
//! 2024-01-15T14:30:00           no offset                 → taken as UTC
//! 2024-01-15T14:30
//! ```

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};

use crate::error::{CoreError, CoreResult};

const NAIVE_DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Parses a date string into a UTC timestamp.
///
/// Returns `None` for anything unparseable, including empty strings.
///
/// ## Example
/// ```rust
/// use bizdesk_core::temporal::parse_date;
///
/// let due = parse_date("2020-01-01").unwrap();
/// assert_eq!(due.to_rfc3339(), "2020-01-01T00:00:00+00:00");
/// assert!(parse_date("next tuesday").is_none());
/// ```
pub fn parse_date(input: &str) -> Option<DateTime<Utc>> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|naive| Utc.from_utc_datetime(&naive));
    }

    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// [`parse_date`] for callers that must have a date.
pub fn require_date(input: &str) -> CoreResult<DateTime<Utc>> {
    parse_date(input).ok_or_else(|| CoreError::InvalidDate(input.to_string()))
}

/// Canonical text form stored in normalized records.
///
/// Millisecond precision with a `Z` suffix, e.g. `2024-01-15T12:00:00.000Z`.
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    #[test]
    fn test_parse_rfc3339() {
        assert_eq!(
            parse_date("2024-01-15T12:00:00Z"),
            Some(utc(2024, 1, 15, 12, 0, 0))
        );
        assert_eq!(
            parse_date("2024-01-15T14:00:00+02:00"),
            Some(utc(2024, 1, 15, 12, 0, 0))
        );
    }

    #[test]
    fn test_parse_calendar_date_is_midnight_utc() {
        assert_eq!(parse_date("2020-01-01"), Some(utc(2020, 1, 1, 0, 0, 0)));
        assert_eq!(parse_date("  2020-01-01 "), Some(utc(2020, 1, 1, 0, 0, 0)));
    }

    #[test]
    fn test_parse_naive_datetime_as_utc() {
        assert_eq!(
            parse_date("2024-01-15T14:30:00"),
            Some(utc(2024, 1, 15, 14, 30, 0))
        );
        assert_eq!(
            parse_date("2024-01-15T14:30"),
            Some(utc(2024, 1, 15, 14, 30, 0))
        );
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(parse_date("").is_none());
        assert!(parse_date("tomorrow").is_none());
        assert!(parse_date("2024-13-01").is_none());
        assert!(parse_date("2024-02-30").is_none());
    }

    #[test]
    fn test_require_date() {
        assert_eq!(require_date("2020-01-01").unwrap(), utc(2020, 1, 1, 0, 0, 0));
        let err = require_date("soon").unwrap_err();
        assert!(matches!(err, CoreError::InvalidDate(ref s) if s == "soon"));
        assert_eq!(err.status_hint(), 400);
    }

    #[test]
    fn test_format_round_trips_through_serde() {
        let date = utc(2024, 6, 20, 12, 0, 0);
        let text = format_date(&date);
        assert_eq!(text, "2024-06-20T12:00:00.000Z");

        let back: DateTime<Utc> = serde_json::from_value(serde_json::json!(text)).unwrap();
        assert_eq!(back, date);
    }
}
