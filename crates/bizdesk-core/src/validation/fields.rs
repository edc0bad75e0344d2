//! Field-level rule primitives.
//!
//! A [`FieldReader`] walks one raw JSON object. Each rule method reads one
//! field, records a violation if the value breaks the rule, and otherwise
//! copies the normalized value into the output map. Nothing short-circuits:
//! a schema calls every rule, so one pass reports every violation.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use super::Mode;
use crate::error::FieldViolation;
use crate::temporal::{format_date, parse_date};
use crate::types::ClosedEnum;

pub(crate) const REQUIRED: &str = "Required";
pub(crate) const EXPECTED_STRING: &str = "Expected string";
pub(crate) const EXPECTED_NUMBER: &str = "Expected number";
pub(crate) const EXPECTED_ARRAY: &str = "Expected array";
pub(crate) const EXPECTED_OBJECT: &str = "Expected object";
pub(crate) const EXPECTED_DATE: &str = "Expected date";
pub(crate) const INVALID_DATE: &str = "Invalid date";
pub(crate) const INVALID_EMAIL: &str = "Invalid email";

// Same shape the web forms accept: local@domain.tld, no whitespace,
// no consecutive dots, alphabetic TLD of 2+ characters.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9_'+\-]+(?:\.[A-Za-z0-9_'+\-]+)*@(?:[A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?\.)+[A-Za-z]{2,}$",
    )
    .expect("email pattern is valid")
});

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// Lower bound on a numeric field, with the message reported when it fails.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Min {
    pub value: f64,
    pub message: &'static str,
}

impl Min {
    pub const fn new(value: f64, message: &'static str) -> Self {
        Min { value, message }
    }
}

pub(crate) const NON_NEGATIVE: Min = Min::new(0.0, "Must be greater than or equal to 0");

pub(crate) struct FieldReader<'a> {
    source: &'a Map<String, Value>,
    mode: Mode,
    prefix: String,
    normalized: Map<String, Value>,
    violations: Vec<FieldViolation>,
}

impl<'a> FieldReader<'a> {
    pub fn new(source: &'a Map<String, Value>, mode: Mode) -> Self {
        Self::nested(source, mode, String::new())
    }

    fn nested(source: &'a Map<String, Value>, mode: Mode, prefix: String) -> Self {
        FieldReader {
            source,
            mode,
            prefix,
            normalized: Map::new(),
            violations: Vec::new(),
        }
    }

    pub fn finish(self) -> (Map<String, Value>, Vec<FieldViolation>) {
        (self.normalized, self.violations)
    }

    // -------------------------------------------------------------------------
    // Plumbing
    // -------------------------------------------------------------------------

    /// `null` counts as absent.
    fn lookup(&self, name: &str) -> Option<&'a Value> {
        match self.source.get(name) {
            None | Some(Value::Null) => None,
            Some(value) => Some(value),
        }
    }

    fn violate(&mut self, name: &str, message: impl Into<String>) {
        self.violations
            .push(FieldViolation::new(format!("{}{}", self.prefix, name), message));
    }

    /// Absent field: a violation when creating, nothing when patching.
    fn missing(&mut self, name: &str, message: &str) {
        if self.mode == Mode::Create {
            self.violate(name, message);
        }
    }

    fn put(&mut self, name: &str, value: Value) {
        self.normalized.insert(name.to_string(), value);
    }

    fn applies_defaults(&self) -> bool {
        self.mode == Mode::Create
    }

    // -------------------------------------------------------------------------
    // Strings
    // -------------------------------------------------------------------------

    /// Non-empty (after trimming) string. `message` is reported when the field
    /// is absent or blank.
    pub fn required_str(&mut self, name: &str, message: &'static str) {
        match self.lookup(name) {
            None => self.missing(name, message),
            Some(Value::String(s)) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    self.violate(name, message);
                } else {
                    self.put(name, Value::String(trimmed.to_string()));
                }
            }
            Some(_) => self.violate(name, EXPECTED_STRING),
        }
    }

    /// Optional string. Blank counts as absent and is omitted.
    pub fn optional_str(&mut self, name: &str) {
        if let Some(value) = self.optional_trimmed(name) {
            self.put(name, Value::String(value));
        }
    }

    /// Optional string that must look like an email address when non-blank.
    pub fn optional_email(&mut self, name: &str) {
        if let Some(value) = self.optional_trimmed(name) {
            if is_valid_email(&value) {
                self.put(name, Value::String(value));
            } else {
                self.violate(name, INVALID_EMAIL);
            }
        }
    }

    fn optional_trimmed(&mut self, name: &str) -> Option<String> {
        match self.lookup(name) {
            None => None,
            Some(Value::String(s)) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Some(_) => {
                self.violate(name, EXPECTED_STRING);
                None
            }
        }
    }

    // -------------------------------------------------------------------------
    // Numbers
    // -------------------------------------------------------------------------

    pub fn required_number(&mut self, name: &str, min: Option<Min>) {
        match self.lookup(name) {
            None => self.missing(name, REQUIRED),
            Some(value) => self.check_number(name, value, min),
        }
    }

    pub fn optional_number(&mut self, name: &str, min: Option<Min>) {
        if let Some(value) = self.lookup(name) {
            self.check_number(name, value, min);
        }
    }

    /// Number that falls back to `default` when absent (create mode only).
    pub fn number_or(&mut self, name: &str, default: f64, min: Option<Min>) {
        match self.lookup(name) {
            None if self.applies_defaults() => self.put(name, Value::from(default)),
            None => {}
            Some(value) => self.check_number(name, value, min),
        }
    }

    fn check_number(&mut self, name: &str, value: &Value, min: Option<Min>) {
        let Some(n) = value.as_f64().filter(|n| n.is_finite()) else {
            self.violate(name, EXPECTED_NUMBER);
            return;
        };
        match min {
            Some(bound) if n < bound.value => self.violate(name, bound.message),
            _ => self.put(name, value.clone()),
        }
    }

    // -------------------------------------------------------------------------
    // Enums
    // -------------------------------------------------------------------------

    /// Closed-enum field that must be present.
    pub fn required_enum<E: ClosedEnum>(&mut self, name: &str) {
        match self.lookup(name) {
            None => self.missing(name, REQUIRED),
            Some(value) => self.check_enum::<E>(name, value),
        }
    }

    /// Closed-enum field that falls back to `E::default()` (create mode only).
    pub fn enum_or_default<E: ClosedEnum + Default>(&mut self, name: &str) {
        match self.lookup(name) {
            None if self.applies_defaults() => {
                self.put(name, Value::String(E::default().as_str().to_string()))
            }
            None => {}
            Some(value) => self.check_enum::<E>(name, value),
        }
    }

    fn check_enum<E: ClosedEnum>(&mut self, name: &str, value: &Value) {
        if let Some(member) = value.as_str().and_then(E::from_wire) {
            self.put(name, Value::String(member.as_str().to_string()));
            return;
        }
        let expected = E::ALL
            .iter()
            .map(|m| format!("'{}'", m.as_str()))
            .collect::<Vec<_>>()
            .join(" | ");
        let received = match value {
            Value::String(s) => format!("'{}'", s),
            other => other.to_string(),
        };
        self.violate(
            name,
            format!("Invalid enum value. Expected {}, received {}", expected, received),
        );
    }

    // -------------------------------------------------------------------------
    // Dates
    // -------------------------------------------------------------------------

    pub fn required_date(&mut self, name: &str) {
        match self.lookup(name) {
            None => self.missing(name, REQUIRED),
            Some(value) => self.check_date(name, value),
        }
    }

    pub fn optional_date(&mut self, name: &str) {
        if let Some(value) = self.lookup(name) {
            self.check_date(name, value);
        }
    }

    fn check_date(&mut self, name: &str, value: &Value) {
        let Value::String(s) = value else {
            self.violate(name, EXPECTED_DATE);
            return;
        };
        match parse_date(s) {
            Some(date) => self.put(name, Value::String(format_date(&date))),
            None => self.violate(name, INVALID_DATE),
        }
    }

    // -------------------------------------------------------------------------
    // Nested Lists
    // -------------------------------------------------------------------------

    /// Array of nested records, each checked by `schema` in create mode.
    ///
    /// An empty array is reported on the list field itself with `empty_message`.
    /// Nested violations are path-qualified: `items[2].quantity`.
    pub fn nested_list(
        &mut self,
        name: &str,
        empty_message: &'static str,
        schema: fn(&mut FieldReader<'_>),
    ) {
        let elements = match self.lookup(name) {
            None => return self.missing(name, REQUIRED),
            Some(Value::Array(elements)) => elements,
            Some(_) => return self.violate(name, EXPECTED_ARRAY),
        };

        if elements.is_empty() {
            self.violate(name, empty_message);
            return;
        }

        let mut normalized = Vec::with_capacity(elements.len());
        let mut clean = true;
        for (index, element) in elements.iter().enumerate() {
            let path = format!("{}{}[{}]", self.prefix, name, index);
            let Value::Object(fields) = element else {
                self.violations
                    .push(FieldViolation::new(path, EXPECTED_OBJECT));
                clean = false;
                continue;
            };

            // Elements replace the stored list wholesale, so they are always
            // checked as complete records.
            let mut child = FieldReader::nested(fields, Mode::Create, format!("{}.", path));
            schema(&mut child);
            let (record, violations) = child.finish();
            if violations.is_empty() {
                normalized.push(Value::Object(record));
            } else {
                clean = false;
                self.violations.extend(violations);
            }
        }

        if clean {
            self.put(name, Value::Array(normalized));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ClientStatus;
    use serde_json::json;

    fn read(raw: Value, mode: Mode, rules: impl FnOnce(&mut FieldReader<'_>)) -> (Value, Vec<FieldViolation>) {
        let source = raw.as_object().cloned().unwrap_or_default();
        let mut reader = FieldReader::new(&source, mode);
        rules(&mut reader);
        let (normalized, violations) = reader.finish();
        (Value::Object(normalized), violations)
    }

    #[test]
    fn test_email_pattern() {
        assert!(is_valid_email("contact@acme.com"));
        assert!(is_valid_email("first.last+tag@mail.example.co.uk"));
        assert!(!is_valid_email("invalid-email"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@acme.com"));
        assert!(!is_valid_email("a..b@acme.com"));
    }

    #[test]
    fn test_required_string_trims_and_rejects_blank() {
        let (out, violations) = read(json!({ "name": "  Acme  " }), Mode::Create, |r| {
            r.required_str("name", "Name is required")
        });
        assert!(violations.is_empty());
        assert_eq!(out, json!({ "name": "Acme" }));

        let (_, violations) = read(json!({ "name": "   " }), Mode::Create, |r| {
            r.required_str("name", "Name is required")
        });
        assert_eq!(violations, vec![FieldViolation::new("name", "Name is required")]);
    }

    #[test]
    fn test_wrong_types_are_reported() {
        let (_, violations) = read(
            json!({ "name": 5, "quantity": "2", "due": 17, "items": {} }),
            Mode::Create,
            |r| {
                r.required_str("name", "Name is required");
                r.required_number("quantity", None);
                r.required_date("due");
                r.nested_list("items", "At least one item is required", |_| {});
            },
        );
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![EXPECTED_STRING, EXPECTED_NUMBER, EXPECTED_DATE, EXPECTED_ARRAY]
        );
    }

    #[test]
    fn test_null_is_absent() {
        let (out, violations) = read(json!({ "notes": null }), Mode::Create, |r| {
            r.optional_str("notes")
        });
        assert!(violations.is_empty());
        assert_eq!(out, json!({}));
    }

    #[test]
    fn test_enum_message_lists_allowed_members() {
        let (_, violations) = read(json!({ "status": "active" }), Mode::Create, |r| {
            r.enum_or_default::<ClientStatus>("status")
        });
        assert_eq!(
            violations[0].message,
            "Invalid enum value. Expected 'ACTIVE' | 'INACTIVE' | 'ARCHIVED', received 'active'"
        );
    }

    #[test]
    fn test_partial_mode_skips_absent_and_defaults() {
        let (out, violations) = read(json!({}), Mode::Partial, |r| {
            r.required_str("name", "Name is required");
            r.enum_or_default::<ClientStatus>("status");
            r.number_or("tax", 0.0, Some(NON_NEGATIVE));
        });
        assert!(violations.is_empty());
        assert_eq!(out, json!({}));
    }

    #[test]
    fn test_min_bound() {
        let (_, violations) = read(json!({ "quantity": 0.5 }), Mode::Create, |r| {
            r.required_number("quantity", Some(Min::new(1.0, "Quantity must be at least 1")))
        });
        assert_eq!(violations[0].message, "Quantity must be at least 1");
    }

    #[test]
    fn test_nested_paths() {
        let (_, violations) = read(
            json!({ "items": [{ "n": 1 }, 7, { "n": "x" }] }),
            Mode::Create,
            |r| {
                r.nested_list("items", "At least one item is required", |child| {
                    child.required_number("n", None)
                })
            },
        );
        let fields: Vec<_> = violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["items[1]", "items[2].n"]);
    }
}
