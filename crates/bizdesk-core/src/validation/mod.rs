//! # Validation Module
//!
//! Declarative per-entity schemas for incoming records.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Web forms (TypeScript)                                       │
//! │  ├── Basic format checks (empty, email)                                │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Request handler → THIS MODULE                                │
//! │  ├── Shape, type, enum membership, bounds                              │
//! │  ├── ALL violations of one record reported together                    │
//! │  └── Defaults applied, dates normalized to UTC                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Storage                                                      │
//! │  ├── NOT NULL / UNIQUE constraints (invoice numbers)                   │
//! │  └── Foreign key constraints (clientId, invoiceId, projectId)          │
//! │                                                                         │
//! │  Defense in depth: Multiple layers catch different errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modes
//! - [`Mode::Create`]: required fields must be present; defaults are applied.
//! - [`Mode::Partial`]: for updates. Absent fields are skipped and no defaults
//!   are applied; fields that are present follow the same rules.
//!
//! Unknown fields are dropped from the normalized record.
//!
//! ## Usage
//! ```rust
//! use bizdesk_core::validation::validate_client;
//! use bizdesk_core::ClientStatus;
//! use serde_json::json;
//!
//! let client = validate_client(&json!({ "name": "Acme Corp" })).unwrap();
//! assert_eq!(client.status, ClientStatus::Active);
//!
//! assert!(validate_client(&json!({})).is_err());
//! ```

mod fields;
mod schemas;

use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{Client, Contract, EntityKind, Invoice, InvoiceItem, Payment, Project, Task};
use fields::FieldReader;

pub use fields::is_valid_email;

/// Field name used for violations about the record as a whole.
pub const ROOT_FIELD: &str = "_root";

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Mode
// =============================================================================

/// Whether a record is being created or partially updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Create,
    Partial,
}

// =============================================================================
// Normalized Record
// =============================================================================

/// A validated record: defaults applied, optional-but-absent fields omitted,
/// dates in canonical UTC form.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    kind: EntityKind,
    mode: Mode,
    fields: Map<String, Value>,
}

impl NormalizedRecord {
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }

    /// Converts to the typed record.
    ///
    /// Only meaningful for [`Mode::Create`] output; a partial record usually
    /// lacks required fields and fails with [`CoreError::Malformed`].
    pub fn into_typed<T: DeserializeOwned>(self) -> CoreResult<T> {
        let entity = self.kind.label().to_string();
        serde_json::from_value(Value::Object(self.fields)).map_err(|e| CoreError::Malformed {
            entity,
            reason: e.to_string(),
        })
    }
}

impl Serialize for NormalizedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

// =============================================================================
// Entry Points
// =============================================================================

/// A typed record with a schema.
pub trait Record: DeserializeOwned {
    const KIND: EntityKind;
}

impl Record for Client {
    const KIND: EntityKind = EntityKind::Client;
}
impl Record for Invoice {
    const KIND: EntityKind = EntityKind::Invoice;
}
impl Record for InvoiceItem {
    const KIND: EntityKind = EntityKind::InvoiceItem;
}
impl Record for Payment {
    const KIND: EntityKind = EntityKind::Payment;
}
impl Record for Contract {
    const KIND: EntityKind = EntityKind::Contract;
}
impl Record for Project {
    const KIND: EntityKind = EntityKind::Project;
}
impl Record for Task {
    const KIND: EntityKind = EntityKind::Task;
}

fn schema_for(kind: EntityKind) -> fn(&mut FieldReader<'_>) {
    match kind {
        EntityKind::Client => schemas::client,
        EntityKind::Invoice => schemas::invoice,
        EntityKind::InvoiceItem => schemas::invoice_item,
        EntityKind::Payment => schemas::payment,
        EntityKind::Contract => schemas::contract,
        EntityKind::Project => schemas::project,
        EntityKind::Task => schemas::task,
    }
}

/// Validates a raw record against the schema for `kind`.
///
/// ## Returns
/// * `Ok(NormalizedRecord)` - every rule passed
/// * `Err(ValidationError)` - every violated rule, in schema order
///
/// ## Flow
/// ```text
/// raw JSON ──► object? ──no──► _root: "Expected object"
///                 │
///                 ▼
///          run every field rule (no early exit)
///                 │
///        ┌────────┴────────┐
///   violations         none
///        │                │
///        ▼                ▼
/// ValidationError   NormalizedRecord
/// ```
pub fn validate(kind: EntityKind, raw: &Value, mode: Mode) -> ValidationResult<NormalizedRecord> {
    let Some(source) = raw.as_object() else {
        debug!(entity = %kind, "Rejected non-object record");
        return Err(ValidationError::single(ROOT_FIELD, fields::EXPECTED_OBJECT));
    };

    let mut reader = FieldReader::new(source, mode);
    schema_for(kind)(&mut reader);
    let (fields, violations) = reader.finish();

    if let Some(err) = ValidationError::from_violations(violations) {
        debug!(entity = %kind, ?mode, violations = err.len(), "Record failed validation");
        return Err(err);
    }

    debug!(entity = %kind, ?mode, fields = fields.len(), "Record validated");
    Ok(NormalizedRecord { kind, mode, fields })
}

/// Validates a complete record and converts it to its typed form.
pub fn validate_record<T: Record>(raw: &Value) -> CoreResult<T> {
    validate(T::KIND, raw, Mode::Create)?.into_typed()
}

pub fn validate_client(raw: &Value) -> CoreResult<Client> {
    validate_record(raw)
}

/// Validates an invoice and each of its items.
///
/// Item violations are reported as `items[i].field`; an empty item list is
/// reported on `items`.
pub fn validate_invoice(raw: &Value) -> CoreResult<Invoice> {
    validate_record(raw)
}

pub fn validate_invoice_item(raw: &Value) -> CoreResult<InvoiceItem> {
    validate_record(raw)
}

pub fn validate_payment(raw: &Value) -> CoreResult<Payment> {
    validate_record(raw)
}

pub fn validate_contract(raw: &Value) -> CoreResult<Contract> {
    validate_record(raw)
}

pub fn validate_project(raw: &Value) -> CoreResult<Project> {
    validate_record(raw)
}

pub fn validate_task(raw: &Value) -> CoreResult<Task> {
    validate_record(raw)
}

// =============================================================================
// Unit Tests
// =============================================================================
