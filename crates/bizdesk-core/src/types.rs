//! # Domain Types
//!
//! Normalized records and closed enums used throughout Bizdesk.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Client      │   │     Invoice     │   │    Payment      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  name           │◄──│  clientId       │◄──│  invoiceId      │       │
//! │  │  email?         │   │  issue/dueDate  │   │  amount > 0     │       │
//! │  │  status         │   │  items[1..]     │   │  method         │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │          ▲                                                              │
//! │  ┌───────┴─────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Contract     │   │     Project     │◄──│      Task       │       │
//! │  │  title, value?  │   │  name, budget?  │   │  title, priority│       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! - Record fields are camelCase (`clientId`, `unitPrice`, `zipCode`)
//! - Enum members are SCREAMING_SNAKE_CASE (`IN_PROGRESS`, `BANK_TRANSFER`)
//! - Optional fields are omitted when absent, never `null`
//! - Dates are RFC 3339 UTC timestamps

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::CoreError;

// =============================================================================
// Closed Enums
// =============================================================================

/// A field whose valid values are an exhaustive, fixed list.
///
/// The validator uses this to check membership against the raw string and to
/// report the allowed values when it fails.
pub trait ClosedEnum: Copy + Sized + 'static {
    /// Every member, in declaration order.
    const ALL: &'static [Self];

    /// Wire name of the member (`"IN_PROGRESS"`).
    fn as_str(&self) -> &'static str;

    /// Exact, case-sensitive lookup by wire name.
    fn from_wire(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|m| m.as_str() == value)
    }
}

macro_rules! closed_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident ($kind:literal) {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
        #[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
        #[ts(export)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $wire)]
                #[cfg_attr(feature = "sqlx", sqlx(rename = $wire))]
                $variant,
            )+
        }

        impl ClosedEnum for $name {
            const ALL: &'static [Self] = &[$($name::$variant),+];

            fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$name as ClosedEnum>::from_wire(s).ok_or_else(|| CoreError::UnknownVariant {
                    kind: $kind,
                    value: s.to_string(),
                })
            }
        }
    };
}

closed_enum! {
    /// Lifecycle of a client relationship.
    #[derive(Default)]
    pub enum ClientStatus ("client status") {
        #[default]
        Active => "ACTIVE",
        Inactive => "INACTIVE",
        Archived => "ARCHIVED",
    }
}

closed_enum! {
    /// The status of an invoice.
    ///
    /// ```text
    /// DRAFT ──► SENT ──► PAID
    ///             │
    ///             └──► OVERDUE ──► PAID
    /// (any) ──► CANCELLED
    /// ```
    #[derive(Default)]
    pub enum InvoiceStatus ("invoice status") {
        #[default]
        Draft => "DRAFT",
        Sent => "SENT",
        Paid => "PAID",
        Overdue => "OVERDUE",
        Cancelled => "CANCELLED",
    }
}

impl InvoiceStatus {
    /// Closed invoices are never overdue and never change from payments.
    #[inline]
    pub const fn is_closed(&self) -> bool {
        matches!(self, InvoiceStatus::Paid | InvoiceStatus::Cancelled)
    }
}

closed_enum! {
    /// How a payment was made. Required on every payment; no default.
    pub enum PaymentMethod ("payment method") {
        Cash => "CASH",
        Check => "CHECK",
        CreditCard => "CREDIT_CARD",
        BankTransfer => "BANK_TRANSFER",
        Paypal => "PAYPAL",
        Other => "OTHER",
    }
}

closed_enum! {
    #[derive(Default)]
    pub enum ContractStatus ("contract status") {
        #[default]
        Draft => "DRAFT",
        Active => "ACTIVE",
        Expired => "EXPIRED",
        Cancelled => "CANCELLED",
    }
}

closed_enum! {
    #[derive(Default)]
    pub enum ProjectStatus ("project status") {
        #[default]
        Planning => "PLANNING",
        InProgress => "IN_PROGRESS",
        OnHold => "ON_HOLD",
        Completed => "COMPLETED",
        Cancelled => "CANCELLED",
    }
}

closed_enum! {
    #[derive(Default)]
    pub enum TaskPriority ("task priority") {
        Low => "LOW",
        #[default]
        Medium => "MEDIUM",
        High => "HIGH",
        Urgent => "URGENT",
    }
}

closed_enum! {
    #[derive(Default)]
    pub enum TaskStatus ("task status") {
        #[default]
        Todo => "TODO",
        InProgress => "IN_PROGRESS",
        Completed => "COMPLETED",
        Cancelled => "CANCELLED",
    }
}

// =============================================================================
// Entity Kind
// =============================================================================

/// One of the seven record kinds the validator knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityKind {
    Client,
    Invoice,
    InvoiceItem,
    Payment,
    Contract,
    Project,
    Task,
}

impl EntityKind {
    pub const ALL: [EntityKind; 7] = [
        EntityKind::Client,
        EntityKind::Invoice,
        EntityKind::InvoiceItem,
        EntityKind::Payment,
        EntityKind::Contract,
        EntityKind::Project,
        EntityKind::Task,
    ];

    /// Human-readable name ("Invoice item").
    pub const fn label(&self) -> &'static str {
        match self {
            EntityKind::Client => "Client",
            EntityKind::Invoice => "Invoice",
            EntityKind::InvoiceItem => "Invoice item",
            EntityKind::Payment => "Payment",
            EntityKind::Contract => "Contract",
            EntityKind::Project => "Project",
            EntityKind::Task => "Task",
        }
    }

    /// Identifier form ("invoice-item"), as accepted by `FromStr`.
    pub const fn slug(&self) -> &'static str {
        match self {
            EntityKind::Client => "client",
            EntityKind::Invoice => "invoice",
            EntityKind::InvoiceItem => "invoice-item",
            EntityKind::Payment => "payment",
            EntityKind::Contract => "contract",
            EntityKind::Project => "project",
            EntityKind::Task => "task",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EntityKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        EntityKind::ALL
            .into_iter()
            .find(|k| k.slug() == wanted)
            .ok_or_else(|| CoreError::UnknownVariant {
                kind: "entity kind",
                value: s.to_string(),
            })
    }
}

// =============================================================================
// Records
// =============================================================================
// Every record below is the NORMALIZED shape: defaults applied, optional
// fields omitted when absent. They are produced by `validation`, never built
// from raw input directly.

/// A customer of the business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Client {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub status: ClientStatus,
}

/// A line item on an invoice.
///
/// `total` is whatever the caller sent; [`Invoice::recompute_totals`]
/// overwrites it with `quantity * unit_price` before storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InvoiceItem {
    pub description: String,
    /// At least 1.
    pub quantity: f64,
    /// Non-negative.
    pub unit_price: f64,
    pub total: f64,
}

/// A bill sent to a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Invoice {
    pub client_id: String,
    #[ts(as = "String")]
    pub issue_date: DateTime<Utc>,
    #[ts(as = "String")]
    pub due_date: DateTime<Utc>,
    #[serde(default)]
    pub status: InvoiceStatus,
    pub subtotal: f64,
    #[serde(default)]
    pub tax: f64,
    #[serde(default)]
    pub discount: f64,
    pub total: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Never empty once validated.
    pub items: Vec<InvoiceItem>,
}

/// A payment towards an invoice.
/// An invoice can have multiple payments (partial payments).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Payment {
    pub invoice_id: String,
    pub amount: f64,
    #[ts(as = "String")]
    pub payment_date: DateTime<Utc>,
    pub method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Contract {
    pub title: String,
    pub client_id: String,
    #[ts(as = "String")]
    pub start_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default)]
    pub status: ContractStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Project {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub client_id: String,
    #[ts(as = "String")]
    pub start_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Task {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub status: TaskStatus,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_defaults() {
        assert_eq!(ClientStatus::default(), ClientStatus::Active);
        assert_eq!(InvoiceStatus::default(), InvoiceStatus::Draft);
        assert_eq!(ContractStatus::default(), ContractStatus::Draft);
        assert_eq!(ProjectStatus::default(), ProjectStatus::Planning);
        assert_eq!(TaskPriority::default(), TaskPriority::Medium);
        assert_eq!(TaskStatus::default(), TaskStatus::Todo);
    }

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(PaymentMethod::BankTransfer.as_str(), "BANK_TRANSFER");
        assert_eq!(ProjectStatus::OnHold.to_string(), "ON_HOLD");
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"IN_PROGRESS\""
        );
        assert_eq!(
            serde_json::from_str::<PaymentMethod>("\"CREDIT_CARD\"").unwrap(),
            PaymentMethod::CreditCard
        );
    }

    #[test]
    fn test_enum_parsing_is_exact() {
        assert_eq!("PAID".parse::<InvoiceStatus>().unwrap(), InvoiceStatus::Paid);
        assert!("paid".parse::<InvoiceStatus>().is_err());
        assert!(" PAID".parse::<InvoiceStatus>().is_err());

        let err = "WIRE".parse::<PaymentMethod>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown payment method: 'WIRE'");
    }

    #[test]
    fn test_closed_enum_lists_members_in_order() {
        let names: Vec<_> = ClientStatus::ALL.iter().map(|s| s.as_str()).collect();
        assert_eq!(names, vec!["ACTIVE", "INACTIVE", "ARCHIVED"]);
        assert_eq!(PaymentMethod::ALL.len(), 6);
    }

    #[test]
    fn test_closed_invoice_statuses() {
        assert!(InvoiceStatus::Paid.is_closed());
        assert!(InvoiceStatus::Cancelled.is_closed());
        assert!(!InvoiceStatus::Sent.is_closed());
        assert!(!InvoiceStatus::Overdue.is_closed());
    }

    #[test]
    fn test_entity_kind_parsing() {
        assert_eq!("client".parse::<EntityKind>().unwrap(), EntityKind::Client);
        assert_eq!(
            "invoice_item".parse::<EntityKind>().unwrap(),
            EntityKind::InvoiceItem
        );
        assert_eq!(
            "Invoice-Item".parse::<EntityKind>().unwrap(),
            EntityKind::InvoiceItem
        );
        assert!("supplier".parse::<EntityKind>().is_err());
    }

    #[test]
    fn test_optional_fields_are_omitted() {
        let client = Client {
            name: "Acme Corp".to_string(),
            email: None,
            phone: None,
            company: None,
            address: None,
            city: None,
            state: None,
            zip_code: Some("10001".to_string()),
            country: None,
            notes: None,
            status: ClientStatus::Active,
        };
        let json = serde_json::to_value(&client).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "name": "Acme Corp", "zipCode": "10001", "status": "ACTIVE" })
        );
    }
}
