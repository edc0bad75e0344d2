//! Per-entity schemas.
//!
//! Each schema is a flat list of field rules, read top to bottom. Violations
//! come out in this order.

use super::fields::{FieldReader, Min, NON_NEGATIVE};
use crate::types::{
    ClientStatus, ContractStatus, InvoiceStatus, PaymentMethod, ProjectStatus, TaskPriority,
    TaskStatus,
};

pub(crate) const AT_LEAST_ONE_ITEM: &str = "At least one item is required";

const CLIENT_OPTIONAL_TEXT: [&str; 8] = [
    "phone", "company", "address", "city", "state", "zipCode", "country", "notes",
];

pub(crate) fn client(r: &mut FieldReader<'_>) {
    r.required_str("name", "Name is required");
    r.optional_email("email");
    for field in CLIENT_OPTIONAL_TEXT {
        r.optional_str(field);
    }
    r.enum_or_default::<ClientStatus>("status");
}

pub(crate) fn invoice_item(r: &mut FieldReader<'_>) {
    r.required_str("description", "Description is required");
    r.required_number("quantity", Some(Min::new(1.0, "Quantity must be at least 1")));
    r.required_number(
        "unitPrice",
        Some(Min::new(0.0, "Unit price must be non-negative")),
    );
    // Accepted as sent; recomputed server-side before storage.
    r.required_number("total", None);
}

pub(crate) fn invoice(r: &mut FieldReader<'_>) {
    r.required_str("clientId", "Client is required");
    r.required_date("issueDate");
    r.required_date("dueDate");
    r.enum_or_default::<InvoiceStatus>("status");
    r.required_number("subtotal", Some(NON_NEGATIVE));
    r.number_or("tax", 0.0, Some(NON_NEGATIVE));
    r.number_or("discount", 0.0, Some(NON_NEGATIVE));
    r.required_number("total", Some(NON_NEGATIVE));
    r.optional_str("notes");
    r.nested_list("items", AT_LEAST_ONE_ITEM, invoice_item);
}

pub(crate) fn payment(r: &mut FieldReader<'_>) {
    r.required_str("invoiceId", "Invoice is required");
    r.required_number("amount", Some(Min::new(0.01, "Amount must be greater than 0")));
    r.required_date("paymentDate");
    r.required_enum::<PaymentMethod>("method");
    r.optional_str("notes");
}

pub(crate) fn contract(r: &mut FieldReader<'_>) {
    r.required_str("title", "Title is required");
    r.required_str("clientId", "Client is required");
    r.required_date("startDate");
    r.optional_date("endDate");
    r.optional_number("value", Some(NON_NEGATIVE));
    r.enum_or_default::<ContractStatus>("status");
    r.optional_str("content");
    r.optional_str("notes");
}

pub(crate) fn project(r: &mut FieldReader<'_>) {
    r.required_str("name", "Name is required");
    r.optional_str("description");
    r.required_str("clientId", "Client is required");
    r.required_date("startDate");
    r.optional_date("endDate");
    r.enum_or_default::<ProjectStatus>("status");
    r.optional_number("budget", Some(NON_NEGATIVE));
}

pub(crate) fn task(r: &mut FieldReader<'_>) {
    r.required_str("title", "Title is required");
    r.optional_str("description");
    r.optional_str("projectId");
    r.optional_date("dueDate");
    r.enum_or_default::<TaskPriority>("priority");
    r.enum_or_default::<TaskStatus>("status");
}
