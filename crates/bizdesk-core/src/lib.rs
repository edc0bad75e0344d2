//! # bizdesk-core: Pure Business Logic for Bizdesk
//!
//! This crate is the **heart** of Bizdesk. It validates incoming records and
//! derives invoice totals as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bizdesk Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Request Handlers (external)                     │   │
//! │  │      session check ──► parse JSON body ──► call core            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ serde_json::Value                      │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ bizdesk-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌────────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │validation │  │ arithmetic │  │  invoice  │  │   types   │  │   │
//! │  │   │  schemas  │─►│  totals    │─►│ numbering │  │  records  │  │   │
//! │  │   │ violations│  │ tax, disc. │  │  overdue  │  │   enums   │  │   │
//! │  │   └───────────┘  └────────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ normalized record + totals             │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                   Storage (external)                            │   │
//! │  │     unique invoice numbers, foreign keys, persistence           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain records (Client, Invoice, Payment, ...) and closed enums
//! - [`validation`] - Declarative per-entity schemas, all violations at once
//! - [`arithmetic`] - Item totals, subtotal, tax, capped discount, floored total
//! - [`invoice`] - Invoice numbers, overdue checks, payment settlement
//! - [`display`] - Currency, number and percent rendering for UIs
//! - [`clock`] - Injectable time source
//! - [`temporal`] - Date string normalization
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input = same output; time and randomness are parameters
//! 2. **No I/O**: database, network, file system access is FORBIDDEN here
//! 3. **Every Violation**: validation never stops at the first failing field
//! 4. **Explicit Errors**: all errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use bizdesk_core::arithmetic::InvoiceTotals;
//!
//! let items = [(2.0, 10.0), (3.0, 15.0), (1.0, 50.0)];
//! let totals = InvoiceTotals::from_rate(&items, 10.0, 5.0);
//!
//! assert_eq!(totals.subtotal, 115.0);
//! assert_eq!(totals.tax, 11.5);
//! assert_eq!(totals.discount, 5.0);
//! assert_eq!(totals.total, 121.5);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod arithmetic;
pub mod clock;
pub mod display;
pub mod error;
pub mod invoice;
pub mod temporal;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use bizdesk_core::Invoice` instead of
// `use bizdesk_core::types::Invoice`

pub use arithmetic::InvoiceTotals;
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{CoreError, CoreResult, FieldViolation, ValidationError};
pub use types::*;
pub use validation::{validate, Mode, NormalizedRecord};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Prefix used by [`invoice::generate_default_invoice_number`].
pub const DEFAULT_INVOICE_PREFIX: &str = "INV";

/// Exclusive upper bound of the random invoice-number suffix.
///
/// ## Why 1000?
/// The suffix is rendered as exactly three zero-padded digits (`000`-`999`).
/// Uniqueness is therefore only probabilistic; storage must enforce it.
pub const INVOICE_SUFFIX_RANGE: u32 = 1000;
