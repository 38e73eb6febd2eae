//! Reconcile additional-card transactions against the primary card of the same statement.
//!
//! Additional-card transactions that match a primary-card transaction on
//! (date, amount, merchant) get the sync label, and the matching primary-card
//! transactions are marked as shared.

pub mod apply;
mod error;
mod fetch;
pub mod ledger;
#[cfg(any(test, feature = "testing"))]
pub mod memory;
mod model;
pub mod reconcile;
pub mod sync;

pub use error::{Error, Result};
pub use fetch::{PAGE_SIZE, list_transactions, resolve_label, transaction_pages};
pub use model::{Label, LabelId, Ownership, Transaction, TransactionId, TransactionPage};

pub type Decimal = rust_decimal::Decimal;
pub type Date = chrono::NaiveDate;
