//! # Reconciliation
//!
//! A pass reads the spreadsheet snapshot (priced with the day's exchange
//! rate) and the store snapshot, computes which orders changed and which
//! disappeared, and applies the result to the store in one transaction.
//!
//! [`Reconciler::run_pass`] drives a full pass; the individual stages are
//! exposed for callers that need them separately.

pub mod delivery;
pub mod diff;
pub mod pass;
pub mod reader;
pub mod writer;

pub use diff::{compute_changes, compute_deletions};
pub use pass::{PassReport, Reconciler};
pub use reader::{SheetSnapshot, SpreadsheetReader, read_store_orders};
pub use writer::StoreWriter;
