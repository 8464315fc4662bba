//! Inventory Domain
//!
//! The bulk reconciler sits here, above the item repository: it consumes
//! parsed row sets and merges them into the ledger with upsert-by-name
//! semantics, independent of request transport.

pub mod reconciler;

pub use reconciler::{BulkImportRow, ReconcileOutcome, Reconciler};
