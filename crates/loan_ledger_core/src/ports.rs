//! crates/loan_ledger_core/src/ports.rs
//!
//! Defines the data-access contract the ledger is served through.
//! Callers fetch the record sets via this trait and hand them to the pure
//! functions in `accounting` and `reports`; those functions never call it.

use async_trait::async_trait;

use crate::domain::{Debtor, DebtorId, Payment};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait LedgerRepository: Send + Sync {
    /// Every debtor, unfiltered.
    async fn fetch_debtors(&self) -> PortResult<Vec<Debtor>>;

    /// Every payment, unfiltered, newest payment date first.
    async fn fetch_payments(&self) -> PortResult<Vec<Payment>>;

    async fn get_debtor(&self, debtor_id: DebtorId) -> PortResult<Debtor>;
}
