//! services/api/src/web/state.rs
//!
//! Defines the application's shared state and the helpers every handler uses
//! to load the ledger.

use crate::config::Config;
use axum::http::StatusCode;
use chrono::{NaiveDate, Utc};
use loan_ledger_core::domain::{Debtor, Payment};
use loan_ledger_core::ports::{LedgerRepository, PortError};
use std::sync::Arc;
use tracing::error;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<dyn LedgerRepository>,
    pub config: Arc<Config>,
}

/// The error shape returned by every handler.
pub type HandlerError = (StatusCode, String);

impl AppState {
    pub fn new(ledger: Arc<dyn LedgerRepository>, config: Arc<Config>) -> Self {
        Self { ledger, config }
    }

    /// Fetches both record sets concurrently.
    pub async fn load_ledger(&self) -> Result<(Vec<Debtor>, Vec<Payment>), HandlerError> {
        tokio::try_join!(self.ledger.fetch_debtors(), self.ledger.fetch_payments())
            .map_err(|e| port_error_response("load ledger", e))
    }
}

/// Maps a port failure onto an HTTP status, logging anything unexpected.
pub fn port_error_response(action: &str, err: PortError) -> HandlerError {
    match err {
        PortError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        PortError::Unexpected(msg) => {
            error!("Failed to {}: {}", action, msg);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to {}", action),
            )
        }
    }
}

/// The evaluation date for a request: the explicit `as_of` or today's UTC date.
pub fn resolve_as_of(as_of: Option<NaiveDate>) -> NaiveDate {
    as_of.unwrap_or_else(|| Utc::now().date_naive())
}

/// Parses an optional query-string label into a domain value.
pub fn parse_param<T>(name: &str, raw: Option<&str>) -> Result<Option<T>, HandlerError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|e| (StatusCode::BAD_REQUEST, format!("Invalid {}: {}", name, e))),
    }
}
