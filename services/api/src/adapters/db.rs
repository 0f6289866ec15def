//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `LedgerRepository` port from the core crate. It handles all reads from
//! the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::NaiveDate;
use loan_ledger_core::domain::{Debtor, DebtorId, DebtorStatus, Payment, PaymentMethod};
use loan_ledger_core::ports::{LedgerRepository, PortError, PortResult};
use sqlx::{FromRow, PgPool};
use tracing::{debug, warn};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `LedgerRepository` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

const DEBTOR_COLUMNS: &str = "id, name, phone, email, principal, loan_date, due_dates, \
     interest_rate_percent, accrued_interest, status";

const PAYMENT_COLUMNS: &str = "id, debtor_id, paid_on, amount, method, note";

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct DebtorRecord {
    id: Uuid,
    name: String,
    phone: String,
    email: String,
    principal: f64,
    loan_date: NaiveDate,
    due_dates: Vec<NaiveDate>,
    interest_rate_percent: f64,
    accrued_interest: Option<f64>,
    status: Option<String>,
}
impl DebtorRecord {
    fn to_domain(self) -> Debtor {
        let status = parse_status(self.id, self.status.as_deref());
        Debtor {
            id: self.id,
            name: self.name,
            phone: self.phone,
            email: self.email,
            principal: self.principal,
            loan_date: self.loan_date,
            due_dates: self.due_dates,
            // Stored as a percentage; the core works with fractions.
            monthly_rate: self.interest_rate_percent / 100.0,
            status,
            stored_accrued_interest: self.accrued_interest,
        }
    }
}

#[derive(FromRow)]
struct PaymentRecord {
    id: Uuid,
    debtor_id: Option<Uuid>,
    paid_on: NaiveDate,
    amount: f64,
    method: Option<String>,
    note: Option<String>,
}
impl PaymentRecord {
    fn to_domain(self) -> Payment {
        Payment {
            id: self.id,
            // A detached payment matches no debtor.
            debtor_id: self.debtor_id.unwrap_or(Uuid::nil()),
            paid_on: self.paid_on,
            amount: self.amount,
            method: self
                .method
                .as_deref()
                .and_then(|m| m.parse().ok())
                .unwrap_or(PaymentMethod::Other),
            note: self.note.filter(|n| !n.trim().is_empty()),
        }
    }
}

fn parse_status(debtor_id: Uuid, raw: Option<&str>) -> DebtorStatus {
    match raw {
        None => DebtorStatus::Active,
        Some(s) => s.parse().unwrap_or_else(|e| {
            warn!("Debtor {}: {}; treating as active", debtor_id, e);
            DebtorStatus::Active
        }),
    }
}

//=========================================================================================
// `LedgerRepository` Trait Implementation
//=========================================================================================

#[async_trait]
impl LedgerRepository for DbAdapter {
    async fn fetch_debtors(&self) -> PortResult<Vec<Debtor>> {
        let records = sqlx::query_as::<_, DebtorRecord>(&format!(
            "SELECT {} FROM debtors ORDER BY loan_date DESC",
            DEBTOR_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        debug!("Fetched {} debtors", records.len());
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn fetch_payments(&self) -> PortResult<Vec<Payment>> {
        let records = sqlx::query_as::<_, PaymentRecord>(&format!(
            "SELECT {} FROM payments ORDER BY paid_on DESC",
            PAYMENT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        debug!("Fetched {} payments", records.len());
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn get_debtor(&self, debtor_id: DebtorId) -> PortResult<Debtor> {
        let record = sqlx::query_as::<_, DebtorRecord>(&format!(
            "SELECT {} FROM debtors WHERE id = $1",
            DEBTOR_COLUMNS
        ))
        .bind(debtor_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => {
                PortError::NotFound(format!("Debtor {} not found", debtor_id))
            }
            _ => PortError::Unexpected(e.to_string()),
        })?;
        Ok(record.to_domain())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(status: Option<&str>) -> DebtorRecord {
        DebtorRecord {
            id: Uuid::from_u128(7),
            name: "Rosa".to_string(),
            phone: "555".to_string(),
            email: "rosa@example.com".to_string(),
            principal: 1200.0,
            loan_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            due_dates: vec![NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()],
            interest_rate_percent: 5.0,
            accrued_interest: Some(60.0),
            status: status.map(str::to_string),
        }
    }

    #[test]
    fn stored_percentage_becomes_a_fraction() {
        let debtor = record(Some("vencido")).to_domain();
        assert!((debtor.monthly_rate - 0.05).abs() < 1e-12);
        assert_eq!(debtor.status, DebtorStatus::Overdue);
        assert_eq!(debtor.stored_accrued_interest, Some(60.0));
    }

    #[test]
    fn missing_or_unknown_status_reads_as_active() {
        assert_eq!(record(None).to_domain().status, DebtorStatus::Active);
        assert_eq!(record(Some("archived")).to_domain().status, DebtorStatus::Active);
    }

    #[test]
    fn detached_payment_gets_nil_debtor_and_default_method() {
        let payment = PaymentRecord {
            id: Uuid::from_u128(1),
            debtor_id: None,
            paid_on: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            amount: 10.0,
            method: None,
            note: Some("  ".to_string()),
        }
        .to_domain();
        assert_eq!(payment.debtor_id, Uuid::nil());
        assert_eq!(payment.method, PaymentMethod::Other);
        assert_eq!(payment.note, None);
    }
}
