//! crates/loan_ledger_core/src/domain.rs
//!
//! Defines the pure, core data structures for the loan ledger.
//! These structs are independent of any database or serialization format.
//! Persisted records (`Debtor`, `Payment`) and derived values (`AccountSummary`,
//! `PortfolioSummary`, ...) are kept in separate types.

use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

pub type DebtorId = Uuid;
pub type PaymentId = Uuid;

//=========================================================================================
// Enumerations
//=========================================================================================

/// Lifecycle state of a loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DebtorStatus {
    Active,
    Overdue,
    Paid,
}

impl DebtorStatus {
    pub const ALL: [DebtorStatus; 3] = [Self::Active, Self::Overdue, Self::Paid];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Overdue => "overdue",
            Self::Paid => "paid",
        }
    }
}

/// How a payment was received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PaymentMethod {
    Cash,
    Transfer,
    Other,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [Self::Cash, Self::Transfer, Self::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Transfer => "transfer",
            Self::Other => "other",
        }
    }
}

/// Returned when a stored or user-supplied label matches no variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unrecognised {kind}: '{value}'")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl FromStr for DebtorStatus {
    type Err = ParseEnumError;

    // Older rows were written with Spanish labels; both spellings are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" | "activo" => Ok(Self::Active),
            "overdue" | "vencido" => Ok(Self::Overdue),
            "paid" | "pagado" => Ok(Self::Paid),
            _ => Err(ParseEnumError {
                kind: "debtor status",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cash" | "efectivo" => Ok(Self::Cash),
            "transfer" | "transferencia" => Ok(Self::Transfer),
            "other" | "otro" => Ok(Self::Other),
            _ => Err(ParseEnumError {
                kind: "payment method",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for DebtorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//=========================================================================================
// Persisted Records
//=========================================================================================

/// A borrower and the terms of their loan.
#[derive(Debug, Clone, PartialEq)]
pub struct Debtor {
    pub id: DebtorId,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub principal: f64,
    pub loan_date: NaiveDate,
    /// Scheduled payment dates, in no particular order.
    pub due_dates: Vec<NaiveDate>,
    /// Monthly interest rate as a fraction (0.05 == 5% per month).
    pub monthly_rate: f64,
    pub status: DebtorStatus,
    /// Accrued interest as last written by the data-entry layer, if any.
    pub stored_accrued_interest: Option<f64>,
}

/// A single amount received against a debtor's loan.
#[derive(Debug, Clone, PartialEq)]
pub struct Payment {
    pub id: PaymentId,
    pub debtor_id: DebtorId,
    pub paid_on: NaiveDate,
    pub amount: f64,
    pub method: PaymentMethod,
    pub note: Option<String>,
}

//=========================================================================================
// Derived Values (never persisted)
//=========================================================================================

/// Financial state of one debtor at an evaluation date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccountSummary {
    pub debtor_id: DebtorId,
    pub total_paid: f64,
    pub accrued_interest: f64,
    /// `principal + accrued_interest - total_paid`, floored at zero.
    pub outstanding_balance: f64,
}

/// A debtor's nearest scheduled payment inside a look-ahead window.
#[derive(Debug, Clone, PartialEq)]
pub struct UpcomingPayment {
    pub debtor_id: DebtorId,
    pub debtor_name: String,
    pub principal: f64,
    pub due_date: NaiveDate,
}

/// Portfolio-wide aggregates at an evaluation date.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioSummary {
    pub active_loans: usize,
    pub total_active_principal: f64,
    pub total_accrued_interest: f64,
    /// Payments matched to a known debtor; orphaned payments are excluded.
    pub total_collected: f64,
    pub upcoming_payments: Vec<UpcomingPayment>,
}
