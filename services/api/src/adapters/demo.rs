//! services/api/src/adapters/demo.rs
//!
//! An in-memory implementation of the `LedgerRepository` port. It backs the
//! `DATA_SOURCE=demo` mode and the integration tests.

use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use loan_ledger_core::domain::{Debtor, DebtorId, DebtorStatus, Payment, PaymentMethod};
use loan_ledger_core::ports::{LedgerRepository, PortError, PortResult};
use std::sync::Arc;
use uuid::Uuid;

/// A read-only ledger held in memory.
#[derive(Clone, Default)]
pub struct DemoAdapter {
    debtors: Arc<Vec<Debtor>>,
    payments: Arc<Vec<Payment>>,
}

impl DemoAdapter {
    /// Creates an adapter over the given records. Payments are served newest first.
    pub fn new(debtors: Vec<Debtor>, mut payments: Vec<Payment>) -> Self {
        payments.sort_by(|a, b| b.paid_on.cmp(&a.paid_on));
        Self {
            debtors: Arc::new(debtors),
            payments: Arc::new(payments),
        }
    }

    /// A small sample portfolio laid out around `anchor` (usually today).
    pub fn seeded(anchor: NaiveDate) -> Self {
        let before = |days: u64| anchor.checked_sub_days(Days::new(days)).unwrap_or(anchor);
        let after = |days: u64| anchor.checked_add_days(Days::new(days)).unwrap_or(anchor);

        let debtor = |n: u128,
                      name: &str,
                      principal: f64,
                      rate: f64,
                      loan_date: NaiveDate,
                      due_dates: Vec<NaiveDate>,
                      status: DebtorStatus| {
            Debtor {
                id: Uuid::from_u128(n),
                name: name.to_string(),
                phone: format!("555-01{:02}", n),
                email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
                principal,
                loan_date,
                due_dates,
                monthly_rate: rate,
                status,
                stored_accrued_interest: None,
            }
        };

        let debtors = vec![
            debtor(
                1,
                "Ana Torres",
                5000.0,
                0.05,
                before(60),
                vec![before(30), after(3), after(33)],
                DebtorStatus::Active,
            ),
            debtor(
                2,
                "Luis Ramos",
                12000.0,
                0.03,
                before(120),
                vec![before(90), before(60), before(30), after(6)],
                DebtorStatus::Active,
            ),
            debtor(
                3,
                "Carla Mendez",
                2500.0,
                0.04,
                before(200),
                vec![before(170), before(140)],
                DebtorStatus::Overdue,
            ),
            debtor(
                4,
                "Jorge Silva",
                1500.0,
                0.02,
                before(300),
                vec![before(270), before(240)],
                DebtorStatus::Paid,
            ),
        ];

        let payment = |n: u128, debtor: u128, amount: f64, paid_on: NaiveDate, method: PaymentMethod| Payment {
            id: Uuid::from_u128(0x1000 + n),
            debtor_id: Uuid::from_u128(debtor),
            paid_on,
            amount,
            method,
            note: None,
        };

        let payments = vec![
            payment(1, 1, 1000.0, before(30), PaymentMethod::Transfer),
            payment(2, 2, 1500.0, before(90), PaymentMethod::Cash),
            payment(3, 2, 1500.0, before(60), PaymentMethod::Cash),
            payment(4, 2, 1500.0, before(30), PaymentMethod::Transfer),
            payment(5, 3, 300.0, before(170), PaymentMethod::Other),
            payment(6, 4, 1800.0, before(240), PaymentMethod::Cash),
        ];

        Self::new(debtors, payments)
    }
}

#[async_trait]
impl LedgerRepository for DemoAdapter {
    async fn fetch_debtors(&self) -> PortResult<Vec<Debtor>> {
        Ok(self.debtors.as_ref().clone())
    }

    async fn fetch_payments(&self) -> PortResult<Vec<Payment>> {
        Ok(self.payments.as_ref().clone())
    }

    async fn get_debtor(&self, debtor_id: DebtorId) -> PortResult<Debtor> {
        self.debtors
            .iter()
            .find(|d| d.id == debtor_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Debtor {} not found", debtor_id)))
    }
}
