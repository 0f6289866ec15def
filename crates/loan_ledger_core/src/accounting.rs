//! crates/loan_ledger_core/src/accounting.rs
//!
//! The single authoritative implementation of the loan arithmetic: accrued
//! interest, payment totals, outstanding balances and due-date projections.
//!
//! Rate convention: `Debtor::monthly_rate` is a monthly fraction applied as
//! simple interest on a fixed 30-day month. Every function here is total and
//! pure; the evaluation date is always an explicit argument.

use chrono::{Days, NaiveDate};

use crate::domain::{
    AccountSummary, Debtor, DebtorId, DebtorStatus, Payment, PortfolioSummary, UpcomingPayment,
};

/// Length of the interest month, independent of the calendar month.
pub const DAYS_PER_MONTH: f64 = 30.0;

/// Look-ahead window used for the portfolio's upcoming-payments projection.
pub const DEFAULT_UPCOMING_WINDOW_DAYS: u32 = 7;

/// Simple interest accrued from the loan date up to `as_of`.
///
/// Elapsed time is counted in whole calendar days. An `as_of` on or before the
/// loan date yields zero.
pub fn accrued_interest(debtor: &Debtor, as_of: NaiveDate) -> f64 {
    let elapsed_days = (as_of - debtor.loan_date).num_days();
    if elapsed_days <= 0 {
        return 0.0;
    }
    let daily_rate = debtor.monthly_rate / DAYS_PER_MONTH;
    debtor.principal * daily_rate * elapsed_days as f64
}

/// Sum of the amounts of every payment referencing `debtor_id`.
///
/// Payments for other (or unknown) debtors contribute nothing.
pub fn total_paid(debtor_id: DebtorId, payments: &[Payment]) -> f64 {
    payments
        .iter()
        .filter(|p| p.debtor_id == debtor_id)
        .map(|p| p.amount)
        .sum()
}

/// `principal + accrued interest - total paid`, never below zero.
///
/// Overpayment is absorbed: there is no notion of credit.
pub fn outstanding_balance(debtor: &Debtor, payments: &[Payment], as_of: NaiveDate) -> f64 {
    balance_from(
        debtor.principal,
        accrued_interest(debtor, as_of),
        total_paid(debtor.id, payments),
    )
}

fn balance_from(principal: f64, interest: f64, paid: f64) -> f64 {
    (principal + interest - paid).max(0.0)
}

/// Computes total paid, accrued interest and outstanding balance in one pass.
pub fn account_summary(debtor: &Debtor, payments: &[Payment], as_of: NaiveDate) -> AccountSummary {
    let total_paid = total_paid(debtor.id, payments);
    let accrued_interest = accrued_interest(debtor, as_of);
    AccountSummary {
        debtor_id: debtor.id,
        total_paid,
        accrued_interest,
        outstanding_balance: balance_from(debtor.principal, accrued_interest, total_paid),
    }
}

/// Earliest scheduled due date strictly after `as_of`, if any remain.
pub fn next_due_date(debtor: &Debtor, as_of: NaiveDate) -> Option<NaiveDate> {
    debtor.due_dates.iter().copied().filter(|d| *d > as_of).min()
}

/// Active debtors whose next due date falls in `(as_of, as_of + window_days]`.
///
/// Ordered by due date, then by debtor id.
pub fn upcoming_due_within(
    debtors: &[Debtor],
    window_days: u32,
    as_of: NaiveDate,
) -> Vec<UpcomingPayment> {
    let window_end = as_of
        .checked_add_days(Days::new(u64::from(window_days)))
        .unwrap_or(NaiveDate::MAX);

    let mut upcoming: Vec<UpcomingPayment> = debtors
        .iter()
        .filter(|d| d.status == DebtorStatus::Active)
        .filter_map(|d| {
            next_due_date(d, as_of)
                .filter(|due| *due <= window_end)
                .map(|due_date| UpcomingPayment {
                    debtor_id: d.id,
                    debtor_name: d.name.clone(),
                    principal: d.principal,
                    due_date,
                })
        })
        .collect();

    upcoming.sort_by(|a, b| {
        a.due_date
            .cmp(&b.due_date)
            .then_with(|| a.debtor_id.cmp(&b.debtor_id))
    });
    upcoming
}

/// Portfolio aggregates with the default seven-day look-ahead.
pub fn portfolio_summary(
    debtors: &[Debtor],
    payments: &[Payment],
    as_of: NaiveDate,
) -> PortfolioSummary {
    portfolio_summary_with_window(debtors, payments, as_of, DEFAULT_UPCOMING_WINDOW_DAYS)
}

/// Portfolio aggregates with a caller-chosen look-ahead window.
///
/// Accrued interest is summed over every debtor, including paid-off ones.
/// Principal and the upcoming projection only consider active debtors.
pub fn portfolio_summary_with_window(
    debtors: &[Debtor],
    payments: &[Payment],
    as_of: NaiveDate,
    window_days: u32,
) -> PortfolioSummary {
    let active: Vec<Debtor> = debtors
        .iter()
        .filter(|d| d.status == DebtorStatus::Active)
        .cloned()
        .collect();

    PortfolioSummary {
        active_loans: active.len(),
        total_active_principal: active.iter().map(|d| d.principal).sum(),
        total_accrued_interest: debtors.iter().map(|d| accrued_interest(d, as_of)).sum(),
        total_collected: debtors.iter().map(|d| total_paid(d.id, payments)).sum(),
        upcoming_payments: upcoming_due_within(&active, window_days, as_of),
    }
}
