//! crates/loan_ledger_core/src/reports.rs
//!
//! Aggregate projections over the whole ledger used by the dashboard and the
//! reports pages: headline statistics, distributions and monthly series.

use chrono::{Datelike, NaiveDate};
use std::collections::{BTreeMap, HashSet};

use crate::accounting::{accrued_interest, outstanding_balance};
use crate::domain::{Debtor, DebtorStatus, Payment, PaymentMethod};

/// Number of trailing months shown in the lent-versus-paid chart.
pub const DEFAULT_TRAILING_MONTHS: u32 = 6;

/// Number of records listed in the dashboard's "latest" panels.
pub const RECENT_LIMIT: usize = 5;

//=========================================================================================
// Report Types
//=========================================================================================

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardStats {
    pub total_loans: usize,
    pub active_loans: usize,
    pub overdue_loans: usize,
    pub paid_loans: usize,
    pub total_lent: f64,
    /// Outstanding balance summed over every debtor not marked as paid.
    pub receivable: f64,
    pub interest_generated: f64,
}

/// One slice of a categorical breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistributionSlice<T> {
    pub category: T,
    pub count: usize,
}

/// Amount lent and amount collected during one calendar month.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlyTotals {
    pub year: i32,
    pub month: u32,
    pub lent: f64,
    pub paid: f64,
}

//=========================================================================================
// Dashboard
//=========================================================================================

pub fn dashboard_stats(debtors: &[Debtor], payments: &[Payment], as_of: NaiveDate) -> DashboardStats {
    let count = |status: DebtorStatus| debtors.iter().filter(|d| d.status == status).count();

    DashboardStats {
        total_loans: debtors.len(),
        active_loans: count(DebtorStatus::Active),
        overdue_loans: count(DebtorStatus::Overdue),
        paid_loans: count(DebtorStatus::Paid),
        total_lent: debtors.iter().map(|d| d.principal).sum(),
        receivable: debtors
            .iter()
            .filter(|d| d.status != DebtorStatus::Paid)
            .map(|d| outstanding_balance(d, payments, as_of))
            .sum(),
        interest_generated: debtors.iter().map(|d| accrued_interest(d, as_of)).sum(),
    }
}

/// Loans per status, in declaration order, omitting empty statuses.
pub fn status_distribution(debtors: &[Debtor]) -> Vec<DistributionSlice<DebtorStatus>> {
    DebtorStatus::ALL
        .iter()
        .map(|status| DistributionSlice {
            category: *status,
            count: debtors.iter().filter(|d| d.status == *status).count(),
        })
        .filter(|slice| slice.count > 0)
        .collect()
}

/// Payments per method, in declaration order, omitting unused methods.
pub fn method_distribution(payments: &[Payment]) -> Vec<DistributionSlice<PaymentMethod>> {
    PaymentMethod::ALL
        .iter()
        .map(|method| DistributionSlice {
            category: *method,
            count: payments.iter().filter(|p| p.method == *method).count(),
        })
        .filter(|slice| slice.count > 0)
        .collect()
}

/// The `limit` most recent loans, newest loan date first.
pub fn recent_debtors(debtors: &[Debtor], limit: usize) -> Vec<&Debtor> {
    let mut sorted: Vec<&Debtor> = debtors.iter().collect();
    sorted.sort_by(|a, b| b.loan_date.cmp(&a.loan_date));
    sorted.truncate(limit);
    sorted
}

/// The `limit` most recent payments, newest payment date first.
pub fn recent_payments(payments: &[Payment], limit: usize) -> Vec<&Payment> {
    let mut sorted: Vec<&Payment> = payments.iter().collect();
    sorted.sort_by(|a, b| b.paid_on.cmp(&a.paid_on));
    sorted.truncate(limit);
    sorted
}

/// Payments whose debtor reference matches no known debtor.
pub fn orphan_payments<'a>(debtors: &[Debtor], payments: &'a [Payment]) -> Vec<&'a Payment> {
    let known: HashSet<_> = debtors.iter().map(|d| d.id).collect();
    payments
        .iter()
        .filter(|p| !known.contains(&p.debtor_id))
        .collect()
}

//=========================================================================================
// Monthly Series
//=========================================================================================

fn month_key(date: NaiveDate) -> (i32, u32) {
    (date.year(), date.month())
}

fn fold_by_month(
    debtors: &[Debtor],
    payments: &[Payment],
    mut buckets: BTreeMap<(i32, u32), (f64, f64)>,
    open: bool,
) -> Vec<MonthlyTotals> {
    for d in debtors {
        let key = month_key(d.loan_date);
        if open {
            buckets.entry(key).or_default().0 += d.principal;
        } else if let Some(entry) = buckets.get_mut(&key) {
            entry.0 += d.principal;
        }
    }
    for p in payments {
        let key = month_key(p.paid_on);
        if open {
            buckets.entry(key).or_default().1 += p.amount;
        } else if let Some(entry) = buckets.get_mut(&key) {
            entry.1 += p.amount;
        }
    }

    buckets
        .into_iter()
        .map(|((year, month), (lent, paid))| MonthlyTotals {
            year,
            month,
            lent,
            paid,
        })
        .collect()
}

/// Lent and paid per calendar month, ascending, for every month with activity.
pub fn monthly_totals(debtors: &[Debtor], payments: &[Payment]) -> Vec<MonthlyTotals> {
    fold_by_month(debtors, payments, BTreeMap::new(), true)
}

/// A zero-filled window of `months` calendar months ending with `as_of`'s month,
/// oldest first. Activity outside the window is ignored.
pub fn trailing_monthly_totals(
    debtors: &[Debtor],
    payments: &[Payment],
    as_of: NaiveDate,
    months: u32,
) -> Vec<MonthlyTotals> {
    let last = as_of.year() * 12 + as_of.month0() as i32;
    let buckets = (0..months as i32)
        .rev()
        .map(|back| {
            let index = last - back;
            ((index.div_euclid(12), index.rem_euclid(12) as u32 + 1), (0.0, 0.0))
        })
        .collect();
    fold_by_month(debtors, payments, buckets, false)
}
