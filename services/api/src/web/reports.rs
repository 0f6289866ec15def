//! services/api/src/web/reports.rs
//!
//! Axum handlers for the aggregate reports: the portfolio summary, the dashboard
//! and the monthly lent-versus-paid series.

use crate::web::rest::{DebtorResponse, PaymentResponse};
use crate::web::state::{resolve_as_of, AppState, HandlerError};
use axum::{
    extract::{Query, State},
    response::Json,
};
use chrono::NaiveDate;
use loan_ledger_core::accounting::portfolio_summary_with_window;
use loan_ledger_core::domain::UpcomingPayment;
use loan_ledger_core::reports::{
    dashboard_stats, method_distribution, monthly_totals, orphan_payments, recent_debtors,
    recent_payments, status_distribution, trailing_monthly_totals, DistributionSlice,
    MonthlyTotals, DEFAULT_TRAILING_MONTHS, RECENT_LIMIT,
};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::sync::Arc;
use tracing::{info, warn};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Upper bound on the trailing window a client may request.
const MAX_TRAILING_MONTHS: u32 = 120;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReportParams {
    /// Evaluation date, defaults to today.
    pub as_of: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PortfolioParams {
    pub as_of: Option<NaiveDate>,
    /// Look-ahead for upcoming payments, defaults to the configured window.
    pub window_days: Option<u32>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MonthlyReportParams {
    pub as_of: Option<NaiveDate>,
    /// Length of the trailing window, defaults to 6, at most 120.
    pub months: Option<u32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UpcomingPaymentResponse {
    pub debtor_id: Uuid,
    pub debtor_name: String,
    pub principal: f64,
    pub due_date: NaiveDate,
}

impl From<UpcomingPayment> for UpcomingPaymentResponse {
    fn from(upcoming: UpcomingPayment) -> Self {
        Self {
            debtor_id: upcoming.debtor_id,
            debtor_name: upcoming.debtor_name,
            principal: upcoming.principal,
            due_date: upcoming.due_date,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PortfolioResponse {
    pub as_of: NaiveDate,
    pub window_days: u32,
    pub active_loans: usize,
    pub total_active_principal: f64,
    pub total_accrued_interest: f64,
    pub total_collected: f64,
    pub upcoming_payments: Vec<UpcomingPaymentResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DistributionSliceResponse {
    pub category: String,
    pub count: usize,
}

impl<T: Display> From<DistributionSlice<T>> for DistributionSliceResponse {
    fn from(slice: DistributionSlice<T>) -> Self {
        Self {
            category: slice.category.to_string(),
            count: slice.count,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardResponse {
    pub as_of: NaiveDate,
    pub total_loans: usize,
    pub active_loans: usize,
    pub overdue_loans: usize,
    pub paid_loans: usize,
    pub total_lent: f64,
    pub receivable: f64,
    pub interest_generated: f64,
    pub status_distribution: Vec<DistributionSliceResponse>,
    pub method_distribution: Vec<DistributionSliceResponse>,
    pub recent_debtors: Vec<DebtorResponse>,
    pub recent_payments: Vec<PaymentResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MonthlyTotalsResponse {
    /// `YYYY-MM`.
    pub month: String,
    pub lent: f64,
    pub paid: f64,
}

impl From<MonthlyTotals> for MonthlyTotalsResponse {
    fn from(totals: MonthlyTotals) -> Self {
        Self {
            month: format!("{:04}-{:02}", totals.year, totals.month),
            lent: totals.lent,
            paid: totals.paid,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MonthlyReportResponse {
    pub as_of: NaiveDate,
    /// Every month with activity, oldest first.
    pub all_time: Vec<MonthlyTotalsResponse>,
    /// Fixed window ending with the `as_of` month, zero-filled.
    pub trailing: Vec<MonthlyTotalsResponse>,
}

//=========================================================================================
// Report Handlers
//=========================================================================================

/// Portfolio-wide totals and the upcoming-payments projection.
#[utoipa::path(
    get,
    path = "/reports/portfolio",
    params(PortfolioParams),
    responses(
        (status = 200, description = "Portfolio summary", body = PortfolioResponse),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn portfolio_handler(
    State(app_state): State<Arc<AppState>>,
    Query(params): Query<PortfolioParams>,
) -> Result<Json<PortfolioResponse>, HandlerError> {
    let as_of = resolve_as_of(params.as_of);
    let window_days = params
        .window_days
        .unwrap_or(app_state.config.upcoming_window_days);
    let (debtors, payments) = app_state.load_ledger().await?;

    let orphans = orphan_payments(&debtors, &payments);
    if !orphans.is_empty() {
        warn!(
            "{} payment(s) reference unknown debtors and are excluded from totals",
            orphans.len()
        );
    }

    let summary = portfolio_summary_with_window(&debtors, &payments, as_of, window_days);
    info!(
        "Portfolio as of {}: {} active loans, {} upcoming payments",
        as_of,
        summary.active_loans,
        summary.upcoming_payments.len()
    );

    Ok(Json(PortfolioResponse {
        as_of,
        window_days,
        active_loans: summary.active_loans,
        total_active_principal: summary.total_active_principal,
        total_accrued_interest: summary.total_accrued_interest,
        total_collected: summary.total_collected,
        upcoming_payments: summary
            .upcoming_payments
            .into_iter()
            .map(Into::into)
            .collect(),
    }))
}

/// Headline statistics, distributions and the latest records.
#[utoipa::path(
    get,
    path = "/reports/dashboard",
    params(ReportParams),
    responses(
        (status = 200, description = "Dashboard data", body = DashboardResponse),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn dashboard_handler(
    State(app_state): State<Arc<AppState>>,
    Query(params): Query<ReportParams>,
) -> Result<Json<DashboardResponse>, HandlerError> {
    let as_of = resolve_as_of(params.as_of);
    let (debtors, payments) = app_state.load_ledger().await?;
    let stats = dashboard_stats(&debtors, &payments, as_of);

    Ok(Json(DashboardResponse {
        as_of,
        total_loans: stats.total_loans,
        active_loans: stats.active_loans,
        overdue_loans: stats.overdue_loans,
        paid_loans: stats.paid_loans,
        total_lent: stats.total_lent,
        receivable: stats.receivable,
        interest_generated: stats.interest_generated,
        status_distribution: status_distribution(&debtors)
            .into_iter()
            .map(Into::into)
            .collect(),
        method_distribution: method_distribution(&payments)
            .into_iter()
            .map(Into::into)
            .collect(),
        recent_debtors: recent_debtors(&debtors, RECENT_LIMIT)
            .into_iter()
            .map(|d| DebtorResponse::evaluate(d, &payments, as_of))
            .collect(),
        recent_payments: recent_payments(&payments, RECENT_LIMIT)
            .into_iter()
            .map(|p| PaymentResponse::with_debtor_name(p, &debtors))
            .collect(),
    }))
}

/// Amount lent and collected per month.
#[utoipa::path(
    get,
    path = "/reports/monthly",
    params(MonthlyReportParams),
    responses(
        (status = 200, description = "Monthly series", body = MonthlyReportResponse),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn monthly_report_handler(
    State(app_state): State<Arc<AppState>>,
    Query(params): Query<MonthlyReportParams>,
) -> Result<Json<MonthlyReportResponse>, HandlerError> {
    let as_of = resolve_as_of(params.as_of);
    let months = params
        .months
        .unwrap_or(DEFAULT_TRAILING_MONTHS)
        .min(MAX_TRAILING_MONTHS);
    let (debtors, payments) = app_state.load_ledger().await?;

    Ok(Json(MonthlyReportResponse {
        as_of,
        all_time: monthly_totals(&debtors, &payments)
            .into_iter()
            .map(Into::into)
            .collect(),
        trailing: trailing_monthly_totals(&debtors, &payments, as_of, months)
            .into_iter()
            .map(Into::into)
            .collect(),
    }))
}
