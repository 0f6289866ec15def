//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the debtor and payment listings and the master
//! definition for the OpenAPI specification.

use crate::web::reports::{
    DashboardResponse, DistributionSliceResponse, MonthlyReportResponse, MonthlyTotalsResponse,
    PortfolioResponse, UpcomingPaymentResponse,
};
use crate::web::state::{parse_param, port_error_response, resolve_as_of, AppState, HandlerError};
use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use chrono::NaiveDate;
use loan_ledger_core::accounting::{account_summary, next_due_date};
use loan_ledger_core::domain::{AccountSummary, Debtor, Payment};
use loan_ledger_core::query::{debtor_name_for, DebtorQuery, DebtorSort, PaymentQuery};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, OpenApi, ToSchema};
use uuid::Uuid;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        list_debtors_handler,
        get_debtor_handler,
        list_payments_handler,
        crate::web::reports::portfolio_handler,
        crate::web::reports::dashboard_handler,
        crate::web::reports::monthly_report_handler,
    ),
    components(
        schemas(
            DebtorResponse,
            DebtorListResponse,
            DebtorDetailResponse,
            AccountSummaryResponse,
            PaymentResponse,
            PortfolioResponse,
            UpcomingPaymentResponse,
            DashboardResponse,
            DistributionSliceResponse,
            MonthlyReportResponse,
            MonthlyTotalsResponse,
        )
    ),
    tags(
        (name = "Loan Ledger API", description = "Read-only balances and reports for a loan portfolio.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

#[derive(Debug, Serialize, ToSchema)]
pub struct AccountSummaryResponse {
    pub total_paid: f64,
    pub accrued_interest: f64,
    pub outstanding_balance: f64,
}

impl From<AccountSummary> for AccountSummaryResponse {
    fn from(summary: AccountSummary) -> Self {
        Self {
            total_paid: summary.total_paid,
            accrued_interest: summary.accrued_interest,
            outstanding_balance: summary.outstanding_balance,
        }
    }
}

/// A debtor with its balances evaluated at `as_of`.
#[derive(Debug, Serialize, ToSchema)]
pub struct DebtorResponse {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub principal: f64,
    pub loan_date: NaiveDate,
    pub due_dates: Vec<NaiveDate>,
    /// Monthly interest rate as a fraction.
    pub monthly_rate: f64,
    pub status: String,
    pub stored_accrued_interest: Option<f64>,
    pub next_due_date: Option<NaiveDate>,
    pub summary: AccountSummaryResponse,
}

impl DebtorResponse {
    pub fn evaluate(debtor: &Debtor, payments: &[Payment], as_of: NaiveDate) -> Self {
        let mut due_dates = debtor.due_dates.clone();
        due_dates.sort();
        Self {
            id: debtor.id,
            name: debtor.name.clone(),
            phone: debtor.phone.clone(),
            email: debtor.email.clone(),
            principal: debtor.principal,
            loan_date: debtor.loan_date,
            due_dates,
            monthly_rate: debtor.monthly_rate,
            status: debtor.status.to_string(),
            stored_accrued_interest: debtor.stored_accrued_interest,
            next_due_date: next_due_date(debtor, as_of),
            summary: account_summary(debtor, payments, as_of).into(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentResponse {
    pub id: Uuid,
    pub debtor_id: Uuid,
    /// Absent when the payment references an unknown debtor.
    pub debtor_name: Option<String>,
    pub paid_on: NaiveDate,
    pub amount: f64,
    pub method: String,
    pub note: Option<String>,
}

impl PaymentResponse {
    pub fn with_debtor_name(payment: &Payment, debtors: &[Debtor]) -> Self {
        Self {
            id: payment.id,
            debtor_id: payment.debtor_id,
            debtor_name: debtor_name_for(debtors, payment.debtor_id).map(str::to_string),
            paid_on: payment.paid_on,
            amount: payment.amount,
            method: payment.method.to_string(),
            note: payment.note.clone(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DebtorDetailResponse {
    pub as_of: NaiveDate,
    pub debtor: DebtorResponse,
    /// Newest first.
    pub payments: Vec<PaymentResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DebtorListResponse {
    pub as_of: NaiveDate,
    pub debtors: Vec<DebtorResponse>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DebtorListParams {
    /// One of `active`, `overdue`, `paid`.
    pub status: Option<String>,
    /// Matches name, email or phone.
    pub search: Option<String>,
    /// One of `newest` (default), `oldest`, `principal`, `name`.
    pub sort: Option<String>,
    /// Evaluation date, defaults to today.
    pub as_of: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DebtorDetailParams {
    pub as_of: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaymentListParams {
    pub debtor_id: Option<Uuid>,
    /// One of `cash`, `transfer`, `other`.
    pub method: Option<String>,
    /// Matches part of the payment id.
    pub search: Option<String>,
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// List debtors with their balances.
#[utoipa::path(
    get,
    path = "/debtors",
    params(DebtorListParams),
    responses(
        (status = 200, description = "Debtors matching the filters", body = DebtorListResponse),
        (status = 400, description = "Unknown status or sort order"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_debtors_handler(
    State(app_state): State<Arc<AppState>>,
    Query(params): Query<DebtorListParams>,
) -> Result<Json<DebtorListResponse>, HandlerError> {
    let query = DebtorQuery {
        status: parse_param("status", params.status.as_deref())?,
        search: params.search,
        sort: parse_param::<DebtorSort>("sort", params.sort.as_deref())?.unwrap_or_default(),
    };
    let as_of = resolve_as_of(params.as_of);
    let (debtors, payments) = app_state.load_ledger().await?;

    let listed = query
        .apply(&debtors)
        .into_iter()
        .map(|d| DebtorResponse::evaluate(d, &payments, as_of))
        .collect();

    Ok(Json(DebtorListResponse {
        as_of,
        debtors: listed,
    }))
}

/// Fetch one debtor with balances and payment history.
#[utoipa::path(
    get,
    path = "/debtors/{id}",
    params(
        ("id" = Uuid, Path, description = "The debtor's id."),
        DebtorDetailParams
    ),
    responses(
        (status = 200, description = "The debtor", body = DebtorDetailResponse),
        (status = 404, description = "No such debtor"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_debtor_handler(
    State(app_state): State<Arc<AppState>>,
    Path(debtor_id): Path<Uuid>,
    Query(params): Query<DebtorDetailParams>,
) -> Result<Json<DebtorDetailResponse>, HandlerError> {
    let as_of = resolve_as_of(params.as_of);
    let ledger = &app_state.ledger;
    let (debtor, payments) = tokio::try_join!(ledger.get_debtor(debtor_id), ledger.fetch_payments())
        .map_err(|e| port_error_response("load debtor", e))?;

    let own = PaymentQuery {
        debtor_id: Some(debtor.id),
        ..Default::default()
    };
    let debtors = std::slice::from_ref(&debtor);
    let history = own
        .apply(&payments)
        .into_iter()
        .map(|p| PaymentResponse::with_debtor_name(p, debtors))
        .collect();

    Ok(Json(DebtorDetailResponse {
        as_of,
        debtor: DebtorResponse::evaluate(&debtor, &payments, as_of),
        payments: history,
    }))
}

/// List payments, newest first.
#[utoipa::path(
    get,
    path = "/payments",
    params(PaymentListParams),
    responses(
        (status = 200, description = "Payments matching the filters", body = Vec<PaymentResponse>),
        (status = 400, description = "Unknown payment method"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_payments_handler(
    State(app_state): State<Arc<AppState>>,
    Query(params): Query<PaymentListParams>,
) -> Result<Json<Vec<PaymentResponse>>, HandlerError> {
    let query = PaymentQuery {
        debtor_id: params.debtor_id,
        method: parse_param("method", params.method.as_deref())?,
        search: params.search,
    };
    let (debtors, payments) = app_state.load_ledger().await?;

    Ok(Json(
        query
            .apply(&payments)
            .into_iter()
            .map(|p| PaymentResponse::with_debtor_name(p, &debtors))
            .collect(),
    ))
}
