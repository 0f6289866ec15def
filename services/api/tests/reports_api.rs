use api_lib::adapters::DemoAdapter;
use api_lib::config::Config;
use api_lib::web::reports::{MonthlyReportParams, PortfolioParams, ReportParams};
use api_lib::web::rest::{DebtorDetailParams, DebtorListParams, PaymentListParams};
use api_lib::web::state::AppState;
use api_lib::web::{
    dashboard_handler, get_debtor_handler, list_debtors_handler, list_payments_handler,
    monthly_report_handler, portfolio_handler,
};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::NaiveDate;
use loan_ledger_core::domain::{Debtor, DebtorStatus, Payment, PaymentMethod};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

fn anchor() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 4, 10).expect("valid date")
}

fn demo_config() -> Arc<Config> {
    let vars: HashMap<&str, &str> = [("DATA_SOURCE", "demo")].into_iter().collect();
    Arc::new(Config::from_lookup(|k| vars.get(k).map(|v| v.to_string())).expect("demo config"))
}

fn demo_state() -> Arc<AppState> {
    Arc::new(AppState::new(
        Arc::new(DemoAdapter::seeded(anchor())),
        demo_config(),
    ))
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

#[tokio::test]
async fn portfolio_report_matches_seeded_ledger() {
    let report = portfolio_handler(
        State(demo_state()),
        Query(PortfolioParams {
            as_of: Some(anchor()),
            window_days: None,
        }),
    )
    .await
    .expect("portfolio report")
    .0;

    assert_eq!(report.window_days, 7);
    assert_eq!(report.active_loans, 2);
    assert_close(report.total_active_principal, 17000.0);
    assert_close(report.total_accrued_interest, 500.0 + 1440.0 + 2000.0 / 3.0 + 300.0);
    assert_close(report.total_collected, 7600.0);

    let names: Vec<&str> = report
        .upcoming_payments
        .iter()
        .map(|u| u.debtor_name.as_str())
        .collect();
    assert_eq!(names, vec!["Ana Torres", "Luis Ramos"]);
    assert_eq!(
        report.upcoming_payments[0].due_date,
        NaiveDate::from_ymd_opt(2024, 4, 13).expect("valid date")
    );
}

#[tokio::test]
async fn portfolio_window_can_be_narrowed() {
    let report = portfolio_handler(
        State(demo_state()),
        Query(PortfolioParams {
            as_of: Some(anchor()),
            window_days: Some(5),
        }),
    )
    .await
    .expect("portfolio report")
    .0;

    assert_eq!(report.upcoming_payments.len(), 1);
    assert_eq!(report.upcoming_payments[0].debtor_name, "Ana Torres");
}

#[tokio::test]
async fn debtor_listing_carries_balances_and_next_due_date() {
    let listing = list_debtors_handler(
        State(demo_state()),
        Query(DebtorListParams {
            status: Some("active".to_string()),
            sort: Some("name".to_string()),
            as_of: Some(anchor()),
            ..Default::default()
        }),
    )
    .await
    .expect("debtor listing")
    .0;

    assert_eq!(listing.debtors.len(), 2);
    let ana = &listing.debtors[0];
    assert_eq!(ana.name, "Ana Torres");
    assert_close(ana.summary.accrued_interest, 500.0);
    assert_close(ana.summary.total_paid, 1000.0);
    assert_close(ana.summary.outstanding_balance, 4500.0);
    assert_eq!(ana.next_due_date, NaiveDate::from_ymd_opt(2024, 4, 13));

    let luis = &listing.debtors[1];
    assert_close(luis.summary.outstanding_balance, 8940.0);
}

#[tokio::test]
async fn debtor_listing_rejects_unknown_status() {
    let result = list_debtors_handler(
        State(demo_state()),
        Query(DebtorListParams {
            status: Some("frozen".to_string()),
            ..Default::default()
        }),
    )
    .await;

    match result {
        Err((status, message)) => {
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert!(message.contains("frozen"));
        }
        Ok(_) => panic!("unknown status should be rejected"),
    }
}

#[tokio::test]
async fn paid_off_debtor_balance_is_clamped_to_zero() {
    let detail = get_debtor_handler(
        State(demo_state()),
        Path(Uuid::from_u128(4)),
        Query(DebtorDetailParams {
            as_of: Some(anchor()),
        }),
    )
    .await
    .expect("debtor detail")
    .0;

    assert_eq!(detail.debtor.status, "paid");
    assert_eq!(detail.debtor.summary.outstanding_balance, 0.0);
    assert_eq!(detail.debtor.next_due_date, None);
    assert_eq!(detail.payments.len(), 1);
    assert_eq!(detail.payments[0].debtor_name.as_deref(), Some("Jorge Silva"));
}

#[tokio::test]
async fn unknown_debtor_is_not_found() {
    let result = get_debtor_handler(
        State(demo_state()),
        Path(Uuid::from_u128(404)),
        Query(DebtorDetailParams::default()),
    )
    .await;

    match result {
        Err((status, _)) => assert_eq!(status, StatusCode::NOT_FOUND),
        Ok(_) => panic!("expected 404"),
    }
}

#[tokio::test]
async fn payment_listing_filters_by_method_and_names_debtors() {
    let payments = list_payments_handler(
        State(demo_state()),
        Query(PaymentListParams {
            method: Some("transfer".to_string()),
            ..Default::default()
        }),
    )
    .await
    .expect("payment listing")
    .0;

    assert_eq!(payments.len(), 2);
    assert!(payments.iter().all(|p| p.method == "transfer"));
    let names: Vec<_> = payments.iter().filter_map(|p| p.debtor_name.as_deref()).collect();
    assert!(names.contains(&"Ana Torres"));
    assert!(names.contains(&"Luis Ramos"));
}

#[tokio::test]
async fn orphaned_payments_are_listed_but_not_counted() {
    let debtor = Debtor {
        id: Uuid::from_u128(1),
        name: "Solo".to_string(),
        phone: "555".to_string(),
        email: "solo@example.com".to_string(),
        principal: 1000.0,
        loan_date: NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date"),
        due_dates: vec![NaiveDate::from_ymd_opt(2024, 4, 12).expect("valid date")],
        monthly_rate: 0.0,
        status: DebtorStatus::Active,
        stored_accrued_interest: None,
    };
    let payment = |n: u128, debtor: u128| Payment {
        id: Uuid::from_u128(100 + n),
        debtor_id: Uuid::from_u128(debtor),
        paid_on: NaiveDate::from_ymd_opt(2024, 2, 1).expect("valid date"),
        amount: 250.0,
        method: PaymentMethod::Cash,
        note: None,
    };
    let ledger = DemoAdapter::new(vec![debtor], vec![payment(1, 1), payment(2, 99)]);
    let state = Arc::new(AppState::new(Arc::new(ledger), demo_config()));

    let listed = list_payments_handler(State(state.clone()), Query(PaymentListParams::default()))
        .await
        .expect("payment listing")
        .0;
    assert_eq!(listed.len(), 2);
    assert_eq!(listed.iter().filter(|p| p.debtor_name.is_none()).count(), 1);

    let report = portfolio_handler(
        State(state),
        Query(PortfolioParams {
            as_of: Some(anchor()),
            window_days: None,
        }),
    )
    .await
    .expect("portfolio report")
    .0;
    assert_close(report.total_collected, 250.0);
}

#[tokio::test]
async fn dashboard_summarises_statuses_methods_and_recent_activity() {
    let dashboard = dashboard_handler(
        State(demo_state()),
        Query(ReportParams {
            as_of: Some(anchor()),
        }),
    )
    .await
    .expect("dashboard")
    .0;

    assert_eq!(dashboard.total_loans, 4);
    assert_eq!(
        (dashboard.active_loans, dashboard.overdue_loans, dashboard.paid_loans),
        (2, 1, 1)
    );
    assert_close(dashboard.total_lent, 21000.0);
    assert_close(dashboard.receivable, 4500.0 + 8940.0 + 2200.0 + 2000.0 / 3.0);

    let methods: Vec<(&str, usize)> = dashboard
        .method_distribution
        .iter()
        .map(|s| (s.category.as_str(), s.count))
        .collect();
    assert_eq!(methods, vec![("cash", 3), ("transfer", 2), ("other", 1)]);

    assert_eq!(dashboard.recent_debtors.len(), 4);
    assert_eq!(dashboard.recent_debtors[0].name, "Ana Torres");
    assert_eq!(dashboard.recent_payments.len(), 5);
    assert_eq!(
        dashboard.recent_payments[0].paid_on,
        NaiveDate::from_ymd_opt(2024, 3, 11).expect("valid date")
    );
}

#[tokio::test]
async fn monthly_report_windows_the_last_six_months() {
    let report = monthly_report_handler(
        State(demo_state()),
        Query(MonthlyReportParams {
            as_of: Some(anchor()),
            months: None,
        }),
    )
    .await
    .expect("monthly report")
    .0;

    let months: Vec<&str> = report.trailing.iter().map(|m| m.month.as_str()).collect();
    assert_eq!(
        months,
        vec!["2023-11", "2023-12", "2024-01", "2024-02", "2024-03", "2024-04"]
    );
    assert_close(report.trailing[1].lent, 12000.0);
    assert_close(report.trailing[3].lent, 5000.0);
    assert_close(report.trailing[3].paid, 1500.0);
    assert_close(report.trailing[4].paid, 2500.0);
    assert_close(report.trailing[5].paid, 0.0);

    assert_eq!(report.all_time.len(), 8);
    assert_eq!(report.all_time[0].month, "2023-06");
    assert_eq!(report.all_time[7].month, "2024-03");
}

#[tokio::test]
async fn responses_serialise_dates_as_iso_strings() {
    let report = portfolio_handler(
        State(demo_state()),
        Query(PortfolioParams {
            as_of: Some(anchor()),
            window_days: None,
        }),
    )
    .await
    .expect("portfolio report")
    .0;

    let json = serde_json::to_value(&report).expect("serialise");
    assert_eq!(json["as_of"], "2024-04-10");
    assert_eq!(json["upcoming_payments"][1]["due_date"], "2024-04-16");
}
