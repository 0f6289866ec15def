//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{DbAdapter, DemoAdapter},
    config::{Config, DataSource},
    error::ApiError,
    web::{
        dashboard_handler, get_debtor_handler, list_debtors_handler, list_payments_handler,
        monthly_report_handler, portfolio_handler, rest::ApiDoc, state::AppState,
    },
};
use axum::{http::Method, routing::get, Router};
use chrono::Utc;
use loan_ledger_core::ports::LedgerRepository;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Select the Data Source ---
    let ledger: Arc<dyn LedgerRepository> = match &config.data_source {
        DataSource::Postgres { database_url } => {
            info!("Connecting to database...");
            let db_pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(database_url)
                .await?;
            let db_adapter = DbAdapter::new(db_pool);
            info!("Running database migrations...");
            db_adapter.run_migrations().await?;
            info!("Database migrations complete.");
            Arc::new(db_adapter)
        }
        DataSource::Demo => {
            warn!("DATA_SOURCE=demo: serving a built-in sample portfolio");
            Arc::new(DemoAdapter::seeded(Utc::now().date_naive()))
        }
    };

    // --- 3. Build the Shared AppState ---
    let app_state = Arc::new(AppState::new(ledger, config.clone()));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS]);

    // --- 4. Create the Web Router ---
    let api_router = Router::new()
        .route("/debtors", get(list_debtors_handler))
        .route("/debtors/{id}", get(get_debtor_handler))
        .route("/payments", get(list_payments_handler))
        .route("/reports/portfolio", get(portfolio_handler))
        .route("/reports/dashboard", get(dashboard_handler))
        .route("/reports/monthly", get(monthly_report_handler))
        .layer(cors)
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 5. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
