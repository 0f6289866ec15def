pub mod reports;
pub mod rest;
pub mod state;

// Re-export the handlers so the binary can build the router from one place.
pub use reports::{dashboard_handler, monthly_report_handler, portfolio_handler};
pub use rest::{get_debtor_handler, list_debtors_handler, list_payments_handler};
