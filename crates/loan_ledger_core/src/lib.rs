pub mod accounting;
pub mod domain;
pub mod ports;
pub mod query;
pub mod reports;

pub use accounting::{
    account_summary, accrued_interest, next_due_date, outstanding_balance, portfolio_summary,
    portfolio_summary_with_window, total_paid, upcoming_due_within, DEFAULT_UPCOMING_WINDOW_DAYS,
};
pub use domain::{
    AccountSummary, Debtor, DebtorId, DebtorStatus, Payment, PaymentId, PaymentMethod,
    PortfolioSummary, UpcomingPayment,
};
pub use ports::{LedgerRepository, PortError, PortResult};
pub use query::{DebtorQuery, DebtorSort, PaymentQuery};
