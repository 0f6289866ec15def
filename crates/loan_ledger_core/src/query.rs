//! crates/loan_ledger_core/src/query.rs
//!
//! Filtering and ordering for the debtor and payment listings.

use std::str::FromStr;

use crate::domain::{Debtor, DebtorId, DebtorStatus, ParseEnumError, Payment, PaymentMethod};

/// Ordering applied to a debtor listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DebtorSort {
    /// Most recent loan date first.
    #[default]
    Newest,
    Oldest,
    LargestPrincipal,
    Name,
}

impl FromStr for DebtorSort {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "newest" => Ok(Self::Newest),
            "oldest" => Ok(Self::Oldest),
            "principal" | "largest_principal" => Ok(Self::LargestPrincipal),
            "name" => Ok(Self::Name),
            _ => Err(ParseEnumError {
                kind: "debtor sort order",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DebtorQuery {
    pub status: Option<DebtorStatus>,
    /// Case-insensitive match against name and email, plain substring on phone.
    pub search: Option<String>,
    pub sort: DebtorSort,
}

impl DebtorQuery {
    pub fn matches(&self, debtor: &Debtor) -> bool {
        if self.status.is_some_and(|s| s != debtor.status) {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let lowered = term.to_lowercase();
                debtor.name.to_lowercase().contains(&lowered)
                    || debtor.email.to_lowercase().contains(&lowered)
                    || debtor.phone.contains(term)
            }
        }
    }

    pub fn apply<'a>(&self, debtors: &'a [Debtor]) -> Vec<&'a Debtor> {
        let mut selected: Vec<&Debtor> = debtors.iter().filter(|d| self.matches(d)).collect();
        match self.sort {
            DebtorSort::Newest => selected.sort_by(|a, b| b.loan_date.cmp(&a.loan_date)),
            DebtorSort::Oldest => selected.sort_by(|a, b| a.loan_date.cmp(&b.loan_date)),
            DebtorSort::LargestPrincipal => {
                selected.sort_by(|a, b| b.principal.total_cmp(&a.principal))
            }
            DebtorSort::Name => {
                selected.sort_by_cached_key(|d| d.name.to_lowercase());
            }
        }
        selected
    }
}

#[derive(Debug, Clone, Default)]
pub struct PaymentQuery {
    pub debtor_id: Option<DebtorId>,
    pub method: Option<PaymentMethod>,
    /// Case-insensitive substring of the payment id.
    pub search: Option<String>,
}

impl PaymentQuery {
    pub fn matches(&self, payment: &Payment) -> bool {
        if self.debtor_id.is_some_and(|id| id != payment.debtor_id) {
            return false;
        }
        if self.method.is_some_and(|m| m != payment.method) {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => payment
                .id
                .to_string()
                .contains(&term.to_lowercase()),
        }
    }

    /// Keeps the caller's ordering.
    pub fn apply<'a>(&self, payments: &'a [Payment]) -> Vec<&'a Payment> {
        payments.iter().filter(|p| self.matches(p)).collect()
    }
}

/// Looks up the display name for a payment's debtor.
pub fn debtor_name_for(debtors: &[Debtor], debtor_id: DebtorId) -> Option<&str> {
    debtors
        .iter()
        .find(|d| d.id == debtor_id)
        .map(|d| d.name.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn debtor(n: u128, name: &str, principal: f64, month: u32, status: DebtorStatus) -> Debtor {
        Debtor {
            id: Uuid::from_u128(n),
            name: name.to_string(),
            phone: format!("55510{n:02}"),
            email: format!("{}@Example.com", name.to_lowercase()),
            principal,
            loan_date: NaiveDate::from_ymd_opt(2024, month, 1).unwrap(),
            due_dates: vec![],
            monthly_rate: 0.03,
            status,
            stored_accrued_interest: None,
        }
    }

    fn fixtures() -> Vec<Debtor> {
        vec![
            debtor(1, "Marta", 300.0, 2, DebtorStatus::Active),
            debtor(2, "alberto", 900.0, 5, DebtorStatus::Overdue),
            debtor(3, "Zoe", 600.0, 1, DebtorStatus::Active),
        ]
    }

    fn names(list: Vec<&Debtor>) -> Vec<&str> {
        list.into_iter().map(|d| d.name.as_str()).collect()
    }

    #[test]
    fn default_query_lists_newest_loans_first() {
        let debtors = fixtures();
        assert_eq!(names(DebtorQuery::default().apply(&debtors)), vec!["alberto", "Marta", "Zoe"]);
    }

    #[test]
    fn sort_orders() {
        let debtors = fixtures();
        let by = |sort| DebtorQuery { sort, ..Default::default() };
        assert_eq!(names(by(DebtorSort::Oldest).apply(&debtors)), vec!["Zoe", "Marta", "alberto"]);
        assert_eq!(
            names(by(DebtorSort::LargestPrincipal).apply(&debtors)),
            vec!["alberto", "Zoe", "Marta"]
        );
        assert_eq!(names(by(DebtorSort::Name).apply(&debtors)), vec!["alberto", "Marta", "Zoe"]);
    }

    #[test]
    fn status_and_search_filters_combine() {
        let debtors = fixtures();
        let query = DebtorQuery {
            status: Some(DebtorStatus::Active),
            search: Some("EXAMPLE".to_string()),
            sort: DebtorSort::Name,
        };
        assert_eq!(names(query.apply(&debtors)), vec!["Marta", "Zoe"]);

        let by_phone = DebtorQuery {
            search: Some("5551002".to_string()),
            ..Default::default()
        };
        assert_eq!(names(by_phone.apply(&debtors)), vec!["alberto"]);
    }

    #[test]
    fn sort_labels_parse() {
        assert_eq!("principal".parse::<DebtorSort>(), Ok(DebtorSort::LargestPrincipal));
        assert!("sideways".parse::<DebtorSort>().is_err());
    }

    #[test]
    fn payment_filters() {
        let debtor_id = Uuid::from_u128(1);
        let payments = vec![
            Payment {
                id: Uuid::from_u128(0xabc),
                debtor_id,
                paid_on: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                amount: 10.0,
                method: PaymentMethod::Cash,
                note: None,
            },
            Payment {
                id: Uuid::from_u128(0xdef),
                debtor_id: Uuid::from_u128(2),
                paid_on: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                amount: 20.0,
                method: PaymentMethod::Transfer,
                note: Some("wire".to_string()),
            },
        ];

        let by_debtor = PaymentQuery { debtor_id: Some(debtor_id), ..Default::default() };
        assert_eq!(by_debtor.apply(&payments).len(), 1);

        let by_method = PaymentQuery { method: Some(PaymentMethod::Transfer), ..Default::default() };
        assert_eq!(by_method.apply(&payments)[0].amount, 20.0);

        let by_id = PaymentQuery { search: Some("DEF".to_string()), ..Default::default() };
        assert_eq!(by_id.apply(&payments)[0].id, Uuid::from_u128(0xdef));
    }

    #[test]
    fn debtor_names_resolve_or_are_absent() {
        let debtors = fixtures();
        assert_eq!(debtor_name_for(&debtors, Uuid::from_u128(3)), Some("Zoe"));
        assert_eq!(debtor_name_for(&debtors, Uuid::from_u128(9)), None);
    }
}
