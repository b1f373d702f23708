use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::customer::{Customer, CustomerError, CustomerStatus};

/// Status filter applied after the text search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    /// Pass every status through.
    #[default]
    All,
    Active,
    Pending,
    Inactive,
}

impl StatusFilter {
    /// Returns true if a customer with `status` passes the filter.
    pub fn accepts(&self, status: CustomerStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => status == CustomerStatus::Active,
            StatusFilter::Pending => status == CustomerStatus::Pending,
            StatusFilter::Inactive => status == CustomerStatus::Inactive,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Active => "active",
            StatusFilter::Pending => "pending",
            StatusFilter::Inactive => "inactive",
        }
    }
}

impl From<CustomerStatus> for StatusFilter {
    fn from(status: CustomerStatus) -> Self {
        match status {
            CustomerStatus::Active => StatusFilter::Active,
            CustomerStatus::Pending => StatusFilter::Pending,
            CustomerStatus::Inactive => StatusFilter::Inactive,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusFilter {
    type Err = CustomerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::All);
        }
        s.parse::<CustomerStatus>().map(StatusFilter::from)
    }
}

/// Normalizes a committed search term for matching.
///
/// Surrounding whitespace is ignored, so a blank term disables the text
/// filter.
pub fn normalize_term(term: &str) -> String {
    term.trim().to_lowercase()
}

/// Filters customers by search term and status.
///
/// The term is matched case-insensitively as a substring of name, email or
/// company (any field). Both the term and the status must match. Input
/// order is preserved.
pub fn filter_customers<'a>(
    customers: &'a [Customer],
    term: &str,
    status: StatusFilter,
) -> Vec<&'a Customer> {
    let term = normalize_term(term);
    customers
        .iter()
        .filter(|c| term.is_empty() || c.matches_term(&term))
        .filter(|c| status.accepts(c.status))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customer::seed_customers;

    fn ids(customers: &[&Customer]) -> Vec<String> {
        customers.iter().map(|c| c.id.clone()).collect()
    }

    #[test]
    fn test_empty_term_and_all_status_keeps_everything() {
        let customers = seed_customers();

        let filtered = filter_customers(&customers, "", StatusFilter::All);

        assert_eq!(filtered.len(), customers.len());
    }

    #[test]
    fn test_whitespace_term_is_empty() {
        let customers = seed_customers();

        assert_eq!(
            filter_customers(&customers, "   ", StatusFilter::All).len(),
            customers.len()
        );
    }

    #[test]
    fn test_term_is_case_insensitive() {
        let customers = seed_customers();

        let filtered = filter_customers(&customers, "JUAN", StatusFilter::All);

        assert_eq!(ids(&filtered), vec!["1"]);
    }

    #[test]
    fn test_term_matches_email_or_company() {
        let customers = seed_customers();

        let by_company = filter_customers(&customers, "solutions", StatusFilter::All);
        assert_eq!(ids(&by_company), vec!["1", "9"]);

        let by_email = filter_customers(&customers, "sofia@", StatusFilter::All);
        assert_eq!(ids(&by_email), vec!["12"]);
    }

    #[test]
    fn test_term_does_not_match_phone() {
        let customers = seed_customers();

        assert!(filter_customers(&customers, "600 123", StatusFilter::All).is_empty());
    }

    #[test]
    fn test_status_filter_exact_match() {
        let customers = seed_customers();

        let pending = filter_customers(&customers, "", StatusFilter::Pending);

        assert_eq!(ids(&pending), vec!["3", "7", "12"]);
    }

    #[test]
    fn test_term_and_status_are_conjunctive() {
        let customers = seed_customers();

        assert!(filter_customers(&customers, "juan", StatusFilter::Pending).is_empty());
        assert_eq!(
            ids(&filter_customers(&customers, "juan", StatusFilter::Active)),
            vec!["1"]
        );
    }

    #[test]
    fn test_status_filter_parse() {
        assert_eq!("all".parse::<StatusFilter>(), Ok(StatusFilter::All));
        assert_eq!("ALL".parse::<StatusFilter>(), Ok(StatusFilter::All));
        assert_eq!("inactive".parse::<StatusFilter>(), Ok(StatusFilter::Inactive));
        assert!("deleted".parse::<StatusFilter>().is_err());
    }
}
