use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::CustomerError;

/// Lifecycle status of a customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerStatus {
    Active,
    Pending,
    Inactive,
}

impl CustomerStatus {
    /// Every status, in display order.
    pub const ALL: [CustomerStatus; 3] = [
        CustomerStatus::Active,
        CustomerStatus::Pending,
        CustomerStatus::Inactive,
    ];

    /// Returns the wire value (`"active"`, `"pending"`, `"inactive"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerStatus::Active => "active",
            CustomerStatus::Pending => "pending",
            CustomerStatus::Inactive => "inactive",
        }
    }

    /// Returns the localized label shown next to a customer.
    pub fn label(&self) -> &'static str {
        match self {
            CustomerStatus::Active => "Activo",
            CustomerStatus::Pending => "Pendiente",
            CustomerStatus::Inactive => "Inactivo",
        }
    }
}

impl fmt::Display for CustomerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CustomerStatus {
    type Err = CustomerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(CustomerStatus::Active),
            "pending" => Ok(CustomerStatus::Pending),
            "inactive" => Ok(CustomerStatus::Inactive),
            other => Err(CustomerError::InvalidStatus(other.to_string())),
        }
    }
}

/// A customer record.
///
/// `id` and `created_at` are assigned once by the access layer and never
/// change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub status: CustomerStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_contact: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Customer {
    /// Creates a customer with the given identity and required fields.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        company: impl Into<String>,
        status: CustomerStatus,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            company: company.into(),
            status,
            created_at,
            last_contact: None,
            notes: None,
        }
    }

    /// Sets the last contact timestamp.
    pub fn with_last_contact(mut self, last_contact: DateTime<Utc>) -> Self {
        self.last_contact = Some(last_contact);
        self
    }

    /// Sets the free-text notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Returns true if `term` (already lowercased) appears in the name,
    /// email or company.
    pub fn matches_term(&self, term: &str) -> bool {
        self.name.to_lowercase().contains(term)
            || self.email.to_lowercase().contains(term)
            || self.company.to_lowercase().contains(term)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Customer {
        Customer::new(
            "1",
            "Juan García",
            "juan@example.com",
            "+34 600 123 456",
            "Tech Solutions",
            CustomerStatus::Active,
            Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap(),
        )
    }

    #[test]
    fn test_status_round_trips_through_str() {
        for status in CustomerStatus::ALL {
            assert_eq!(status.as_str().parse::<CustomerStatus>(), Ok(status));
        }
        assert_eq!(" Pending ".parse::<CustomerStatus>(), Ok(CustomerStatus::Pending));
    }

    #[test]
    fn test_status_rejects_unknown_value() {
        assert_eq!(
            "archived".parse::<CustomerStatus>(),
            Err(CustomerError::InvalidStatus("archived".to_string()))
        );
    }

    #[test]
    fn test_customer_serializes_camel_case() {
        let customer = sample().with_notes("Cliente VIP");
        let json = serde_json::to_value(&customer).unwrap();

        assert_eq!(json["createdAt"], "2024-01-15T10:30:00Z");
        assert_eq!(json["status"], "active");
        assert_eq!(json["notes"], "Cliente VIP");
        assert!(json.get("lastContact").is_none());
    }

    #[test]
    fn test_matches_term_checks_name_email_and_company() {
        let customer = sample();

        assert!(customer.matches_term("juan"));
        assert!(customer.matches_term("example.com"));
        assert!(customer.matches_term("tech"));
        assert!(!customer.matches_term("600"));
    }
}
