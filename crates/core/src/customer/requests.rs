//! Request payloads for customer writes.
//!
//! Pure data types shared by the access layer and its callers. They carry no
//! identity: `id` and `created_at` are assigned when a create is accepted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::types::{Customer, CustomerStatus};
use crate::serde::{deserialize_optional_datetime, deserialize_optional_string};

/// Request payload for creating a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCustomerRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub status: CustomerStatus,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub notes: Option<String>,
}

impl CreateCustomerRequest {
    /// Create a request with every required field.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        company: impl Into<String>,
        status: CustomerStatus,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            company: company.into(),
            status,
            notes: None,
        }
    }

    /// Set the notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Convert into a customer with the given identity.
    pub fn into_customer(self, id: impl Into<String>, created_at: DateTime<Utc>) -> Customer {
        let mut customer = Customer::new(
            id,
            self.name,
            self.email,
            self.phone,
            self.company,
            self.status,
            created_at,
        );
        customer.notes = self.notes.filter(|n| !n.trim().is_empty());
        customer
    }
}

/// Request payload for a partial customer update.
///
/// Absent fields are left untouched (shallow merge).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomerRequest {
    #[serde(
        default,
        deserialize_with = "deserialize_optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub email: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub phone: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<CustomerStatus>,
    /// A blank value clears the stored notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_contact: Option<DateTime<Utc>>,
}

impl UpdateCustomerRequest {
    /// Create an empty update request.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    pub fn with_status(mut self, status: CustomerStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_last_contact(mut self, last_contact: DateTime<Utc>) -> Self {
        self.last_contact = Some(last_contact);
        self
    }

    /// Returns true if the request changes nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the present fields to an existing customer.
    pub fn apply_to(self, customer: &mut Customer) {
        if let Some(name) = self.name {
            customer.name = name;
        }
        if let Some(email) = self.email {
            customer.email = email;
        }
        if let Some(phone) = self.phone {
            customer.phone = phone;
        }
        if let Some(company) = self.company {
            customer.company = company;
        }
        if let Some(status) = self.status {
            customer.status = status;
        }
        if let Some(notes) = self.notes {
            customer.notes = Some(notes).filter(|n| !n.trim().is_empty());
        }
        if let Some(last_contact) = self.last_contact {
            customer.last_contact = Some(last_contact);
        }
    }
}

impl From<CreateCustomerRequest> for UpdateCustomerRequest {
    /// A full form submission used as an edit.
    fn from(request: CreateCustomerRequest) -> Self {
        Self {
            name: Some(request.name),
            email: Some(request.email),
            phone: Some(request.phone),
            company: Some(request.company),
            status: Some(request.status),
            notes: Some(request.notes.unwrap_or_default()),
            last_contact: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn created_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 10, 9, 0, 0).unwrap()
    }

    fn create_request() -> CreateCustomerRequest {
        CreateCustomerRequest::new(
            "Lucía Vega",
            "lucia@example.com",
            "+34 611 222 333",
            "Vega Logistics",
            CustomerStatus::Pending,
        )
    }

    #[test]
    fn test_into_customer_assigns_identity() {
        let customer = create_request()
            .with_notes("Llamar en febrero")
            .into_customer("1736500000000", created_at());

        assert_eq!(customer.id, "1736500000000");
        assert_eq!(customer.created_at, created_at());
        assert_eq!(customer.name, "Lucía Vega");
        assert_eq!(customer.status, CustomerStatus::Pending);
        assert_eq!(customer.notes.as_deref(), Some("Llamar en febrero"));
        assert_eq!(customer.last_contact, None);
    }

    #[test]
    fn test_into_customer_drops_blank_notes() {
        let customer = create_request()
            .with_notes("   ")
            .into_customer("1", created_at());

        assert_eq!(customer.notes, None);
    }

    #[test]
    fn test_apply_to_merges_present_fields_only() {
        let mut customer = create_request()
            .with_notes("Original")
            .into_customer("7", created_at());
        let contact = Utc.with_ymd_and_hms(2025, 2, 1, 12, 0, 0).unwrap();

        UpdateCustomerRequest::new()
            .with_status(CustomerStatus::Active)
            .with_last_contact(contact)
            .apply_to(&mut customer);

        assert_eq!(customer.id, "7");
        assert_eq!(customer.name, "Lucía Vega");
        assert_eq!(customer.status, CustomerStatus::Active);
        assert_eq!(customer.notes.as_deref(), Some("Original"));
        assert_eq!(customer.last_contact, Some(contact));
        assert_eq!(customer.created_at, created_at());
    }

    #[test]
    fn test_update_request_deserializes_blank_strings_as_none() {
        let json = r#"{"name":"","email":"nuevo@example.com","status":"inactive","lastContact":""}"#;
        let request: UpdateCustomerRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.name, None);
        assert_eq!(request.email.as_deref(), Some("nuevo@example.com"));
        assert_eq!(request.status, Some(CustomerStatus::Inactive));
        assert_eq!(request.last_contact, None);
    }

    #[test]
    fn test_empty_update_request() {
        assert!(UpdateCustomerRequest::new().is_empty());
        assert!(!UpdateCustomerRequest::new().with_name("Ana").is_empty());
    }

    #[test]
    fn test_full_form_converts_to_update() {
        let update = UpdateCustomerRequest::from(create_request());

        assert_eq!(update.name.as_deref(), Some("Lucía Vega"));
        assert_eq!(update.status, Some(CustomerStatus::Pending));
        assert_eq!(update.notes.as_deref(), Some(""));
    }

    #[test]
    fn test_blank_notes_clear_existing_notes() {
        let mut customer = create_request()
            .with_notes("Original")
            .into_customer("7", created_at());

        let request: UpdateCustomerRequest = serde_json::from_str(r#"{"notes":""}"#).unwrap();
        assert!(!request.is_empty());
        request.apply_to(&mut customer);

        assert_eq!(customer.notes, None);
        assert_eq!(customer.name, "Lucía Vega");
    }

    #[test]
    fn test_missing_notes_keep_existing_notes() {
        let mut customer = create_request()
            .with_notes("Original")
            .into_customer("7", created_at());

        let request: UpdateCustomerRequest = serde_json::from_str(r#"{"name":"Lucía V."}"#).unwrap();
        request.apply_to(&mut customer);

        assert_eq!(customer.notes.as_deref(), Some("Original"));
    }
}
