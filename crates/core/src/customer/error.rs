use std::fmt;

use thiserror::Error;

/// A single field that failed validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CustomerError {
    #[error("El nombre debe tener al menos 2 caracteres")]
    NameTooShort,
    #[error("Email inválido")]
    InvalidEmail,
    #[error("Teléfono inválido")]
    PhoneTooShort,
    #[error("Formato de teléfono inválido")]
    InvalidPhoneFormat,
    #[error("La empresa debe tener al menos 2 caracteres")]
    CompanyTooShort,
    #[error("Estado inválido: {0}")]
    InvalidStatus(String),
}

impl CustomerError {
    /// Returns the name of the form field this error belongs to.
    pub fn field(&self) -> &'static str {
        match self {
            CustomerError::NameTooShort => "name",
            CustomerError::InvalidEmail => "email",
            CustomerError::PhoneTooShort | CustomerError::InvalidPhoneFormat => "phone",
            CustomerError::CompanyTooShort => "company",
            CustomerError::InvalidStatus(_) => "status",
        }
    }
}

/// Every field failure found in one request, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<CustomerError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: CustomerError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[CustomerError] {
        &self.errors
    }

    /// Returns the errors reported for a single field.
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a CustomerError> {
        self.errors.iter().filter(move |e| e.field() == field)
    }

    /// `Ok(())` when nothing was collected.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", error.field(), error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl From<CustomerError> for ValidationErrors {
    fn from(error: CustomerError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}
