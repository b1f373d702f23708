use std::sync::LazyLock;

use regex::Regex;

use super::error::{CustomerError, ValidationErrors};
use super::requests::{CreateCustomerRequest, UpdateCustomerRequest};

const MIN_NAME_CHARS: usize = 2;
const MIN_COMPANY_CHARS: usize = 2;
const MIN_PHONE_CHARS: usize = 9;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[a-z0-9_'+\-.]*[a-z0-9_+\-]@([a-z0-9][a-z0-9\-]*\.)+[a-z]{2,}$")
        .expect("email pattern is valid")
});

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+]?[\d\s()-]+$").expect("phone pattern is valid"));

/// Checks email address syntax.
///
/// The local part may not start with a dot or contain consecutive dots.
pub fn is_valid_email(email: &str) -> bool {
    if email.starts_with('.') || email.contains("..") {
        return false;
    }
    EMAIL_RE.is_match(email)
}

/// Checks that a phone number only contains digits, spaces, parentheses and
/// dashes, with an optional leading `+`.
pub fn is_valid_phone_format(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

fn check_name(name: &str, errors: &mut ValidationErrors) {
    if name.chars().count() < MIN_NAME_CHARS {
        errors.push(CustomerError::NameTooShort);
    }
}

fn check_email(email: &str, errors: &mut ValidationErrors) {
    if !is_valid_email(email) {
        errors.push(CustomerError::InvalidEmail);
    }
}

fn check_phone(phone: &str, errors: &mut ValidationErrors) {
    if phone.chars().count() < MIN_PHONE_CHARS {
        errors.push(CustomerError::PhoneTooShort);
    }
    if !is_valid_phone_format(phone) {
        errors.push(CustomerError::InvalidPhoneFormat);
    }
}

fn check_company(company: &str, errors: &mut ValidationErrors) {
    if company.chars().count() < MIN_COMPANY_CHARS {
        errors.push(CustomerError::CompanyTooShort);
    }
}

/// Validates a create request, collecting every field failure.
pub fn validate_create(request: &CreateCustomerRequest) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    check_name(&request.name, &mut errors);
    check_email(&request.email, &mut errors);
    check_phone(&request.phone, &mut errors);
    check_company(&request.company, &mut errors);
    errors.into_result()
}

/// Validates the fields present in an update request.
pub fn validate_update(request: &UpdateCustomerRequest) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if let Some(name) = &request.name {
        check_name(name, &mut errors);
    }
    if let Some(email) = &request.email {
        check_email(email, &mut errors);
    }
    if let Some(phone) = &request.phone {
        check_phone(phone, &mut errors);
    }
    if let Some(company) = &request.company {
        check_company(company, &mut errors);
    }
    errors.into_result()
}
