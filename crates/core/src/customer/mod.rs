mod error;
mod mock_data;
mod requests;
mod stats;
mod types;
mod validation;

pub use error::{CustomerError, ValidationErrors};
pub use mock_data::seed_customers;
pub use requests::{CreateCustomerRequest, UpdateCustomerRequest};
pub use stats::CustomerStats;
pub use types::{Customer, CustomerStatus};
pub use validation::{is_valid_email, is_valid_phone_format, validate_create, validate_update};
