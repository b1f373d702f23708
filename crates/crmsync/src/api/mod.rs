//! Access layer: async calls over the record store with artificial latency.
//!
//! Nothing outside this module touches the repository directly.

pub mod auth;
mod customers;
mod error;
mod faults;
mod ids;

pub use auth::SessionApi;
pub use customers::CustomersApi;
pub use error::{ApiError, Result};
pub use faults::FaultInjector;
pub use ids::IdGenerator;

/// Fixed delay of each simulated call.
pub mod latency {
    use std::time::Duration;

    pub const FETCH_ALL: Duration = Duration::from_millis(600);
    pub const CREATE: Duration = Duration::from_millis(700);
    pub const UPDATE: Duration = Duration::from_millis(600);
    pub const DELETE: Duration = Duration::from_millis(500);
    pub const LOGIN: Duration = Duration::from_millis(800);
    pub const CURRENT_USER: Duration = Duration::from_millis(500);
    pub const LOGOUT: Duration = Duration::from_millis(300);
}
