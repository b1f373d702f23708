//! Demo authentication: one fixed account and an opaque session token.

mod error;
mod functions;
mod types;

pub use error::AuthError;
pub use functions::{authenticate, demo_credentials, demo_user, DEMO_EMAIL, DEMO_PASSWORD};
pub use types::{AuthResponse, Credentials, SessionToken, User, UserRole};
