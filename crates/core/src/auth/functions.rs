use super::{AuthError, Credentials, User, UserRole};

/// Email of the single demo account.
pub const DEMO_EMAIL: &str = "admin@crm.com";

/// Password of the single demo account.
pub const DEMO_PASSWORD: &str = "admin123";

/// The demo account returned on successful login.
pub fn demo_user() -> User {
    User {
        id: "1".to_string(),
        email: DEMO_EMAIL.to_string(),
        name: "Admin User".to_string(),
        role: UserRole::Admin,
    }
}

/// The credentials that unlock the demo account.
pub fn demo_credentials() -> Credentials {
    Credentials::new(DEMO_EMAIL, DEMO_PASSWORD)
}

/// Checks login credentials against the demo account.
pub fn authenticate(credentials: &Credentials) -> Result<User, AuthError> {
    if credentials.email == DEMO_EMAIL && credentials.password == DEMO_PASSWORD {
        Ok(demo_user())
    } else {
        Err(AuthError::InvalidCredentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::SessionToken;

    #[test]
    fn authenticate_accepts_demo_credentials() {
        let user = authenticate(&demo_credentials()).unwrap();
        assert_eq!(user, demo_user());
        assert_eq!(user.role, UserRole::Admin);
    }

    #[test]
    fn authenticate_rejects_wrong_password() {
        let credentials = Credentials::new(DEMO_EMAIL, "hunter2");
        assert_eq!(
            authenticate(&credentials),
            Err(AuthError::InvalidCredentials)
        );
    }

    #[test]
    fn authenticate_is_case_sensitive_on_email() {
        let credentials = Credentials::new("Admin@crm.com", DEMO_PASSWORD);
        assert_eq!(
            authenticate(&credentials),
            Err(AuthError::InvalidCredentials)
        );
    }

    #[test]
    fn mock_token_format() {
        assert_eq!(SessionToken::mock(42).as_str(), "mock-token-42");
    }
}
