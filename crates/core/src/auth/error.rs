use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Credenciales inválidas")]
    InvalidCredentials,

    #[error("No autenticado")]
    NotAuthenticated,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_display() {
        assert_eq!(
            AuthError::InvalidCredentials.to_string(),
            "Credenciales inválidas"
        );
        assert_eq!(AuthError::NotAuthenticated.to_string(), "No autenticado");
    }
}
