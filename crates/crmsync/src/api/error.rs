use thiserror::Error;

use crmsync_core::auth::AuthError;
use crmsync_core::customer::ValidationErrors;
use crmsync_core::storage::RepositoryError;

/// Result type for access layer calls.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors returned by the access layer.
///
/// Clonable so a single failed fetch can be handed to every reader waiting
/// on it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Datos inválidos: {0}")]
    Validation(ValidationErrors),

    #[error("Cliente no encontrado: {0}")]
    NotFound(String),

    /// Simulated transport failure; the message is kept verbatim.
    #[error("{0}")]
    Network(String),

    #[error("No autenticado")]
    Unauthenticated,

    #[error("Credenciales inválidas")]
    InvalidCredentials,

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// The task running the call panicked or was cancelled.
    #[error("Operación interrumpida: {0}")]
    Aborted(String),
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl From<AuthError> for ApiError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::InvalidCredentials => ApiError::InvalidCredentials,
            AuthError::NotAuthenticated => ApiError::Unauthenticated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crmsync_core::customer::CustomerError;

    #[test]
    fn test_api_error_display() {
        assert_eq!(
            ApiError::Network("Error de red simulado".to_string()).to_string(),
            "Error de red simulado"
        );
        assert_eq!(
            ApiError::NotFound("42".to_string()).to_string(),
            "Cliente no encontrado: 42"
        );
        assert_eq!(ApiError::Unauthenticated.to_string(), "No autenticado");
    }

    #[test]
    fn test_validation_display_lists_fields() {
        let mut errors = ValidationErrors::new();
        errors.push(CustomerError::NameTooShort);

        let error = ApiError::from(errors);

        assert_eq!(
            error.to_string(),
            "Datos inválidos: name: El nombre debe tener al menos 2 caracteres"
        );
    }

    #[test]
    fn test_from_auth_error() {
        assert_eq!(
            ApiError::from(AuthError::InvalidCredentials),
            ApiError::InvalidCredentials
        );
        assert_eq!(
            ApiError::from(AuthError::NotAuthenticated),
            ApiError::Unauthenticated
        );
    }

    #[test]
    fn test_repository_error_is_transparent() {
        let error = ApiError::from(RepositoryError::customer_exists("7"));
        assert_eq!(error.to_string(), "Customer already exists: 7");
    }
}
