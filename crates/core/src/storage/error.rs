use thiserror::Error;

/// Errors that can occur during repository operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("{entity_type} already exists: {id}")]
    AlreadyExists {
        entity_type: &'static str,
        id: String,
    },
}

impl RepositoryError {
    /// Shorthand for a missing customer.
    pub fn customer_not_found(id: impl Into<String>) -> Self {
        RepositoryError::NotFound {
            entity_type: "Customer",
            id: id.into(),
        }
    }

    /// Shorthand for a duplicate customer id.
    pub fn customer_exists(id: impl Into<String>) -> Self {
        RepositoryError::AlreadyExists {
            entity_type: "Customer",
            id: id.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RepositoryError::NotFound { .. })
    }
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;
