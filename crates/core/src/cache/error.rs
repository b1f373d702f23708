use thiserror::Error;

/// Errors surfaced by a cached read.
///
/// `E` is the error type of the fetcher. It is kept as-is so the caller can
/// show the original message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError<E> {
    #[error("{0}")]
    Fetch(E),
    #[error("Fetch aborted: {0}")]
    Aborted(String),
}

impl<E> CacheError<E> {
    /// Returns the fetcher error, if the fetch itself failed.
    pub fn fetch_error(&self) -> Option<&E> {
        match self {
            CacheError::Fetch(e) => Some(e),
            CacheError::Aborted(_) => None,
        }
    }
}

/// Result type for cached reads.
pub type Result<T, E> = std::result::Result<T, CacheError<E>>;
