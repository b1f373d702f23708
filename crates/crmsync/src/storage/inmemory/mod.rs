//! In-memory record store.
//!
//! Holds every customer in a `Vec` wrapped in `Arc<RwLock<_>>`. Handles are
//! cheap to clone and share the same records. Nothing is persisted.
//!
//! # Example
//!
//! ```rust,ignore
//! use crmsync::storage::inmemory::InMemoryRepository;
//!
//! let repo = InMemoryRepository::with_demo_data();
//! let customers = repo.list().await?;
//! ```

mod repository;

pub use repository::InMemoryRepository;
