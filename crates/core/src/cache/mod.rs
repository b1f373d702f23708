//! Types shared by query caches: keys, entry snapshots, events and errors.
//!
//! The cache itself is async and lives in the application crate.

mod error;
mod keys;
mod types;

pub use error::{CacheError, Result};
pub use keys::{QueryKey, CURRENT_USER_KEY, CUSTOMERS_KEY};
pub use types::{CacheEntry, QueryEvent, QueryStatus};
