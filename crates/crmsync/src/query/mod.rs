//! Cache coordinator.
//!
//! Keeps the last known result of each query key, serves it while fresh,
//! runs a single shared fetch per key when it is not, and marks entries
//! stale on invalidation so the next read refetches.

mod cache;

pub use cache::{QueryCache, Result, DEFAULT_EVENT_CAPACITY, DEFAULT_RETRIES};
