//! Storage backends for the `CustomerRepository` trait defined in
//! `crmsync_core::storage`.
//!
//! Only the in-memory backend exists; it plays the part of the remote
//! source of truth.

pub mod inmemory;

pub use inmemory::InMemoryRepository;
