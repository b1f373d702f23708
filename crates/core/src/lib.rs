//! crmsync_core - pure types and functions for the customer records layer.
//!
//! Nothing in this crate performs I/O or sleeps. The async shell (`crmsync`)
//! builds the record store, access layer, query cache and mutation pipeline
//! on top of these types.

pub mod auth;
pub mod cache;
pub mod customer;
pub mod export;
pub mod listing;
pub mod serde;
pub mod storage;
