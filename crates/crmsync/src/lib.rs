//! crmsync - client-side data sync layer for customer records.
//!
//! The pure model lives in `crmsync_core`. This crate adds the async parts:
//! the in-memory record store, the access layer with simulated latency, the
//! query cache, the mutation pipeline, the search debouncer and the list
//! view that ties them together.

pub mod api;
pub mod cli;
pub mod config;
pub mod demo;
pub mod mutation;
pub mod output;
pub mod query;
pub mod state;
pub mod storage;
pub mod timer;
pub mod view;
