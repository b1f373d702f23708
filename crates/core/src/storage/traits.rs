use async_trait::async_trait;

use crate::customer::{Customer, UpdateCustomerRequest};

use super::Result;

/// Authoritative customer collection.
///
/// Implementations own every record; callers only ever receive copies.
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Returns every customer in insertion order.
    async fn list(&self) -> Result<Vec<Customer>>;

    /// Gets a customer by id.
    async fn get(&self, id: &str) -> Result<Option<Customer>>;

    /// Appends a customer. Fails if the id is already present.
    async fn insert(&self, customer: &Customer) -> Result<()>;

    /// Merges the present fields of `patch` into a customer and returns the
    /// result. Fails if the id is absent.
    async fn update(&self, id: &str, patch: UpdateCustomerRequest) -> Result<Customer>;

    /// Removes a customer. Returns `false` when there was nothing to remove.
    async fn remove(&self, id: &str) -> Result<bool>;
}
