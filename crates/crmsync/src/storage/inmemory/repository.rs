//! In-memory repository implementation.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crmsync_core::customer::{seed_customers, Customer, UpdateCustomerRequest};
use crmsync_core::storage::{CustomerRepository, RepositoryError, Result};

/// In-memory customer store.
///
/// Records keep insertion order. Ids are unique at all times: `insert`
/// refuses a duplicate and construction drops repeated ids.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    customers: Arc<RwLock<Vec<Customer>>>,
}

impl InMemoryRepository {
    /// Creates a new empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository holding `customers`.
    ///
    /// When two customers share an id only the first one is kept.
    pub fn with_customers(customers: Vec<Customer>) -> Self {
        let mut unique: Vec<Customer> = Vec::with_capacity(customers.len());
        for customer in customers {
            if unique.iter().any(|c| c.id == customer.id) {
                tracing::warn!(customer_id = %customer.id, "Dropping customer with duplicate id");
                continue;
            }
            unique.push(customer);
        }

        Self {
            customers: Arc::new(RwLock::new(unique)),
        }
    }

    /// Creates a repository seeded with the demo customers.
    pub fn with_demo_data() -> Self {
        Self::with_customers(seed_customers())
    }

    /// Number of stored customers.
    pub async fn len(&self) -> usize {
        self.customers.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.customers.read().await.is_empty()
    }
}

#[async_trait]
impl CustomerRepository for InMemoryRepository {
    async fn list(&self) -> Result<Vec<Customer>> {
        let customers = self.customers.read().await;
        Ok(customers.clone())
    }

    async fn get(&self, id: &str) -> Result<Option<Customer>> {
        let customers = self.customers.read().await;
        Ok(customers.iter().find(|c| c.id == id).cloned())
    }

    async fn insert(&self, customer: &Customer) -> Result<()> {
        let mut customers = self.customers.write().await;
        if customers.iter().any(|c| c.id == customer.id) {
            return Err(RepositoryError::customer_exists(&customer.id));
        }
        customers.push(customer.clone());
        Ok(())
    }

    async fn update(&self, id: &str, patch: UpdateCustomerRequest) -> Result<Customer> {
        let mut customers = self.customers.write().await;
        let customer = customers
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| RepositoryError::customer_not_found(id))?;
        patch.apply_to(customer);
        Ok(customer.clone())
    }

    async fn remove(&self, id: &str) -> Result<bool> {
        let mut customers = self.customers.write().await;
        let before = customers.len();
        customers.retain(|c| c.id != id);

        let removed = customers.len() != before;
        if !removed {
            tracing::debug!(customer_id = %id, "Delete of unknown customer is a no-op");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use crmsync_core::customer::CustomerStatus;

    fn customer(id: &str, name: &str) -> Customer {
        Customer::new(
            id,
            name,
            format!("{}@example.com", name.to_lowercase()),
            "+34 600 000 000",
            "Empresa Demo",
            CustomerStatus::Active,
            Utc.with_ymd_and_hms(2024, 6, 15, 10, 0, 0).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let repo = InMemoryRepository::new();
        let ana = customer("100", "Ana");

        repo.insert(&ana).await.unwrap();

        assert_eq!(repo.get("100").await.unwrap(), Some(ana));
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_get_nonexistent() {
        let repo = InMemoryRepository::new();
        assert!(repo.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_duplicate_id_fails() {
        let repo = InMemoryRepository::new();
        repo.insert(&customer("1", "Ana")).await.unwrap();

        let result = repo.insert(&customer("1", "Luis")).await;

        assert_eq!(result, Err(RepositoryError::customer_exists("1")));
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order() {
        let repo = InMemoryRepository::new();
        for (id, name) in [("3", "Carla"), ("1", "Ana"), ("2", "Beto")] {
            repo.insert(&customer(id, name)).await.unwrap();
        }

        let ids: Vec<String> = repo.list().await.unwrap().into_iter().map(|c| c.id).collect();

        assert_eq!(ids, vec!["3", "1", "2"]);
    }

    #[tokio::test]
    async fn test_update_merges_present_fields() {
        let repo = InMemoryRepository::new();
        repo.insert(&customer("1", "Ana")).await.unwrap();

        let updated = repo
            .update(
                "1",
                UpdateCustomerRequest::new()
                    .with_company("Nueva Empresa")
                    .with_status(CustomerStatus::Inactive),
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Ana");
        assert_eq!(updated.company, "Nueva Empresa");
        assert_eq!(updated.status, CustomerStatus::Inactive);
        assert_eq!(repo.get("1").await.unwrap(), Some(updated));
    }

    #[tokio::test]
    async fn test_update_nonexistent_fails() {
        let repo = InMemoryRepository::new();

        let result = repo
            .update("42", UpdateCustomerRequest::new().with_name("Nadie"))
            .await;

        assert!(matches!(result, Err(e) if e.is_not_found()));
    }

    #[tokio::test]
    async fn test_remove() {
        let repo = InMemoryRepository::with_demo_data();

        assert!(repo.remove("3").await.unwrap());
        assert!(repo.get("3").await.unwrap().is_none());
        assert_eq!(repo.len().await, 11);
    }

    #[tokio::test]
    async fn test_remove_nonexistent_is_noop() {
        let repo = InMemoryRepository::with_demo_data();

        assert!(!repo.remove("999").await.unwrap());
        assert_eq!(repo.len().await, 12);
    }

    #[tokio::test]
    async fn test_with_customers_drops_duplicate_ids() {
        let repo = InMemoryRepository::with_customers(vec![
            customer("1", "Ana"),
            customer("1", "Luis"),
            customer("2", "Beto"),
        ]);

        let customers = repo.list().await.unwrap();
        assert_eq!(customers.len(), 2);
        assert_eq!(customers[0].name, "Ana");
    }

    #[tokio::test]
    async fn test_clones_share_records() {
        let repo = InMemoryRepository::new();
        let handle = repo.clone();

        handle.insert(&customer("7", "Gema")).await.unwrap();

        assert!(!repo.is_empty().await);
    }
}
