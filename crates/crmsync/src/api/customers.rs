//! Simulated customer endpoints over the record store.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tokio::time::sleep;

use crmsync_core::customer::{
    validate_create, validate_update, CreateCustomerRequest, Customer, UpdateCustomerRequest,
};
use crmsync_core::storage::CustomerRepository;

use super::{latency, ApiError, FaultInjector, IdGenerator, Result, SessionApi};

/// Sole gateway to customer data.
///
/// Writes validate their payload first and fail at once when it is invalid.
/// Every call that gets past validation waits for its fixed latency, then
/// checks the session gate (when one is attached) and the fault injector
/// before touching the store.
#[derive(Clone)]
pub struct CustomersApi {
    repository: Arc<dyn CustomerRepository>,
    session: Option<SessionApi>,
    ids: IdGenerator,
    faults: FaultInjector,
    fetches: Arc<AtomicUsize>,
}

impl CustomersApi {
    /// Creates an ungated access layer over `repository`.
    pub fn new(repository: Arc<dyn CustomerRepository>) -> Self {
        Self {
            repository,
            session: None,
            ids: IdGenerator::new(),
            faults: FaultInjector::new(),
            fetches: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Refuses every call unless `session` holds a token.
    pub fn with_session(mut self, session: SessionApi) -> Self {
        self.session = Some(session);
        self
    }

    /// Makes the next `count` calls fail with `ApiError::Network(message)`.
    pub fn inject_failures(&self, count: usize, message: impl Into<String>) {
        self.faults.inject(count, message);
    }

    pub fn faults(&self) -> &FaultInjector {
        &self.faults
    }

    /// Number of `fetch_all` calls made so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    async fn gate(&self, delay: std::time::Duration) -> Result<()> {
        sleep(delay).await;
        if let Some(session) = &self.session {
            session.require()?;
        }
        self.faults.check()
    }

    /// Returns every customer.
    pub async fn fetch_all(&self) -> Result<Vec<Customer>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.gate(latency::FETCH_ALL).await?;

        let customers = self.repository.list().await?;
        tracing::debug!(count = customers.len(), "Fetched customers");
        Ok(customers)
    }

    /// Validates and stores a new customer with a generated id.
    pub async fn create(&self, request: CreateCustomerRequest) -> Result<Customer> {
        validate_create(&request)?;
        self.gate(latency::CREATE).await?;

        let customer = request.into_customer(self.ids.next_id(), Utc::now());
        self.repository.insert(&customer).await?;

        tracing::debug!(customer_id = %customer.id, name = %customer.name, "Created customer");
        Ok(customer)
    }

    /// Validates the present fields and merges them into customer `id`.
    pub async fn update(&self, id: &str, request: UpdateCustomerRequest) -> Result<Customer> {
        validate_update(&request)?;
        self.gate(latency::UPDATE).await?;

        let customer = self
            .repository
            .update(id, request)
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    ApiError::NotFound(id.to_string())
                } else {
                    e.into()
                }
            })?;

        tracing::debug!(customer_id = %id, "Updated customer");
        Ok(customer)
    }

    /// Removes customer `id`. Unknown ids succeed without effect.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.gate(latency::DELETE).await?;

        if self.repository.remove(id).await? {
            tracing::debug!(customer_id = %id, "Deleted customer");
        }
        Ok(())
    }
}
