//! Application state.
//!
//! Builds the record store, access layer, query cache and mutation pipeline
//! once and hands out cheap clones. Every data operation goes through the
//! session gate: without a token the access layer answers
//! `ApiError::Unauthenticated`.

use std::sync::Arc;

use crmsync_core::auth::{AuthResponse, Credentials, User};
use crmsync_core::customer::{CreateCustomerRequest, Customer, CustomerStats, UpdateCustomerRequest};

use crate::api::{CustomersApi, Result, SessionApi};
use crate::config::Config;
use crate::mutation::MutationPipeline;
use crate::query::{self, QueryCache};
use crate::storage::InMemoryRepository;
use crate::view::{read_customers, CustomerListView};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Record store backing the access layer.
    pub repository: InMemoryRepository,
    /// Gated customer endpoints.
    pub customers: CustomersApi,
    /// Token holder consulted by every gated call.
    pub session: SessionApi,
    /// Cache of the `"customers"` query.
    pub cache: QueryCache<Vec<Customer>>,
    /// Writes, with their status and invalidation.
    pub mutations: MutationPipeline,
}

impl AppState {
    /// Creates the state, seeding demo customers when the config asks for it.
    pub fn new(config: &Config) -> Self {
        let repository = if config.seed_demo_data {
            InMemoryRepository::with_demo_data()
        } else {
            InMemoryRepository::new()
        };
        Self::with_repository(repository, config)
    }

    /// Creates a state seeded with the demo customers and default settings.
    pub fn with_demo_data() -> Self {
        Self::with_repository(InMemoryRepository::with_demo_data(), &Config::default())
    }

    /// Wires every component over an existing store.
    pub fn with_repository(repository: InMemoryRepository, config: &Config) -> Self {
        let session = SessionApi::new();
        let customers =
            CustomersApi::new(Arc::new(repository.clone())).with_session(session.clone());
        let cache = QueryCache::new(config.query_retries, config.event_channel_capacity);
        let mutations = MutationPipeline::with_capacity(
            customers.clone(),
            cache.clone(),
            config.event_channel_capacity,
        );

        Self {
            repository,
            customers,
            session,
            cache,
            mutations,
        }
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<AuthResponse> {
        self.session.login(credentials).await
    }

    pub async fn current_user(&self) -> Result<User> {
        self.session.current_user().await
    }

    /// Ends the session and drops every cached query.
    pub async fn logout(&self) -> Result<()> {
        self.session.logout().await?;
        self.cache.reset();
        Ok(())
    }

    /// Reads the customers query.
    pub async fn list_customers(&self) -> query::Result<Vec<Customer>> {
        read_customers(&self.cache, &self.customers).await
    }

    pub async fn stats(&self) -> query::Result<CustomerStats> {
        let customers = self.list_customers().await?;
        Ok(CustomerStats::from_customers(&customers))
    }

    pub async fn create_customer(&self, request: CreateCustomerRequest) -> Result<Customer> {
        self.mutations.create(request).await
    }

    pub async fn update_customer(&self, id: &str, request: UpdateCustomerRequest) -> Result<Customer> {
        self.mutations.update(id, request).await
    }

    pub async fn delete_customer(&self, id: &str) -> Result<()> {
        self.mutations.delete(id).await
    }

    /// Opens a list view over the shared cache.
    ///
    /// Fails fast without a session; the view's reads stay gated anyway.
    pub fn list_view(&self) -> Result<CustomerListView> {
        self.session.require()?;
        Ok(CustomerListView::new(self.cache.clone(), self.customers.clone()))
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }
}
