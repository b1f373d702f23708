//! Customer list view.
//!
//! Glues the listing pipeline from `crmsync_core::listing` to the cached
//! customers query: raw search input goes through the debouncer, the
//! committed term and status filter feed `FilterState`, and every render
//! reads the `"customers"` query through the cache.
//!
//! Renders serve the last known list at once and let a refetch run behind
//! it. While a view is alive it also refetches the list as soon as a write
//! invalidates it.

use std::time::Duration;

use thiserror::Error;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crmsync_core::cache::{CacheError, QueryEvent, QueryKey};
use crmsync_core::customer::{Customer, CustomerStats};
use crmsync_core::export::{customers_to_csv, ExportError};
use crmsync_core::listing::{FilterState, Page, StatusFilter};

use crate::api::{ApiError, CustomersApi};
use crate::query::{self, QueryCache};
use crate::timer::{Debouncer, DEBOUNCE_DELAY};

/// Reads the `"customers"` query through `cache`, fetching from `api` on a
/// miss.
pub async fn read_customers(
    cache: &QueryCache<Vec<Customer>>,
    api: &CustomersApi,
) -> query::Result<Vec<Customer>> {
    let api = api.clone();
    cache
        .read(&QueryKey::customers(), move || {
            let api = api.clone();
            async move { api.fetch_all().await }
        })
        .await
}

/// Refetches the customers query whenever it is invalidated.
fn spawn_revalidator(cache: QueryCache<Vec<Customer>>, api: CustomersApi) -> JoinHandle<()> {
    let mut events = cache.subscribe();
    tokio::spawn(async move {
        let key = QueryKey::customers();
        loop {
            match events.recv().await {
                Ok(QueryEvent::Invalidated(invalidated)) if invalidated == key => {
                    tracing::trace!(key = %key, "Revalidating invalidated query");
                    if let Err(error) = read_customers(&cache, &api).await {
                        tracing::warn!(key = %key, error = %error, "Background refetch failed");
                    }
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Missed cache events");
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}

/// Errors from view operations that go beyond a read.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ViewError {
    #[error(transparent)]
    Read(#[from] CacheError<ApiError>),

    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Paginated, searchable customer list backed by the shared query cache.
///
/// Must be created inside a Tokio runtime. Dropping the view stops its
/// background refetches.
pub struct CustomerListView {
    cache: QueryCache<Vec<Customer>>,
    api: CustomersApi,
    filters: FilterState,
    search_input: String,
    debouncer: Debouncer<String>,
    committed: watch::Receiver<String>,
    revalidator: JoinHandle<()>,
}

impl CustomerListView {
    pub fn new(cache: QueryCache<Vec<Customer>>, api: CustomersApi) -> Self {
        Self::with_delay(cache, api, DEBOUNCE_DELAY)
    }

    /// Like `new`, with a custom debounce window for the search input.
    pub fn with_delay(cache: QueryCache<Vec<Customer>>, api: CustomersApi, delay: Duration) -> Self {
        let (committed_tx, committed) = watch::channel(String::new());
        let debouncer = Debouncer::new(delay, move |term: String| {
            committed_tx.send_replace(term);
        });

        let revalidator = spawn_revalidator(cache.clone(), api.clone());

        Self {
            cache,
            api,
            filters: FilterState::new(),
            search_input: String::new(),
            debouncer,
            committed,
            revalidator,
        }
    }

    /// Records raw search input. The term takes effect once typing pauses.
    pub fn type_search(&mut self, input: impl Into<String>) {
        self.search_input = input.into();
        self.debouncer.push(self.search_input.clone());
    }

    /// Sets the search term without waiting for the debounce window.
    pub fn commit_search(&mut self, term: impl Into<String>) {
        self.search_input = term.into();
        self.debouncer.flush(self.search_input.clone());
    }

    /// Raw text as typed, possibly not committed yet.
    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    pub fn set_status_filter(&mut self, status: StatusFilter) {
        self.filters.set_status(status);
    }

    pub fn set_page(&mut self, page: usize) {
        self.filters.set_page(page);
    }

    pub fn next_page(&mut self) {
        self.filters.next_page();
    }

    pub fn prev_page(&mut self) {
        self.filters.prev_page();
    }

    /// Filter state with the latest committed search term applied.
    pub fn filters(&mut self) -> &FilterState {
        self.sync_search();
        &self.filters
    }

    fn sync_search(&mut self) {
        if self.committed.has_changed().unwrap_or(false) {
            let term = self.committed.borrow_and_update().clone();
            tracing::trace!(term = %term, "Search term committed");
            self.filters.set_search(term);
        }
    }

    /// Current page of filtered customers.
    ///
    /// Built from the last known list, even if stale, with a refetch started
    /// behind it. Waits only when nothing has been loaded yet.
    pub async fn render(&mut self) -> query::Result<Page<Customer>> {
        self.sync_search();
        let api = self.api.clone();
        let customers = self
            .cache
            .read_stale(&QueryKey::customers(), move || {
                let api = api.clone();
                async move { api.fetch_all().await }
            })
            .await?;
        Ok(self.filters.apply(&customers).map(|c| c.clone()))
    }

    /// Current page, built from data no older than the latest invalidation.
    pub async fn refresh(&mut self) -> query::Result<Page<Customer>> {
        self.sync_search();
        let customers = read_customers(&self.cache, &self.api).await?;
        Ok(self.filters.apply(&customers).map(|c| c.clone()))
    }

    /// Every customer passing the filters, ignoring pagination.
    pub async fn filtered(&mut self) -> query::Result<Vec<Customer>> {
        self.sync_search();
        let customers = read_customers(&self.cache, &self.api).await?;
        Ok(self
            .filters
            .filtered(&customers)
            .into_iter()
            .cloned()
            .collect())
    }

    /// CSV text of every customer passing the filters.
    pub async fn export_csv(&mut self) -> Result<String, ViewError> {
        let customers = self.filtered().await?;
        let csv = customers_to_csv(&customers)?;
        tracing::debug!(rows = customers.len(), "Exported customers");
        Ok(csv)
    }

    /// Status counts over the whole customer list.
    pub async fn stats(&self) -> query::Result<CustomerStats> {
        let customers = read_customers(&self.cache, &self.api).await?;
        Ok(CustomerStats::from_customers(&customers))
    }

    /// True only while the first load runs, when there is nothing to show.
    pub fn is_loading(&self) -> bool {
        self.cache
            .snapshot(&QueryKey::customers())
            .is_some_and(|entry| entry.is_loading() && entry.data.is_none())
    }

    /// True while any fetch of the list runs, including background refetches.
    pub fn is_fetching(&self) -> bool {
        self.cache.is_fetching(&QueryKey::customers())
    }

    /// Message of the last failed read, if the latest read failed.
    pub fn error(&self) -> Option<String> {
        self.cache
            .snapshot(&QueryKey::customers())
            .and_then(|entry| entry.error)
    }
}

impl Drop for CustomerListView {
    fn drop(&mut self) {
        self.revalidator.abort();
    }
}
