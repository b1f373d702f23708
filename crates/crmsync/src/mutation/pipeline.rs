use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::broadcast;

use crmsync_core::cache::QueryKey;
use crmsync_core::customer::{CreateCustomerRequest, Customer, UpdateCustomerRequest};

use super::{MutationEvent, MutationKind, MutationStatus, PendingMutation};
use crate::api::{ApiError, CustomersApi, Result};
use crate::query::{QueryCache, DEFAULT_EVENT_CAPACITY};

/// Status of the newest mutation of one kind.
#[derive(Debug, Clone)]
struct Tracked {
    mutation_id: u64,
    status: MutationStatus,
}

/// Runs customer writes and keeps the query cache consistent with them.
///
/// Writes are not serialized against each other; the store applies them in
/// arrival order. Each write runs in its own task, so dropping the caller
/// neither cancels the write nor skips the invalidation.
///
/// The status of a kind follows its most recently started mutation. An older
/// write that settles while a newer one is in flight emits its events but
/// leaves the status alone.
#[derive(Clone)]
pub struct MutationPipeline {
    api: CustomersApi,
    cache: QueryCache<Vec<Customer>>,
    statuses: Arc<Mutex<HashMap<MutationKind, Tracked>>>,
    events: broadcast::Sender<MutationEvent>,
    event_counter: Arc<AtomicU64>,
    mutation_ids: Arc<AtomicU64>,
}

impl MutationPipeline {
    pub fn new(api: CustomersApi, cache: QueryCache<Vec<Customer>>) -> Self {
        Self::with_capacity(api, cache, DEFAULT_EVENT_CAPACITY)
    }

    pub fn with_capacity(
        api: CustomersApi,
        cache: QueryCache<Vec<Customer>>,
        event_capacity: usize,
    ) -> Self {
        let (events, _) = broadcast::channel(event_capacity.max(1));
        Self {
            api,
            cache,
            statuses: Arc::new(Mutex::new(HashMap::new())),
            events,
            event_counter: Arc::new(AtomicU64::new(1)),
            mutation_ids: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Creates a customer.
    pub async fn create(&self, request: CreateCustomerRequest) -> Result<Customer> {
        let api = self.api.clone();
        self.run(MutationKind::Create, None, async move {
            api.create(request).await
        })
        .await
    }

    /// Applies a partial update to customer `id`.
    pub async fn update(&self, id: &str, request: UpdateCustomerRequest) -> Result<Customer> {
        let api = self.api.clone();
        let target = id.to_string();
        self.run(MutationKind::Update, Some(id.to_string()), async move {
            api.update(&target, request).await
        })
        .await
    }

    /// Deletes customer `id`. Unknown ids succeed.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let api = self.api.clone();
        let target = id.to_string();
        self.run(MutationKind::Delete, Some(id.to_string()), async move {
            api.delete(&target).await
        })
        .await
    }

    /// Latest state of the most recent mutation of `kind`.
    pub fn status(&self, kind: MutationKind) -> MutationStatus {
        self.statuses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&kind)
            .map(|tracked| tracked.status.clone())
            .unwrap_or_default()
    }

    /// Returns `kind` to `Idle`, e.g. after the user dismissed an error.
    ///
    /// Mutations still in flight settle without touching the status again.
    pub fn reset(&self, kind: MutationKind) {
        let mutation_id = self.mutation_ids.fetch_add(1, Ordering::SeqCst);
        self.statuses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                kind,
                Tracked {
                    mutation_id,
                    status: MutationStatus::Idle,
                },
            );
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MutationEvent> {
        self.events.subscribe()
    }

    async fn run<R, Fut>(&self, kind: MutationKind, target: Option<String>, call: Fut) -> Result<R>
    where
        R: Send + 'static,
        Fut: Future<Output = Result<R>> + Send + 'static,
    {
        let mutation_id = self.mutation_ids.fetch_add(1, Ordering::SeqCst);
        self.transition(kind, mutation_id, target.clone(), MutationStatus::Pending);

        let pipeline = self.clone();
        let task = tokio::spawn(async move {
            let result = call.await;
            match &result {
                Ok(_) => {
                    tracing::info!(%kind, mutation_id, target = ?target, "Mutation fulfilled");
                    pipeline.transition(kind, mutation_id, target, MutationStatus::Fulfilled);
                    pipeline.cache.invalidate(&QueryKey::customers());
                }
                Err(error) => {
                    tracing::warn!(%kind, mutation_id, target = ?target, error = %error, "Mutation rejected");
                    pipeline.transition(
                        kind,
                        mutation_id,
                        target,
                        MutationStatus::Rejected(error.to_string()),
                    );
                }
            }
            result
        });

        task.await
            .map_err(|join_error| ApiError::Aborted(join_error.to_string()))?
    }

    fn transition(
        &self,
        kind: MutationKind,
        mutation_id: u64,
        target: Option<String>,
        status: MutationStatus,
    ) {
        let latest = {
            let mut statuses = self.statuses.lock().unwrap_or_else(PoisonError::into_inner);
            let newer = statuses
                .get(&kind)
                .is_some_and(|tracked| tracked.mutation_id > mutation_id);
            if !newer {
                statuses.insert(
                    kind,
                    Tracked {
                        mutation_id,
                        status: status.clone(),
                    },
                );
            }
            !newer
        };
        if !latest {
            tracing::debug!(%kind, mutation_id, "Superseded mutation settled, status kept");
        }

        let event = MutationEvent {
            id: self.event_counter.fetch_add(1, Ordering::SeqCst),
            mutation_id,
            mutation: PendingMutation {
                kind,
                target,
                status,
            },
        };
        let _ = self.events.send(event);
    }
}
