use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use futures_util::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::broadcast;

use crmsync_core::cache::{CacheEntry, CacheError, QueryEvent, QueryKey, QueryStatus};

use crate::api::ApiError;

/// Result of a cached read.
pub type Result<T> = crmsync_core::cache::Result<T, ApiError>;

/// Extra attempts after a failed fetch.
pub const DEFAULT_RETRIES: u32 = 1;

/// Capacity of the observer channel.
pub const DEFAULT_EVENT_CAPACITY: usize = 100;

type SharedFetch<T> = Shared<BoxFuture<'static, Result<T>>>;

struct InFlight<T> {
    id: u64,
    /// Slot generation when the fetch started.
    generation: u64,
    fetch: SharedFetch<T>,
}

struct Slot<T> {
    entry: CacheEntry<T>,
    /// Bumped by every invalidation.
    generation: u64,
    in_flight: Option<InFlight<T>>,
}

impl<T> Slot<T> {
    fn new(key: QueryKey) -> Self {
        Self {
            entry: CacheEntry::idle(key),
            generation: 0,
            in_flight: None,
        }
    }
}

/// How a waiting reader relates to the fetch it joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Joined {
    /// Started at the slot's current generation.
    Current,
    /// Started before the latest invalidation.
    Outdated,
    /// Left over from before a reset; its result is never stored.
    Orphaned,
}

enum Lookup<T> {
    Hit(T),
    Wait { fetch: SharedFetch<T>, joined: Joined },
}

struct Slots<T> {
    entries: HashMap<QueryKey, Slot<T>>,
    /// Fetches that were in flight when the cache was reset, by key.
    orphans: HashMap<QueryKey, InFlight<T>>,
}

struct Inner<T> {
    slots: Mutex<Slots<T>>,
    events: broadcast::Sender<QueryEvent>,
    fetch_ids: AtomicU64,
    retries: u32,
}

/// Read cache with in-flight deduplication.
///
/// Clones share the same entries. The lock guarding the entries is never
/// held across an `.await`.
pub struct QueryCache<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for QueryCache<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for QueryCache<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new(DEFAULT_RETRIES, DEFAULT_EVENT_CAPACITY)
    }
}

impl<T> QueryCache<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Creates an empty cache.
    ///
    /// `retries` is the number of extra attempts after a failed fetch.
    pub fn new(retries: u32, event_capacity: usize) -> Self {
        let (events, _) = broadcast::channel(event_capacity.max(1));
        Self {
            inner: Arc::new(Inner {
                slots: Mutex::new(Slots {
                    entries: HashMap::new(),
                    orphans: HashMap::new(),
                }),
                events,
                fetch_ids: AtomicU64::new(1),
                retries,
            }),
        }
    }

    /// Returns the data for `key`, fetching it if the entry is not fresh.
    ///
    /// Concurrent reads of one key share a single call to `fetcher`. The
    /// fetch runs in its own task, so dropping every reader does not cancel
    /// it. A reader that joined a fetch started before the latest
    /// invalidation waits for it and then reads again. So does a reader that
    /// found a fetch left over from before a reset, which keeps a key at one
    /// live call even across resets.
    pub async fn read<F, Fut>(&self, key: &QueryKey, fetcher: F) -> Result<T>
    where
        F: Fn() -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<T, ApiError>> + Send + 'static,
    {
        loop {
            let (fetch, joined) = match self.lookup(key, &fetcher) {
                Lookup::Hit(data) => return Ok(data),
                Lookup::Wait { fetch, joined } => (fetch, joined),
            };

            let result = fetch.await;
            match joined {
                Joined::Current => return result,
                Joined::Outdated if result.is_err() => return result,
                Joined::Outdated => {
                    tracing::trace!(key = %key, "Joined fetch predates invalidation, reading again");
                }
                Joined::Orphaned => {
                    tracing::trace!(key = %key, "Fetch from before reset settled, reading again");
                }
            }
        }
    }

    /// Returns the last known data at once, even if stale, and refetches in
    /// the background when the entry is not fresh.
    ///
    /// Without any data this waits like [`QueryCache::read`].
    pub async fn read_stale<F, Fut>(&self, key: &QueryKey, fetcher: F) -> Result<T>
    where
        F: Fn() -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<T, ApiError>> + Send + 'static,
    {
        if let Lookup::Hit(data) = self.lookup(key, &fetcher) {
            return Ok(data);
        }
        if let Some(data) = self.peek(key) {
            tracing::trace!(key = %key, "Serving stale data while refetching");
            return Ok(data);
        }
        self.read(key, fetcher).await
    }

    fn lookup<F, Fut>(&self, key: &QueryKey, fetcher: &F) -> Lookup<T>
    where
        F: Fn() -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<T, ApiError>> + Send + 'static,
    {
        let mut slots = self.inner.lock_slots();
        let Slots { entries, orphans } = &mut *slots;
        let slot = entries
            .entry(key.clone())
            .or_insert_with(|| Slot::new(key.clone()));

        if slot.entry.is_fresh() {
            if let Some(data) = &slot.entry.data {
                tracing::trace!(key = %key, "Cache hit");
                return Lookup::Hit(data.clone());
            }
        }

        if let Some(in_flight) = &slot.in_flight {
            tracing::trace!(key = %key, fetch_id = in_flight.id, "Joining in-flight fetch");
            let joined = if in_flight.generation == slot.generation {
                Joined::Current
            } else {
                Joined::Outdated
            };
            return Lookup::Wait {
                fetch: in_flight.fetch.clone(),
                joined,
            };
        }

        if let Some(orphan) = orphans.get(key) {
            tracing::trace!(key = %key, fetch_id = orphan.id, "Waiting for fetch started before reset");
            return Lookup::Wait {
                fetch: orphan.fetch.clone(),
                joined: Joined::Orphaned,
            };
        }

        let id = self.inner.fetch_ids.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(key = %key, fetch_id = id, stale = slot.entry.stale, "Cache miss");

        let fetch = Inner::spawn_fetch(
            Arc::clone(&self.inner),
            key.clone(),
            id,
            slot.generation,
            fetcher.clone(),
        );
        slot.entry.status = QueryStatus::Loading;
        slot.in_flight = Some(InFlight {
            id,
            generation: slot.generation,
            fetch: fetch.clone(),
        });

        Lookup::Wait {
            fetch,
            joined: Joined::Current,
        }
    }

    /// Marks the entry stale without dropping its data.
    ///
    /// A fetch already in flight still stores its result, but the entry stays
    /// stale so the next read fetches again.
    pub fn invalidate(&self, key: &QueryKey) {
        let known = {
            let mut slots = self.inner.lock_slots();
            match slots.entries.get_mut(key) {
                Some(slot) => {
                    slot.generation += 1;
                    slot.entry.stale = true;
                    true
                }
                None => false,
            }
        };

        if known {
            tracing::debug!(key = %key, "Invalidated query");
            self.inner.publish(QueryEvent::Invalidated(key.clone()));
        } else {
            tracing::trace!(key = %key, "Nothing cached to invalidate");
        }
    }

    /// Drops every entry.
    ///
    /// Fetches in flight keep running and settle into nothing. Until they
    /// do, reads of their key wait for them before fetching again.
    pub fn reset(&self) {
        let (dropped, orphaned) = {
            let mut slots = self.inner.lock_slots();
            let Slots { entries, orphans } = &mut *slots;
            let count = entries.len();
            orphans.extend(
                entries
                    .drain()
                    .filter_map(|(key, slot)| slot.in_flight.map(|fetch| (key, fetch))),
            );
            (count, orphans.len())
        };

        tracing::debug!(entries = dropped, orphaned, "Reset query cache");
        self.inner.publish(QueryEvent::Reset);
    }

    /// Current state of the entry, if it exists.
    pub fn snapshot(&self, key: &QueryKey) -> Option<CacheEntry<T>> {
        self.inner
            .lock_slots()
            .entries
            .get(key)
            .map(|slot| slot.entry.clone())
    }

    /// Last known data, without fetching.
    pub fn peek(&self, key: &QueryKey) -> Option<T> {
        self.inner
            .lock_slots()
            .entries
            .get(key)
            .and_then(|slot| slot.entry.data.clone())
    }

    /// Returns true while a call for `key` is live, including one left over
    /// from before a reset.
    pub fn is_fetching(&self, key: &QueryKey) -> bool {
        let slots = self.inner.lock_slots();
        slots
            .entries
            .get(key)
            .is_some_and(|slot| slot.in_flight.is_some())
            || slots.orphans.contains_key(key)
    }

    /// Subscribes to change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<QueryEvent> {
        self.inner.events.subscribe()
    }
}

impl<T> Inner<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn lock_slots(&self) -> MutexGuard<'_, Slots<T>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, event: QueryEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    fn spawn_fetch<F, Fut>(
        inner: Arc<Self>,
        key: QueryKey,
        id: u64,
        generation: u64,
        fetcher: F,
    ) -> SharedFetch<T>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<T, ApiError>> + Send + 'static,
    {
        let task_inner = Arc::clone(&inner);
        let task_key = key.clone();
        let handle = tokio::spawn(async move {
            let result = fetch_with_retry(&task_key, task_inner.retries, fetcher).await;
            task_inner.settle(&task_key, id, generation, result)
        });

        async move {
            match handle.await {
                Ok(result) => result,
                Err(join_error) => {
                    let message = join_error.to_string();
                    inner.abandon(&key, id, &message);
                    Err(CacheError::Aborted(message))
                }
            }
        }
        .boxed()
        .shared()
    }

    fn settle(
        &self,
        key: &QueryKey,
        id: u64,
        generation: u64,
        result: std::result::Result<T, ApiError>,
    ) -> Result<T> {
        let event = {
            let mut slots = self.lock_slots();
            if slots.orphans.get(key).is_some_and(|f| f.id == id) {
                slots.orphans.remove(key);
                tracing::debug!(key = %key, fetch_id = id, "Cache was reset, dropping fetch result");
                return result.map_err(CacheError::Fetch);
            }

            let owner = slots
                .entries
                .get_mut(key)
                .filter(|slot| slot.in_flight.as_ref().is_some_and(|f| f.id == id));
            let Some(slot) = owner else {
                tracing::debug!(key = %key, fetch_id = id, "Fetch no longer tracked, dropping result");
                return result.map_err(CacheError::Fetch);
            };

            slot.in_flight = None;
            match &result {
                Ok(data) => {
                    slot.entry.data = Some(data.clone());
                    slot.entry.status = QueryStatus::Success;
                    slot.entry.error = None;
                    slot.entry.last_updated = Some(Utc::now());
                    slot.entry.stale = slot.generation != generation;
                    tracing::debug!(key = %key, fetch_id = id, stale = slot.entry.stale, "Stored fetch result");
                    QueryEvent::Updated(key.clone())
                }
                Err(error) => {
                    slot.entry.status = QueryStatus::Error;
                    slot.entry.error = Some(error.to_string());
                    tracing::warn!(key = %key, fetch_id = id, error = %error, "Fetch failed");
                    QueryEvent::Failed {
                        key: key.clone(),
                        message: error.to_string(),
                    }
                }
            }
        };

        self.publish(event);
        result.map_err(CacheError::Fetch)
    }

    fn abandon(&self, key: &QueryKey, id: u64, message: &str) {
        {
            let mut slots = self.lock_slots();
            if slots.orphans.get(key).is_some_and(|f| f.id == id) {
                slots.orphans.remove(key);
                return;
            }
            let Some(slot) = slots.entries.get_mut(key) else {
                return;
            };
            if !slot.in_flight.as_ref().is_some_and(|f| f.id == id) {
                return;
            }
            slot.in_flight = None;
            slot.entry.status = QueryStatus::Error;
            slot.entry.error = Some(message.to_string());
        }

        tracing::warn!(key = %key, fetch_id = id, error = %message, "Fetch task aborted");
        self.publish(QueryEvent::Failed {
            key: key.clone(),
            message: message.to_string(),
        });
    }
}

async fn fetch_with_retry<T, F, Fut>(
    key: &QueryKey,
    retries: u32,
    fetcher: F,
) -> std::result::Result<T, ApiError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = std::result::Result<T, ApiError>>,
{
    let mut attempt = 0;
    loop {
        match fetcher().await {
            Ok(data) => return Ok(data),
            Err(error) if attempt < retries => {
                attempt += 1;
                tracing::debug!(key = %key, attempt, error = %error, "Fetch failed, retrying");
            }
            Err(error) => return Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;
    use tokio::time::sleep;

    type FetchResult = std::result::Result<usize, ApiError>;

    const LATENCY: Duration = Duration::from_millis(600);

    /// Succeeds with the 1-based number of the call.
    fn counter(
        calls: &Arc<AtomicUsize>,
    ) -> impl Fn() -> BoxFuture<'static, FetchResult> + Clone + Send + Sync + 'static {
        let calls = Arc::clone(calls);
        move || {
            let calls = Arc::clone(&calls);
            async move {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                sleep(LATENCY).await;
                Ok(n)
            }
            .boxed()
        }
    }

    /// Fails the first `failures` calls, then behaves like `counter`.
    fn flaky(
        calls: &Arc<AtomicUsize>,
        failures: usize,
    ) -> impl Fn() -> BoxFuture<'static, FetchResult> + Clone + Send + Sync + 'static {
        let calls = Arc::clone(calls);
        move || {
            let calls = Arc::clone(&calls);
            async move {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                sleep(LATENCY).await;
                if n <= failures {
                    Err(ApiError::Network("Error de red simulado".to_string()))
                } else {
                    Ok(n)
                }
            }
            .boxed()
        }
    }

    /// Live and peak number of concurrent calls.
    #[derive(Default)]
    struct Concurrency {
        live: AtomicUsize,
        peak: AtomicUsize,
    }

    /// Like `counter`, also recording how many calls overlap.
    fn overlapping(
        calls: &Arc<AtomicUsize>,
        concurrency: &Arc<Concurrency>,
    ) -> impl Fn() -> BoxFuture<'static, FetchResult> + Clone + Send + Sync + 'static {
        let calls = Arc::clone(calls);
        let concurrency = Arc::clone(concurrency);
        move || {
            let calls = Arc::clone(&calls);
            let concurrency = Arc::clone(&concurrency);
            async move {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                let live = concurrency.live.fetch_add(1, Ordering::SeqCst) + 1;
                concurrency.peak.fetch_max(live, Ordering::SeqCst);
                sleep(LATENCY).await;
                concurrency.live.fetch_sub(1, Ordering::SeqCst);
                Ok(n)
            }
            .boxed()
        }
    }

    fn calls() -> Arc<AtomicUsize> {
        Arc::new(AtomicUsize::new(0))
    }

    fn count(calls: &Arc<AtomicUsize>) -> usize {
        calls.load(Ordering::SeqCst)
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_reads_share_one_fetch() {
        let cache = QueryCache::<usize>::default();
        let key = QueryKey::customers();
        let calls = calls();

        let (a, b, c) = tokio::join!(
            cache.read(&key, counter(&calls)),
            cache.read(&key, counter(&calls)),
            cache.read(&key, counter(&calls)),
        );

        assert_eq!((a.unwrap(), b.unwrap(), c.unwrap()), (1, 1, 1));
        assert_eq!(count(&calls), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fresh_entry_is_served_from_cache() {
        let cache = QueryCache::<usize>::default();
        let key = QueryKey::customers();
        let calls = calls();

        assert_eq!(cache.read(&key, counter(&calls)).await.unwrap(), 1);
        assert_eq!(cache.read(&key, counter(&calls)).await.unwrap(), 1);

        let entry = cache.snapshot(&key).unwrap();
        assert_eq!(entry.status, QueryStatus::Success);
        assert!(entry.is_fresh());
        assert!(entry.last_updated.is_some());
        assert_eq!(count(&calls), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_loading_while_fetching() {
        let cache = QueryCache::<usize>::default();
        let key = QueryKey::customers();
        let calls = calls();

        let reader = tokio::spawn({
            let cache = cache.clone();
            let key = key.clone();
            let fetcher = counter(&calls);
            async move { cache.read(&key, fetcher).await }
        });
        sleep(Duration::from_millis(100)).await;

        assert!(cache.snapshot(&key).unwrap().is_loading());
        assert!(cache.is_fetching(&key));

        reader.await.unwrap().unwrap();
        assert!(!cache.is_fetching(&key));
    }

    #[tokio::test(start_paused = true)]
    async fn test_read_retries_once_then_surfaces_error() {
        let cache = QueryCache::<usize>::default();
        let key = QueryKey::customers();
        let calls = calls();
        let mut events = cache.subscribe();

        let result = cache.read(&key, flaky(&calls, usize::MAX)).await;

        let expected = ApiError::Network("Error de red simulado".to_string());
        assert_eq!(result, Err(CacheError::Fetch(expected)));
        assert_eq!(count(&calls), 2);

        let entry = cache.snapshot(&key).unwrap();
        assert_eq!(entry.status, QueryStatus::Error);
        assert_eq!(entry.error.as_deref(), Some("Error de red simulado"));
        assert_eq!(
            events.recv().await.unwrap(),
            QueryEvent::Failed {
                key: key.clone(),
                message: "Error de red simulado".to_string(),
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_recovers() {
        let cache = QueryCache::<usize>::default();
        let key = QueryKey::customers();
        let calls = calls();

        assert_eq!(cache.read(&key, flaky(&calls, 1)).await.unwrap(), 2);
        assert_eq!(cache.snapshot(&key).unwrap().error, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_retries() {
        let cache = QueryCache::<usize>::new(0, 16);
        let key = QueryKey::customers();
        let calls = calls();

        assert!(cache.read(&key, flaky(&calls, 1)).await.is_err());
        assert_eq!(count(&calls), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_refetch_keeps_previous_data() {
        let cache = QueryCache::<usize>::default();
        let key = QueryKey::customers();
        let calls = calls();

        cache.read(&key, counter(&calls)).await.unwrap();
        cache.invalidate(&key);

        let failures = Arc::new(AtomicUsize::new(0));
        assert!(cache.read(&key, flaky(&failures, usize::MAX)).await.is_err());

        let entry = cache.snapshot(&key).unwrap();
        assert_eq!(entry.data, Some(1));
        assert_eq!(entry.status, QueryStatus::Error);
        assert_eq!(cache.peek(&key), Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalidate_keeps_data_and_refetches() {
        let cache = QueryCache::<usize>::default();
        let key = QueryKey::customers();
        let calls = calls();

        cache.read(&key, counter(&calls)).await.unwrap();
        let mut events = cache.subscribe();

        cache.invalidate(&key);

        let entry = cache.snapshot(&key).unwrap();
        assert!(entry.stale);
        assert_eq!(entry.data, Some(1));
        assert_eq!(
            events.recv().await.unwrap(),
            QueryEvent::Invalidated(key.clone())
        );

        assert_eq!(cache.read(&key, counter(&calls)).await.unwrap(), 2);
        assert!(!cache.snapshot(&key).unwrap().stale);
        assert_eq!(events.recv().await.unwrap(), QueryEvent::Updated(key.clone()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalidate_unknown_key_is_silent() {
        let cache = QueryCache::<usize>::default();
        let mut events = cache.subscribe();

        cache.invalidate(&QueryKey::customers());

        assert!(events.try_recv().is_err());
        assert!(cache.snapshot(&QueryKey::customers()).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalidate_during_flight() {
        let cache = QueryCache::<usize>::default();
        let key = QueryKey::customers();
        let calls = calls();

        let first = tokio::spawn({
            let cache = cache.clone();
            let key = key.clone();
            let fetcher = counter(&calls);
            async move { cache.read(&key, fetcher).await }
        });
        sleep(Duration::from_millis(100)).await;

        cache.invalidate(&key);
        let second = cache.read(&key, counter(&calls)).await.unwrap();

        // The reader that started before the invalidation gets the old result,
        // the one that started after it gets a fresh fetch.
        assert_eq!(first.await.unwrap().unwrap(), 1);
        assert_eq!(second, 2);
        assert_eq!(count(&calls), 2);
        assert!(cache.snapshot(&key).unwrap().is_fresh());
    }

    #[tokio::test(start_paused = true)]
    async fn test_result_settled_after_invalidation_stays_stale() {
        let cache = QueryCache::<usize>::default();
        let key = QueryKey::customers();
        let calls = calls();

        let reader = tokio::spawn({
            let cache = cache.clone();
            let key = key.clone();
            let fetcher = counter(&calls);
            async move { cache.read(&key, fetcher).await }
        });
        sleep(Duration::from_millis(100)).await;
        cache.invalidate(&key);
        reader.await.unwrap().unwrap();

        let entry = cache.snapshot(&key).unwrap();
        assert_eq!(entry.data, Some(1));
        assert_eq!(entry.status, QueryStatus::Success);
        assert!(entry.stale);
        assert!(!entry.is_fresh());
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_reader_does_not_cancel_fetch() {
        let cache = QueryCache::<usize>::default();
        let key = QueryKey::customers();
        let calls = calls();

        let reader = tokio::spawn({
            let cache = cache.clone();
            let key = key.clone();
            let fetcher = counter(&calls);
            async move { cache.read(&key, fetcher).await }
        });
        sleep(Duration::from_millis(100)).await;
        reader.abort();
        sleep(Duration::from_secs(1)).await;

        let entry = cache.snapshot(&key).unwrap();
        assert_eq!(entry.status, QueryStatus::Success);
        assert_eq!(entry.data, Some(1));
        assert_eq!(count(&calls), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_clears_entries() {
        let cache = QueryCache::<usize>::default();
        let key = QueryKey::customers();
        let calls = calls();
        cache.read(&key, counter(&calls)).await.unwrap();
        let mut events = cache.subscribe();

        cache.reset();

        assert!(cache.snapshot(&key).is_none());
        assert!(cache.peek(&key).is_none());
        assert_eq!(events.recv().await.unwrap(), QueryEvent::Reset);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_during_flight_drops_result() {
        let cache = QueryCache::<usize>::default();
        let key = QueryKey::customers();
        let calls = calls();

        let reader = tokio::spawn({
            let cache = cache.clone();
            let key = key.clone();
            let fetcher = counter(&calls);
            async move { cache.read(&key, fetcher).await }
        });
        sleep(Duration::from_millis(100)).await;
        cache.reset();

        assert_eq!(reader.await.unwrap().unwrap(), 1);
        assert!(cache.snapshot(&key).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_read_after_reset_waits_for_leftover_fetch() {
        let cache = QueryCache::<usize>::default();
        let key = QueryKey::customers();
        let calls = calls();
        let concurrency = Arc::new(Concurrency::default());

        let reader = tokio::spawn({
            let cache = cache.clone();
            let key = key.clone();
            let fetcher = overlapping(&calls, &concurrency);
            async move { cache.read(&key, fetcher).await }
        });
        sleep(Duration::from_millis(100)).await;
        cache.reset();
        assert!(cache.is_fetching(&key));

        let after_reset = cache.read(&key, overlapping(&calls, &concurrency)).await.unwrap();

        assert_eq!(reader.await.unwrap().unwrap(), 1);
        assert_eq!(after_reset, 2);
        assert_eq!(count(&calls), 2);
        assert_eq!(concurrency.peak.load(Ordering::SeqCst), 1);

        let entry = cache.snapshot(&key).unwrap();
        assert_eq!(entry.data, Some(2));
        assert!(entry.is_fresh());
        assert!(!cache.is_fetching(&key));
    }

    #[tokio::test(start_paused = true)]
    async fn test_leftover_fetch_failure_does_not_reach_new_reader() {
        let cache = QueryCache::<usize>::new(0, 16);
        let key = QueryKey::customers();
        let failures = calls();

        let reader = tokio::spawn({
            let cache = cache.clone();
            let key = key.clone();
            let fetcher = flaky(&failures, usize::MAX);
            async move { cache.read(&key, fetcher).await }
        });
        sleep(Duration::from_millis(100)).await;
        cache.reset();

        let calls = calls();
        assert_eq!(cache.read(&key, counter(&calls)).await.unwrap(), 1);
        assert!(reader.await.unwrap().is_err());
        assert_eq!(cache.snapshot(&key).unwrap().error, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_read_stale_serves_last_data_and_refetches() {
        let cache = QueryCache::<usize>::default();
        let key = QueryKey::customers();
        let calls = calls();

        assert_eq!(cache.read_stale(&key, counter(&calls)).await.unwrap(), 1);
        cache.invalidate(&key);

        let started = tokio::time::Instant::now();
        assert_eq!(cache.read_stale(&key, counter(&calls)).await.unwrap(), 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
        assert!(cache.is_fetching(&key));

        assert_eq!(cache.read_stale(&key, counter(&calls)).await.unwrap(), 1);
        assert_eq!(count(&calls), 2);

        sleep(LATENCY + Duration::from_millis(1)).await;
        assert_eq!(cache.read_stale(&key, counter(&calls)).await.unwrap(), 2);
        assert!(cache.snapshot(&key).unwrap().is_fresh());
        assert_eq!(count(&calls), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_keys_are_independent() {
        let cache = QueryCache::<usize>::default();
        let calls = calls();

        cache.read(&QueryKey::customers(), counter(&calls)).await.unwrap();
        cache.read(&QueryKey::current_user(), counter(&calls)).await.unwrap();
        cache.invalidate(&QueryKey::current_user());

        assert!(cache.snapshot(&QueryKey::customers()).unwrap().is_fresh());
        assert!(cache.snapshot(&QueryKey::current_user()).unwrap().stale);
        assert_eq!(count(&calls), 2);
    }
}
