use chrono::{DateTime, Utc};
use serde::Serialize;

use super::keys::QueryKey;

/// Fetch status of a cache entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// Snapshot of one cached query.
///
/// `data` survives invalidation and failed refetches, so the last known
/// result stays visible while a new one is loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry<T> {
    pub key: QueryKey,
    pub data: Option<T>,
    pub status: QueryStatus,
    /// Message of the last failed fetch, cleared on success.
    pub error: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
    /// Set by invalidation; the next read refetches.
    pub stale: bool,
}

impl<T> CacheEntry<T> {
    /// A new entry that has never been fetched.
    pub fn idle(key: QueryKey) -> Self {
        Self {
            key,
            data: None,
            status: QueryStatus::Idle,
            error: None,
            last_updated: None,
            stale: false,
        }
    }

    /// Returns true if the cached data can be served without a fetch.
    pub fn is_fresh(&self) -> bool {
        self.status == QueryStatus::Success && !self.stale && self.data.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.status == QueryStatus::Loading
    }
}

/// Change notifications for cache observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryEvent {
    /// The entry was marked stale; observers should read it again.
    Invalidated(QueryKey),
    /// A fetch stored new data.
    Updated(QueryKey),
    /// A fetch failed after its retries.
    Failed { key: QueryKey, message: String },
    /// Every entry was dropped.
    Reset,
}

impl QueryEvent {
    /// The key the event is about, if any.
    pub fn key(&self) -> Option<&QueryKey> {
        match self {
            QueryEvent::Invalidated(key) | QueryEvent::Updated(key) => Some(key),
            QueryEvent::Failed { key, .. } => Some(key),
            QueryEvent::Reset => None,
        }
    }
}
