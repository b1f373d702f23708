use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;

/// Generates time-based customer ids.
///
/// An id is the current Unix time in milliseconds rendered as a decimal
/// string. Ids requested within the same millisecond are bumped to
/// `last + 1`, so every id is strictly greater than the previous one.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: Arc<AtomicU64>,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a fresh id.
    pub fn next_id(&self) -> String {
        let now_ms = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
        self.next_at(now_ms).to_string()
    }

    fn next_at(&self, now_ms: u64) -> u64 {
        let previous = self
            .last
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| {
                Some(now_ms.max(last + 1))
            })
            .unwrap_or_else(|last| last);
        now_ms.max(previous + 1)
    }
}
