use std::sync::{Arc, Mutex, PoisonError};

use super::{ApiError, Result};

#[derive(Debug, Default)]
struct Pending {
    remaining: usize,
    message: String,
}

/// Simulated transport failures for the access layer.
///
/// Armed with a count and a message; each following call consumes one
/// failure until the count reaches zero. Disarmed by default.
#[derive(Debug, Clone, Default)]
pub struct FaultInjector {
    pending: Arc<Mutex<Pending>>,
}

impl FaultInjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `count` calls fail with `ApiError::Network(message)`.
    pub fn inject(&self, count: usize, message: impl Into<String>) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        pending.remaining = count;
        pending.message = message.into();
    }

    /// Number of failures still armed.
    pub fn remaining(&self) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remaining
    }

    pub fn clear(&self) {
        self.inject(0, String::new());
    }

    /// Consumes one armed failure, if any.
    pub fn check(&self) -> Result<()> {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if pending.remaining == 0 {
            return Ok(());
        }
        pending.remaining -= 1;
        Err(ApiError::Network(pending.message.clone()))
    }
}
