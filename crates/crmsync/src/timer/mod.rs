//! Cancellable one-shot timer and the search debouncer built on it.

mod debounce;

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

pub use debounce::{Debouncer, DEBOUNCE_DELAY};

/// Runs one callback after a delay. Scheduling again cancels the callback
/// still waiting, and so does dropping the timer.
#[derive(Debug, Default)]
pub struct Timer {
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `callback` to run after `delay`, cancelling any pending one.
    pub fn schedule<F>(&self, delay: Duration, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            callback();
        });

        let previous = self
            .handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(task);
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    /// Cancels the pending callback, if any.
    pub fn cancel(&self) {
        if let Some(task) = self
            .handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            task.abort();
        }
    }

    /// Returns true while a callback is waiting to run.
    pub fn is_pending(&self) -> bool {
        self.handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        self.cancel();
    }
}
