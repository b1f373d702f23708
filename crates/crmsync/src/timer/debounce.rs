use std::sync::Arc;
use std::time::Duration;

use super::Timer;

/// Quiet period before a search term is committed.
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(300);

type Commit<T> = Arc<dyn Fn(T) + Send + Sync>;

/// Commits only the last value pushed within a quiet window.
///
/// Each `push` restarts the window; superseded values are discarded.
pub struct Debouncer<T> {
    timer: Timer,
    delay: Duration,
    on_commit: Commit<T>,
}

impl<T> Debouncer<T>
where
    T: Send + 'static,
{
    pub fn new<F>(delay: Duration, on_commit: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        Self {
            timer: Timer::new(),
            delay,
            on_commit: Arc::new(on_commit),
        }
    }

    /// Buffers `value`; it is committed after `delay` unless another value
    /// arrives first.
    pub fn push(&self, value: T) {
        let on_commit = Arc::clone(&self.on_commit);
        self.timer.schedule(self.delay, move || on_commit(value));
    }

    /// Commits `value` right away, dropping anything buffered.
    pub fn flush(&self, value: T) {
        self.timer.cancel();
        (self.on_commit)(value);
    }

    /// Drops the buffered value without committing it.
    pub fn cancel(&self) {
        self.timer.cancel();
    }

    pub fn is_pending(&self) -> bool {
        self.timer.is_pending()
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}
