//! Cross-thread stop request for the poll loop.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Stop request shared between the poll loop and whatever ends it: the
/// Ctrl+C handler, the keyboard monitor or an embedding application.
///
/// [`Engine::run`](crate::Engine::run) sleeps on [`wait`](Self::wait)
/// between ticks while it holds an open handle to the game. `trigger` wakes
/// that sleep, so the handle is released as soon as a stop is requested
/// rather than one poll interval later.
#[derive(Debug, Default)]
pub struct ShutdownSignal {
    stopped: Mutex<bool>,
    wake: Condvar,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request shutdown and wake every waiter
    pub fn trigger(&self) {
        *self.lock() = true;
        self.wake.notify_all();
    }

    pub fn is_shutdown(&self) -> bool {
        *self.lock()
    }

    /// Sleep for up to `timeout`.
    ///
    /// Returns `true` once shutdown has been requested, including when it
    /// already was before the call.
    pub fn wait(&self, timeout: Duration) -> bool {
        let (stopped, _) = self
            .wake
            .wait_timeout_while(self.lock(), timeout, |stopped| !*stopped)
            .unwrap_or_else(PoisonError::into_inner);
        *stopped
    }

    fn lock(&self) -> MutexGuard<'_, bool> {
        self.stopped.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Instant;

    #[test]
    fn test_poll_interval_elapses_without_trigger() {
        let signal = ShutdownSignal::new();
        let start = Instant::now();

        assert!(!signal.wait(Duration::from_millis(50)));
        assert!(start.elapsed() >= Duration::from_millis(50));
        assert!(!signal.is_shutdown());
    }

    #[test]
    fn test_trigger_from_another_thread_ends_wait() {
        let signal = Arc::new(ShutdownSignal::new());
        let waiter = {
            let signal = Arc::clone(&signal);
            thread::spawn(move || {
                let start = Instant::now();
                (signal.wait(Duration::from_secs(10)), start.elapsed())
            })
        };

        thread::sleep(Duration::from_millis(50));
        signal.trigger();

        let (stopped, elapsed) = waiter.join().unwrap();
        assert!(stopped);
        assert!(elapsed < Duration::from_secs(1));
    }

    #[test]
    fn test_trigger_before_wait_is_not_lost() {
        let signal = ShutdownSignal::new();
        signal.trigger();

        let start = Instant::now();
        assert!(signal.wait(Duration::from_secs(10)));
        assert!(start.elapsed() < Duration::from_millis(100));
        assert!(signal.is_shutdown());
    }
}
