//! Cancellable delayed tasks.

use std::future::Future;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Quiet period before a search request is issued.
pub const SEARCH_DELAY: Duration = Duration::from_millis(500);

/// Runs only the most recently scheduled task, once `delay` has passed with
/// no newer one.
///
/// Scheduling cancels the previous task if its delay has not elapsed yet. A
/// task whose delay has elapsed is detached and runs to completion even if
/// newer tasks are scheduled afterwards.
///
/// A debouncer built with [`Debouncer::new`] spawns onto the current tokio
/// runtime and `schedule` panics outside one. Bind it to a runtime with
/// [`Debouncer::on_runtime`] to schedule from any thread.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    runtime: Option<Handle>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            runtime: None,
            pending: Mutex::new(None),
        }
    }

    pub fn on_runtime(delay: Duration, runtime: Handle) -> Self {
        Self {
            delay,
            runtime: Some(runtime),
            pending: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn schedule<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        let runtime = self.runtime.clone().unwrap_or_else(Handle::current);
        let fire = runtime.clone();
        let timer = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            fire.spawn(task);
        });
        if let Some(previous) = self.pending.lock().replace(timer) {
            previous.abort();
        }
    }

    /// Drop the pending task, if any. Returns whether one was still waiting.
    pub fn cancel(&self) -> bool {
        match self.pending.lock().take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(SEARCH_DELAY)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.get_mut().take() {
            handle.abort();
        }
    }
}
