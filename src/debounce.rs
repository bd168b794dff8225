// Cancellable timer used to hold back a task until input goes quiet

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

/// Runs at most one scheduled task after a delay, last write wins.
///
/// Scheduling aborts whatever is still waiting. When the delay elapses the
/// task is moved onto its own tokio task, so a later `schedule` or `cancel`
/// only ever affects the waiting period, never a task that already started.
///
/// Must be used from within a tokio runtime.
#[derive(Debug, Default)]
pub struct DebounceTimer {
    handle: Option<JoinHandle<()>>,
}

impl DebounceTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule<F>(&mut self, delay: Duration, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        self.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tokio::spawn(task);
        }));
    }

    /// Drops the waiting task, if any. Returns true when something was still
    /// waiting.
    pub fn cancel(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.handle
            .as_ref()
            .map_or(false, |handle| !handle.is_finished())
    }
}

impl Drop for DebounceTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
