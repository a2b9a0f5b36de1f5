//! Trailing-edge debounce on the tokio timer.
//!
//! Every call cancels the pending one and schedules the action again with the
//! latest arguments, so only the last call in a quiet window runs. There is no
//! leading-edge call and no maximum wait.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

pub struct Debouncer<A> {
    action: Arc<dyn Fn(A) + Send + Sync>,
    wait: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<A: Send + 'static> Debouncer<A> {
    pub fn new(wait: Duration, action: impl Fn(A) + Send + Sync + 'static) -> Self {
        Self {
            action: Arc::new(action),
            wait,
            pending: Mutex::new(None),
        }
    }

    /// Schedule the action with `args` after the wait, dropping any call
    /// still pending. Must run inside a tokio runtime.
    pub fn call(&self, args: A) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = pending.take() {
            previous.abort();
        }

        let action = Arc::clone(&self.action);
        let wait = self.wait;
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(wait).await;
            action(args);
        }));
    }

    /// Drop the pending call, if any
    pub fn cancel(&self) {
        if let Some(previous) = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            previous.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map_or(false, |handle| !handle.is_finished())
    }
}

/// Wrap `action` in a debounced callable
pub fn debounce<A: Send + 'static>(
    action: impl Fn(A) + Send + Sync + 'static,
    wait: Duration,
) -> impl Fn(A) {
    let debouncer = Debouncer::new(wait, action);
    move |args| debouncer.call(args)
}
