//! Cancellation token for background threads
//!
//! A cloneable flag paired with a condvar, so a worker can sleep until either
//! its timer expires or someone asks it to stop.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::debug;

#[derive(Debug, Default)]
struct ShutdownState {
    requested: Mutex<bool>,
    wake: Condvar,
}

/// Shared stop request, cheap to clone
#[derive(Debug, Clone, Default)]
pub struct Shutdown {
    state: Arc<ShutdownState>,
}

impl Shutdown {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, bool> {
        self.state.requested.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Request shutdown and wake every sleeper
    pub fn trigger(&self) {
        debug!("Shutdown::trigger: called");
        *self.lock() = true;
        self.state.wake.notify_all();
    }

    pub fn is_triggered(&self) -> bool {
        *self.lock()
    }

    /// Sleep for `duration` unless shutdown is requested first.
    ///
    /// Returns `true` if shutdown was requested.
    pub fn sleep(&self, duration: Duration) -> bool {
        let requested = self.lock();
        let (requested, _) = self
            .state
            .wake
            .wait_timeout_while(requested, duration, |requested| !*requested)
            .unwrap_or_else(PoisonError::into_inner);
        *requested
    }
}
