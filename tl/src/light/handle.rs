//! CycleHandle - owner of a running cycle thread

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::JoinHandle;

use tracing::{debug, warn};

use crate::shutdown::Shutdown;

use super::core::TrafficLight;

/// Returned by [`TrafficLight::start`].
///
/// Dropping the handle detaches the thread; the light keeps cycling.
pub struct CycleHandle {
    light: TrafficLight,
    worker: Option<JoinHandle<()>>,
    shutdown: Shutdown,
    toggles: Arc<AtomicU64>,
}

impl CycleHandle {
    pub(crate) fn new(light: TrafficLight, worker: JoinHandle<()>, shutdown: Shutdown, toggles: Arc<AtomicU64>) -> Self {
        Self {
            light,
            worker: Some(worker),
            shutdown,
            toggles,
        }
    }

    /// The light this handle drives
    pub fn light(&self) -> &TrafficLight {
        &self.light
    }

    /// Number of toggles completed so far
    pub fn toggles(&self) -> u64 {
        self.toggles.load(Ordering::Relaxed)
    }

    pub fn is_running(&self) -> bool {
        self.worker.as_ref().is_some_and(|worker| !worker.is_finished())
    }

    /// Ask the cycle thread to stop and release timed waiters.
    ///
    /// The thread wakes from its current hold immediately. Waiters using a
    /// timeout get [`SignalError::Stopped`](crate::SignalError::Stopped);
    /// untimed waiters keep blocking.
    pub fn shutdown(&self) {
        debug!("CycleHandle::shutdown: called");
        self.shutdown.trigger();
        self.light.close();
    }

    /// Shut down, wait for the thread to exit and return the toggle count
    pub fn join(mut self) -> u64 {
        debug!("CycleHandle::join: called");
        self.shutdown();
        let panicked = self.worker.take().is_some_and(|worker| worker.join().is_err());
        if panicked {
            warn!("Cycle thread panicked");
        }
        self.toggles()
    }
}

impl std::fmt::Debug for CycleHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CycleHandle")
            .field("light", &self.light)
            .field("toggles", &self.toggles())
            .field("stopping", &self.shutdown.is_triggered())
            .finish()
    }
}
