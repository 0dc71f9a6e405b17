//! Traffic light state machine and its cycle thread

use std::sync::atomic::{AtomicU8, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::config::CycleConfig;
use crate::error::SignalError;
use crate::queue::{HandoffQueue, QueueStats};
use crate::shutdown::Shutdown;

use super::handle::CycleHandle;
use super::interval::{IntervalSource, RandomInterval};
use super::phase::Phase;

/// Name given to the cycle thread
pub const CYCLE_THREAD_NAME: &str = "traffic-light-cycle";

struct LightShared {
    /// Written only by the cycle thread
    phase: AtomicU8,
    queue: HandoffQueue<Phase>,
    /// Taken by the first `start`
    interval: Mutex<Option<Box<dyn IntervalSource>>>,
}

/// A two-phase traffic signal that toggles on its own thread.
///
/// Cloning is cheap and every clone refers to the same signal, so observers
/// on other threads can each hold one.
#[derive(Clone)]
pub struct TrafficLight {
    shared: Arc<LightShared>,
}

impl TrafficLight {
    /// Create a stopped signal that toggles every 4-6 seconds
    pub fn new() -> Self {
        Self::with_interval(RandomInterval::default())
    }

    /// Create a stopped signal with a custom interval source
    pub fn with_interval(interval: impl IntervalSource) -> Self {
        debug!("TrafficLight::with_interval: called");
        Self {
            shared: Arc::new(LightShared {
                phase: AtomicU8::new(Phase::Stopped.as_u8()),
                queue: HandoffQueue::new(),
                interval: Mutex::new(Some(Box::new(interval))),
            }),
        }
    }

    /// Create a stopped signal whose random bounds come from configuration
    pub fn from_config(config: &CycleConfig) -> Result<Self, SignalError> {
        debug!(?config, "TrafficLight::from_config: called");
        let interval = RandomInterval::new(config.min_interval(), config.max_interval())?;
        Ok(Self::with_interval(interval))
    }

    /// Snapshot of the live phase. It may change right after it is read.
    pub fn current_phase(&self) -> Phase {
        Phase::from_u8(self.shared.phase.load(Ordering::Acquire))
    }

    /// Block until the signal publishes `target`.
    ///
    /// Only the newest published phase is ever delivered, and each one goes
    /// to a single waiter. A waiter that loses the race, or arrives between
    /// toggles, keeps blocking until `target` is published again.
    pub fn wait_for_phase(&self, target: Phase) {
        debug!(%target, "TrafficLight::wait_for_phase: called");
        loop {
            let phase = self.shared.queue.receive();
            if phase == target {
                debug!(%target, "TrafficLight::wait_for_phase: observed");
                return;
            }
            debug!(%phase, %target, "TrafficLight::wait_for_phase: skipping");
        }
    }

    /// Like [`wait_for_phase`](Self::wait_for_phase), bounded by `timeout`
    /// across all skipped phases.
    ///
    /// Fails with [`SignalError::Stopped`] once the cycle has been shut down.
    /// A timeout too large to represent as an `Instant` never expires.
    pub fn wait_for_phase_timeout(&self, target: Phase, timeout: Duration) -> Result<(), SignalError> {
        debug!(%target, ?timeout, "TrafficLight::wait_for_phase_timeout: called");
        let deadline = Instant::now().checked_add(timeout);
        loop {
            let phase = self.shared.queue.receive_deadline(deadline, timeout)?;
            if phase == target {
                debug!(%target, "TrafficLight::wait_for_phase_timeout: observed");
                return Ok(());
            }
        }
    }

    /// Spawn the cycle thread.
    ///
    /// Only the first call succeeds; later calls fail with
    /// [`SignalError::AlreadyStarted`]. The thread runs until the returned
    /// handle is shut down, so dropping the handle leaves it cycling for the
    /// life of the process.
    pub fn start(&self) -> Result<CycleHandle, SignalError> {
        debug!("TrafficLight::start: called");
        let interval = self
            .shared
            .interval
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .ok_or(SignalError::AlreadyStarted)?;

        let shutdown = Shutdown::new();
        let toggles = Arc::new(AtomicU64::new(0));

        let worker = {
            let light = self.clone();
            let shutdown = shutdown.clone();
            let toggles = Arc::clone(&toggles);
            thread::Builder::new()
                .name(CYCLE_THREAD_NAME.to_string())
                .spawn(move || light.cycle_through_phases(interval, shutdown, toggles))?
        };

        info!("Traffic light started");
        Ok(CycleHandle::new(self.clone(), worker, shutdown, toggles))
    }

    /// Traffic counters of the phase queue
    pub fn queue_stats(&self) -> QueueStats {
        self.shared.queue.stats()
    }

    pub(crate) fn close(&self) {
        self.shared.queue.close();
    }

    /// Set the phase and hand it to waiters
    pub(crate) fn publish(&self, phase: Phase) {
        self.shared.phase.store(phase.as_u8(), Ordering::Release);
        self.shared.queue.send(phase);
    }

    fn cycle_through_phases(&self, mut interval: Box<dyn IntervalSource>, shutdown: Shutdown, toggles: Arc<AtomicU64>) {
        info!("Cycle thread running");
        loop {
            let hold = interval.next_interval();
            debug!(?hold, phase = %self.current_phase(), "cycle_through_phases: holding");
            if shutdown.sleep(hold) {
                break;
            }

            let next = self.current_phase().toggled();
            self.publish(next);
            let count = toggles.fetch_add(1, Ordering::Relaxed) + 1;
            debug!(%next, count, "cycle_through_phases: toggled");
        }
        info!(toggles = toggles.load(Ordering::Relaxed), "Cycle thread stopped");
    }
}

impl Default for TrafficLight {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TrafficLight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrafficLight")
            .field("phase", &self.current_phase())
            .field("queue", &self.shared.queue)
            .finish()
    }
}
