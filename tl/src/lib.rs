//! trafficlight - a randomly cycling traffic signal
//!
//! A [`TrafficLight`] toggles between [`Phase::Stopped`] and [`Phase::Clear`]
//! on its own thread, holding each phase for a random 4-6 seconds. Every new
//! phase is handed to observers through a [`HandoffQueue`], a Mutex + Condvar
//! mailbox that always delivers the newest value.
//!
//! # Modules
//!
//! - [`queue`] - Latest-wins blocking handoff queue
//! - [`light`] - Phase state machine, cycle thread and its handle
//! - [`shutdown`] - Cancellation token for interruptible sleeps
//! - [`config`] - Configuration types and loading
//! - [`error`] - Error types
//! - [`cli`] - Command-line interface

pub mod cli;
pub mod config;
pub mod error;
pub mod light;
pub mod queue;
pub mod shutdown;

// Re-export commonly used types
pub use config::{Config, CycleConfig, ObserverConfig};
pub use error::{QueueError, SignalError};
pub use light::{CycleHandle, FixedInterval, IntervalSource, Phase, RandomInterval, TrafficLight};
pub use queue::{HandoffQueue, QueueStats};
pub use shutdown::Shutdown;
