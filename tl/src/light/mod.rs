//! Traffic light state machine
//!
//! A [`TrafficLight`] holds one [`Phase`] and toggles it from a background
//! thread, publishing every new phase through a
//! [`HandoffQueue`](crate::queue::HandoffQueue). Observers block on
//! [`TrafficLight::wait_for_phase`] until the phase they want shows up.

mod core;
mod handle;
mod interval;
mod phase;

pub use self::core::{CYCLE_THREAD_NAME, TrafficLight};
pub use handle::CycleHandle;
pub use interval::{DEFAULT_MAX_INTERVAL, DEFAULT_MIN_INTERVAL, FixedInterval, IntervalSource, RandomInterval};
pub use phase::Phase;
