//! Sources for the time between phase toggles

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::error::SignalError;

/// Default lower bound of the cycle interval
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(4000);

/// Default upper bound (exclusive) of the cycle interval
pub const DEFAULT_MAX_INTERVAL: Duration = Duration::from_millis(6000);

/// Decides how long the signal holds a phase before toggling
///
/// Called once before every toggle, on the cycle thread.
pub trait IntervalSource: Send + 'static {
    fn next_interval(&mut self) -> Duration;
}

/// Uniformly random interval in `[min, max)`
#[derive(Debug)]
pub struct RandomInterval {
    min: Duration,
    max: Duration,
    rng: StdRng,
}

impl RandomInterval {
    /// Create a source seeded from the OS
    pub fn new(min: Duration, max: Duration) -> Result<Self, SignalError> {
        Self::with_rng(min, max, StdRng::from_os_rng())
    }

    /// Create a reproducible source
    pub fn with_seed(min: Duration, max: Duration, seed: u64) -> Result<Self, SignalError> {
        Self::with_rng(min, max, StdRng::seed_from_u64(seed))
    }

    fn with_rng(min: Duration, max: Duration, rng: StdRng) -> Result<Self, SignalError> {
        debug!(?min, ?max, "RandomInterval::new: called");
        if min.is_zero() || min >= max {
            return Err(SignalError::InvalidInterval { min, max });
        }
        Ok(Self { min, max, rng })
    }

    pub fn bounds(&self) -> (Duration, Duration) {
        (self.min, self.max)
    }
}

impl Default for RandomInterval {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_INTERVAL,
            max: DEFAULT_MAX_INTERVAL,
            rng: StdRng::from_os_rng(),
        }
    }
}

impl IntervalSource for RandomInterval {
    fn next_interval(&mut self) -> Duration {
        self.rng.random_range(self.min..self.max)
    }
}

/// Always the same interval
#[derive(Debug, Clone, Copy)]
pub struct FixedInterval(pub Duration);

impl IntervalSource for FixedInterval {
    fn next_interval(&mut self) -> Duration {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_interval_within_bounds() {
        let mut source = RandomInterval::with_seed(Duration::from_millis(4000), Duration::from_millis(6000), 7).unwrap();

        for _ in 0..1000 {
            let interval = source.next_interval();
            assert!(interval >= Duration::from_millis(4000));
            assert!(interval < Duration::from_millis(6000));
        }
    }

    #[test]
    fn test_random_interval_varies() {
        let mut source = RandomInterval::with_seed(Duration::from_millis(1), Duration::from_millis(1000), 42).unwrap();
        let first = source.next_interval();

        assert!((0..50).any(|_| source.next_interval() != first));
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let min = Duration::from_millis(10);
        let max = Duration::from_millis(20);
        let mut a = RandomInterval::with_seed(min, max, 99).unwrap();
        let mut b = RandomInterval::with_seed(min, max, 99).unwrap();

        for _ in 0..20 {
            assert_eq!(a.next_interval(), b.next_interval());
        }
    }

    #[test]
    fn test_rejects_bad_bounds() {
        let err = RandomInterval::new(Duration::from_millis(6000), Duration::from_millis(4000)).unwrap_err();
        assert!(matches!(err, SignalError::InvalidInterval { .. }));

        assert!(RandomInterval::new(Duration::ZERO, Duration::from_millis(10)).is_err());
        assert!(RandomInterval::new(Duration::from_millis(10), Duration::from_millis(10)).is_err());
    }

    #[test]
    fn test_oversized_max_bound() {
        // Beyond u64 nanoseconds, still a valid millisecond config value
        let min = Duration::from_millis(4000);
        let max = Duration::from_millis(18_446_744_073_709_552);
        let mut source = RandomInterval::with_seed(min, max, 3).unwrap();

        for _ in 0..100 {
            let interval = source.next_interval();
            assert!(interval >= min && interval < max);
        }
    }

    #[test]
    fn test_default_bounds() {
        let source = RandomInterval::default();
        assert_eq!(source.bounds(), (DEFAULT_MIN_INTERVAL, DEFAULT_MAX_INTERVAL));
    }

    #[test]
    fn test_fixed_interval() {
        let mut source = FixedInterval(Duration::from_millis(15));
        assert_eq!(source.next_interval(), Duration::from_millis(15));
        assert_eq!(source.next_interval(), Duration::from_millis(15));
    }
}
