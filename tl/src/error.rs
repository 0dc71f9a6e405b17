//! Error types for the queue and the signal

use std::time::Duration;
use thiserror::Error;

/// Errors returned by the fallible receive variants of the handoff queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueueError {
    #[error("No value received within {0:?}")]
    Timeout(Duration),

    #[error("Queue closed")]
    Closed,
}

/// Errors that can occur while driving a traffic light
#[derive(Debug, Error)]
pub enum SignalError {
    #[error("Traffic light is already cycling")]
    AlreadyStarted,

    #[error("Invalid cycle interval: min {min:?} must be non-zero and below max {max:?}")]
    InvalidInterval { min: Duration, max: Duration },

    #[error("Phase not observed within {0:?}")]
    Timeout(Duration),

    #[error("Traffic light stopped before the phase was observed")]
    Stopped,

    #[error("Failed to spawn cycle thread: {0}")]
    Spawn(#[from] std::io::Error),
}

impl From<QueueError> for SignalError {
    fn from(err: QueueError) -> Self {
        match err {
            QueueError::Timeout(timeout) => SignalError::Timeout(timeout),
            QueueError::Closed => SignalError::Stopped,
        }
    }
}

impl SignalError {
    /// Check if this error means the wait simply ran out of time
    pub fn is_timeout(&self) -> bool {
        matches!(self, SignalError::Timeout(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_error_conversion() {
        let err: SignalError = QueueError::Timeout(Duration::from_millis(250)).into();
        assert!(matches!(err, SignalError::Timeout(d) if d == Duration::from_millis(250)));

        let err: SignalError = QueueError::Closed.into();
        assert!(matches!(err, SignalError::Stopped));
    }

    #[test]
    fn test_is_timeout() {
        assert!(SignalError::Timeout(Duration::from_secs(1)).is_timeout());
        assert!(!SignalError::Stopped.is_timeout());
        assert!(!SignalError::AlreadyStarted.is_timeout());
    }

    #[test]
    fn test_display_messages() {
        let err = SignalError::InvalidInterval {
            min: Duration::from_millis(6000),
            max: Duration::from_millis(4000),
        };
        assert_eq!(
            err.to_string(),
            "Invalid cycle interval: min 6s must be non-zero and below max 4s"
        );
        assert_eq!(QueueError::Closed.to_string(), "Queue closed");
    }
}
