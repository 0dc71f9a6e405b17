//! Latest-wins blocking handoff queue

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::QueueError;

/// Counters describing traffic through a queue
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct QueueStats {
    /// Values accepted by `send`
    pub sent: u64,
    /// Values handed out to receivers
    pub received: u64,
    /// Older values discarded because a newer one was buffered behind them
    pub superseded: u64,
    /// Values dropped because they were sent after `close`
    pub rejected: u64,
}

/// State protected by the queue mutex
struct QueueInner<T> {
    buffer: Vec<T>,
    closed: bool,
    stats: QueueStats,
}

impl<T> QueueInner<T> {
    /// Take the newest buffered value and clear everything older
    fn take_latest(&mut self) -> Option<T> {
        let latest = self.buffer.pop()?;
        self.stats.superseded += self.buffer.len() as u64;
        self.stats.received += 1;
        self.buffer.clear();
        Some(latest)
    }
}

/// Blocking handoff between one producer and any number of consumers.
///
/// This is a mailbox with last-write-wins semantics, not a FIFO: every
/// receive hands out the most recently sent value and discards anything
/// older that was still waiting. Consumers that fall behind skip
/// intermediate values; `QueueStats::superseded` counts how many.
///
/// When several consumers block at once, each sent value goes to exactly one
/// of them. The rest keep waiting for the next send.
pub struct HandoffQueue<T> {
    inner: Mutex<QueueInner<T>>,
    not_empty: Condvar,
}

impl<T> HandoffQueue<T> {
    /// Create an empty, open queue
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(QueueInner {
                buffer: Vec::new(),
                closed: false,
                stats: QueueStats::default(),
            }),
            not_empty: Condvar::new(),
        }
    }

    // Poisoning is ignored: no critical section leaves the buffer half-updated
    fn lock(&self) -> MutexGuard<'_, QueueInner<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Buffer a value and wake one blocked receiver
    pub fn send(&self, value: T) {
        debug!("HandoffQueue::send: called");
        let mut inner = self.lock();
        if inner.closed {
            warn!("HandoffQueue::send: queue closed, dropping value");
            inner.stats.rejected += 1;
            return;
        }
        inner.buffer.push(value);
        inner.stats.sent += 1;
        drop(inner);

        self.not_empty.notify_one();
    }

    /// Block until a value is available and return the newest one.
    ///
    /// Blocks without bound, including on a closed queue that has nothing
    /// left to hand out. Use [`receive_timeout`](Self::receive_timeout) to
    /// observe closure.
    pub fn receive(&self) -> T {
        debug!("HandoffQueue::receive: called");
        let mut inner = self.lock();
        loop {
            if let Some(value) = inner.take_latest() {
                debug!("HandoffQueue::receive: received value");
                return value;
            }
            inner = self.not_empty.wait(inner).unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Like [`receive`](Self::receive), but gives up after `timeout`.
    ///
    /// A timeout too large to represent as an `Instant` never expires.
    pub fn receive_timeout(&self, timeout: Duration) -> Result<T, QueueError> {
        debug!(?timeout, "HandoffQueue::receive_timeout: called");
        self.receive_deadline(Instant::now().checked_add(timeout), timeout)
    }

    /// Receive against an absolute deadline, or without one when `None`.
    /// `timeout` is only used to report the error.
    pub(crate) fn receive_deadline(&self, deadline: Option<Instant>, timeout: Duration) -> Result<T, QueueError> {
        let mut inner = self.lock();
        loop {
            if let Some(value) = inner.take_latest() {
                return Ok(value);
            }
            if inner.closed {
                debug!("HandoffQueue::receive_deadline: closed and empty");
                return Err(QueueError::Closed);
            }
            let Some(deadline) = deadline else {
                inner = self.not_empty.wait(inner).unwrap_or_else(PoisonError::into_inner);
                continue;
            };
            let now = Instant::now();
            if now >= deadline {
                debug!(?timeout, "HandoffQueue::receive_deadline: timed out");
                return Err(QueueError::Timeout(timeout));
            }
            let (guard, _) = self
                .not_empty
                .wait_timeout(inner, deadline - now)
                .unwrap_or_else(PoisonError::into_inner);
            inner = guard;
        }
    }

    /// Take the newest value if one is buffered, without blocking
    pub fn try_receive(&self) -> Option<T> {
        debug!("HandoffQueue::try_receive: called");
        self.lock().take_latest()
    }

    /// Stop accepting values and wake every waiter.
    ///
    /// A value already buffered can still be received.
    pub fn close(&self) {
        debug!("HandoffQueue::close: called");
        self.lock().closed = true;
        self.not_empty.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    pub fn is_empty(&self) -> bool {
        self.lock().buffer.is_empty()
    }

    /// Snapshot of the traffic counters
    pub fn stats(&self) -> QueueStats {
        self.lock().stats
    }
}

impl<T> Default for HandoffQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for HandoffQueue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("HandoffQueue")
            .field("buffered", &inner.buffer.len())
            .field("closed", &inner.closed)
            .field("stats", &inner.stats)
            .finish()
    }
}
