//! Blocking handoff queue
//!
//! A Mutex + Condvar mailbox shared by one producer and any number of
//! consumers. Receivers always get the newest value; see [`HandoffQueue`].

mod handoff;

pub use handoff::{HandoffQueue, QueueStats};
