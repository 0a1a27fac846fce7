// Deferred-callback scheduling
//
// The gesture core arms its long-press timers against a host-provided
// callback queue. `SerialQueue` is the production implementation; tests
// drive a virtual-clock scheduler instead.

mod thread;

pub use thread::SerialQueue;

use std::time::Duration;

/// A deferred unit of work
pub type Callback = Box<dyn FnOnce() + Send + 'static>;

/// Opaque handle identifying one scheduled callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

impl TimerHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Errors from callback scheduling
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueueError {
    /// The queue thread has exited; nothing can be scheduled
    #[error("Callback queue is shut down")]
    ShutDown,

    /// The queue could not be started
    #[error("Failed to start callback queue: {0}")]
    StartFailed(String),
}

/// Trait for deferred-callback schedulers (allows mocking in tests)
///
/// Implementations must never run a callback synchronously from
/// `schedule`, and must run callbacks one at a time.
pub trait CallbackScheduler: Send + Sync {
    /// Run `callback` once, no earlier than `delay` from now
    fn schedule(&self, delay: Duration, callback: Callback) -> Result<TimerHandle, QueueError>;

    /// Drop a scheduled callback. Unknown or already-fired handles are ignored.
    fn cancel(&self, handle: TimerHandle);
}
