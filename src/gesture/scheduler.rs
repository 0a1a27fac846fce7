// Deferred long-press actions
//
// Tracks the three named long-press timers armed against the host's
// callback queue. Each arm carries a generation token; a firing callback
// must claim its token before acting, so a cancel that races a firing on
// another thread always wins.

use crate::queue::{Callback, CallbackScheduler, TimerHandle};
use crate::{debug, warn};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// The three long-press actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimerName {
    SkipNext,
    SkipPrevious,
    PlayPause,
}

impl TimerName {
    pub const ALL: [TimerName; 3] = [
        TimerName::SkipNext,
        TimerName::SkipPrevious,
        TimerName::PlayPause,
    ];

    pub const SKIPS: [TimerName; 2] = [TimerName::SkipNext, TimerName::SkipPrevious];
}

/// Identifies one particular arming of a named timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArmToken {
    pub name: TimerName,
    generation: u64,
}

#[derive(Debug)]
struct ArmedTimer {
    generation: u64,
    handle: TimerHandle,
}

/// Arms and cancels the named long-press timers
pub struct DeferredActionScheduler {
    queue: Arc<dyn CallbackScheduler>,
    delay: Duration,
    armed: HashMap<TimerName, ArmedTimer>,
    next_generation: u64,
}

impl DeferredActionScheduler {
    pub fn new(queue: Arc<dyn CallbackScheduler>, delay: Duration) -> Self {
        Self {
            queue,
            delay,
            armed: HashMap::new(),
            next_generation: 0,
        }
    }

    /// The long-press timeout every timer is armed with
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Arm `name` unless it is already armed.
    ///
    /// `make_callback` receives the token the callback must present to
    /// [`claim`](Self::claim) when it fires. Returns true if a timer was armed.
    pub fn arm<F>(&mut self, name: TimerName, make_callback: F) -> bool
    where
        F: FnOnce(ArmToken) -> Callback,
    {
        if self.armed.contains_key(&name) {
            debug!("{:?} already armed, leaving it", name);
            return false;
        }

        self.next_generation += 1;
        let token = ArmToken {
            name,
            generation: self.next_generation,
        };

        match self.queue.schedule(self.delay, make_callback(token)) {
            Ok(handle) => {
                debug!("Armed {:?} for {:?}", name, self.delay);
                self.armed.insert(
                    name,
                    ArmedTimer {
                        generation: token.generation,
                        handle,
                    },
                );
                true
            }
            Err(e) => {
                warn!("Failed to arm {:?}: {}", name, e);
                false
            }
        }
    }

    /// Cancel every named timer that is armed; the rest are ignored
    pub fn cancel_all(&mut self, names: &[TimerName]) {
        for name in names {
            if let Some(timer) = self.armed.remove(name) {
                debug!("Cancelled {:?}", name);
                self.queue.cancel(timer.handle);
            }
        }
    }

    /// Remove a firing timer from the armed set.
    ///
    /// Returns false if that arming was cancelled (or superseded) before the
    /// callback got here, in which case the callback must do nothing.
    pub fn claim(&mut self, token: ArmToken) -> bool {
        match self.armed.get(&token.name) {
            Some(timer) if timer.generation == token.generation => {
                self.armed.remove(&token.name);
                true
            }
            _ => false,
        }
    }

    pub fn is_armed(&self, name: TimerName) -> bool {
        self.armed.contains_key(&name)
    }

    /// Armed timer names in a stable order
    pub fn armed(&self) -> Vec<TimerName> {
        let mut names: Vec<TimerName> = self.armed.keys().copied().collect();
        names.sort();
        names
    }
}
