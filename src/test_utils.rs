// Shared test doubles for the host collaborators
// Test code is excluded from coverage since we measure production code coverage
#![cfg_attr(coverage_nightly, coverage(off))]

use crate::media::{KeyPhase, MediaError, MediaSubsystem, TransportCode, VolumeDirection};
use crate::power::PowerState;
use crate::queue::{Callback, CallbackScheduler, QueueError, TimerHandle};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// One observed call into the media subsystem
#[derive(Debug, Clone, PartialEq)]
pub enum MediaCall {
    Volume(VolumeDirection),
    Transport(TransportCode, KeyPhase, Instant),
}

/// Recording media subsystem with configurable probe results and failures
#[derive(Clone)]
pub struct MockMedia {
    calls: Arc<Mutex<Vec<MediaCall>>>,
    local_active: Arc<AtomicBool>,
    remote: Arc<Mutex<Result<bool, MediaError>>>,
    fail_volume: Arc<AtomicBool>,
    fail_transport: Arc<AtomicBool>,
}

impl MockMedia {
    /// Media subsystem with local playback active
    pub fn playing() -> Self {
        let media = Self::idle();
        media.set_local_active(true);
        media
    }

    /// Media subsystem with nothing playing anywhere
    pub fn idle() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            local_active: Arc::new(AtomicBool::new(false)),
            remote: Arc::new(Mutex::new(Ok(false))),
            fail_volume: Arc::new(AtomicBool::new(false)),
            fail_transport: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn set_local_active(&self, active: bool) {
        self.local_active.store(active, Ordering::SeqCst);
    }

    pub fn set_remote(&self, result: Result<bool, MediaError>) {
        *self.remote.lock() = result;
    }

    pub fn fail_volume(&self, fail: bool) {
        self.fail_volume.store(fail, Ordering::SeqCst);
    }

    pub fn fail_transport(&self, fail: bool) {
        self.fail_transport.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<MediaCall> {
        self.calls.lock().clone()
    }

    pub fn volume_calls(&self) -> Vec<VolumeDirection> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                MediaCall::Volume(dir) => Some(dir),
                _ => None,
            })
            .collect()
    }

    /// Transport codes seen on their Down phase (one per command sent)
    pub fn transport_commands(&self) -> Vec<TransportCode> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                MediaCall::Transport(code, KeyPhase::Down, _) => Some(code),
                _ => None,
            })
            .collect()
    }
}

impl MediaSubsystem for MockMedia {
    fn is_local_playback_active(&self) -> bool {
        self.local_active.load(Ordering::SeqCst)
    }

    fn is_remote_playback_active(&self) -> Result<bool, MediaError> {
        self.remote.lock().clone()
    }

    fn adjust_stream_volume(&self, direction: VolumeDirection) -> Result<(), MediaError> {
        self.calls.lock().push(MediaCall::Volume(direction));
        if self.fail_volume.load(Ordering::SeqCst) {
            return Err(MediaError::DispatchFailed("volume service died".to_string()));
        }
        Ok(())
    }

    fn dispatch_transport_key_event(
        &self,
        code: TransportCode,
        phase: KeyPhase,
        timestamp: Instant,
    ) -> Result<(), MediaError> {
        self.calls
            .lock()
            .push(MediaCall::Transport(code, phase, timestamp));
        if self.fail_transport.load(Ordering::SeqCst) {
            return Err(MediaError::DispatchFailed("session rejected key".to_string()));
        }
        Ok(())
    }
}

/// Power state with a settable interactive flag and a query counter
#[derive(Clone)]
pub struct MockPower {
    interactive: Arc<AtomicBool>,
    queries: Arc<AtomicUsize>,
}

impl MockPower {
    pub fn screen_off() -> Self {
        Self {
            interactive: Arc::new(AtomicBool::new(false)),
            queries: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn screen_on() -> Self {
        let power = Self::screen_off();
        power.set_interactive(true);
        power
    }

    pub fn set_interactive(&self, interactive: bool) {
        self.interactive.store(interactive, Ordering::SeqCst);
    }

    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

impl PowerState for MockPower {
    fn is_interactive(&self) -> bool {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.interactive.load(Ordering::SeqCst)
    }
}

#[derive(Default)]
struct ManualQueue {
    now: Duration,
    next_id: u64,
    /// Keyed by (deadline, id) so equal deadlines fire in scheduling order
    pending: BTreeMap<(Duration, u64), Callback>,
}

/// Virtual-clock scheduler; callbacks only run inside [`ManualScheduler::advance`]
#[derive(Clone, Default)]
pub struct ManualScheduler {
    inner: Arc<Mutex<ManualQueue>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward, running every callback that falls due.
    ///
    /// Callbacks run without the scheduler lock held, so they may schedule
    /// or cancel further callbacks.
    pub fn advance(&self, by: Duration) {
        let target = self.inner.lock().now + by;
        loop {
            let due = {
                let mut queue = self.inner.lock();
                let next_key = queue
                    .pending
                    .keys()
                    .next()
                    .copied()
                    .filter(|(deadline, _)| *deadline <= target);
                next_key.and_then(|key| {
                    queue.now = key.0;
                    queue.pending.remove(&key)
                })
            };
            match due {
                Some(callback) => callback(),
                None => break,
            }
        }
        self.inner.lock().now = target;
    }

    pub fn pending_count(&self) -> usize {
        self.inner.lock().pending.len()
    }
}

impl CallbackScheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, callback: Callback) -> Result<TimerHandle, QueueError> {
        let mut queue = self.inner.lock();
        queue.next_id += 1;
        let id = queue.next_id;
        let deadline = queue.now + delay;
        queue.pending.insert((deadline, id), callback);
        Ok(TimerHandle::new(id))
    }

    fn cancel(&self, handle: TimerHandle) {
        let mut queue = self.inner.lock();
        queue.pending.retain(|(_, id), _| *id != handle.id());
    }
}
