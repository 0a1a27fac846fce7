//! Volume key interceptor: the host-facing entry point.
//!
//! Every raw key event passes through [`VolumeKeyInterceptor::on_raw_event`]
//! before default handling. Engaged events drive the press state and the
//! long-press timers; timer firings re-enter through the same lock.
//!
//! State transitions happen under one mutex taken by each entry point
//! (press, release and the three timer callbacks), so the input thread and
//! the callback thread may differ. The power and media probes run before
//! the lock is taken and media effects after it is released, so
//! collaborators may call back into the interceptor.

use super::gate::{GateDecision, InterceptGate};
use super::scheduler::{ArmToken, DeferredActionScheduler, TimerName};
use super::state::{PressOutcome, PressState};
use super::{Button, EventDisposition, KeyAction, RawKeyEvent};
use crate::config::UiConfiguration;
use crate::media::{MediaActionDispatcher, MediaSubsystem, TransportCode, VolumeDirection};
use crate::power::PowerState;
use crate::queue::{Callback, CallbackScheduler};
use crate::{debug, warn};
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use std::time::Duration;

/// Errors that prevent the interceptor from being installed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InterceptorError {
    /// A required host collaborator was not provided
    #[error("Missing collaborator: {0}")]
    MissingCollaborator(&'static str),

    /// The long-press timeout must be a positive duration
    #[error("Invalid long-press timeout: {0:?}")]
    InvalidLongPressTimeout(Duration),
}

/// Press state and armed timers, guarded together
struct Gesture {
    press: PressState,
    timers: DeferredActionScheduler,
}

struct Inner {
    gesture: Mutex<Gesture>,
    gate: InterceptGate,
    dispatcher: MediaActionDispatcher,
}

/// Reinterprets hardware volume keys as media controls
///
/// Cheap to clone; clones share the same gesture state.
#[derive(Clone)]
pub struct VolumeKeyInterceptor {
    inner: Arc<Inner>,
}

impl VolumeKeyInterceptor {
    pub fn builder() -> InterceptorBuilder {
        InterceptorBuilder::default()
    }

    /// Handle one raw key event.
    ///
    /// Returns [`EventDisposition::Consumed`] when the gesture logic took the
    /// event; the host must then suppress its default volume handling, even
    /// if a resulting media effect failed.
    pub fn on_raw_event(&self, event: RawKeyEvent) -> EventDisposition {
        let in_progress = self.inner.gesture.lock().press.is_gesture_in_progress();

        let button = match self.inner.gate.evaluate(&event, in_progress) {
            GateDecision::Engage(button) => button,
            GateDecision::Passthrough => return EventDisposition::PassThrough,
        };

        match event.action {
            KeyAction::Down => {
                // Only a press from idle starts a gesture, so only then is media probed
                let media_active = (!in_progress).then(|| self.inner.dispatcher.is_media_active());
                let mut gesture = self.inner.gesture.lock();
                self.inner.handle_down(&mut gesture, button, media_active);
            }
            KeyAction::Up => {
                let tap = {
                    let mut gesture = self.inner.gesture.lock();
                    self.inner.handle_up(&mut gesture, button)
                };
                if let Some(direction) = tap {
                    self.inner.finish_tap(direction);
                }
            }
        }

        EventDisposition::Consumed
    }

    /// Snapshot of the current press state
    pub fn press_state(&self) -> PressState {
        self.inner.gesture.lock().press
    }

    /// Currently armed long-press timers
    pub fn armed_timers(&self) -> Vec<TimerName> {
        self.inner.gesture.lock().timers.armed()
    }

    pub fn is_armed(&self, name: TimerName) -> bool {
        self.inner.gesture.lock().timers.is_armed(name)
    }

    pub fn long_press_timeout(&self) -> Duration {
        self.inner.gesture.lock().timers.delay()
    }
}

impl Inner {
    /// `media_active` is the probe taken before locking, if this press
    /// looked like the start of a gesture
    fn handle_down(
        self: &Arc<Self>,
        gesture: &mut Gesture,
        button: Button,
        media_active: Option<bool>,
    ) {
        let outcome = gesture.press.press(button);
        debug!(
            "down action received: {:?}, down: {}, up: {}",
            button,
            gesture.press.down_held(),
            gesture.press.up_held()
        );

        match outcome {
            PressOutcome::Chord => {
                debug!("Both buttons held, aborting delayed skip");
                gesture.timers.cancel_all(&TimerName::SKIPS);
            }
            PressOutcome::FreshGesture => {
                // None: media went unchecked because a gesture looked in progress
                if media_active.unwrap_or(false) {
                    debug!("Media is active, arming delayed skip");
                    self.arm(gesture, button.skip_timer());
                }
                // Armed regardless of media state; only fires if both are held
                self.arm(gesture, TimerName::PlayPause);
            }
            PressOutcome::Repeat => {
                debug!("Repeat press of {:?} ignored", button);
            }
        }
    }

    /// Returns the volume step to apply if this release still counts as a tap
    fn handle_up(&self, gesture: &mut Gesture, button: Button) -> Option<VolumeDirection> {
        let tap = gesture.press.release(button);
        debug!(
            "up action received: {:?}, down: {}, up: {}",
            button,
            gesture.press.down_held(),
            gesture.press.up_held()
        );

        gesture.timers.cancel_all(&TimerName::ALL);

        tap.then(|| button.volume_direction())
    }

    fn finish_tap(&self, direction: VolumeDirection) {
        if !self.dispatcher.is_media_active() {
            return;
        }
        if let Err(e) = self.dispatcher.adjust_volume(direction) {
            warn!("Volume adjustment failed: {}", e);
        }
    }

    fn arm(self: &Arc<Self>, gesture: &mut Gesture, name: TimerName) {
        let weak = Arc::downgrade(self);
        gesture
            .timers
            .arm(name, move |token| -> Callback { Box::new(move || fire(&weak, token)) });
    }

    fn on_timer(&self, token: ArmToken) {
        let command = {
            let mut gesture = self.gesture.lock();
            if !gesture.timers.claim(token) {
                debug!("{:?} fired after cancellation, dropping", token.name);
                return;
            }

            match token.name {
                TimerName::SkipNext => {
                    gesture.press.mark_long_press_fired();
                    Some(TransportCode::Next)
                }
                TimerName::SkipPrevious => {
                    gesture.press.mark_long_press_fired();
                    Some(TransportCode::Previous)
                }
                TimerName::PlayPause if gesture.press.both_held() => {
                    gesture.press.mark_long_press_fired();
                    Some(TransportCode::PlayPause)
                }
                TimerName::PlayPause => {
                    debug!(
                        "NOT sending play/pause, down: {}, up: {}",
                        gesture.press.down_held(),
                        gesture.press.up_held()
                    );
                    None
                }
            }
        };

        if let Some(code) = command {
            self.dispatcher.send_transport_command(code);
        }
    }
}

fn fire(inner: &Weak<Inner>, token: ArmToken) {
    if let Some(inner) = inner.upgrade() {
        inner.on_timer(token);
    }
}

/// Builder for [`VolumeKeyInterceptor`]; every collaborator is required
#[derive(Default)]
pub struct InterceptorBuilder {
    media: Option<Arc<dyn MediaSubsystem>>,
    power: Option<Arc<dyn PowerState>>,
    scheduler: Option<Arc<dyn CallbackScheduler>>,
    long_press_timeout: Option<Duration>,
}

impl InterceptorBuilder {
    pub fn with_media(mut self, media: Arc<dyn MediaSubsystem>) -> Self {
        self.media = Some(media);
        self
    }

    pub fn with_power(mut self, power: Arc<dyn PowerState>) -> Self {
        self.power = Some(power);
        self
    }

    pub fn with_scheduler(mut self, scheduler: Arc<dyn CallbackScheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    pub fn with_long_press_timeout(mut self, timeout: Duration) -> Self {
        self.long_press_timeout = Some(timeout);
        self
    }

    /// Read the long-press timeout once from the host UI configuration
    pub fn with_ui_configuration(self, config: &dyn UiConfiguration) -> Self {
        self.with_long_press_timeout(config.long_press_timeout())
    }

    pub fn build(self) -> Result<VolumeKeyInterceptor, InterceptorError> {
        let media = self
            .media
            .ok_or(InterceptorError::MissingCollaborator("media subsystem"))?;
        let power = self
            .power
            .ok_or(InterceptorError::MissingCollaborator("power state"))?;
        let scheduler = self
            .scheduler
            .ok_or(InterceptorError::MissingCollaborator("callback scheduler"))?;
        let timeout = self
            .long_press_timeout
            .ok_or(InterceptorError::MissingCollaborator("long-press timeout"))?;
        if timeout.is_zero() {
            return Err(InterceptorError::InvalidLongPressTimeout(timeout));
        }

        Ok(VolumeKeyInterceptor {
            inner: Arc::new(Inner {
                gesture: Mutex::new(Gesture {
                    press: PressState::new(),
                    timers: DeferredActionScheduler::new(scheduler, timeout),
                }),
                gate: InterceptGate::new(power),
                dispatcher: MediaActionDispatcher::new(media),
            }),
        })
    }
}

#[cfg(test)]
#[path = "interceptor_test.rs"]
mod tests;
