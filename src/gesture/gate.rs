// Intercept gate
//
// First filter on every raw event: only hardware volume keys, and only
// while the screen is not interactive or a gesture is already underway.

use super::{Button, RawKeyEvent};
use crate::power::PowerState;
use std::sync::Arc;

/// Outcome of [`InterceptGate::evaluate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Take over the event for this button
    Engage(Button),
    /// Leave the event to default platform handling
    Passthrough,
}

/// Decides whether the gesture logic engages for an event
pub struct InterceptGate {
    power: Arc<dyn PowerState>,
}

impl InterceptGate {
    pub fn new(power: Arc<dyn PowerState>) -> Self {
        Self { power }
    }

    /// Engage iff the key is a volume key, the event is hardware-originated,
    /// and either the screen is not interactive or a gesture is in progress.
    ///
    /// The power state is only queried once the cheaper checks have passed
    /// and no gesture is in progress.
    pub fn evaluate(&self, event: &RawKeyEvent, gesture_in_progress: bool) -> GateDecision {
        let Some(button) = Button::from_key(event.key) else {
            return GateDecision::Passthrough;
        };
        if !event.device_originated {
            return GateDecision::Passthrough;
        }
        if gesture_in_progress || !self.power.is_interactive() {
            GateDecision::Engage(button)
        } else {
            GateDecision::Passthrough
        }
    }
}
