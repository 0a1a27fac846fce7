//! Volume-key gesture recognition.
//!
//! Reinterprets the two hardware volume buttons as media controls while
//! the screen is off:
//!
//! - tap Up / Down: one volume step (only while media is playing)
//! - hold Up: next track
//! - hold Down: previous track
//! - hold both: play/pause
//!
//! ## Module Organization
//!
//! - `gate`: decides per event whether the gesture logic engages at all
//! - `state`: which buttons are held and whether a long press already fired
//! - `scheduler`: the three named long-press timers
//! - `interceptor`: entry point wiring the above to the host collaborators

mod gate;
mod interceptor;
mod scheduler;
mod state;

pub use gate::{GateDecision, InterceptGate};
pub use interceptor::{InterceptorBuilder, InterceptorError, VolumeKeyInterceptor};
pub use scheduler::{ArmToken, DeferredActionScheduler, TimerName};
pub use state::{PressOutcome, PressState};

/// Raw key identity as delivered by the host input pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKey {
    VolumeUp,
    VolumeDown,
    /// Any other key, carrying the host's key code
    Other(u32),
}

/// One of the two buttons the gesture logic owns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Up,
    Down,
}

impl Button {
    /// Map a raw key to a gesture button, if it is one
    pub fn from_key(key: InputKey) -> Option<Self> {
        match key {
            InputKey::VolumeUp => Some(Button::Up),
            InputKey::VolumeDown => Some(Button::Down),
            InputKey::Other(_) => None,
        }
    }

    /// Volume step for a short tap of this button
    pub fn volume_direction(self) -> crate::media::VolumeDirection {
        match self {
            Button::Up => crate::media::VolumeDirection::Raise,
            Button::Down => crate::media::VolumeDirection::Lower,
        }
    }

    /// Skip timer armed when this button starts a gesture on its own
    pub fn skip_timer(self) -> TimerName {
        match self {
            Button::Up => TimerName::SkipNext,
            Button::Down => TimerName::SkipPrevious,
        }
    }
}

/// Press or release
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    Down,
    Up,
}

/// A key event as it first reaches the input-policy layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawKeyEvent {
    pub key: InputKey,
    pub action: KeyAction,
    /// Set when the event came from physical hardware rather than being injected
    pub device_originated: bool,
}

impl RawKeyEvent {
    /// A hardware-originated event
    pub fn device(key: InputKey, action: KeyAction) -> Self {
        Self {
            key,
            action,
            device_originated: true,
        }
    }
}

/// What the host should do with an event after the interceptor saw it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventDisposition {
    /// Suppress default handling (no volume UI)
    Consumed,
    /// Let the platform handle the event normally
    PassThrough,
}
