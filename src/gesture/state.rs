// Press state tracking for the two volume buttons

use super::Button;

/// How a press changed the held set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressOutcome {
    /// First button down: a new gesture began
    FreshGesture,
    /// Second button joined an already-held first button
    Chord,
    /// The button was already held (driver auto-repeat); nothing changed
    Repeat,
}

/// Which volume buttons are held and whether the current gesture has
/// already produced a long-press action.
///
/// `long_press_fired` is reset only when a press starts a fresh gesture
/// from the no-buttons-held state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PressState {
    down_held: bool,
    up_held: bool,
    long_press_fired: bool,
}

impl PressState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn down_held(&self) -> bool {
        self.down_held
    }

    pub fn up_held(&self) -> bool {
        self.up_held
    }

    pub fn long_press_fired(&self) -> bool {
        self.long_press_fired
    }

    pub fn is_held(&self, button: Button) -> bool {
        match button {
            Button::Up => self.up_held,
            Button::Down => self.down_held,
        }
    }

    /// A gesture is in progress while any button is held
    pub fn is_gesture_in_progress(&self) -> bool {
        self.down_held || self.up_held
    }

    pub fn both_held(&self) -> bool {
        self.down_held && self.up_held
    }

    /// Record a button going down
    pub fn press(&mut self, button: Button) -> PressOutcome {
        if self.is_held(button) {
            return PressOutcome::Repeat;
        }

        let was_idle = !self.is_gesture_in_progress();
        self.set_held(button, true);

        if was_idle {
            self.long_press_fired = false;
            PressOutcome::FreshGesture
        } else {
            PressOutcome::Chord
        }
    }

    /// Record a button going up.
    ///
    /// Returns true when the release should still count as a short tap,
    /// i.e. no long-press action fired during this gesture.
    pub fn release(&mut self, button: Button) -> bool {
        self.set_held(button, false);
        !self.long_press_fired
    }

    /// Mark the current gesture as having produced a long-press action
    pub fn mark_long_press_fired(&mut self) {
        self.long_press_fired = true;
    }

    fn set_held(&mut self, button: Button, held: bool) {
        match button {
            Button::Up => self.up_held = held,
            Button::Down => self.down_held = held,
        }
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
