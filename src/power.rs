// Power/display state contract
// The gate only engages custom gestures while the screen is not interactive.

/// Trait for querying the host's display power state (allows mocking in tests)
pub trait PowerState: Send + Sync {
    /// Whether the screen is on and accepting user interaction
    fn is_interactive(&self) -> bool;
}

/// Power state that always reports the same value
///
/// Used by hosts that have no notion of a locked or dark screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticPower {
    interactive: bool,
}

impl StaticPower {
    pub fn new(interactive: bool) -> Self {
        Self { interactive }
    }
}

impl PowerState for StaticPower {
    fn is_interactive(&self) -> bool {
        self.interactive
    }
}
