// Media action dispatcher
//
// Performs the visible effects of a gesture: volume steps and synthetic
// transport key presses. Transport and probe failures are logged here and
// never reach the gesture state machine.

use super::{KeyPhase, MediaError, MediaSubsystem, TransportCode, VolumeDirection};
use crate::{debug, error, warn};
use std::sync::Arc;
use std::time::Instant;

/// Executes media effects against a [`MediaSubsystem`]
#[derive(Clone)]
pub struct MediaActionDispatcher {
    media: Arc<dyn MediaSubsystem>,
}

impl MediaActionDispatcher {
    pub fn new(media: Arc<dyn MediaSubsystem>) -> Self {
        Self { media }
    }

    /// Step the music stream volume once.
    ///
    /// Failures are returned to the caller, which decides how loudly to
    /// report them.
    pub fn adjust_volume(&self, direction: VolumeDirection) -> Result<(), MediaError> {
        debug!("Adjusting music volume: {:?}", direction);
        self.media.adjust_stream_volume(direction)
    }

    /// Send a transport command as a down/up key pair sharing one timestamp.
    ///
    /// Each phase is dispatched independently; a failed phase is logged and
    /// the other phase is still attempted.
    pub fn send_transport_command(&self, code: TransportCode) {
        let timestamp = Instant::now();
        debug!("Sending {} transport command", code);

        for phase in [KeyPhase::Down, KeyPhase::Up] {
            if let Err(e) = self.media.dispatch_transport_key_event(code, phase, timestamp) {
                error!("Failed to dispatch {} key ({:?}): {}", code, phase, e);
            }
        }
    }

    /// Whether media is playing locally or, failing that, remotely.
    ///
    /// A failed remote probe counts as "not playing".
    pub fn is_media_active(&self) -> bool {
        if self.media.is_local_playback_active() {
            return true;
        }

        match self.media.is_remote_playback_active() {
            Ok(active) => active,
            Err(e) => {
                warn!("Remote playback probe failed, assuming inactive: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
#[path = "dispatcher_test.rs"]
mod tests;
