// Enigo-backed media subsystem
// Volume steps and transport keys are synthesised as keyboard media keys.

use super::SyntheticEchoFilter;
use crate::gesture::InputKey;
use crate::media::{KeyPhase, MediaError, MediaSubsystem, TransportCode, VolumeDirection};
use enigo::{Direction, Enigo, Key, Keyboard, Settings as EnigoSettings};
use std::sync::Arc;
use std::time::Instant;

/// Media subsystem that presses media keys through enigo
///
/// A fresh `Enigo` is created per dispatch so the subsystem stays
/// Send + Sync on every platform.
pub struct EnigoMedia {
    assume_active: bool,
    echo: Arc<SyntheticEchoFilter>,
}

impl EnigoMedia {
    pub fn new(assume_active: bool, echo: Arc<SyntheticEchoFilter>) -> Self {
        Self {
            assume_active,
            echo,
        }
    }

    fn press(&self, key: Key, direction: Direction) -> Result<(), MediaError> {
        let label = format!("{:?}", key);
        let mut enigo = Enigo::new(&EnigoSettings::default()).map_err(|e| {
            MediaError::DispatchFailed(format!("Failed to create keyboard simulator: {}", e))
        })?;
        enigo
            .key(key, direction)
            .map_err(|e| MediaError::DispatchFailed(format!("Failed to send {}: {}", label, e)))
    }
}

impl MediaSubsystem for EnigoMedia {
    fn is_local_playback_active(&self) -> bool {
        self.assume_active
    }

    fn is_remote_playback_active(&self) -> Result<bool, MediaError> {
        Err(MediaError::Unsupported("remote playback probe"))
    }

    fn adjust_stream_volume(&self, direction: VolumeDirection) -> Result<(), MediaError> {
        let (key, input_key) = match direction {
            VolumeDirection::Raise => (Key::VolumeUp, InputKey::VolumeUp),
            VolumeDirection::Lower => (Key::VolumeDown, InputKey::VolumeDown),
        };
        self.echo.expect_click(input_key);
        self.press(key, Direction::Click)
    }

    fn dispatch_transport_key_event(
        &self,
        code: TransportCode,
        phase: KeyPhase,
        _timestamp: Instant,
    ) -> Result<(), MediaError> {
        let key = match code {
            TransportCode::Next => Key::MediaNextTrack,
            TransportCode::Previous => Key::MediaPrevTrack,
            TransportCode::PlayPause => Key::MediaPlayPause,
        };
        let direction = match phase {
            KeyPhase::Down => Direction::Press,
            KeyPhase::Up => Direction::Release,
        };
        self.press(key, direction)
    }
}
