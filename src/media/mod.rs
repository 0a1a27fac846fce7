//! Media subsystem contract and the dispatcher that drives it.
//!
//! The media subsystem is owned by the host: it knows whether audio is
//! playing, can step the music stream volume, and accepts synthetic
//! media-transport key events. This module only defines the capability
//! surface the gesture core consumes.

mod dispatcher;

pub use dispatcher::MediaActionDispatcher;

use std::time::Instant;

/// Direction of a one-step volume adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VolumeDirection {
    Raise,
    Lower,
}

/// Media-transport command sent to the active player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportCode {
    Next,
    Previous,
    PlayPause,
}

impl std::fmt::Display for TransportCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportCode::Next => write!(f, "next"),
            TransportCode::Previous => write!(f, "previous"),
            TransportCode::PlayPause => write!(f, "play/pause"),
        }
    }
}

/// Phase of a synthetic key event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyPhase {
    Down,
    Up,
}

/// Errors reported by a media subsystem
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MediaError {
    /// A playback probe could not be answered
    #[error("Playback probe failed: {0}")]
    ProbeFailed(String),

    /// The subsystem rejected or failed a volume step or key dispatch
    #[error("Media dispatch failed: {0}")]
    DispatchFailed(String),

    /// The capability does not exist on this host
    #[error("Not supported on this host: {0}")]
    Unsupported(&'static str),
}

/// Capability surface of the host media subsystem (allows mocking in tests)
pub trait MediaSubsystem: Send + Sync {
    /// Whether audio is playing on this device
    fn is_local_playback_active(&self) -> bool;

    /// Whether audio is playing on a paired remote endpoint
    fn is_remote_playback_active(&self) -> Result<bool, MediaError>;

    /// Step the music stream volume once in `direction`
    fn adjust_stream_volume(&self, direction: VolumeDirection) -> Result<(), MediaError>;

    /// Deliver one phase of a synthetic transport key event
    fn dispatch_transport_key_event(
        &self,
        code: TransportCode,
        phase: KeyPhase,
        timestamp: Instant,
    ) -> Result<(), MediaError>;
}
