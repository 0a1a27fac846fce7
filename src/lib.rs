// Volume key gestures: long-press track skipping and a two-button
// play/pause chord, layered over ordinary volume handling.

// Enable coverage attribute on nightly for explicit exclusions
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod gesture;
pub mod logging;
pub mod media;
pub mod power;
pub mod queue;

#[cfg(feature = "desktop")]
pub mod host;

#[cfg(test)]
mod test_utils;

// Re-export log macros for use throughout the crate
pub use log::{debug, error, info, trace, warn};

pub use config::{Settings, UiConfiguration};
pub use gesture::{
    EventDisposition, InputKey, InterceptorBuilder, InterceptorError, KeyAction, RawKeyEvent,
    VolumeKeyInterceptor,
};
pub use media::{KeyPhase, MediaError, MediaSubsystem, TransportCode, VolumeDirection};
pub use power::{PowerState, StaticPower};
pub use queue::{CallbackScheduler, SerialQueue};

#[cfg(feature = "desktop")]
pub use host::run;
