//! Desktop installer.
//!
//! Attaches the volume key interceptor to a desktop session:
//! - `input`: global key grab via rdev, feeding raw volume key events
//! - `media`: volume steps and transport keys synthesised with enigo
//!
//! Playback state is not observable here, so media activity comes from
//! settings, and the screen is reported as not interactive unless
//! configured otherwise.

mod input;
mod media;

pub use input::{grab_volume_keys, map_key, SyntheticEchoFilter, ECHO_WINDOW};
pub use media::EnigoMedia;

use crate::config::{ConfigError, Settings};
use crate::gesture::{InterceptorError, VolumeKeyInterceptor};
use crate::power::StaticPower;
use crate::queue::{QueueError, SerialQueue};
use crate::{error, info, logging, warn};
use std::sync::Arc;

/// Errors that stop the desktop host
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Callback queue error: {0}")]
    Queue(#[from] QueueError),

    #[error("Interceptor installation failed: {0}")]
    Interceptor(#[from] InterceptorError),

    #[error("Keyboard grab failed: {0}")]
    Grab(String),
}

/// Daemon entry point: load settings, install the interceptor, grab input.
/// Blocks until the grab ends; exits the process non-zero on failure.
#[cfg_attr(coverage_nightly, coverage(off))]
pub fn run() {
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            logging::init(None);
            error!("Failed to load settings: {}", e);
            std::process::exit(1);
        }
    };
    logging::init(settings.log_level.as_deref());

    if let Err(e) = run_with(&settings) {
        error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
fn run_with(settings: &Settings) -> Result<(), HostError> {
    info!("Starting volkey...");
    setup_signal_handler();

    let queue = Arc::new(SerialQueue::spawn()?);
    let echo = Arc::new(SyntheticEchoFilter::for_current_platform());
    let media = Arc::new(EnigoMedia::new(
        settings.host.assume_media_active,
        echo.clone(),
    ));
    let power = Arc::new(StaticPower::new(settings.host.screen_interactive));

    let interceptor = VolumeKeyInterceptor::builder()
        .with_media(media)
        .with_power(power)
        .with_scheduler(queue)
        .with_ui_configuration(settings)
        .build()?;
    info!(
        "Interceptor installed, long-press timeout {:?}",
        interceptor.long_press_timeout()
    );

    grab_volume_keys(interceptor, echo)
}

/// Exit on Ctrl+C. The rdev grab loop cannot be stopped from another
/// thread, so the handler ends the process directly.
fn setup_signal_handler() {
    if let Err(e) = ctrlc::set_handler(|| {
        info!("Interrupted, shutting down");
        std::process::exit(0);
    }) {
        warn!("Failed to set Ctrl+C handler: {}", e);
    }
}
