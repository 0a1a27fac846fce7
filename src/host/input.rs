// Rdev-based raw input source
//
// Uses rdev's grab API so the callback can suppress events: returning None
// swallows the key before the desktop's own volume handling sees it.
// rdev has no named volume keys, they arrive as Key::Unknown(code).

use crate::gesture::{EventDisposition, InputKey, KeyAction, RawKeyEvent, VolumeKeyInterceptor};
use crate::host::HostError;
use crate::{debug, info};
use parking_lot::Mutex;
use rdev::{grab, Event, EventType, Key};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How long a synthesised volume key may take to come back through the grab
pub const ECHO_WINDOW: Duration = Duration::from_millis(250);

// Linux: evdev codes, and the same keys as X11 keycodes (evdev + 8)
#[cfg(target_os = "linux")]
const VOLUME_DOWN_CODES: &[u32] = &[114, 122];
#[cfg(target_os = "linux")]
const VOLUME_UP_CODES: &[u32] = &[115, 123];

// Windows virtual-key codes VK_VOLUME_DOWN / VK_VOLUME_UP
#[cfg(target_os = "windows")]
const VOLUME_DOWN_CODES: &[u32] = &[0xAE];
#[cfg(target_os = "windows")]
const VOLUME_UP_CODES: &[u32] = &[0xAF];

// macOS delivers volume keys as system-defined events, which rdev does not surface
#[cfg(not(any(target_os = "linux", target_os = "windows")))]
const VOLUME_DOWN_CODES: &[u32] = &[];
#[cfg(not(any(target_os = "linux", target_os = "windows")))]
const VOLUME_UP_CODES: &[u32] = &[];

/// Map an rdev key to the interceptor's key identity.
///
/// Named rdev keys carry no raw code and map to `Other(0)`.
pub fn map_key(key: Key) -> InputKey {
    match key {
        Key::Unknown(code) if VOLUME_DOWN_CODES.contains(&code) => InputKey::VolumeDown,
        Key::Unknown(code) if VOLUME_UP_CODES.contains(&code) => InputKey::VolumeUp,
        Key::Unknown(code) => InputKey::Other(code),
        _ => InputKey::Other(0),
    }
}

/// Remembers volume keys this process synthesised so that their echoes
/// through the grab are flagged as not device-originated.
///
/// Only useful where the grab sees injected input. On Linux the grab reads
/// evdev while enigo injects through XTest, so no echo ever arrives and a
/// pending expectation would swallow the next real press instead.
pub struct SyntheticEchoFilter {
    window: Duration,
    enabled: bool,
    expected: Mutex<Vec<(InputKey, KeyAction, Instant)>>,
}

impl SyntheticEchoFilter {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            enabled: true,
            expected: Mutex::new(Vec::new()),
        }
    }

    /// A filter that never flags anything
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new(Duration::ZERO)
        }
    }

    /// Enabled only on Windows, whose low-level hook also receives SendInput events
    pub fn for_current_platform() -> Self {
        if cfg!(target_os = "windows") {
            Self::new(ECHO_WINDOW)
        } else {
            Self::disabled()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record that a full click (down + up) of `key` is about to be synthesised
    pub fn expect_click(&self, key: InputKey) {
        if !self.enabled {
            return;
        }
        let deadline = Instant::now() + self.window;
        let mut expected = self.expected.lock();
        expected.push((key, KeyAction::Down, deadline));
        expected.push((key, KeyAction::Up, deadline));
    }

    /// Consume a matching expectation; true if this event is our own echo
    pub fn is_echo(&self, key: InputKey, action: KeyAction) -> bool {
        let now = Instant::now();
        let mut expected = self.expected.lock();
        expected.retain(|(_, _, deadline)| *deadline >= now);

        match expected
            .iter()
            .position(|(k, a, _)| *k == key && *a == action)
        {
            Some(index) => {
                expected.remove(index);
                true
            }
            None => false,
        }
    }
}

/// Grab global keyboard input and feed volume keys to `interceptor`.
///
/// Blocks for the lifetime of the grab.
#[cfg_attr(coverage_nightly, coverage(off))]
pub fn grab_volume_keys(
    interceptor: VolumeKeyInterceptor,
    echo: Arc<SyntheticEchoFilter>,
) -> Result<(), HostError> {
    info!("Grabbing keyboard input for volume keys");
    grab(move |event: Event| handle_event(&interceptor, &echo, event))
        .map_err(|e| HostError::Grab(format!("{:?}", e)))
}

fn handle_event(
    interceptor: &VolumeKeyInterceptor,
    echo: &SyntheticEchoFilter,
    event: Event,
) -> Option<Event> {
    let (key, action) = match event.event_type {
        EventType::KeyPress(k) => (k, KeyAction::Down),
        EventType::KeyRelease(k) => (k, KeyAction::Up),
        _ => return Some(event),
    };

    let key = map_key(key);
    if matches!(key, InputKey::Other(_)) {
        return Some(event);
    }

    let raw = RawKeyEvent {
        key,
        action,
        device_originated: !echo.is_echo(key, action),
    };
    match interceptor.on_raw_event(raw) {
        EventDisposition::Consumed => {
            debug!("Consumed {:?} {:?}", key, action);
            None
        }
        EventDisposition::PassThrough => Some(event),
    }
}
