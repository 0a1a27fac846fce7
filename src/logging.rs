// Logger setup
//
// Debug level in debug builds, Info in release. An explicit level from the
// settings wins over the build default; RUST_LOG wins over both.

use log::LevelFilter;
use std::sync::Once;

static INIT: Once = Once::new();

/// Default level for this build profile
pub fn default_level() -> LevelFilter {
    if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Install the global logger. Later calls are no-ops.
pub fn init(level_override: Option<&str>) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();
        builder.filter_level(default_level());
        if let Some(filters) = level_override {
            builder.parse_filters(filters);
        }
        if let Ok(env_filters) = std::env::var("RUST_LOG") {
            builder.parse_filters(&env_filters);
        }

        if let Err(e) = builder.try_init() {
            // Another logger was installed by the embedding process
            eprintln!("volkey: logger already set: {}", e);
        }
    });
}
