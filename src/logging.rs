// Routes `tracing` events to the browser console

use tracing::Level;
use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::layer::SubscriberExt;
use tracing_wasm::{WASMLayer, WASMLayerConfigBuilder};

pub fn default_level() -> Level {
    if cfg!(debug_assertions) {
        Level::DEBUG
    } else {
        Level::INFO
    }
}

/// Installs the console subscriber. Fails if another global subscriber is
/// already in place; that one keeps receiving events.
pub fn init(level: Level) -> Result<(), SetGlobalDefaultError> {
    let config = WASMLayerConfigBuilder::new()
        .set_report_logs_in_timings(false)
        .set_max_level(level)
        .build();
    let subscriber = tracing_subscriber::registry().with(WASMLayer::new(config));
    tracing::subscriber::set_global_default(subscriber)
}
