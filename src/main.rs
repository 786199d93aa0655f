use std::rc::Rc;

use console_error_panic_hook::set_once;

mod components;
mod config;
mod coordinator;
mod error;
mod ffi;
mod logging;
mod map;
mod model;
mod state;
mod util;
mod viewer;

use components::{App, AppProps};
use config::AppConfig;

fn main() {
    set_once();
    let config = AppConfig::resolve();
    if let Err(err) = logging::init(config.log_level) {
        web_sys::console::warn_1(&format!("console logging not installed: {}", err).into());
    }
    tracing::debug!(
        "tokens: mapbox={} mapillary={}",
        config.map_token.is_some(),
        config.viewer_token.is_some()
    );
    yew::Renderer::<App>::with_props(AppProps {
        config: Rc::new(config),
    })
    .render();
}
