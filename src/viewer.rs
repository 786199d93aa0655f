// Live street-level viewer owned by the viewer pane
use std::cell::Cell;
use std::rc::Rc;

use serde::Serialize;
use tracing::Level;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::HtmlElement;

use crate::config::AppConfig;
use crate::coordinator::ImageNavigator;
use crate::error::PaneError;
use crate::ffi::mapillary::Viewer;
use crate::model::ImageId;
use crate::util::{describe_js_error, to_js};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ViewerOptions<'a> {
    access_token: &'a str,
}

pub struct ViewerHandle {
    viewer: Viewer,
    // numbers navigation requests so racing moves can be told apart in logs
    requests: Rc<Cell<u64>>,
}

impl ViewerHandle {
    pub fn create(container: &HtmlElement, config: &AppConfig) -> Result<Self, PaneError> {
        let token = config.viewer_credential()?;
        let options = to_js(&ViewerOptions { access_token: token }, "viewer options")?;
        js_sys::Reflect::set(&options, &JsValue::from_str("container"), container)
            .map_err(|e| PaneError::js("set viewer container", &e))?;
        let viewer = Viewer::new(&options).map_err(|e| PaneError::js("create viewer", &e))?;
        tracing::debug!("image viewer created");
        Ok(Self {
            viewer,
            requests: Rc::new(Cell::new(0)),
        })
    }
}

impl ImageNavigator for ViewerHandle {
    fn navigate_to(&self, image_id: &ImageId) {
        let request = self.requests.get() + 1;
        self.requests.set(request);

        let promise = match self.viewer.move_to(image_id.as_str()) {
            Ok(promise) => promise,
            Err(err) => {
                tracing::error!("Mapillary viewer error: {}", describe_js_error(&err));
                return;
            }
        };
        let image_id = image_id.clone();
        let latest = self.requests.clone();
        spawn_local(async move {
            let result = JsFuture::from(promise)
                .await
                .map(|_| ())
                .map_err(|err| describe_js_error(&err));
            let (level, message) = settled(&image_id, result, request, latest.get());
            if level == Level::ERROR {
                tracing::error!("{}", message);
            } else {
                tracing::debug!("{}", message);
            }
        });
    }
}

/// Log line for a navigation that finished. A rejection is reported and
/// dropped; the viewer stays on the last image it managed to show.
fn settled(image_id: &ImageId, result: Result<(), String>, request: u64, latest: u64) -> (Level, String) {
    match result {
        Err(reason) => (Level::ERROR, format!("Mapillary viewer error: {}", reason)),
        Ok(()) if latest == request => (
            Level::DEBUG,
            format!("viewer showing {} (request #{})", image_id, request),
        ),
        Ok(()) => (
            Level::DEBUG,
            format!(
                "request #{} for {} resolved, superseded by request #{}",
                request, image_id, latest
            ),
        ),
    }
}

impl Drop for ViewerHandle {
    fn drop(&mut self) {
        self.viewer.remove();
        tracing::debug!("image viewer removed");
    }
}
