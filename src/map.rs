// Live map instance owned by the map pane
use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::HtmlElement;

use crate::config::AppConfig;
use crate::coordinator::FeatureQuery;
use crate::error::PaneError;
use crate::ffi::mapbox::{Map, NavigationControl};
use crate::model::{LineLayerSpec, LngLat, RenderedFeature, ScreenPoint, VectorSourceSpec};
use crate::state::{LayerTarget, MapLifecycle};
use crate::util::{from_js, get_prop, to_js};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MapOptions<'a> {
    access_token: &'a str,
    style: &'a str,
    center: LngLat,
    zoom: f64,
}

#[derive(Serialize)]
struct QueryOptions<'a> {
    layers: [&'a str; 1],
}

pub struct MapHandle {
    map: Map,
    lifecycle: Rc<RefCell<MapLifecycle>>,
    on_load: Closure<dyn FnMut(JsValue)>,
}

impl MapHandle {
    pub fn create(container: &HtmlElement, config: &AppConfig) -> Result<Self, PaneError> {
        let token = config.map_credential()?;
        let options = to_js(
            &MapOptions {
                access_token: token,
                style: &config.view.style,
                center: config.view.center,
                zoom: config.view.zoom,
            },
            "map options",
        )?;
        js_sys::Reflect::set(&options, &JsValue::from_str("container"), container)
            .map_err(|e| PaneError::js("set map container", &e))?;

        let map = Map::new(&options).map_err(|e| PaneError::js("create map", &e))?;
        map.add_control(&NavigationControl::new());

        let lifecycle = Rc::new(RefCell::new(MapLifecycle::default()));
        let overlay = config.sequence_overlay();
        let on_load = {
            let map = map.clone();
            let lifecycle = lifecycle.clone();
            Closure::wrap(Box::new(move |_e: JsValue| {
                let mut lc = lifecycle.borrow_mut();
                if let Err(err) = lc.style_loaded() {
                    tracing::debug!("ignoring style load: {}", err);
                    return;
                }
                match &overlay {
                    Some(overlay) => match lc.attach_overlay(&map, overlay) {
                        Ok(()) => tracing::debug!("sequence overlay attached"),
                        Err(err) => tracing::error!("could not attach sequence overlay: {}", err),
                    },
                    None => tracing::warn!("Mapillary token missing; sequence overlay disabled"),
                }
            }) as Box<dyn FnMut(JsValue)>)
        };
        map.on("load", on_load.as_ref().unchecked_ref());

        tracing::debug!(
            "map created at {:.5},{:.5} z{}",
            config.view.center.lng,
            config.view.center.lat,
            config.view.zoom
        );
        Ok(Self {
            map,
            lifecycle,
            on_load,
        })
    }

    /// Calls `handler` with the screen point of every map click until the
    /// returned subscription is dropped.
    pub fn subscribe_click(&self, mut handler: impl FnMut(ScreenPoint) + 'static) -> ClickSubscription {
        let closure = Closure::wrap(Box::new(move |event: JsValue| match click_point(&event) {
            Some(point) => handler(point),
            None => tracing::debug!("map click without a screen point"),
        }) as Box<dyn FnMut(JsValue)>);
        self.map.on("click", closure.as_ref().unchecked_ref());
        ClickSubscription {
            map: self.map.clone(),
            closure,
        }
    }
}

impl Drop for MapHandle {
    fn drop(&mut self) {
        let mut lc = self.lifecycle.borrow_mut();
        tracing::debug!(
            "removing map (phase {:?}, overlay attached: {})",
            lc.phase(),
            lc.overlay_attached()
        );
        lc.release();
        self.map.off("load", self.on_load.as_ref().unchecked_ref());
        self.map.remove();
    }
}

impl FeatureQuery for MapHandle {
    fn query_features_at(
        &self,
        point: ScreenPoint,
        layer_id: &str,
    ) -> Result<Vec<RenderedFeature>, PaneError> {
        // Querying a layer the style doesn't have yet only raises a map error event.
        if !self.map.has_layer(layer_id) {
            return Ok(Vec::new());
        }
        let options = to_js(&QueryOptions { layers: [layer_id] }, "feature query options")?;
        let js_point = js_sys::Array::of2(&JsValue::from_f64(point.x), &JsValue::from_f64(point.y));
        let found = self
            .map
            .query_rendered_features(&js_point, &options)
            .map_err(|e| PaneError::js("query rendered features", &e))?;

        let mut features = Vec::with_capacity(found.length() as usize);
        for feature in found.iter() {
            let properties = match get_prop(&feature, "properties") {
                Some(props) => from_js::<Value>(&props, "feature properties")?,
                None => None,
            };
            features.push(RenderedFeature::from_properties(properties));
        }
        Ok(features)
    }
}

impl LayerTarget for Map {
    fn has_source(&self, id: &str) -> bool {
        !self.get_source(id).is_undefined()
    }

    fn has_layer(&self, id: &str) -> bool {
        !self.get_layer(id).is_undefined()
    }

    fn add_vector_source(&self, id: &str, spec: &VectorSourceSpec) -> Result<(), PaneError> {
        let source = to_js(spec, "vector source")?;
        self.add_source(id, &source)
            .map_err(|e| PaneError::js("add vector source", &e))
    }

    fn add_line_layer(&self, spec: &LineLayerSpec, before: Option<&str>) -> Result<(), PaneError> {
        let layer = to_js(spec, "line layer")?;
        let before = before.map(JsValue::from_str).unwrap_or(JsValue::UNDEFINED);
        self.add_layer(&layer, &before)
            .map_err(|e| PaneError::js("add line layer", &e))
    }
}

/// Keeps a click listener registered on the map. Dropping it unbinds the listener.
pub struct ClickSubscription {
    map: Map,
    closure: Closure<dyn FnMut(JsValue)>,
}

impl Drop for ClickSubscription {
    fn drop(&mut self) {
        self.map.off("click", self.closure.as_ref().unchecked_ref());
    }
}

fn click_point(event: &JsValue) -> Option<ScreenPoint> {
    let point = get_prop(event, "point")?;
    from_js(&point, "click point").ok().flatten()
}
