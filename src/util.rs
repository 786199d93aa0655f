// JS interop helpers shared by the map and viewer handles

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_wasm_bindgen::Serializer;
use wasm_bindgen::{JsCast, JsValue};

use crate::error::PaneError;

/// Turns a thrown value or rejection reason into something readable.
pub fn describe_js_error(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    if let Some(s) = value.as_string() {
        return s;
    }
    format!("{:?}", value)
}

/// Builds a plain JS object from a serde value (options bags, style specs).
/// Maps become plain objects, not `Map`s, which is what the renderer expects.
pub fn to_js<T: Serialize>(value: &T, what: &'static str) -> Result<JsValue, PaneError> {
    value
        .serialize(&Serializer::json_compatible())
        .map_err(|e| PaneError::Encode {
            what,
            message: e.to_string(),
        })
}

/// Reads a plain JS value. `null`/`undefined` come back as `None`.
pub fn from_js<T: DeserializeOwned>(value: &JsValue, what: &'static str) -> Result<Option<T>, PaneError> {
    if value.is_null() || value.is_undefined() {
        return Ok(None);
    }
    serde_wasm_bindgen::from_value(value.clone())
        .map(Some)
        .map_err(|e| PaneError::Encode {
            what,
            message: e.to_string(),
        })
}

pub fn get_prop(target: &JsValue, key: &str) -> Option<JsValue> {
    js_sys::Reflect::get(target, &JsValue::from_str(key))
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null())
}
