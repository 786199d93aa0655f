use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = mapillary)]
    #[derive(Debug, Clone)]
    pub type Viewer;

    #[wasm_bindgen(constructor, js_namespace = mapillary, catch)]
    pub fn new(options: &JsValue) -> Result<Viewer, JsValue>;

    /// Resolves with the image once shown; rejects on unknown ids, network
    /// failures, or when superseded by another move.
    #[wasm_bindgen(method, js_name = moveTo, catch)]
    pub fn move_to(this: &Viewer, image_id: &str) -> Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(method)]
    pub fn remove(this: &Viewer);
}
