use thiserror::Error;

/// Everything that can stop a pane from coming up or an operation on a live
/// instance from going through. None of these reach the user; they end up in
/// the console.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaneError {
    #[error("{service} access token is missing")]
    MissingCredential { service: &'static str },

    #[error("pane container element is not mounted")]
    MissingContainer,

    #[error("{operation} failed: {message}")]
    Js {
        operation: &'static str,
        message: String,
    },

    #[error("could not encode {what}: {message}")]
    Encode { what: &'static str, message: String },

    #[error("sequence overlay can only be attached once the map style has loaded")]
    NotReady,

    #[error("map instance has already been released")]
    Released,
}

impl PaneError {
    pub fn js(operation: &'static str, value: &wasm_bindgen::JsValue) -> Self {
        PaneError::Js {
            operation,
            message: crate::util::describe_js_error(value),
        }
    }
}
