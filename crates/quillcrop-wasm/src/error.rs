//! Conversion of pipeline errors into JavaScript `Error` objects.
//!
//! The `name` of the thrown error is the failing stage (`DecodeError`,
//! `ExtractionError`, `EncodeError`, `OptionsError`) so callers can branch on
//! `err.name` without parsing messages.

use quillcrop_core::CropError;
use wasm_bindgen::JsValue;

/// Name used when a JS argument has the wrong shape.
pub(crate) const ARGUMENT_ERROR: &str = "TypeError";

pub(crate) fn js_error(name: &str, message: &str) -> JsValue {
    let error = js_sys::Error::new(message);
    error.set_name(name);
    error.into()
}

pub(crate) fn crop_error(err: CropError) -> JsValue {
    tracing::debug!(kind = err.kind(), error = %err, "crop failed");
    js_error(err.kind(), &err.to_string())
}

/// Error for a JS value that couldn't be deserialized as `what`.
pub(crate) fn argument_error(what: &str, err: serde_wasm_bindgen::Error) -> JsValue {
    js_error(ARGUMENT_ERROR, &format!("invalid {what}: {err}"))
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use quillcrop_core::{DecodeError, ExtractionError};
    use wasm_bindgen::JsCast;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_error_name_is_stage() {
        let value = crop_error(CropError::Decode(DecodeError::InvalidFormat));
        let error: js_sys::Error = value.dyn_into().unwrap();
        assert_eq!(String::from(error.name()), "DecodeError");

        let value = crop_error(CropError::Extraction(ExtractionError::NonFinite));
        let error: js_sys::Error = value.dyn_into().unwrap();
        assert_eq!(String::from(error.name()), "ExtractionError");
    }
}
