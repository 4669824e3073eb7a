//! WASM-compatible wrapper types.

use js_sys::{Array, Uint8Array};
use quillcrop_core::{BoundingBox, OutputImage};
use wasm_bindgen::prelude::*;

/// An encoded crop result.
///
/// `bytes()` copies the encoded data into JS memory. `toFile()` wraps it in a
/// `File` named `cropped-image.png` (or `.jpg`) ready for a `FormData` upload.
#[wasm_bindgen]
pub struct JsOutputImage {
    inner: OutputImage,
}

#[wasm_bindgen]
impl JsOutputImage {
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Size of the encoded data in bytes.
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.len()
    }

    #[wasm_bindgen(getter)]
    pub fn file_name(&self) -> String {
        self.inner.file_name()
    }

    #[wasm_bindgen(getter)]
    pub fn mime_type(&self) -> String {
        self.inner.mime_type().to_string()
    }

    /// Encoded bytes as a `Uint8Array` (copied).
    pub fn bytes(&self) -> Vec<u8> {
        self.inner.bytes.clone()
    }

    /// Wrap the encoded bytes in a `File`.
    #[wasm_bindgen(js_name = toFile)]
    pub fn to_file(&self) -> Result<web_sys::File, JsValue> {
        let parts = Array::of1(&Uint8Array::from(self.inner.bytes.as_slice()));
        let options = web_sys::FilePropertyBag::new();
        options.set_type(self.inner.mime_type());
        web_sys::File::new_with_u8_array_sequence_and_options(
            &parts,
            &self.inner.file_name(),
            &options,
        )
    }
}

impl JsOutputImage {
    pub(crate) fn from_output(inner: OutputImage) -> Self {
        Self { inner }
    }

    #[allow(dead_code)] // Used by native tests
    pub(crate) fn output(&self) -> &OutputImage {
        &self.inner
    }
}

/// Size of a rotated image's bounding box.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy)]
pub struct JsBoundingBox {
    width: f64,
    height: f64,
}

#[wasm_bindgen]
impl JsBoundingBox {
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> f64 {
        self.height
    }
}

impl From<BoundingBox> for JsBoundingBox {
    fn from(bounds: BoundingBox) -> Self {
        Self {
            width: bounds.width,
            height: bounds.height,
        }
    }
}

impl From<JsBoundingBox> for BoundingBox {
    fn from(bounds: JsBoundingBox) -> Self {
        BoundingBox {
            width: bounds.width,
            height: bounds.height,
        }
    }
}
