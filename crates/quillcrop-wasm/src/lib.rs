//! QuillCrop WASM - WebAssembly bindings for QuillCrop
//!
//! This crate exposes the quillcrop-core pipeline to the browser.
//!
//! # Module Structure
//!
//! - `crop` - The crop pipeline (bytes or URL in, encoded image out) and
//!   upload compression
//! - `geometry` - Bounding box, aspect presets and upload validation for the
//!   crop UI
//! - `fetch` - `fetch()`-backed loader for URL sources
//! - `types` - WASM-compatible wrapper types
//! - `error` - Pipeline errors as named JS `Error`s
//! - `logging` - `tracing` output to the browser console
//!
//! # Usage
//!
//! ```typescript
//! import init, { get_cropped_image_from_url, set_log_level } from '@quillcrop/wasm';
//!
//! await init();
//! set_log_level('debug');
//!
//! const output = await get_cropped_image_from_url(imageUrl, croppedAreaPixels, { rotation });
//! const file = output.toFile(); // cropped-image.png
//! ```

use wasm_bindgen::prelude::*;

mod crop;
mod error;
mod fetch;
mod geometry;
mod logging;
mod types;

pub use crop::{compress_image, get_cropped_image, get_cropped_image_from_url};
pub use fetch::BrowserLoader;
pub use geometry::{aspect_value, centered_crop, rotate_size, suggest_aspect, validate_upload};
pub use logging::set_log_level;
pub use types::{JsBoundingBox, JsOutputImage};

/// Initialize the WASM module (called automatically on load).
///
/// Installs the panic hook and the console logger.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    logging::init();
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "quillcrop initialized");
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
