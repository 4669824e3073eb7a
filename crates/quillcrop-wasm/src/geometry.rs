//! Helpers the crop UI calls before running the pipeline.

use quillcrop_core::transform::{self, AspectRatio};
use quillcrop_core::validate_upload as core_validate_upload;
use wasm_bindgen::prelude::*;

use crate::error::js_error;
use crate::types::JsBoundingBox;

/// Bounding box of a `width x height` image rotated by `rotation` degrees.
///
/// Crop rectangles are expressed relative to this box.
#[wasm_bindgen]
pub fn rotate_size(width: f64, height: f64, rotation: f64) -> JsBoundingBox {
    transform::rotate_size(width, height, rotation).into()
}

/// Starting aspect preset for an image: `"widescreen"`, `"story"` or
/// `"square"`.
#[wasm_bindgen]
pub fn suggest_aspect(width: u32, height: u32) -> String {
    aspect_name(transform::suggest_aspect(width, height)).to_string()
}

/// Width / height ratio of a preset name. `original` is returned for
/// `"original"` and for unknown names.
#[wasm_bindgen]
pub fn aspect_value(name: &str, original: f64) -> f64 {
    parse_aspect(name).map_or(original, |aspect| aspect.value(original))
}

/// Initial crop rectangle `{ x, y, width, height }`: the largest `aspect`
/// rectangle centred in `bounds`, shrunk by `zoom` (1 to 5).
#[wasm_bindgen]
pub fn centered_crop(bounds: &JsBoundingBox, aspect: f64, zoom: f64) -> Result<JsValue, JsValue> {
    let crop = transform::centered_crop((*bounds).into(), aspect, zoom);
    serde_wasm_bindgen::to_value(&crop).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Check an upload's size and type before decoding it.
///
/// Returns the sniffed MIME type, or throws a `DecodeError`.
#[wasm_bindgen]
pub fn validate_upload(bytes: &[u8], declared_mime: Option<String>) -> Result<String, JsValue> {
    core_validate_upload(bytes, declared_mime.as_deref())
        .map(|format| format.to_mime_type().to_string())
        .map_err(|e| js_error("DecodeError", &e.to_string()))
}

fn aspect_name(aspect: AspectRatio) -> &'static str {
    match aspect {
        AspectRatio::Original => "original",
        AspectRatio::Square => "square",
        AspectRatio::Standard => "standard",
        AspectRatio::Widescreen => "widescreen",
        AspectRatio::Portrait => "portrait",
        AspectRatio::Story => "story",
    }
}

fn parse_aspect(name: &str) -> Option<AspectRatio> {
    match name {
        "original" => Some(AspectRatio::Original),
        "square" | "1:1" => Some(AspectRatio::Square),
        "standard" | "4:3" => Some(AspectRatio::Standard),
        "widescreen" | "16:9" => Some(AspectRatio::Widescreen),
        "portrait" | "3:4" => Some(AspectRatio::Portrait),
        "story" | "9:16" => Some(AspectRatio::Story),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotate_size_binding() {
        let bounds = rotate_size(800.0, 600.0, 90.0);
        assert!((bounds.width() - 600.0).abs() < 1e-9);
        assert!((bounds.height() - 800.0).abs() < 1e-9);
    }

    #[test]
    fn test_suggest_aspect_names() {
        assert_eq!(suggest_aspect(1920, 1080), "widescreen");
        assert_eq!(suggest_aspect(1080, 1920), "story");
        assert_eq!(suggest_aspect(1000, 1000), "square");
    }

    #[test]
    fn test_aspect_value() {
        assert_eq!(aspect_value("16:9", 1.0), 16.0 / 9.0);
        assert_eq!(aspect_value("square", 2.0), 1.0);
        assert_eq!(aspect_value("original", 1.25), 1.25);
        assert_eq!(aspect_value("cinemascope", 1.25), 1.25);
    }

    #[test]
    fn test_aspect_names_round_trip() {
        for aspect in [
            AspectRatio::Original,
            AspectRatio::Square,
            AspectRatio::Standard,
            AspectRatio::Widescreen,
            AspectRatio::Portrait,
            AspectRatio::Story,
        ] {
            assert_eq!(parse_aspect(aspect_name(aspect)), Some(aspect));
        }
    }
}
