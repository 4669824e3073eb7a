//! Crop pipeline bindings.
//!
//! # Example
//!
//! ```typescript
//! import { get_cropped_image } from '@quillcrop/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const output = get_cropped_image(
//!   bytes,
//!   croppedAreaPixels,                 // { x, y, width, height }
//!   { rotation: 90, flipHorizontal: false },
//!   { format: 'png' },
//! );
//! formData.append('image', output.toFile());
//! ```
//!
//! Errors are thrown as `Error` objects whose `name` is the failing stage.

use quillcrop_core::decode::ImageSource;
use quillcrop_core::{
    CompressOptions, CropError, CropRectangle, PipelineOptions, TransformParameters,
};
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;

use crate::error::{argument_error, crop_error};
use crate::fetch::BrowserLoader;
use crate::types::JsOutputImage;

/// Deserialize an optional JS argument, using the default for
/// `undefined`/`null`.
fn optional_arg<T>(value: JsValue, what: &str) -> Result<T, JsValue>
where
    T: DeserializeOwned + Default,
{
    if value.is_undefined() || value.is_null() {
        return Ok(T::default());
    }
    serde_wasm_bindgen::from_value(value).map_err(|e| argument_error(what, e))
}

fn crop_arg(value: JsValue) -> Result<CropRectangle, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(|e| argument_error("crop rectangle", e))
}

fn crop_bytes(
    bytes: &[u8],
    crop: &CropRectangle,
    transform: &TransformParameters,
    options: &PipelineOptions,
) -> Result<JsOutputImage, CropError> {
    quillcrop_core::produce_cropped_image_from_bytes(bytes, crop, transform, options)
        .map(JsOutputImage::from_output)
}

fn compress_bytes(bytes: &[u8], options: &PipelineOptions) -> Result<JsOutputImage, CropError> {
    options.validate()?;
    let limits = options.compress.unwrap_or_else(CompressOptions::upload);
    quillcrop_core::compress_image(bytes, &options.encode_settings(), &limits)
        .map(JsOutputImage::from_output)
}

/// Crop an image held in memory.
///
/// # Arguments
///
/// * `bytes` - Encoded source image (PNG, JPEG, GIF or WebP)
/// * `crop` - `{ x, y, width, height }` relative to the rotated image
/// * `transform` - `{ rotation, flipHorizontal, flipVertical }`, optional
/// * `options` - `PipelineOptions`, optional
#[wasm_bindgen]
pub fn get_cropped_image(
    bytes: &[u8],
    crop: JsValue,
    transform: JsValue,
    options: JsValue,
) -> Result<JsOutputImage, JsValue> {
    let crop = crop_arg(crop)?;
    let transform: TransformParameters = optional_arg(transform, "transform")?;
    let options: PipelineOptions = optional_arg(options, "options")?;
    crop_bytes(bytes, &crop, &transform, &options).map_err(crop_error)
}

/// Fetch an image (CORS, same-origin credentials) and crop it.
///
/// Used when re-cropping an image that is already hosted.
#[wasm_bindgen]
pub async fn get_cropped_image_from_url(
    url: String,
    crop: JsValue,
    transform: JsValue,
    options: JsValue,
) -> Result<JsOutputImage, JsValue> {
    let crop = crop_arg(crop)?;
    let transform: TransformParameters = optional_arg(transform, "transform")?;
    let options: PipelineOptions = optional_arg(options, "options")?;

    quillcrop_core::produce_cropped_image_from(
        ImageSource::Url(url),
        &BrowserLoader,
        &crop,
        &transform,
        &options,
    )
    .await
    .map(JsOutputImage::from_output)
    .map_err(crop_error)
}

/// Re-encode an image under a size cap before upload.
///
/// `options.compress` sets the limits; without it the upload preset
/// (1 MiB, 1920px) applies.
#[wasm_bindgen]
pub fn compress_image(bytes: &[u8], options: JsValue) -> Result<JsOutputImage, JsValue> {
    let options: PipelineOptions = optional_arg(options, "options")?;
    compress_bytes(bytes, &options).map_err(crop_error)
}
