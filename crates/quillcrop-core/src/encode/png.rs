//! PNG encoding for cropped output.

use image::codecs::png::{FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder};

use super::types::validate_rgba;
use super::{EncodeError, PngCompression};

/// Encode RGBA pixel data to PNG bytes.
///
/// # Errors
///
/// Returns an error if the dimensions are zero, the buffer length doesn't
/// match `width * height * 4`, or the encoder fails or writes nothing.
pub fn encode_png(
    pixels: &[u8],
    width: u32,
    height: u32,
    compression: PngCompression,
) -> Result<Vec<u8>, EncodeError> {
    validate_rgba(pixels, width, height)?;

    let mut buffer = Vec::new();
    let encoder = PngEncoder::new_with_quality(
        &mut buffer,
        compression.to_image_compression(),
        FilterType::Adaptive,
    );
    encoder
        .write_image(pixels, width, height, ExtendedColorType::Rgba8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    if buffer.is_empty() {
        return Err(EncodeError::EmptyOutput);
    }
    Ok(buffer)
}
