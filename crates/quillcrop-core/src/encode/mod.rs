//! Encoding of the cropped surface.
//!
//! This module provides:
//! - Lossless PNG encoding (the default output)
//! - JPEG encoding with a 0 to 1 quality setting
//! - Size-capped compression for uploads
//!
//! # Examples
//!
//! ```ignore
//! use quillcrop_core::encode::{encode_surface, EncodeSettings};
//!
//! let bytes = encode_surface(&surface, &EncodeSettings::default())?;
//! ```

mod compress;
mod jpeg;
mod png;
mod types;

pub use compress::{compress_surface, fit_within, CompressOptions, CompressedImage};
pub use jpeg::encode_jpeg;
pub use png::encode_png;
pub use types::{EncodeError, EncodeSettings, OutputFormat, PngCompression, DEFAULT_QUALITY};

use crate::transform::Surface;

/// Encode a surface in the format and quality from `settings`.
pub fn encode_surface(
    surface: &Surface,
    settings: &EncodeSettings,
) -> Result<Vec<u8>, EncodeError> {
    match settings.format {
        OutputFormat::Png => encode_png(
            &surface.pixels,
            surface.width,
            surface.height,
            settings.png_compression,
        ),
        OutputFormat::Jpeg => encode_jpeg(
            &surface.pixels,
            surface.width,
            surface.height,
            settings.jpeg_quality(),
        ),
    }
}
