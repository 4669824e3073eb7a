//! Pipeline configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::encode::{CompressOptions, EncodeSettings, OutputFormat, PngCompression, DEFAULT_QUALITY};
use crate::transform::{CropPolicy, InterpolationFilter};

/// Invalid configuration values.
#[derive(Debug, Error, PartialEq)]
pub enum OptionsError {
    #[error("quality must be between 0 and 1, got {0}")]
    QualityOutOfRange(f32),

    #[error("compression limit `{field}` must be greater than zero")]
    ZeroLimit { field: &'static str },
}

/// Options for [`produce_cropped_image`](crate::produce_cropped_image).
///
/// Deserializes from camelCase JSON with every field optional:
///
/// ```json
/// { "format": "jpeg", "quality": 0.8, "cropPolicy": "clamp" }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PipelineOptions {
    pub format: OutputFormat,
    /// 0 to 1, used by lossy encoders.
    pub quality: f32,
    pub png_compression: PngCompression,
    /// Sampling for rotations that aren't quarter turns.
    pub interpolation: InterpolationFilter,
    pub crop_policy: CropPolicy,
    /// Size cap applied after cropping. `None` keeps the exact crop size.
    pub compress: Option<CompressOptions>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::Png,
            quality: DEFAULT_QUALITY,
            png_compression: PngCompression::Default,
            interpolation: InterpolationFilter::Bilinear,
            crop_policy: CropPolicy::Reject,
            compress: None,
        }
    }
}

impl PipelineOptions {
    pub fn validate(&self) -> Result<(), OptionsError> {
        if !(0.0..=1.0).contains(&self.quality) {
            return Err(OptionsError::QualityOutOfRange(self.quality));
        }
        if let Some(compress) = &self.compress {
            if compress.max_size_bytes == 0 {
                return Err(OptionsError::ZeroLimit {
                    field: "maxSizeBytes",
                });
            }
            if compress.max_width_or_height == 0 {
                return Err(OptionsError::ZeroLimit {
                    field: "maxWidthOrHeight",
                });
            }
        }
        Ok(())
    }

    pub fn encode_settings(&self) -> EncodeSettings {
        EncodeSettings {
            format: self.format,
            quality: self.quality,
            png_compression: self.png_compression,
        }
    }
}
