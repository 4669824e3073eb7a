//! Size-capped encoding for uploads.
//!
//! The image host rejects large files, so uploads are first scaled to fit a
//! maximum edge length and then re-encoded in shrinking steps until they fit
//! the byte budget or the iteration limit runs out:
//!
//! - PNG is lossless, so each step scales both dimensions by 0.95.
//! - JPEG lowers quality by a factor of 0.95 per step.

use image::imageops::{self, FilterType};
use serde::{Deserialize, Serialize};

use super::{encode_surface, EncodeError, EncodeSettings, OutputFormat};
use crate::transform::Surface;

/// Factor applied per iteration to dimensions (PNG) or quality (JPEG).
const STEP_FACTOR: f64 = 0.95;

/// Limits for upload compression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompressOptions {
    /// Byte budget for the encoded output.
    pub max_size_bytes: usize,
    /// Longest edge allowed, in pixels.
    pub max_width_or_height: u32,
    /// Re-encode attempts after the first encode.
    pub max_iterations: u32,
}

impl Default for CompressOptions {
    fn default() -> Self {
        Self::upload()
    }
}

impl CompressOptions {
    /// Limits used before sending an image to the image host: 1 MiB, 1920px.
    pub fn upload() -> Self {
        Self {
            max_size_bytes: 1024 * 1024,
            max_width_or_height: 1920,
            max_iterations: 10,
        }
    }

    /// Tighter limits for inline post images: 0.5 MiB, 1920px.
    pub fn compact() -> Self {
        Self {
            max_size_bytes: 512 * 1024,
            max_width_or_height: 1920,
            max_iterations: 15,
        }
    }
}

/// Result of [`compress_surface`].
#[derive(Debug, Clone, PartialEq)]
pub struct CompressedImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Quality used for the final attempt (0 to 1).
    pub quality: f32,
    /// Re-encode steps taken after the first encode.
    pub iterations: u32,
    /// Whether `bytes` fits `max_size_bytes`.
    pub within_limit: bool,
}

/// Dimensions scaled to fit `max_edge` on the longest side, aspect preserved.
pub fn fit_within(width: u32, height: u32, max_edge: u32) -> (u32, u32) {
    let longest = width.max(height);
    if longest <= max_edge || longest == 0 {
        return (width, height);
    }
    let scale = max_edge as f64 / longest as f64;
    (
        ((width as f64 * scale).round() as u32).max(1),
        ((height as f64 * scale).round() as u32).max(1),
    )
}

fn resized(base: &image::RgbaImage, width: u32, height: u32) -> Surface {
    if base.dimensions() == (width, height) {
        return Surface::from_rgba_image(base.clone());
    }
    Surface::from_rgba_image(imageops::resize(base, width, height, FilterType::Lanczos3))
}

/// Encode `surface` under the limits in `options`.
///
/// Never fails because the budget can't be met: the last attempt is returned
/// with `within_limit = false`.
pub fn compress_surface(
    surface: &Surface,
    settings: &EncodeSettings,
    options: &CompressOptions,
) -> Result<CompressedImage, EncodeError> {
    let base = surface
        .to_rgba_image()
        .ok_or(EncodeError::InvalidPixelData {
            expected: surface.width as usize * surface.height as usize * 4,
            actual: surface.pixels.len(),
        })?;

    let (fit_w, fit_h) = fit_within(surface.width, surface.height, options.max_width_or_height);
    let base = if (fit_w, fit_h) != (surface.width, surface.height) {
        imageops::resize(&base, fit_w, fit_h, FilterType::Lanczos3)
    } else {
        base
    };

    let mut attempt = *settings;
    let (mut width, mut height) = (fit_w, fit_h);
    let mut bytes = encode_surface(&resized(&base, width, height), &attempt)?;
    let mut iterations = 0;

    while bytes.len() > options.max_size_bytes && iterations < options.max_iterations {
        iterations += 1;
        match attempt.format {
            OutputFormat::Png => {
                width = ((width as f64 * STEP_FACTOR).floor() as u32).max(1);
                height = ((height as f64 * STEP_FACTOR).floor() as u32).max(1);
            }
            OutputFormat::Jpeg => {
                attempt.quality = (attempt.quality as f64 * STEP_FACTOR) as f32;
            }
        }
        bytes = encode_surface(&resized(&base, width, height), &attempt)?;
        tracing::debug!(
            iteration = iterations,
            width,
            height,
            quality = attempt.quality,
            size = bytes.len(),
            "compression step"
        );
    }

    let within_limit = bytes.len() <= options.max_size_bytes;
    if !within_limit {
        tracing::warn!(
            size = bytes.len(),
            limit = options.max_size_bytes,
            iterations,
            "could not compress image under size limit"
        );
    }

    Ok(CompressedImage {
        bytes,
        width,
        height,
        quality: attempt.quality,
        iterations,
        within_limit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Noisy surface that compresses poorly.
    fn noisy_surface(width: u32, height: u32) -> Surface {
        let mut state = 0x2545_f491u32;
        let pixels = (0..width as usize * height as usize * 4)
            .map(|i| {
                if i % 4 == 3 {
                    return 255;
                }
                // xorshift
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                (state & 0xFF) as u8
            })
            .collect();
        Surface::from_pixels(width, height, pixels)
    }

    #[test]
    fn test_presets() {
        assert_eq!(CompressOptions::default(), CompressOptions::upload());
        assert_eq!(CompressOptions::upload().max_size_bytes, 1_048_576);
        assert_eq!(CompressOptions::compact().max_size_bytes, 524_288);
        assert_eq!(CompressOptions::compact().max_iterations, 15);
    }

    #[test]
    fn test_fit_within() {
        assert_eq!(fit_within(3840, 2160, 1920), (1920, 1080));
        assert_eq!(fit_within(1000, 4000, 1920), (480, 1920));
        assert_eq!(fit_within(800, 600, 1920), (800, 600));
        assert_eq!(fit_within(5000, 1, 1920), (1920, 1));
    }

    #[test]
    fn test_small_image_untouched() {
        let surface = Surface::from_pixels(8, 8, vec![200u8; 8 * 8 * 4]);
        let result =
            compress_surface(&surface, &EncodeSettings::default(), &CompressOptions::upload())
                .unwrap();

        assert_eq!((result.width, result.height), (8, 8));
        assert_eq!(result.iterations, 0);
        assert!(result.within_limit);
    }

    #[test]
    fn test_oversized_edge_is_scaled() {
        let surface = Surface::from_pixels(400, 100, vec![90u8; 400 * 100 * 4]);
        let options = CompressOptions {
            max_width_or_height: 200,
            ..CompressOptions::upload()
        };
        let result = compress_surface(&surface, &EncodeSettings::default(), &options).unwrap();
        assert_eq!((result.width, result.height), (200, 50));
    }

    #[test]
    fn test_png_shrinks_dimensions_until_it_fits() {
        let surface = noisy_surface(64, 64);
        let options = CompressOptions {
            max_size_bytes: 6_000,
            max_width_or_height: 1920,
            max_iterations: 40,
        };
        let result = compress_surface(&surface, &EncodeSettings::default(), &options).unwrap();

        assert!(result.iterations > 0);
        assert!(result.width < 64 && result.height < 64);
        assert!(result.within_limit, "{} bytes", result.bytes.len());
        assert!(result.bytes.len() <= 6_000);
    }

    #[test]
    fn test_jpeg_lowers_quality_keeps_dimensions() {
        let surface = noisy_surface(64, 64);
        let settings = EncodeSettings {
            format: OutputFormat::Jpeg,
            ..EncodeSettings::default()
        };
        let options = CompressOptions {
            max_size_bytes: 1,
            max_width_or_height: 1920,
            max_iterations: 3,
        };
        let result = compress_surface(&surface, &settings, &options).unwrap();

        assert_eq!((result.width, result.height), (64, 64));
        assert_eq!(result.iterations, 3);
        assert!(result.quality < settings.quality);
        assert!(!result.within_limit);
    }

    #[test]
    fn test_zero_iterations_returns_first_attempt() {
        let surface = noisy_surface(32, 32);
        let options = CompressOptions {
            max_size_bytes: 1,
            max_width_or_height: 1920,
            max_iterations: 0,
        };
        let result = compress_surface(&surface, &EncodeSettings::default(), &options).unwrap();
        assert_eq!(result.iterations, 0);
        assert_eq!((result.width, result.height), (32, 32));
        assert!(!result.within_limit);
    }
}
