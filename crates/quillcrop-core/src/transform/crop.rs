//! Extracting the crop rectangle from the transformed surface.
//!
//! A canvas silently returns transparent pixels for any part of a
//! `getImageData` rectangle outside the canvas. Here the caller chooses:
//!
//! - [`CropPolicy::Reject`] (default): any overhang is an error.
//! - [`CropPolicy::Clamp`]: the rectangle is intersected with the surface.
//!   If nothing is left, that is still an error.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{CropRectangle, Surface};

/// Errors raised while validating or extracting the crop region.
#[derive(Debug, Error, PartialEq)]
pub enum ExtractionError {
    /// The crop rectangle is not fully inside the surface (or, when
    /// clamping, does not overlap it at all).
    #[error(
        "Crop ({x}, {y}, {width}x{height}) is outside the {surface_width}x{surface_height} surface"
    )]
    OutOfBounds {
        x: i64,
        y: i64,
        width: i64,
        height: i64,
        surface_width: u32,
        surface_height: u32,
    },

    /// The crop rectangle has zero or negative size.
    #[error("Crop rectangle must have positive size, got {width}x{height}")]
    EmptyRegion { width: i64, height: i64 },

    /// A crop coordinate is NaN or infinite.
    #[error("Crop rectangle contains non-finite values")]
    NonFinite,

    /// The rotation/flip parameters cannot be applied.
    #[error("Invalid transform: {0}")]
    InvalidTransform(String),
}

/// What to do with a crop rectangle that overhangs the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CropPolicy {
    /// Fail with `ExtractionError::OutOfBounds`.
    #[default]
    Reject,
    /// Intersect with the surface bounds.
    Clamp,
}

/// A crop rectangle resolved to whole pixels inside the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Round `crop` to whole pixels and fit it to a `surface_width x surface_height`
/// surface according to `policy`.
pub fn resolve_crop(
    crop: &CropRectangle,
    surface_width: u32,
    surface_height: u32,
    policy: CropPolicy,
) -> Result<PixelRect, ExtractionError> {
    let values = [crop.x, crop.y, crop.width, crop.height];
    if values.iter().any(|v| !v.is_finite()) {
        return Err(ExtractionError::NonFinite);
    }

    let x = crop.x.round() as i64;
    let y = crop.y.round() as i64;
    let width = crop.width.round() as i64;
    let height = crop.height.round() as i64;

    if width <= 0 || height <= 0 {
        return Err(ExtractionError::EmptyRegion { width, height });
    }

    let out_of_bounds = || ExtractionError::OutOfBounds {
        x,
        y,
        width,
        height,
        surface_width,
        surface_height,
    };

    // Huge finite coordinates saturate on the cast; edges must saturate too.
    let (sw, sh) = (surface_width as i64, surface_height as i64);
    let (right, bottom) = (x.saturating_add(width), y.saturating_add(height));
    let (left, top, right, bottom) = match policy {
        CropPolicy::Reject => {
            if x < 0 || y < 0 || right > sw || bottom > sh {
                return Err(out_of_bounds());
            }
            (x, y, right, bottom)
        }
        CropPolicy::Clamp => (x.max(0), y.max(0), right.min(sw), bottom.min(sh)),
    };

    if right <= left || bottom <= top {
        return Err(out_of_bounds());
    }

    Ok(PixelRect {
        x: left as u32,
        y: top as u32,
        width: (right - left) as u32,
        height: (bottom - top) as u32,
    })
}

/// Extract `crop` from `surface` into a new surface of exactly the resolved
/// crop size, with the region placed at the origin.
pub fn extract_region(
    surface: &Surface,
    crop: &CropRectangle,
    policy: CropPolicy,
) -> Result<Surface, ExtractionError> {
    let rect = resolve_crop(crop, surface.width, surface.height, policy)?;
    if rect.x == 0 && rect.y == 0 && rect.width == surface.width && rect.height == surface.height {
        return Ok(surface.clone());
    }
    Ok(surface.copy_region(rect.x, rect.y, rect.width, rect.height))
}


// ============================================================================
// Property-Based Tests
// ============================================================================
