//! Aspect-ratio presets and the initial crop rectangle for the cropper.

use serde::{Deserialize, Serialize};

use super::{BoundingBox, CropRectangle};

/// Zoom range offered by the crop UI.
pub const MIN_ZOOM: f64 = 1.0;
pub const MAX_ZOOM: f64 = 5.0;

/// Aspect presets offered next to the cropper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectRatio {
    /// The image's own width / height.
    Original,
    /// 1:1
    Square,
    /// 4:3
    Standard,
    /// 16:9, the default for post cover images.
    #[default]
    Widescreen,
    /// 3:4
    Portrait,
    /// 9:16
    Story,
}

impl AspectRatio {
    /// Numeric width / height ratio. `original` is used for [`AspectRatio::Original`].
    pub fn value(self, original: f64) -> f64 {
        match self {
            AspectRatio::Original => original,
            AspectRatio::Square => 1.0,
            AspectRatio::Standard => 4.0 / 3.0,
            AspectRatio::Widescreen => 16.0 / 9.0,
            AspectRatio::Portrait => 3.0 / 4.0,
            AspectRatio::Story => 9.0 / 16.0,
        }
    }
}

/// Pick a starting aspect from the image's natural shape.
///
/// Clearly landscape images (ratio above 1.5) get 16:9, clearly portrait ones
/// (below 0.8) get 9:16, everything in between starts square.
pub fn suggest_aspect(width: u32, height: u32) -> AspectRatio {
    if height == 0 {
        return AspectRatio::Widescreen;
    }
    let ratio = width as f64 / height as f64;
    if ratio > 1.5 {
        AspectRatio::Widescreen
    } else if ratio < 0.8 {
        AspectRatio::Story
    } else {
        AspectRatio::Square
    }
}

/// Largest rectangle of `aspect` centred in `bounds`, shrunk by `zoom`.
///
/// `zoom` is clamped to `MIN_ZOOM..=MAX_ZOOM`. A non-positive or non-finite
/// aspect falls back to the bounds' own ratio. The result is in whole pixels
/// and always fits the surface allocated for `bounds`.
pub fn centered_crop(bounds: BoundingBox, aspect: f64, zoom: f64) -> CropRectangle {
    let (sw, sh) = bounds.surface_size();
    let (sw, sh) = (sw.max(1) as f64, sh.max(1) as f64);

    let aspect = if aspect.is_finite() && aspect > 0.0 {
        aspect
    } else {
        sw / sh
    };
    let zoom = if zoom.is_finite() {
        zoom.clamp(MIN_ZOOM, MAX_ZOOM)
    } else {
        MIN_ZOOM
    };

    let (fit_w, fit_h) = if sw / sh > aspect {
        (sh * aspect, sh)
    } else {
        (sw, sw / aspect)
    };

    let width = (fit_w / zoom).round().clamp(1.0, sw);
    let height = (fit_h / zoom).round().clamp(1.0, sh);
    let x = ((sw - width) / 2.0).floor();
    let y = ((sh - height) / 2.0).floor();

    CropRectangle::new(x, y, width, height)
}
