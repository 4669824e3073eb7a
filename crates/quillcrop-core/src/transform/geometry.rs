//! Crop and transform parameter types, and rotated bounding-box math.

use serde::{Deserialize, Serialize};

use super::Affine;

/// Region of the rotated image to keep, in pixels.
///
/// Coordinates are relative to the bounding box of the *rotated* image, which
/// is what an interactive cropper reports (`croppedAreaPixels`).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CropRectangle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropRectangle {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Rotation and flip applied before cropping.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransformParameters {
    /// Clockwise rotation in degrees, usually 0 to 360.
    #[serde(alias = "rotation")]
    pub rotation_degrees: f64,
    /// Mirror along the vertical axis.
    pub flip_horizontal: bool,
    /// Mirror along the horizontal axis.
    pub flip_vertical: bool,
}

impl TransformParameters {
    pub fn rotation(rotation_degrees: f64) -> Self {
        Self {
            rotation_degrees,
            ..Self::default()
        }
    }

    pub fn with_flip(mut self, horizontal: bool, vertical: bool) -> Self {
        self.flip_horizontal = horizontal;
        self.flip_vertical = vertical;
        self
    }

    /// Build the matrix that maps source pixel space onto the bounding-box
    /// surface.
    ///
    /// Equivalent to the canvas sequence
    /// `translate(bw/2, bh/2); rotate(r); scale(±1, ±1); translate(-W/2, -H/2)`,
    /// which pivots rotation and flips on the image's own centre.
    pub fn matrix(&self, source_width: u32, source_height: u32) -> Affine {
        let bounds = rotate_size(
            source_width as f64,
            source_height as f64,
            self.rotation_degrees,
        );
        let sx = if self.flip_horizontal { -1.0 } else { 1.0 };
        let sy = if self.flip_vertical { -1.0 } else { 1.0 };

        Affine::IDENTITY
            .translate(bounds.width / 2.0, bounds.height / 2.0)
            .rotate(get_radian_angle(self.rotation_degrees))
            .scale(sx, sy)
            .translate(-(source_width as f64) / 2.0, -(source_height as f64) / 2.0)
    }
}

/// Axis-aligned bounding box of a rotated rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    /// Whole-pixel size of a drawing surface allocated for this box.
    ///
    /// Fractional sizes truncate, as when assigning them to a canvas. Values
    /// within floating noise of an integer snap to it, so a 90° turn of
    /// 800x600 yields exactly 600x800 rather than 599x800.
    pub fn surface_size(&self) -> (u32, u32) {
        (snap_dimension(self.width), snap_dimension(self.height))
    }
}

fn snap_dimension(value: f64) -> u32 {
    let rounded = value.round();
    let snapped = if (value - rounded).abs() < 1e-6 {
        rounded
    } else {
        value.floor()
    };
    snapped.clamp(0.0, u32::MAX as f64) as u32
}

/// Convert degrees to radians.
#[inline]
pub fn get_radian_angle(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

/// Size of the bounding box of a `width x height` rectangle rotated by
/// `rotation_degrees`.
///
/// ```text
/// bw = |cos r * W| + |sin r * H|
/// bh = |sin r * W| + |cos r * H|
/// ```
pub fn rotate_size(width: f64, height: f64, rotation_degrees: f64) -> BoundingBox {
    let r = get_radian_angle(rotation_degrees);
    BoundingBox {
        width: (r.cos() * width).abs() + (r.sin() * height).abs(),
        height: (r.sin() * width).abs() + (r.cos() * height).abs(),
    }
}
