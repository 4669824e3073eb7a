//! Rotate, flip and crop.
//!
//! # Transform Order
//!
//! 1. Compute the rotated bounding box of the source ([`rotate_size`])
//! 2. Draw the source onto a surface of that size through the matrix from
//!    [`TransformParameters::matrix`] ([`draw_transformed`])
//! 3. Extract the crop rectangle from that surface ([`extract_region`])
//!
//! # Coordinate System
//!
//! - Rotation angles are in degrees, positive = clockwise (y axis points down)
//! - Crop coordinates are pixels relative to the rotated bounding box
//! - Origin is top-left corner

mod affine;
mod aspect;
mod crop;
mod geometry;
mod surface;

pub use affine::Affine;
pub use aspect::{centered_crop, suggest_aspect, AspectRatio, MAX_ZOOM, MIN_ZOOM};
pub use crop::{extract_region, resolve_crop, CropPolicy, ExtractionError, PixelRect};
pub use geometry::{get_radian_angle, rotate_size, BoundingBox, CropRectangle, TransformParameters};
pub use surface::{draw_transformed, InterpolationFilter, Surface};
