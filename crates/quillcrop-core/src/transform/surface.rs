//! RGBA drawing surface and transformed image drawing.
//!
//! [`draw_transformed`] is the value-level replacement for a canvas
//! `drawImage` call made under a context transform. It uses inverse mapping:
//! for each surface pixel centre, the inverse matrix gives the source point
//! that lands there, which is then sampled.
//!
//! Quarter turns and flips with whole-pixel offsets are detected and mapped
//! exactly (nearest neighbour on a snapped matrix), so they never blur.

use serde::{Deserialize, Serialize};

use super::Affine;
use crate::decode::{SourceImage, CHANNELS};

/// Interpolation filter for non-pixel-aligned transforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpolationFilter {
    /// Nearest neighbour: no smoothing.
    Nearest,
    /// Bilinear interpolation, the canvas default smoothing.
    #[default]
    Bilinear,
    /// Lanczos3 interpolation: sharper, slower.
    Lanczos3,
}

/// An RGBA raster that starts fully transparent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    pub width: u32,
    pub height: u32,
    /// RGBA pixel data in row-major order (4 bytes per pixel).
    pub pixels: Vec<u8>,
}

impl Surface {
    /// Allocate a transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0u8; width as usize * height as usize * CHANNELS],
        }
    }

    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(pixels.len(), width as usize * height as usize * CHANNELS);
        Self {
            width,
            height,
            pixels,
        }
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }

    /// Read one RGBA pixel. Callers guarantee the coordinates are in bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = self.index(x, y);
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Copy a region into a new surface of exactly `width x height`, with the
    /// region's top-left at the origin.
    ///
    /// The region must lie inside the surface; see
    /// [`extract_region`](super::extract_region) for the checked entry point.
    pub(crate) fn copy_region(&self, x: u32, y: u32, width: u32, height: u32) -> Surface {
        let mut out = Surface::new(width, height);
        let row_bytes = width as usize * CHANNELS;
        for row in 0..height {
            let src = self.index(x, y + row);
            let dst = out.index(0, row);
            out.pixels[dst..dst + row_bytes].copy_from_slice(&self.pixels[src..src + row_bytes]);
        }
        out
    }

    /// Convert to an `image::RgbaImage` for encoding or resizing.
    pub fn to_rgba_image(&self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }
}

/// Draw `image` onto `surface` through `matrix` (source space to surface
/// space), compositing source-over, and return the surface.
///
/// A singular matrix draws nothing.
pub fn draw_transformed(
    mut surface: Surface,
    image: &SourceImage,
    matrix: &Affine,
    filter: InterpolationFilter,
) -> Surface {
    if image.is_empty() || surface.is_empty() {
        return surface;
    }
    let Some(inverse) = matrix.inverse() else {
        return surface;
    };

    let aligned = matrix.is_pixel_aligned();
    let (inverse, filter) = if aligned {
        (inverse.snapped(), InterpolationFilter::Nearest)
    } else {
        (inverse, filter)
    };

    for y in 0..surface.height {
        for x in 0..surface.width {
            let (sx, sy) = inverse.apply(x as f64 + 0.5, y as f64 + 0.5);

            let sample = match filter {
                InterpolationFilter::Nearest => sample_nearest(image, sx, sy),
                InterpolationFilter::Bilinear => sample_bilinear(image, sx, sy),
                InterpolationFilter::Lanczos3 => sample_lanczos3(image, sx, sy),
            };

            if let Some(src) = sample {
                let idx = surface.index(x, y);
                blend_over(&mut surface.pixels[idx..idx + CHANNELS], src);
            }
        }
    }

    surface
}

/// Composite `src` over `dst` (non-premultiplied RGBA).
fn blend_over(dst: &mut [u8], src: [u8; 4]) {
    match src[3] {
        0 => {}
        255 => dst.copy_from_slice(&src),
        alpha => {
            let sa = alpha as f64 / 255.0;
            let da = dst[3] as f64 / 255.0;
            let out_a = sa + da * (1.0 - sa);
            for i in 0..3 {
                let c = (src[i] as f64 * sa + dst[i] as f64 * da * (1.0 - sa)) / out_a;
                dst[i] = c.round().clamp(0.0, 255.0) as u8;
            }
            dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
        }
    }
}

/// True when `(x, y)` lies inside the source's pixel area.
#[inline]
fn covers(image: &SourceImage, x: f64, y: f64) -> bool {
    x >= 0.0 && y >= 0.0 && x < image.width as f64 && y < image.height as f64
}

fn sample_nearest(image: &SourceImage, x: f64, y: f64) -> Option<[u8; 4]> {
    if !covers(image, x, y) {
        return None;
    }
    Some(image.pixel(x.floor() as u32, y.floor() as u32))
}

/// Premultiplied pixel, channels in 0..=255 scale.
#[inline]
fn premultiplied(image: &SourceImage, px: i64, py: i64) -> [f64; 4] {
    let px = px.clamp(0, image.width as i64 - 1) as u32;
    let py = py.clamp(0, image.height as i64 - 1) as u32;
    let [r, g, b, a] = image.pixel(px, py);
    let alpha = a as f64 / 255.0;
    [r as f64 * alpha, g as f64 * alpha, b as f64 * alpha, a as f64]
}

fn unpremultiply(acc: [f64; 4]) -> [u8; 4] {
    let a = acc[3].clamp(0.0, 255.0);
    if a <= 0.0 {
        return [0, 0, 0, 0];
    }
    let alpha = a / 255.0;
    [
        (acc[0] / alpha).round().clamp(0.0, 255.0) as u8,
        (acc[1] / alpha).round().clamp(0.0, 255.0) as u8,
        (acc[2] / alpha).round().clamp(0.0, 255.0) as u8,
        a.round() as u8,
    ]
}

/// Bilinear interpolation over the 4 nearest pixel centres; edges clamp.
fn sample_bilinear(image: &SourceImage, x: f64, y: f64) -> Option<[u8; 4]> {
    if !covers(image, x, y) {
        return None;
    }

    // Pixel centres sit at half-integers
    let u = x - 0.5;
    let v = y - 0.5;
    let x0 = u.floor() as i64;
    let y0 = v.floor() as i64;
    let fx = u - x0 as f64;
    let fy = v - y0 as f64;

    let p00 = premultiplied(image, x0, y0);
    let p10 = premultiplied(image, x0 + 1, y0);
    let p01 = premultiplied(image, x0, y0 + 1);
    let p11 = premultiplied(image, x0 + 1, y0 + 1);

    let mut acc = [0.0f64; 4];
    for i in 0..4 {
        acc[i] = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
    }
    Some(unpremultiply(acc))
}

/// Lanczos3 interpolation over a 6x6 neighbourhood; edges clamp.
fn sample_lanczos3(image: &SourceImage, x: f64, y: f64) -> Option<[u8; 4]> {
    if !covers(image, x, y) {
        return None;
    }

    let u = x - 0.5;
    let v = y - 0.5;
    let x0 = u.floor() as i64;
    let y0 = v.floor() as i64;

    let mut acc = [0.0f64; 4];
    let mut weight_sum = 0.0;

    for ky in -2..=3 {
        let wy = lanczos_weight(v - (y0 + ky) as f64, 3.0);
        for kx in -2..=3 {
            let weight = lanczos_weight(u - (x0 + kx) as f64, 3.0) * wy;
            let p = premultiplied(image, x0 + kx, y0 + ky);
            for i in 0..4 {
                acc[i] += p[i] * weight;
            }
            weight_sum += weight;
        }
    }

    if weight_sum.abs() < f64::EPSILON {
        return sample_bilinear(image, x, y);
    }
    for value in &mut acc {
        *value /= weight_sum;
    }
    Some(unpremultiply(acc))
}

/// Lanczos kernel: `sinc(x) * sinc(x / a)` for `|x| < a`, else 0.
fn lanczos_weight(x: f64, a: f64) -> f64 {
    if x.abs() < f64::EPSILON {
        return 1.0;
    }
    if x.abs() >= a {
        return 0.0;
    }
    let pi_x = std::f64::consts::PI * x;
    let pi_x_a = pi_x / a;
    (a * pi_x.sin() * pi_x_a.sin()) / (pi_x * pi_x)
}
