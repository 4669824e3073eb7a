//! 2D affine transform as a plain value.
//!
//! Coefficients follow the canvas `DOMMatrix` layout:
//!
//! ```text
//! | a c e |     x' = a*x + c*y + e
//! | b d f |     y' = b*x + d*y + f
//! | 0 0 1 |
//! ```
//!
//! The builder methods (`translate`, `rotate`, `scale`) post-multiply, so a
//! chain reads in the same order as the equivalent sequence of canvas context
//! calls, but every step returns a new value.

/// Affine transform matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

/// Coefficients closer than this to an integer are treated as that integer.
const SNAP_EPSILON: f64 = 1e-9;

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine {
    pub const IDENTITY: Affine = Affine {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub fn translation(tx: f64, ty: f64) -> Self {
        Affine {
            e: tx,
            f: ty,
            ..Self::IDENTITY
        }
    }

    /// Rotation by `radians`; positive is clockwise on a y-down raster.
    pub fn rotation(radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        Affine {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            e: 0.0,
            f: 0.0,
        }
    }

    pub fn scaling(sx: f64, sy: f64) -> Self {
        Affine {
            a: sx,
            d: sy,
            ..Self::IDENTITY
        }
    }

    /// Matrix product `self * rhs`: `rhs` is applied first.
    pub fn multiply(&self, rhs: &Affine) -> Affine {
        Affine {
            a: self.a * rhs.a + self.c * rhs.b,
            b: self.b * rhs.a + self.d * rhs.b,
            c: self.a * rhs.c + self.c * rhs.d,
            d: self.b * rhs.c + self.d * rhs.d,
            e: self.a * rhs.e + self.c * rhs.f + self.e,
            f: self.b * rhs.e + self.d * rhs.f + self.f,
        }
    }

    pub fn translate(self, tx: f64, ty: f64) -> Affine {
        self.multiply(&Affine::translation(tx, ty))
    }

    pub fn rotate(self, radians: f64) -> Affine {
        self.multiply(&Affine::rotation(radians))
    }

    pub fn scale(self, sx: f64, sy: f64) -> Affine {
        self.multiply(&Affine::scaling(sx, sy))
    }

    /// Map a point through the transform.
    #[inline]
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    /// Inverse transform, or `None` when the matrix is singular.
    pub fn inverse(&self) -> Option<Affine> {
        let det = self.determinant();
        if det.abs() < f64::EPSILON || !det.is_finite() {
            return None;
        }
        let inv = 1.0 / det;
        Some(Affine {
            a: self.d * inv,
            b: -self.b * inv,
            c: -self.c * inv,
            d: self.a * inv,
            e: (self.c * self.f - self.d * self.e) * inv,
            f: (self.b * self.e - self.a * self.f) * inv,
        })
    }

    /// Copy with every coefficient within floating noise of an integer
    /// replaced by that integer.
    ///
    /// `cos(90°)` is `6.1e-17`, not zero; snapping lets quarter turns be
    /// recognised and mapped exactly.
    pub fn snapped(&self) -> Affine {
        Affine {
            a: snap(self.a),
            b: snap(self.b),
            c: snap(self.c),
            d: snap(self.d),
            e: snap(self.e),
            f: snap(self.f),
        }
    }

    /// True when the transform maps the pixel grid onto itself: a quarter
    /// turn and/or flip with a whole-pixel offset.
    pub fn is_pixel_aligned(&self) -> bool {
        let m = self.snapped();
        let unit = |v: f64| v == 1.0 || v == -1.0;
        let integral = |v: f64| v.fract() == 0.0;

        let straight = unit(m.a) && m.b == 0.0 && m.c == 0.0 && unit(m.d);
        let swapped = m.a == 0.0 && unit(m.b) && unit(m.c) && m.d == 0.0;
        (straight || swapped) && integral(m.e) && integral(m.f)
    }
}

fn snap(v: f64) -> f64 {
    let r = v.round();
    if (v - r).abs() < SNAP_EPSILON {
        // Avoid -0.0 so equality checks stay simple
        r + 0.0
    } else {
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    const EPS: f64 = 1e-9;

    fn assert_point(actual: (f64, f64), expected: (f64, f64)) {
        assert!(
            (actual.0 - expected.0).abs() < EPS && (actual.1 - expected.1).abs() < EPS,
            "expected {:?}, got {:?}",
            expected,
            actual
        );
    }

    #[test]
    fn test_identity_apply() {
        assert_point(Affine::IDENTITY.apply(3.0, -4.0), (3.0, -4.0));
    }

    #[test]
    fn test_rotation_is_clockwise_on_y_down() {
        // +x axis turns into +y axis
        assert_point(Affine::rotation(FRAC_PI_2).apply(1.0, 0.0), (0.0, 1.0));
    }

    #[test]
    fn test_builder_order_matches_canvas() {
        // translate then scale: scaling happens in the translated frame
        let m = Affine::IDENTITY.translate(10.0, 0.0).scale(2.0, 2.0);
        assert_point(m.apply(1.0, 1.0), (12.0, 2.0));
    }

    #[test]
    fn test_inverse_round_trips() {
        let m = Affine::IDENTITY
            .translate(50.0, 20.0)
            .rotate(0.7)
            .scale(-1.0, 1.0)
            .translate(-8.0, -3.0);
        let inv = m.inverse().unwrap();

        let p = (13.25, -7.5);
        let (x, y) = m.apply(p.0, p.1);
        assert_point(inv.apply(x, y), p);
        assert_point(m.multiply(&inv).apply(5.0, 6.0), (5.0, 6.0));
    }

    #[test]
    fn test_singular_has_no_inverse() {
        assert!(Affine::scaling(0.0, 1.0).inverse().is_none());
    }

    #[test]
    fn test_snapped_removes_noise() {
        let m = Affine::rotation(FRAC_PI_2).snapped();
        assert_eq!(m.a, 0.0);
        assert_eq!(m.b, 1.0);
        assert_eq!(m.c, -1.0);
        assert_eq!(m.d, 0.0);
    }

    #[test]
    fn test_pixel_aligned_detection() {
        assert!(Affine::IDENTITY.is_pixel_aligned());
        assert!(Affine::rotation(PI).translate(-4.0, -3.0).is_pixel_aligned());
        assert!(Affine::rotation(FRAC_PI_2).is_pixel_aligned());
        assert!(Affine::scaling(-1.0, 1.0).translate(-9.0, 0.0).is_pixel_aligned());

        assert!(!Affine::rotation(0.3).is_pixel_aligned());
        assert!(!Affine::translation(0.5, 0.0).is_pixel_aligned());
        assert!(!Affine::scaling(2.0, 2.0).is_pixel_aligned());
    }
}
