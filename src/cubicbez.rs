// Copyright 2025 the Kurbo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cubic Bézier segments.

use crate::Vec2;

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

/// A single cubic Bézier segment.
///
/// The control points are vectors rather than points because the spline
/// code evaluates segments in a normalized chord frame, where `p0` is the
/// origin and `p3` is `(1, 0)`; world coordinates are only produced at
/// render time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicBez {
    /// The start point.
    pub p0: Vec2,
    /// The first control point.
    pub p1: Vec2,
    /// The second control point.
    pub p2: Vec2,
    /// The end point.
    pub p3: Vec2,
}

impl CubicBez {
    /// Create a new cubic Bézier segment.
    #[inline]
    pub fn new<V: Into<Vec2>>(p0: V, p1: V, p2: V, p3: V) -> CubicBez {
        CubicBez {
            p0: p0.into(),
            p1: p1.into(),
            p2: p2.into(),
            p3: p3.into(),
        }
    }

    /// Create a segment from a flat coordinate array `[x0, y0, ..., x3, y3]`.
    #[inline]
    pub fn from_coords(c: [f64; 8]) -> CubicBez {
        CubicBez::new((c[0], c[1]), (c[2], c[3]), (c[4], c[5]), (c[6], c[7]))
    }

    #[inline]
    fn weightsum(&self, c0: f64, c1: f64, c2: f64, c3: f64) -> Vec2 {
        self.p0 * c0 + self.p1 * c1 + self.p2 * c2 + self.p3 * c3
    }

    /// Evaluate the curve at parameter `t`.
    ///
    /// Values of `t` outside `[0, 1]` extrapolate the same polynomial.
    #[inline]
    pub fn eval(&self, t: f64) -> Vec2 {
        let mt = 1.0 - t;
        let c0 = mt * mt * mt;
        let c1 = 3.0 * mt * mt * t;
        let c2 = 3.0 * mt * t * t;
        let c3 = t * t * t;
        self.weightsum(c0, c1, c2, c3)
    }

    /// First derivative at parameter `t`.
    #[inline]
    pub fn deriv(&self, t: f64) -> Vec2 {
        let mt = 1.0 - t;
        let c0 = -3.0 * mt * mt;
        let c3 = 3.0 * t * t;
        let c1 = -6.0 * t * mt - c0;
        let c2 = 6.0 * t * mt - c3;
        self.weightsum(c0, c1, c2, c3)
    }

    /// Second derivative at parameter `t`.
    #[inline]
    pub fn deriv2(&self, t: f64) -> Vec2 {
        let mt = 1.0 - t;
        let c0 = 6.0 * mt;
        let c3 = 6.0 * t;
        let c1 = 6.0 - 18.0 * mt;
        let c2 = 6.0 - 18.0 * t;
        self.weightsum(c0, c1, c2, c3)
    }

    /// Signed curvature at parameter `t`.
    ///
    /// Positive curvature turns left in y-up coordinates. At a cusp, where
    /// the derivative vanishes, the result is infinite or NaN; use
    /// [`atan_curvature`](CubicBez::atan_curvature) when that matters.
    #[inline]
    pub fn curvature(&self, t: f64) -> f64 {
        let d = self.deriv(t);
        let d2 = self.deriv2(t);
        let norm = d.hypot();
        d.cross(d2) / (norm * norm * norm)
    }

    /// Arctangent of the signed curvature at parameter `t`.
    ///
    /// Computed as a single `atan2`, so it stays finite when the derivative
    /// vanishes, tending to ±π/2.
    #[inline]
    pub fn atan_curvature(&self, t: f64) -> f64 {
        let d = self.deriv(t);
        let d2 = self.deriv2(t);
        let norm = d.hypot();
        d.cross(d2).atan2(norm * norm * norm)
    }

    /// The first half of the curve, by de Casteljau subdivision at `t = 0.5`.
    #[inline]
    pub fn left_half(&self) -> CubicBez {
        let p01 = (self.p0 + self.p1) * 0.5;
        let p12 = (self.p1 + self.p2) * 0.5;
        let p23 = (self.p2 + self.p3) * 0.5;
        let p012 = (p01 + p12) * 0.5;
        let p123 = (p12 + p23) * 0.5;
        let pm = (p012 + p123) * 0.5;
        CubicBez::new(self.p0, p01, p012, pm)
    }

    /// The second half of the curve, by de Casteljau subdivision at `t = 0.5`.
    #[inline]
    pub fn right_half(&self) -> CubicBez {
        let p01 = (self.p0 + self.p1) * 0.5;
        let p12 = (self.p1 + self.p2) * 0.5;
        let p23 = (self.p2 + self.p3) * 0.5;
        let p012 = (p01 + p12) * 0.5;
        let p123 = (p12 + p23) * 0.5;
        let pm = (p012 + p123) * 0.5;
        CubicBez::new(pm, p123, p23, self.p3)
    }

    /// Subdivide into halves, using de Casteljau.
    #[inline]
    pub fn subdivide(&self) -> (CubicBez, CubicBez) {
        (self.left_half(), self.right_half())
    }
}
