// Copyright 2025 the Kurbo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Two-parameter curve families.
//!
//! A segment of the spline is described entirely by its two endpoint tangent
//! angles, measured in the segment's chord frame: the segment runs from
//! `(0, 0)` to `(1, 0)`, `th0` is the angle of the outgoing tangent at the
//! start, and `th1` is the angle of the incoming tangent at the end measured
//! against the reversed chord. With both angles zero the segment is straight.

use arrayvec::ArrayVec;

use crate::{hermite5, CubicBez, Vec2};

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

/// The maximum number of points returned by [`TwoParamCurve::render4`].
///
/// Four cubic pieces share three interior on-curve points; the final
/// on-curve point is the segment end, which callers supply themselves.
pub const MAX_RENDER_POINTS: usize = 11;

/// Arctangent of curvature at both ends of a segment.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CurvatureResult {
    /// Atan-curvature at the start of the segment.
    pub ak0: f64,
    /// Atan-curvature at the end of the segment.
    pub ak1: f64,
}

/// Partial derivatives of [`CurvatureResult`] with respect to the two angles.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CurvatureDerivs {
    /// ∂ak0/∂th0
    pub dak0_dth0: f64,
    /// ∂ak1/∂th0
    pub dak1_dth0: f64,
    /// ∂ak0/∂th1
    pub dak0_dth1: f64,
    /// ∂ak1/∂th1
    pub dak1_dth1: f64,
}

/// A family of curves indexed by the two endpoint tangent angles.
///
/// Implementations are stateless; one instance is shared by every segment of
/// every spline that uses it.
pub trait TwoParamCurve {
    /// Inner control points of the base cubic, in the chord frame.
    ///
    /// The result holds two points: the handles of a single cubic from
    /// `(0, 0)` to `(1, 0)`.
    fn render(&self, th0: f64, th1: f64) -> ArrayVec<Vec2, MAX_RENDER_POINTS>;

    /// Render with optional curvature targets at either end.
    ///
    /// Targets are in chord-frame units, that is real curvature multiplied by
    /// the chord length. With no targets this is [`render`](Self::render).
    /// Otherwise the result is a chain of cubics flattened into points: after
    /// the two handles of each piece comes its end point, except for the last
    /// piece whose end point is `(1, 0)` and is omitted.
    ///
    /// The length is therefore always `3 * pieces - 1`. [`Spline`] asserts
    /// this in debug builds.
    ///
    /// [`Spline`]: crate::Spline
    fn render4(
        &self,
        th0: f64,
        th1: f64,
        k0: Option<f64>,
        k1: Option<f64>,
    ) -> ArrayVec<Vec2, MAX_RENDER_POINTS>;

    /// Atan-curvature at the two ends of the segment.
    fn compute_curvature(&self, th0: f64, th1: f64) -> CurvatureResult;

    /// Tangent angle of a free path end, given the angle at the other end of
    /// the same segment.
    fn endpoint_tangent(&self, th: f64) -> f64;

    /// Jacobian of [`compute_curvature`](Self::compute_curvature).
    ///
    /// The default is a central difference.
    fn compute_curvature_derivs(&self, th0: f64, th1: f64) -> CurvatureDerivs {
        let epsilon = 1e-6;
        let scale = 0.5 / epsilon;
        let k0plus = self.compute_curvature(th0 + epsilon, th1);
        let k0minus = self.compute_curvature(th0 - epsilon, th1);
        let k1plus = self.compute_curvature(th0, th1 + epsilon);
        let k1minus = self.compute_curvature(th0, th1 - epsilon);
        CurvatureDerivs {
            dak0_dth0: scale * (k0plus.ak0 - k0minus.ak0),
            dak1_dth0: scale * (k0plus.ak1 - k0minus.ak1),
            dak0_dth1: scale * (k1plus.ak0 - k1minus.ak0),
            dak1_dth1: scale * (k1plus.ak1 - k1minus.ak1),
        }
    }
}

/// The curve family used by default.
///
/// Each segment is a cubic whose handle lengths are tuned so that the
/// curvature profile resembles an Euler spiral. When curvature targets are
/// imposed, a quintic correction is layered on top and the result is
/// expressed as four cubic pieces.
#[derive(Clone, Copy, Debug, Default)]
pub struct MyCurve;

/// Handle length at the end with angle `th0`, given the angle `th1` at the
/// opposite end.
///
/// The constants are fitted, not derived; changing them changes every
/// rendered shape.
#[inline]
fn my_cubic_len(th0: f64, th1: f64) -> f64 {
    let offset = 0.3 * (th1 * 2.0 - 0.4 * (th1 * 2.0).sin()).sin();
    let scale = 1.0 / (3.0 * 0.8);
    scale * ((th0 - offset).cos() - 0.2 * (3.0 * (th0 - offset)).cos())
}

/// The base cubic of the family, from `(0, 0)` to `(1, 0)`.
fn my_cubic(th0: f64, th1: f64) -> CubicBez {
    let len0 = my_cubic_len(th0, th1);
    let len1 = my_cubic_len(th1, th0);
    CubicBez::from_coords([
        0.0,
        0.0,
        th0.cos() * len0,
        th0.sin() * len0,
        1.0 - th1.cos() * len1,
        th1.sin() * len1,
        1.0,
        0.0,
    ])
}

/// Atan-curvature of `cb` at `t`, measured along tangent direction `th`.
///
/// This is `atan2(cross, dot * |dot|)` rather than `atan` of a quotient, so
/// it stays finite as the tangent component of the derivative vanishes.
#[inline]
fn atan_curv(cb: &CubicBez, t: f64, th: f64) -> f64 {
    let (s, c) = th.sin_cos();
    let d2 = cb.deriv2(t);
    let d2cross = d2.y * c - d2.x * s;
    let d = cb.deriv(t);
    let ddot = d.x * c + d.y * s;
    d2cross.atan2(ddot * ddot.abs())
}

impl MyCurve {
    /// Adjust handle lengths of the base cubic toward the curvature targets.
    ///
    /// Handle angles are unchanged. The natural curvature at each end is
    /// floored at `1e-6` in magnitude. The handle shaping beyond that is a
    /// local choice: curvature at an end goes as the inverse square of that
    /// end's handle length, so the length is divided by the square root of
    /// the ratio between target and natural curvature, clamped to
    /// `[0.25, 4]`. Targets of the opposite sign hit the lower clamp.
    ///
    /// Only the interior shape depends on this; [`render4_quintic`]
    /// corrects the endpoint curvature exactly.
    ///
    /// [`render4_quintic`]: Self::render4_quintic
    pub fn render4_cubic(&self, th0: f64, th1: f64, k0: Option<f64>, k1: Option<f64>) -> [Vec2; 2] {
        let cb = my_cubic(th0, th1);
        let deriv_scale = |t: f64, th: f64, k: Option<f64>| -> f64 {
            let Some(k) = k else {
                return 1.0 / 3.0;
            };
            let (s, c) = th.sin_cos();
            let d = cb.deriv(t);
            let d2 = cb.deriv2(t);
            let d2cross = d2.y * c - d2.x * s;
            let ddot = d.x * c + d.y * s;
            let mut old_k = d2cross / (ddot * ddot);
            if old_k.abs() < 1e-6 {
                old_k = 1e-6_f64.copysign(old_k);
            }
            let ratio = (k / old_k).clamp(0.25, 4.0);
            (1.0 / 3.0) / ratio.sqrt()
        };
        let d0 = cb.deriv(0.0);
        let scale0 = deriv_scale(0.0, th0, k0);
        let d1 = cb.deriv(1.0);
        let scale1 = deriv_scale(1.0, -th1, k1);
        [
            d0 * scale0,
            Vec2::new(1.0 - d1.x * scale1, -d1.y * scale1),
        ]
    }

    /// Render with a quintic correction that meets the curvature targets.
    ///
    /// The cubic from [`render4_cubic`](Self::render4_cubic) is offset by a
    /// quintic with zero value and slope at both ends and exactly the second
    /// derivative still missing at each end. The sum is expressed as four
    /// cubic pieces over quarters of the parameter range: each piece is the
    /// exact subdivision of the cubic plus the quintic's value and slope at
    /// the piece boundaries.
    pub fn render4_quintic(
        &self,
        th0: f64,
        th1: f64,
        k0: Option<f64>,
        k1: Option<f64>,
    ) -> ArrayVec<Vec2, MAX_RENDER_POINTS> {
        let [h0, h1] = self.render4_cubic(th0, th1, k0, k1);
        let cb = CubicBez::new(Vec2::ZERO, h0, h1, Vec2::new(1.0, 0.0));
        let curv_adjust = |t: f64, th: f64, k: Option<f64>| -> Vec2 {
            let Some(k) = k else {
                return Vec2::ZERO;
            };
            let (s, c) = th.sin_cos();
            let d2 = cb.deriv2(t);
            let d2cross = d2.y * c - d2.x * s;
            let d = cb.deriv(t);
            let ddot = d.x * c + d.y * s;
            let delta = k * ddot * ddot.abs() - d2cross;
            Vec2::new(-s * delta, c * delta)
        };
        let dc0 = curv_adjust(0.0, th0, k0);
        let dc1 = curv_adjust(1.0, -th1, k1);
        let xa = hermite5(0.0, 0.0, 0.0, 0.0, dc0.x, dc1.x);
        let ya = hermite5(0.0, 0.0, 0.0, 0.0, dc0.y, dc1.y);
        let xad = xa.deriv();
        let yad = ya.deriv();
        let q = |t: f64| Vec2::new(xa.eval(t), ya.eval(t));
        let dq = |t: f64| Vec2::new(xad.eval(t), yad.eval(t));

        let (l, r) = cb.subdivide();
        let pieces = [l.left_half(), l.right_half(), r.left_half(), r.right_half()];
        // A quarter-range piece has handles 1/3 * 1/4 of the derivative away.
        let scale = 1.0 / 12.0;
        let mut result = ArrayVec::new();
        for (i, piece) in pieces.iter().enumerate() {
            let t0 = i as f64 * 0.25;
            let t1 = t0 + 0.25;
            let q1 = q(t1);
            result.push(piece.p1 + q(t0) + dq(t0) * scale);
            result.push(piece.p2 + q1 - dq(t1) * scale);
            if i < 3 {
                result.push(piece.p3 + q1);
            }
        }
        result
    }
}

impl TwoParamCurve for MyCurve {
    fn render(&self, th0: f64, th1: f64) -> ArrayVec<Vec2, MAX_RENDER_POINTS> {
        let cb = my_cubic(th0, th1);
        let mut result = ArrayVec::new();
        result.push(cb.p1);
        result.push(cb.p2);
        result
    }

    fn render4(
        &self,
        th0: f64,
        th1: f64,
        k0: Option<f64>,
        k1: Option<f64>,
    ) -> ArrayVec<Vec2, MAX_RENDER_POINTS> {
        if k0.is_none() && k1.is_none() {
            return self.render(th0, th1);
        }
        self.render4_quintic(th0, th1, k0, k1)
    }

    fn compute_curvature(&self, th0: f64, th1: f64) -> CurvatureResult {
        let cb = my_cubic(th0, th1);
        CurvatureResult {
            ak0: atan_curv(&cb, 0.0, th0),
            ak1: atan_curv(&cb, 1.0, -th1),
        }
    }

    #[inline]
    fn endpoint_tangent(&self, th: f64) -> f64 {
        0.5 * (2.0 * th).sin()
    }
}
