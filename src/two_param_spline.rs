// Copyright 2025 the Kurbo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Solver for a single run of smooth points.

use smallvec::SmallVec;

use crate::common::mod2pi;
use crate::{BezPath, CurvatureResult, Point, TwoParamCurve, Vec2};

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

/// Number of relaxation passes run by [`Spline::solve`](crate::Spline::solve).
pub const N_ITER: usize = 10;

/// Step used for the finite-difference derivative of the continuity error.
const DERIV_EPSILON: f64 = 1e-3;

/// Chord-relative angles and length of one segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentParams {
    /// Tangent angle at the start, relative to the chord.
    pub th0: f64,
    /// Tangent angle at the end, relative to the reversed chord.
    pub th1: f64,
    /// Chord length.
    pub chord: f64,
}

/// Tangent solver for an open run of points with no interior corners.
///
/// Solving finds one tangent angle per point such that curvature matches on
/// both sides of every interior point. End tangents are either pinned by the
/// caller or left free, in which case the end "coasts" off the curve.
#[derive(Clone, Debug)]
pub struct TwoParamSpline {
    ctrl_pts: SmallVec<[Point; 8]>,
    ths: SmallVec<[f64; 8]>,
    start_th: Option<f64>,
    end_th: Option<f64>,
}

/// Continuity error at the joint between two segments.
///
/// Each side's atan-curvature is rescaled by the square root of the chord
/// lengths so segments of different length are compared in common units.
fn compute_err(
    ths0: &SegmentParams,
    ak0: &CurvatureResult,
    ths1: &SegmentParams,
    ak1: &CurvatureResult,
) -> f64 {
    let ch0 = ths0.chord.sqrt();
    let ch1 = ths1.chord.sqrt();
    let a0 = (ak0.ak1.sin() * ch1).atan2(ak0.ak1.cos() * ch0);
    let a1 = (ak1.ak0.sin() * ch0).atan2(ak1.ak0.cos() * ch1);
    a0 - a1
}

impl TwoParamSpline {
    /// Create a solver over the given points.
    ///
    /// Tangents start out zero; call [`initial_ths`](Self::initial_ths)
    /// before iterating.
    pub fn new(ctrl_pts: impl IntoIterator<Item = Point>) -> Self {
        let ctrl_pts: SmallVec<[Point; 8]> = ctrl_pts.into_iter().collect();
        let ths = SmallVec::from_elem(0.0, ctrl_pts.len());
        TwoParamSpline {
            ctrl_pts,
            ths,
            start_th: None,
            end_th: None,
        }
    }

    /// Pin (or with `None`, free) the absolute tangent angle at the first point.
    pub fn set_start_tangent(&mut self, th: Option<f64>) {
        self.start_th = th;
    }

    /// Pin (or with `None`, free) the absolute tangent angle at the last point.
    pub fn set_end_tangent(&mut self, th: Option<f64>) {
        self.end_th = th;
    }

    /// The points of the run.
    pub fn ctrl_pts(&self) -> &[Point] {
        &self.ctrl_pts
    }

    /// Current absolute tangent angle at each point.
    pub fn ths(&self) -> &[f64] {
        &self.ths
    }

    /// Seed the tangent angles from the control polygon.
    ///
    /// Each interior tangent splits the bend between its two chords in
    /// proportion to the chord lengths. The ends take the direction of their
    /// chord unless pinned.
    pub fn initial_ths(&mut self) -> &[f64] {
        let n = self.ctrl_pts.len();
        if n < 2 {
            return &self.ths;
        }
        let chord_th = |i: usize| (self.ctrl_pts[i + 1] - self.ctrl_pts[i]).atan2();
        self.ths[0] = chord_th(0);
        self.ths[n - 1] = chord_th(n - 2);
        for i in 1..n - 1 {
            let d0 = self.ctrl_pts[i] - self.ctrl_pts[i - 1];
            let d1 = self.ctrl_pts[i + 1] - self.ctrl_pts[i];
            let l0 = d0.hypot();
            let l1 = d1.hypot();
            let th0 = d0.atan2();
            let th1 = d1.atan2();
            let bend = mod2pi(th1 - th0);
            self.ths[i] = mod2pi(th0 + bend * l0 / (l0 + l1));
        }
        if let Some(start_th) = self.start_th {
            self.ths[0] = start_th;
        }
        if let Some(end_th) = self.end_th {
            self.ths[n - 1] = end_th;
        }
        &self.ths
    }

    /// Chord-relative angles and chord length of segment `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i + 1` is not a valid point index.
    pub fn get_ths(&self, i: usize) -> SegmentParams {
        let d = self.ctrl_pts[i + 1] - self.ctrl_pts[i];
        let th = d.atan2();
        SegmentParams {
            th0: mod2pi(self.ths[i] - th),
            th1: mod2pi(th - self.ths[i + 1]),
            chord: d.hypot(),
        }
    }

    /// One damped relaxation pass.
    ///
    /// Free ends are first re-aimed with
    /// [`endpoint_tangent`](TwoParamCurve::endpoint_tangent). Then each
    /// interior tangent takes a Newton step on its own continuity error,
    /// with the derivative estimated by a forward difference and the
    /// interactions between neighboring points ignored. All steps are
    /// applied together, scaled by `tanh(0.25 * (iter + 1))`.
    ///
    /// Returns the sum of the absolute continuity errors before the step.
    /// Nothing here fails: degenerate geometry yields NaN, which propagates.
    pub fn iter_dumb(&mut self, curve: &dyn TwoParamCurve, iter: usize) -> f64 {
        let n = self.ctrl_pts.len();
        if n < 2 {
            return 0.0;
        }
        if self.start_th.is_none() {
            let ths0 = self.get_ths(0);
            self.ths[0] += curve.endpoint_tangent(ths0.th1) - ths0.th0;
        }
        if self.end_th.is_none() {
            let ths0 = self.get_ths(n - 2);
            self.ths[n - 1] -= curve.endpoint_tangent(ths0.th0) - ths0.th1;
        }
        if n < 3 {
            return 0.0;
        }

        let mut abs_err = 0.0;
        let mut x: SmallVec<[f64; 8]> = SmallVec::with_capacity(n - 2);
        let mut ths0 = self.get_ths(0);
        let mut ak0 = curve.compute_curvature(ths0.th0, ths0.th1);
        for i in 0..n - 2 {
            let ths1 = self.get_ths(i + 1);
            let ak1 = curve.compute_curvature(ths1.th0, ths1.th1);
            let err = compute_err(&ths0, &ak0, &ths1, &ak1);
            abs_err += err.abs();

            let ak0p = curve.compute_curvature(ths0.th0, ths0.th1 + DERIV_EPSILON);
            let ak1p = curve.compute_curvature(ths1.th0 - DERIV_EPSILON, ths1.th1);
            let errp = compute_err(&ths0, &ak0p, &ths1, &ak1p);
            let derr = (errp - err) * (1.0 / DERIV_EPSILON);
            x.push(err / derr);

            ths0 = ths1;
            ak0 = ak1;
        }

        let scale = (0.25 * (iter + 1) as f64).tanh();
        for (th, dth) in self.ths[1..n - 1].iter_mut().zip(&x) {
            *th += scale * dth;
        }
        tracing::trace!(iter, scale, abs_err, "two-param spline iteration");
        abs_err
    }

    /// Continuity error at each interior point for the current tangents.
    pub fn continuity_errors(&self, curve: &dyn TwoParamCurve) -> SmallVec<[f64; 8]> {
        let n = self.ctrl_pts.len();
        let mut errs = SmallVec::new();
        if n < 3 {
            return errs;
        }
        let mut ths0 = self.get_ths(0);
        let mut ak0 = curve.compute_curvature(ths0.th0, ths0.th1);
        for i in 0..n - 2 {
            let ths1 = self.get_ths(i + 1);
            let ak1 = curve.compute_curvature(ths1.th0, ths1.th1);
            errs.push(compute_err(&ths0, &ak0, &ths1, &ak1));
            ths0 = ths1;
            ak0 = ak1;
        }
        errs
    }

    /// Seed and run the fixed number of relaxation passes.
    ///
    /// Returns the absolute error reported by the last pass.
    pub fn solve(&mut self, curve: &dyn TwoParamCurve) -> f64 {
        self.initial_ths();
        let mut abs_err = 0.0;
        for i in 0..N_ITER {
            abs_err = self.iter_dumb(curve, i);
        }
        abs_err
    }

    /// Render the run as cubic Béziers, without curvature blending.
    pub fn render(&self, curve: &dyn TwoParamCurve) -> BezPath {
        let mut path = BezPath::new();
        let Some(&first) = self.ctrl_pts.first() else {
            return path;
        };
        path.move_to(first);
        for i in 0..self.ctrl_pts.len().saturating_sub(1) {
            let ths = self.get_ths(i);
            let local = curve.render(ths.th0, ths.th1);
            let p0 = self.ctrl_pts[i];
            let p1 = self.ctrl_pts[i + 1];
            let d = p1 - p0;
            let to_world = |v: Vec2| p0 + v.rotate_scale(d);
            path.curve_to(to_world(local[0]), to_world(local[1]), p1);
        }
        path
    }
}
