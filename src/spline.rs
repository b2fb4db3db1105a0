// Copyright 2025 the Kurbo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Curvature-continuous splines through control points.

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use crate::common::{mod2pi, my_tan, sign};
use crate::{BezPath, MyCurve, PathEl, Point, TwoParamCurve, TwoParamSpline, Vec2};

/// Whether a control point allows a kink.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PointType {
    /// Tangent direction may jump; segments on either side are solved apart.
    Corner,
    /// Tangent and curvature are continuous through the point.
    #[default]
    Smooth,
}

impl PointType {
    /// Parse the one-letter code used by saved curves: `'c'` or `'s'`.
    pub fn from_char(c: char) -> Option<PointType> {
        match c {
            'c' => Some(PointType::Corner),
            's' => Some(PointType::Smooth),
            _ => None,
        }
    }

    /// The one-letter code for this type.
    pub fn as_char(self) -> char {
        match self {
            PointType::Corner => 'c',
            PointType::Smooth => 's',
        }
    }
}

/// One vertex of a [`Spline`].
///
/// The caller sets `pt`, `ty` and optionally pins tangents with `lth` and
/// `rth`. Everything else is written by [`Spline::solve`] and
/// [`Spline::compute_curvature_blending`]; pinned inputs are never
/// overwritten, so solving again gives the same result.
///
/// All angles are absolute, in radians, in the direction of travel.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControlPoint {
    /// Position.
    pub pt: Point,
    /// Corner or smooth.
    pub ty: PointType,
    /// Pinned tangent of the incoming segment.
    ///
    /// On a smooth point a single pinned side applies to both sides.
    pub lth: Option<f64>,
    /// Pinned tangent of the outgoing segment.
    pub rth: Option<f64>,
    /// Solved tangent of the incoming segment.
    ///
    /// `None` before solving, and at the start of an open path.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub l_th: Option<f64>,
    /// Solved tangent of the outgoing segment.
    ///
    /// `None` before solving, and at the end of an open path.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub r_th: Option<f64>,
    /// Atan-curvature at this point of the incoming segment, in that
    /// segment's chord units.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub l_ak: f64,
    /// Atan-curvature at this point of the outgoing segment, in that
    /// segment's chord units.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub r_ak: f64,
    /// Curvature imposed on both sides when rendering.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub k_blend: Option<f64>,
}

impl ControlPoint {
    /// A control point with no pinned tangents.
    pub fn new(pt: impl Into<Point>, ty: PointType) -> ControlPoint {
        ControlPoint {
            pt: pt.into(),
            ty,
            lth: None,
            rth: None,
            l_th: None,
            r_th: None,
            l_ak: 0.0,
            r_ak: 0.0,
            k_blend: None,
        }
    }

    /// A corner point.
    pub fn corner(pt: impl Into<Point>) -> ControlPoint {
        ControlPoint::new(pt, PointType::Corner)
    }

    /// A smooth point.
    pub fn smooth(pt: impl Into<Point>) -> ControlPoint {
        ControlPoint::new(pt, PointType::Smooth)
    }

    /// Pin the incoming and outgoing tangents.
    #[must_use]
    pub fn with_tangents(mut self, lth: Option<f64>, rth: Option<f64>) -> ControlPoint {
        self.lth = lth;
        self.rth = rth;
        self
    }

    fn left_pin(&self) -> Option<f64> {
        match self.ty {
            PointType::Corner => self.lth,
            PointType::Smooth => self.lth.or(self.rth),
        }
    }

    fn right_pin(&self) -> Option<f64> {
        match self.ty {
            PointType::Corner => self.rth,
            PointType::Smooth => self.rth.or(self.lth),
        }
    }

    /// Whether a smooth run must end here.
    fn is_break(&self) -> bool {
        self.ty == PointType::Corner || self.lth.is_some() || self.rth.is_some()
    }
}

/// Problems found by [`Spline::validate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SplineError {
    /// Fewer than two control points.
    TooFewPoints {
        /// The number of points present.
        len: usize,
    },
    /// A control point has a NaN or infinite coordinate.
    NonFinitePoint {
        /// Index of the offending point.
        index: usize,
    },
    /// Two consecutive control points coincide.
    ZeroLengthSegment {
        /// Index of the point starting the segment.
        index: usize,
    },
    /// A pinned tangent is NaN or infinite.
    NonFiniteTangent {
        /// Index of the offending point.
        index: usize,
    },
}

impl fmt::Display for SplineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplineError::TooFewPoints { len } => {
                write!(f, "spline needs at least 2 points, got {len}")
            }
            SplineError::NonFinitePoint { index } => {
                write!(f, "control point {index} is not finite")
            }
            SplineError::ZeroLengthSegment { index } => {
                write!(f, "segment starting at point {index} has zero length")
            }
            SplineError::NonFiniteTangent { index } => {
                write!(f, "pinned tangent at point {index} is not finite")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SplineError {}

/// A spline through a sequence of control points, open or closed.
///
/// The workflow is `solve`, then optionally `compute_curvature_blending`,
/// then `render`. Rendering an unsolved spline draws straight segments.
///
/// # Examples
///
/// ```
/// use rspline::{ControlPoint, PathEl, Spline};
///
/// let mut spline = Spline::new(
///     [
///         ControlPoint::smooth((0.0, 0.0)),
///         ControlPoint::smooth((100.0, 50.0)),
///         ControlPoint::smooth((200.0, 0.0)),
///     ],
///     false,
/// );
/// spline.solve();
/// spline.compute_curvature_blending();
/// let path = spline.render();
/// assert_eq!(path.elements()[0], PathEl::MoveTo((0.0, 0.0).into()));
/// assert!(spline.render_svg().starts_with("M0 0 C"));
/// ```
#[derive(Clone)]
pub struct Spline {
    ctrl_pts: Vec<ControlPoint>,
    is_closed: bool,
    curve: Arc<dyn TwoParamCurve + Send + Sync>,
}

impl fmt::Debug for Spline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Spline")
            .field("ctrl_pts", &self.ctrl_pts)
            .field("is_closed", &self.is_closed)
            .finish_non_exhaustive()
    }
}

impl Spline {
    /// Create a spline using [`MyCurve`] for its segments.
    pub fn new(ctrl_pts: impl IntoIterator<Item = ControlPoint>, is_closed: bool) -> Spline {
        Spline {
            ctrl_pts: ctrl_pts.into_iter().collect(),
            is_closed,
            curve: Arc::new(MyCurve),
        }
    }

    /// Use a different curve family for the segments.
    #[must_use]
    pub fn with_curve(mut self, curve: Arc<dyn TwoParamCurve + Send + Sync>) -> Spline {
        self.curve = curve;
        self
    }

    /// The curve family.
    pub fn curve(&self) -> &dyn TwoParamCurve {
        &*self.curve
    }

    /// The control points.
    pub fn ctrl_pts(&self) -> &[ControlPoint] {
        &self.ctrl_pts
    }

    /// Mutable access to the control points.
    ///
    /// Solve again after editing.
    pub fn ctrl_pts_mut(&mut self) -> &mut Vec<ControlPoint> {
        &mut self.ctrl_pts
    }

    /// Whether the last point connects back to the first.
    pub fn is_closed(&self) -> bool {
        self.is_closed
    }

    fn n_segments(&self) -> usize {
        match self.ctrl_pts.len() {
            0 | 1 => 0,
            n if self.is_closed => n,
            n => n - 1,
        }
    }

    /// Index where solving starts.
    ///
    /// For a closed path this is the first corner or pinned point, so that
    /// no smooth run wraps across the seam. An all-smooth closed path with
    /// no pins starts at 0, and may show a kink there.
    pub fn start_ix(&self) -> usize {
        if !self.is_closed {
            return 0;
        }
        self.ctrl_pts.iter().position(ControlPoint::is_break).unwrap_or(0)
    }

    fn index(&self, i: usize, start: usize) -> usize {
        (i + start) % self.ctrl_pts.len()
    }

    /// The control point `i` places after `start`, wrapping around.
    ///
    /// # Panics
    ///
    /// Panics if the spline has no control points.
    pub fn pt(&self, i: usize, start: usize) -> &ControlPoint {
        &self.ctrl_pts[self.index(i, start)]
    }

    /// Solve for tangent angles at every point.
    ///
    /// Segments ending at a corner, or at the end of an open path, with no
    /// pinned tangent on either side, are straight. Everything else is
    /// split into maximal smooth runs, each solved by a [`TwoParamSpline`].
    /// Also records the atan-curvatures on each side of every point.
    ///
    /// Never fails: degenerate geometry gives NaN tangents. Does nothing
    /// with fewer than two points.
    pub fn solve(&mut self) {
        for cp in &mut self.ctrl_pts {
            cp.l_th = None;
            cp.r_th = None;
            cp.l_ak = 0.0;
            cp.r_ak = 0.0;
        }
        if self.ctrl_pts.len() < 2 {
            return;
        }
        let start = self.start_ix();
        let length = self.n_segments();
        let mut i = 0;
        while i < length {
            let p0 = *self.pt(i, start);
            let p1 = *self.pt(i + 1, start);
            if (i + 1 == length || p1.ty == PointType::Corner)
                && p0.right_pin().is_none()
                && p1.left_pin().is_none()
            {
                let th = (p1.pt - p0.pt).atan2();
                let (ix0, ix1) = (self.index(i, start), self.index(i + 1, start));
                self.ctrl_pts[ix0].r_th = Some(th);
                self.ctrl_pts[ix0].r_ak = 0.0;
                self.ctrl_pts[ix1].l_th = Some(th);
                self.ctrl_pts[ix1].l_ak = 0.0;
                i += 1;
                continue;
            }

            let mut j = i + 1;
            while j < length && !self.pt(j, start).is_break() {
                j += 1;
            }
            let mut inner = TwoParamSpline::new((i..=j).map(|k| self.pt(k, start).pt));
            inner.set_start_tangent(p0.right_pin());
            inner.set_end_tangent(self.pt(j, start).left_pin());
            let abs_err = inner.solve(&*self.curve);
            tracing::debug!(
                start = self.index(i, start),
                len = j - i + 1,
                abs_err,
                "solved smooth run"
            );
            for k in i..j {
                let params = inner.get_ths(k - i);
                let ak = self.curve.compute_curvature(params.th0, params.th1);
                let (ix0, ix1) = (self.index(k, start), self.index(k + 1, start));
                self.ctrl_pts[ix0].r_th = Some(inner.ths()[k - i]);
                self.ctrl_pts[ix0].r_ak = ak.ak0;
                self.ctrl_pts[ix1].l_th = Some(inner.ths()[k + 1 - i]);
                self.ctrl_pts[ix1].l_ak = ak.ak1;
            }
            i = j;
        }
    }

    /// Validate the input, then [`solve`](Self::solve).
    ///
    /// # Errors
    ///
    /// Returns the first problem found by [`validate`](Self::validate);
    /// nothing is solved in that case.
    pub fn try_solve(&mut self) -> Result<(), SplineError> {
        self.validate()?;
        self.solve();
        Ok(())
    }

    /// Check for input that would make the solution degenerate.
    ///
    /// [`solve`](Self::solve) accepts anything; this is for callers that
    /// would rather reject bad input up front.
    ///
    /// # Errors
    ///
    /// Too few points, non-finite coordinates or pinned tangents, and
    /// coincident consecutive points, checked in that order.
    pub fn validate(&self) -> Result<(), SplineError> {
        let len = self.ctrl_pts.len();
        if len < 2 {
            return Err(SplineError::TooFewPoints { len });
        }
        for (index, cp) in self.ctrl_pts.iter().enumerate() {
            if !cp.pt.is_finite() {
                return Err(SplineError::NonFinitePoint { index });
            }
            let pinned = [cp.lth, cp.rth];
            if pinned.iter().flatten().any(|th| !th.is_finite()) {
                return Err(SplineError::NonFiniteTangent { index });
            }
        }
        for index in 0..self.n_segments() {
            if self.pt(index, 0).pt == self.pt(index + 1, 0).pt {
                return Err(SplineError::ZeroLengthSegment { index });
            }
        }
        Ok(())
    }

    /// Compute `k_blend` at every solved smooth point with two sides.
    ///
    /// Where the curvature changes sign across the point the blend is zero,
    /// otherwise it is the harmonic mean of the two one-sided curvatures.
    /// Corners and open path ends are cleared.
    pub fn compute_curvature_blending(&mut self) {
        let n = self.ctrl_pts.len();
        for i in 0..n {
            let cp = self.ctrl_pts[i];
            self.ctrl_pts[i].k_blend = None;
            if cp.ty != PointType::Smooth || cp.l_th.is_none() || cp.r_th.is_none() {
                continue;
            }
            let k_blend = if sign(cp.l_ak) != sign(cp.r_ak) {
                0.0
            } else {
                let prev = self.ctrl_pts[(i + n - 1) % n].pt;
                let next = self.ctrl_pts[(i + 1) % n].pt;
                let lk = my_tan(cp.l_ak) / cp.pt.distance(prev);
                let rk = my_tan(cp.r_ak) / next.distance(cp.pt);
                2.0 / (1.0 / lk + 1.0 / rk)
            };
            tracing::debug!(index = i, k_blend, "blended curvature");
            self.ctrl_pts[i].k_blend = Some(k_blend);
        }
    }

    /// Render the spline, passing each path element to `f`.
    ///
    /// Each segment is preceded by `Mark(i)`, where `i` is the index of its
    /// first control point. Segment end points are the control points
    /// themselves, not computed positions.
    pub fn render_with(&self, mut f: impl FnMut(PathEl)) {
        let Some(first) = self.ctrl_pts.first() else {
            return;
        };
        f(PathEl::MoveTo(first.pt));
        for i in 0..self.n_segments() {
            let cp0 = self.pt(i, 0);
            let cp1 = self.pt(i + 1, 0);
            f(PathEl::Mark(i));
            let p0 = cp0.pt;
            let d = cp1.pt - p0;
            let chord = d.hypot();
            let th = d.atan2();
            let th0 = mod2pi(cp0.r_th.unwrap_or(th) - th);
            let th1 = mod2pi(th - cp1.l_th.unwrap_or(th));
            let k0 = cp0.k_blend.map(|k| k * chord);
            let k1 = cp1.k_blend.map(|k| k * chord);
            let local = self.curve.render4(th0, th1, k0, k1);
            let to_world = |v: Vec2| p0 + v.rotate_scale(d);
            debug_assert!(
                local.len() % 3 == 2,
                "render4 returned {} points, expected 3 * pieces - 1",
                local.len()
            );
            for piece in local.chunks(3) {
                match *piece {
                    [h0, h1, end] => {
                        f(PathEl::CurveTo(to_world(h0), to_world(h1), to_world(end)));
                    }
                    [h0, h1] => f(PathEl::CurveTo(to_world(h0), to_world(h1), cp1.pt)),
                    _ => tracing::warn!(index = i, len = local.len(), "malformed segment render"),
                }
            }
        }
        if self.is_closed && self.n_segments() > 0 {
            f(PathEl::ClosePath);
        }
    }

    /// Render the spline to a path.
    pub fn render(&self) -> BezPath {
        let mut path = BezPath::new();
        self.render_with(|el| path.push(el));
        path
    }

    /// Render the spline to an SVG path data string.
    pub fn render_svg(&self) -> String {
        self.render().to_svg()
    }
}

#[cfg(test)]
mod tests {
    use super::{ControlPoint, PointType, Spline, SplineError};
    use crate::common::mod2pi;
    use crate::{
        CurvatureResult, MyCurve, PathEl, Point, TwoParamCurve, TwoParamSpline, Vec2,
        MAX_RENDER_POINTS,
    };
    use arrayvec::ArrayVec;
    use core::f64::consts::PI;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::sync::Arc;

    fn smooth(coords: &[(f64, f64)]) -> Vec<ControlPoint> {
        coords.iter().map(|&p| ControlPoint::smooth(p)).collect()
    }

    /// A wandering chain with no sharp turns and no tiny steps.
    fn random_chain(rng: &mut StdRng, n: usize) -> Vec<ControlPoint> {
        let mut pt = Point::new(rng.random_range(-5.0..5.0), rng.random_range(-5.0..5.0));
        let mut dir = rng.random_range(-PI..PI);
        let mut result = Vec::with_capacity(n);
        for _ in 0..n {
            let ty = if rng.random_bool(0.2) {
                PointType::Corner
            } else {
                PointType::Smooth
            };
            result.push(ControlPoint::new(pt, ty));
            dir += rng.random_range(-1.0..1.0);
            let len = rng.random_range(0.5..1.5);
            pt = Point::new(pt.x + len * dir.cos(), pt.y + len * dir.sin());
        }
        result
    }

    /// End points of each segment, split at marks.
    fn segment_ends(els: &[PathEl]) -> Vec<Point> {
        let mut ends = Vec::new();
        let mut last = None;
        for el in els {
            match *el {
                PathEl::Mark(_) | PathEl::ClosePath => {
                    if let Some(p) = last.take() {
                        ends.push(p);
                    }
                }
                PathEl::CurveTo(_, _, p) | PathEl::LineTo(p) => last = Some(p),
                PathEl::MoveTo(_) => {}
            }
        }
        ends.extend(last);
        ends
    }

    #[test]
    fn point_type_chars() {
        assert_eq!(PointType::from_char('c'), Some(PointType::Corner));
        assert_eq!(PointType::from_char('s'), Some(PointType::Smooth));
        assert_eq!(PointType::from_char('x'), None);
        assert_eq!(PointType::Corner.as_char(), 'c');
        assert_eq!(PointType::Smooth.as_char(), 's');
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn corner_segments_are_exact() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(1.0, 2.0);
        let mut spline = Spline::new(
            [
                ControlPoint::smooth(a),
                ControlPoint::corner(b),
                ControlPoint::smooth((3.0, 1.0)),
                ControlPoint::smooth((4.0, 3.0)),
            ],
            false,
        );
        spline.solve();
        let th = (b.y - a.y).atan2(b.x - a.x);
        let pts = spline.ctrl_pts();
        assert_eq!(pts[0].r_th, Some(th));
        assert_eq!(pts[1].l_th, Some(th));
        assert_eq!(pts[0].l_th, None);
        assert_eq!(pts[3].r_th, None);
        assert_eq!(pts[0].r_ak, 0.0);
        // The run after the corner is solved, not straight.
        assert!(pts[2].l_th.is_some());
        assert_ne!(pts[1].r_th, Some((-1.0f64).atan2(2.0)));
    }

    #[test]
    fn closed_polygon_round_trip() {
        let mut spline = Spline::new(
            [(0.0, 0.0), (2.0, 0.0), (2.0, 1.0), (0.0, 1.0)].map(ControlPoint::corner),
            true,
        );
        assert_eq!(spline.start_ix(), 0);
        spline.solve();
        for cp in spline.ctrl_pts() {
            assert!(cp.l_th.is_some() && cp.r_th.is_some());
        }
        assert!((spline.ctrl_pts()[3].r_th.unwrap() + PI / 2.0).abs() < 1e-15);
        let path = spline.render();
        let els = path.elements();
        assert_eq!(els[0], PathEl::MoveTo(spline.ctrl_pts()[0].pt));
        assert_eq!(els.last(), Some(&PathEl::ClosePath));
        assert_eq!(path.to_svg().matches('C').count(), 4);
    }

    #[test]
    fn closed_smooth_starts_at_corner() {
        let mut spline = Spline::new(
            [
                ControlPoint::smooth((1.0, 0.0)),
                ControlPoint::smooth((0.0, 1.0)),
                ControlPoint::smooth((-1.0, 0.0)),
                ControlPoint::corner((0.0, -1.0)),
            ],
            true,
        );
        assert_eq!(spline.start_ix(), 3);
        spline.solve();
        spline.compute_curvature_blending();
        let pts = spline.ctrl_pts();
        for cp in &pts[..3] {
            assert!(cp.l_th.is_some() && cp.r_th.is_some());
            // Counterclockwise loop bends left everywhere.
            assert!(cp.k_blend.unwrap() > 0.0);
        }
        assert_eq!(pts[3].k_blend, None);
        let path = spline.render();
        assert_eq!(path.elements().first(), Some(&PathEl::MoveTo(pts[0].pt)));
        assert_eq!(path.elements().last(), Some(&PathEl::ClosePath));
        let ends = segment_ends(path.elements());
        assert_eq!(ends, [pts[1].pt, pts[2].pt, pts[3].pt, pts[0].pt]);
    }

    #[test]
    fn open_ends_interpolate_exactly() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..20 {
            let n = rng.random_range(2..9);
            let mut spline = Spline::new(random_chain(&mut rng, n), rng.random_bool(0.5));
            spline.solve();
            spline.compute_curvature_blending();
            let path = spline.render();
            let ends = segment_ends(path.elements());
            let pts = spline.ctrl_pts();
            let expected: Vec<Point> = if spline.is_closed() {
                (1..=n).map(|i| pts[i % n].pt).collect()
            } else {
                pts[1..].iter().map(|cp| cp.pt).collect()
            };
            assert_eq!(ends, expected);
        }
    }

    #[test]
    fn collinear_chain_stays_straight() {
        let mut spline = Spline::new(
            smooth(&[(0.0, 1.0), (1.0, 3.0), (1.5, 4.0), (3.0, 7.0)]),
            false,
        );
        spline.solve();
        let th = 2.0f64.atan2(1.0);
        for cp in spline.ctrl_pts() {
            for t in [cp.l_th, cp.r_th].into_iter().flatten() {
                assert!((t - th).abs() < 1e-6, "{t}");
            }
            assert!(cp.l_ak.abs() < 1e-6 && cp.r_ak.abs() < 1e-6);
        }
    }

    #[test]
    fn smooth_run_matches_solver() {
        let coords = [(0.0, 0.0), (1.0, 0.5), (2.0, 0.6), (3.0, 0.2)];
        let mut spline = Spline::new(smooth(&coords), false);
        spline.solve();
        let mut inner = TwoParamSpline::new(coords.map(Point::from));
        inner.solve(&MyCurve);
        let errs = inner.continuity_errors(&MyCurve);
        assert!(errs.iter().all(|e| e.abs() < 1e-3));
        let pts = spline.ctrl_pts();
        for (i, &th) in inner.ths().iter().enumerate() {
            if i > 0 {
                assert_eq!(pts[i].l_th, Some(th));
            }
            if i < 3 {
                assert_eq!(pts[i].r_th, Some(th));
            }
        }
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn inflection_blends_to_zero() {
        // The middle tangent points up, so the curve dips before it and
        // drops after it: an S with the inflection at the middle point.
        let mut spline = Spline::new(
            [
                ControlPoint::smooth((0.0, 0.0)),
                ControlPoint::smooth((1.0, 0.0)).with_tangents(Some(0.5), None),
                ControlPoint::smooth((2.0, 0.0)),
            ],
            false,
        );
        spline.solve();
        let mid = spline.ctrl_pts()[1];
        assert_eq!(mid.l_th, Some(0.5));
        assert_eq!(mid.r_th, Some(0.5));
        assert!(mid.l_ak > 0.0 && mid.r_ak < 0.0);
        spline.compute_curvature_blending();
        assert_eq!(spline.ctrl_pts()[1].k_blend, Some(0.0));
        assert_eq!(spline.ctrl_pts()[0].k_blend, None);
        assert_eq!(spline.ctrl_pts()[2].k_blend, None);
    }

    #[test]
    fn same_sign_blends_to_harmonic_mean() {
        let mut spline = Spline::new(smooth(&[(0.0, 0.0), (1.0, 1.0), (3.0, 0.0)]), false);
        spline.solve();
        spline.compute_curvature_blending();
        let mid = spline.ctrl_pts()[1];
        let lk = mid.l_ak.tan() / 2.0f64.sqrt();
        let rk = mid.r_ak.tan() / 5.0f64.sqrt();
        assert!(lk < 0.0 && rk < 0.0);
        let k = mid.k_blend.unwrap();
        assert!((k - 2.0 / (1.0 / lk + 1.0 / rk)).abs() < 1e-12);
        assert!(k >= lk.min(rk) - 1e-12 && k <= lk.max(rk) + 1e-12);
    }

    #[test]
    fn solved_angles_are_scale_invariant() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10 {
            let n = rng.random_range(3..8);
            let pts = random_chain(&mut rng, n);
            let mut base = Spline::new(pts.clone(), false);
            base.solve();
            for scale in [0.25, 3.7, 4.0] {
                let scaled_pts = pts.iter().map(|cp| {
                    ControlPoint::new(Point::new(cp.pt.x * scale, cp.pt.y * scale), cp.ty)
                });
                let mut scaled = Spline::new(scaled_pts, false);
                scaled.solve();
                for (a, b) in base.ctrl_pts().iter().zip(scaled.ctrl_pts()) {
                    for (ta, tb) in [(a.l_th, b.l_th), (a.r_th, b.r_th)] {
                        match (ta, tb) {
                            (Some(ta), Some(tb)) => {
                                assert!(mod2pi(ta - tb).abs() < 1e-7, "{ta} {tb}");
                            }
                            (ta, tb) => assert_eq!(ta, tb),
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn single_segment_svg() {
        let mut spline = Spline::new(smooth(&[(0.0, 0.0), (3.0, 4.0)]), false);
        spline.solve();
        spline.compute_curvature_blending();
        let svg = spline.render_svg();
        let tokens: Vec<&str> = svg.split(' ').collect();
        assert_eq!(tokens.len(), 8, "{svg}");
        assert_eq!(&tokens[..2], &["M0", "0"]);
        assert!(tokens[2].starts_with('C'));
        assert!(tokens[2][1..].parse::<f64>().is_ok());
        for t in &tokens[3..6] {
            assert!(t.parse::<f64>().is_ok(), "{t}");
        }
        assert_eq!(&tokens[6..], &["3", "4"]);
    }

    #[test]
    fn pinned_tangents_survive_solve() {
        let mut spline = Spline::new(
            [
                ControlPoint::corner((0.0, 0.0)).with_tangents(None, Some(1.0)),
                ControlPoint::smooth((2.0, 0.0)),
            ],
            false,
        );
        spline.solve();
        let first = spline.ctrl_pts();
        assert_eq!(first[0].r_th, Some(1.0));
        // Solving twice is the same as solving once.
        let snapshot = first.to_vec();
        spline.solve();
        assert_eq!(spline.ctrl_pts(), &snapshot[..]);
    }

    #[test]
    fn unsolved_renders_straight() {
        let spline = Spline::new(smooth(&[(0.0, 0.0), (3.0, 0.0)]), false);
        match spline.render().elements() {
            [PathEl::MoveTo(_), PathEl::Mark(0), PathEl::CurveTo(a, b, _)] => {
                assert!(a.y.abs() < 1e-12 && b.y.abs() < 1e-12);
            }
            els => panic!("unexpected {els:?}"),
        }
    }

    #[test]
    fn empty_and_tiny() {
        let mut empty = Spline::new([], false);
        empty.solve();
        empty.compute_curvature_blending();
        assert!(empty.render().elements().is_empty());
        assert_eq!(empty.render_svg(), "");

        let mut one = Spline::new(smooth(&[(1.0, 2.0)]), true);
        one.solve();
        one.compute_curvature_blending();
        // No segments, so nothing to close.
        assert_eq!(one.render_svg(), "M1 2");
        assert_eq!(one.render().elements(), &[PathEl::MoveTo(Point::new(1.0, 2.0))]);
        assert_eq!(one.validate(), Err(SplineError::TooFewPoints { len: 1 }));

        let two = Spline::new(smooth(&[(0.0, 0.0), (1.0, 0.0)]), true);
        let path = two.render();
        assert_eq!(path.elements().last(), Some(&PathEl::ClosePath));
        assert_eq!(path.to_svg().matches('C').count(), 2);
    }

    #[test]
    fn validate_rejects_degenerate_input() {
        let mut spline = Spline::new(smooth(&[(0.0, 0.0), (1.0, 0.0), (1.0, 0.0)]), false);
        assert_eq!(
            spline.try_solve(),
            Err(SplineError::ZeroLengthSegment { index: 1 })
        );
        // Solving anyway must not panic.
        spline.solve();
        spline.compute_curvature_blending();
        let path = spline.render();
        let marks = path.elements().iter().filter(|el| matches!(el, PathEl::Mark(_)));
        assert_eq!(marks.count(), 2);

        let closed = Spline::new(smooth(&[(0.0, 0.0), (1.0, 0.0), (0.0, 0.0)]), true);
        assert_eq!(
            closed.validate(),
            Err(SplineError::ZeroLengthSegment { index: 2 })
        );

        let nan = Spline::new(smooth(&[(0.0, 0.0), (f64::NAN, 0.0)]), false);
        assert_eq!(nan.validate(), Err(SplineError::NonFinitePoint { index: 1 }));

        let pinned = Spline::new(
            [
                ControlPoint::smooth((0.0, 0.0)).with_tangents(Some(f64::INFINITY), None),
                ControlPoint::smooth((1.0, 0.0)),
            ],
            false,
        );
        assert_eq!(
            pinned.validate(),
            Err(SplineError::NonFiniteTangent { index: 0 })
        );
        assert_eq!(
            SplineError::ZeroLengthSegment { index: 3 }.to_string(),
            "segment starting at point 3 has zero length"
        );
    }

    /// A family that returns a handle list of the wrong length.
    struct ThreeHandles;

    impl TwoParamCurve for ThreeHandles {
        fn render(&self, th0: f64, th1: f64) -> ArrayVec<Vec2, MAX_RENDER_POINTS> {
            let mut pts = MyCurve.render(th0, th1);
            pts.push(Vec2::new(1.0, 0.0));
            pts
        }

        fn render4(
            &self,
            th0: f64,
            th1: f64,
            _k0: Option<f64>,
            _k1: Option<f64>,
        ) -> ArrayVec<Vec2, MAX_RENDER_POINTS> {
            self.render(th0, th1)
        }

        fn compute_curvature(&self, th0: f64, th1: f64) -> CurvatureResult {
            MyCurve.compute_curvature(th0, th1)
        }

        fn endpoint_tangent(&self, th: f64) -> f64 {
            MyCurve.endpoint_tangent(th)
        }
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "render4 returned 3 points")]
    fn malformed_render_is_caught() {
        let spline = Spline::new(smooth(&[(0.0, 0.0), (1.0, 0.0)]), false)
            .with_curve(Arc::new(ThreeHandles));
        drop(spline.render());
    }

    #[test]
    fn custom_curve_and_tracing() {
        // Another test may have installed a subscriber already.
        let installed = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
        drop(installed);
        let mut spline = Spline::new(smooth(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]), false)
            .with_curve(Arc::new(MyCurve));
        assert!(spline.try_solve().is_ok());
        spline.compute_curvature_blending();
        assert!(spline.ctrl_pts()[1].k_blend.is_some());
        assert!(format!("{spline:?}").starts_with("Spline { ctrl_pts"));
    }
}
