// Copyright 2025 the Kurbo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bézier paths (lines and cubics).

use alloc::vec::Vec;

use crate::{CubicBez, Point};

/// A path of lines and cubic Bézier segments, possibly with multiple subpaths.
#[derive(Clone, Default, Debug, PartialEq)]
pub struct BezPath(Vec<PathEl>);

/// The element of a Bézier path.
///
/// A valid path has `MoveTo` at the beginning of each subpath.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathEl {
    /// Start a new subpath.
    MoveTo(Point),
    /// A straight line to the point.
    LineTo(Point),
    /// A cubic Bézier with two control points and an end point.
    CurveTo(Point, Point, Point),
    /// Close the current subpath with a line back to its start.
    ClosePath,
    /// Tag the following segments with a provenance index.
    ///
    /// Marks draw nothing. [`Spline::render`](crate::Spline::render) emits
    /// `Mark(i)` before the segment that starts at control point `i`, and
    /// [`BezPath::hit_test`] reports the mark of the nearest segment.
    Mark(usize),
}

impl BezPath {
    /// Create a new path.
    pub fn new() -> BezPath {
        BezPath::default()
    }

    /// Create a path from a vector of path elements.
    pub fn from_vec(v: Vec<PathEl>) -> BezPath {
        BezPath(v)
    }

    /// Push a generic path element onto the path.
    pub fn push(&mut self, el: PathEl) {
        self.0.push(el);
    }

    /// Push a "move to" element onto the path.
    pub fn move_to<P: Into<Point>>(&mut self, p: P) {
        self.push(PathEl::MoveTo(p.into()));
    }

    /// Push a "line to" element onto the path.
    pub fn line_to<P: Into<Point>>(&mut self, p: P) {
        self.push(PathEl::LineTo(p.into()));
    }

    /// Push a "curve to" element onto the path.
    pub fn curve_to<P: Into<Point>>(&mut self, p1: P, p2: P, p3: P) {
        self.push(PathEl::CurveTo(p1.into(), p2.into(), p3.into()));
    }

    /// Push a "close path" element onto the path.
    pub fn close_path(&mut self) {
        self.push(PathEl::ClosePath);
    }

    /// Push a provenance mark onto the path.
    pub fn mark(&mut self, ix: usize) {
        self.push(PathEl::Mark(ix));
    }

    /// Get the path elements.
    pub fn elements(&self) -> &[PathEl] {
        &self.0
    }

    /// Returns `true` if the path contains no segments.
    pub fn is_empty(&self) -> bool {
        !self
            .0
            .iter()
            .any(|el| matches!(*el, PathEl::LineTo(..) | PathEl::CurveTo(..)))
    }

    /// Find the segment nearest to a point.
    ///
    /// Lines are measured exactly; curves are flattened into
    /// [`HIT_TEST_SUBDIVISIONS`] line pieces. `ClosePath` counts as a line
    /// back to the subpath start.
    pub fn hit_test(&self, p: Point) -> HitTestResult {
        let mut result = HitTestResult::new(p);
        let mut start = Point::ZERO;
        let mut last = Point::ZERO;
        let mut mark = None;
        for &el in &self.0 {
            match el {
                PathEl::MoveTo(p0) => {
                    start = p0;
                    last = p0;
                }
                PathEl::LineTo(p1) => {
                    result.accum_line(last, p1, mark);
                    last = p1;
                }
                PathEl::CurveTo(p1, p2, p3) => {
                    let c = CubicBez::new(last.to_vec2(), p1.to_vec2(), p2.to_vec2(), p3.to_vec2());
                    result.accum_curve(&c, mark);
                    last = p3;
                }
                PathEl::ClosePath => {
                    result.accum_line(last, start, mark);
                    last = start;
                }
                PathEl::Mark(ix) => mark = Some(ix),
            }
        }
        result
    }
}

impl<'a> IntoIterator for &'a BezPath {
    type Item = PathEl;
    type IntoIter = core::iter::Cloned<core::slice::Iter<'a, PathEl>>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements().iter().cloned()
    }
}

impl Extend<PathEl> for BezPath {
    fn extend<I: IntoIterator<Item = PathEl>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl FromIterator<PathEl> for BezPath {
    fn from_iter<T: IntoIterator<Item = PathEl>>(iter: T) -> Self {
        BezPath(iter.into_iter().collect())
    }
}

/// Number of line pieces a cubic is flattened into for hit testing.
pub const HIT_TEST_SUBDIVISIONS: usize = 32;

/// The nearest segment found by [`BezPath::hit_test`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitTestResult {
    /// The query point.
    pub point: Point,
    /// Distance from the query point to the nearest segment.
    ///
    /// `f64::INFINITY` if the path has no segments.
    pub best_dist: f64,
    /// Mark in effect for the nearest segment, if any.
    pub best_mark: Option<usize>,
}

impl HitTestResult {
    /// An empty result for the given query point.
    pub fn new(point: Point) -> Self {
        HitTestResult {
            point,
            best_dist: f64::INFINITY,
            best_mark: None,
        }
    }

    /// Consider a single point.
    pub fn accum_point(&mut self, p: Point, mark: Option<usize>) {
        let dist = self.point.distance(p);
        if dist < self.best_dist {
            self.best_dist = dist;
            self.best_mark = mark;
        }
    }

    /// Consider a line segment.
    pub fn accum_line(&mut self, p0: Point, p1: Point, mark: Option<usize>) {
        let d = p1 - p0;
        let len2 = d.hypot2();
        let t = if len2 > 0.0 {
            ((self.point - p0).dot(d) / len2).clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.accum_point(p0 + d * t, mark);
    }

    /// Consider a cubic, flattened into line pieces.
    pub fn accum_curve(&mut self, c: &CubicBez, mark: Option<usize>) {
        let mut last = c.p0.to_point();
        for i in 1..=HIT_TEST_SUBDIVISIONS {
            let t = i as f64 * (HIT_TEST_SUBDIVISIONS as f64).recip();
            let p = c.eval(t).to_point();
            self.accum_line(last, p, mark);
            last = p;
        }
    }
}
