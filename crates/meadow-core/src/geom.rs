#![forbid(unsafe_code)]

//! 2D geometry kernel: points, cubic Beziers, poly-curves and the shell constructor.
//!
//! Angles follow the generator's convention: `0` points up (negative y) and angles grow
//! clockwise, so a point at distance `r` and angle `a` from `(x0, y0)` is
//! `(x0 + sin(a)·r, y0 − cos(a)·r)`.

use crate::path::PathData;
use crate::{Error, Result};

pub type Unit = euclid::UnknownUnit;

pub type Point = euclid::Point2D<f64, Unit>;
pub type Vector = euclid::Vector2D<f64, Unit>;

pub fn point(x: f64, y: f64) -> Point {
    euclid::point2(x, y)
}

pub fn vector(x: f64, y: f64) -> Vector {
    euclid::vec2(x, y)
}

/// Point at distance `r` from `origin` along the absolute angle `a` (radians, 0 = up).
pub fn polar(origin: Point, r: f64, a: f64) -> Point {
    point(origin.x + a.sin() * r, origin.y - a.cos() * r)
}

/// Returns the unit vector pointing along `v`.
pub fn normalize(v: Vector) -> Result<Vector> {
    let len = v.length();
    if len == 0.0 {
        return Err(Error::ZeroLengthVector);
    }
    Ok(v / len)
}

/// Clockwise perpendicular in screen space.
pub fn perp(v: Vector) -> Vector {
    vector(v.y, -v.x)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleType {
    Smooth,
    Cusp,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub p0: Point,
    pub p1: Point,
    pub p2: Point,
    pub p3: Point,
}

impl CubicBezier {
    pub fn new(p0: Point, p1: Point, p2: Point, p3: Point) -> Self {
        Self { p0, p1, p2, p3 }
    }

    /// Evaluates the curve with Bernstein weights. `t` is not clamped.
    pub fn eval(&self, t: f64) -> Point {
        let t1 = 1.0 - t;

        let k1 = t1 * t1 * t1;
        let k2 = 3.0 * t * t1 * t1;
        let k3 = 3.0 * t * t * t1;
        let k4 = t * t * t;

        point(
            self.p0.x * k1 + self.p1.x * k2 + self.p2.x * k3 + self.p3.x * k4,
            self.p0.y * k1 + self.p1.y * k2 + self.p2.y * k3 + self.p3.y * k4,
        )
    }

    /// de Casteljau subdivision at `t`. Both halves share the split point exactly.
    pub fn split(&self, t: f64) -> (CubicBezier, CubicBezier) {
        let l1 = lerp(self.p0, self.p1, t);
        let mid = lerp(self.p1, self.p2, t);
        let r2 = lerp(self.p2, self.p3, t);

        let l2 = lerp(l1, mid, t);
        let r1 = lerp(mid, r2, t);
        let at = lerp(l2, r1, t);

        (
            CubicBezier::new(self.p0, l1, l2, at),
            CubicBezier::new(at, r1, r2, self.p3),
        )
    }

    /// Direction of travel at `t`, as an absolute angle in the up-is-zero convention.
    ///
    /// Uses a forward difference (`t` and `t + 0.01`), which keeps the tips of the curve well
    /// defined even when the end control points coincide.
    pub fn heading(&self, t: f64) -> f64 {
        let a = self.eval(t);
        let b = self.eval(t + 0.01);
        (b.y - a.y).atan2(b.x - a.x) + std::f64::consts::FRAC_PI_2
    }

    pub fn to_path(&self) -> PathData {
        let mut p = PathData::new();
        p.move_to(self.p0).curve_to(self.p1, self.p2, self.p3);
        p
    }
}

fn lerp(a: Point, b: Point, t: f64) -> Point {
    point(a.x + t * (b.x - a.x), a.y + t * (b.y - a.y))
}

/// A chain of cubic segments: one start point plus three points per segment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolyCurve3 {
    points: Vec<Point>,
    handles: Vec<HandleType>,
}

impl PolyCurve3 {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, p: Point) {
        self.points.push(p);
    }

    pub fn smooth_curve(&mut self, c1: Point, c2: Point, end: Point) {
        self.push_segment(c1, c2, end, HandleType::Smooth);
    }

    pub fn cusp_curve(&mut self, c1: Point, c2: Point, end: Point) {
        self.push_segment(c1, c2, end, HandleType::Cusp);
    }

    fn push_segment(&mut self, c1: Point, c2: Point, end: Point, handle: HandleType) {
        self.points.extend([c1, c2, end]);
        self.handles.push(handle);
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn points_mut(&mut self) -> &mut [Point] {
        &mut self.points
    }

    pub fn handles(&self) -> &[HandleType] {
        &self.handles
    }

    pub fn segment_count(&self) -> usize {
        self.handles.len()
    }

    pub fn to_path(&self) -> PathData {
        let mut p = PathData::new();
        let Some(&first) = self.points.first() else {
            return p;
        };
        p.move_to(first);
        for seg in self.points[1..].chunks_exact(3) {
            p.curve_to(seg[0], seg[1], seg[2]);
        }
        p
    }
}

/// A polygon whose vertices are either hard corners or smooth quadratic joints.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolyQuadLine {
    points: Vec<Point>,
    handles: Vec<HandleType>,
    pub closed: bool,
}

impl PolyQuadLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.handles.clear();
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn handle(&self, i: usize) -> Option<HandleType> {
        self.handles.get(i).copied()
    }

    /// Appends a smooth point.
    pub fn add(&mut self, p: Point) {
        self.points.push(p);
        self.handles.push(HandleType::Smooth);
    }

    /// Inserts a smooth point right after index `after` (clamped to the end).
    pub fn insert_after(&mut self, after: usize, p: Point) {
        let at = (after + 1).min(self.points.len());
        self.points.insert(at, p);
        self.handles.insert(at, HandleType::Smooth);
    }

    /// Flips a point between smooth and cusp. Out-of-range indices are ignored.
    pub fn toggle(&mut self, i: usize) {
        if let Some(h) = self.handles.get_mut(i) {
            *h = match *h {
                HandleType::Cusp => HandleType::Smooth,
                HandleType::Smooth => HandleType::Cusp,
            };
        }
    }

    /// Removes a point. Out-of-range indices are ignored.
    pub fn remove(&mut self, i: usize) {
        if i >= self.points.len() {
            return;
        }
        self.points.remove(i);
        self.handles.remove(i);
    }

    /// Straight polyline through every point.
    pub fn to_polyline_path(&self) -> PathData {
        let mut p = PathData::new();
        let Some(&first) = self.points.first() else {
            return p;
        };
        p.move_to(first);
        p.poly_to(self.points[1..].iter().copied());
        if self.closed {
            p.close();
        }
        p
    }

    /// Quadratic spline: cusp points become hard line vertices, runs of smooth points become
    /// quadratic segments joined at the midpoints between consecutive vertices.
    pub fn to_curve_path(&self) -> PathData {
        let mut p = PathData::new();
        let len = self.points.len();
        let Some(&first) = self.points.first() else {
            return p;
        };
        p.move_to(first);

        let last = len - 1;
        let pts = &self.points;
        let mut i = 0usize;
        while i + 1 < len {
            let i2 = i + 1;
            let i3 = (i + 2) % len;

            if (!self.closed && i2 == last) || self.handles[i2] == HandleType::Cusp {
                p.line_to(pts[i2]);
            } else if i3 == 0
                || (!self.closed && i3 == last)
                || self.handles[i3] == HandleType::Cusp
            {
                p.quad_to(pts[i2], pts[i3]);
                i += 1;
            } else {
                p.quad_to(pts[i2], lerp(pts[i2], pts[i3], 0.5));
            }
            i += 1;
        }

        if self.closed {
            p.close();
        }
        p
    }
}

/// Inputs for [`make_shell`]: three spine segments given as (length, absolute angle) plus the
/// outline width at the base, middle and tip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShellParams {
    pub lengths: [f64; 3],
    pub angles: [f64; 3],
    pub origin: Point,
    pub widths: [f64; 3],
    pub smooth_top: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Shell {
    pub spine: CubicBezier,
    pub outline: PolyCurve3,
}

/// Builds a closed outline around a three-segment angled spine.
///
/// The outline runs from the left side of the base up to the tip and back down the right side;
/// both turn points are cusps, so the result always has exactly 7 points.
pub fn make_shell(params: &ShellParams) -> Shell {
    let [r1, r2, r3] = params.lengths;
    let [a0, a1, a2] = params.angles;
    let [w0, w1, w2] = params.widths;
    let origin = params.origin;

    let s1 = polar(origin, r1, a0);
    let s2 = polar(s1, r2, a1);
    let s3 = polar(s2, r3, a2);

    let offset = |angle: f64, width: f64| {
        let half = width / 2.0;
        vector(angle.cos() * half, angle.sin() * half)
    };

    let tip_angle = if params.smooth_top {
        a2
    } else {
        (a1 + a2) / 2.0
    };
    let d0 = offset(a0, w0);
    let d1 = offset((a0 + a1) / 2.0, w1);
    let d2 = offset(tip_angle, w2);

    let shoulder = if params.smooth_top { s3 } else { s2 };

    let mut outline = PolyCurve3::new();
    outline.start(origin - d0);
    outline.cusp_curve(s1 - d1, shoulder - d2, s3);
    outline.cusp_curve(shoulder + d2, s1 + d1, origin + d0);

    Shell {
        spine: CubicBezier::new(origin, s1, s2, s3),
        outline,
    }
}
